use std::path::Path;

use driftsync::engine::{self, RunOptions};
use driftsync::fixes::{FixAction, FixDecision, RunMode, ScriptedPrompter};
use driftsync::models::IssueKind;
use git2::{Repository, Signature};
use speculate2::speculate;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
    std::fs::write(path, content).expect("write fixture");
}

/// Initialize a repository and commit everything currently in the tree.
fn init_repo(root: &Path) -> Repository {
    let repo = Repository::init(root).expect("init repo");
    {
        let mut config = repo.config().expect("config");
        config.set_str("user.name", "Fixture").expect("set name");
        config
            .set_str("user.email", "fixture@example.com")
            .expect("set email");

        let mut index = repo.index().expect("index");
        index
            .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
            .expect("add all");
        index.write().expect("write index");
        let tree_id = index.write_tree().expect("write tree");
        let tree = repo.find_tree(tree_id).expect("find tree");
        let sig = Signature::now("Fixture", "fixture@example.com").expect("signature");
        repo.commit(Some("HEAD"), &sig, &sig, "initial import", &tree, &[])
            .expect("commit");
    }
    repo
}

fn run_mode(root: &Path, mode: RunMode, prompter: &mut ScriptedPrompter) -> engine::RunOutcome {
    let opts = RunOptions {
        mode,
        ..RunOptions::reporting("sync")
    };
    engine::run(root, &opts, prompter)
}

speculate! {
    before {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let root = dir.path();
    }

    describe "full mode" {
        it "stages untracked files and corrects the hook path, leaving status drift alone" {
            write(root, "spec/FEATURES.md", "## F-0002: Ingest\n- Status: planned\n");
            write(root, "spec/acceptance/F-0002.md", "- [x] a\n- [x] b\n");
            write(root, ".githooks/pre-commit", "#!/bin/sh\nexit 0\n");
            let repo = init_repo(root);

            // Two untracked files under a source root, created after the commit.
            write(root, "src/alpha.rs", "pub struct Alpha;\n");
            write(root, "src/beta.rs", "pub struct Beta;\n");

            let mut prompter = ScriptedPrompter::default();
            let outcome = run_mode(root, RunMode::Full, &mut prompter);

            // Advisory modes always exit 0.
            assert_eq!(outcome.exit_code, 0);
            assert_eq!(outcome.report.fixed_count, 3);

            for file in ["src/alpha.rs", "src/beta.rs"] {
                let status = repo.status_file(Path::new(file)).expect("status");
                assert!(status.is_index_new(), "{file} should be staged");
            }

            let hooks = repo
                .config()
                .expect("config")
                .get_string("core.hooksPath")
                .expect("hooksPath set");
            assert_eq!(hooks, ".githooks");

            // The judgment call stays reported, not applied.
            let drift = outcome
                .report
                .issues
                .iter()
                .find(|i| i.kind == IssueKind::StatusDrift)
                .expect("status drift reported");
            assert!(!drift.fixed);
            let registry =
                std::fs::read_to_string(root.join("spec/FEATURES.md")).expect("read registry");
            assert!(registry.contains("- Status: planned"));
        }

        it "re-running after fixes finds nothing left to fix" {
            write(root, ".githooks/pre-commit", "#!/bin/sh\nexit 0\n");
            init_repo(root);
            write(root, "src/alpha.rs", "pub struct Alpha;\n");

            let mut prompter = ScriptedPrompter::default();
            let first = run_mode(root, RunMode::Full, &mut prompter);
            assert!(first.report.fixed_count > 0);

            let mut prompter = ScriptedPrompter::default();
            let second = run_mode(root, RunMode::Full, &mut prompter);
            assert_eq!(
                second
                    .report
                    .issues
                    .iter()
                    .filter(|i| matches!(i.kind, IssueKind::UntrackedFile | IssueKind::HookPath))
                    .count(),
                0
            );
        }
    }

    describe "check mode" {
        it "never mutates and exits 1 while issues remain" {
            write(root, ".githooks/pre-commit", "#!/bin/sh\nexit 0\n");
            init_repo(root);
            write(root, "src/alpha.rs", "pub struct Alpha;\n");

            let mut prompter = ScriptedPrompter::default();
            let opts = RunOptions {
                mode: RunMode::Check,
                fail_on_issues: true,
                ..RunOptions::reporting("drift")
            };
            let outcome = engine::run(root, &opts, &mut prompter);

            assert_eq!(outcome.exit_code, 1);
            assert_eq!(outcome.report.fixed_count, 0);
            let repo = Repository::open(root).expect("open repo");
            let status = repo.status_file(Path::new("src/alpha.rs")).expect("status");
            assert!(status.is_wt_new(), "file must stay untracked in check mode");
        }
    }

    describe "interactive mode" {
        it "applies the affirmed criteria fix" {
            write(root, "spec/FEATURES.md", "## F-0001: Router\n- Status: shipped\n");
            write(
                root,
                "spec/acceptance/F-0001.md",
                "- [x] one\n- [ ] two\n- [ ] three\n",
            );

            let mut prompter = ScriptedPrompter::new([FixDecision::Apply(
                FixAction::MarkCriteriaComplete,
            )]);
            let outcome = run_mode(root, RunMode::Interactive, &mut prompter);

            assert_eq!(outcome.report.fixed_count, 1);
            let acceptance =
                std::fs::read_to_string(root.join("spec/acceptance/F-0001.md")).expect("read");
            assert!(!acceptance.contains("- [ ]"));
            assert_eq!(acceptance.matches("- [x]").count(), 3);
        }

        it "promotes a drifted planned feature on request" {
            write(root, "spec/FEATURES.md", "## F-0002: Ingest\n- Status: planned\n");
            write(root, "spec/acceptance/F-0002.md", "- [x] a\n- [x] b\n");

            let mut prompter = ScriptedPrompter::new([FixDecision::Apply(
                FixAction::PromoteToInProgress,
            )]);
            let outcome = run_mode(root, RunMode::Interactive, &mut prompter);

            assert_eq!(outcome.report.fixed_count, 1);
            let registry = std::fs::read_to_string(root.join("spec/FEATURES.md")).expect("read");
            assert!(registry.contains("- Status: in_progress"));
        }

        it "records an escalation instead of mutating" {
            write(root, "spec/FEATURES.md", "## F-0002: Ingest\n- Status: planned\n");
            write(root, "spec/acceptance/F-0002.md", "- [x] a\n- [x] b\n");

            let mut prompter = ScriptedPrompter::new([FixDecision::Escalate]);
            let outcome = run_mode(root, RunMode::Interactive, &mut prompter);

            assert_eq!(outcome.report.fixed_count, 0);
            assert!(outcome
                .report
                .notes
                .iter()
                .any(|n| n.contains("escalated")));
            let registry = std::fs::read_to_string(root.join("spec/FEATURES.md")).expect("read");
            assert!(registry.contains("- Status: planned"));
        }
    }

    describe "degraded environments" {
        it "full mode outside version control still reports text-artifact drift" {
            write(root, "spec/FEATURES.md", "## F-0002: Ingest\n- Status: planned\n");
            write(root, "spec/acceptance/F-0002.md", "- [x] a\n- [x] b\n");

            let mut prompter = ScriptedPrompter::default();
            let outcome = run_mode(root, RunMode::Full, &mut prompter);

            assert_eq!(outcome.exit_code, 0);
            assert!(outcome
                .report
                .issues
                .iter()
                .any(|i| i.kind == IssueKind::StatusDrift));
            assert!(!outcome
                .report
                .issues
                .iter()
                .any(|i| i.kind == IssueKind::UntrackedFile));
        }
    }
}
