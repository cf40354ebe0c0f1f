use std::path::Path;

use driftsync::engine::{self, RunOptions};
use driftsync::fixes::ScriptedPrompter;
use driftsync::report;
use speculate2::speculate;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
    std::fs::write(path, content).expect("write fixture");
}

fn drifting_fixture(root: &Path) {
    write(
        root,
        "spec/FEATURES.md",
        "## F-0001: Router\n- Status: shipped\n\n## F-0002: Ingest\n- Status: planned\n",
    );
    write(root, "spec/acceptance/F-0001.md", "- [x] a\n- [ ] b\n");
    write(root, "spec/acceptance/F-0002.md", "- [x] a\n- [x] b\n");
    write(root, "spec/acceptance/F-0099.md", "- [ ] ghost\n");
}

speculate! {
    before {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let root = dir.path();
    }

    describe "json contract" {
        it "is valid and internally consistent" {
            drifting_fixture(root);
            let mut prompter = ScriptedPrompter::default();
            let outcome = engine::run(root, &RunOptions::reporting("drift"), &mut prompter);

            let doc = report::render_json("drift", &outcome.report);
            // Round-trip through a string to prove the document is valid JSON.
            let text = serde_json::to_string(&doc).expect("serialize");
            let parsed: serde_json::Value = serde_json::from_str(&text).expect("parse back");

            assert_eq!(parsed["tool"], "drift");
            assert!(parsed["timestamp"].as_str().expect("timestamp").contains('T'));

            let issues = parsed["issues"].as_array().expect("issues array");
            assert_eq!(
                issues.len() as u64,
                parsed["summary"]["total_issues"].as_u64().expect("total")
            );
            assert_eq!(parsed["summary"]["fixed_issues"], 0);

            for issue in issues {
                assert!(issue["type"].is_string());
                assert!(issue["description"].is_string());
            }
        }

        it "reports the sync tool name when asked" {
            let mut prompter = ScriptedPrompter::default();
            let outcome = engine::run(root, &RunOptions::reporting("sync"), &mut prompter);
            let doc = report::render_json("sync", &outcome.report);
            assert_eq!(doc["tool"], "sync");
            assert_eq!(doc["summary"]["total_issues"], 0);
        }
    }

    describe "text and json parity" {
        it "both renderings enumerate the identical issue set" {
            drifting_fixture(root);
            let mut prompter = ScriptedPrompter::default();
            let outcome = engine::run(root, &RunOptions::reporting("drift"), &mut prompter);

            let doc = report::render_json("drift", &outcome.report);
            let mut text = Vec::new();
            report::render_text("drift", &outcome.report, false, &mut text).expect("render");
            let text = String::from_utf8(text).expect("utf8");

            let issues = doc["issues"].as_array().expect("issues array");
            assert!(!issues.is_empty());
            for issue in issues {
                let description = issue["description"].as_str().expect("description");
                assert!(
                    text.contains(description),
                    "text rendering is missing: {description}"
                );
            }
        }
    }

    describe "quiet mode" {
        it "emits nothing when clean" {
            let opts = RunOptions {
                quiet: true,
                ..RunOptions::reporting("drift")
            };
            let mut prompter = ScriptedPrompter::default();
            let outcome = engine::run(root, &opts, &mut prompter);

            let mut out = Vec::new();
            report::render_text("drift", &outcome.report, true, &mut out).expect("render");
            assert!(out.is_empty());
            assert_eq!(outcome.exit_code, 0);
        }

        it "still reports issues when not clean" {
            drifting_fixture(root);
            let opts = RunOptions {
                quiet: true,
                ..RunOptions::reporting("drift")
            };
            let mut prompter = ScriptedPrompter::default();
            let outcome = engine::run(root, &opts, &mut prompter);

            let mut out = Vec::new();
            report::render_text("drift", &outcome.report, true, &mut out).expect("render");
            assert!(!out.is_empty());
        }
    }

    describe "exit codes" {
        it "check mode fails while issues remain and passes when clean" {
            drifting_fixture(root);
            let opts = RunOptions {
                fail_on_issues: true,
                ..RunOptions::reporting("drift")
            };
            let mut prompter = ScriptedPrompter::default();
            assert_eq!(engine::run(root, &opts, &mut prompter).exit_code, 1);

            let clean = TempDir::new().expect("temp dir");
            let mut prompter = ScriptedPrompter::default();
            assert_eq!(engine::run(clean.path(), &opts, &mut prompter).exit_code, 0);
        }
    }
}
