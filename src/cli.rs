//! CLI surfaces.
//!
//! Two binaries share one flag set: `drift` reports and never mutates;
//! `sync` repairs (SAFE kinds by default, every class under
//! `--interactive`). Usage errors exit 2 via clap; `--check` turns remaining
//! issues into exit 1.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::engine::{self, RunOptions};
use crate::fixes::{Prompter, RunMode, ScriptedPrompter, StdinPrompter};
use crate::report;

#[derive(Debug, clap::Args)]
pub struct CommonArgs {
    /// Dry run: report only and exit 1 if issues remain
    #[arg(long)]
    pub check: bool,

    /// Emit the machine-readable JSON document instead of text
    #[arg(long)]
    pub json: bool,

    /// Restrict to the documentation checks
    #[arg(long)]
    pub docs: bool,

    /// Scope to one feature's recorded change set
    #[arg(long, value_name = "FEATURE-ID")]
    pub manifest: Option<String>,

    /// Fast summary only: skip expensive correlations, emit nothing when clean
    #[arg(long)]
    pub quiet: bool,

    /// Report only coverage gaps (missing annotations, undocumented code)
    #[arg(long)]
    pub gaps: bool,

    /// Report only orphaned acceptance files and annotations
    #[arg(long)]
    pub orphans: bool,

    /// Report only acceptance-criteria issues
    #[arg(long)]
    pub tests: bool,
}

#[derive(Parser)]
#[command(name = "drift")]
#[command(about = "Detect drift between project artifacts")]
struct DriftCli {
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Parser)]
#[command(name = "sync")]
#[command(about = "Repair drift between project artifacts")]
struct SyncCli {
    #[command(flatten)]
    common: CommonArgs,

    /// Prompt for a decision per issue instead of applying only safe fixes
    #[arg(long)]
    interactive: bool,
}

/// Diagnostics go to stderr so stdout stays clean for report output.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "driftsync=warn".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub fn drift_main() -> ExitCode {
    let cli = DriftCli::parse();
    init_tracing();

    let opts = RunOptions {
        mode: RunMode::Check,
        fail_on_issues: cli.common.check,
        ..options_from(&cli.common, "drift")
    };

    // Check mode never prompts; the scripted prompter is an inert stand-in.
    let mut prompter = ScriptedPrompter::default();
    finish(&opts, &cli.common, &mut prompter)
}

pub fn sync_main() -> ExitCode {
    let cli = SyncCli::parse();
    init_tracing();

    let mode = if cli.common.check {
        RunMode::Check
    } else if cli.interactive {
        RunMode::Interactive
    } else {
        RunMode::Full
    };
    let opts = RunOptions {
        mode,
        fail_on_issues: cli.common.check,
        ..options_from(&cli.common, "sync")
    };

    if mode == RunMode::Interactive {
        let mut prompter = StdinPrompter;
        finish(&opts, &cli.common, &mut prompter)
    } else {
        let mut prompter = ScriptedPrompter::default();
        finish(&opts, &cli.common, &mut prompter)
    }
}

fn options_from(common: &CommonArgs, tool: &'static str) -> RunOptions {
    RunOptions {
        quiet: common.quiet,
        docs_only: common.docs,
        gaps: common.gaps,
        orphans: common.orphans,
        tests: common.tests,
        manifest: common.manifest.clone(),
        ..RunOptions::reporting(tool)
    }
}

fn finish(opts: &RunOptions, common: &CommonArgs, prompter: &mut dyn Prompter) -> ExitCode {
    let root = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("error: cannot determine working directory: {e}");
            return ExitCode::from(1);
        }
    };

    let outcome = engine::run(&root, opts, prompter);

    if common.json {
        let doc = report::render_json(opts.tool, &outcome.report);
        match serde_json::to_string_pretty(&doc) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("error: could not serialize report: {e}");
                return ExitCode::from(1);
            }
        }
    } else {
        let stdout = std::io::stdout();
        let _ = report::render_text(opts.tool, &outcome.report, common.quiet, &mut stdout.lock());
    }

    ExitCode::from(outcome.exit_code)
}
