use std::process::ExitCode;

fn main() -> ExitCode {
    driftsync::cli::drift_main()
}
