use std::process::ExitCode;

fn main() -> ExitCode {
    driftsync::cli::sync_main()
}
