use std::process::ExitCode;

fn main() -> ExitCode {
    tradequote_cli::run()
}
