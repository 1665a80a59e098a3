//! sprig - branch strategy planner for feature-driven development

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = sprig_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
