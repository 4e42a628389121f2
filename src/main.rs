//! # capture-sort CLI
//!
//! Command-line interface for the capture-time renamer.
//!
//! ## Usage
//! ```bash
//! capture-sort ~/DCIM ~/Sorted camera
//! ```

mod cli;

use std::process::ExitCode;

fn main() -> ExitCode {
    capture_sort::init_tracing();

    match cli::run() {
        Ok(cli::Outcome::Success) => ExitCode::SUCCESS,
        Ok(cli::Outcome::VerificationFailed) => ExitCode::from(2),
        Err(e) => {
            eprintln!("{} {}", console::style("error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
