//! venn-intersect: intersect line-delimited sets and draw their Venn diagram
//!
//! Failures are reported on stderr with exit status 100; usage errors exit
//! through clap with its own status.

use std::process::ExitCode;

const FAILURE_EXIT_CODE: u8 = 100;

fn main() -> ExitCode {
    match venn_intersect::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(FAILURE_EXIT_CODE)
        }
    }
}
