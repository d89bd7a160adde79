//! Exit handling shared by the four binaries.

use box_sync::BoxError;
use std::process::ExitCode;

/// Exit code indicating successful completion.
const EXIT_SUCCESS: u8 = 0;
/// Exit code indicating a fatal error occurred.
const EXIT_ERROR: u8 = 1;

/// Reports a fatal error (with its corrective hint, if any) and maps the run
/// result to the process exit code. `verbose` adds the full error chain.
pub fn finish(result: anyhow::Result<()>, verbose: bool) -> ExitCode {
    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("Error: {e}");
            if let Some(hint) = e.downcast_ref::<BoxError>().and_then(BoxError::hint) {
                eprintln!("{hint}");
            }
            if verbose {
                eprintln!("\n{e:?}");
            }
            ExitCode::from(EXIT_ERROR)
        }
    }
}
