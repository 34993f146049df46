//! CLI output: exit codes and error mapping from domain errors to stable CLI surface.

use crate::error::UpdateError;

pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
/// `check` found a file that an update would change.
pub const EXIT_OUTDATED: i32 = 2;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &UpdateError) -> String {
    match e {
        UpdateError::TargetMissing(path) => {
            format!("Target file does not exist: {} (use --create to install the template)", path.display())
        }
        other => other.to_string(),
    }
}
