//! Command handlers, one module per subcommand.

pub mod cities;
pub mod entries;
pub mod options;
pub mod setup;
pub mod watch;

use crate::error::CliError;

/// Map a dialoguer / interactive I/O failure into CliError.
pub(crate) fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}
