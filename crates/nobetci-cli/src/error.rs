//! CLI error types with miette diagnostics.
//!
//! Maps core and flow errors into user-facing errors with actionable
//! help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use nobetci_core::{CoreError, FlowError};

/// Exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Authentication ───────────────────────────────────────────────

    #[error("The API key was rejected")]
    #[diagnostic(
        code(nobetci::invalid_auth),
        help(
            "Verify the key in your CollectAPI account\n\
             (https://collectapi.com/tr/api/health/nobetci-eczane-api)\n\
             and re-run: nobetci setup"
        )
    )]
    InvalidAuth,

    // ── Connection ───────────────────────────────────────────────────

    #[error("Cannot reach the pharmacy API")]
    #[diagnostic(
        code(nobetci::cannot_connect),
        help("Check your network connection and try again.\nDetails: {reason}")
    )]
    CannotConnect { reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(code(nobetci::timeout), help("The API did not answer in time; try again later."))]
    Timeout { seconds: u64 },

    // ── Entries ──────────────────────────────────────────────────────

    #[error("An entry for '{unique_id}' already exists")]
    #[diagnostic(
        code(nobetci::already_configured),
        help(
            "Re-running setup with the same city/district never creates a duplicate.\n\
             Remove the entry first: nobetci entries remove <id>"
        )
    )]
    AlreadyConfigured { unique_id: String },

    #[error("Entry '{unique_id}' not found")]
    #[diagnostic(code(nobetci::entry_not_found), help("Run: nobetci entries list"))]
    EntryNotFound { unique_id: String },

    #[error("No entries configured")]
    #[diagnostic(code(nobetci::no_entries), help("Add one with: nobetci setup"))]
    NoEntries,

    // ── Setup ────────────────────────────────────────────────────────

    #[error("The city table is empty; setup cannot continue")]
    #[diagnostic(
        code(nobetci::empty_city_table),
        help("The bundled dataset failed to load, or --cities-file pointed at a bad file.")
    )]
    EmptyCityTable,

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(nobetci::validation))]
    Validation { field: String, reason: String },

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(code(nobetci::config))]
    Config(Box<figment::Error>),

    #[error("Internal error: {0}")]
    #[diagnostic(code(nobetci::internal))]
    Internal(String),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidAuth => exit_code::AUTH,
            Self::CannotConnect { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AlreadyConfigured { .. } => exit_code::CONFLICT,
            Self::EntryNotFound { .. } | Self::NoEntries => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::EmptyCityTable => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidAuth => CliError::InvalidAuth,
            CoreError::CannotConnect { reason } => CliError::CannotConnect { reason },
            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "entry".into(),
                reason: message,
            },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── FlowError → CliError mapping ─────────────────────────────────────
//
// Only terminal flow outcomes cross this boundary; recoverable ones are
// re-rendered by the wizard. `AlreadyConfigured` is reconstructed with
// the precise unique id at the call site.

impl From<FlowError> for CliError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::InvalidAuth => CliError::InvalidAuth,
            FlowError::CannotConnect => CliError::CannotConnect {
                reason: "the pharmacy API could not be reached".into(),
            },
            FlowError::AlreadyConfigured => CliError::AlreadyConfigured {
                unique_id: "this city/district".into(),
            },
            FlowError::InvalidChoice(choice) => CliError::Validation {
                field: "choice".into(),
                reason: format!("'{choice}' is not one of the offered values"),
            },
            FlowError::Unknown | FlowError::OutOfOrder => CliError::Internal(err.to_string()),
        }
    }
}
