// ── Core error types ──
//
// User-facing errors from nobetci-core. Consumers never see HTTP status
// codes or JSON parse failures directly -- the `From<nobetci_api::Error>`
// impl translates transport-layer errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid API key")]
    InvalidAuth,

    #[error("Cannot reach the pharmacy API: {reason}")]
    CannotConnect { reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<nobetci_api::Error> for CoreError {
    fn from(err: nobetci_api::Error) -> Self {
        match err {
            nobetci_api::Error::InvalidAuth => CoreError::InvalidAuth,
            nobetci_api::Error::Status { status, body } => CoreError::CannotConnect {
                reason: format!("HTTP {status}: {body}"),
            },
            nobetci_api::Error::Transport(e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else {
                    CoreError::CannotConnect {
                        reason: e.to_string(),
                    }
                }
            }
            nobetci_api::Error::InvalidUrl(e) => CoreError::Internal(format!("Invalid URL: {e}")),
            nobetci_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            nobetci_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
