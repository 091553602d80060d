use thiserror::Error;

/// Top-level error type for the `nobetci-api` crate.
///
/// Covers every failure mode of the single fetch operation: credential
/// rejection, non-success statuses, transport failures, timeouts, and
/// malformed bodies. `nobetci-core` maps these into setup-flow error keys
/// and refresh diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    /// API key rejected by the service (HTTP 401).
    #[error("Invalid API key")]
    InvalidAuth,

    /// Non-success HTTP status other than 401, with the response body
    /// kept for diagnostics.
    #[error("API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request exceeded the configured timeout.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the credential itself was rejected.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::InvalidAuth)
    }

    /// Returns `true` for transient failures worth retrying on the next
    /// scheduled poll.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
