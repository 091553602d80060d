// Shared transport configuration for building reqwest::Client instances.
//
// The probe client used during setup and the per-entry polling clients
// share timeout and header settings through this module.

use std::time::Duration;

/// Bound on every request to the pharmacy endpoint.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TransportConfig {
    /// Build a plain `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("nobetci/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(crate::error::Error::Transport)
    }

    /// Build a `reqwest::Client` with additional default headers.
    ///
    /// Used by [`PharmacyClient::new`](crate::PharmacyClient::new) to inject
    /// the `authorization` and `content-type` headers on every request.
    pub fn build_client_with_headers(
        &self,
        headers: reqwest::header::HeaderMap,
    ) -> Result<reqwest::Client, crate::error::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("nobetci/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(crate::error::Error::Transport)
    }
}
