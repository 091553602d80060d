// Hand-crafted async HTTP client for the CollectAPI duty-pharmacy endpoint.
//
// Single operation: GET /health/dutyPharmacy?il=<city>&ilce=<district>
// Auth: `authorization: apikey <key>` header on every request.

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::{Pharmacy, PharmacyResponse};

/// Production endpoint for duty-pharmacy listings.
pub const API_URL: &str = "https://api.collectapi.com/health/dutyPharmacy";

/// Async client for the CollectAPI duty-pharmacy endpoint.
///
/// One instance per API key: the key is injected as a sensitive default
/// header, so a new key means a new client.
pub struct PharmacyClient {
    http: reqwest::Client,
    endpoint: Url,
    timeout_secs: u64,
}

impl PharmacyClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for the production endpoint from an API key.
    pub fn new(api_key: &SecretString, transport: &TransportConfig) -> Result<Self, Error> {
        Self::with_endpoint(API_URL, api_key, transport)
    }

    /// Build a client against an alternate endpoint URL (tests, proxies).
    pub fn with_endpoint(
        endpoint: &str,
        api_key: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        // A key that cannot even form a header value is invalid auth material.
        let mut auth = HeaderValue::from_str(&format!("apikey {}", api_key.expose_secret()))
            .map_err(|_| Error::InvalidAuth)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = transport.build_client_with_headers(headers)?;
        let endpoint = Url::parse(endpoint)?;

        Ok(Self {
            http,
            endpoint,
            timeout_secs: transport.timeout.as_secs(),
        })
    }

    /// Wrap an existing `reqwest::Client` against an alternate base URL
    /// (caller manages auth headers). Used by tests.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let endpoint = Url::parse(base_url)?.join("health/dutyPharmacy")?;
        Ok(Self {
            http,
            endpoint,
            timeout_secs: crate::transport::DEFAULT_TIMEOUT.as_secs(),
        })
    }

    // ── Fetch ────────────────────────────────────────────────────────

    /// Fetch the duty-pharmacy list for a city and optional district.
    ///
    /// `None` district queries the whole city (`ilce=`). An empty `result`
    /// list is a valid outcome — "no duty pharmacy right now" — and is the
    /// caller's to interpret, not an error.
    pub async fn fetch(&self, city: &str, district: Option<&str>) -> Result<Vec<Pharmacy>, Error> {
        let url = self.endpoint.clone();
        debug!(%city, district = district.unwrap_or(""), "GET {url}");

        let resp = self
            .http
            .get(url)
            .query(&[("il", city), ("ilce", district.unwrap_or(""))])
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::InvalidAuth);
        }

        let body = resp.text().await.map_err(|e| self.map_transport(e))?;

        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: PharmacyResponse =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body,
            })?;

        Ok(parsed.result)
    }

    /// Distinguish the bounded-wait expiry from other transport failures.
    fn map_transport(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(e)
        }
    }
}
