// ── Setup and options flows ──
//
// Guided configuration: credential entry validated against the live API,
// city and district selection from the reference table, and a post-setup
// options step for the daily refresh hour.

use std::collections::BTreeSet;
use std::sync::Arc;

use secrecy::SecretString;
use thiserror::Error;
use tracing::debug;

use nobetci_api::{API_URL, PharmacyClient, TransportConfig};

use crate::config::{self, DEFAULT_REFRESH_HOUR, EntryConfig};
use crate::reference::CityTable;

/// Fixed probe city used to validate a credential.
pub const PROBE_CITY: &str = "istanbul";

/// Errors surfaced by the flows, keyed for form re-rendering.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("the API key was rejected")]
    InvalidAuth,

    #[error("cannot reach the pharmacy API")]
    CannotConnect,

    #[error("unexpected failure during setup")]
    Unknown,

    /// Terminal: an entry with the same (city, district) already exists.
    #[error("an entry for this city/district already exists")]
    AlreadyConfigured,

    #[error("'{0}' is not one of the offered choices")]
    InvalidChoice(String),

    #[error("step submitted out of order")]
    OutOfOrder,
}

impl FlowError {
    /// Stable key the form layer renders next to the failing step.
    pub fn error_key(&self) -> &'static str {
        match self {
            Self::InvalidAuth => "invalid_auth",
            Self::CannotConnect => "cannot_connect",
            Self::Unknown => "unknown",
            Self::AlreadyConfigured => "already_configured",
            Self::InvalidChoice(_) => "invalid_choice",
            Self::OutOfOrder => "out_of_order",
        }
    }
}

fn probe_error(err: &nobetci_api::Error) -> FlowError {
    match err {
        nobetci_api::Error::InvalidAuth => FlowError::InvalidAuth,
        nobetci_api::Error::Status { .. }
        | nobetci_api::Error::Transport(_)
        | nobetci_api::Error::Timeout { .. } => FlowError::CannotConnect,
        nobetci_api::Error::InvalidUrl(_) | nobetci_api::Error::Deserialization { .. } => {
            FlowError::Unknown
        }
    }
}

/// The three wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStep {
    User,
    Location,
    District,
}

/// State machine for creating one monitored (city, district) entry.
///
/// `user` → `location` → `district`. A failed submission leaves the flow
/// on its current step; the caller re-renders the step with the error
/// key. `AlreadyConfigured` is terminal: re-running setup with the same
/// city/district never produces a duplicate.
pub struct SetupFlow {
    table: Arc<CityTable>,
    existing: BTreeSet<String>,
    transport: TransportConfig,
    endpoint: String,
    api_key: Option<SecretString>,
    city: Option<String>,
}

impl SetupFlow {
    /// Start a flow against the process-wide city table.
    ///
    /// `existing` holds the unique ids of already-configured entries.
    pub fn new(existing: BTreeSet<String>) -> Self {
        Self::with_table(CityTable::global(), existing)
    }

    /// Start a flow against an explicit table (tests, custom datasets).
    pub fn with_table(table: Arc<CityTable>, existing: BTreeSet<String>) -> Self {
        Self {
            table,
            existing,
            transport: TransportConfig::default(),
            endpoint: API_URL.to_owned(),
            api_key: None,
            city: None,
        }
    }

    /// Point the validation probe at an alternate endpoint (tests, proxies).
    pub fn endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_owned();
        self
    }

    /// The step the wizard should currently render.
    pub fn step(&self) -> SetupStep {
        if self.api_key.is_none() {
            SetupStep::User
        } else if self.city.is_none() {
            SetupStep::Location
        } else {
            SetupStep::District
        }
    }

    // ── Step `user` ──────────────────────────────────────────────────

    /// Validate an API key against the live API, then store it.
    ///
    /// The probe queries the fixed probe city; any result, including an
    /// empty one, proves the credential.
    pub async fn submit_api_key(&mut self, key: &str) -> Result<(), FlowError> {
        let secret = SecretString::from(key.to_owned());
        let client = PharmacyClient::with_endpoint(&self.endpoint, &secret, &self.transport)
            .map_err(|e| probe_error(&e))?;

        match client.fetch(PROBE_CITY, None).await {
            Ok(_) => {
                debug!("credential probe succeeded");
                self.api_key = Some(secret);
                Ok(())
            }
            Err(e) => Err(probe_error(&e)),
        }
    }

    // ── Step `location` ──────────────────────────────────────────────

    /// City choices, in dataset order. Empty when the reference table
    /// failed to load -- setup is then effectively blocked.
    pub fn city_choices(&self) -> Vec<String> {
        self.table.cities().map(str::to_owned).collect()
    }

    pub fn submit_city(&mut self, city: &str) -> Result<(), FlowError> {
        if self.step() != SetupStep::Location {
            return Err(FlowError::OutOfOrder);
        }
        if !self.table.contains_city(city) {
            return Err(FlowError::InvalidChoice(city.to_owned()));
        }
        self.city = Some(city.to_owned());
        Ok(())
    }

    // ── Step `district` ──────────────────────────────────────────────

    /// Districts of the selected city, in dataset order.
    pub fn district_choices(&self) -> Result<Vec<String>, FlowError> {
        let city = self.city.as_deref().ok_or(FlowError::OutOfOrder)?;
        Ok(self.table.districts(city).unwrap_or_default().to_vec())
    }

    /// The closed `"HH:00"` refresh-hour choice set.
    pub fn hour_choices() -> Vec<String> {
        config::hour_choices()
    }

    /// The hour choice pre-selected in the district step.
    pub fn default_hour_choice() -> String {
        config::format_hour(DEFAULT_REFRESH_HOUR)
    }

    /// Final step: derive the unique id, reject duplicates, and yield
    /// the finished entry.
    pub fn submit_district(&self, district: &str, hour: &str) -> Result<EntryConfig, FlowError> {
        if self.step() != SetupStep::District {
            return Err(FlowError::OutOfOrder);
        }
        let api_key = self.api_key.clone().ok_or(FlowError::OutOfOrder)?;
        let city = self.city.clone().ok_or(FlowError::OutOfOrder)?;

        let known = self
            .table
            .districts(&city)
            .is_some_and(|districts| districts.iter().any(|d| d == district));
        if !known {
            return Err(FlowError::InvalidChoice(district.to_owned()));
        }

        let refresh_hour =
            config::parse_hour(hour).ok_or_else(|| FlowError::InvalidChoice(hour.to_owned()))?;

        let entry = EntryConfig::new(api_key, city, Some(district.to_owned()), refresh_hour);
        if self.existing.contains(&entry.unique_id()) {
            return Err(FlowError::AlreadyConfigured);
        }
        Ok(entry)
    }
}

// ── Options flow ─────────────────────────────────────────────────────

/// Single-step options flow: only the daily refresh hour may change.
pub struct OptionsFlow {
    current_hour: u8,
}

impl OptionsFlow {
    /// Open the flow for an entry; `None` falls back to the default hour.
    pub fn new(current_hour: Option<u8>) -> Self {
        Self {
            current_hour: current_hour.unwrap_or(DEFAULT_REFRESH_HOUR),
        }
    }

    /// The choice pre-selected when the form opens.
    pub fn default_choice(&self) -> String {
        config::format_hour(self.current_hour)
    }

    /// The same closed choice set as the setup flow.
    pub fn hour_choices() -> Vec<String> {
        config::hour_choices()
    }

    /// Parse the submitted choice into the new refresh hour.
    pub fn submit(&self, choice: &str) -> Result<u8, FlowError> {
        config::parse_hour(choice).ok_or_else(|| FlowError::InvalidChoice(choice.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn table() -> Arc<CityTable> {
        Arc::new(CityTable::parse(
            r#"[{"il_adi": "Adana", "ilceler": [{"ilce_adi": "Seyhan"}, {"ilce_adi": "Ceyhan"}]}]"#,
        ))
    }

    fn flow_at_district() -> SetupFlow {
        let mut flow = SetupFlow::with_table(table(), BTreeSet::new());
        flow.api_key = Some(SecretString::from("key".to_string()));
        flow.submit_city("Adana").unwrap();
        flow
    }

    #[test]
    fn steps_advance_in_order() {
        let mut flow = SetupFlow::with_table(table(), BTreeSet::new());
        assert_eq!(flow.step(), SetupStep::User);

        flow.api_key = Some(SecretString::from("key".to_string()));
        assert_eq!(flow.step(), SetupStep::Location);

        flow.submit_city("Adana").unwrap();
        assert_eq!(flow.step(), SetupStep::District);
    }

    #[test]
    fn city_cannot_be_submitted_before_credential() {
        let mut flow = SetupFlow::with_table(table(), BTreeSet::new());
        assert!(matches!(
            flow.submit_city("Adana"),
            Err(FlowError::OutOfOrder)
        ));
    }

    #[test]
    fn unknown_city_is_rejected() {
        let mut flow = SetupFlow::with_table(table(), BTreeSet::new());
        flow.api_key = Some(SecretString::from("key".to_string()));
        assert!(matches!(
            flow.submit_city("Atlantis"),
            Err(FlowError::InvalidChoice(_))
        ));
        assert_eq!(flow.step(), SetupStep::Location);
    }

    #[test]
    fn district_step_yields_the_entry() {
        let flow = flow_at_district();
        let entry = flow.submit_district("Seyhan", "14:00").unwrap();

        assert_eq!(entry.city, "Adana");
        assert_eq!(entry.district.as_deref(), Some("Seyhan"));
        assert_eq!(entry.refresh_hour, 14);
        assert_eq!(entry.unique_id(), "Adana_Seyhan");
        assert_eq!(entry.title(), "Nöbetçi Eczane - Adana/Seyhan");
    }

    #[test]
    fn duplicate_identity_aborts_regardless_of_key() {
        let mut existing = BTreeSet::new();
        existing.insert("Adana_Seyhan".to_owned());

        let mut flow = SetupFlow::with_table(table(), existing);
        flow.api_key = Some(SecretString::from("a different key".to_string()));
        flow.submit_city("Adana").unwrap();

        let result = flow.submit_district("Seyhan", "08:00");
        assert!(matches!(result, Err(FlowError::AlreadyConfigured)));
        assert_eq!(
            result.unwrap_err().error_key(),
            "already_configured"
        );
    }

    #[test]
    fn unknown_district_and_bad_hour_are_rejected() {
        let flow = flow_at_district();
        assert!(matches!(
            flow.submit_district("Atlantis", "08:00"),
            Err(FlowError::InvalidChoice(_))
        ));
        assert!(matches!(
            flow.submit_district("Seyhan", "25:00"),
            Err(FlowError::InvalidChoice(_))
        ));
    }

    #[test]
    fn district_choices_follow_the_selected_city() {
        let flow = flow_at_district();
        assert_eq!(flow.district_choices().unwrap(), ["Seyhan", "Ceyhan"]);
    }

    #[test]
    fn options_flow_defaults_and_round_trips() {
        let options = OptionsFlow::new(Some(14));
        assert_eq!(options.default_choice(), "14:00");
        assert_eq!(options.submit("09:00").unwrap(), 9);

        let fallback = OptionsFlow::new(None);
        assert_eq!(fallback.default_choice(), "08:00");
        assert!(matches!(
            fallback.submit("not an hour"),
            Err(FlowError::InvalidChoice(_))
        ));
    }
}
