// ── Runtime entry configuration ──
//
// Describes one monitored (city, district) target. Built by the setup
// flow or the CLI's persisted store and handed to a Coordinator --
// core never reads config files.

use std::time::Duration;

use secrecy::SecretString;

/// Display name shared by entry titles.
pub const INTEGRATION_NAME: &str = "Nöbetçi Eczane";

/// Default daily refresh hour offered by the setup and options flows.
pub const DEFAULT_REFRESH_HOUR: u8 = 8;

/// Fixed polling cadence. `refresh_hour` is collected and persisted, but
/// scheduling runs on this interval, not on the hour of day.
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// District label shown when an entry covers the whole city.
pub const ALL_DISTRICTS_LABEL: &str = "Tümü";

/// Configuration for one monitored (city, district) target.
#[derive(Debug, Clone)]
pub struct EntryConfig {
    /// CollectAPI key. Immutable after creation — changing it means
    /// re-running setup.
    pub api_key: SecretString,
    /// City name as it appears in the reference table.
    pub city: String,
    /// `None` means "all districts of the city".
    pub district: Option<String>,
    /// Daily refresh hour (0–23). Stored and editable, not a trigger.
    pub refresh_hour: u8,
    /// Polling cadence for the coordinator loop.
    pub update_interval: Duration,
}

impl EntryConfig {
    pub fn new(
        api_key: SecretString,
        city: impl Into<String>,
        district: Option<String>,
        refresh_hour: u8,
    ) -> Self {
        Self {
            api_key,
            city: city.into(),
            district,
            refresh_hour,
            update_interval: DEFAULT_UPDATE_INTERVAL,
        }
    }

    /// Unique identity of the entry: `"<city>_<district-or-all>"`.
    ///
    /// Two entries may never share this id, regardless of their api keys.
    pub fn unique_id(&self) -> String {
        format!("{}_{}", self.city, self.district.as_deref().unwrap_or("all"))
    }

    /// District name for display, `"Tümü"` when the entry covers the city.
    pub fn district_label(&self) -> &str {
        self.district.as_deref().unwrap_or(ALL_DISTRICTS_LABEL)
    }

    /// Entry title: `"Nöbetçi Eczane - <city>/<district>"`.
    pub fn title(&self) -> String {
        format!(
            "{INTEGRATION_NAME} - {}/{}",
            self.city,
            self.district_label()
        )
    }
}

// ── Refresh-hour choice set ──────────────────────────────────────────

/// Format an hour as its closed-choice `"HH:00"` form.
pub fn format_hour(hour: u8) -> String {
    format!("{hour:02}:00")
}

/// All 24 `"HH:00"` choices, in order.
pub fn hour_choices() -> Vec<String> {
    (0..24).map(format_hour).collect()
}

/// Parse a `"HH:00"` choice back to its hour. Anything outside the
/// closed set yields `None`.
pub fn parse_hour(choice: &str) -> Option<u8> {
    let (hour, minutes) = choice.split_once(':')?;
    if minutes != "00" {
        return None;
    }
    let hour: u8 = hour.parse().ok()?;
    (hour < 24).then_some(hour)
}
