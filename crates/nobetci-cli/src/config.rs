//! CLI-owned persisted entries: the TOML store behind setup/options.
//!
//! Core never sees these types -- records are translated to
//! `EntryConfig` before they cross the boundary.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use nobetci_core::{CoreError, DEFAULT_REFRESH_HOUR, EntryConfig};

use crate::error::CliError;

// ── TOML schema ──────────────────────────────────────────────────────

/// One persisted entry record: `{api_key, city, district, refresh_hour}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryRecord {
    pub api_key: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default = "default_refresh_hour")]
    pub refresh_hour: u8,
}

fn default_refresh_hour() -> u8 {
    DEFAULT_REFRESH_HOUR
}

impl EntryRecord {
    /// Mirror of [`EntryConfig::unique_id`]: `"<city>_<district-or-all>"`.
    pub fn unique_id(&self) -> String {
        format!("{}_{}", self.city, self.district.as_deref().unwrap_or("all"))
    }

    /// Translate into the core runtime config, wrapping the credential.
    pub fn to_entry(&self) -> Result<EntryConfig, CoreError> {
        if self.refresh_hour > 23 {
            return Err(CoreError::ValidationFailed {
                message: format!("refresh_hour {} is out of range 0-23", self.refresh_hour),
            });
        }
        Ok(EntryConfig::new(
            SecretString::from(self.api_key.clone()),
            self.city.clone(),
            self.district.clone(),
            self.refresh_hour,
        ))
    }

    /// Build a record from a freshly created entry.
    pub fn from_entry(entry: &EntryConfig) -> Self {
        use secrecy::ExposeSecret;
        Self {
            api_key: entry.api_key.expose_secret().to_owned(),
            city: entry.city.clone(),
            district: entry.district.clone(),
            refresh_hour: entry.refresh_hour,
        }
    }
}

/// The entries.toml document.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EntriesFile {
    #[serde(default)]
    pub entries: Vec<EntryRecord>,
}

// ── Store ────────────────────────────────────────────────────────────

/// On-disk entry store with unique-key enforcement on `(city, district)`.
pub struct EntryStore {
    path: PathBuf,
    file: EntriesFile,
}

impl EntryStore {
    /// Resolve the store path: explicit directory override, else the
    /// platform config dir.
    pub fn path_for(dir: Option<&Path>) -> PathBuf {
        match dir {
            Some(dir) => dir.join("entries.toml"),
            None => ProjectDirs::from("com", "nobetci", "nobetci").map_or_else(
                || dirs_fallback().join("entries.toml"),
                |dirs| dirs.config_dir().join("entries.toml"),
            ),
        }
    }

    /// Load the store; a missing file starts empty.
    pub fn load(dir: Option<&Path>) -> Result<Self, CliError> {
        let path = Self::path_for(dir);

        let figment = Figment::new()
            .merge(Serialized::defaults(EntriesFile::default()))
            .merge(Toml::file(&path));
        let file: EntriesFile = figment.extract()?;

        Ok(Self { path, file })
    }

    pub fn entries(&self) -> &[EntryRecord] {
        &self.file.entries
    }

    /// Unique ids of every stored entry.
    pub fn unique_ids(&self) -> BTreeSet<String> {
        self.file
            .entries
            .iter()
            .map(EntryRecord::unique_id)
            .collect()
    }

    pub fn get(&self, unique_id: &str) -> Option<&EntryRecord> {
        self.file.entries.iter().find(|e| e.unique_id() == unique_id)
    }

    /// Add a record. A second record for the same (city, district) is
    /// rejected regardless of its api key.
    pub fn add(&mut self, record: EntryRecord) -> Result<(), CliError> {
        let unique_id = record.unique_id();
        if self.get(&unique_id).is_some() {
            return Err(CliError::AlreadyConfigured { unique_id });
        }
        self.file.entries.push(record);
        Ok(())
    }

    pub fn remove(&mut self, unique_id: &str) -> Result<EntryRecord, CliError> {
        let position = self
            .file
            .entries
            .iter()
            .position(|e| e.unique_id() == unique_id)
            .ok_or_else(|| CliError::EntryNotFound {
                unique_id: unique_id.to_owned(),
            })?;
        Ok(self.file.entries.remove(position))
    }

    /// Update only the refresh hour of one entry; everything else is
    /// untouched.
    pub fn set_refresh_hour(&mut self, unique_id: &str, hour: u8) -> Result<(), CliError> {
        if hour > 23 {
            return Err(CliError::Validation {
                field: "refresh_hour".into(),
                reason: format!("{hour} is out of range 0-23"),
            });
        }
        let record = self
            .file
            .entries
            .iter_mut()
            .find(|e| e.unique_id() == unique_id)
            .ok_or_else(|| CliError::EntryNotFound {
                unique_id: unique_id.to_owned(),
            })?;
        record.refresh_hour = hour;
        Ok(())
    }

    /// Serialize to TOML and write to the store path.
    pub fn save(&self) -> Result<(), CliError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(&self.file).map_err(|e| CliError::Validation {
            field: "entries".into(),
            reason: format!("failed to serialize entries: {e}"),
        })?;
        std::fs::write(&self.path, toml_str)?;
        Ok(())
    }
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("nobetci");
    p
}
