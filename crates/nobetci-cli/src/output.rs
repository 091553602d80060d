//! Output formatting: entry listings and the sensor projection.
//!
//! Tables use `tabled`; the per-entry banner carries the synthetic
//! device name so one entry's sensors read as one group.

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use nobetci_core::config::format_hour;
use nobetci_core::{Coordinator, PharmacySensor, Sensor};

use crate::config::EntryRecord;

// ── Entry listing ────────────────────────────────────────────────────

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "ID")]
    unique_id: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "District")]
    district: String,
    #[tabled(rename = "Refresh hour")]
    refresh_hour: String,
}

pub fn entries_table(records: &[EntryRecord]) -> String {
    let rows: Vec<EntryRow> = records
        .iter()
        .map(|record| EntryRow {
            unique_id: record.unique_id(),
            city: record.city.clone(),
            district: record.district.clone().unwrap_or_else(|| "Tümü".into()),
            refresh_hour: format_hour(record.refresh_hour),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

// ── Sensor projection ────────────────────────────────────────────────

#[derive(Tabled)]
struct SensorRow {
    #[tabled(rename = "Sensor")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Available")]
    available: String,
}

pub fn sensor_table(sensors: &[PharmacySensor]) -> String {
    let rows: Vec<SensorRow> = sensors
        .iter()
        .map(|sensor| SensorRow {
            name: sensor.name(),
            value: sensor.native_value(),
            available: if sensor.available() { "yes" } else { "no" }.into(),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Banner line for one entry's sensor group, using the device name.
pub fn device_banner(coordinator: &Coordinator) -> String {
    let entry = coordinator.entry();
    let state = coordinator.state();
    let status = if state.last_update_success {
        "ok".green().to_string()
    } else {
        "last update failed".red().to_string()
    };

    format!(
        "{} [{status}]",
        format!(
            "Nöbetçi Eczaneler - {}/{}",
            entry.city,
            entry.district_label()
        )
        .bold()
    )
}
