// ── Sensor presentation ──
//
// Derives one read-only sensor per (pharmacy index × attribute kind)
// from a coordinator's snapshot. A sensor holds a coordinator clone and
// recomputes value, availability, and attributes on every read --
// nothing is cached on the sensor itself.

use chrono::Utc;
use serde::Serialize;

use nobetci_api::Pharmacy;

use crate::coordinator::Coordinator;

/// Literal shown when a record field is present but empty.
pub const NO_INFO: &str = "Bilgi yok";
/// Literal shown when the snapshot has no record at the sensor's index.
pub const NO_DATA: &str = "Veri yok";

/// The five attribute projections derived from each pharmacy record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    Name,
    Address,
    Phone,
    District,
    Location,
}

impl SensorKind {
    pub const ALL: [SensorKind; 5] = [
        SensorKind::Name,
        SensorKind::Address,
        SensorKind::Phone,
        SensorKind::District,
        SensorKind::Location,
    ];

    /// Stable key used in unique ids, matching the wire field names.
    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Address => "address",
            Self::Phone => "phone",
            Self::District => "dist",
            Self::Location => "loc",
        }
    }

    /// Fixed Turkish display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "İsim",
            Self::Address => "Adres",
            Self::Phone => "Telefon",
            Self::District => "Bölge",
            Self::Location => "Konum",
        }
    }

    /// Material Design icon name shown next to the value.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Name => "mdi:medical-bag",
            Self::Address => "mdi:map-marker",
            Self::Phone => "mdi:phone",
            Self::District => "mdi:city",
            Self::Location => "mdi:crosshairs-gps",
        }
    }

    fn raw_value(self, record: &Pharmacy) -> &str {
        match self {
            Self::Name => &record.name,
            Self::Address => &record.address,
            Self::Phone => &record.phone,
            Self::District => &record.dist,
            Self::Location => &record.loc,
        }
    }
}

/// Synthetic device grouping shared by all sensors of one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub identifier: String,
    pub name: String,
    pub manufacturer: &'static str,
    pub model: &'static str,
}

/// Extended attributes reported alongside a sensor value.
///
/// `latitude`/`longitude` appear only when the record's location string
/// parses as `"<lat>,<lon>"`; a parse failure silently omits them.
#[derive(Debug, Clone, Serialize)]
pub struct SensorAttributes {
    /// Wall-clock time of this attribute computation, RFC 3339.
    pub last_update: String,
    /// 1-based pharmacy number within the snapshot.
    pub pharmacy_number: usize,
    pub city: String,
    pub district: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub dist: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maps_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// Capability interface every exposed entity implements.
///
/// Explicit composition: implementors hold whatever state they need
/// (here, a coordinator clone) and answer these reads directly.
pub trait Sensor {
    fn unique_id(&self) -> String;
    fn name(&self) -> String;
    fn icon(&self) -> &'static str;
    fn native_value(&self) -> String;
    fn available(&self) -> bool;
    fn attributes(&self) -> Option<SensorAttributes>;
    fn device_info(&self) -> DeviceInfo;
}

/// One (pharmacy index × attribute kind) projection of a coordinator's
/// snapshot.
pub struct PharmacySensor {
    coordinator: Coordinator,
    index: usize,
    kind: SensorKind,
}

impl PharmacySensor {
    pub fn new(coordinator: Coordinator, index: usize, kind: SensorKind) -> Self {
        Self {
            coordinator,
            index,
            kind,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    fn record(&self) -> Option<Pharmacy> {
        let state = self.coordinator.state();
        state.data.as_ref()?.get(self.index).cloned()
    }
}

impl Sensor for PharmacySensor {
    fn unique_id(&self) -> String {
        format!(
            "nobetci_eczane_{}_{}_{}",
            self.coordinator.entry().unique_id(),
            self.index + 1,
            self.kind.key()
        )
    }

    fn name(&self) -> String {
        format!("{}. Eczane {}", self.index + 1, self.kind.label())
    }

    fn icon(&self) -> &'static str {
        self.kind.icon()
    }

    fn native_value(&self) -> String {
        let Some(record) = self.record() else {
            return NO_DATA.to_owned();
        };

        let raw = self.kind.raw_value(&record);
        if raw.is_empty() {
            return NO_INFO.to_owned();
        }

        match self.kind {
            SensorKind::Location => maps_search_url(raw),
            _ => raw.to_owned(),
        }
    }

    fn available(&self) -> bool {
        let state = self.coordinator.state();
        state.last_update_success
            && state
                .data
                .as_ref()
                .is_some_and(|data| data.len() > self.index)
    }

    fn attributes(&self) -> Option<SensorAttributes> {
        let record = self.record()?;
        let entry = self.coordinator.entry();

        let mut attributes = SensorAttributes {
            last_update: Utc::now().to_rfc3339(),
            pharmacy_number: self.index + 1,
            city: entry.city.clone(),
            district: entry.district_label().to_owned(),
            name: record.name.clone(),
            address: record.address.clone(),
            phone: record.phone.clone(),
            dist: record.dist.clone(),
            maps_url: None,
            latitude: None,
            longitude: None,
        };

        if !record.loc.is_empty() {
            attributes.maps_url = Some(maps_search_url(&record.loc));
            if let Some((lat, lon)) = parse_lat_lon(&record.loc) {
                attributes.latitude = Some(lat);
                attributes.longitude = Some(lon);
            }
        }

        Some(attributes)
    }

    fn device_info(&self) -> DeviceInfo {
        let entry = self.coordinator.entry();
        DeviceInfo {
            identifier: entry.unique_id(),
            name: format!(
                "Nöbetçi Eczaneler - {}/{}",
                entry.city,
                entry.district_label()
            ),
            manufacturer: "CollectAPI",
            model: "Pharmacy API",
        }
    }
}

// ── Fan-out ──────────────────────────────────────────────────────────

/// Build the sensor set for one entry: five projections per pharmacy
/// present in the snapshot right now.
///
/// The set is fixed afterwards -- a later, shorter snapshot turns
/// out-of-range sensors unavailable; a longer one does not grow the set.
pub fn build_sensors(coordinator: &Coordinator) -> Vec<PharmacySensor> {
    let count = coordinator.state().data.as_ref().map_or(0, |d| d.len());

    let mut sensors = Vec::with_capacity(count * SensorKind::ALL.len());
    for index in 0..count {
        for kind in SensorKind::ALL {
            sensors.push(PharmacySensor::new(coordinator.clone(), index, kind));
        }
    }
    sensors
}

// ── Location helpers ─────────────────────────────────────────────────

/// Render a raw `"lat,lon"` string as a Google Maps search link.
pub fn maps_search_url(loc: &str) -> String {
    format!("https://www.google.com/maps/search/?api=1&query={loc}")
}

/// Parse `"lat,lon"` into floats. Any failure yields `None`.
pub fn parse_lat_lon(loc: &str) -> Option<(f64, f64)> {
    let (lat, lon) = loc.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lon: f64 = lon.trim().parse().ok()?;
    Some((lat, lon))
}
