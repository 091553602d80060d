// ── Static reference data ──
//
// City → district table parsed from the bundled `il-ilce.json` dataset.
// Loaded once per process into an arc-swap slot; `reload()` swaps in a
// fresh parse on explicit request only.

use std::path::Path;
use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::warn;

/// Dataset shipped with the crate: a list of `{il_adi, ilceler}` records.
const BUNDLED_DATASET: &str = include_str!("../data/il-ilce.json");

#[derive(Debug, Deserialize)]
struct ProvinceRecord {
    il_adi: String,
    #[serde(default)]
    ilceler: Vec<DistrictRecord>,
}

#[derive(Debug, Deserialize)]
struct DistrictRecord {
    ilce_adi: String,
}

/// Immutable mapping from city name to its ordered district list.
///
/// An empty table is a valid (if useless) state: the setup flow offers no
/// city choices and is effectively blocked, but nothing errors.
#[derive(Debug, Default)]
pub struct CityTable {
    cities: IndexMap<String, Vec<String>>,
}

impl CityTable {
    /// Parse a table from raw JSON. Malformed data yields an empty table,
    /// logged as a warning.
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<Vec<ProvinceRecord>>(raw) {
            Ok(provinces) => {
                let cities = provinces
                    .into_iter()
                    .map(|p| {
                        let districts = p.ilceler.into_iter().map(|d| d.ilce_adi).collect();
                        (p.il_adi, districts)
                    })
                    .collect();
                Self { cities }
            }
            Err(e) => {
                warn!(error = %e, "city dataset failed to parse; table is empty");
                Self::default()
            }
        }
    }

    /// Load a table from an external dataset file in the same shape.
    /// A missing or unreadable file yields an empty table.
    pub fn load_from_path(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::parse(&raw),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "city dataset not readable; table is empty");
                Self::default()
            }
        }
    }

    fn bundled() -> Self {
        Self::parse(BUNDLED_DATASET)
    }

    // ── Lookups ──────────────────────────────────────────────────────

    /// City names in dataset order.
    pub fn cities(&self) -> impl Iterator<Item = &str> {
        self.cities.keys().map(String::as_str)
    }

    /// Districts of one city, in dataset order.
    pub fn districts(&self, city: &str) -> Option<&[String]> {
        self.cities.get(city).map(Vec::as_slice)
    }

    pub fn contains_city(&self, city: &str) -> bool {
        self.cities.contains_key(city)
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    // ── Process-wide cache ───────────────────────────────────────────

    /// Shared table, parsed from the bundled dataset on first use.
    pub fn global() -> Arc<CityTable> {
        slot().load_full()
    }

    /// Swap the shared table for a fresh parse of the bundled dataset.
    pub fn reload() {
        slot().store(Arc::new(Self::bundled()));
    }

    /// Replace the shared table with an explicit one (external dataset).
    pub fn install(table: CityTable) {
        slot().store(Arc::new(table));
    }
}

fn slot() -> &'static ArcSwap<CityTable> {
    static SLOT: OnceLock<ArcSwap<CityTable>> = OnceLock::new();
    SLOT.get_or_init(|| ArcSwap::from_pointee(CityTable::bundled()))
}
