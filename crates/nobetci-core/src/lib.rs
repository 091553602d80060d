// nobetci-core: Domain layer between nobetci-api and consumers (CLI).

pub mod config;
pub mod coordinator;
pub mod error;
pub mod flow;
pub mod reference;
pub mod sensor;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DEFAULT_REFRESH_HOUR, EntryConfig, INTEGRATION_NAME};
pub use coordinator::{Coordinator, PollState};
pub use error::CoreError;
pub use flow::{FlowError, OptionsFlow, SetupFlow, SetupStep};
pub use reference::CityTable;
pub use sensor::{DeviceInfo, PharmacySensor, Sensor, SensorKind, build_sensors};

// Re-export the wire record at the crate root for ergonomics.
pub use nobetci_api::Pharmacy;
