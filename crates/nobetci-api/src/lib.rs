// nobetci-api: Async Rust client for the CollectAPI duty-pharmacy endpoint.

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::{API_URL, PharmacyClient};
pub use error::Error;
pub use transport::TransportConfig;
pub use types::Pharmacy;
