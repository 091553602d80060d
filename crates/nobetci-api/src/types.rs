//! Wire types for the duty-pharmacy endpoint.
//!
//! The API responds with `{"success": bool, "result": [...]}`; only the
//! `result` list is consumed. Records are lenient — a missing field decodes
//! as an empty string rather than failing the whole snapshot.

use serde::{Deserialize, Serialize};

/// One on-duty pharmacy record from the `result` list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pharmacy {
    /// Pharmacy name.
    pub name: String,
    /// District label as reported by the API.
    pub dist: String,
    /// Street address.
    pub address: String,
    /// Contact phone number.
    pub phone: String,
    /// Raw `"latitude,longitude"` string.
    pub loc: String,
}

/// Response envelope for `GET /health/dutyPharmacy`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct PharmacyResponse {
    pub result: Vec<Pharmacy>,
}
