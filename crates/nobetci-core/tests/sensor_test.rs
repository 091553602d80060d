// Sensor projection tests: fan-out, values, availability, attributes.
#![allow(clippy::unwrap_used, clippy::float_cmp)]

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use nobetci_api::PharmacyClient;
use nobetci_core::sensor::{NO_DATA, NO_INFO};
use nobetci_core::{Coordinator, EntryConfig, Sensor, SensorKind, build_sensors};

// ── Helpers ─────────────────────────────────────────────────────────

fn entry(district: Option<&str>) -> EntryConfig {
    EntryConfig::new(
        SecretString::from("key".to_string()),
        "Adana",
        district.map(str::to_owned),
        8,
    )
}

async fn coordinator_with(
    district: Option<&str>,
    body: serde_json::Value,
) -> (MockServer, Coordinator) {
    let server = MockServer::start().await;
    let client = PharmacyClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    let coordinator = Coordinator::new(entry(district), client);

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    coordinator.refresh().await;
    (server, coordinator)
}

fn two_pharmacies() -> serde_json::Value {
    json!({
        "success": true,
        "result": [
            {
                "name": "A Pharmacy",
                "dist": "Seyhan",
                "address": "Somewhere 1",
                "phone": "555",
                "loc": "41.0,29.0"
            },
            {
                "name": "B Pharmacy",
                "dist": "Ceyhan",
                "address": "",
                "phone": "556",
                "loc": "not-a-location"
            }
        ]
    })
}

// ── Fan-out ─────────────────────────────────────────────────────────

#[tokio::test]
async fn five_sensors_per_pharmacy() {
    let (_server, coordinator) = coordinator_with(Some("Seyhan"), two_pharmacies()).await;
    let sensors = build_sensors(&coordinator);

    assert_eq!(sensors.len(), 10);

    // Partitioned into N groups of the five fixed kinds, in order.
    for group in sensors.chunks(5) {
        let kinds: Vec<SensorKind> = group.iter().map(|s| s.kind()).collect();
        assert_eq!(kinds.as_slice(), SensorKind::ALL.as_slice());
    }
}

#[tokio::test]
async fn empty_snapshot_fans_out_to_nothing() {
    let (_server, coordinator) =
        coordinator_with(Some("Seyhan"), json!({ "success": true, "result": [] })).await;
    assert!(build_sensors(&coordinator).is_empty());
}

// ── Identity and naming ─────────────────────────────────────────────

#[tokio::test]
async fn unique_ids_and_names_follow_the_fixed_scheme() {
    let (_server, coordinator) = coordinator_with(Some("Seyhan"), two_pharmacies()).await;
    let sensors = build_sensors(&coordinator);

    assert_eq!(sensors[0].unique_id(), "nobetci_eczane_Adana_Seyhan_1_name");
    assert_eq!(sensors[0].name(), "1. Eczane İsim");
    assert_eq!(sensors[9].unique_id(), "nobetci_eczane_Adana_Seyhan_2_loc");
    assert_eq!(sensors[9].name(), "2. Eczane Konum");
}

#[tokio::test]
async fn city_wide_entries_use_the_all_placeholder() {
    let (_server, coordinator) = coordinator_with(None, two_pharmacies()).await;
    let sensors = build_sensors(&coordinator);

    assert_eq!(sensors[0].unique_id(), "nobetci_eczane_Adana_all_1_name");

    let device = sensors[0].device_info();
    assert_eq!(device.identifier, "Adana_all");
    assert_eq!(device.name, "Nöbetçi Eczaneler - Adana/Tümü");
}

#[tokio::test]
async fn sensors_of_one_entry_share_a_device() {
    let (_server, coordinator) = coordinator_with(Some("Seyhan"), two_pharmacies()).await;
    let sensors = build_sensors(&coordinator);

    let device = sensors[0].device_info();
    assert_eq!(device.name, "Nöbetçi Eczaneler - Adana/Seyhan");
    assert_eq!(device.manufacturer, "CollectAPI");
    assert!(sensors.iter().all(|s| s.device_info() == device));
}

// ── Values ──────────────────────────────────────────────────────────

#[tokio::test]
async fn location_renders_as_maps_url() {
    let (_server, coordinator) = coordinator_with(Some("Seyhan"), two_pharmacies()).await;
    let sensors = build_sensors(&coordinator);

    let loc = sensors
        .iter()
        .find(|s| s.index() == 0 && s.kind() == SensorKind::Location)
        .unwrap();
    assert_eq!(
        loc.native_value(),
        "https://www.google.com/maps/search/?api=1&query=41.0,29.0"
    );

    let attributes = loc.attributes().unwrap();
    assert_eq!(attributes.latitude, Some(41.0));
    assert_eq!(attributes.longitude, Some(29.0));
    assert_eq!(
        attributes.maps_url.as_deref(),
        Some("https://www.google.com/maps/search/?api=1&query=41.0,29.0")
    );
}

#[tokio::test]
async fn empty_field_reads_no_info() {
    let (_server, coordinator) = coordinator_with(Some("Seyhan"), two_pharmacies()).await;
    let sensors = build_sensors(&coordinator);

    let address = sensors
        .iter()
        .find(|s| s.index() == 1 && s.kind() == SensorKind::Address)
        .unwrap();
    assert_eq!(address.native_value(), NO_INFO);
}

#[tokio::test]
async fn unparsable_location_omits_coordinates() {
    let (_server, coordinator) = coordinator_with(Some("Seyhan"), two_pharmacies()).await;
    let sensors = build_sensors(&coordinator);

    let loc = sensors
        .iter()
        .find(|s| s.index() == 1 && s.kind() == SensorKind::Location)
        .unwrap();
    let attributes = loc.attributes().unwrap();

    // The maps link is still offered; only the parsed floats are omitted.
    assert!(attributes.maps_url.is_some());
    assert_eq!(attributes.latitude, None);
    assert_eq!(attributes.longitude, None);
}

#[tokio::test]
async fn attributes_carry_the_record_and_entry_context() {
    let (_server, coordinator) = coordinator_with(Some("Seyhan"), two_pharmacies()).await;
    let sensors = build_sensors(&coordinator);

    let attributes = sensors[5].attributes().unwrap();
    assert_eq!(attributes.pharmacy_number, 2);
    assert_eq!(attributes.city, "Adana");
    assert_eq!(attributes.district, "Seyhan");
    assert_eq!(attributes.name, "B Pharmacy");
    assert_eq!(attributes.phone, "556");
}

// ── Availability ────────────────────────────────────────────────────

#[tokio::test]
async fn sensor_without_data_reads_no_data_and_is_unavailable() {
    let server = MockServer::start().await;
    let client = PharmacyClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    let coordinator = Coordinator::new(entry(Some("Seyhan")), client);

    // Never refreshed: no snapshot exists yet.
    let sensor = nobetci_core::PharmacySensor::new(coordinator, 0, SensorKind::Name);
    assert_eq!(sensor.native_value(), NO_DATA);
    assert!(!sensor.available());
    assert!(sensor.attributes().is_none());
}

#[tokio::test]
async fn shrinking_snapshot_turns_out_of_range_sensors_unavailable() {
    let (server, coordinator) = coordinator_with(Some("Seyhan"), two_pharmacies()).await;
    let sensors = build_sensors(&coordinator);
    assert!(sensors.iter().all(Sensor::available));

    server.reset().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "result": [] })),
        )
        .mount(&server)
        .await;
    coordinator.refresh().await;

    // The set itself never shrinks; every index is now out of range.
    assert_eq!(sensors.len(), 10);
    assert!(sensors.iter().all(|s| !s.available()));
    assert!(sensors.iter().all(|s| s.native_value() == NO_DATA));
}

#[tokio::test]
async fn failed_refresh_keeps_values_but_drops_availability() {
    let (server, coordinator) = coordinator_with(Some("Seyhan"), two_pharmacies()).await;
    let sensors = build_sensors(&coordinator);
    let name_before = sensors[0].native_value();

    server.reset().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    coordinator.refresh().await;

    // Snapshot and values are exactly as after the last success.
    assert_eq!(sensors[0].native_value(), name_before);
    assert_eq!(sensors[0].native_value(), "A Pharmacy");
    // Availability is the conjunction: a failed refresh drops it.
    assert!(!sensors[0].available());
}
