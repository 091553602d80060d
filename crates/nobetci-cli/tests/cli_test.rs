//! Integration tests for the `nobetci` binary.
//!
//! These tests validate argument parsing, help output, the entry store
//! commands, and the reference-table commands — all without requiring a
//! live CollectAPI key.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `nobetci` binary with env isolation.
///
/// Points the config directory at a caller-supplied temp dir so tests
/// never touch the user's real entries.
fn nobetci_cmd(config_dir: &std::path::Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("nobetci");
    cmd.env("HOME", config_dir)
        .env("NOBETCI_CONFIG_DIR", config_dir)
        .env_remove("NOBETCI_API_KEY")
        .env_remove("NOBETCI_CITIES_FILE");
    cmd
}

fn write_entries(dir: &std::path::Path, body: &str) {
    std::fs::write(dir.join("entries.toml"), body).unwrap();
}

const TWO_ENTRIES: &str = r#"
[[entries]]
api_key = "key"
city = "Adana"
district = "Seyhan"
refresh_hour = 8

[[entries]]
api_key = "key"
city = "Ankara"
refresh_hour = 9
"#;

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let dir = tempfile::tempdir().unwrap();
    let output = nobetci_cmd(dir.path()).output().unwrap();

    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = String::from_utf8_lossy(&output.stderr);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let dir = tempfile::tempdir().unwrap();
    nobetci_cmd(dir.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("setup")
            .and(predicate::str::contains("entries"))
            .and(predicate::str::contains("watch"))
            .and(predicate::str::contains("cities")),
    );
}

#[test]
fn test_version_flag() {
    let dir = tempfile::tempdir().unwrap();
    nobetci_cmd(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("nobetci"));
}

// ── Reference table ─────────────────────────────────────────────────

#[test]
fn test_cities_lists_bundled_provinces() {
    let dir = tempfile::tempdir().unwrap();
    nobetci_cmd(dir.path()).arg("cities").assert().success().stdout(
        predicate::str::contains("İstanbul").and(predicate::str::contains("Adana")),
    );
}

#[test]
fn test_cities_districts_of_one_city() {
    let dir = tempfile::tempdir().unwrap();
    nobetci_cmd(dir.path())
        .args(["cities", "--districts", "İstanbul"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Kadıköy"));
}

#[test]
fn test_cities_unknown_city_fails_usage() {
    let dir = tempfile::tempdir().unwrap();
    nobetci_cmd(dir.path())
        .args(["cities", "--districts", "Atlantis"])
        .assert()
        .code(2);
}

#[test]
fn test_cities_file_overrides_bundled_table() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = dir.path().join("custom.json");
    std::fs::write(
        &dataset,
        r#"[{"il_adi": "Testprovince", "ilceler": [{"ilce_adi": "Testdistrict"}]}]"#,
    )
    .unwrap();

    nobetci_cmd(dir.path())
        .arg("--cities-file")
        .arg(&dataset)
        .arg("cities")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Testprovince")
                .and(predicate::str::contains("İstanbul").not()),
        );
}

// ── Entry store ─────────────────────────────────────────────────────

#[test]
fn test_entries_list_empty() {
    let dir = tempfile::tempdir().unwrap();
    nobetci_cmd(dir.path())
        .args(["entries", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No entries configured"));
}

#[test]
fn test_entries_list_renders_stored_entries() {
    let dir = tempfile::tempdir().unwrap();
    write_entries(dir.path(), TWO_ENTRIES);

    nobetci_cmd(dir.path())
        .args(["entries", "list"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Adana_Seyhan")
                .and(predicate::str::contains("Ankara_all"))
                .and(predicate::str::contains("Tümü"))
                .and(predicate::str::contains("08:00")),
        );
}

#[test]
fn test_entries_remove_persists() {
    let dir = tempfile::tempdir().unwrap();
    write_entries(dir.path(), TWO_ENTRIES);

    nobetci_cmd(dir.path())
        .args(["entries", "remove", "Adana_Seyhan"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed Adana_Seyhan"));

    let saved = std::fs::read_to_string(dir.path().join("entries.toml")).unwrap();
    assert!(!saved.contains("Seyhan"));
    assert!(saved.contains("Ankara"));
}

#[test]
fn test_entries_remove_unknown_fails_not_found() {
    let dir = tempfile::tempdir().unwrap();
    nobetci_cmd(dir.path())
        .args(["entries", "remove", "Nowhere_all"])
        .assert()
        .code(4);
}

// ── Options flow ────────────────────────────────────────────────────

#[test]
fn test_options_updates_only_the_refresh_hour() {
    let dir = tempfile::tempdir().unwrap();
    write_entries(dir.path(), TWO_ENTRIES);

    nobetci_cmd(dir.path())
        .args(["options", "Adana_Seyhan", "--hour", "14:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("14:00"));

    let saved = std::fs::read_to_string(dir.path().join("entries.toml")).unwrap();
    assert!(saved.contains("refresh_hour = 14"));
    // Everything else is untouched.
    assert!(saved.contains("city = \"Adana\""));
    assert!(saved.contains("district = \"Seyhan\""));
    assert!(saved.contains("api_key = \"key\""));
    assert!(saved.contains("refresh_hour = 9"));
}

#[test]
fn test_options_rejects_values_outside_the_choice_set() {
    let dir = tempfile::tempdir().unwrap();
    write_entries(dir.path(), TWO_ENTRIES);

    nobetci_cmd(dir.path())
        .args(["options", "Adana_Seyhan", "--hour", "14:30"])
        .assert()
        .code(2);
}

#[test]
fn test_options_unknown_entry_fails_not_found() {
    let dir = tempfile::tempdir().unwrap();
    nobetci_cmd(dir.path())
        .args(["options", "Nowhere_all", "--hour", "09:00"])
        .assert()
        .code(4);
}

// ── Watch ───────────────────────────────────────────────────────────

#[test]
fn test_watch_without_entries_fails_not_found() {
    let dir = tempfile::tempdir().unwrap();
    nobetci_cmd(dir.path())
        .args(["watch", "--once"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("No entries configured"));
}
