mod common;

use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

use booking_core::config::{Config, ConfigManager};
use booking_core::core::BookingManager;
use booking_core::errors::LedgerError;
use booking_core::ledger::StayRange;
use booking_core::storage::{
    migrate_year_keys, JsonStore, KeyValueStore, KeyValueStoreExt, EXPENSES_KEY,
    MIGRATION_MARKER_KEY, RESERVATIONS_KEY,
};
use serde_json::{json, Value};

use common::{julio, setup_test_env};

fn stored_json(store: &JsonStore, key: &str) -> Value {
    let raw = store.read(key).expect("read").expect("value present");
    serde_json::from_str(&raw).expect("valid json")
}

#[test]
fn mutations_are_written_in_the_persisted_shape() {
    let (mut manager, _config, store) = setup_test_env();
    manager
        .create_booking(&julio("Depto 1", 5, 6), "Ana", Some(250.0))
        .expect("create");
    manager.set_expense("Julio", 2025, "Luz", 80.0).expect("set expense");

    let reservations = stored_json(&store, RESERVATIONS_KEY);
    let day = &reservations["Depto 1_Julio_2025"]["5"];
    assert_eq!(day["cliente"], "Ana");
    assert_eq!(day["total"], json!(250.0));
    assert!(day["color"].is_string());

    let expenses = stored_json(&store, EXPENSES_KEY);
    assert_eq!(expenses["Julio_2025"]["Luz"], json!(80.0));
}

#[test]
fn reopened_manager_sees_previous_session() {
    let (mut manager, _config, store) = setup_test_env();
    manager
        .create_booking(&julio("Casa", 1, 7), "Beto", Some(700.0))
        .expect("create");
    drop(manager);

    let reopened = BookingManager::new(Box::new(store));
    let grouped = reopened.group_by_client("Julio", 2025);
    assert_eq!(grouped["Beto"].days.len(), 7);
    assert_eq!(grouped["Beto"].total, 700.0);
}

#[test]
fn backups_are_taken_before_overwrites_and_pruned() {
    let temp = TempDir::new().expect("temp dir");
    let store = JsonStore::new(Some(temp.path().to_path_buf()), Some(2)).expect("store");
    for round in 0..5 {
        store
            .write(RESERVATIONS_KEY, &format!("{{\"round\": {round}}}"))
            .expect("write");
    }

    temp.child("store/calendarData.json")
        .assert(predicate::str::contains("\"round\": 4"));
    let backups = store.list_backups(RESERVATIONS_KEY).expect("list");
    assert_eq!(backups.len(), 2);
    for name in &backups {
        temp.child(format!("backups/calendarData/{name}"))
            .assert(predicate::path::exists());
    }
}

#[test]
fn unstorable_years_are_rejected_before_anything_is_written() {
    let (mut manager, _config, store) = setup_test_env();
    let err = manager
        .create_booking(&StayRange::new("Casa", "Julio", 999, 1, 3), "Ana", None)
        .expect_err("three-digit year");
    assert!(matches!(err, LedgerError::Validation(_)));
    assert!(manager.set_expense("Julio", 10000, "Gas", 5.0).is_err());
    assert!(!store.contains(RESERVATIONS_KEY).expect("contains"));
    assert!(!store.contains(EXPENSES_KEY).expect("contains"));

    manager
        .create_booking(&StayRange::new("Casa", "Julio", 9999, 1, 3), "Ana", None)
        .expect("last storable year");
    let reopened = BookingManager::new(Box::new(store));
    assert_eq!(reopened.day_ledger("Casa", "Julio", 9999).len(), 3);
    assert_eq!(reopened.reservations().legacy_keys().count(), 0);
}

#[test]
fn restoring_a_backup_then_reloading_brings_back_old_state() {
    let (mut manager, _config, store) = setup_test_env();
    manager
        .create_booking(&julio("Depto 2", 1, 2), "Ana", None)
        .expect("first");
    manager
        .create_booking(&julio("Depto 2", 10, 12), "Beto", None)
        .expect("second");

    let backups = store.list_backups(RESERVATIONS_KEY).expect("list");
    let newest = backups.first().expect("one backup after second write");
    store
        .restore_backup(RESERVATIONS_KEY, newest)
        .expect("restore");
    manager.reload();

    let grouped = manager.group_by_client("Julio", 2025);
    assert!(grouped.contains_key("Ana"));
    assert!(!grouped.contains_key("Beto"));
}

#[test]
fn restoring_unknown_backup_is_a_storage_error() {
    let (_manager, _config, store) = setup_test_env();
    let err = store
        .restore_backup(RESERVATIONS_KEY, "calendarData_20200101_000000.json")
        .expect_err("missing backup");
    assert!(err.to_string().contains("not found"));
}

#[test]
fn corrupt_store_falls_back_to_empty_ledgers() {
    let (_manager, _config, store) = setup_test_env();
    store.write(RESERVATIONS_KEY, "{ not json").expect("write");
    let reopened = BookingManager::new(Box::new(store));
    assert!(reopened.reservations().iter().next().is_none());
}

#[test]
fn legacy_keys_survive_a_save() {
    let (_manager, _config, store) = setup_test_env();
    store
        .save_value(
            RESERVATIONS_KEY,
            &json!({
                "Casa_Julio": { "3": { "cliente": "Vieja", "color": "#aaa", "total": 10 } }
            }),
        )
        .expect("seed");

    let mut manager = BookingManager::new(Box::new(store.clone()));
    assert_eq!(manager.reservations().legacy_keys().count(), 1);
    assert!(manager.group_by_client("Julio", 2025).is_empty());
    manager
        .create_booking(&julio("Casa", 3, 4), "Nueva", None)
        .expect("legacy key does not conflict");

    let saved = stored_json(&store, RESERVATIONS_KEY);
    assert_eq!(saved["Casa_Julio"]["3"]["cliente"], "Vieja");
    assert_eq!(saved["Casa_Julio_2025"]["3"]["cliente"], "Nueva");
}

#[test]
fn migration_appends_year_and_runs_once() {
    let (_manager, _config, store) = setup_test_env();
    store
        .save_value(
            RESERVATIONS_KEY,
            &json!({
                "Casa_Julio": { "3": { "cliente": "Vieja", "color": "#aaa", "total": 10 } },
                "Casa_Julio_2025": { "9": { "cliente": "Ana", "color": "#bbb", "total": 5 } }
            }),
        )
        .expect("seed reservations");
    store
        .save_value(EXPENSES_KEY, &json!({ "Julio": { "Gas": 40 } }))
        .expect("seed expenses");

    let report = migrate_year_keys(&store, 2025).expect("migrate");
    assert!(!report.skipped);
    assert_eq!(report.rewritten(), 2);
    assert!(store.contains(MIGRATION_MARKER_KEY).expect("marker"));

    let manager = BookingManager::new(Box::new(store.clone()));
    let days = manager.day_ledger("Casa", "Julio", 2025);
    assert_eq!(days.get(3).map(|b| b.client.as_str()), Some("Vieja"));
    assert_eq!(days.get(9).map(|b| b.client.as_str()), Some("Ana"));
    assert_eq!(manager.expenses("Julio", 2025).get_named("Gas"), Some(40.0));

    let again = migrate_year_keys(&store, 2026).expect("second run");
    assert!(again.skipped);
}

#[test]
fn config_round_trips_through_its_file() {
    let (_manager, config_manager, _store) = setup_test_env();
    assert_eq!(config_manager.load().expect("defaults"), Config::default());

    let config = Config {
        currency_symbol: "ARS ".into(),
        backup_retention: 9,
        ..Config::default()
    };
    config_manager.save(&config).expect("save");
    assert!(config_manager.path().ends_with("config/config.json"));

    let reloaded = ConfigManager::with_base_dir(
        config_manager
            .path()
            .parent()
            .and_then(|dir| dir.parent())
            .expect("base dir")
            .to_path_buf(),
    )
    .expect("manager")
    .load()
    .expect("load");
    assert_eq!(reloaded, config);
    assert_eq!(reloaded.format_amount(12.0), "ARS 12.00");
}
