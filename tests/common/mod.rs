#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use booking_core::{
    config::ConfigManager,
    core::BookingManager,
    ledger::StayRange,
    storage::{JsonStore, MemoryStore},
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the whole test binary.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dirs").push(temp);
    base
}

/// File-backed manager plus a config manager, both rooted in one temp dir.
pub fn setup_test_env() -> (BookingManager, ConfigManager, JsonStore) {
    let base = temp_base();
    let store = JsonStore::new(Some(base.clone()), Some(3)).expect("create json store");
    let manager = BookingManager::new(Box::new(store.clone()));
    let config_manager = ConfigManager::with_base_dir(base).expect("create config manager");
    (manager, config_manager, store)
}

pub fn memory_manager() -> BookingManager {
    BookingManager::new(Box::new(MemoryStore::new()))
}

pub fn julio(property: &str, start: u32, end: u32) -> StayRange {
    StayRange::new(property, "Julio", 2025, start, end)
}
