//! One-time rewrite of legacy ledger keys that predate the year suffix.
//!
//! Runs before any ledger is loaded. Keys such as `Depto 1_Julio` become
//! `Depto 1_Julio_<year>`; the marker key keeps it from running twice.

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::errors::Result;
use crate::ledger::has_year_suffix;

use super::{KeyValueStore, EXPENSES_KEY, MIGRATION_MARKER_KEY, RESERVATIONS_KEY};

/// What a migration run changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// True when the marker was already set and nothing ran.
    pub skipped: bool,
    pub reservation_keys: Vec<String>,
    pub expense_keys: Vec<String>,
}

impl MigrationReport {
    pub fn rewritten(&self) -> usize {
        self.reservation_keys.len() + self.expense_keys.len()
    }
}

pub fn migrate_year_keys(store: &dyn KeyValueStore, year: i32) -> Result<MigrationReport> {
    if store.contains(MIGRATION_MARKER_KEY)? {
        return Ok(MigrationReport {
            skipped: true,
            ..MigrationReport::default()
        });
    }

    let reservation_keys = migrate_document(store, RESERVATIONS_KEY, year)?;
    let expense_keys = migrate_document(store, EXPENSES_KEY, year)?;
    store.write(MIGRATION_MARKER_KEY, "true")?;

    let report = MigrationReport {
        skipped: false,
        reservation_keys,
        expense_keys,
    };
    info!(year, rewritten = report.rewritten(), "year-key migration complete");
    Ok(report)
}

/// Rewrites one stored object's keys; returns the original keys rewritten.
fn migrate_document(store: &dyn KeyValueStore, key: &str, year: i32) -> Result<Vec<String>> {
    let Some(raw) = store.read(key)? else {
        return Ok(Vec::new());
    };
    let Value::Object(entries) = serde_json::from_str::<Value>(&raw).unwrap_or(Value::Null) else {
        warn!(key, "stored value is not an object, skipping migration");
        return Ok(Vec::new());
    };

    let (current, legacy): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .partition(|(name, _)| has_year_suffix(name));
    if legacy.is_empty() {
        return Ok(Vec::new());
    }

    let mut migrated: Map<String, Value> = current.into_iter().collect();
    let mut rewritten = Vec::with_capacity(legacy.len());
    for (name, value) in legacy {
        let target = format!("{name}_{year}");
        match migrated.get_mut(&target) {
            Some(existing) => merge_missing(existing, value),
            None => {
                migrated.insert(target, value);
            }
        }
        rewritten.push(name);
    }

    store.write(key, &serde_json::to_string_pretty(&Value::Object(migrated))?)?;
    Ok(rewritten)
}

/// Copies entries absent from `target`; entries already there win.
fn merge_missing(target: &mut Value, source: Value) {
    if let (Value::Object(target), Value::Object(source)) = (target, source) {
        for (name, value) in source {
            target.entry(name).or_insert(value);
        }
    }
}
