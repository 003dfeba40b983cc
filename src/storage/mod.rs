//! Key-value persistence for the ledgers.

pub mod json_backend;
pub mod memory;
pub mod migration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::errors::Result;

pub use json_backend::JsonStore;
pub use memory::MemoryStore;
pub use migration::{migrate_year_keys, MigrationReport};

/// Key holding the whole reservation ledger.
pub const RESERVATIONS_KEY: &str = "calendarData";
/// Key holding the whole expense ledger.
pub const EXPENSES_KEY: &str = "gastosMensuales";
/// Set once legacy keys have been rewritten with a year suffix.
pub const MIGRATION_MARKER_KEY: &str = "yearKeysMigrated";

/// A string-valued store addressed by key.
pub trait KeyValueStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.read(key)?.is_some())
    }
}

/// Typed JSON helpers over any [`KeyValueStore`].
pub trait KeyValueStoreExt: KeyValueStore {
    /// Value stored under `key`, or `default` when it is absent, unreadable,
    /// or does not deserialize.
    fn load_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.read(key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(err) => {
                    warn!(key, error = %err, "stored value does not parse, using default");
                    default
                }
            },
            Ok(None) => default,
            Err(err) => {
                warn!(key, error = %err, "store read failed, using default");
                default
            }
        }
    }

    fn save_value<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        self.write(key, &json)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        (**self).write(key, value)
    }
}
