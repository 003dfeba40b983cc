use chrono::{DateTime, Local, NaiveDateTime};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::{
    errors::{LedgerError, Result},
    utils::{ensure_dir, paths},
};

use super::KeyValueStore;

const FILE_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
pub const DEFAULT_RETENTION: usize = 5;

/// File-backed store: one JSON document per key, with rolling backups of
/// the previous contents taken before every overwrite.
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
    store_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStore {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let root = root.unwrap_or_else(paths::app_data_dir);
        let store_dir = paths::store_dir_in(&root);
        let backups_dir = paths::backups_dir_in(&root);
        ensure_dir(&store_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            root,
            store_dir,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn key_path(&self, key: &str) -> PathBuf {
        self.store_dir
            .join(format!("{}.{}", canonical_name(key), FILE_EXTENSION))
    }

    fn backup_dir(&self, key: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(key))
    }

    pub fn backup_path(&self, key: &str, backup_name: &str) -> PathBuf {
        self.backup_dir(key).join(backup_name)
    }

    /// Backup file names for `key`, newest first.
    pub fn list_backups(&self, key: &str) -> Result<Vec<String>> {
        let dir = self.backup_dir(key);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(name.to_string());
            }
        }
        entries.sort_by(|a, b| {
            parse_backup_stamp(b)
                .cmp(&parse_backup_stamp(a))
                .then_with(|| b.cmp(a))
        });
        Ok(entries)
    }

    /// Replaces the current value of `key` with a backup and returns it.
    /// The value being replaced is itself backed up first.
    pub fn restore_backup(&self, key: &str, backup_name: &str) -> Result<String> {
        let backup_path = self.backup_path(key, backup_name);
        if !backup_path.exists() {
            return Err(LedgerError::Storage(format!(
                "backup `{}` not found",
                backup_name
            )));
        }
        let data = fs::read_to_string(&backup_path)?;
        self.write(key, &data)?;
        info!(key, backup = backup_name, "restored backup");
        Ok(data)
    }

    fn backup_existing_file(&self, key: &str, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(key);
        ensure_dir(&dir)?;
        let timestamp = Local::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let backup_path = dir.join(self.next_backup_name(key, &timestamp)?);
        fs::copy(path, &backup_path)?;
        debug!(key, backup = %backup_path.display(), "backed up previous value");
        self.prune_backups(key)
    }

    /// `<key>_<ts>.json` for the first backup in a second, then
    /// `<key>_<ts>_<n>.json` with `n` one past the highest counter still on disk.
    fn next_backup_name(&self, key: &str, timestamp: &str) -> Result<String> {
        let name = canonical_name(key);
        let prefix = format!("{}_{}", name, timestamp);
        let latest = self
            .list_backups(key)?
            .iter()
            .filter(|entry| entry.starts_with(&prefix))
            .filter_map(|entry| parse_backup_stamp(entry).map(|(_, counter)| counter))
            .max();
        Ok(match latest {
            None => format!("{}.{}", prefix, FILE_EXTENSION),
            Some(counter) => format!("{}_{}.{}", prefix, counter + 1, FILE_EXTENSION),
        })
    }

    fn prune_backups(&self, key: &str) -> Result<()> {
        let backups = self.list_backups(key)?;
        for entry in backups.iter().skip(self.retention) {
            let _ = fs::remove_file(self.backup_path(key, entry));
        }
        Ok(())
    }
}

impl KeyValueStore for JsonStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key);
        self.backup_existing_file(key, &path)?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.key_path(key).exists())
    }
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "value".into()
    } else {
        sanitized
    }
}

/// Timestamp and counter embedded in `<key>_<YYYYmmdd>_<HHMMSS>[_n].json`.
/// Names without a counter carry 0.
fn parse_backup_stamp(name: &str) -> Option<(NaiveDateTime, u32)> {
    let stem = name.strip_suffix(&format!(".{}", FILE_EXTENSION))?;
    let parts: Vec<&str> = stem.split('_').collect();
    let position = parts
        .windows(2)
        .rposition(|pair| is_digits(pair[0], 8) && is_digits(pair[1], 6))?;
    let raw = format!("{}{}", parts[position], parts[position + 1]);
    let timestamp = NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M%S").ok()?;
    let counter = match parts.get(position + 2) {
        Some(suffix) => suffix.parse().ok()?,
        None => 0,
    };
    Some((timestamp, counter))
}

fn parse_backup_timestamp(name: &str) -> Option<NaiveDateTime> {
    parse_backup_stamp(name).map(|(timestamp, _)| timestamp)
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

/// Local timestamp of a backup, for display.
pub fn backup_timestamp(name: &str) -> Option<DateTime<Local>> {
    parse_backup_timestamp(name).and_then(|naive| naive.and_local_timezone(Local).single())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
