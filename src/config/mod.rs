use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    errors::{LedgerError, Result},
    utils::{ensure_dir, paths},
};

const TMP_SUFFIX: &str = "tmp";

pub const DEFAULT_PROPERTIES: [&str; 5] = ["Depto 1", "Depto 2", "Depto 3", "Depto 4", "Casa"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rental units, in display order.
    pub properties: Vec<String>,
    pub currency_symbol: String,
    /// Selectable years are `current - year_window ..= current + year_window`.
    pub year_window: i32,
    pub backup_retention: usize,
    pub ui_color_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            properties: DEFAULT_PROPERTIES.iter().map(|p| p.to_string()).collect(),
            currency_symbol: "$".into(),
            year_window: 2,
            backup_retention: 5,
            ui_color_enabled: true,
            data_dir: None,
        }
    }
}

impl Config {
    /// Exact or case-insensitive match against the configured properties.
    pub fn find_property(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        self.properties
            .iter()
            .find(|p| p.as_str() == name)
            .or_else(|| self.properties.iter().find(|p| p.eq_ignore_ascii_case(name)))
            .map(String::as_str)
    }

    pub fn format_amount(&self, amount: f64) -> String {
        format!("{}{:.2}", self.currency_symbol, amount)
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(paths::app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base).map_err(config_error)?;
        let path = paths::config_file_in(&base);
        Ok(Self { base, path })
    }

    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path).map_err(|err| config_error(err.into()))?;
        serde_json::from_str(&data).map_err(|err| {
            LedgerError::Config(format!("{}: {}", self.path.display(), err))
        })
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent).map_err(config_error)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json).map_err(config_error)?;
        fs::rename(&tmp, &self.path).map_err(|err| config_error(err.into()))?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory the data store lives under: `data_dir` when configured,
    /// the base directory otherwise.
    pub fn data_dir(&self, config: &Config) -> PathBuf {
        config.data_dir.clone().unwrap_or_else(|| self.base.clone())
    }
}

fn config_error(err: LedgerError) -> LedgerError {
    match err {
        LedgerError::Storage(message) => LedgerError::Config(message),
        other => other,
    }
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
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
