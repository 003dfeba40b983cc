use chrono::{Datelike, Local};
use dialoguer::theme::ColorfulTheme;
use tracing::info;

use crate::{
    calendar::{year_range, Month},
    config::{Config, ConfigManager},
    core::BookingManager,
    storage::{migrate_year_keys, JsonStore},
    utils::paths,
};

use super::commands;
use super::core::CliError;
use super::io as cli_io;
use super::output::{self, OutputPreferences};
use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Month, year and property the commands act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub month: Month,
    pub year: i32,
    pub property: String,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub manager: BookingManager,
    /// Same files the manager writes; used for backup listing and restore.
    pub store: JsonStore,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub theme: ColorfulTheme,
    pub selection: Selection,
    pub current_year: i32,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(paths::app_data_dir())?;
        let config = config_manager.load()?;
        output::set_preferences(OutputPreferences {
            color_enabled: config.ui_color_enabled,
        });

        let store = JsonStore::new(
            Some(config_manager.data_dir(&config)),
            Some(config.backup_retention),
        )?;
        let today = Local::now().date_naive();
        let report = migrate_year_keys(&store, today.year())?;
        if report.rewritten() > 0 {
            cli_io::print_info(format!(
                "Migrated {} stored keys to year {}.",
                report.rewritten(),
                today.year()
            ));
        }

        let manager =
            BookingManager::new(Box::new(store.clone())).with_properties(config.properties.clone());
        let property = config
            .properties
            .first()
            .cloned()
            .unwrap_or_else(|| "Depto 1".to_string());
        let selection = Selection {
            month: Month::from_number(today.month()).unwrap_or(Month::Enero),
            year: today.year(),
            property,
        };
        info!(base = %store.base_dir().display(), ?mode, "shell started");

        Ok(Self {
            mode,
            registry: commands::registry(),
            manager,
            store,
            config_manager,
            config,
            theme: ColorfulTheme::default(),
            selection,
            current_year: today.year(),
            last_command: None,
            running: true,
        })
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn prompt(&self) -> String {
        format!(
            "booking [{} {} | {}]> ",
            self.selection.month, self.selection.year, self.selection.property
        )
    }

    pub fn selectable_years(&self) -> std::ops::RangeInclusive<i32> {
        year_range(self.current_year, self.config.year_window)
    }

    pub fn month_name(&self) -> &'static str {
        self.selection.month.name()
    }
}
