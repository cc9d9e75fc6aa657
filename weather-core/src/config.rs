use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{model::UnitPreference, source::SourceFormat, summarize::DEFAULT_MAX_DAYS};

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// units = "imperial"
/// forecast_days = 3
/// default_format = "openweather"
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Display unit system, "metric" or "imperial". Metric when absent.
    pub units: Option<String>,

    /// Number of forecast days to show, 1 to 5.
    pub forecast_days: Option<usize>,

    /// Input document format, e.g. "openweather" or "samples".
    pub default_format: Option<String>,
}

impl Config {
    /// Return the unit preference as a strongly-typed value.
    pub fn unit_preference(&self) -> Result<UnitPreference> {
        match self.units.as_deref() {
            None => Ok(UnitPreference::default()),
            Some(s) => UnitPreference::try_from(s).map_err(|e| {
                e.context("Invalid `units` in config.\nHint: run `weather configure` to fix it.")
            }),
        }
    }

    pub fn set_unit_preference(&mut self, unit: UnitPreference) {
        self.units = Some(unit.as_str().to_string());
    }

    /// Forecast length, clamped to what a 5-day feed can fill.
    pub fn max_days(&self) -> usize {
        self.forecast_days.unwrap_or(DEFAULT_MAX_DAYS).clamp(1, DEFAULT_MAX_DAYS)
    }

    pub fn set_forecast_days(&mut self, days: usize) {
        self.forecast_days = Some(days.clamp(1, DEFAULT_MAX_DAYS));
    }

    pub fn source_format(&self) -> Result<SourceFormat> {
        match self.default_format.as_deref() {
            None => Ok(SourceFormat::OpenWeather),
            Some(s) => SourceFormat::try_from(s).map_err(|e| {
                e.context(
                    "Invalid `default_format` in config.\nHint: run `weather configure` to fix it.",
                )
            }),
        }
    }

    pub fn set_source_format(&mut self, format: SourceFormat) {
        self.default_format = Some(format.as_str().to_string());
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
