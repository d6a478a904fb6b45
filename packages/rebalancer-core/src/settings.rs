//! Persisted settings: temperament sliders, hold periods and transaction costs.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Read-only key/value access to persisted settings.
///
/// Missing keys return `Ok(None)`; callers supply their own defaults.
pub trait SettingsSource {
    fn get(&self, key: &str) -> Result<Option<f64>>;
}

/// Settings persisted as TOML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default = "neutral")]
    pub risk_tolerance: f64,
    #[serde(default = "neutral")]
    pub aggression: f64,
    #[serde(default = "neutral")]
    pub patience: f64,
    /// Minimum days a position is held before it may be sold
    #[serde(default = "default_min_hold_days")]
    pub min_hold_days: u32,
    /// Days after a sale before the same security is sold again
    #[serde(default = "default_sell_cooldown_days")]
    pub sell_cooldown_days: u32,
    /// Fixed cost charged per trade
    #[serde(default = "default_transaction_cost_fixed")]
    pub transaction_cost_fixed: f64,
    /// Variable cost as a fraction of trade value (0.002 = 0.2%)
    #[serde(default = "default_transaction_cost_percent")]
    pub transaction_cost_percent: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Free-form numeric overrides
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, f64>,
}

const fn neutral() -> f64 {
    0.5
}

const fn default_min_hold_days() -> u32 {
    90
}

const fn default_sell_cooldown_days() -> u32 {
    180
}

const fn default_transaction_cost_fixed() -> f64 {
    2.0
}

const fn default_transaction_cost_percent() -> f64 {
    0.002
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            risk_tolerance: neutral(),
            aggression: neutral(),
            patience: neutral(),
            min_hold_days: default_min_hold_days(),
            sell_cooldown_days: default_sell_cooldown_days(),
            transaction_cost_fixed: default_transaction_cost_fixed(),
            transaction_cost_percent: default_transaction_cost_percent(),
            updated_at: None,
            extra: HashMap::new(),
        }
    }
}

impl SettingsSource for Settings {
    fn get(&self, key: &str) -> Result<Option<f64>> {
        let value = match key {
            "risk_tolerance" => Some(self.risk_tolerance),
            "aggression" => Some(self.aggression),
            "patience" => Some(self.patience),
            "min_hold_days" => Some(f64::from(self.min_hold_days)),
            "sell_cooldown_days" => Some(f64::from(self.sell_cooldown_days)),
            "transaction_cost_fixed" => Some(self.transaction_cost_fixed),
            "transaction_cost_percent" => Some(self.transaction_cost_percent),
            other => self.extra.get(other).copied(),
        };
        Ok(value)
    }
}

impl Settings {
    /// Set a slider or numeric setting by key.
    pub fn set(&mut self, key: &str, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::InvalidConfig(format!("{} must be finite", key)));
        }
        match key {
            "risk_tolerance" | "aggression" | "patience" => {
                if !(0.0..=1.0).contains(&value) {
                    return Err(Error::InvalidConfig(format!(
                        "{} must be between 0 and 1, got {}",
                        key, value
                    )));
                }
                match key {
                    "risk_tolerance" => self.risk_tolerance = value,
                    "aggression" => self.aggression = value,
                    _ => self.patience = value,
                }
            }
            "min_hold_days" => self.min_hold_days = days(key, value)?,
            "sell_cooldown_days" => self.sell_cooldown_days = days(key, value)?,
            "transaction_cost_fixed" => self.transaction_cost_fixed = value,
            "transaction_cost_percent" => self.transaction_cost_percent = value,
            other => {
                self.extra.insert(other.to_string(), value);
            }
        }
        Ok(())
    }
}

fn days(key: &str, value: f64) -> Result<u32> {
    if value < 0.0 || value > f64::from(u32::MAX) {
        return Err(Error::InvalidConfig(format!(
            "{} must be a non-negative day count, got {}",
            key, value
        )));
    }
    Ok(value.round() as u32)
}

/// Settings file manager.
#[derive(Debug)]
pub struct SettingsStore {
    /// Path to the settings TOML file
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// Open the store at the default path.
    ///
    /// Default path: `~/.config/rebalancer/settings.toml`
    /// Can be overridden with `REBALANCER_SETTINGS_FILE` environment variable.
    pub fn new() -> Result<Self> {
        Self::with_path(Self::default_path())
    }

    /// Open the store at a custom path. A missing file yields defaults.
    pub fn with_path(path: PathBuf) -> Result<Self> {
        let settings = Self::load_from_path(&path)?;
        Ok(Self { path, settings })
    }

    /// Create an in-memory store (no persistence).
    pub fn in_memory(settings: Settings) -> Self {
        Self {
            path: PathBuf::new(),
            settings,
        }
    }

    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var("REBALANCER_SETTINGS_FILE") {
            return PathBuf::from(path);
        }

        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("rebalancer/settings.toml"))
            .unwrap_or_else(|| PathBuf::from("settings.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_from_path(path: &Path) -> Result<Settings> {
        if !path.exists() {
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Write the current settings to disk.
    pub fn save(&mut self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        self.settings.updated_at = Some(Utc::now());
        let content = toml::to_string_pretty(&self.settings)?;
        fs::write(&self.path, content)?;
        tracing::debug!("Settings saved to {}", self.path.display());
        Ok(())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }
}

impl SettingsSource for SettingsStore {
    fn get(&self, key: &str) -> Result<Option<f64>> {
        self.settings.get(key)
    }
}
