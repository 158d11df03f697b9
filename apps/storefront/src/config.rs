use std::{fs, path::PathBuf};

use serde::Deserialize;
use store_core::{channel::DEFAULT_EVENT_CAPACITY, StoreConfig, DEFAULT_TAX_RATE_BASIS_POINTS};
use tracing::warn;

const SETTINGS_FILE: &str = "storefront.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub catalog_path: Option<PathBuf>,
    pub tax_rate_basis_points: u32,
    pub event_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_path: None,
            tax_rate_basis_points: DEFAULT_TAX_RATE_BASIS_POINTS,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl Settings {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            tax_rate_basis_points: self.tax_rate_basis_points,
            event_capacity: self.event_capacity,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    catalog_path: Option<PathBuf>,
    tax_rate_basis_points: Option<u32>,
    event_capacity: Option<usize>,
}

pub fn load_settings() -> Settings {
    let file = fs::read_to_string(SETTINGS_FILE).ok();
    load_settings_from(file.as_deref(), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file, then environment variables.
pub fn load_settings_from(file: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        match toml::from_str::<FileSettings>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.catalog_path {
                    settings.catalog_path = Some(v);
                }
                if let Some(v) = file_cfg.tax_rate_basis_points {
                    settings.tax_rate_basis_points = v;
                }
                if let Some(v) = file_cfg.event_capacity {
                    settings.event_capacity = v;
                }
            }
            Err(err) => warn!(
                file = SETTINGS_FILE,
                error = %err,
                "ignoring malformed settings file"
            ),
        }
    }

    if let Some(v) = env("STOREFRONT_CATALOG_PATH") {
        settings.catalog_path = Some(v.into());
    }
    if let Some(v) = env("APP__CATALOG_PATH") {
        settings.catalog_path = Some(v.into());
    }

    if let Some(v) = env("APP__TAX_RATE_BASIS_POINTS") {
        match v.parse::<u32>() {
            Ok(parsed) => settings.tax_rate_basis_points = parsed,
            Err(_) => warn!(
                value = %v,
                kept = settings.tax_rate_basis_points,
                "APP__TAX_RATE_BASIS_POINTS is not a whole number"
            ),
        }
    }

    if let Some(v) = env("APP__EVENT_CAPACITY") {
        match v.parse::<usize>() {
            Ok(parsed) if parsed > 0 => settings.event_capacity = parsed,
            _ => warn!(value = %v, "APP__EVENT_CAPACITY must be a positive integer"),
        }
    }

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
