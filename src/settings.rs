use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SankeyError};
use crate::importer::{ImportOptions, NumberFormat};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_category_column")]
    pub category_column: String,
    #[serde(default = "default_amount_column")]
    pub amount_column: String,
    #[serde(default)]
    pub number_format: NumberFormat,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_category_column() -> String {
    "Kategorie-Pfad".to_string()
}

fn default_amount_column() -> String {
    "Betrag".to_string()
}

fn default_currency() -> String {
    "€".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            category_column: default_category_column(),
            amount_column: default_amount_column(),
            number_format: NumberFormat::default(),
            currency: default_currency(),
        }
    }
}

impl Settings {
    pub fn import_options(&self) -> ImportOptions {
        ImportOptions {
            category_column: self.category_column.clone(),
            amount_column: self.amount_column.clone(),
            number_format: self.number_format,
            skip_duplicate_files: false,
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("category-sankey")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// Loads settings from `path`, falling back to defaults when the file is
/// missing. A file that exists but does not parse is an error.
pub fn load_settings_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| SankeyError::Settings(format!("{}: {e}", path.display())))
}

pub fn load_settings() -> Result<Settings> {
    load_settings_from(&settings_path())
}

pub fn save_settings_to(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}
