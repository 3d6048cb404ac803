//! User settings stored as TOML in the platform config directory.

use std::fs;
use std::path::{Path, PathBuf};

use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::invoice::DraftDefaults;
use crate::template::TemplateId;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub data_root: String,
    pub default_currency: String,
    pub default_template: TemplateId,
    pub default_tax_rate: f64,
    pub payment_terms_days: u64,
    pub rates_url: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        let defaults = DraftDefaults::default();
        Self {
            data_root: "~/Documents/Invoices".to_string(),
            default_currency: defaults.currency,
            default_template: defaults.template,
            default_tax_rate: defaults.tax_rate,
            payment_terms_days: defaults.payment_terms_days,
            rates_url: None,
        }
    }
}

impl AppSettings {
    pub fn draft_defaults(&self) -> DraftDefaults {
        DraftDefaults {
            currency: self.default_currency.clone(),
            template: self.default_template,
            tax_rate: self.default_tax_rate,
            payment_terms_days: self.payment_terms_days,
        }
    }

    pub fn root(&self) -> PathBuf {
        PathBuf::from(expand_home_dir(&self.data_root))
    }

    pub fn store_path(&self) -> PathBuf {
        self.root().join("data").join("store.json")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root().join("output")
    }

    /// Where user-edited layouts (`<id>.html`) are picked up from.
    pub fn templates_dir(&self) -> PathBuf {
        self.root().join("templates")
    }
}

pub fn config_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "invoice-studio", "app") {
        return proj_dirs.config_dir().join("settings.toml");
    }
    PathBuf::from("settings.toml")
}

/// Reads settings from `path`; a missing file yields the defaults.
pub fn load_settings_from(path: &Path) -> Result<AppSettings> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no settings file, using defaults");
        return Ok(AppSettings::default());
    }
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

pub fn save_settings_to(path: &Path, settings: &AppSettings) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, toml::to_string_pretty(settings)?)?;
    Ok(())
}

pub fn load_settings() -> Result<AppSettings> {
    load_settings_from(&config_path())
}

pub fn save_settings(settings: &AppSettings) -> Result<()> {
    save_settings_to(&config_path(), settings)
}

pub fn expand_home_dir(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(base_dirs) = BaseDirs::new() {
            let home = base_dirs.home_dir().to_string_lossy();
            return path.replacen('~', &home, 1);
        }
    }
    path.to_string()
}
