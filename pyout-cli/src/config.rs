//! Persisted user settings (~/.pyout/config.json)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use pyout_core::Theme;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Display name of the annotation theme
    pub theme: String,
    /// Interpreter invoked on the scratch file
    pub interpreter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::default().as_str().to_string(),
            interpreter: "python3".to_string(),
        }
    }
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        Ok(crate::io::pyout_dir()?.join("config.json"))
    }

    /// Load settings; a missing or unreadable config falls back to defaults
    pub fn load() -> Config {
        Self::path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    fn load_from(path: &Path) -> Config {
        fs::read_to_string(path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// The configured theme, falling back to the default for unknown names
    pub fn theme(&self) -> Theme {
        Theme::from_name(&self.theme).unwrap_or_default()
    }
}
