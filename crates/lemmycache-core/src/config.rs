//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which holds the Lemmy instance to talk to and the last logged-in handle.
//!
//! Configuration is stored at `~/.config/lemmycache/config.json`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
const APP_NAME: &str = "lemmycache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Instance used when none is configured
pub const DEFAULT_INSTANCE_URL: &str = "https://lemmy.ml";

/// Settings subdirectory inside the data directory
const SETTINGS_DIR: &str = "settings";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub instance_url: Option<String>,
    pub last_handle: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn instance_url(&self) -> &str {
        self.instance_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(DEFAULT_INSTANCE_URL)
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    pub fn settings_dir(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(SETTINGS_DIR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_url_default() {
        let config = Config::default();
        assert_eq!(config.instance_url(), DEFAULT_INSTANCE_URL);

        let blank = Config {
            instance_url: Some("  ".to_string()),
            last_handle: None,
        };
        assert_eq!(blank.instance_url(), DEFAULT_INSTANCE_URL);

        let custom = Config {
            instance_url: Some("https://lemmy.world".to_string()),
            last_handle: None,
        };
        assert_eq!(custom.instance_url(), "https://lemmy.world");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = std::env::temp_dir().join(format!("lemmycache-config-{}", std::process::id()));
        let path = dir.join(CONFIG_FILE);
        let _ = std::fs::remove_dir_all(&dir);

        assert_eq!(Config::load_from(&path).unwrap(), Config::default());

        let config = Config {
            instance_url: Some("https://beehaw.org".to_string()),
            last_handle: Some("alice@beehaw.org".to_string()),
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);

        let _ = std::fs::remove_dir_all(dir);
    }
}
