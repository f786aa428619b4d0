//! Global kalsync configuration.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{KalsyncError, KalsyncResult};

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("kalsync/events.db"))
        .unwrap_or_else(|| PathBuf::from("kalsync.db"))
}

fn default_group() -> String {
    "default".to_string()
}

/// Global configuration at ~/.config/kalsync/config.toml
///
/// Everything is optional; CLI flags override whatever is configured here.
#[derive(Deserialize, Clone)]
pub struct GlobalConfig {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Remote calendar URL used when none is passed on the command line.
    pub remote_url: Option<String>,

    /// Username presented to the remote calendar.
    pub username: Option<String>,

    #[serde(default = "default_group")]
    pub default_group: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        GlobalConfig {
            db_path: default_db_path(),
            remote_url: None,
            username: None,
            default_group: default_group(),
        }
    }
}

impl GlobalConfig {
    pub fn config_path() -> KalsyncResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| KalsyncError::Config("Could not determine config directory".into()))?
            .join("kalsync");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the configuration, falling back to defaults when no file exists.
    pub fn load() -> KalsyncResult<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|e| KalsyncError::Config(e.to_string()))
    }
}
