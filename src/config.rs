//! Behavior configuration.
//!
//! A small TOML file tunes the elevation policy and the store; it is never
//! required and never created implicitly.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::theme::Theme;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub elevation: Elevation,

    #[serde(default)]
    pub store: Store,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Elevation {
    /// Relaunch with an elevation prompt when not running as administrator.
    /// When false, refuse and report instead.
    #[serde(default = "default_true")]
    pub auto_relaunch: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    /// Broadcast WM_SETTINGCHANGE after a successful write (Windows only).
    #[serde(default = "default_true")]
    pub broadcast_change: bool,

    /// Override the machine environment file (Unix only). Defaults to
    /// /etc/environment.
    #[serde(default)]
    pub env_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            elevation: Elevation::default(),
            store: Store::default(),
        }
    }
}

impl Default for Elevation {
    fn default() -> Self {
        Self { auto_relaunch: true }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self {
            broadcast_change: true,
            env_file: None,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Get the config file path: `<platform config dir>/pathadd/config.toml`
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "pathadd")
            .context("cannot determine the platform config directory")?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load config from file or return defaults
    pub fn load() -> Self {
        match Self::config_path() {
            Ok(path) if path.exists() => match fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => config,
                    Err(e) => {
                        eprintln!(
                            "{}",
                            Theme::warning(&format!("Warning: Failed to parse config file: {e}"))
                        );
                        Self::default()
                    }
                },
                Err(e) => {
                    eprintln!(
                        "{}",
                        Theme::warning(&format!("Warning: Failed to read config file: {e}"))
                    );
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, toml).context("Failed to write config file")?;

        Ok(())
    }
}
