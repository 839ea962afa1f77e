//! Configuration manager for loading and saving application configuration
//!
//! This module provides functionality to load and save configuration to
//! %APPDATA%\JumpListManager\config.json with atomic writes to prevent corruption.

use crate::config::models::AppConfig;
use crate::error::{JumpListError, Result, StringError};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Directory name under `%APPDATA%` holding configuration and logs
pub const APP_DIR_NAME: &str = "JumpListManager";

/// Configuration manager
pub struct ConfigManager;

impl ConfigManager {
    /// Get the application data directory
    ///
    /// Returns: %APPDATA%\JumpListManager, or .\JumpListManager when APPDATA is unset
    pub fn get_app_dir() -> PathBuf {
        let appdata = std::env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(appdata).join(APP_DIR_NAME)
    }

    /// Get the path to the configuration file
    ///
    /// Returns: %APPDATA%\JumpListManager\config.json
    pub fn get_config_path() -> PathBuf {
        Self::get_app_dir().join("config.json")
    }

    /// Ensure the configuration directory exists
    pub fn ensure_config_dir() -> Result<PathBuf> {
        let config_path = Self::get_config_path();
        let config_dir = parent_dir(&config_path)?;
        std::fs::create_dir_all(config_dir)?;
        Ok(config_dir.to_path_buf())
    }

    /// Load configuration from disk
    ///
    /// If the configuration file doesn't exist or is corrupt, returns default configuration.
    pub fn load() -> Result<AppConfig> {
        Self::load_from(&Self::get_config_path())
    }

    /// Load configuration from an explicit path
    pub fn load_from(config_path: &Path) -> Result<AppConfig> {
        if !config_path.exists() {
            info!("Configuration file not found, using defaults");
            return Ok(AppConfig::default());
        }

        let json = std::fs::read_to_string(config_path)?;

        match serde_json::from_str(&json) {
            Ok(config) => {
                info!("Configuration loaded from {}", config_path.display());
                Ok(config)
            }
            Err(e) => {
                warn!("Failed to parse configuration, using defaults: {e}");
                Ok(AppConfig::default())
            }
        }
    }

    /// Save configuration to disk with atomic write
    ///
    /// Uses a temporary file and rename to ensure atomic write operation.
    pub fn save(config: &AppConfig) -> Result<()> {
        Self::ensure_config_dir()?;
        Self::save_to(config, &Self::get_config_path())
    }

    /// Save configuration to an explicit path with atomic write
    pub fn save_to(config: &AppConfig, config_path: &Path) -> Result<()> {
        let config_dir = parent_dir(config_path)?;

        // Atomic write: temp file in the same directory, then persist over the target
        let json = serde_json::to_string_pretty(config)?;
        let mut temp_file = tempfile::NamedTempFile::new_in(config_dir)?;
        temp_file.write_all(json.as_bytes())?;
        temp_file.persist(config_path).map_err(|e| e.error)?;

        info!("Configuration saved to {}", config_path.display());
        Ok(())
    }
}

fn parent_dir(path: &Path) -> Result<&Path> {
    path.parent()
        .ok_or_else(|| JumpListError::ConfigError(StringError::new("Invalid config path")))
}
