//! Configuration management module
//!
//! This module handles loading, saving, and managing application configuration.
//! Configuration is stored in %APPDATA%\JumpListManager\config.json with atomic
//! writes to prevent corruption.

pub mod manager;
pub mod models;

pub use manager::{APP_DIR_NAME, ConfigManager};
pub use models::{AppConfig, EnumerationLimits, MAX_LIMIT, MIN_LIMIT};
