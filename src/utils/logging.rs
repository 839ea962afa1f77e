//! Logging system initialization
//!
//! Sets up tracing-based logging with file output to
//! %APPDATA%\JumpListManager\app.log. Existing logs are rotated on every start,
//! keeping the previous nine sessions.

use crate::config::ConfigManager;
use crate::error::{JumpListError, Result, StringError};
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt};

/// Maximum number of historical log files to keep (app.log.1 through app.log.9)
const MAX_LOG_FILES: u8 = 9;

/// Log file name inside the application data directory
pub const LOG_FILE_NAME: &str = "app.log";

fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Initialize file logging
///
/// Log level defaults to INFO but can be configured via `RUST_LOG` environment variable.
pub fn init_logging() -> Result<()> {
    let log_dir = ConfigManager::get_app_dir();
    std::fs::create_dir_all(&log_dir)?;

    rotate_logs_on_startup(&log_dir.join(LOG_FILE_NAME))?;

    // Rotation is handled above; the appender only writes
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("app")
        .filename_suffix("log")
        .build(&log_dir)
        .map_err(|e| JumpListError::ConfigError(Box::new(e)))?;

    let subscriber = fmt()
        .with_writer(file_appender)
        .with_env_filter(env_filter("info"))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| JumpListError::ConfigError(Box::new(e)))?;

    tracing::info!(
        "JumpListManager v{} started, logging to {}",
        env!("CARGO_PKG_VERSION"),
        log_dir.display()
    );
    Ok(())
}

/// Initialize logging to standard error
///
/// Used by the command line front end when verbose output is requested.
pub fn init_stderr_logging(default_directive: &str) -> Result<()> {
    let subscriber = fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter(default_directive))
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| JumpListError::ConfigError(Box::new(e)))
}

/// Shift `app.log` to `app.log.1`, `app.log.1` to `app.log.2` and so on
///
/// The oldest file (`app.log.9`) is deleted. Nothing happens when the current log
/// does not exist.
fn rotate_logs_on_startup(log_path: &Path) -> Result<()> {
    if !log_path.exists() {
        return Ok(());
    }

    let log_dir = log_path
        .parent()
        .ok_or_else(|| JumpListError::ConfigError(StringError::new("Invalid log path")))?;
    let log_name = log_path
        .file_name()
        .ok_or_else(|| JumpListError::ConfigError(StringError::new("Invalid log filename")))?
        .to_string_lossy();
    let numbered = |index: u8| log_dir.join(format!("{log_name}.{index}"));

    let oldest_log = numbered(MAX_LOG_FILES);
    if oldest_log.exists() {
        std::fs::remove_file(&oldest_log)?;
    }

    for index in (1..MAX_LOG_FILES).rev() {
        let current_log = numbered(index);
        if current_log.exists() {
            std::fs::rename(&current_log, numbered(index + 1))?;
        }
    }

    std::fs::rename(log_path, numbered(1))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_dir;
    use std::fs;

    fn start_session(log_path: &Path, session: u32) {
        fs::write(log_path, format!("session {session}")).unwrap();
        rotate_logs_on_startup(log_path).unwrap();
    }

    #[test]
    fn test_rotation_moves_current_log() {
        let dir = create_test_dir();
        let log_path = dir.path().join(LOG_FILE_NAME);

        start_session(&log_path, 1);

        assert!(!log_path.exists());
        assert_eq!(fs::read_to_string(dir.path().join("app.log.1")).unwrap(), "session 1");
    }

    #[test]
    fn test_rotation_keeps_nine_sessions() {
        let dir = create_test_dir();
        let log_path = dir.path().join(LOG_FILE_NAME);

        for session in 1..=12 {
            start_session(&log_path, session);
        }

        for index in 1..=MAX_LOG_FILES {
            let expected = format!("session {}", 13 - u32::from(index));
            let content = fs::read_to_string(dir.path().join(format!("app.log.{index}"))).unwrap();
            assert_eq!(content, expected);
        }
        assert!(!dir.path().join("app.log.10").exists());
    }

    #[test]
    fn test_rotation_without_current_log() {
        let dir = create_test_dir();
        let log_path = dir.path().join(LOG_FILE_NAME);

        rotate_logs_on_startup(&log_path).unwrap();

        assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_rotation_with_gaps() {
        let dir = create_test_dir();
        let log_path = dir.path().join(LOG_FILE_NAME);
        fs::write(dir.path().join("app.log.1"), "previous").unwrap();
        fs::write(dir.path().join("app.log.5"), "old").unwrap();

        start_session(&log_path, 3);

        assert_eq!(fs::read_to_string(dir.path().join("app.log.1")).unwrap(), "session 3");
        assert_eq!(fs::read_to_string(dir.path().join("app.log.2")).unwrap(), "previous");
        assert_eq!(fs::read_to_string(dir.path().join("app.log.6")).unwrap(), "old");
        assert!(!dir.path().join("app.log.5").exists());
    }
}
