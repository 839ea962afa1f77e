//! Error types for `JumpListManager`
//!
//! This module defines the error types used throughout the crate. Native shell
//! failures are captured as [`ShellError`] (operation name plus HRESULT) so the
//! same type flows out of both the COM backend and the in-memory backend.
//!
//! Error variants use `#[source]` to preserve error chains.

use thiserror::Error;

/// Simple error type for wrapping string messages while implementing `std::error::Error`
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StringError(pub String);

impl StringError {
    /// Create a new `StringError` from a string message
    pub fn new(msg: impl Into<String>) -> Box<Self> {
        Box::new(Self(msg.into()))
    }
}

/// Generic failure (`E_FAIL`)
pub const E_FAIL: i32 = 0x8000_4005_u32 as i32;
/// One or more arguments are invalid (`E_INVALIDARG`)
pub const E_INVALIDARG: i32 = 0x8007_0057_u32 as i32;
/// Element not found (`HRESULT_FROM_WIN32(ERROR_NOT_FOUND)`)
pub const E_NOT_FOUND: i32 = 0x8007_0490_u32 as i32;

/// A failed call into the shell, identified by the operation and its HRESULT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{operation} failed with HRESULT {code:#010X}")]
pub struct ShellError {
    /// Name of the native operation that failed (e.g. `"GetList"`)
    pub operation: &'static str,
    /// Raw HRESULT reported by the shell
    pub code: i32,
}

impl ShellError {
    /// Create a new shell error for `operation` with the given HRESULT
    pub const fn new(operation: &'static str, code: i32) -> Self {
        Self { operation, code }
    }

    /// Build a shell error from a `windows` crate error
    #[cfg(windows)]
    pub fn from_win32(operation: &'static str, error: &windows::core::Error) -> Self {
        Self {
            operation,
            code: error.code().0,
        }
    }
}

/// Identifies one of the three jump list containers a session holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// Automatic Destinations (pinned, recent, frequent)
    AutomaticDestinations,
    /// Custom Destinations (public interface)
    CustomDestinations,
    /// Custom Destinations (internal interface exposing categories)
    InternalCustomDestinations,
}

impl std::fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::AutomaticDestinations => "automatic destination list",
            Self::CustomDestinations => "custom destination list",
            Self::InternalCustomDestinations => "internal custom destination list",
        };
        f.write_str(name)
    }
}

/// Main error type for `JumpListManager`
#[derive(Debug, Error)]
pub enum JumpListError {
    /// The application identifier was empty
    #[error("Application identifier is empty")]
    EmptyAppId,

    /// A jump list container could not be instantiated
    #[error("Failed to create {container}: {source}")]
    ContainerCreation {
        /// Container that failed
        container: ContainerKind,
        /// Underlying shell failure
        #[source]
        source: ShellError,
    },

    /// A jump list container rejected the application identifier
    #[error("Failed to initialize {container} for '{app_id}': {source}")]
    ContainerInitialization {
        /// Container that failed
        container: ContainerKind,
        /// Identifier the container was initialized with
        app_id: String,
        /// Underlying shell failure
        #[source]
        source: ShellError,
    },

    /// A category was addressed as a custom category but is a Known or Tasks category
    #[error("Category {0} is not a custom category")]
    CategoryNotCustom(u32),

    /// Any other shell call failure
    #[error("Shell error: {0}")]
    Shell(#[from] ShellError),

    /// Configuration error
    /// Preserves the underlying error source for full error chain transparency
    #[error("Configuration error: {0}")]
    ConfigError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for `JumpListManager` operations
pub type Result<T> = std::result::Result<T, JumpListError>;

/// Convert an error to a user-friendly message
///
/// Returns a message suitable for printing from the command line front end,
/// including hints for the common causes of each failure.
pub fn get_user_friendly_error(error: &JumpListError) -> String {
    match error {
        JumpListError::EmptyAppId => "No application identifier was given.\n\n\
             Run `jumplist-manager apps` to list installed applications\n\
             and their identifiers."
            .to_string(),
        JumpListError::ContainerCreation { container, source } => {
            format!(
                "Unable to create the {container}.\n\n{source}\n\n\
                 The jump list components are part of the Windows shell.\n\
                 Please ensure you are running a supported Windows version."
            )
        }
        JumpListError::ContainerInitialization {
            container, app_id, ..
        } => {
            format!(
                "The {container} rejected the application identifier:\n\n{app_id}\n\n\
                 Please check that the identifier belongs to an installed application."
            )
        }
        JumpListError::CategoryNotCustom(index) => {
            format!(
                "Category {index} is reserved by the shell.\n\n\
                 Only custom categories can be listed by index."
            )
        }
        JumpListError::Shell(e) => {
            format!(
                "A shell call failed:\n\n{e}\n\n\
                 The jump list may have been modified by another process.\n\
                 Try listing it again."
            )
        }
        JumpListError::ConfigError(_) => "Failed to load or save configuration.\n\n\
             Your settings may not persist.\n\
             Check that you have write permissions to:\n\
             %APPDATA%\\JumpListManager"
            .to_string(),
        JumpListError::IoError(e) => {
            format!(
                "A file system error occurred:\n\n{e}\n\n\
                 Please check file permissions and disk space."
            )
        }
        JumpListError::JsonError(e) => {
            format!(
                "Configuration file is corrupted:\n\n{e}\n\n\
                 The application will use default settings."
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const E_NOINTERFACE: i32 = 0x8000_4002_u32 as i32;

    #[test]
    fn test_error_display() {
        let error = JumpListError::EmptyAppId;
        assert_eq!(error.to_string(), "Application identifier is empty");
    }

    #[test]
    fn test_shell_error_display_uses_hresult_hex() {
        let error = ShellError::new("GetList", E_FAIL);
        assert_eq!(error.to_string(), "GetList failed with HRESULT 0x80004005");
    }

    #[test]
    fn test_container_creation_display() {
        let error = JumpListError::ContainerCreation {
            container: ContainerKind::InternalCustomDestinations,
            source: ShellError::new("CoCreateInstance", E_NOINTERFACE),
        };
        assert_eq!(
            error.to_string(),
            "Failed to create internal custom destination list: \
             CoCreateInstance failed with HRESULT 0x80004002"
        );
    }

    #[test]
    fn test_container_initialization_keeps_source() {
        use std::error::Error as _;

        let error = JumpListError::ContainerInitialization {
            container: ContainerKind::AutomaticDestinations,
            app_id: "Contoso.App".to_string(),
            source: ShellError::new("Initialize", E_INVALIDARG),
        };
        let source = error.source().expect("source should be preserved");
        assert!(source.to_string().contains("Initialize"));
    }

    #[test]
    fn test_user_friendly_messages() {
        let error = JumpListError::EmptyAppId;
        let message = get_user_friendly_error(&error);
        assert!(message.contains("jumplist-manager apps"));
    }

    #[test]
    fn test_user_friendly_initialization_names_app_id() {
        let error = JumpListError::ContainerInitialization {
            container: ContainerKind::CustomDestinations,
            app_id: "Contoso.App".to_string(),
            source: ShellError::new("SetAppID", E_INVALIDARG),
        };
        let message = get_user_friendly_error(&error);
        assert!(message.contains("custom destination list"));
        assert!(message.contains("Contoso.App"));
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: JumpListError = io_error.into();
        assert!(matches!(error, JumpListError::IoError(_)));
    }

    #[test]
    fn test_error_from_shell() {
        let error: JumpListError = ShellError::new("HasList", E_FAIL).into();
        assert!(matches!(error, JumpListError::Shell(_)));
    }

    #[test]
    fn test_category_not_custom_display() {
        let error = JumpListError::CategoryNotCustom(3);
        assert_eq!(error.to_string(), "Category 3 is not a custom category");
    }
}
