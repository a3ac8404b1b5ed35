//! Error handling for the DeviceParts core layer.
//!
//! This module provides the error types shared by every DeviceParts crate.
//! They are defined with `thiserror` so that callers get readable messages
//! and a proper `source()` chain.
//!
//! The main error type is [`CoreError`], which wraps the more specific
//! [`ConfigError`] and [`LoggingError`].
//!
//! # Examples
//!
//! ```rust,ignore
//! use deviceparts_core::error::CoreError;
//!
//! fn read_overlay(path: &std::path::Path) -> Result<String, CoreError> {
//!     Ok(std::fs::read_to_string(path)?)
//! }
//! ```

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for DeviceParts.
///
/// Represents every failure the core layer can report. Higher layers usually
/// wrap it in their own error type.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Errors related to configuration loading, parsing, or validation.
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),

    /// Errors raised while installing the global `tracing` subscriber.
    #[error("Logging Error: {0}")]
    Logging(#[from] LoggingError),

    /// A filesystem operation on a known path failed.
    #[error("Filesystem Error: {message} (Path: {path:?})")]
    Filesystem {
        message: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// General I/O errors not covered by other variants.
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error type for configuration-related operations.
///
/// Typically wrapped by [`CoreError::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration file exists but could not be read.
    #[error("Failed to read configuration file from {path:?}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid TOML or does not match the schema.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// The configuration parsed but holds an invalid value.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// An explicitly requested configuration file does not exist.
    #[error("Configuration file not found at expected locations: {locations:?}")]
    NotFound { locations: Vec<PathBuf> },

    /// A required base directory (XDG config/data/state home) could not be determined.
    #[error("Could not determine base directory for {dir_type}")]
    DirectoryUnavailable { dir_type: String },
}

/// Error type for logging setup.
#[derive(Error, Debug)]
pub enum LoggingError {
    /// Installing the global subscriber failed, or the logging config is invalid.
    #[error("Failed to initialize logging: {0}")]
    InitializationFailure(String),

    /// An I/O error occurred while preparing a log file.
    #[error("Logging I/O error: {0}")]
    IoError(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_core_error_config_variant_keeps_source() {
        let core_err = CoreError::from(ConfigError::ValidationError("bad flag".to_string()));

        assert_eq!(
            core_err.to_string(),
            "Configuration Error: Configuration validation failed: bad flag"
        );
        match core_err.source().and_then(|s| s.downcast_ref::<ConfigError>()) {
            Some(ConfigError::ValidationError(msg)) => assert_eq!(msg, "bad flag"),
            other => panic!("Incorrect source for CoreError::Config: {:?}", other),
        }
    }

    #[test]
    fn test_core_error_logging_variant() {
        let core_err = CoreError::from(LoggingError::InitializationFailure("already set".to_string()));
        assert_eq!(
            core_err.to_string(),
            "Logging Error: Failed to initialize logging: already set"
        );
        assert!(core_err.source().is_some());
    }

    #[test]
    fn test_core_error_filesystem_variant() {
        let path = PathBuf::from("/sys/class/backlight/panel/auto_brightness");
        let core_err = CoreError::Filesystem {
            message: "Failed to write string to file".to_string(),
            path: path.clone(),
            source: IoError::new(ErrorKind::PermissionDenied, "denied"),
        };

        assert_eq!(
            core_err.to_string(),
            format!("Filesystem Error: Failed to write string to file (Path: {:?})", path)
        );
        let source = core_err.source().expect("filesystem errors carry a source");
        assert_eq!(
            source.downcast_ref::<IoError>().map(IoError::kind),
            Some(ErrorKind::PermissionDenied)
        );
    }

    #[test]
    fn test_core_error_io_variant() {
        let core_err = CoreError::from(IoError::new(ErrorKind::NotFound, "missing node"));
        assert_eq!(core_err.to_string(), "I/O Error: missing node");
    }

    #[test]
    fn test_config_error_parse_error_variant() {
        let toml_err: toml::de::Error = toml::from_str::<toml::Value>("this is = = not toml").unwrap_err();
        let display = toml_err.to_string();
        let config_err = ConfigError::ParseError(toml_err);

        assert_eq!(config_err.to_string(), format!("Failed to parse configuration file: {}", display));
        assert!(config_err.source().map(|s| s.is::<toml::de::Error>()).unwrap_or(false));
    }

    #[test]
    fn test_config_error_not_found_lists_locations() {
        let locations = vec![PathBuf::from("/etc/deviceparts/config.toml")];
        let config_err = ConfigError::NotFound { locations: locations.clone() };
        assert_eq!(
            config_err.to_string(),
            format!("Configuration file not found at expected locations: {:?}", locations)
        );
        assert!(config_err.source().is_none());
    }

    #[test]
    fn test_config_error_directory_unavailable_variant() {
        let config_err = ConfigError::DirectoryUnavailable { dir_type: "App Data".to_string() };
        assert_eq!(config_err.to_string(), "Could not determine base directory for App Data");
    }

    #[test]
    fn test_logging_error_io_variant() {
        let log_err = LoggingError::from(IoError::new(ErrorKind::BrokenPipe, "pipe"));
        assert_eq!(log_err.to_string(), "Logging I/O error: pipe");
    }
}
