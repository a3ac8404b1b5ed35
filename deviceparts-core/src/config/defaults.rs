//! Default configuration values for DeviceParts.
//!
//! Used by `serde`'s `default` attribute in [`super::types`].

use crate::config::LoggingConfig;
use std::path::PathBuf;

/// Returns the default `LoggingConfig`.
pub(super) fn default_logging_config() -> LoggingConfig {
    LoggingConfig {
        level: default_log_level(),
        file_path: default_log_file_path(),
        format: default_log_format(),
    }
}

pub(super) fn default_log_level() -> String {
    "info".to_string()
}

/// No log file by default; boot hooks log to the console only.
pub(super) fn default_log_file_path() -> Option<PathBuf> {
    None
}

pub(super) fn default_log_format() -> String {
    "text".to_string()
}

/// Capability flags are opt-in per device build.
pub(super) fn default_bool_false() -> bool {
    false
}

pub(super) fn default_sysfs_root() -> PathBuf {
    PathBuf::from("/")
}

/// Relative to the application data directory.
pub(super) fn default_preferences_file() -> PathBuf {
    PathBuf::from("preferences.toml")
}

/// Relative to the application state directory.
pub(super) fn default_spool_dir() -> Option<PathBuf> {
    Some(PathBuf::from("broadcasts"))
}
