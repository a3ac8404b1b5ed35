//! Configuration Data Structures for DeviceParts.
//!
//! These structs are populated by deserializing TOML. Every field has a
//! default from [`super::defaults`], and unknown fields are rejected via
//! `#[serde(deny_unknown_fields)]` so that a typo in a device overlay does not
//! silently disable a feature group.

use super::defaults;
use serde::Deserialize;
use std::path::PathBuf;

/// Configuration settings for the logging subsystem.
///
/// # Examples
///
/// ```
/// use deviceparts_core::config::LoggingConfig;
/// use std::path::PathBuf;
///
/// let default_log_config = LoggingConfig::default();
/// assert_eq!(default_log_config.level, "info");
/// assert_eq!(default_log_config.file_path, None);
/// assert_eq!(default_log_config.format, "text");
///
/// let toml_str = r#"
/// level = "debug"
/// file_path = "/var/log/deviceparts.log"
/// format = "json"
/// "#;
/// let log_config: LoggingConfig = toml::from_str(toml_str).unwrap();
/// assert_eq!(log_config.level, "debug");
/// assert_eq!(log_config.file_path, Some(PathBuf::from("/var/log/deviceparts.log")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Minimum level: "trace", "debug", "info", "warn" or "error" (case-insensitive).
    #[serde(default = "defaults::default_log_level")]
    pub level: String,
    /// Optional log file. Relative paths are resolved against the state directory.
    #[serde(default = "defaults::default_log_file_path")]
    pub file_path: Option<PathBuf>,
    /// "text" or "json".
    #[serde(default = "defaults::default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        defaults::default_logging_config()
    }
}

/// Build-time capability flags of the device.
///
/// These gate whole setting groups before any per-control hardware probe
/// runs. They are resolved once when the configuration is loaded and then
/// passed by value; nothing mutates them afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureFlags {
    /// The build exposes in-call audio tuning nodes (earpiece, headphone, speaker, bt).
    #[serde(default = "defaults::default_bool_false")]
    pub has_incall_audio_tuning: bool,
    /// The build exposes output audio tuning nodes (headphone, speaker).
    #[serde(default = "defaults::default_bool_false")]
    pub has_output_audio_tuning: bool,
}

/// Where kernel control nodes live.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    /// Prefix prepended to every absolute device path. `/` on a real device;
    /// a scratch directory when running against a fake sysfs tree.
    #[serde(default = "defaults::default_sysfs_root")]
    pub sysfs_root: PathBuf,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            sysfs_root: defaults::default_sysfs_root(),
        }
    }
}

/// Location of the persisted preference store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// TOML file holding the preference values. Relative paths are resolved
    /// against the application data directory.
    #[serde(default = "defaults::default_preferences_file")]
    pub preferences_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            preferences_file: defaults::default_preferences_file(),
        }
    }
}

/// Sticky broadcast settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BroadcastConfig {
    /// Directory receiving the last payload of every sticky broadcast, so
    /// out-of-process subscribers can pick it up. `None` keeps broadcasts
    /// in-process. Relative paths are resolved against the state directory.
    #[serde(default = "defaults::default_spool_dir")]
    pub spool_dir: Option<PathBuf>,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            spool_dir: defaults::default_spool_dir(),
        }
    }
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use deviceparts_core::config::CoreConfig;
///
/// let toml_str = r#"
/// [features]
/// has_incall_audio_tuning = true
///
/// [logging]
/// level = "warn"
/// "#;
/// let loaded: CoreConfig = toml::from_str(toml_str).unwrap();
/// assert!(loaded.features.has_incall_audio_tuning);
/// assert!(!loaded.features.has_output_audio_tuning);
/// assert_eq!(loaded.logging.level, "warn");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreConfig {
    #[serde(default = "defaults::default_logging_config")]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub broadcast: BroadcastConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            logging: defaults::default_logging_config(),
            features: FeatureFlags::default(),
            device: DeviceConfig::default(),
            storage: StorageConfig::default(),
            broadcast: BroadcastConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_core_config_default_values() {
        let config = CoreConfig::default();
        assert_eq!(config.logging, LoggingConfig::default());
        assert_eq!(config.features, FeatureFlags::default());
        assert_eq!(config.device.sysfs_root, PathBuf::from("/"));
        assert_eq!(config.storage.preferences_file, PathBuf::from("preferences.toml"));
        assert_eq!(config.broadcast.spool_dir, Some(PathBuf::from("broadcasts")));
    }

    #[test]
    fn test_feature_flags_default_to_disabled() {
        let flags = FeatureFlags::default();
        assert!(!flags.has_incall_audio_tuning);
        assert!(!flags.has_output_audio_tuning);
    }

    #[test]
    fn test_core_config_deserialize_empty() {
        let config: CoreConfig = toml::from_str("").unwrap();
        assert_eq!(config, CoreConfig::default());
    }

    #[test]
    fn test_core_config_deserialize_full() {
        let toml_str = r#"
            [logging]
            level = "trace"
            file_path = "/tmp/deviceparts.log"
            format = "json"

            [features]
            has_incall_audio_tuning = true
            has_output_audio_tuning = true

            [device]
            sysfs_root = "/tmp/fake-sysfs"

            [storage]
            preferences_file = "/data/deviceparts/preferences.toml"

            [broadcast]
            spool_dir = "/run/deviceparts"
        "#;
        let config: CoreConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.logging.file_path, Some(PathBuf::from("/tmp/deviceparts.log")));
        assert_eq!(
            config.features,
            FeatureFlags {
                has_incall_audio_tuning: true,
                has_output_audio_tuning: true,
            }
        );
        assert_eq!(config.device.sysfs_root, PathBuf::from("/tmp/fake-sysfs"));
        assert_eq!(config.broadcast.spool_dir, Some(PathBuf::from("/run/deviceparts")));
    }

    #[test]
    fn test_unknown_feature_flag_is_rejected() {
        let result = toml::from_str::<CoreConfig>("[features]\nhas_incall_tuning = true\n");
        assert!(result.is_err(), "misspelled flags must not be ignored");
    }
}
