//! Configuration Loading for DeviceParts.
//!
//! [`ConfigLoader`] locates the system and user configuration files, merges
//! them, deserializes the result into [`CoreConfig`] and validates it.
//!
//! ## Validation
//!
//! - Log level and format are normalized to lowercase and checked.
//! - A relative log file path is resolved against the application state
//!   directory, and its parent directory is created.
//! - A relative preference file is resolved against the application data directory.
//! - A relative broadcast spool directory is resolved against the state directory.
//! - The sysfs root must be absolute.

use std::fs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use toml::Value;

use crate::config::CoreConfig;
use crate::error::{ConfigError, CoreError};
use crate::utils::fs as dp_fs;
use crate::utils::paths::{get_app_config_dir, get_app_data_dir, get_app_state_dir, get_system_config_path_with_override};

/// Namespace for configuration loading.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads and validates the configuration from the standard locations.
    ///
    /// Missing files are not an error; a device without any configuration
    /// runs with every feature group disabled.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ReadError`] if a file exists but cannot be read.
    /// - [`ConfigError::ParseError`] for invalid TOML or unknown fields.
    /// - [`ConfigError::ValidationError`] for invalid values.
    /// - [`ConfigError::DirectoryUnavailable`] if a relative path needs a base
    ///   directory that cannot be determined.
    pub fn load() -> Result<CoreConfig, CoreError> {
        let system_config_path = get_system_config_path_with_override()?;
        let user_config_path = get_app_config_dir()?.join("config.toml");
        Self::load_from_paths(Some(&system_config_path), Some(&user_config_path))
    }

    /// Loads a single, explicitly requested configuration file.
    ///
    /// Unlike [`ConfigLoader::load`], a missing file is reported as
    /// [`ConfigError::NotFound`].
    pub fn load_file(path: &Path) -> Result<CoreConfig, CoreError> {
        if !path.exists() {
            return Err(CoreError::Config(ConfigError::NotFound {
                locations: vec![path.to_path_buf()],
            }));
        }
        Self::load_from_paths(Some(path), None)
    }

    /// Loads, merges and validates the given system and user files.
    ///
    /// Either path may be `None` or point to a missing or empty file, in
    /// which case it contributes nothing.
    pub fn load_from_paths(system: Option<&Path>, user: Option<&Path>) -> Result<CoreConfig, CoreError> {
        let system_toml_value = match system {
            Some(path) => Self::read_toml_value(path)?,
            None => None,
        };
        let user_toml_value = match user {
            Some(path) => Self::read_toml_value(path)?,
            None => None,
        };

        let merged_toml = Self::merge_toml_values(system_toml_value, user_toml_value);

        let mut final_config: CoreConfig = match merged_toml {
            Some(value) => {
                CoreConfig::deserialize(value).map_err(|e| CoreError::Config(ConfigError::ParseError(e)))?
            }
            None => CoreConfig::default(),
        };

        Self::validate_config(&mut final_config)?;
        Ok(final_config)
    }

    fn read_toml_value(path: &Path) -> Result<Option<Value>, CoreError> {
        match fs::read_to_string(path) {
            Ok(content) => {
                if content.trim().is_empty() {
                    Ok(None)
                } else {
                    content
                        .parse::<Value>()
                        .map(Some)
                        .map_err(|e| CoreError::Config(ConfigError::ParseError(e)))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CoreError::Config(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            })),
        }
    }

    /// Merges two optional TOML values. `override_val` takes precedence.
    fn merge_toml_values(base: Option<Value>, override_val: Option<Value>) -> Option<Value> {
        match (base, override_val) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(Value::Table(mut base_table)), Some(Value::Table(override_table))) => {
                Self::merge_toml_tables(&mut base_table, &override_table);
                Some(Value::Table(base_table))
            }
            (_, Some(o)) => Some(o),
        }
    }

    /// Recursively merges `override_table` into `base_table`.
    fn merge_toml_tables(base_table: &mut toml::map::Map<String, Value>, override_table: &toml::map::Map<String, Value>) {
        for (key, override_item) in override_table {
            match (base_table.get_mut(key), override_item) {
                (Some(Value::Table(bt)), Value::Table(ot)) => Self::merge_toml_tables(bt, ot),
                (Some(base_item), _) => *base_item = override_item.clone(),
                (None, _) => {
                    base_table.insert(key.clone(), override_item.clone());
                }
            }
        }
    }

    fn validate_config(config: &mut CoreConfig) -> Result<(), CoreError> {
        let level_lower = config.logging.level.to_lowercase();
        match level_lower.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => config.logging.level = level_lower,
            _ => {
                return Err(CoreError::Config(ConfigError::ValidationError(format!(
                    "Invalid log level: '{}'. Must be one of trace, debug, info, warn, error.",
                    config.logging.level
                ))));
            }
        }

        let format_lower = config.logging.format.to_lowercase();
        match format_lower.as_str() {
            "text" | "json" => config.logging.format = format_lower,
            _ => {
                return Err(CoreError::Config(ConfigError::ValidationError(format!(
                    "Invalid log format: '{}'. Must be one of text, json.",
                    config.logging.format
                ))));
            }
        }

        if !config.device.sysfs_root.is_absolute() {
            return Err(CoreError::Config(ConfigError::ValidationError(format!(
                "device.sysfs_root must be absolute, got {:?}",
                config.device.sysfs_root
            ))));
        }

        if let Some(log_path) = config.logging.file_path.take() {
            let absolute_path = Self::resolve_against(log_path, get_app_state_dir)?;
            if let Some(parent_dir) = absolute_path.parent() {
                if !parent_dir.exists() {
                    dp_fs::ensure_dir_exists(parent_dir)?;
                }
            }
            config.logging.file_path = Some(absolute_path);
        }

        let preferences_file = std::mem::take(&mut config.storage.preferences_file);
        if preferences_file.as_os_str().is_empty() {
            return Err(CoreError::Config(ConfigError::ValidationError(
                "storage.preferences_file must not be empty.".to_string(),
            )));
        }
        config.storage.preferences_file = Self::resolve_against(preferences_file, get_app_data_dir)?;

        if let Some(spool_dir) = config.broadcast.spool_dir.take() {
            config.broadcast.spool_dir = Some(Self::resolve_against(spool_dir, get_app_state_dir)?);
        }

        Ok(())
    }

    /// Returns `path` unchanged when absolute, otherwise joined onto the base
    /// directory produced by `base_dir`. The base is only looked up when needed.
    fn resolve_against(path: PathBuf, base_dir: fn() -> Result<PathBuf, CoreError>) -> Result<PathBuf, CoreError> {
        if path.is_absolute() {
            Ok(path)
        } else {
            Ok(base_dir()?.join(path))
        }
    }
}
