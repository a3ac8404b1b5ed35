//! XDG Base Directory and Application-Specific Path Resolution.
//!
//! Resolves the directories DeviceParts reads from and writes to. Relies on
//! the `directories-next` crate.
//!
//! - [`get_app_config_dir()`]: user configuration, e.g. `~/.config/deviceparts`.
//! - [`get_app_data_dir()`]: the preference store, e.g. `~/.local/share/deviceparts`.
//! - [`get_app_state_dir()`]: logs and the broadcast spool, e.g.
//!   `~/.local/state/DeviceParts/deviceparts`.
//! - [`get_system_config_path_with_override()`]: `/etc/deviceparts/config.toml`,
//!   or the path named by `DEVICEPARTS_SYSTEM_CONFIG`.
//!
//! All functions return [`CoreError::Config`] with
//! [`ConfigError::DirectoryUnavailable`] when a directory cannot be
//! determined (e.g. `HOME` is unset on a minimal boot environment).

use crate::error::{ConfigError, CoreError};
use directories_next::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "DeviceParts";
const APPLICATION: &str = "deviceparts";

/// Environment variable that replaces the system configuration path.
pub const SYSTEM_CONFIG_ENV: &str = "DEVICEPARTS_SYSTEM_CONFIG";

const DEFAULT_SYSTEM_CONFIG_PATH: &str = "/etc/deviceparts/config.toml";

fn project_dirs(dir_type: &str) -> Result<ProjectDirs, CoreError> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).ok_or_else(|| {
        CoreError::Config(ConfigError::DirectoryUnavailable {
            dir_type: dir_type.to_string(),
        })
    })
}

/// Returns the base directory for user-specific state files.
///
/// On Linux this is `$XDG_STATE_HOME`, falling back to `$HOME/.local/state`.
/// Other platforms use the local data directory.
pub fn get_state_base_dir() -> Result<PathBuf, CoreError> {
    BaseDirs::new()
        .map(|dirs| {
            #[cfg(target_os = "linux")]
            {
                match std::env::var("XDG_STATE_HOME") {
                    Ok(state_home) if !state_home.is_empty() => PathBuf::from(state_home),
                    _ => dirs.home_dir().join(".local/state"),
                }
            }
            #[cfg(not(target_os = "linux"))]
            {
                dirs.data_local_dir().to_path_buf()
            }
        })
        .ok_or_else(|| {
            CoreError::Config(ConfigError::DirectoryUnavailable {
                dir_type: "State Base".to_string(),
            })
        })
}

/// Returns the application-specific configuration directory.
///
/// # Examples
/// ```
/// match deviceparts_core::utils::paths::get_app_config_dir() {
///     Ok(path) => println!("App config directory: {}", path.display()),
///     Err(e) => eprintln!("Error getting app config dir: {}", e),
/// }
/// ```
pub fn get_app_config_dir() -> Result<PathBuf, CoreError> {
    project_dirs("App Config").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Returns the application-specific data directory, home of the preference store.
pub fn get_app_data_dir() -> Result<PathBuf, CoreError> {
    project_dirs("App Data").map(|dirs| dirs.data_dir().to_path_buf())
}

/// Returns the application-specific state directory.
///
/// `ProjectDirs` has no state directory, so this appends
/// `ORGANIZATION/APPLICATION` to [`get_state_base_dir()`].
pub fn get_app_state_dir() -> Result<PathBuf, CoreError> {
    get_state_base_dir().map(|base_state| base_state.join(ORGANIZATION).join(APPLICATION))
}

/// Returns the system-wide configuration file path.
///
/// `DEVICEPARTS_SYSTEM_CONFIG` takes precedence when set and non-empty, which
/// lets device builds ship their overlay outside `/etc`.
pub fn get_system_config_path_with_override() -> Result<PathBuf, ConfigError> {
    match std::env::var(SYSTEM_CONFIG_ENV) {
        Ok(path) if !path.trim().is_empty() => Ok(PathBuf::from(path)),
        _ => Ok(PathBuf::from(DEFAULT_SYSTEM_CONFIG_PATH)),
    }
}
