use deviceparts_core::error::CoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SystemError {
    #[error("Failed to write '{value}' to device file {path:?}: {source}")]
    DeviceWrite {
        path: PathBuf,
        value: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Preference store error: {0}")]
    Store(String),
    #[error("Unknown setting '{0}'")]
    UnknownSetting(String),
    #[error("Setting '{key}' is not available on this device build")]
    SettingUnavailable { key: String },
    #[error("Invalid value '{value}' for setting '{key}' (expected true/false, 1/0 or on/off)")]
    InvalidValue { key: String, value: String },
    #[error("Core error: {0}")]
    Core(#[from] CoreError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SystemResult<T> = Result<T, SystemError>;
