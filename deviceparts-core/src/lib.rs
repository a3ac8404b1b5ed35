//! # DeviceParts Core Library (`deviceparts-core`)
//!
//! Shared foundation for the DeviceParts hardware settings service:
//!
//! - **Error Handling**: [`CoreError`] and the more specific [`ConfigError`]
//!   and [`LoggingError`].
//! - **Configuration**: TOML loading with a system/user overlay, defaults and
//!   validation ([`ConfigLoader`], [`CoreConfig`], [`FeatureFlags`]).
//! - **Logging**: `tracing` based console and rolling-file output.
//! - **Utilities**: filesystem helpers (including atomic replacement) and
//!   XDG-style path resolution.
//!
//! ```rust,ignore
//! use deviceparts_core::{init_logging, ConfigLoader, CoreError};
//!
//! fn main() -> Result<(), CoreError> {
//!     let config = ConfigLoader::load()?;
//!     init_logging(&config.logging, false)?;
//!     tracing::info!(features = ?config.features, "DeviceParts core ready");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod utils;

pub use config::{ConfigLoader, CoreConfig, FeatureFlags, LoggingConfig};
pub use error::{ConfigError, CoreError, LoggingError};
pub use logging::{init_logging, init_minimal_logging};
