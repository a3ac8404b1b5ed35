//! Configuration Management for DeviceParts.
//!
//! - [`types`]: the schema ([`CoreConfig`], [`LoggingConfig`], [`FeatureFlags`], ...).
//! - [`defaults`]: default values used when a field or section is missing.
//! - [`loader`]: [`ConfigLoader`], which finds, merges, parses and validates
//!   configuration files.
//!
//! ## Loading process
//!
//! 1. The system file (`/etc/deviceparts/config.toml`, or the path in
//!    `DEVICEPARTS_SYSTEM_CONFIG`) is read if present. Device builds put
//!    their capability flags here.
//! 2. The user file (`<config dir>/config.toml`) is read if present.
//! 3. Both TOML tables are merged, user values winning.
//! 4. The result is deserialized into [`CoreConfig`]; missing files yield defaults.
//! 5. Validation normalizes log settings and resolves relative paths.
//!
//! # Examples
//!
//! ```rust,ignore
//! use deviceparts_core::config::ConfigLoader;
//!
//! match ConfigLoader::load() {
//!     Ok(config) => println!("in-call tuning: {}", config.features.has_incall_audio_tuning),
//!     Err(e) => {
//!         deviceparts_core::logging::init_minimal_logging();
//!         tracing::error!("Configuration error: {}", e);
//!     }
//! }
//! ```

pub mod defaults;
pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{BroadcastConfig, CoreConfig, DeviceConfig, FeatureFlags, LoggingConfig, StorageConfig};
