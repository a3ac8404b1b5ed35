//! # DeviceParts System Layer (`deviceparts-system`)
//!
//! Hardware tuning settings for a device build: capability-gated toggles
//! backed by sysfs nodes, persisted preferences, the dock-audio sticky
//! broadcast and the boot-time restore that ties them together.
//!
//! The settings logic only talks to traits ([`DeviceFileIo`],
//! [`PreferenceStore`], [`BroadcastPort`], [`settings::PreferenceWidget`]);
//! the concrete implementations in this crate are what the `deviceparts`
//! binary wires up.

pub mod broadcast;
pub mod device_file;
pub mod error;
pub mod preferences;
pub mod settings;
pub mod system_settings_service;

pub use broadcast::{BroadcastPort, BroadcastTarget, StickyBroadcast, StickyBus};
pub use device_file::{DeviceFileIo, SysfsDeviceFiles};
pub use error::{SystemError, SystemResult};
pub use preferences::{PreferenceStore, TomlPreferenceStore};
pub use settings::{restore_all, ActionResult, AudioSettingsGroup, ChangeOutcome, DisplaySettingsGroup, RestoreOutcome, RestoreReport};
pub use system_settings_service::{DevicePartsService, SystemSettingInfo, SystemSettingsService};
