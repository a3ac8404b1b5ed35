//! Device settings: catalog, toggle logic, setting groups and boot restore.

pub mod audio;
pub mod catalog;
pub mod display;
pub mod restore;
pub mod toggle;
pub mod widget;

pub use audio::{dock_audio_broadcast, AudioSettingsGroup};
pub use catalog::{SettingDescriptor, SettingGroup, SettingTarget, TokenEncoding, CATALOG};
pub use display::DisplaySettingsGroup;
pub use restore::{restore_all, RestoreOutcome, RestoreReport};
pub use toggle::{CapabilityGatedToggle, ChangeOutcome, FeatureCapability, SyncState};
pub use widget::{PreferenceWidget, SwitchPreference, TogglePreference};

/// Whether a group recognized a user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionResult {
    Handled,
    Unhandled,
}
