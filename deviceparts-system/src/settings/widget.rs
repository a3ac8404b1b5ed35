//! UI side of a setting.
//!
//! [`PreferenceWidget`] is all the settings logic needs from a switch in a
//! settings screen. [`SwitchPreference`] is a headless implementation used by
//! the CLI and the tests; [`TogglePreference`] glues a widget to its
//! [`CapabilityGatedToggle`] and to the store.

use super::toggle::{CapabilityGatedToggle, ChangeOutcome, SyncState};
use crate::preferences::PreferenceStore;
use tracing::warn;

pub trait PreferenceWidget {
    fn key(&self) -> &str;
    fn set_enabled(&mut self, enabled: bool);
    fn is_enabled(&self) -> bool;
    fn set_checked(&mut self, checked: bool);
    fn is_checked(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchPreference {
    key: String,
    enabled: bool,
    checked: bool,
}

impl SwitchPreference {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            enabled: true,
            checked: false,
        }
    }
}

impl PreferenceWidget for SwitchPreference {
    fn key(&self) -> &str {
        &self.key
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    fn is_checked(&self) -> bool {
        self.checked
    }
}

/// A bound device-file setting: widget, toggle logic and persistence.
#[derive(Debug)]
pub struct TogglePreference<W: PreferenceWidget = SwitchPreference> {
    widget: W,
    toggle: CapabilityGatedToggle,
}

impl<W: PreferenceWidget> TogglePreference<W> {
    /// Binds `widget` to `toggle` and initializes both from `store`.
    pub fn bind(mut widget: W, mut toggle: CapabilityGatedToggle, store: &dyn PreferenceStore) -> Self {
        toggle.initialize(&mut widget, store);
        Self { widget, toggle }
    }

    pub fn key(&self) -> &'static str {
        self.toggle.key()
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn toggle(&self) -> &CapabilityGatedToggle {
        &self.toggle
    }

    pub fn state(&self) -> SyncState {
        self.toggle.state()
    }

    /// Forwards a user flip to the toggle; an accepted value is persisted
    /// and shown as checked.
    pub fn on_user_toggle(&mut self, new_value: bool, store: &dyn PreferenceStore) -> ChangeOutcome {
        let outcome = self.toggle.on_change(new_value);
        if outcome.is_accepted() {
            if let Err(e) = store.put_bool(self.toggle.key(), new_value) {
                warn!(key = self.toggle.key(), error = %e, "Failed to persist preference");
            }
            self.widget.set_checked(new_value);
        }
        outcome
    }
}
