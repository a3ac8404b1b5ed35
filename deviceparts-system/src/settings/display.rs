//! Display settings group: backlight auto-brightness.
//!
//! Not behind a build flag; the panel's own control node is the only gate.

use super::catalog::{self, SettingGroup};
use super::toggle::CapabilityGatedToggle;
use super::widget::{SwitchPreference, TogglePreference};
use super::ActionResult;
use crate::device_file::DeviceFileIo;
use crate::preferences::PreferenceStore;
use std::sync::Arc;

pub struct DisplaySettingsGroup {
    store: Arc<dyn PreferenceStore>,
    device_io: Arc<dyn DeviceFileIo>,
    toggles: Vec<TogglePreference>,
}

impl DisplaySettingsGroup {
    pub fn new(store: Arc<dyn PreferenceStore>, device_io: Arc<dyn DeviceFileIo>) -> Self {
        Self {
            store,
            device_io,
            toggles: Vec::new(),
        }
    }

    pub fn initialize(&mut self) {
        let store = self.store.clone();
        self.toggles = catalog::in_group(SettingGroup::Display)
            .filter_map(|descriptor| CapabilityGatedToggle::from_descriptor(descriptor, self.device_io.clone()))
            .map(|toggle| TogglePreference::bind(SwitchPreference::new(toggle.key()), toggle, store.as_ref()))
            .collect();
    }

    pub fn toggles(&self) -> impl Iterator<Item = &TogglePreference> {
        self.toggles.iter()
    }

    pub fn toggle(&self, key: &str) -> Option<&TogglePreference> {
        self.toggles.iter().find(|t| t.key() == key)
    }

    pub fn on_user_action(&mut self, key: &str, new_value: bool) -> ActionResult {
        match self.toggles.iter_mut().find(|t| t.key() == key) {
            Some(toggle) => {
                toggle.on_user_toggle(new_value, self.store.as_ref());
                ActionResult::Handled
            }
            None => ActionResult::Unhandled,
        }
    }
}
