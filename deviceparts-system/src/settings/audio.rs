//! Audio settings group.
//!
//! Binds the in-call and output tuning toggles (each group behind its build
//! flag, each toggle behind its own probe) plus the dock-audio switch, which
//! is always present and fans out as a sticky broadcast instead of touching
//! a device file.

use super::catalog::{self, SettingGroup, DOCK_ACTION, DOCK_AUDIO, DOCK_AUDIO_SETTING, DOCK_EXTRA};
use super::restore::{rebroadcast, RestoreOutcome};
use super::toggle::CapabilityGatedToggle;
use super::widget::{PreferenceWidget, SwitchPreference, TogglePreference};
use super::ActionResult;
use crate::broadcast::{BroadcastPort, StickyBroadcast};
use crate::device_file::DeviceFileIo;
use crate::preferences::PreferenceStore;
use deviceparts_core::config::FeatureFlags;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The dock-audio broadcast for `enabled`.
pub fn dock_audio_broadcast(enabled: bool) -> StickyBroadcast {
    StickyBroadcast::to_all_users(DOCK_ACTION).with_extra(DOCK_EXTRA, DOCK_AUDIO_SETTING.encoding.encode(enabled))
}

pub struct AudioSettingsGroup {
    flags: FeatureFlags,
    store: Arc<dyn PreferenceStore>,
    device_io: Arc<dyn DeviceFileIo>,
    broadcaster: Arc<dyn BroadcastPort>,
    incall: Vec<TogglePreference>,
    output: Vec<TogglePreference>,
    dock: SwitchPreference,
}

impl AudioSettingsGroup {
    pub fn new(
        flags: FeatureFlags,
        store: Arc<dyn PreferenceStore>,
        device_io: Arc<dyn DeviceFileIo>,
        broadcaster: Arc<dyn BroadcastPort>,
    ) -> Self {
        Self {
            flags,
            store,
            device_io,
            broadcaster,
            incall: Vec::new(),
            output: Vec::new(),
            dock: SwitchPreference::new(DOCK_AUDIO),
        }
    }

    fn bind_group(&self, group: SettingGroup) -> Vec<TogglePreference> {
        catalog::in_group(group)
            .filter_map(|descriptor| CapabilityGatedToggle::from_descriptor(descriptor, self.device_io.clone()))
            .map(|toggle| TogglePreference::bind(SwitchPreference::new(toggle.key()), toggle, self.store.as_ref()))
            .collect()
    }

    /// Binds the controls allowed by the feature flags. Toggles of a
    /// disabled group are neither created nor probed.
    pub fn initialize(&mut self) {
        self.incall = if self.flags.has_incall_audio_tuning {
            self.bind_group(SettingGroup::InCallAudio)
        } else {
            Vec::new()
        };
        self.output = if self.flags.has_output_audio_tuning {
            self.bind_group(SettingGroup::OutputAudio)
        } else {
            Vec::new()
        };
        self.dock.set_checked(self.store.get_bool(DOCK_AUDIO, false));
        self.dock.set_enabled(true);
        debug!(
            incall = self.incall.len(),
            output = self.output.len(),
            "Audio settings initialized"
        );
    }

    pub fn flags(&self) -> FeatureFlags {
        self.flags
    }

    pub fn dock(&self) -> &SwitchPreference {
        &self.dock
    }

    pub fn toggles(&self) -> impl Iterator<Item = &TogglePreference> {
        self.incall.iter().chain(self.output.iter())
    }

    pub fn toggle(&self, key: &str) -> Option<&TogglePreference> {
        self.toggles().find(|t| t.key() == key)
    }

    pub fn is_bound(&self, key: &str) -> bool {
        key == DOCK_AUDIO || self.toggle(key).is_some()
    }

    pub fn on_user_action(&mut self, key: &str, new_value: bool) -> ActionResult {
        if key == DOCK_AUDIO {
            if let Err(e) = self.store.put_bool(DOCK_AUDIO, new_value) {
                warn!(key, error = %e, "Failed to persist dock audio preference");
            }
            self.dock.set_checked(new_value);
            let broadcast = dock_audio_broadcast(new_value);
            info!(%broadcast, "Dock audio changed");
            self.broadcaster.send_sticky(broadcast);
            return ActionResult::Handled;
        }

        let store = self.store.clone();
        match self
            .incall
            .iter_mut()
            .chain(self.output.iter_mut())
            .find(|t| t.key() == key)
        {
            Some(toggle) => {
                toggle.on_user_toggle(new_value, store.as_ref());
                ActionResult::Handled
            }
            None => {
                debug!(key, "Audio settings ignored unknown key");
                ActionResult::Unhandled
            }
        }
    }

    /// Re-issues the dock-audio broadcast from the persisted value. Needs no
    /// bound controls.
    pub fn restore(store: &dyn PreferenceStore, broadcaster: &dyn BroadcastPort) -> RestoreOutcome {
        rebroadcast(&DOCK_AUDIO_SETTING, store, broadcaster)
    }
}
