//! Provides an interface to query and modify device settings by name.
use crate::broadcast::BroadcastPort;
use crate::device_file::DeviceFileIo;
use crate::error::{SystemError, SystemResult};
use crate::preferences::{parse_bool_token, PreferenceStore};
use crate::settings::catalog::{self, SettingDescriptor, SettingGroup};
use crate::settings::widget::PreferenceWidget;
use crate::settings::{restore_all, ActionResult, AudioSettingsGroup, DisplaySettingsGroup, RestoreReport};
use deviceparts_core::config::FeatureFlags;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, trace};

/// Information about a device setting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SystemSettingInfo {
    pub group: String,                        // "incall", "output", "display", "dock"
    pub name: String,                         // catalog key, e.g. "incall_speaker"
    pub summary: String,
    pub current_value: Option<String>,        // persisted value
    pub live_value: Option<String>,           // what the device file holds now, decoded when possible
    pub value_type: String,                   // always "boolean" for now
    pub possible_values: Option<Vec<String>>,
    pub is_supported: bool,                   // group bound and capability present
    pub is_readable: bool,
    pub is_writable: bool,                    // set_setting_value accepts it (group bound)
}

pub trait SystemSettingsService: Send + Sync {
    /// Gets the persisted value of a setting as "true" or "false".
    ///
    /// # Arguments
    /// * `setting_group` - The group the setting belongs to (e.g. "incall").
    /// * `setting_name` - The catalog key (e.g. "incall_speaker").
    fn get_setting_value(&self, setting_group: &str, setting_name: &str) -> SystemResult<String>;

    /// Changes a setting the same way a user flipping its switch would.
    ///
    /// `value` accepts true/false, 1/0 and on/off. A failed hardware write is
    /// not an error: the value is still persisted.
    fn set_setting_value(&self, setting_group: &str, setting_name: &str, value: &str) -> SystemResult<()>;

    /// Lists settings, optionally only those of one group.
    fn list_configurable_settings(&self, group_filter: Option<&str>) -> SystemResult<Vec<SystemSettingInfo>>;
}

struct BoundGroups {
    audio: AudioSettingsGroup,
    display: DisplaySettingsGroup,
}

/// [`SystemSettingsService`] over the DeviceParts catalog.
pub struct DevicePartsService {
    store: Arc<dyn PreferenceStore>,
    device_io: Arc<dyn DeviceFileIo>,
    broadcaster: Arc<dyn BroadcastPort>,
    groups: Mutex<BoundGroups>,
}

impl DevicePartsService {
    /// Builds and initializes every settings group.
    pub fn new(
        flags: FeatureFlags,
        store: Arc<dyn PreferenceStore>,
        device_io: Arc<dyn DeviceFileIo>,
        broadcaster: Arc<dyn BroadcastPort>,
    ) -> Self {
        let mut audio = AudioSettingsGroup::new(flags, store.clone(), device_io.clone(), broadcaster.clone());
        audio.initialize();
        let mut display = DisplaySettingsGroup::new(store.clone(), device_io.clone());
        display.initialize();
        Self {
            store,
            device_io,
            broadcaster,
            groups: Mutex::new(BoundGroups { audio, display }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BoundGroups> {
        self.groups.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lookup(setting_group: &str, setting_name: &str) -> SystemResult<&'static SettingDescriptor> {
        catalog::find(setting_name)
            .filter(|descriptor| descriptor.group.as_str() == setting_group)
            .ok_or_else(|| SystemError::UnknownSetting(format!("{}/{}", setting_group, setting_name)))
    }

    /// Looks a setting up by key alone.
    pub fn descriptor(key: &str) -> SystemResult<&'static SettingDescriptor> {
        catalog::find(key).ok_or_else(|| SystemError::UnknownSetting(key.to_string()))
    }

    /// Runs the boot restore with this service's collaborators.
    pub fn restore(&self) -> RestoreReport {
        restore_all(self.store.as_ref(), &self.device_io, self.broadcaster.as_ref())
    }

    /// Reads the device file behind `descriptor`. A token the encoding does
    /// not know is reported as-is.
    fn live_value(&self, descriptor: &SettingDescriptor) -> Option<String> {
        let path = descriptor.device_path()?;
        match self.device_io.read_value(path) {
            Ok(raw) => Some(descriptor.encoding.decode(&raw).map_or(raw, |value| value.to_string())),
            Err(e) => {
                trace!(key = descriptor.key, error = %e, "No live value");
                None
            }
        }
    }

    fn info_for(&self, groups: &BoundGroups, descriptor: &SettingDescriptor) -> SystemSettingInfo {
        let value = self.store.get_bool(descriptor.key, false);
        // A bound control accepts changes even when its device file is absent.
        let (bound, supported) = match descriptor.group {
            SettingGroup::Dock => (groups.audio.is_bound(descriptor.key), true),
            SettingGroup::Display => match groups.display.toggle(descriptor.key) {
                Some(t) => (true, t.widget().is_enabled()),
                None => (false, false),
            },
            SettingGroup::InCallAudio | SettingGroup::OutputAudio => (
                groups.audio.is_bound(descriptor.key),
                groups
                    .audio
                    .toggle(descriptor.key)
                    .map(|t| t.widget().is_enabled())
                    .unwrap_or(false),
            ),
        };
        SystemSettingInfo {
            group: descriptor.group.to_string(),
            name: descriptor.key.to_string(),
            summary: descriptor.summary.to_string(),
            current_value: Some(value.to_string()),
            live_value: self.live_value(descriptor),
            value_type: "boolean".to_string(),
            possible_values: Some(vec!["true".to_string(), "false".to_string()]),
            is_supported: supported,
            is_readable: true,
            is_writable: bound,
        }
    }
}

impl SystemSettingsService for DevicePartsService {
    fn get_setting_value(&self, setting_group: &str, setting_name: &str) -> SystemResult<String> {
        let descriptor = Self::lookup(setting_group, setting_name)?;
        Ok(self.store.get_bool(descriptor.key, false).to_string())
    }

    fn set_setting_value(&self, setting_group: &str, setting_name: &str, value: &str) -> SystemResult<()> {
        let descriptor = Self::lookup(setting_group, setting_name)?;
        let new_value = parse_bool_token(value).ok_or_else(|| SystemError::InvalidValue {
            key: descriptor.key.to_string(),
            value: value.to_string(),
        })?;

        let mut groups = self.lock();
        let result = match descriptor.group {
            SettingGroup::Display => groups.display.on_user_action(descriptor.key, new_value),
            _ => groups.audio.on_user_action(descriptor.key, new_value),
        };
        debug!(key = descriptor.key, new_value, ?result, "Setting change dispatched");
        match result {
            ActionResult::Handled => Ok(()),
            ActionResult::Unhandled => Err(SystemError::SettingUnavailable {
                key: descriptor.key.to_string(),
            }),
        }
    }

    fn list_configurable_settings(&self, group_filter: Option<&str>) -> SystemResult<Vec<SystemSettingInfo>> {
        if let Some(filter) = group_filter {
            if SettingGroup::parse(filter).is_none() {
                return Err(SystemError::UnknownSetting(format!("{}/*", filter)));
            }
        }
        let groups = self.lock();
        Ok(catalog::CATALOG
            .iter()
            .filter(|descriptor| group_filter.map_or(true, |g| descriptor.group.as_str() == g))
            .map(|descriptor| self.info_for(&groups, descriptor))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::StickyBus;
    use crate::preferences::TomlPreferenceStore;
    use crate::settings::catalog::{DOCK_ACTION, DOCK_EXTRA};
    use crate::settings::toggle::test_support::FakeDeviceFiles;
    use rstest::rstest;

    const INCALL_BT_NODE: &str = "/sys/class/samsung_audio/incall/bt";
    const OUT_SPEAKER_NODE: &str = "/sys/class/samsung_audio/output/speaker";

    fn service(flags: FeatureFlags, nodes: &[&str]) -> (DevicePartsService, Arc<TomlPreferenceStore>, Arc<StickyBus>) {
        let (svc, store, bus, _) = service_with_io(flags, nodes);
        (svc, store, bus)
    }

    fn service_with_io(
        flags: FeatureFlags,
        nodes: &[&str],
    ) -> (DevicePartsService, Arc<TomlPreferenceStore>, Arc<StickyBus>, Arc<FakeDeviceFiles>) {
        let store = Arc::new(TomlPreferenceStore::in_memory());
        let bus = Arc::new(StickyBus::in_process());
        let io = Arc::new(FakeDeviceFiles::with_nodes(nodes));
        let svc = DevicePartsService::new(flags, store.clone(), io.clone(), bus.clone());
        (svc, store, bus, io)
    }

    fn info<'a>(listing: &'a [SystemSettingInfo], name: &str) -> &'a SystemSettingInfo {
        listing.iter().find(|s| s.name == name).unwrap()
    }

    #[test]
    fn set_then_get() {
        let (svc, store, bus) = service(FeatureFlags::default(), &[]);
        svc.set_setting_value("dock", "dock_audio", "on").unwrap();

        assert_eq!(svc.get_setting_value("dock", "dock_audio").unwrap(), "true");
        assert!(store.get_bool("dock_audio", false));
        assert_eq!(bus.last(DOCK_ACTION).unwrap().extra(DOCK_EXTRA), Some("1"));
    }

    #[rstest]
    #[case("audio", "dock_audio")]
    #[case("dock", "volume")]
    #[case("incall", "dock_audio")]
    fn unknown_settings_are_rejected(#[case] group: &str, #[case] name: &str) {
        let (svc, _, _) = service(FeatureFlags::default(), &[]);
        assert!(matches!(svc.get_setting_value(group, name), Err(SystemError::UnknownSetting(_))));
    }

    #[test]
    fn invalid_value_is_rejected() {
        let (svc, store, _) = service(FeatureFlags::default(), &[]);
        let err = svc.set_setting_value("dock", "dock_audio", "maybe").unwrap_err();
        assert!(matches!(err, SystemError::InvalidValue { .. }));
        assert!(!store.contains("dock_audio"));
    }

    #[test]
    fn flagged_off_settings_are_unavailable() {
        let (svc, store, _) = service(FeatureFlags::default(), &["/sys/class/samsung_audio/incall/bt"]);
        let err = svc.set_setting_value("incall", "incall_bt", "1").unwrap_err();
        assert!(matches!(err, SystemError::SettingUnavailable { .. }));
        assert!(!store.contains("incall_bt"));
    }

    #[test]
    fn listing_reports_support() {
        let flags = FeatureFlags {
            has_incall_audio_tuning: true,
            has_output_audio_tuning: false,
        };
        let (svc, _, _) = service(flags, &["/sys/class/samsung_audio/incall/bt"]);

        let incall = svc.list_configurable_settings(Some("incall")).unwrap();
        assert_eq!(incall.len(), 4);
        let bt = info(&incall, "incall_bt");
        assert!(bt.is_supported && bt.is_writable);
        assert!(incall.iter().filter(|s| s.name != "incall_bt").all(|s| !s.is_supported));

        let all = svc.list_configurable_settings(None).unwrap();
        assert_eq!(all.len(), catalog::CATALOG.len());
        assert!(info(&all, "dock_audio").is_supported);
        assert!(svc.list_configurable_settings(Some("video")).is_err());
    }

    #[test]
    fn writability_matches_what_set_accepts() {
        let flags = FeatureFlags {
            has_incall_audio_tuning: true,
            has_output_audio_tuning: false,
        };
        let (svc, _, _) = service(flags, &[]);
        let all = svc.list_configurable_settings(None).unwrap();

        // Bound but without a device file: listed unsupported, yet writable.
        let speaker = info(&all, "incall_speaker");
        assert!(!speaker.is_supported);
        assert!(speaker.is_writable);
        assert!(svc.set_setting_value("incall", "incall_speaker", "1").is_ok());

        // Group flagged off: neither.
        let out = info(&all, "audioout_speaker");
        assert!(!out.is_supported);
        assert!(!out.is_writable);
        assert!(svc.set_setting_value("output", "audioout_speaker", "on").is_err());

        for setting in &all {
            let result = svc.set_setting_value(&setting.group, &setting.name, "0");
            assert_eq!(result.is_ok(), setting.is_writable, "{}", setting.name);
        }
    }

    #[test]
    fn listing_shows_live_device_values() {
        let flags = FeatureFlags {
            has_incall_audio_tuning: true,
            has_output_audio_tuning: true,
        };
        let (svc, _, _, io) = service_with_io(flags, &[INCALL_BT_NODE, OUT_SPEAKER_NODE]);
        svc.set_setting_value("incall", "incall_bt", "on").unwrap();
        io.contents
            .lock()
            .unwrap()
            .insert(OUT_SPEAKER_NODE.into(), "boost".to_string());

        let all = svc.list_configurable_settings(None).unwrap();
        assert_eq!(info(&all, "incall_bt").live_value.as_deref(), Some("true"));
        assert_eq!(info(&all, "audioout_speaker").live_value.as_deref(), Some("boost"));
        assert_eq!(info(&all, "incall_earpiece").live_value, None);
        assert_eq!(info(&all, "dock_audio").live_value, None);
    }

    static_assertions::assert_impl_all!(DevicePartsService: SystemSettingsService, Send, Sync);
}
