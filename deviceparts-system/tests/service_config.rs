use std::fs;
use std::sync::Arc;

use deviceparts_core::ConfigLoader;
use deviceparts_system::{
    DevicePartsService, RestoreOutcome, StickyBus, SysfsDeviceFiles, SystemError, SystemSettingsService,
    TomlPreferenceStore,
};
use tempfile::TempDir;

fn write_config(dir: &TempDir, incall: bool) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    let content = format!(
        r#"
[features]
has_incall_audio_tuning = {incall}
has_output_audio_tuning = true

[device]
sysfs_root = {root:?}

[storage]
preferences_file = {prefs:?}

[broadcast]
spool_dir = {spool:?}
"#,
        incall = incall,
        root = dir.path().join("root"),
        prefs = dir.path().join("preferences.toml"),
        spool = dir.path().join("broadcasts"),
    );
    fs::write(&path, content).unwrap();
    path
}

fn service_from(config_path: &std::path::Path) -> DevicePartsService {
    let config = ConfigLoader::load_file(config_path).unwrap();
    DevicePartsService::new(
        config.features,
        Arc::new(TomlPreferenceStore::open(&config.storage.preferences_file)),
        Arc::new(SysfsDeviceFiles::new(&config.device.sysfs_root)),
        Arc::new(StickyBus::new(config.broadcast.spool_dir.clone())),
    )
}

#[test]
fn configured_service_sets_and_restores() {
    let dir = TempDir::new().unwrap();
    let node = dir.path().join("root/sys/class/samsung_audio/output/speaker");
    fs::create_dir_all(node.parent().unwrap()).unwrap();
    fs::write(&node, "off").unwrap();
    let config_path = write_config(&dir, false);

    let service = service_from(&config_path);
    service.set_setting_value("output", "audioout_speaker", "on").unwrap();
    assert_eq!(fs::read_to_string(&node).unwrap(), "on");

    // Something else resets the node; a new process restores it.
    fs::write(&node, "off").unwrap();
    let report = service_from(&config_path).restore();
    assert_eq!(report.outcome("audioout_speaker"), Some(RestoreOutcome::Applied { value: true }));
    assert_eq!(fs::read_to_string(&node).unwrap(), "on");
    assert!(dir.path().join("broadcasts/com.cyanogenmod.settings.SamsungDock.json").exists());
}

#[test]
fn incall_settings_unavailable_when_flag_off() {
    let dir = TempDir::new().unwrap();
    let service = service_from(&write_config(&dir, false));

    let err = service.set_setting_value("incall", "incall_bt", "1").unwrap_err();
    assert!(matches!(err, SystemError::SettingUnavailable { .. }));
    assert_eq!(service.get_setting_value("incall", "incall_bt").unwrap(), "false");
}
