// DeviceParts CLI - boot restore and headless access to device settings

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use deviceparts_core::{init_logging, init_minimal_logging, ConfigLoader, CoreConfig};
use deviceparts_system::{
    DevicePartsService, SystemError, SystemSettingsService, StickyBus, SysfsDeviceFiles, TomlPreferenceStore,
};
use tracing::{debug, error};

const EXIT_ERROR: u8 = 1;

#[derive(Parser)]
#[command(name = "deviceparts")]
#[command(about = "Device-specific hardware tuning settings")]
#[command(version)]
struct Cli {
    /// Configuration file to use instead of the system/user overlay
    #[arg(long, global = true, env = "DEVICEPARTS_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Re-apply every persisted setting to the hardware (boot hook)
    Restore,

    /// List settings with their persisted value, device file value and support
    #[command(after_help = "\
Examples:
  deviceparts list
  deviceparts list --group incall")]
    List {
        /// Only list one group (incall, output, display, dock)
        #[arg(long, short = 'g')]
        group: Option<String>,
    },

    /// Print the persisted value of a setting
    Get {
        /// Setting key, e.g. incall_speaker
        key: String,
    },

    /// Change a setting as if its switch had been flipped
    #[command(after_help = "\
Examples:
  deviceparts set dock_audio on
  deviceparts set bl_auto_brightness 0")]
    Set {
        /// Setting key, e.g. audioout_headphone
        key: String,

        /// true/false, 1/0 or on/off
        value: String,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<CoreConfig, deviceparts_core::CoreError> {
    match path {
        Some(path) => ConfigLoader::load_file(path),
        None => ConfigLoader::load(),
    }
}

fn build_service(config: &CoreConfig) -> DevicePartsService {
    let store = Arc::new(TomlPreferenceStore::open(&config.storage.preferences_file));
    let device_io = Arc::new(SysfsDeviceFiles::new(&config.device.sysfs_root));
    let bus = Arc::new(StickyBus::new(config.broadcast.spool_dir.clone()));
    DevicePartsService::new(config.features, store, device_io, bus)
}

fn run(command: Commands, service: &DevicePartsService) -> Result<(), SystemError> {
    match command {
        Commands::Restore => {
            let report = service.restore();
            for (key, outcome) in report.entries() {
                println!("{:<20} {}", key, outcome);
            }
        }
        Commands::List { group } => {
            for info in service.list_configurable_settings(group.as_deref())? {
                println!(
                    "{:<8} {:<20} {:<6} {:<6} {:<12} {}",
                    info.group,
                    info.name,
                    info.current_value.as_deref().unwrap_or("-"),
                    info.live_value.as_deref().unwrap_or("-"),
                    if info.is_supported { "supported" } else { "unsupported" },
                    info.summary
                );
            }
        }
        Commands::Get { key } => {
            let descriptor = DevicePartsService::descriptor(&key)?;
            println!("{}", service.get_setting_value(descriptor.group.as_str(), descriptor.key)?);
        }
        Commands::Set { key, value } => {
            let descriptor = DevicePartsService::descriptor(&key)?;
            service.set_setting_value(descriptor.group.as_str(), descriptor.key, &value)?;
            println!("{}", service.get_setting_value(descriptor.group.as_str(), descriptor.key)?);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            init_minimal_logging();
            error!("Configuration error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    if let Err(e) = init_logging(&config.logging, false) {
        init_minimal_logging();
        error!("Falling back to minimal logging: {}", e);
    }
    debug!(features = ?config.features, sysfs_root = %config.device.sysfs_root.display(), "DeviceParts starting");

    let service = build_service(&config);
    match run(cli.command, &service) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
