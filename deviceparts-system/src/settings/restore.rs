//! Boot-time restore.
//!
//! Re-applies every persisted setting to its hardware target with no UI
//! involved. Only the capability probes gate it, not the build flags: a node
//! that exists gets its value back. Running it again changes nothing.

use super::catalog::{SettingDescriptor, SettingTarget, CATALOG};
use super::toggle::{CapabilityGatedToggle, ChangeOutcome};
use crate::broadcast::BroadcastPort;
use crate::device_file::DeviceFileIo;
use crate::preferences::PreferenceStore;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    Applied { value: bool },
    WriteFailed { value: bool },
    Unsupported,
    Broadcast { value: bool },
}

impl fmt::Display for RestoreOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestoreOutcome::Applied { value } => write!(f, "applied ({})", value),
            RestoreOutcome::WriteFailed { value } => write!(f, "write failed ({})", value),
            RestoreOutcome::Unsupported => f.write_str("unsupported"),
            RestoreOutcome::Broadcast { value } => write!(f, "broadcast ({})", value),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    entries: Vec<(&'static str, RestoreOutcome)>,
}

impl RestoreReport {
    pub fn entries(&self) -> &[(&'static str, RestoreOutcome)] {
        &self.entries
    }

    pub fn outcome(&self, key: &str) -> Option<RestoreOutcome> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, outcome)| *outcome)
    }

    pub fn write_failures(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, outcome)| matches!(outcome, RestoreOutcome::WriteFailed { .. }))
            .count()
    }
}

/// Re-issues the broadcast of `descriptor` from its persisted value.
pub(crate) fn rebroadcast(
    descriptor: &SettingDescriptor,
    store: &dyn PreferenceStore,
    broadcaster: &dyn BroadcastPort,
) -> RestoreOutcome {
    let value = store.get_bool(descriptor.key, false);
    match descriptor.broadcast(value) {
        Some(broadcast) => {
            broadcaster.send_sticky(broadcast);
            RestoreOutcome::Broadcast { value }
        }
        None => RestoreOutcome::Unsupported,
    }
}

/// Restores every catalog setting from `store`.
pub fn restore_all(
    store: &dyn PreferenceStore,
    device_io: &Arc<dyn DeviceFileIo>,
    broadcaster: &dyn BroadcastPort,
) -> RestoreReport {
    let mut report = RestoreReport::default();
    for descriptor in CATALOG.iter() {
        let outcome = match descriptor.target {
            SettingTarget::Broadcast { .. } => rebroadcast(descriptor, store, broadcaster),
            SettingTarget::DeviceFile { .. } => {
                let Some(mut toggle) = CapabilityGatedToggle::from_descriptor(descriptor, device_io.clone()) else {
                    continue;
                };
                let value = store.get_bool(descriptor.key, false);
                match toggle.sync_from_store(store) {
                    ChangeOutcome::Applied => RestoreOutcome::Applied { value },
                    ChangeOutcome::AppliedWithHardwareWriteFailure => RestoreOutcome::WriteFailed { value },
                    ChangeOutcome::NotApplied => RestoreOutcome::Unsupported,
                }
            }
        };
        report.entries.push((descriptor.key, outcome));
    }

    let failures = report.write_failures();
    if failures > 0 {
        warn!(failures, "Restore finished with device write failures");
    } else {
        info!(settings = report.entries.len(), "Restore finished");
    }
    report
}
