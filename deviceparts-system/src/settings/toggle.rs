//! Capability-gated toggles.
//!
//! A toggle mirrors one persisted boolean onto one device file, but only
//! when the device file exists. Support is probed once, at initialization,
//! and not re-evaluated for the rest of the session.

use super::catalog::{SettingDescriptor, TokenEncoding};
use super::widget::PreferenceWidget;
use crate::device_file::DeviceFileIo;
use crate::preferences::PreferenceStore;
use once_cell::sync::OnceCell;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A runtime check for one hardware sub-target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureCapability {
    pub setting_key: &'static str,
    pub sub_target: &'static str,
    pub path: &'static Path,
}

impl FeatureCapability {
    pub fn probe(&self, io: &dyn DeviceFileIo) -> bool {
        let present = io.file_exists(self.path);
        debug!(
            key = self.setting_key,
            sub_target = self.sub_target,
            path = %self.path.display(),
            present,
            "Probed capability"
        );
        present
    }
}

/// Where a setting stands with respect to its device file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Not probed yet, or the last write did not land.
    Unknown,
    /// The device file is absent for this session.
    Unsupported,
    /// The device file holds the encoding of the last value written.
    Synced,
}

/// Result of a change. Every variant means the new value was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    Applied,
    AppliedWithHardwareWriteFailure,
    /// Capability absent: nothing was written.
    NotApplied,
}

impl ChangeOutcome {
    pub fn is_accepted(self) -> bool {
        // Hardware failures never veto a change.
        true
    }
}

pub struct CapabilityGatedToggle {
    capability: FeatureCapability,
    encoding: TokenEncoding,
    io: Arc<dyn DeviceFileIo>,
    supported: OnceCell<bool>,
    state: SyncState,
}

impl fmt::Debug for CapabilityGatedToggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityGatedToggle")
            .field("capability", &self.capability)
            .field("encoding", &self.encoding)
            .field("supported", &self.supported)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl CapabilityGatedToggle {
    pub fn new(capability: FeatureCapability, encoding: TokenEncoding, io: Arc<dyn DeviceFileIo>) -> Self {
        Self {
            capability,
            encoding,
            io,
            supported: OnceCell::new(),
            state: SyncState::Unknown,
        }
    }

    /// Builds the toggle for a device-file setting; `None` for broadcast ones.
    pub fn from_descriptor(descriptor: &'static SettingDescriptor, io: Arc<dyn DeviceFileIo>) -> Option<Self> {
        let path = descriptor.device_path()?;
        let capability = FeatureCapability {
            setting_key: descriptor.key,
            sub_target: descriptor.sub_target,
            path,
        };
        Some(Self::new(capability, descriptor.encoding, io))
    }

    pub fn key(&self) -> &'static str {
        self.capability.setting_key
    }

    pub fn device_path(&self) -> &'static Path {
        self.capability.path
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Whether the device file exists. The first call checks the file and
    /// the answer holds for the rest of the session; never writes.
    pub fn is_supported(&self) -> bool {
        *self
            .supported
            .get_or_init(|| self.capability.probe(self.io.as_ref()))
    }

    fn probe_once(&mut self) -> bool {
        let supported = self.is_supported();
        if !supported {
            self.state = SyncState::Unsupported;
        }
        supported
    }

    /// Probes the capability and mirrors the persisted value and support onto
    /// `widget`. The device file is left untouched.
    pub fn initialize(&mut self, widget: &mut dyn PreferenceWidget, store: &dyn PreferenceStore) {
        let supported = self.probe_once();
        let value = store.get_bool(self.key(), false);
        widget.set_checked(value);
        widget.set_enabled(supported);
        debug!(key = self.key(), value, supported, "Initialized toggle");
    }

    /// Writes the encoding of `new_value` when supported. Always accepted.
    pub fn on_change(&mut self, new_value: bool) -> ChangeOutcome {
        if !self.probe_once() {
            debug!(key = self.key(), new_value, "Capability absent, skipping device write");
            return ChangeOutcome::NotApplied;
        }
        let token = self.encoding.encode(new_value);
        match self.io.write_value(self.capability.path, token) {
            Ok(()) => {
                self.state = SyncState::Synced;
                info!(key = self.key(), value = token, "Applied setting");
                ChangeOutcome::Applied
            }
            Err(e) => {
                self.state = SyncState::Unknown;
                warn!(key = self.key(), value = token, error = %e, "Device write failed, value kept");
                ChangeOutcome::AppliedWithHardwareWriteFailure
            }
        }
    }

    /// Re-applies the persisted value, as done at boot.
    pub fn sync_from_store(&mut self, store: &dyn PreferenceStore) -> ChangeOutcome {
        let value = store.get_bool(self.key(), false);
        self.on_change(value)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::device_file::DeviceFileIo;
    use crate::error::{SystemError, SystemResult};
    use std::collections::{HashMap, HashSet};
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    /// In-memory device files recording every probe and write.
    #[derive(Debug, Default)]
    pub struct FakeDeviceFiles {
        pub present: Mutex<HashSet<PathBuf>>,
        pub failing: Mutex<HashSet<PathBuf>>,
        pub contents: Mutex<HashMap<PathBuf, String>>,
        pub probes: Mutex<Vec<PathBuf>>,
        pub writes: Mutex<Vec<(PathBuf, String)>>,
    }

    impl FakeDeviceFiles {
        pub fn with_nodes(paths: &[&str]) -> Self {
            let fake = Self::default();
            fake.present.lock().unwrap().extend(paths.iter().map(PathBuf::from));
            fake
        }

        pub fn fail_writes_to(&self, path: &str) {
            self.failing.lock().unwrap().insert(PathBuf::from(path));
        }

        pub fn content(&self, path: &str) -> Option<String> {
            self.contents.lock().unwrap().get(Path::new(path)).cloned()
        }

        pub fn probe_count(&self) -> usize {
            self.probes.lock().unwrap().len()
        }

        pub fn write_count(&self) -> usize {
            self.writes.lock().unwrap().len()
        }
    }

    impl DeviceFileIo for FakeDeviceFiles {
        fn file_exists(&self, path: &Path) -> bool {
            self.probes.lock().unwrap().push(path.to_path_buf());
            self.present.lock().unwrap().contains(path)
        }

        fn write_value(&self, path: &Path, value: &str) -> SystemResult<()> {
            self.writes.lock().unwrap().push((path.to_path_buf(), value.to_string()));
            if self.failing.lock().unwrap().contains(path) {
                return Err(SystemError::DeviceWrite {
                    path: path.to_path_buf(),
                    value: value.to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::Other, "EIO"),
                });
            }
            self.contents.lock().unwrap().insert(path.to_path_buf(), value.to_string());
            Ok(())
        }

        fn read_value(&self, path: &Path) -> SystemResult<String> {
            self.contents
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| SystemError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "absent")))
        }
    }
}
