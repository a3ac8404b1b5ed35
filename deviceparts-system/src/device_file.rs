//! Kernel control node access.
//!
//! Every hardware knob DeviceParts manages is a sysfs attribute holding a
//! short text token. [`DeviceFileIo`] is the seam the settings logic talks
//! to; [`SysfsDeviceFiles`] is the real implementation, rooted at a
//! configurable prefix so a scratch directory can stand in for `/sys`.

use crate::error::{SystemError, SystemResult};
use deviceparts_core::utils;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Device file I/O as seen by capability probes and setting writes.
///
/// Paths are the absolute catalog paths (e.g.
/// `/sys/class/backlight/panel/auto_brightness`); implementations decide how
/// they map onto the real filesystem.
pub trait DeviceFileIo: Send + Sync {
    /// Whether the control node exists. Any error counts as "absent".
    fn file_exists(&self, path: &Path) -> bool;

    /// Writes `value` to the node. Nodes are never created.
    fn write_value(&self, path: &Path, value: &str) -> SystemResult<()>;

    /// Reads the node's current content, trimmed. Diagnostics only; setting
    /// logic never reads back.
    fn read_value(&self, path: &Path) -> SystemResult<String>;
}

#[derive(Debug, Clone)]
pub struct SysfsDeviceFiles {
    root: PathBuf,
}

impl SysfsDeviceFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps an absolute catalog path below the configured root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        let relative = path.strip_prefix("/").unwrap_or(path);
        self.root.join(relative)
    }
}

impl DeviceFileIo for SysfsDeviceFiles {
    fn file_exists(&self, path: &Path) -> bool {
        let resolved = self.resolve(path);
        match resolved.try_exists() {
            Ok(exists) => {
                trace!(path = %resolved.display(), exists, "Probed device file");
                exists
            }
            Err(e) => {
                debug!(path = %resolved.display(), error = %e, "Device file probe failed, treating as absent");
                false
            }
        }
    }

    fn write_value(&self, path: &Path, value: &str) -> SystemResult<()> {
        let resolved = self.resolve(path);
        let to_error = |source: std::io::Error| SystemError::DeviceWrite {
            path: resolved.clone(),
            value: value.to_string(),
            source,
        };
        // No `create`: a node that vanished must fail rather than be replaced
        // by a regular file.
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&resolved)
            .map_err(to_error)?;
        file.write_all(value.as_bytes()).map_err(to_error)?;
        file.flush().map_err(to_error)?;
        trace!(path = %resolved.display(), value, "Wrote device file");
        Ok(())
    }

    fn read_value(&self, path: &Path) -> SystemResult<String> {
        let content = utils::read_to_string(&self.resolve(path))?;
        Ok(content.trim().to_string())
    }
}
