//! Filesystem Utilities.
//!
//! Helpers for the handful of filesystem operations DeviceParts performs on
//! regular files (preference store, broadcast spool, log directories). Each
//! function maps `std::io::Error` to [`CoreError::Filesystem`] so the failing
//! path travels with the error.
//!
//! Kernel control nodes are not written through these helpers: sysfs
//! attributes cannot be replaced by rename and must never be created, so the
//! device file adapter opens them for writing without `create`.

use crate::error::CoreError;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Ensures that a directory exists at the given path, creating it and any
/// missing parents.
///
/// # Errors
///
/// Returns [`CoreError::Filesystem`] if the path exists but is not a directory,
/// or if creation fails.
///
/// # Examples
///
/// ```no_run
/// # use deviceparts_core::utils::fs::ensure_dir_exists;
/// # use tempfile::tempdir;
/// let temp_dir = tempdir().unwrap();
/// let dir_path = temp_dir.path().join("broadcasts");
/// ensure_dir_exists(&dir_path).unwrap();
/// assert!(dir_path.is_dir());
/// ```
pub fn ensure_dir_exists(path: &Path) -> Result<(), CoreError> {
    if path.exists() {
        if !path.is_dir() {
            Err(CoreError::Filesystem {
                message: "Path exists but is not a directory".to_string(),
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "Path exists but is not a directory",
                ),
            })
        } else {
            Ok(())
        }
    } else {
        fs::create_dir_all(path).map_err(|e| CoreError::Filesystem {
            message: "Failed to create directory".to_string(),
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Reads the entire contents of a file into a string.
pub fn read_to_string(path: &Path) -> Result<String, CoreError> {
    fs::read_to_string(path).map_err(|e| CoreError::Filesystem {
        message: "Failed to read file to string".to_string(),
        path: path.to_path_buf(),
        source: e,
    })
}

/// Replaces `path` with `content` through a temporary file in the same
/// directory followed by a rename, so readers never observe a half-written file.
///
/// The parent directory is created when missing.
///
/// # Examples
///
/// ```no_run
/// # use deviceparts_core::utils::fs::{write_string_atomically, read_to_string};
/// # use tempfile::tempdir;
/// let dir = tempdir().unwrap();
/// let path = dir.path().join("preferences.toml");
/// write_string_atomically(&path, "dock_audio = true\n").unwrap();
/// assert_eq!(read_to_string(&path).unwrap(), "dock_audio = true\n");
/// ```
pub fn write_string_atomically(path: &Path, content: &str) -> Result<(), CoreError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    ensure_dir_exists(parent)?;

    let map_err = |message: &str, source: std::io::Error| CoreError::Filesystem {
        message: message.to_string(),
        path: path.to_path_buf(),
        source,
    };

    let mut temp = tempfile::NamedTempFile::new_in(parent)
        .map_err(|e| map_err("Failed to create temporary file", e))?;
    temp.write_all(content.as_bytes())
        .map_err(|e| map_err("Failed to write temporary file", e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| map_err("Failed to sync temporary file", e))?;
    temp.persist(path)
        .map_err(|e| map_err("Failed to move temporary file into place", e.error))?;
    Ok(())
}
