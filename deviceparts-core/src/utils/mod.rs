//! General Utilities for DeviceParts Core.
//!
//! # Submodules
//!
//! - [`fs`]: Filesystem helpers (directory creation, reading, plain and atomic writes).
//! - [`paths`]: XDG base directories, application directories and the system
//!   configuration path.
//!
//! Functions from [`paths`] are not re-exported; use
//! `deviceparts_core::utils::paths::get_app_data_dir()` and friends.

pub mod fs;
pub mod paths;

pub use fs::{ensure_dir_exists, read_to_string, write_string_atomically};
