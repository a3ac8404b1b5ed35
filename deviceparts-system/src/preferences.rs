//! Persisted preference values.
//!
//! Values live in a flat TOML table (`key = true`). The store is the single
//! owner of user intent: a value is kept even when the hardware behind it
//! is missing, so it comes back if the capability reappears.

use crate::error::{SystemError, SystemResult};
use deviceparts_core::utils;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use toml::{Table, Value};
use tracing::{debug, warn};

/// Boolean key-value store.
///
/// Reads never fail: an absent or unreadable value is reported as the
/// caller's default.
pub trait PreferenceStore: Send + Sync {
    fn get_bool(&self, key: &str, default: bool) -> bool;

    /// Records `value` for `key`. The in-memory value is updated even when
    /// persisting it fails.
    fn put_bool(&self, key: &str, value: bool) -> SystemResult<()>;

    fn contains(&self, key: &str) -> bool;
}

/// TOML file-backed [`PreferenceStore`].
///
/// Every `put_bool` rewrites the file atomically.
#[derive(Debug)]
pub struct TomlPreferenceStore {
    path: Option<PathBuf>,
    values: Mutex<Table>,
}

impl TomlPreferenceStore {
    /// Opens the store at `path`. A missing file yields an empty store; an
    /// unreadable or unparsable one does too, with a warning.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = if path.exists() {
            match utils::read_to_string(&path).map(|content| toml::from_str::<Table>(&content)) {
                Ok(Ok(table)) => {
                    debug!(path = %path.display(), entries = table.len(), "Loaded preferences");
                    table
                }
                Ok(Err(e)) => {
                    warn!(path = %path.display(), error = %e, "Preference file is not valid TOML, starting empty");
                    Table::new()
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Could not read preference file, starting empty");
                    Table::new()
                }
            }
        } else {
            debug!(path = %path.display(), "No preference file yet");
            Table::new()
        };
        Self {
            path: Some(path),
            values: Mutex::new(values),
        }
    }

    /// A store that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: Mutex::new(Table::new()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock(&self) -> MutexGuard<'_, Table> {
        // A poisoned table is still a consistent map of values.
        self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, table: &Table) -> SystemResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let content = toml::to_string(table).map_err(|e| SystemError::Store(e.to_string()))?;
        utils::write_string_atomically(path, &content)?;
        Ok(())
    }
}

/// Accepts native booleans plus the string forms older stores used.
fn value_as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Boolean(b) => Some(*b),
        Value::Integer(i) => Some(*i != 0),
        Value::String(s) => parse_bool_token(s),
        _ => None,
    }
}

/// Parses "true"/"false", "1"/"0" and "on"/"off", case-insensitively.
pub fn parse_bool_token(token: &str) -> Option<bool> {
    match token.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" => Some(true),
        "false" | "0" | "off" => Some(false),
        _ => None,
    }
}

impl PreferenceStore for TomlPreferenceStore {
    fn get_bool(&self, key: &str, default: bool) -> bool {
        let values = self.lock();
        match values.get(key) {
            None => default,
            Some(value) => value_as_bool(value).unwrap_or_else(|| {
                warn!(key, ?value, "Stored preference is not a boolean, using default");
                default
            }),
        }
    }

    fn put_bool(&self, key: &str, value: bool) -> SystemResult<()> {
        let mut values = self.lock();
        values.insert(key.to_string(), Value::Boolean(value));
        self.persist(&values)
    }

    fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn absent_values_use_default() {
        let store = TomlPreferenceStore::in_memory();
        assert!(!store.get_bool("incall_speaker", false));
        assert!(store.get_bool("incall_speaker", true));
        assert!(!store.contains("incall_speaker"));
    }

    #[test]
    fn put_persists_immediately_and_reopens() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/preferences.toml");

        let store = TomlPreferenceStore::open(&path);
        store.put_bool("dock_audio", true).unwrap();
        store.put_bool("incall_bt", false).unwrap();
        assert!(path.exists());

        let reopened = TomlPreferenceStore::open(&path);
        assert!(reopened.get_bool("dock_audio", false));
        assert!(!reopened.get_bool("incall_bt", true));
        assert!(reopened.contains("incall_bt"));
    }

    #[test]
    fn garbage_file_yields_empty_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.toml");
        fs::write(&path, "dock_audio = = yes").unwrap();

        let store = TomlPreferenceStore::open(&path);
        assert!(!store.contains("dock_audio"));
        store.put_bool("dock_audio", true).unwrap();
        assert!(TomlPreferenceStore::open(&path).get_bool("dock_audio", false));
    }

    #[rstest]
    #[case("incall_earpiece = \"1\"", true)]
    #[case("incall_earpiece = \"off\"", false)]
    #[case("incall_earpiece = 1", true)]
    #[case("incall_earpiece = \"maybe\"", false)]
    #[case("incall_earpiece = 1.5", false)]
    fn lenient_value_forms(#[case] content: &str, #[case] expected: bool) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.toml");
        fs::write(&path, content).unwrap();
        assert_eq!(TomlPreferenceStore::open(&path).get_bool("incall_earpiece", false), expected);
    }

    #[test]
    fn failed_persist_still_updates_memory() {
        let dir = TempDir::new().unwrap();
        // The parent "directory" is a regular file, so the atomic write fails.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let store = TomlPreferenceStore::open(blocker.join("preferences.toml"));

        assert!(store.put_bool("audioout_speaker", true).is_err());
        assert!(store.get_bool("audioout_speaker", false));
    }

    #[rstest]
    #[case("TRUE", Some(true))]
    #[case(" on ", Some(true))]
    #[case("0", Some(false))]
    #[case("Off", Some(false))]
    #[case("yes", None)]
    fn bool_tokens(#[case] token: &str, #[case] expected: Option<bool>) {
        assert_eq!(parse_bool_token(token), expected);
    }

    static_assertions::assert_impl_all!(TomlPreferenceStore: PreferenceStore, Send, Sync);
}
