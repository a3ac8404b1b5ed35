//! Sticky, system-wide notifications.
//!
//! A sticky broadcast keeps its last payload per action: a subscriber that
//! arrives after the send still observes it. In-process this is a
//! `tokio::sync::watch` channel per action; other processes read the JSON
//! copy kept in the optional spool directory.

use deviceparts_core::utils;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Audience of a broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BroadcastTarget {
    AllUsers,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickyBroadcast {
    pub action: String,
    pub extras: BTreeMap<String, String>,
    pub target: BroadcastTarget,
}

impl StickyBroadcast {
    pub fn to_all_users(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            extras: BTreeMap::new(),
            target: BroadcastTarget::AllUsers,
        }
    }

    pub fn with_extra(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(name.into(), value.into());
        self
    }

    pub fn extra(&self, name: &str) -> Option<&str> {
        self.extras.get(name).map(String::as_str)
    }
}

impl fmt::Display for StickyBroadcast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.action)?;
        for (name, value) in &self.extras {
            write!(f, " {}={}", name, value)?;
        }
        Ok(())
    }
}

/// Outbound port for sticky broadcasts.
///
/// Fire-and-forget: delivery problems are the implementation's to log.
pub trait BroadcastPort: Send + Sync {
    fn send_sticky(&self, broadcast: StickyBroadcast);
}

type Slot = watch::Sender<Option<StickyBroadcast>>;

/// Default [`BroadcastPort`].
pub struct StickyBus {
    channels: Mutex<HashMap<String, Slot>>,
    spool_dir: Option<PathBuf>,
}

impl fmt::Debug for StickyBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StickyBus").field("spool_dir", &self.spool_dir).finish_non_exhaustive()
    }
}

impl StickyBus {
    pub fn new(spool_dir: Option<PathBuf>) -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
            spool_dir,
        }
    }

    pub fn in_process() -> Self {
        Self::new(None)
    }

    pub fn spool_dir(&self) -> Option<&Path> {
        self.spool_dir.as_deref()
    }

    fn with_slot<R>(&self, action: &str, f: impl FnOnce(&Slot) -> R) -> R {
        let mut channels = self.channels.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let slot = channels
            .entry(action.to_string())
            .or_insert_with(|| watch::channel(None).0);
        f(slot)
    }

    /// Subscribes to `action`. The receiver immediately holds the last
    /// payload sent, if any.
    pub fn subscribe(&self, action: &str) -> watch::Receiver<Option<StickyBroadcast>> {
        self.with_slot(action, |slot| slot.subscribe())
    }

    /// Last payload sent for `action`.
    pub fn last(&self, action: &str) -> Option<StickyBroadcast> {
        self.with_slot(action, |slot| slot.borrow().clone())
    }

    /// Spool file holding the last payload for `action`.
    pub fn spool_path(&self, action: &str) -> Option<PathBuf> {
        self.spool_dir.as_ref().map(|dir| dir.join(format!("{}.json", action)))
    }

    /// Reads a spooled payload back, as an out-of-process subscriber would.
    pub fn read_spooled(spool_dir: &Path, action: &str) -> Option<StickyBroadcast> {
        let path = spool_dir.join(format!("{}.json", action));
        let content = utils::read_to_string(&path).ok()?;
        serde_json::from_str(&content)
            .map_err(|e| warn!(path = %path.display(), error = %e, "Ignoring malformed spool file"))
            .ok()
    }

    fn spool(&self, broadcast: &StickyBroadcast) {
        let Some(path) = self.spool_path(&broadcast.action) else {
            return;
        };
        let json = match serde_json::to_string_pretty(broadcast) {
            Ok(json) => json,
            Err(e) => {
                warn!(action = %broadcast.action, error = %e, "Failed to serialize sticky broadcast");
                return;
            }
        };
        if let Err(e) = utils::write_string_atomically(&path, &json) {
            warn!(path = %path.display(), error = %e, "Failed to spool sticky broadcast");
        }
    }
}

impl BroadcastPort for StickyBus {
    fn send_sticky(&self, broadcast: StickyBroadcast) {
        debug!(%broadcast, "Sending sticky broadcast");
        self.spool(&broadcast);
        let receivers = self.with_slot(&broadcast.action, |slot| {
            slot.send_replace(Some(broadcast.clone()));
            slot.receiver_count()
        });
        debug!(action = %broadcast.action, receivers, "Sticky broadcast retained");
    }
}
