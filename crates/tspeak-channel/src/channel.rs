use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::scheduler::UpdateScheduler;

/// Credentials supplied when attaching a channel.
///
/// Treated as opaque credential material and redacted in debug output.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelKeys {
    /// Authorizes updates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_key: Option<String>,
    /// Authorizes reads of a private channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_key: Option<String>,
}

impl ChannelKeys {
    /// Keys with only a write key.
    pub fn write(key: impl Into<String>) -> Self {
        Self {
            write_key: Some(key.into()),
            read_key: None,
        }
    }

    /// Keys with only a read key.
    pub fn read(key: impl Into<String>) -> Self {
        Self {
            write_key: None,
            read_key: Some(key.into()),
        }
    }

    /// Add or replace the write key.
    pub fn with_write_key(mut self, key: impl Into<String>) -> Self {
        self.write_key = Some(key.into());
        self
    }

    /// Add or replace the read key.
    pub fn with_read_key(mut self, key: impl Into<String>) -> Self {
        self.read_key = Some(key.into());
        self
    }

    pub fn write_key(&self) -> Option<&str> {
        self.write_key.as_deref()
    }

    pub fn read_key(&self) -> Option<&str> {
        self.read_key.as_deref()
    }

    /// True when neither key is present. An empty string is still present.
    pub fn is_empty(&self) -> bool {
        self.write_key.is_none() && self.read_key.is_none()
    }
}

impl fmt::Debug for ChannelKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelKeys")
            .field("write_key", &redacted(self.write_key.as_deref()))
            .field("read_key", &redacted(self.read_key.as_deref()))
            .finish()
    }
}

fn redacted(key: Option<&str>) -> Option<String> {
    key.map(|key| format!("<redacted:{} bytes>", key.len()))
}

/// Mutable per-channel state shared between the registry entry and its
/// scheduler worker.
#[derive(Debug, Default)]
pub struct ChannelState {
    // Milliseconds since the Unix epoch; 0 means never updated.
    last_update: AtomicU64,
}

impl ChannelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds since the Unix epoch of the last acknowledged update.
    pub fn last_update(&self) -> Option<u64> {
        match self.last_update.load(Ordering::Acquire) {
            0 => None,
            at => Some(at),
        }
    }

    /// Record an acknowledged update at `at_ms`. Never moves backwards.
    pub fn record_update(&self, at_ms: u64) {
        self.last_update.fetch_max(at_ms, Ordering::AcqRel);
    }

    /// Record an acknowledged update at the current wall-clock time.
    pub fn record_update_now(&self) {
        self.record_update(now_millis());
    }
}

pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}

/// A remote data channel attached to the client.
pub struct Channel {
    id: u64,
    keys: ChannelKeys,
    state: Arc<ChannelState>,
    scheduler: Option<UpdateScheduler>,
}

impl Channel {
    pub(crate) fn new(
        id: u64,
        keys: ChannelKeys,
        state: Arc<ChannelState>,
        scheduler: Option<UpdateScheduler>,
    ) -> Self {
        Self {
            id,
            keys,
            state,
            scheduler,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn keys(&self) -> &ChannelKeys {
        &self.keys
    }

    pub fn write_key(&self) -> Option<&str> {
        self.keys.write_key()
    }

    pub fn read_key(&self) -> Option<&str> {
        self.keys.read_key()
    }

    /// Shared state handle, used by immediate-mode dispatch.
    pub fn state(&self) -> &Arc<ChannelState> {
        &self.state
    }

    /// Milliseconds since the Unix epoch of the last acknowledged update.
    pub fn last_update(&self) -> Option<u64> {
        self.state.last_update()
    }

    /// The channel's scheduler, present only in throttled mode.
    pub fn scheduler(&self) -> Option<&UpdateScheduler> {
        self.scheduler.as_ref()
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("id", &self.id)
            .field("keys", &self.keys)
            .field("last_update", &self.state.last_update())
            .field("throttled", &self.scheduler.is_some())
            .finish()
    }
}
