use std::time::Duration;

use serde::{Deserialize, Serialize};
use tspeak_channel::{RegistryConfig, DEFAULT_UPDATE_TIMEOUT};

use crate::error::Result;

/// Default API server.
pub const DEFAULT_SERVER: &str = "https://api.thingspeak.com";

/// Client options. Fixed once the client is constructed.
///
/// Deserializes from the camelCase option document
/// (`{"server": …, "useTimeoutMode": …, "updateTimeout": <ms>}`); any
/// missing option keeps its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to.
    pub server: String,
    /// Serialize and space updates per channel.
    pub use_timeout_mode: bool,
    /// Gap enforced between one update's completion and the next dispatch
    /// on the same channel.
    #[serde(with = "duration_millis")]
    pub update_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            use_timeout_mode: true,
            update_timeout: DEFAULT_UPDATE_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Parse a JSON option document, overlaying it on the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    pub fn with_timeout_mode(mut self, enabled: bool) -> Self {
        self.use_timeout_mode = enabled;
        self
    }

    pub fn with_update_timeout(mut self, timeout: Duration) -> Self {
        self.update_timeout = timeout;
        self
    }

    /// Server URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.server.trim_end_matches('/')
    }

    pub(crate) fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            use_timeout_mode: self.use_timeout_mode,
            update_timeout: self.update_timeout,
        }
    }
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
