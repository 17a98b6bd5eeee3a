use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;
use tspeak_transport::HttpTransport;

use crate::channel::{Channel, ChannelKeys, ChannelState};
use crate::config::RegistryConfig;
use crate::error::{ChannelError, Result};
use crate::scheduler::UpdateScheduler;

/// Channel-keyed registry of attached channels and their credentials.
pub struct ChannelRegistry {
    channels: HashMap<u64, Channel>,
    transport: Arc<dyn HttpTransport>,
    config: RegistryConfig,
}

impl ChannelRegistry {
    /// Create an empty registry with default config.
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_config(transport, RegistryConfig::default())
    }

    /// Create an empty registry with explicit config.
    pub fn with_config(transport: Arc<dyn HttpTransport>, config: RegistryConfig) -> Self {
        Self {
            channels: HashMap::new(),
            transport,
            config,
        }
    }

    /// Attach a channel, replacing any channel already attached under `id`.
    ///
    /// In throttled mode a fresh scheduler is started for the channel; a
    /// replaced channel's scheduler still drains whatever it had queued.
    /// On failure the registry is left untouched.
    pub fn attach(&mut self, id: u64, keys: Option<ChannelKeys>) -> Result<()> {
        if id == 0 {
            return Err(ChannelError::InvalidChannelId(id));
        }
        let keys = keys.ok_or(ChannelError::MissingKeys(id))?;
        if keys.is_empty() {
            return Err(ChannelError::NoCredentials(id));
        }

        let state = Arc::new(ChannelState::new());
        let scheduler = if self.config.use_timeout_mode {
            Some(UpdateScheduler::spawn(
                id,
                Arc::clone(&self.transport),
                Arc::clone(&state),
                self.config.update_timeout,
            )?)
        } else {
            None
        };

        let throttled = scheduler.is_some();
        let replaced = self
            .channels
            .insert(id, Channel::new(id, keys, state, scheduler))
            .is_some();
        info!(channel_id = id, throttled, replaced, "channel attached");
        Ok(())
    }

    /// Look up an attached channel.
    pub fn lookup(&self, id: u64) -> Option<&Channel> {
        self.channels.get(&id)
    }

    /// Check if a channel is attached.
    pub fn contains(&self, id: u64) -> bool {
        self.channels.contains_key(&id)
    }

    /// Ids of attached channels, ascending.
    pub fn channel_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.channels.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Get registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Transport shared with every scheduler this registry starts.
    pub fn transport(&self) -> &Arc<dyn HttpTransport> {
        &self.transport
    }
}
