use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;
use tracing::debug;
use tspeak_channel::{
    dispatch_update, Channel, ChannelError, ChannelKeys, ChannelRegistry, ChannelState,
    UpdateTask,
};
use tspeak_transport::{GetRequest, Headers, HttpTransport, PostRequest, Query};

use crate::config::ClientConfig;
use crate::endpoint::{self, FieldId, API_KEY_HEADER};
use crate::error::{ClientError, Result};
use crate::update::{fields_to_form, PendingUpdate};

/// Client for the channel API.
///
/// Channels must be attached before they can be updated; reads work on
/// any channel id and add the read key of an attached private channel.
pub struct ThingSpeakClient {
    config: ClientConfig,
    transport: Arc<dyn HttpTransport>,
    registry: RwLock<ChannelRegistry>,
}

impl ThingSpeakClient {
    /// Create a client that talks HTTP through reqwest.
    #[cfg(feature = "http")]
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, Arc::new(tspeak_transport::ReqwestTransport::new()))
    }

    /// Create a client over an explicit transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let registry =
            ChannelRegistry::with_config(Arc::clone(&transport), config.registry_config());
        Self {
            config,
            transport,
            registry: RwLock::new(registry),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Attach a channel with its keys, replacing any channel with the same id.
    ///
    /// In throttled mode this starts the channel's update scheduler, which
    /// requires a running Tokio runtime.
    pub fn attach_channel(&self, id: u64, keys: Option<ChannelKeys>) -> Result<()> {
        self.registry_mut().attach(id, keys)?;
        Ok(())
    }

    /// Check if a channel is attached.
    pub fn is_attached(&self, id: u64) -> bool {
        self.registry().contains(id)
    }

    /// Ids of attached channels, ascending.
    pub fn channel_ids(&self) -> Vec<u64> {
        self.registry().channel_ids()
    }

    /// Keys of an attached channel.
    pub fn channel_keys(&self, id: u64) -> Option<ChannelKeys> {
        self.registry().lookup(id).map(|channel| channel.keys().clone())
    }

    /// Milliseconds since the Unix epoch of the channel's last acknowledged
    /// update.
    pub fn last_update(&self, id: u64) -> Option<u64> {
        self.registry().lookup(id).and_then(Channel::last_update)
    }

    /// Updates queued or in flight on the channel's scheduler.
    ///
    /// `None` when the channel is not attached or the client dispatches
    /// updates immediately.
    pub fn pending_updates(&self, id: u64) -> Option<usize> {
        self.registry()
            .lookup(id)
            .and_then(Channel::scheduler)
            .map(|scheduler| scheduler.pending())
    }

    /// Push field values to an attached channel.
    ///
    /// Validation happens here, before anything is sent. On success the
    /// update is already queued (throttled mode) or in flight (immediate
    /// mode); the returned handle resolves to the response body.
    pub fn update_channel(&self, id: u64, fields: &Value) -> Result<PendingUpdate> {
        if id == 0 {
            return Err(ClientError::MissingChannelId("update_channel"));
        }
        if fields.is_null() {
            return Err(ClientError::MissingFields);
        }

        let registry = self.registry();
        let channel = registry
            .lookup(id)
            .ok_or(ClientError::ChannelNotAttached(id))?;
        let write_key = channel.write_key().ok_or(ClientError::NoWriteKey(id))?;
        let fields = fields.as_object().ok_or(ClientError::InvalidFields)?;

        let mut headers = Headers::new();
        headers.insert(API_KEY_HEADER.to_string(), write_key.to_string());
        let request = PostRequest {
            url: endpoint::update(self.config.base_url()),
            form: fields_to_form(fields),
            headers,
        };

        let (task, completion) = UpdateTask::new(id, request);
        match channel.scheduler() {
            Some(scheduler) => scheduler.enqueue(task)?,
            None => self.dispatch_now(task, Arc::clone(channel.state()))?,
        }
        Ok(PendingUpdate::new(id, completion))
    }

    /// Read a channel's feed.
    pub async fn get_channel_feeds(&self, id: u64, query: Option<Query>) -> Result<Value> {
        let id = require_channel(id, "get_channel_feeds")?;
        let uri = endpoint::channel_feed(self.config.base_url(), id);
        self.get_channel_scoped(id, uri, query).await
    }

    /// Read the last entry of a channel's feed.
    pub async fn get_last_entry_in_channel_feed(
        &self,
        id: u64,
        query: Option<Query>,
    ) -> Result<Value> {
        let id = require_channel(id, "get_last_entry_in_channel_feed")?;
        let uri = endpoint::channel_feed_last(self.config.base_url(), id);
        self.get_channel_scoped(id, uri, query).await
    }

    /// Read the feed of one channel field (`1..=8`).
    pub async fn get_field_feed(&self, id: u64, field: u8, query: Option<Query>) -> Result<Value> {
        let id = require_channel(id, "get_field_feed")?;
        let field = FieldId::new(field)?;
        let uri = endpoint::field_feed(self.config.base_url(), id, field);
        self.get_channel_scoped(id, uri, query).await
    }

    /// Read the last entry of one channel field (`1..=8`).
    pub async fn get_last_entry_in_field_feed(
        &self,
        id: u64,
        field: u8,
        query: Option<Query>,
    ) -> Result<Value> {
        let id = require_channel(id, "get_last_entry_in_field_feed")?;
        let field = FieldId::new(field)?;
        let uri = endpoint::field_feed_last(self.config.base_url(), id, field);
        self.get_channel_scoped(id, uri, query).await
    }

    /// Read a channel's status updates.
    pub async fn get_status_updates(&self, id: u64, query: Option<Query>) -> Result<Value> {
        let id = require_channel(id, "get_status_updates")?;
        let uri = endpoint::status_updates(self.config.base_url(), id);
        self.get_channel_scoped(id, uri, query).await
    }

    /// List public channels.
    pub async fn list_public_channels(&self, query: Option<Query>) -> Result<Value> {
        let uri = endpoint::public_channels(self.config.base_url());
        self.get(uri, query).await
    }

    /// Read a user's profile.
    pub async fn list_user_info(&self, user: &str, query: Option<Query>) -> Result<Value> {
        let user = require_user(user, "list_user_info")?;
        let uri = endpoint::user_info(self.config.base_url(), user);
        self.get(uri, query).await
    }

    /// List a user's channels.
    pub async fn list_user_channels(&self, user: &str, query: Option<Query>) -> Result<Value> {
        let user = require_user(user, "list_user_channels")?;
        let uri = endpoint::user_channels(self.config.base_url(), user);
        self.get(uri, query).await
    }

    async fn get_channel_scoped(&self, id: u64, uri: String, query: Option<Query>) -> Result<Value> {
        let query = self.with_read_key(id, query);
        self.get(uri, query).await
    }

    async fn get(&self, uri: String, query: Option<Query>) -> Result<Value> {
        debug!(uri = %uri, has_query = query.is_some(), "GET");
        let body = self.transport.get(GetRequest::json(uri, query)).await?;
        Ok(body)
    }

    // An attached channel's read key always wins over a caller-supplied `key`.
    fn with_read_key(&self, id: u64, query: Option<Query>) -> Option<Query> {
        let registry = self.registry();
        match registry.lookup(id).and_then(Channel::read_key) {
            Some(read_key) => {
                let mut query = query.unwrap_or_default();
                query.insert("key".to_string(), read_key.to_string());
                Some(query)
            }
            None => query,
        }
    }

    fn dispatch_now(&self, task: UpdateTask, state: Arc<ChannelState>) -> Result<()> {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| ChannelError::NoRuntime)?;
        let transport = Arc::clone(&self.transport);
        runtime.spawn(async move {
            let (channel_id, request, responder) = task.into_parts();
            let outcome = dispatch_update(transport.as_ref(), &state, channel_id, request).await;
            if !responder.deliver(outcome) {
                debug!(channel_id, "update outcome discarded");
            }
        });
        Ok(())
    }

    fn registry(&self) -> RwLockReadGuard<'_, ChannelRegistry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn registry_mut(&self) -> RwLockWriteGuard<'_, ChannelRegistry> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ThingSpeakClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThingSpeakClient")
            .field("config", &self.config)
            .field("channels", &self.channel_ids())
            .finish()
    }
}

fn require_channel(id: u64, operation: &'static str) -> Result<u64> {
    if id == 0 {
        Err(ClientError::MissingChannelId(operation))
    } else {
        Ok(id)
    }
}

fn require_user<'a>(user: &'a str, operation: &'static str) -> Result<&'a str> {
    if user.trim().is_empty() {
        Err(ClientError::MissingUser(operation))
    } else {
        Ok(user)
    }
}
