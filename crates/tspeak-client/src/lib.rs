//! Client for the ThingSpeak channel HTTP API.
//!
//! This is the "just works" layer. Attach channels with their keys, push
//! field updates, and read feeds, status updates, and user listings.
//! Updates to one channel are throttled by its scheduler unless the client
//! is configured for immediate dispatch.

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod update;

pub use client::ThingSpeakClient;
pub use config::{ClientConfig, DEFAULT_SERVER};
pub use endpoint::{FieldId, API_KEY_HEADER, FIELD_COUNT};
pub use error::{ClientError, Result};
pub use update::{fields_to_form, PendingUpdate};

pub use tspeak_channel::{ChannelError, ChannelKeys, DEFAULT_UPDATE_TIMEOUT};
pub use tspeak_transport::{HttpTransport, Query, TransportError};
