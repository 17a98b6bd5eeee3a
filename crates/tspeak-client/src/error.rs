use tspeak_channel::ChannelError;
use tspeak_transport::TransportError;

/// Errors surfaced by client operations.
///
/// Every validation error is raised before any request is sent.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Attaching the channel failed.
    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// No channel id was given.
    #[error("no channel id given for {0}")]
    MissingChannelId(&'static str),

    /// No update fields were given.
    #[error("no fields given for update")]
    MissingFields,

    /// The channel has not been attached to this client.
    #[error("channel {0} unknown/not attached")]
    ChannelNotAttached(u64),

    /// The attached channel has no write key.
    #[error("no writeKey for update on channel {0}")]
    NoWriteKey(u64),

    /// The update fields are not a key/value mapping.
    #[error("fields for update not an object")]
    InvalidFields,

    /// The field id is outside 1..=8.
    #[error("field id {0} is out of range")]
    FieldOutOfRange(u8),

    /// No user name was given.
    #[error("no user given for {0}")]
    MissingUser(&'static str),

    /// The HTTP exchange failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The update outcome was dropped before it was delivered.
    #[error("update on channel {0} was canceled before completing")]
    Canceled(u64),

    /// A configuration document could not be parsed.
    #[error("invalid client config: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
