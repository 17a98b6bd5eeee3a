/// Errors that can occur while attaching or driving channels.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// The channel id is not a positive integer.
    #[error("invalid channel id {0} for attach channel")]
    InvalidChannelId(u64),

    /// No key mapping was supplied.
    #[error("no keys given for attach channel {0}")]
    MissingKeys(u64),

    /// The key mapping carries neither a write key nor a read key.
    #[error("writeKey or readKey not given for attach channel {0}")]
    NoCredentials(u64),

    /// The channel's scheduler worker is gone and cannot accept updates.
    #[error("update scheduler for channel {0} is closed")]
    SchedulerClosed(u64),

    /// Throttled mode needs a Tokio runtime to host the scheduler worker.
    #[error("throttled mode requires a running tokio runtime")]
    NoRuntime,
}

pub type Result<T> = std::result::Result<T, ChannelError>;
