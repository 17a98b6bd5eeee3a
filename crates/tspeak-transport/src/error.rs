/// Errors that can occur in HTTP transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request could not be built or sent, or the response body could
    /// not be read.
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// No response is available for the request (scripted transports).
    #[error("no response available for {0}")]
    Unavailable(String),

    /// The transport has been shut down.
    #[error("transport shut down")]
    Shutdown,
}

pub type Result<T> = std::result::Result<T, TransportError>;
