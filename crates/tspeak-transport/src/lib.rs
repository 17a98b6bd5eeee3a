//! HTTP transport abstraction for the tspeak channel client.
//!
//! Provides the request shapes the client produces and a single
//! injectable interface over the HTTP stack:
//! - [`GetRequest`] for feed and listing reads (optionally JSON-decoded)
//! - [`PostRequest`] for form-encoded channel updates
//!
//! This is the lowest layer of tspeak. Everything else calls through the
//! [`HttpTransport`] trait, so tests can substitute a [`mock`] transport
//! instead of patching the network.

pub mod error;
pub mod request;
pub mod traits;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "mock")]
pub mod mock;

pub use error::{Result, TransportError};
pub use request::{decode_body, Form, GetRequest, Headers, PostRequest, Query};
pub use traits::{HttpTransport, TransportFuture};

#[cfg(feature = "http")]
pub use http::ReqwestTransport;

#[cfg(feature = "mock")]
pub use mock::{MockTransport, RecordedRequest};
