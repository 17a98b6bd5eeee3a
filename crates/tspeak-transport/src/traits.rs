use futures_core::future::BoxFuture;
use serde_json::Value;

use crate::error::Result;
use crate::request::{GetRequest, PostRequest};

/// Future returned by every transport call: the decoded response body or a
/// transport failure.
pub type TransportFuture<'a> = BoxFuture<'a, Result<Value>>;

/// The HTTP collaborator the client calls into.
///
/// Each call is issued at most once per logical operation. Implementations
/// return the body for any HTTP status; only failures to complete the
/// exchange are errors. An error carries no body: anything received before
/// the failure is discarded. The response metadata is never inspected by
/// the client, so it is not part of the interface.
pub trait HttpTransport: Send + Sync {
    /// Perform a GET.
    fn get(&self, request: GetRequest) -> TransportFuture<'_>;

    /// Perform a form-encoded POST.
    fn post(&self, request: PostRequest) -> TransportFuture<'_>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for std::sync::Arc<T> {
    fn get(&self, request: GetRequest) -> TransportFuture<'_> {
        (**self).get(request)
    }

    fn post(&self, request: PostRequest) -> TransportFuture<'_> {
        (**self).post(request)
    }
}
