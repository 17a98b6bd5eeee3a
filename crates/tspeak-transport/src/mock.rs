//! Recording transport for tests.
//!
//! Every request is captured with the Tokio clock reading at dispatch, so
//! tests running on paused time can assert request spacing exactly.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;

use crate::error::{Result, TransportError};
use crate::request::{GetRequest, PostRequest};
use crate::traits::{HttpTransport, TransportFuture};

/// A request observed by [`MockTransport`].
#[derive(Debug, Clone)]
pub enum RecordedRequest {
    Get { request: GetRequest, at: Instant },
    Post { request: PostRequest, at: Instant },
}

impl RecordedRequest {
    /// Clock reading when the request was dispatched.
    pub fn at(&self) -> Instant {
        match self {
            RecordedRequest::Get { at, .. } | RecordedRequest::Post { at, .. } => *at,
        }
    }
}

#[derive(Default)]
struct MockState {
    requests: Vec<RecordedRequest>,
    responses: VecDeque<Result<Value>>,
}

/// Scriptable in-memory [`HttpTransport`].
///
/// Responses queued with [`push_response`](Self::push_response) or
/// [`push_error`](Self::push_error) are consumed in FIFO order by GETs and
/// POSTs alike; once the script runs dry the default response is returned.
pub struct MockTransport {
    state: Mutex<MockState>,
    default_response: Value,
    latency: Duration,
    closed: AtomicBool,
}

impl MockTransport {
    /// Create a transport that answers every request with `default_response`.
    pub fn new(default_response: Value) -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            default_response,
            latency: Duration::ZERO,
            closed: AtomicBool::new(false),
        }
    }

    /// Delay every response by `latency` after recording the request.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Queue a successful response body.
    pub fn push_response(&self, body: Value) {
        self.lock().responses.push_back(Ok(body));
    }

    /// Queue a transport failure.
    pub fn push_error(&self, err: TransportError) {
        self.lock().responses.push_back(Err(err));
    }

    /// Fail every later request with [`TransportError::Shutdown`].
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    /// All requests in dispatch order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Recorded GET requests in dispatch order.
    pub fn get_calls(&self) -> Vec<GetRequest> {
        self.lock()
            .requests
            .iter()
            .filter_map(|recorded| match recorded {
                RecordedRequest::Get { request, .. } => Some(request.clone()),
                RecordedRequest::Post { .. } => None,
            })
            .collect()
    }

    /// Recorded POST requests in dispatch order.
    pub fn post_calls(&self) -> Vec<PostRequest> {
        self.lock()
            .requests
            .iter()
            .filter_map(|recorded| match recorded {
                RecordedRequest::Post { request, .. } => Some(request.clone()),
                RecordedRequest::Get { .. } => None,
            })
            .collect()
    }

    /// Dispatch times of recorded POST requests.
    pub fn post_times(&self) -> Vec<Instant> {
        self.lock()
            .requests
            .iter()
            .filter(|recorded| matches!(recorded, RecordedRequest::Post { .. }))
            .map(RecordedRequest::at)
            .collect()
    }

    /// Number of requests seen so far.
    pub fn call_count(&self) -> usize {
        self.lock().requests.len()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, recorded: RecordedRequest) -> Result<Value> {
        if self.closed.load(Ordering::SeqCst) {
            self.lock().requests.push(recorded);
            return Err(TransportError::Shutdown);
        }
        let mut state = self.lock();
        state.requests.push(recorded);
        state
            .responses
            .pop_front()
            .unwrap_or_else(|| Ok(self.default_response.clone()))
    }

    async fn respond(&self, outcome: Result<Value>) -> Result<Value> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        outcome
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new(Value::Null)
    }
}

impl HttpTransport for MockTransport {
    fn get(&self, request: GetRequest) -> TransportFuture<'_> {
        let outcome = self.record(RecordedRequest::Get {
            request,
            at: Instant::now(),
        });
        Box::pin(self.respond(outcome))
    }

    fn post(&self, request: PostRequest) -> TransportFuture<'_> {
        let outcome = self.record(RecordedRequest::Post {
            request,
            at: Instant::now(),
        });
        Box::pin(self.respond(outcome))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::request::Form;

    fn post(url: &str) -> PostRequest {
        PostRequest {
            url: url.to_string(),
            form: Form::new(),
            headers: Default::default(),
        }
    }

    #[tokio::test]
    async fn scripted_responses_are_consumed_in_order() {
        let transport = MockTransport::new(json!(0));
        transport.push_response(json!(1));
        transport.push_error(TransportError::Unavailable("x".to_string()));

        assert_eq!(transport.post(post("a")).await.unwrap(), json!(1));
        assert!(matches!(
            transport.post(post("b")).await,
            Err(TransportError::Unavailable(_))
        ));
        assert_eq!(transport.post(post("c")).await.unwrap(), json!(0));
        assert_eq!(transport.call_count(), 3);
    }

    #[tokio::test]
    async fn closed_transport_still_records() {
        let transport = MockTransport::default();
        transport.close();

        let result = transport
            .get(GetRequest::json("https://example.test/feed.json", None))
            .await;
        assert!(matches!(result, Err(TransportError::Shutdown)));
        assert_eq!(transport.get_calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn latency_delays_response_not_recording() {
        let transport = MockTransport::new(json!(5)).with_latency(Duration::from_secs(2));
        let start = Instant::now();

        let body = transport.post(post("a")).await.unwrap();
        assert_eq!(body, json!(5));
        assert_eq!(transport.post_times(), vec![start]);
        assert!(start.elapsed() >= Duration::from_secs(2));
    }
}
