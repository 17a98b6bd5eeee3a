use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};
use tspeak_transport::{HttpTransport, PostRequest, TransportError};

use crate::ack::is_positive_ack;
use crate::channel::ChannelState;
use crate::error::{ChannelError, Result};

/// Receives the outcome of one update: the response body or the transport
/// failure, exactly as the transport reported it.
pub type UpdateCompletion = oneshot::Receiver<std::result::Result<Value, TransportError>>;

/// One queued update request.
#[derive(Debug)]
pub struct UpdateTask {
    pub channel_id: u64,
    pub request: PostRequest,
    responder: UpdateResponder,
}

impl UpdateTask {
    /// Create a task and the receiver its outcome will be delivered to.
    pub fn new(channel_id: u64, request: PostRequest) -> (Self, UpdateCompletion) {
        let (sender, receiver) = oneshot::channel();
        (
            Self {
                channel_id,
                request,
                responder: UpdateResponder(sender),
            },
            receiver,
        )
    }

    /// Split into the channel id, the request to dispatch, and the handle
    /// that delivers its outcome.
    pub fn into_parts(self) -> (u64, PostRequest, UpdateResponder) {
        (self.channel_id, self.request, self.responder)
    }
}

/// Delivers the outcome of one [`UpdateTask`].
#[derive(Debug)]
pub struct UpdateResponder(oneshot::Sender<std::result::Result<Value, TransportError>>);

impl UpdateResponder {
    /// Hand the outcome to the waiting caller. Returns false when the
    /// caller already dropped its completion handle.
    pub fn deliver(self, outcome: std::result::Result<Value, TransportError>) -> bool {
        self.0.send(outcome).is_ok()
    }
}

/// POST one update and record it on the channel if acknowledged.
///
/// Shared by the scheduler worker and immediate-mode dispatch so both
/// apply the same acknowledgment rule.
pub async fn dispatch_update(
    transport: &dyn HttpTransport,
    state: &ChannelState,
    channel_id: u64,
    request: PostRequest,
) -> std::result::Result<Value, TransportError> {
    debug!(channel_id, url = %request.url, "dispatching update");
    let outcome = transport.post(request).await;
    match &outcome {
        Ok(body) if is_positive_ack(body) => state.record_update_now(),
        Ok(body) => debug!(channel_id, %body, "update not acknowledged"),
        Err(err) => warn!(channel_id, error = %err, "update request failed"),
    }
    outcome
}

/// Serializes updates for one channel.
///
/// Tasks are dispatched strictly in enqueue order with at most one POST in
/// flight. After a task's outcome is delivered the worker waits
/// `update_timeout` before taking the next task, so the gap between one
/// completion and the next dispatch is never shorter than the timeout.
/// The queue is unbounded and nothing is ever dropped or retried.
#[derive(Debug)]
pub struct UpdateScheduler {
    channel_id: u64,
    sender: mpsc::UnboundedSender<UpdateTask>,
    pending: Arc<AtomicUsize>,
}

impl UpdateScheduler {
    /// Start a scheduler worker on the current Tokio runtime.
    pub fn spawn(
        channel_id: u64,
        transport: Arc<dyn HttpTransport>,
        state: Arc<ChannelState>,
        update_timeout: Duration,
    ) -> Result<Self> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| ChannelError::NoRuntime)?;
        let (sender, receiver) = mpsc::unbounded_channel();
        let pending = Arc::new(AtomicUsize::new(0));

        let worker = Worker {
            channel_id,
            receiver,
            transport,
            state,
            pending: Arc::clone(&pending),
            update_timeout,
        };
        runtime.spawn(worker.run());

        Ok(Self {
            channel_id,
            sender,
            pending,
        })
    }

    /// Append a task to the queue. An idle worker picks it up immediately.
    pub fn enqueue(&self, task: UpdateTask) -> Result<()> {
        let pending = self.pending.fetch_add(1, Ordering::AcqRel) + 1;
        if self.sender.send(task).is_err() {
            self.pending.fetch_sub(1, Ordering::AcqRel);
            return Err(ChannelError::SchedulerClosed(self.channel_id));
        }
        debug!(channel_id = self.channel_id, pending, "update queued");
        Ok(())
    }

    /// Tasks enqueued whose outcome has not been delivered yet, including
    /// the one in flight.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    pub fn channel_id(&self) -> u64 {
        self.channel_id
    }
}

struct Worker {
    channel_id: u64,
    receiver: mpsc::UnboundedReceiver<UpdateTask>,
    transport: Arc<dyn HttpTransport>,
    state: Arc<ChannelState>,
    pending: Arc<AtomicUsize>,
    update_timeout: Duration,
}

impl Worker {
    // Runs until every scheduler handle is dropped and the queue is drained.
    async fn run(mut self) {
        while let Some(task) = self.receiver.recv().await {
            let (channel_id, request, responder) = task.into_parts();
            let outcome =
                dispatch_update(self.transport.as_ref(), &self.state, channel_id, request).await;

            self.pending.fetch_sub(1, Ordering::AcqRel);
            if !responder.deliver(outcome) {
                debug!(channel_id = self.channel_id, "update outcome discarded");
            }

            tokio::time::sleep(self.update_timeout).await;
        }
        debug!(channel_id = self.channel_id, "update scheduler stopped");
    }
}
