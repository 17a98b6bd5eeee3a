use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use serde_json::{Map, Value};
use tspeak_channel::UpdateCompletion;
use tspeak_transport::Form;

use crate::error::{ClientError, Result};

/// Outcome of an accepted update call.
///
/// The request is already queued or in flight when this is returned;
/// awaiting it yields the platform's response body (the new entry id, or
/// `0` when the update was rejected), or the transport error without a
/// body. Dropping it discards the outcome but does not cancel the update.
#[derive(Debug)]
pub struct PendingUpdate {
    channel_id: u64,
    completion: UpdateCompletion,
}

impl PendingUpdate {
    pub(crate) fn new(channel_id: u64, completion: UpdateCompletion) -> Self {
        Self {
            channel_id,
            completion,
        }
    }

    pub fn channel_id(&self) -> u64 {
        self.channel_id
    }
}

impl Future for PendingUpdate {
    type Output = Result<Value>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let channel_id = self.channel_id;
        match Pin::new(&mut self.completion).poll(cx) {
            Poll::Ready(Ok(Ok(body))) => Poll::Ready(Ok(body)),
            Poll::Ready(Ok(Err(err))) => Poll::Ready(Err(ClientError::Transport(err))),
            Poll::Ready(Err(_)) => Poll::Ready(Err(ClientError::Canceled(channel_id))),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Form-encode update fields.
///
/// Strings are sent verbatim, `null` as an empty value, and every other
/// value as its compact JSON text.
pub fn fields_to_form(fields: &Map<String, Value>) -> Form {
    fields
        .iter()
        .map(|(name, value)| {
            let encoded = match value {
                Value::String(text) => text.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (name.clone(), encoded)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokio::sync::oneshot;

    use super::*;

    #[test]
    fn form_encoding_of_field_values() {
        let fields = json!({
            "field1": 23.5,
            "field2": "warm",
            "field3": true,
            "field4": null,
            "status": "live",
            "tags": ["a", 1]
        });
        let form = fields_to_form(fields.as_object().unwrap());

        assert_eq!(form["field1"], "23.5");
        assert_eq!(form["field2"], "warm");
        assert_eq!(form["field3"], "true");
        assert_eq!(form["field4"], "");
        assert_eq!(form["status"], "live");
        assert_eq!(form["tags"], r#"["a",1]"#);
    }

    #[tokio::test]
    async fn pending_update_resolves_to_body() {
        let (sender, receiver) = oneshot::channel();
        let pending = PendingUpdate::new(4, receiver);
        sender.send(Ok(json!(12))).unwrap();
        assert_eq!(pending.await.unwrap(), json!(12));
    }

    #[tokio::test]
    async fn pending_update_reports_dropped_sender_as_canceled() {
        let (sender, receiver) = oneshot::channel();
        let pending = PendingUpdate::new(4, receiver);
        drop(sender);
        assert!(matches!(pending.await, Err(ClientError::Canceled(4))));
    }
}
