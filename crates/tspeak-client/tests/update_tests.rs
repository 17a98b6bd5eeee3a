use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::time::Instant;
use tspeak_client::{ChannelKeys, ClientConfig, ClientError, ThingSpeakClient, TransportError};
use tspeak_transport::MockTransport;

const TIMEOUT: Duration = Duration::from_millis(15_000);

fn client_with(config: ClientConfig, transport: &Arc<MockTransport>) -> ThingSpeakClient {
    ThingSpeakClient::with_transport(config, transport.clone())
}

fn throttled() -> ClientConfig {
    ClientConfig::default()
}

fn immediate() -> ClientConfig {
    ClientConfig::default().with_timeout_mode(false)
}

#[tokio::test]
async fn update_without_channel_id_fails() {
    let transport = Arc::new(MockTransport::new(json!(1)));
    let client = client_with(immediate(), &transport);

    assert!(matches!(
        client.update_channel(0, &json!({"field1": 1})),
        Err(ClientError::MissingChannelId(_))
    ));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn update_on_unattached_channel_fails() {
    let transport = Arc::new(MockTransport::new(json!(1)));
    let client = client_with(immediate(), &transport);

    assert!(matches!(
        client.update_channel(123456, &json!({"field1": 1})),
        Err(ClientError::ChannelNotAttached(123456))
    ));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn missing_fields_is_reported_before_attachment() {
    let transport = Arc::new(MockTransport::new(json!(1)));
    let client = client_with(immediate(), &transport);

    assert!(matches!(
        client.update_channel(99, &serde_json::Value::Null),
        Err(ClientError::MissingFields)
    ));
}

#[tokio::test]
async fn update_without_write_key_never_posts() {
    let transport = Arc::new(MockTransport::new(json!(1)));
    let client = client_with(throttled(), &transport);
    client
        .attach_channel(123456, Some(ChannelKeys::read("you")))
        .unwrap();

    assert!(matches!(
        client.update_channel(123456, &json!({"field1": 1})),
        Err(ClientError::NoWriteKey(123456))
    ));
    assert_eq!(transport.call_count(), 0);
    assert_eq!(client.pending_updates(123456), Some(0));
}

#[tokio::test]
async fn non_object_fields_are_invalid() {
    let transport = Arc::new(MockTransport::new(json!(1)));
    let client = client_with(immediate(), &transport);
    client
        .attach_channel(1, Some(ChannelKeys::write("w")))
        .unwrap();

    for fields in [json!("field1=1"), json!([1, 2]), json!(5)] {
        assert!(matches!(
            client.update_channel(1, &fields),
            Err(ClientError::InvalidFields)
        ));
    }
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn write_key_check_precedes_field_shape_check() {
    let transport = Arc::new(MockTransport::new(json!(1)));
    let client = client_with(immediate(), &transport);
    client
        .attach_channel(1, Some(ChannelKeys::read("r")))
        .unwrap();

    assert!(matches!(
        client.update_channel(1, &json!("not a map")),
        Err(ClientError::NoWriteKey(1))
    ));
}

#[tokio::test]
async fn immediate_update_posts_form_with_api_key_header() {
    let transport = Arc::new(MockTransport::new(json!(7)));
    let client = client_with(immediate(), &transport);
    client
        .attach_channel(123456, Some(ChannelKeys::write("you")))
        .unwrap();
    assert_eq!(client.pending_updates(123456), None);

    let body = client
        .update_channel(123456, &json!({"status": "live"}))
        .unwrap()
        .await
        .unwrap();
    assert_eq!(body, json!(7));

    let posts = transport.post_calls();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].url, "https://api.thingspeak.com/update");
    assert_eq!(posts[0].form["status"], "live");
    assert_eq!(posts[0].headers["X-THINGSPEAKAPIKEY"], "you");
    assert!(client.last_update(123456).is_some());
}

#[tokio::test]
async fn empty_write_key_is_sent_as_is() {
    let transport = Arc::new(MockTransport::new(json!(0)));
    let client = client_with(immediate(), &transport);
    client.attach_channel(1, Some(ChannelKeys::write(""))).unwrap();

    client
        .update_channel(1, &json!({"field1": 1}))
        .unwrap()
        .await
        .unwrap();
    assert_eq!(transport.post_calls()[0].headers["X-THINGSPEAKAPIKEY"], "");
}

#[tokio::test]
async fn zero_response_leaves_last_update_unset() {
    let transport = Arc::new(MockTransport::new(json!(0)));
    let client = client_with(immediate(), &transport);
    client
        .attach_channel(1, Some(ChannelKeys::write("w")))
        .unwrap();

    let body = client
        .update_channel(1, &json!({"field1": 5}))
        .unwrap()
        .await
        .unwrap();
    assert_eq!(body, json!(0));
    assert_eq!(client.last_update(1), None);
}

#[tokio::test(start_paused = true)]
async fn throttled_update_records_acknowledgment() {
    let transport = Arc::new(MockTransport::new(json!(7)));
    let client = client_with(throttled(), &transport);
    client
        .attach_channel(123456, Some(ChannelKeys::write("you")))
        .unwrap();

    let before = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64;
    let pending = client
        .update_channel(123456, &json!({"status": "live"}))
        .unwrap();
    assert_eq!(client.pending_updates(123456), Some(1));

    assert_eq!(pending.await.unwrap(), json!(7));
    let last = client.last_update(123456).expect("update acknowledged");
    assert!(last >= before);
    assert_eq!(client.pending_updates(123456), Some(0));
}

#[tokio::test(start_paused = true)]
async fn throttled_updates_are_spaced_after_completion() {
    let transport = Arc::new(MockTransport::new(json!(1)).with_latency(Duration::from_millis(800)));
    let client = client_with(throttled().with_update_timeout(TIMEOUT), &transport);
    client
        .attach_channel(42, Some(ChannelKeys::write("w")))
        .unwrap();

    let first = client.update_channel(42, &json!({"field1": 1})).unwrap();
    assert_eq!(client.pending_updates(42), Some(1));
    let second = client.update_channel(42, &json!({"field1": 2})).unwrap();
    assert_eq!(client.pending_updates(42), Some(2));

    first.await.unwrap();
    let first_completed = Instant::now();
    second.await.unwrap();

    let dispatched = transport.post_times();
    assert_eq!(dispatched.len(), 2);
    assert!(dispatched[1] - first_completed >= TIMEOUT);

    let posts = transport.post_calls();
    assert_eq!(posts[0].form["field1"], "1");
    assert_eq!(posts[1].form["field1"], "2");
}

#[tokio::test(start_paused = true)]
async fn immediate_updates_are_not_spaced() {
    let transport = Arc::new(MockTransport::new(json!(1)));
    let client = client_with(immediate(), &transport);
    client
        .attach_channel(42, Some(ChannelKeys::write("w")))
        .unwrap();

    let start = Instant::now();
    let first = client.update_channel(42, &json!({"field1": 1})).unwrap();
    let second = client.update_channel(42, &json!({"field1": 2})).unwrap();
    first.await.unwrap();
    second.await.unwrap();

    let dispatched = transport.post_times();
    assert_eq!(dispatched.len(), 2);
    assert!(dispatched.iter().all(|at| *at - start < Duration::from_millis(1)));
}

#[tokio::test(start_paused = true)]
async fn channels_are_throttled_independently() {
    let transport = Arc::new(MockTransport::new(json!(1)));
    let client = client_with(throttled(), &transport);
    client.attach_channel(1, Some(ChannelKeys::write("a"))).unwrap();
    client.attach_channel(2, Some(ChannelKeys::write("b"))).unwrap();

    let start = Instant::now();
    let first = client.update_channel(1, &json!({"field1": 1})).unwrap();
    let second = client.update_channel(2, &json!({"field1": 1})).unwrap();
    first.await.unwrap();
    second.await.unwrap();

    assert!(transport
        .post_times()
        .iter()
        .all(|at| *at - start < TIMEOUT));
}

#[tokio::test(start_paused = true)]
async fn transport_error_reaches_caller_and_queue_moves_on() {
    let transport = Arc::new(MockTransport::new(json!(3)));
    transport.push_error(TransportError::Unavailable("down".to_string()));
    let client = client_with(throttled(), &transport);
    client.attach_channel(8, Some(ChannelKeys::write("w"))).unwrap();

    let first = client.update_channel(8, &json!({"field1": 1})).unwrap();
    let second = client.update_channel(8, &json!({"field1": 2})).unwrap();

    assert!(matches!(
        first.await,
        Err(ClientError::Transport(TransportError::Unavailable(_)))
    ));
    assert_eq!(second.await.unwrap(), json!(3));
    assert_eq!(transport.post_calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn dropped_handle_does_not_cancel_update() {
    let transport = Arc::new(MockTransport::new(json!(1)));
    let client = client_with(throttled(), &transport);
    client.attach_channel(3, Some(ChannelKeys::write("w"))).unwrap();

    drop(client.update_channel(3, &json!({"field1": 1})).unwrap());
    client
        .update_channel(3, &json!({"field1": 2}))
        .unwrap()
        .await
        .unwrap();

    assert_eq!(transport.post_calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn reattach_replaces_keys_and_queue() {
    let transport = Arc::new(MockTransport::new(json!(1)));
    let client = client_with(throttled(), &transport);
    client.attach_channel(5, Some(ChannelKeys::write("old"))).unwrap();

    let queued = client.update_channel(5, &json!({"field1": 1})).unwrap();
    assert_eq!(client.pending_updates(5), Some(1));

    client.attach_channel(5, Some(ChannelKeys::write("new"))).unwrap();
    assert_eq!(client.pending_updates(5), Some(0));
    assert_eq!(client.channel_keys(5), Some(ChannelKeys::write("new")));

    let fresh = client.update_channel(5, &json!({"field1": 2})).unwrap();
    queued.await.unwrap();
    fresh.await.unwrap();

    let keys: Vec<String> = transport
        .post_calls()
        .iter()
        .map(|post| post.headers["X-THINGSPEAKAPIKEY"].clone())
        .collect();
    assert!(keys.contains(&"old".to_string()));
    assert!(keys.contains(&"new".to_string()));
}
