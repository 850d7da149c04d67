//! Gateway client integration tests
//!
//! Each test runs the real client against an in-process mock gateway.
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use std::time::{Duration, Instant};

use integration_tests::*;
use rpc_gateway::{ConnectionState, GatewayConnection, Presence, SessionState, Status};
use serde_json::json;

/// Connect and complete Hello + Identify + READY on the first socket
async fn establish(
    mock: &mut MockGateway,
    gateway: &GatewayConnection,
    heartbeat_ms: u64,
) -> MockClient {
    gateway.connect().await.expect("connect");
    let mut client = mock.next_client().await.unwrap();

    client.send(hello(heartbeat_ms)).await.unwrap();
    client.recv_op(2).await.unwrap();

    let resume_url = format!("{}/resume", mock.url());
    client.send(ready("abc", &resume_url, 1)).await.unwrap();
    wait_for_state(gateway, ConnectionState::Established).await.unwrap();
    client
}

// ============================================================================
// Handshake
// ============================================================================

#[tokio::test]
async fn test_hello_sends_identify_then_heartbeat() {
    let mut mock = MockGateway::start().await.unwrap();
    let logger = RecordingLogger::new();
    let gateway = test_client(&mock, logger.clone());

    gateway.connect().await.unwrap();
    assert!(gateway.is_connected());
    assert!(!gateway.is_ready());

    let mut client = mock.next_client().await.unwrap();
    assert_eq!(client.path, "/?v=10&encoding=json");

    client.send(hello(SLOW_HEARTBEAT_MS)).await.unwrap();

    let identify = client.recv().await.unwrap();
    assert_eq!(identify["op"], 2);
    assert_eq!(identify["d"]["token"], "test-token");
    assert_eq!(identify["d"]["capabilities"], 65);
    assert_eq!(identify["d"]["compress"], false);
    assert_eq!(identify["d"]["large_threshold"], 100);
    assert!(identify["d"]["properties"]["os"].is_string());

    let heartbeat = client.recv().await.unwrap();
    assert_eq!(heartbeat, json!({"op": 1, "d": null}));

    assert_eq!(gateway.session().heartbeat_interval_ms(), SLOW_HEARTBEAT_MS);
    assert_eq!(gateway.state(), ConnectionState::Authenticating);
    assert!(logger
        .entries()
        .iter()
        .any(|e| e.tag == "Gateway" && e.message == "Sending Identify"));

    gateway.close().await;
}

#[tokio::test]
async fn test_connect_twice_is_rejected() {
    let mut mock = MockGateway::start().await.unwrap();
    let gateway = test_client(&mock, RecordingLogger::new());

    gateway.connect().await.unwrap();
    let _client = mock.next_client().await.unwrap();

    assert!(matches!(
        gateway.connect().await,
        Err(rpc_gateway::GatewayError::AlreadyConnected)
    ));
    gateway.close().await;
}

#[tokio::test]
async fn test_ready_establishes_session() {
    let mut mock = MockGateway::start().await.unwrap();
    let gateway = test_client(&mock, RecordingLogger::new());
    let mut events = gateway.subscribe_events();

    gateway.connect().await.unwrap();
    let mut client = mock.next_client().await.unwrap();
    client.send(hello(SLOW_HEARTBEAT_MS)).await.unwrap();
    client.recv_op(2).await.unwrap();

    client.send(ready("abc", "wss://alt", 1)).await.unwrap();
    wait_for_state(&gateway, ConnectionState::Established).await.unwrap();

    let session = gateway.session();
    assert_eq!(session.session_id(), Some("abc"));
    assert_eq!(session.resume_url(), Some("wss://alt/?v=10&encoding=json"));
    assert_eq!(session.sequence(), 1);
    assert!(session.is_connected());
    assert!(gateway.is_ready());

    let event = events.recv().await.unwrap();
    assert_eq!(event.name(), "READY");
    assert_eq!(event.data["user"]["username"], "quokka");

    gateway.close().await;
}

#[tokio::test]
async fn test_undecodable_frames_are_dropped() {
    let mut mock = MockGateway::start().await.unwrap();
    let gateway = test_client(&mock, RecordingLogger::new());

    gateway.connect().await.unwrap();
    let mut client = mock.next_client().await.unwrap();

    client.send_raw("not json").await.unwrap();
    client.send(json!({"op": 42, "d": null})).await.unwrap();
    client.send(json!({"op": 10, "d": {}})).await.unwrap();
    client.send(hello(SLOW_HEARTBEAT_MS)).await.unwrap();

    assert_eq!(client.recv().await.unwrap()["op"], 2);
    assert!(gateway.is_connected());
    gateway.close().await;
}

// ============================================================================
// Sequence & heartbeats
// ============================================================================

#[tokio::test]
async fn test_heartbeat_carries_latest_sequence() {
    let mut mock = MockGateway::start().await.unwrap();
    let gateway = test_client(&mock, RecordingLogger::new());
    let mut client = establish(&mut mock, &gateway, SLOW_HEARTBEAT_MS).await;

    client
        .send(dispatch("MESSAGE_CREATE", 7, json!({"content": "hi"})))
        .await
        .unwrap();
    client
        .send(dispatch("TYPING_START", 3, json!({})))
        .await
        .unwrap();
    client.send(heartbeat_request()).await.unwrap();

    // Skip the heartbeat sent right after Hello
    let mut heartbeat = client.recv_op(1).await.unwrap();
    while heartbeat["d"] != 7 {
        heartbeat = client.recv_op(1).await.unwrap();
    }
    assert_eq!(heartbeat["d"], 7);
    assert_eq!(gateway.session().sequence(), 7);

    client.send(heartbeat_ack()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(gateway.latency().is_some());

    gateway.close().await;
}

#[tokio::test]
async fn test_repeated_hello_keeps_single_heartbeat_producer() {
    let mut mock = MockGateway::start().await.unwrap();
    let gateway = test_client(&mock, RecordingLogger::new());

    gateway.connect().await.unwrap();
    let mut client = mock.next_client().await.unwrap();
    client.send(hello(FAST_HEARTBEAT_MS)).await.unwrap();
    client.send(hello(FAST_HEARTBEAT_MS)).await.unwrap();

    let frames = client.collect_for(Duration::from_millis(550)).await.unwrap();
    let identifies = frames.iter().filter(|f| f["op"] == 2).count();
    let heartbeats = frames.iter().filter(|f| f["op"] == 1).count();

    assert_eq!(identifies, 2);
    // One producer at 100 ms yields about six beats in 550 ms; two would yield twelve
    assert!((4..=8).contains(&heartbeats), "heartbeats: {heartbeats}");

    gateway.close().await;
}

// ============================================================================
// Session lifecycle
// ============================================================================

#[tokio::test]
async fn test_invalid_session_reidentifies_after_delay() {
    let mut mock = MockGateway::start().await.unwrap();
    let gateway = test_client(&mock, RecordingLogger::new());
    let mut client = establish(&mut mock, &gateway, SLOW_HEARTBEAT_MS).await;

    let sent = Instant::now();
    client.send(invalid_session(false)).await.unwrap();

    let identify = client.recv_op(2).await.unwrap();
    assert!(sent.elapsed() >= Duration::from_millis(150));
    assert_eq!(identify["d"]["token"], "test-token");
    assert_eq!(gateway.session().session_id(), Some("abc"));

    gateway.close().await;
}

#[tokio::test]
async fn test_close_4000_resumes_on_resume_url() {
    let mut mock = MockGateway::start().await.unwrap();
    let gateway = test_client(&mock, RecordingLogger::new());
    let mut client = establish(&mut mock, &gateway, SLOW_HEARTBEAT_MS).await;

    client
        .send(dispatch("MESSAGE_CREATE", 5, json!({})))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let closed = Instant::now();
    client.close(4000).await.unwrap();

    let mut second = mock.next_client().await.unwrap();
    assert!(closed.elapsed() >= Duration::from_millis(200));
    assert_eq!(second.path, "/resume/?v=10&encoding=json");

    let session = gateway.session();
    assert_eq!(session.session_id(), Some("abc"));
    assert_eq!(session.sequence(), 5);
    assert!(!session.is_connected());

    second.send(hello(SLOW_HEARTBEAT_MS)).await.unwrap();
    let resume = second.recv().await.unwrap();
    assert_eq!(
        resume,
        json!({"op": 6, "d": {"token": "test-token", "session_id": "abc", "seq": 5}})
    );

    second.send(resumed(6)).await.unwrap();
    wait_for_state(&gateway, ConnectionState::Established).await.unwrap();
    assert!(gateway.is_ready());
    assert_eq!(gateway.session().sequence(), 6);

    gateway.close().await;
}

#[tokio::test]
async fn test_reconnect_request_closes_with_4000_and_resumes() {
    let mut mock = MockGateway::start().await.unwrap();
    let logger = RecordingLogger::new();
    let gateway = test_client(&mock, logger.clone());
    let mut client = establish(&mut mock, &gateway, SLOW_HEARTBEAT_MS).await;

    client.send(reconnect()).await.unwrap();
    assert_eq!(client.recv_close().await.unwrap(), Some(4000));

    let mut second = mock.next_client().await.unwrap();
    assert_eq!(second.path, "/resume/?v=10&encoding=json");

    second.send(hello(SLOW_HEARTBEAT_MS)).await.unwrap();
    let resume = second.recv().await.unwrap();
    assert_eq!(resume["op"], 6);
    assert_eq!(resume["d"]["seq"], 1);
    assert!(logger.contains("can_reconnect: true"));

    gateway.close().await;
}

#[tokio::test]
async fn test_other_close_codes_terminate() {
    let mut mock = MockGateway::start().await.unwrap();
    let logger = RecordingLogger::new();
    let gateway = test_client(&mock, logger.clone());
    let mut client = establish(&mut mock, &gateway, SLOW_HEARTBEAT_MS).await;

    client.close(1000).await.unwrap();
    wait_for_state(&gateway, ConnectionState::Idle).await.unwrap();

    assert_eq!(gateway.session(), SessionState::new());
    assert!(!gateway.is_connected());
    assert!(mock.no_client_within(Duration::from_millis(400)).await);
    assert!(logger.contains("can_reconnect: false"));
}

#[tokio::test]
async fn test_dropped_connection_terminates() {
    let mut mock = MockGateway::start().await.unwrap();
    let logger = RecordingLogger::new();
    let gateway = test_client(&mock, logger.clone());
    let client = establish(&mut mock, &gateway, SLOW_HEARTBEAT_MS).await;

    client.disconnect();
    wait_for_state(&gateway, ConnectionState::Idle).await.unwrap();

    assert_eq!(gateway.session(), SessionState::new());
    assert!(!gateway.is_connected());
    assert!(mock.no_client_within(Duration::from_millis(400)).await);
    assert!(logger.contains("can_reconnect: false"));
}

#[tokio::test]
async fn test_close_during_reconnect_handshake_stays_closed() {
    let mut mock = MockGateway::start().await.unwrap();
    let gateway = test_client(&mock, RecordingLogger::new());
    let mut client = establish(&mut mock, &gateway, SLOW_HEARTBEAT_MS).await;

    mock.hold_handshakes();
    client.close(4000).await.unwrap();

    // The reconnect reached the server but its handshake is still pending
    let held = mock.next_held().await.unwrap();
    gateway.close().await;
    assert_eq!(gateway.state(), ConnectionState::Idle);

    if let Ok(mut late) = held.complete().await {
        let _ = late.send(hello(SLOW_HEARTBEAT_MS)).await;
        let frames = late
            .collect_for(Duration::from_millis(300))
            .await
            .unwrap_or_default();
        assert!(frames.iter().all(|f| f["op"] != 2 && f["op"] != 6));
    }

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(gateway.state(), ConnectionState::Idle);
    assert!(!gateway.is_connected());
    assert_eq!(gateway.session(), SessionState::new());
}

#[tokio::test]
async fn test_close_stops_everything() {
    let mut mock = MockGateway::start().await.unwrap();
    let gateway = test_client(&mock, RecordingLogger::new());
    let mut client = establish(&mut mock, &gateway, FAST_HEARTBEAT_MS).await;

    gateway.close().await;
    assert_eq!(gateway.state(), ConnectionState::Idle);
    assert_eq!(gateway.session(), SessionState::new());

    assert_eq!(client.recv_close().await.unwrap(), Some(1000));
    assert!(mock.no_client_within(Duration::from_millis(400)).await);
}

// ============================================================================
// Presence
// ============================================================================

#[tokio::test]
async fn test_send_activity_waits_for_ready() {
    let mut mock = MockGateway::start().await.unwrap();
    let gateway = test_client(&mock, RecordingLogger::new());

    gateway.connect().await.unwrap();
    let mut client = mock.next_client().await.unwrap();

    let publisher = {
        let gateway = gateway.clone();
        tokio::spawn(async move {
            let presence = Presence::new(Status::Dnd);
            gateway.send_activity(&presence).await
        })
    };

    client.send(hello(SLOW_HEARTBEAT_MS)).await.unwrap();
    let before_ready = client.collect_for(Duration::from_millis(200)).await.unwrap();
    assert!(before_ready.iter().all(|f| f["op"] != 3));
    assert!(!publisher.is_finished());

    client.send(ready("abc", "wss://alt", 1)).await.unwrap();
    publisher.await.unwrap().unwrap();

    let frames = client.collect_for(Duration::from_millis(200)).await.unwrap();
    let presences: Vec<_> = frames.iter().filter(|f| f["op"] == 3).collect();
    assert_eq!(presences.len(), 1);
    assert_eq!(presences[0]["d"]["status"], "dnd");
    assert_eq!(presences[0]["d"]["afk"], false);

    gateway.close().await;
}

#[tokio::test]
async fn test_send_activity_after_ready_is_immediate() {
    let mut mock = MockGateway::start().await.unwrap();
    let gateway = test_client(&mock, RecordingLogger::new());
    let mut client = establish(&mut mock, &gateway, SLOW_HEARTBEAT_MS).await;

    let presence = Presence::new(Status::Online).with_activity(
        rpc_gateway::Activity::new("Rust", rpc_gateway::ActivityType::Playing)
            .with_details("Reading the gateway docs"),
    );
    gateway.send_activity(&presence).await.unwrap();

    let frame = client.recv_op(3).await.unwrap();
    assert_eq!(frame["d"]["activities"][0]["name"], "Rust");
    assert_eq!(frame["d"]["activities"][0]["type"], 0);
    assert_eq!(frame["d"]["activities"][0]["details"], "Reading the gateway docs");

    gateway.close().await;
}
