//! Boundary operations and their serialized shapes.

use super::helpers::{Harness, database_server, harness, search_server};
use rstest::rstest;
use serde_json::json;
use switchboard::tool_registry::services::{ControlError, ControlRequest};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn control_start_and_stop_report_success(harness: Harness) {
    let plane = harness.plane();

    let started = plane
        .control(&ControlRequest::new("postgres", "start"))
        .await
        .expect("control should run");
    let stats = plane.stats().expect("stats");
    let stopped = plane
        .control(&ControlRequest::new("postgres", "stop"))
        .await
        .expect("control should run");

    assert!(started.success);
    assert_eq!(started.server_id, "postgres");
    assert_eq!(stats.active_servers, 1);
    assert!(stopped.success);
    assert_eq!(plane.stats().expect("stats").active_servers, 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_transition_is_reported_not_raised(harness: Harness) {
    let plane = harness.plane();
    plane
        .control(&ControlRequest::new("postgres", "start"))
        .await
        .expect("control should run");

    let again = plane
        .control(&ControlRequest::new("postgres", "start"))
        .await
        .expect("control should run");

    assert!(!again.success);
    assert!(again.message.contains("active -> connecting"));
}

#[rstest]
#[case("unknown-id")]
#[case("not a valid id")]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_servers_are_not_found(harness: Harness, #[case] server_id: &str) {
    let plane = harness.plane();

    let control = plane
        .control(&ControlRequest::new(server_id, "start"))
        .await;
    let connect = plane.connect(server_id).await;
    let disconnect = plane.disconnect(server_id).await;

    assert!(matches!(control, Err(ControlError::NotFound(_))));
    assert!(connect.is_err_and(|err| err.status_code() == 404));
    assert!(matches!(disconnect, Err(ControlError::NotFound(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_action_is_checked_before_lookup(harness: Harness) {
    let result = harness
        .plane()
        .control(&ControlRequest::new("unknown-id", "restart"))
        .await;

    assert_eq!(result, Err(ControlError::InvalidAction("restart".to_owned())));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn connect_response_carries_session(harness: Harness) {
    let plane = harness.plane();

    let connected = plane.connect("postgres").await.expect("connect should run");
    let body = serde_json::to_value(&connected).expect("serializable");
    let disconnected = plane
        .disconnect("postgres")
        .await
        .expect("disconnect should run");

    assert!(connected.success);
    assert!(body.get("sessionId").is_some_and(serde_json::Value::is_string));
    assert!(disconnected.success);
    assert_eq!(
        serde_json::to_value(&disconnected).expect("serializable"),
        json!({"success": true, "message": disconnected.message})
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn server_listing_uses_camel_case_and_registration_order(harness: Harness) {
    let plane = harness.plane();
    plane.connect("postgres").await.expect("connect should run");

    let servers = plane.list_servers().expect("listing");
    let body = serde_json::to_value(&servers).expect("serializable");

    let ids: Vec<String> = servers
        .iter()
        .map(|server| server.descriptor.id().to_string())
        .collect();
    assert_eq!(ids, [search_server().id().to_string(), database_server().id().to_string()]);
    let database = body.get(1).expect("second entry");
    assert_eq!(database.get("status"), Some(&json!("active")));
    assert_eq!(database.get("category"), Some(&json!("database")));
    assert_eq!(database.get("requiresApiKey"), Some(&json!(false)));
    assert_eq!(
        database.pointer("/tools/0/usageCount"),
        Some(&json!(0))
    );
    assert!(database.get("lastHealthCheck").is_some_and(serde_json::Value::is_string));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stats_shape_matches_boundary_contract(harness: Harness) {
    let body = serde_json::to_value(harness.plane().stats().expect("stats")).expect("serializable");

    assert_eq!(
        body,
        json!({
            "totalServers": 2,
            "activeServers": 0,
            "totalCalls": 0,
            "successRate": 100.0,
            "avgResponseTime": 0
        })
    );
}
