//! Connection state transitions driven through the lifecycle controller.

use super::helpers::{Harness, database_server, harness, harness_with, id, search_server};
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::rstest;
use std::sync::Arc;
use std::time::Duration;
use switchboard::config::RegistryConfig;
use switchboard::tool_registry::{
    adapters::StaticCredentials,
    domain::ConnectionStatus,
    services::{LifecycleController, LifecycleError},
    state::RegistryError,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn start_then_stop_returns_to_inactive(harness: Harness) {
    let server_id = database_server().id().clone();

    let started = harness
        .controller
        .start(&server_id)
        .await
        .expect("start should run");
    assert!(started.success, "{}", started.message);
    assert_eq!(started.state.status(), ConnectionStatus::Active);
    assert!(started.state.last_health_check().is_some());
    assert!(harness.connector.is_connected(&server_id).expect("lock"));

    let stopped = harness
        .controller
        .stop(&server_id)
        .await
        .expect("stop should run");
    assert!(stopped.success);
    assert_eq!(stopped.state.status(), ConnectionStatus::Inactive);
    assert_eq!(stopped.state.session_id(), None);
    assert!(!harness.connector.is_connected(&server_id).expect("lock"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn connect_binds_a_session_and_refreshes_tools(harness: Harness) {
    let server_id = database_server().id().clone();

    let outcome = harness
        .controller
        .connect(&server_id)
        .await
        .expect("connect should run");

    assert!(outcome.session_id().is_some());
    let tools = harness.state.registry.tools(&server_id).expect("tools");
    assert_eq!(tools.len(), 1);

    let released = harness
        .controller
        .disconnect(&server_id)
        .await
        .expect("disconnect should run");
    assert_eq!(released.session_id(), None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn starting_an_active_server_is_an_invalid_transition(harness: Harness) {
    let server_id = database_server().id().clone();
    harness
        .controller
        .start(&server_id)
        .await
        .expect("start should run");

    let result = harness.controller.start(&server_id).await;

    assert_eq!(
        result,
        Err(LifecycleError::Registry(RegistryError::InvalidTransition {
            server_id: server_id.clone(),
            from: ConnectionStatus::Active,
            to: ConnectionStatus::Connecting,
        }))
    );
    assert_eq!(harness.connector.connect_attempts(&server_id).expect("lock"), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stopping_an_inactive_server_leaves_it_untouched(harness: Harness) {
    let server_id = database_server().id().clone();
    let before = harness.state.tracker.get(&server_id).expect("read");

    let outcome = harness
        .controller
        .stop(&server_id)
        .await
        .expect("stop should run");

    assert!(outcome.success);
    assert_eq!(outcome.state, before);
    assert!(harness.state.tracker.snapshot().expect("snapshot").is_empty());
}

struct PinnedClock(DateTime<Utc>);

impl Clock for PinnedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_stop_keeps_the_last_health_check(harness: Harness) {
    let server_id = database_server().id().clone();
    let activated_at = Utc
        .with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    let controller = LifecycleController::new(
        harness.state.clone(),
        Arc::clone(&harness.connector),
        Arc::new(StaticCredentials::new()),
        Arc::new(PinnedClock(activated_at)),
        RegistryConfig::default(),
    );
    controller.start(&server_id).await.expect("start should run");
    let first = controller.stop(&server_id).await.expect("stop should run");
    assert_eq!(first.state.last_health_check(), Some(activated_at));

    let second = controller
        .stop(&server_id)
        .await
        .expect("repeated stop should run");

    assert!(second.success);
    assert_eq!(second.state, first.state);
    let current = harness.state.tracker.get(&server_id).expect("read");
    assert_eq!(current.status(), ConnectionStatus::Inactive);
    assert_eq!(current.last_health_check(), Some(activated_at));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn refused_handshake_can_be_retried(harness: Harness) {
    let server_id = database_server().id().clone();
    harness
        .connector
        .fail_connections(server_id.clone(), "connection refused")
        .expect("script should apply");

    let failed = harness
        .controller
        .start(&server_id)
        .await
        .expect("start should run");
    assert!(!failed.success);
    assert_eq!(failed.state.status(), ConnectionStatus::Error);
    assert!(
        failed
            .state
            .last_error()
            .is_some_and(|cause| cause.contains("connection refused"))
    );

    harness
        .connector
        .restore_connections(&server_id)
        .expect("script should apply");
    let retried = harness
        .controller
        .start(&server_id)
        .await
        .expect("retry should run");

    assert!(retried.success);
    assert_eq!(retried.state.last_error(), None);
    assert_eq!(harness.connector.connect_attempts(&server_id).expect("lock"), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn slow_handshake_times_out_into_error(harness: Harness) {
    let server_id = database_server().id().clone();
    harness
        .connector
        .set_connect_delay(server_id.clone(), Duration::from_secs(30))
        .expect("script should apply");

    let outcome = harness
        .controller
        .start(&server_id)
        .await
        .expect("start should run");

    assert!(!outcome.success);
    assert!(outcome.message.contains("timed out after 100ms"));
    assert_eq!(outcome.state.status(), ConnectionStatus::Error);
    assert_eq!(outcome.session_id(), None);
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_api_key_lands_server_in_error() {
    let harness = harness_with(RegistryConfig::default(), StaticCredentials::new());
    let server_id = search_server().id().clone();

    let outcome = harness
        .controller
        .start(&server_id)
        .await
        .expect("start should run");

    assert!(!outcome.success);
    assert!(outcome.message.contains("BRAVE_API_KEY"));
    assert_eq!(outcome.state.status(), ConnectionStatus::Error);
    assert_eq!(harness.connector.connect_attempts(&server_id).expect("lock"), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_health_check_moves_active_server_to_error(harness: Harness) {
    let server_id = database_server().id().clone();
    harness
        .controller
        .start(&server_id)
        .await
        .expect("start should run");
    harness
        .connector
        .set_unhealthy(server_id.clone(), "socket closed")
        .expect("script should apply");

    let probe = harness
        .controller
        .check_health(&server_id)
        .await
        .expect("probe should run");

    assert!(!probe.success);
    assert_eq!(probe.state.status(), ConnectionStatus::Error);
    assert_eq!(probe.session_id(), None);

    let reset = harness
        .controller
        .reset(&server_id)
        .await
        .expect("reset should run");
    assert!(reset.success);
    assert_eq!(reset.state.status(), ConnectionStatus::Inactive);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn health_check_requires_active_server(harness: Harness) {
    let server_id = database_server().id().clone();

    let result = harness.controller.check_health(&server_id).await;

    assert_eq!(
        result,
        Err(LifecycleError::NotActive {
            server_id,
            status: ConnectionStatus::Inactive,
        })
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_server_is_not_found_and_state_is_unchanged(harness: Harness) {
    let unknown = id("unknown-id");

    let result = harness.controller.connect(&unknown).await;

    assert!(result.is_err_and(|err| err.is_not_found()));
    assert_eq!(harness.state.registry.len().expect("len"), 2);
    assert!(harness.state.tracker.snapshot().expect("snapshot").is_empty());
}
