//! Abandoned callers and competing lifecycle requests.

use super::helpers::{Harness, database_server, harness, harness_with};
use rstest::{fixture, rstest};
use std::time::Duration;
use switchboard::config::RegistryConfig;
use switchboard::tool_registry::{
    adapters::StaticCredentials,
    domain::{ConnectionStatus, ServerId},
    services::LifecycleError,
    state::RegistryError,
};
use tokio::time::{sleep, timeout};

const HANDSHAKE_DELAY: Duration = Duration::from_millis(150);

#[fixture]
fn slow_harness() -> Harness {
    let harness = harness_with(
        RegistryConfig::default().with_connect_timeout(Duration::from_secs(5)),
        StaticCredentials::new(),
    );
    harness
        .connector
        .set_connect_delay(database_server().id().clone(), HANDSHAKE_DELAY)
        .expect("script should apply");
    harness
}

async fn wait_until_settled(harness: &Harness, server_id: &ServerId) -> ConnectionStatus {
    for _ in 0..100 {
        let status = harness.state.tracker.get(server_id).expect("read").status();
        if status != ConnectionStatus::Connecting {
            return status;
        }
        sleep(Duration::from_millis(20)).await;
    }
    ConnectionStatus::Connecting
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn abandoned_start_still_completes(slow_harness: Harness) {
    let server_id = database_server().id().clone();

    let abandoned = timeout(
        Duration::from_millis(20),
        slow_harness.controller.start(&server_id),
    )
    .await;
    assert!(abandoned.is_err(), "caller should give up before the handshake ends");
    assert_eq!(
        slow_harness
            .state
            .tracker
            .get(&server_id)
            .expect("read")
            .status(),
        ConnectionStatus::Connecting
    );

    let settled = wait_until_settled(&slow_harness, &server_id).await;

    assert_eq!(settled, ConnectionStatus::Active);
    assert!(
        slow_harness
            .state
            .tracker
            .get(&server_id)
            .expect("read")
            .session_id()
            .is_some()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_starts_admit_one_handshake(slow_harness: Harness) {
    let server_id = database_server().id().clone();

    let (first, second) = tokio::join!(
        slow_harness.controller.start(&server_id),
        slow_harness.controller.start(&server_id),
    );

    let outcomes = [first, second];
    let admitted = outcomes
        .iter()
        .filter(|result| result.as_ref().is_ok_and(|outcome| outcome.success))
        .count();
    let rejected = outcomes
        .iter()
        .filter(|result| {
            matches!(
                result,
                Err(LifecycleError::Registry(RegistryError::InvalidTransition {
                    from: ConnectionStatus::Connecting,
                    ..
                }))
            )
        })
        .count();
    assert_eq!((admitted, rejected), (1, 1));
    assert_eq!(
        slow_harness
            .connector
            .connect_attempts(&server_id)
            .expect("lock"),
        1
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stop_during_handshake_is_rejected(slow_harness: Harness) {
    let server_id = database_server().id().clone();
    let controller = slow_harness.controller.clone();
    let pending_id = server_id.clone();
    let pending = tokio::spawn(async move { controller.start(&pending_id).await });
    sleep(Duration::from_millis(30)).await;

    let result = slow_harness.controller.stop(&server_id).await;

    assert!(matches!(
        result,
        Err(LifecycleError::Registry(RegistryError::InvalidTransition {
            from: ConnectionStatus::Connecting,
            to: ConnectionStatus::Inactive,
            ..
        }))
    ));
    let started = pending
        .await
        .expect("start task should join")
        .expect("start should run");
    assert!(started.success);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_health_probe_leaves_the_new_session_active(harness: Harness) {
    let server_id = database_server().id().clone();
    harness
        .controller
        .start(&server_id)
        .await
        .expect("first start should run");
    harness
        .connector
        .set_health_check_delay(server_id.clone(), Duration::from_millis(300))
        .expect("script should apply");
    let controller = harness.controller.clone();
    let probed_id = server_id.clone();
    let probe = tokio::spawn(async move { controller.check_health(&probed_id).await });
    sleep(Duration::from_millis(50)).await;

    harness
        .controller
        .stop(&server_id)
        .await
        .expect("stop should run");
    let restarted = harness
        .controller
        .start(&server_id)
        .await
        .expect("second start should run");
    let outcome = probe
        .await
        .expect("probe task should join")
        .expect("probe should run");

    assert!(!outcome.success, "{}", outcome.message);
    let current = harness.state.tracker.get(&server_id).expect("read");
    assert_eq!(current.status(), ConnectionStatus::Active);
    assert_eq!(current.session_id(), restarted.session_id());
    assert_eq!(outcome.state, current);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn slow_stop_does_not_release_a_newer_session(harness: Harness) {
    let server_id = database_server().id().clone();
    harness
        .controller
        .start(&server_id)
        .await
        .expect("first start should run");
    harness
        .connector
        .set_disconnect_delay(server_id.clone(), Duration::from_millis(300))
        .expect("script should apply");
    let controller = harness.controller.clone();
    let stopped_id = server_id.clone();
    let slow_stop = tokio::spawn(async move { controller.stop(&stopped_id).await });
    sleep(Duration::from_millis(50)).await;

    harness
        .connector
        .set_disconnect_delay(server_id.clone(), Duration::ZERO)
        .expect("script should apply");
    harness
        .controller
        .stop(&server_id)
        .await
        .expect("fast stop should run");
    let restarted = harness
        .controller
        .start(&server_id)
        .await
        .expect("second start should run");
    let outcome = slow_stop
        .await
        .expect("stop task should join")
        .expect("stop should run");

    assert!(!outcome.success, "{}", outcome.message);
    let current = harness.state.tracker.get(&server_id).expect("read");
    assert_eq!(current.status(), ConnectionStatus::Active);
    assert_eq!(current.session_id(), restarted.session_id());
    assert!(harness.connector.is_connected(&server_id).expect("lock"));
}
