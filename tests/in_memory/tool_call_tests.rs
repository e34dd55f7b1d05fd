//! Tool invocation through the lifecycle controller.

use super::helpers::{Harness, database_server, harness};
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::json;
use switchboard::tool_registry::{
    domain::CallRecord,
    services::{LifecycleError, StatsAggregator},
    state::{CallWindow, RegistryError},
};

async fn started(harness: &Harness) {
    let outcome = harness
        .controller
        .start(database_server().id())
        .await
        .expect("start should run");
    assert!(outcome.success, "{}", outcome.message);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn successful_call_is_recorded(harness: Harness) {
    started(&harness).await;
    let server_id = database_server().id().clone();

    let outcome = harness
        .controller
        .call_tool(&server_id, "query", json!({"sql": "select 1"}))
        .await
        .expect("call should run");

    assert!(outcome.success);
    assert_eq!(
        outcome.result,
        Some(json!({"tool": "query", "arguments": {"sql": "select 1"}}))
    );
    let recent = harness
        .state
        .ledger
        .recent(&server_id, CallWindow::Last(1), &DefaultClock)
        .expect("history");
    let tools: Vec<&str> = recent.iter().map(CallRecord::tool_name).collect();
    assert_eq!(tools, ["query"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn call_stats_count_successes_and_failures(harness: Harness) {
    started(&harness).await;
    let server_id = database_server().id().clone();
    for _ in 0..2 {
        harness
            .controller
            .call_tool(&server_id, "query", json!({"sql": "select 1"}))
            .await
            .expect("call should run");
    }
    harness
        .connector
        .set_tool_result(server_id.clone(), "query", Err("syntax error".to_owned()))
        .expect("script should apply");
    let failed = harness
        .controller
        .call_tool(&server_id, "query", json!({"sql": "selec"}))
        .await
        .expect("call should run");

    let stats = StatsAggregator::new(harness.state.clone())
        .server_call_stats(&server_id)
        .expect("stats");

    assert!(
        failed
            .error
            .as_deref()
            .is_some_and(|message| message.contains("syntax error"))
    );
    assert_eq!(stats.total_calls, 3);
    assert_eq!(stats.success_rate, 66.7);
    assert_eq!(
        harness
            .state
            .ledger
            .tool_usage(&server_id)
            .expect("usage")
            .get("query"),
        Some(&3)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn inactive_server_rejects_calls(harness: Harness) {
    let server_id = database_server().id().clone();

    let result = harness
        .controller
        .call_tool(&server_id, "query", json!({"sql": "select 1"}))
        .await;

    assert!(matches!(result, Err(LifecycleError::NotActive { .. })));
    assert_eq!(
        harness.state.ledger.totals(&server_id).expect("totals").calls(),
        0
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn disabled_and_unknown_tools_are_rejected(harness: Harness) {
    started(&harness).await;
    let server_id = database_server().id().clone();

    let unknown = harness
        .controller
        .call_tool(&server_id, "drop_table", json!({}))
        .await;
    assert!(matches!(
        unknown,
        Err(LifecycleError::Registry(RegistryError::UnknownTool { .. }))
    ));

    harness
        .state
        .registry
        .set_tool_enabled(&server_id, "query", false)
        .expect("toggle should apply");
    let disabled = harness
        .controller
        .call_tool(&server_id, "query", json!({"sql": "select 1"}))
        .await;
    assert!(matches!(disabled, Err(LifecycleError::ToolDisabled { .. })));
}
