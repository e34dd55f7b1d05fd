//! Application services: lifecycle orchestration, statistics, and the
//! external control surface.

mod control;
mod lifecycle;
mod stats;

pub use control::{
    ConnectResponse, ControlAction, ControlError, ControlPlane, ControlRequest, ControlResponse,
    ControlResult, ServerView, ToolSummary,
};
pub use lifecycle::{
    LifecycleAction, LifecycleController, LifecycleError, LifecycleOutcome, LifecycleResult,
    ToolCallOutcome,
};
pub use stats::StatsAggregator;
