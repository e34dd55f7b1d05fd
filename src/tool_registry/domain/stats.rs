//! Derived call metrics and their presentation rounding.
//!
//! Fleet-wide figures are means of per-server figures: every server weighs
//! the same regardless of call volume. Servers without calls count as fully
//! successful.

use super::CallTotals;
use serde::{Deserialize, Serialize};

/// Success rate reported for a server that has never been called.
const UNTESTED_SUCCESS_RATE: f64 = 100.0;

/// Fleet-wide summary across every registered server.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStats {
    /// Number of registered servers.
    pub total_servers: usize,
    /// Number of servers currently `active`.
    pub active_servers: usize,
    /// Calls ever recorded across all servers.
    pub total_calls: u64,
    /// Mean per-server success percentage, one decimal place.
    pub success_rate: f64,
    /// Mean per-server latency over active servers, whole milliseconds.
    pub avg_response_time: u64,
}

/// Per-server input to [`ServerStats::aggregate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerSample {
    /// Cumulative call counters for the server.
    pub totals: CallTotals,
    /// Whether the server is currently `active`.
    pub active: bool,
}

impl ServerStats {
    /// Aggregates one sample per registered server.
    #[must_use]
    pub fn aggregate(samples: &[ServerSample]) -> Self {
        let total_servers = samples.len();
        let active_servers = samples.iter().filter(|sample| sample.active).count();
        let total_calls = samples
            .iter()
            .fold(0_u64, |sum, sample| sum.saturating_add(sample.totals.calls()));

        let success_rate = mean(
            samples
                .iter()
                .map(|sample| success_percentage(&sample.totals)),
        )
        .unwrap_or(UNTESTED_SUCCESS_RATE);

        let avg_response_time = mean(
            samples
                .iter()
                .filter(|sample| sample.active)
                .map(|sample| average_response_ms(&sample.totals)),
        )
        .unwrap_or(0.0);

        Self {
            total_servers,
            active_servers,
            total_calls,
            success_rate: round_to_tenth(success_rate),
            avg_response_time: round_to_millis(avg_response_time),
        }
    }
}

/// Call metrics for a single server.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerCallStats {
    /// Calls ever recorded for the server.
    pub total_calls: u64,
    /// Success percentage, one decimal place.
    pub success_rate: f64,
    /// Mean latency, whole milliseconds.
    pub avg_response_time: u64,
}

impl From<CallTotals> for ServerCallStats {
    fn from(totals: CallTotals) -> Self {
        Self {
            total_calls: totals.calls(),
            success_rate: round_to_tenth(success_percentage(&totals)),
            avg_response_time: round_to_millis(average_response_ms(&totals)),
        }
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "percentages are presentation values; counters stay far below 2^52"
)]
fn success_percentage(totals: &CallTotals) -> f64 {
    if totals.calls() == 0 {
        return UNTESTED_SUCCESS_RATE;
    }
    totals.successes() as f64 / totals.calls() as f64 * 100.0
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "latency means are presentation values; counters stay far below 2^52"
)]
fn average_response_ms(totals: &CallTotals) -> f64 {
    if totals.calls() == 0 {
        return 0.0;
    }
    totals.total_response_time_ms() as f64 / totals.calls() as f64
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "mean of a handful of presentation values"
)]
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0_usize), |(sum, count), value| {
        (sum + value, count + 1)
    });
    (count > 0).then(|| sum / count as f64)
}

/// Rounds a percentage to one decimal place.
#[expect(clippy::float_arithmetic, reason = "presentation rounding")]
#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Rounds a latency to the nearest whole millisecond, clamping negatives to
/// zero.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    reason = "value is rounded and clamped to the u64 range first"
)]
#[must_use]
pub fn round_to_millis(value: f64) -> u64 {
    value.round().clamp(0.0, u64::MAX as f64) as u64
}
