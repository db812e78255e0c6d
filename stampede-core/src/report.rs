//! Final run report and latency summary

use crate::threshold::{ThresholdResult, ThresholdSpec};
use crate::types::Sample;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Latency distribution over all recorded samples, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencySummary {
    pub mean_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
}

impl LatencySummary {
    /// Summarize recorded latencies; `None` when the run produced no samples.
    pub fn from_samples(samples: &[Sample]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let mut latencies: Vec<f64> = samples.iter().map(Sample::latency_ms).collect();
        latencies.sort_by(|a, b| a.total_cmp(b));

        let percentile = |p: usize| {
            let index = (latencies.len() * p / 100).min(latencies.len() - 1);
            latencies[index]
        };

        Some(Self {
            mean_ms: latencies.iter().sum::<f64>() / latencies.len() as f64,
            min_ms: latencies[0],
            max_ms: latencies[latencies.len() - 1],
            p50_ms: percentile(50),
            p95_ms: percentile(95),
            p99_ms: percentile(99),
        })
    }
}

/// Aggregate result of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub total_samples: u64,
    pub success_count: u64,
    pub failure_count: u64,

    /// Wall-clock duration of the run, stage hold plus drain
    pub wall_clock: Duration,

    pub requests_per_second: f64,

    /// `None` when no samples were recorded
    pub latency: Option<LatencySummary>,

    pub thresholds: Vec<ThresholdResult>,
}

impl RunReport {
    /// Aggregate the recorded samples and evaluate every threshold.
    ///
    /// Called only after all lanes have stopped or been abandoned; the sample
    /// slice is immutable from here on.
    pub fn build(samples: &[Sample], wall_clock: Duration, thresholds: &[ThresholdSpec]) -> Self {
        let success_count = samples.iter().filter(|s| s.outcome.is_success()).count() as u64;
        let total_samples = samples.len() as u64;

        let requests_per_second = if wall_clock.as_secs_f64() > 0.0 {
            total_samples as f64 / wall_clock.as_secs_f64()
        } else {
            0.0
        };

        Self {
            total_samples,
            success_count,
            failure_count: total_samples - success_count,
            wall_clock,
            requests_per_second,
            latency: LatencySummary::from_samples(samples),
            thresholds: thresholds.iter().map(|t| t.evaluate(samples)).collect(),
        }
    }

    /// True when every configured threshold passed.
    ///
    /// A run with no thresholds passes vacuously; the CLI maps this to its
    /// exit status.
    pub fn all_passed(&self) -> bool {
        self.thresholds.iter().all(|t| t.passed)
    }
}
