//! Stages, lanes, and recorded samples

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A timed interval with a target concurrency level.
///
/// Stages execute in listed order; the total run duration is the sum of the
/// stage durations. Concurrency steps to `target` the instant a stage begins
/// and holds there for the whole stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    /// How long to hold this stage's concurrency level
    pub duration: Duration,

    /// Number of lanes that should be active during the stage
    pub target: usize,
}

impl Stage {
    pub fn new(duration: Duration, target: usize) -> Self {
        Self { duration, target }
    }
}

/// Outcome of a single work-unit execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

/// One recorded work-unit execution.
///
/// Samples are append-only: once recorded they are never mutated or removed
/// before final aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    /// Slot index of the lane that executed the work unit
    pub lane: usize,

    /// When the execution completed
    pub timestamp: DateTime<Utc>,

    /// Wall-clock latency of the exchange
    pub latency: Duration,

    pub outcome: Outcome,
}

impl Sample {
    /// Latency in fractional milliseconds, the unit thresholds are stated in.
    pub fn latency_ms(&self) -> f64 {
        self.latency.as_secs_f64() * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_is_success() {
        assert!(Outcome::Success.is_success());
        assert!(!Outcome::Failure.is_success());
    }

    #[test]
    fn test_sample_latency_ms() {
        let sample = Sample {
            lane: 0,
            timestamp: Utc::now(),
            latency: Duration::from_millis(250),
            outcome: Outcome::Success,
        };
        assert_eq!(sample.latency_ms(), 250.0);
    }

    #[test]
    fn test_stage_new() {
        let stage = Stage::new(Duration::from_secs(20), 50);
        assert_eq!(stage.duration, Duration::from_secs(20));
        assert_eq!(stage.target, 50);
    }
}
