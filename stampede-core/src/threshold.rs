//! Threshold specifications and aggregate metric evaluation

use crate::types::Sample;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Aggregate function computed over the full recorded sample sequence.
///
/// Latency metrics are expressed in milliseconds; `FailureRate` is the
/// fraction of failed samples in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AggregateMetric {
    Mean,
    Percentile(u8),
    Min,
    Max,
    FailureRate,
}

impl AggregateMetric {
    /// Compute this metric over the recorded samples.
    ///
    /// Returns `None` when no samples were recorded; thresholds evaluated
    /// against an empty run fail automatically rather than dividing by zero.
    pub fn compute(&self, samples: &[Sample]) -> Option<f64> {
        if samples.is_empty() {
            return None;
        }

        match self {
            AggregateMetric::Mean => {
                let sum: f64 = samples.iter().map(Sample::latency_ms).sum();
                Some(sum / samples.len() as f64)
            }
            AggregateMetric::Percentile(p) => {
                let mut latencies: Vec<f64> = samples.iter().map(Sample::latency_ms).collect();
                latencies.sort_by(|a, b| a.total_cmp(b));
                let index = (latencies.len() * *p as usize / 100).min(latencies.len() - 1);
                Some(latencies[index])
            }
            AggregateMetric::Min => samples
                .iter()
                .map(Sample::latency_ms)
                .min_by(|a, b| a.total_cmp(b)),
            AggregateMetric::Max => samples
                .iter()
                .map(Sample::latency_ms)
                .max_by(|a, b| a.total_cmp(b)),
            AggregateMetric::FailureRate => {
                let failed = samples.iter().filter(|s| !s.outcome.is_success()).count();
                Some(failed as f64 / samples.len() as f64)
            }
        }
    }
}

impl fmt::Display for AggregateMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateMetric::Mean => write!(f, "mean"),
            AggregateMetric::Percentile(p) => write!(f, "p{}", p),
            AggregateMetric::Min => write!(f, "min"),
            AggregateMetric::Max => write!(f, "max"),
            AggregateMetric::FailureRate => write!(f, "failure_rate"),
        }
    }
}

impl FromStr for AggregateMetric {
    type Err = MetricParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        match lowered.as_str() {
            "mean" | "avg" => Ok(AggregateMetric::Mean),
            "min" => Ok(AggregateMetric::Min),
            "max" => Ok(AggregateMetric::Max),
            "failure_rate" | "error_rate" => Ok(AggregateMetric::FailureRate),
            other => {
                // Accept both the "p90" and the "p(90)" spellings
                let digits = other
                    .strip_prefix('p')
                    .map(|rest| rest.trim_start_matches('(').trim_end_matches(')'))
                    .ok_or_else(|| MetricParseError::UnknownMetric(s.to_string()))?;

                let percentile: u8 = digits
                    .parse()
                    .map_err(|_| MetricParseError::UnknownMetric(s.to_string()))?;

                if percentile == 0 || percentile > 100 {
                    return Err(MetricParseError::PercentileOutOfRange(percentile));
                }

                Ok(AggregateMetric::Percentile(percentile))
            }
        }
    }
}

impl TryFrom<String> for AggregateMetric {
    type Error = MetricParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AggregateMetric> for String {
    fn from(metric: AggregateMetric) -> Self {
        metric.to_string()
    }
}

/// Errors that can occur when parsing metric names
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetricParseError {
    #[error("Unknown metric: '{0}'. Supported metrics are: mean, p1..p100, min, max, failure_rate")]
    UnknownMetric(String),

    #[error("Percentile must be within 1..=100, got {0}")]
    PercentileOutOfRange(u8),
}

/// Comparison operator applied between a computed metric and its limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Comparator {
    Le,
    Lt,
    Ge,
    Gt,
}

impl Comparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparator::Le => "<=",
            Comparator::Lt => "<",
            Comparator::Ge => ">=",
            Comparator::Gt => ">",
        }
    }

    pub fn evaluate(&self, computed: f64, limit: f64) -> bool {
        match self {
            Comparator::Le => computed <= limit,
            Comparator::Lt => computed < limit,
            Comparator::Ge => computed >= limit,
            Comparator::Gt => computed > limit,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Comparator {
    type Err = ComparatorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<=" => Ok(Comparator::Le),
            "<" => Ok(Comparator::Lt),
            ">=" => Ok(Comparator::Ge),
            ">" => Ok(Comparator::Gt),
            _ => Err(ComparatorParseError::InvalidComparator(s.to_string())),
        }
    }
}

impl TryFrom<String> for Comparator {
    type Error = ComparatorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Comparator> for String {
    fn from(comparator: Comparator) -> Self {
        comparator.as_str().to_string()
    }
}

/// Errors that can occur when parsing comparators
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComparatorParseError {
    #[error("Invalid comparator: '{0}'. Supported comparators are: <=, <, >=, >")]
    InvalidComparator(String),
}

/// A pass/fail rule over an aggregate metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSpec {
    pub metric: AggregateMetric,
    pub comparator: Comparator,
    pub limit: f64,
}

impl ThresholdSpec {
    pub fn new(metric: AggregateMetric, comparator: Comparator, limit: f64) -> Self {
        Self {
            metric,
            comparator,
            limit,
        }
    }

    /// Evaluate this threshold over the full recorded sample sequence.
    ///
    /// A run with zero recorded samples fails every threshold.
    pub fn evaluate(&self, samples: &[Sample]) -> ThresholdResult {
        let computed = self.metric.compute(samples);
        let passed = computed
            .map(|value| self.comparator.evaluate(value, self.limit))
            .unwrap_or(false);

        ThresholdResult {
            metric: self.metric,
            comparator: self.comparator,
            limit: self.limit,
            computed,
            passed,
        }
    }
}

impl fmt::Display for ThresholdSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.metric, self.comparator, self.limit)
    }
}

/// Outcome of evaluating one threshold after the run completed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdResult {
    pub metric: AggregateMetric,
    pub comparator: Comparator,
    pub limit: f64,

    /// Computed metric value; `None` when no samples were recorded
    pub computed: Option<f64>,

    pub passed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Outcome;
    use chrono::Utc;
    use std::time::Duration;

    fn sample(latency_ms: u64, outcome: Outcome) -> Sample {
        Sample {
            lane: 0,
            timestamp: Utc::now(),
            latency: Duration::from_millis(latency_ms),
            outcome,
        }
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!("mean".parse::<AggregateMetric>().unwrap(), AggregateMetric::Mean);
        assert_eq!("avg".parse::<AggregateMetric>().unwrap(), AggregateMetric::Mean);
        assert_eq!("p90".parse::<AggregateMetric>().unwrap(), AggregateMetric::Percentile(90));
        assert_eq!("p(90)".parse::<AggregateMetric>().unwrap(), AggregateMetric::Percentile(90));
        assert_eq!("MAX".parse::<AggregateMetric>().unwrap(), AggregateMetric::Max);
        assert_eq!(
            "failure_rate".parse::<AggregateMetric>().unwrap(),
            AggregateMetric::FailureRate
        );

        assert!("p0".parse::<AggregateMetric>().is_err());
        assert!("p101".parse::<AggregateMetric>().is_err());
        assert!("median".parse::<AggregateMetric>().is_err());
    }

    #[test]
    fn test_metric_display_round_trip() {
        for metric in [
            AggregateMetric::Mean,
            AggregateMetric::Percentile(95),
            AggregateMetric::Min,
            AggregateMetric::Max,
            AggregateMetric::FailureRate,
        ] {
            assert_eq!(metric.to_string().parse::<AggregateMetric>().unwrap(), metric);
        }
    }

    #[test]
    fn test_comparator_from_str() {
        assert_eq!("<=".parse::<Comparator>().unwrap(), Comparator::Le);
        assert_eq!("<".parse::<Comparator>().unwrap(), Comparator::Lt);
        assert_eq!(">=".parse::<Comparator>().unwrap(), Comparator::Ge);
        assert_eq!(">".parse::<Comparator>().unwrap(), Comparator::Gt);
        assert!("==".parse::<Comparator>().is_err());
    }

    #[test]
    fn test_comparator_evaluate() {
        assert!(Comparator::Le.evaluate(200.0, 200.0));
        assert!(!Comparator::Lt.evaluate(200.0, 200.0));
        assert!(Comparator::Ge.evaluate(200.0, 200.0));
        assert!(Comparator::Gt.evaluate(201.0, 200.0));
    }

    #[test]
    fn test_mean_over_samples() {
        let samples = vec![
            sample(50, Outcome::Success),
            sample(100, Outcome::Success),
            sample(150, Outcome::Success),
        ];
        assert_eq!(AggregateMetric::Mean.compute(&samples), Some(100.0));
    }

    #[test]
    fn test_percentile_over_samples() {
        let samples: Vec<Sample> = (1..=100).map(|ms| sample(ms, Outcome::Success)).collect();
        let p90 = AggregateMetric::Percentile(90).compute(&samples).unwrap();
        assert!((90.0..=92.0).contains(&p90), "p90 was {}", p90);

        // p100 must clamp to the largest recorded latency
        let p100 = AggregateMetric::Percentile(100).compute(&samples).unwrap();
        assert_eq!(p100, 100.0);
    }

    #[test]
    fn test_failure_rate() {
        let samples = vec![
            sample(10, Outcome::Success),
            sample(10, Outcome::Failure),
            sample(10, Outcome::Failure),
            sample(10, Outcome::Failure),
        ];
        assert_eq!(AggregateMetric::FailureRate.compute(&samples), Some(0.75));
    }

    #[test]
    fn test_metrics_on_empty_run() {
        assert_eq!(AggregateMetric::Mean.compute(&[]), None);
        assert_eq!(AggregateMetric::FailureRate.compute(&[]), None);
    }

    #[test]
    fn test_threshold_evaluate() {
        let samples = vec![sample(50, Outcome::Success), sample(50, Outcome::Success)];

        let result = ThresholdSpec::new(AggregateMetric::Mean, Comparator::Le, 200.0)
            .evaluate(&samples);
        assert!(result.passed);
        assert_eq!(result.computed, Some(50.0));

        let result = ThresholdSpec::new(AggregateMetric::Mean, Comparator::Lt, 50.0)
            .evaluate(&samples);
        assert!(!result.passed);
    }

    #[test]
    fn test_threshold_fails_on_zero_samples() {
        let result =
            ThresholdSpec::new(AggregateMetric::Mean, Comparator::Le, 1000.0).evaluate(&[]);
        assert!(!result.passed);
        assert_eq!(result.computed, None);
    }

    #[test]
    fn test_threshold_serde() {
        let raw = r#"{"metric": "p90", "comparator": "<=", "limit": 350.0}"#;
        let spec: ThresholdSpec = serde_json::from_str(raw).unwrap();
        assert_eq!(spec.metric, AggregateMetric::Percentile(90));
        assert_eq!(spec.comparator, Comparator::Le);
        assert_eq!(spec.limit, 350.0);
    }
}
