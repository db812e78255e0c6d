//! Domain-specific configuration modules

pub mod http;
pub mod logging;
pub mod scenario;
pub mod target;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};
use stampede_core::{AggregateMetric, Comparator, ThresholdSpec};
use std::time::Duration;

/// Main Stampede configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StampedeConfig {
    /// Load scenario: stages, pacing, drain
    #[serde(default)]
    pub scenario: scenario::ScenarioConfig,

    /// Target endpoint for the HTTP work unit
    #[serde(default)]
    pub target: target::TargetConfig,

    /// HTTP client configuration
    #[serde(default)]
    pub http: http::HttpConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,

    /// Pass/fail thresholds evaluated over the full run
    #[serde(default)]
    pub thresholds: Vec<ThresholdSpec>,
}

impl StampedeConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.scenario.validate()?;
        self.target.validate()?;
        self.http.validate()?;
        self.logging.validate()?;

        for threshold in &self.thresholds {
            if !threshold.limit.is_finite() {
                return Err(crate::error::ConfigError::DomainError {
                    domain: "thresholds".to_string(),
                    message: format!("limit for {} must be finite", threshold.metric),
                });
            }
        }

        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = StampedeConfig {
            scenario: scenario::ScenarioConfig {
                stages: vec![
                    scenario::StageConfig {
                        duration: Duration::from_secs(20),
                        target: 50,
                    },
                    scenario::StageConfig {
                        duration: Duration::from_secs(20),
                        target: 100,
                    },
                    scenario::StageConfig {
                        duration: Duration::from_secs(10),
                        target: 0,
                    },
                ],
                iteration_delay: Duration::from_millis(100),
                ..Default::default()
            },
            target: target::TargetConfig {
                url: "https://example.com/endpoint".to_string(),
                method: "POST".to_string(),
                body: Some(serde_json::json!({"operation": "divide", "number1": 5, "number2": 9})),
                expected_status: Some(200),
                ..Default::default()
            },
            thresholds: vec![
                ThresholdSpec::new(AggregateMetric::Mean, Comparator::Le, 200.0),
                ThresholdSpec::new(AggregateMetric::Percentile(90), Comparator::Le, 350.0),
            ],
            ..Default::default()
        };

        serde_yaml::to_string(&config)
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_needs_a_url() {
        let config = StampedeConfig::default();
        assert!(config.validate_all().is_err());
    }

    #[test]
    fn test_full_config_validates() {
        let mut config = StampedeConfig::default();
        config.target.url = "https://example.com/calculate".to_string();
        assert!(config.validate_all().is_ok());
    }

    #[test]
    fn test_nonfinite_threshold_limit_rejected() {
        let mut config = StampedeConfig::default();
        config.target.url = "https://example.com/calculate".to_string();
        config.thresholds = vec![ThresholdSpec::new(
            AggregateMetric::Mean,
            Comparator::Le,
            f64::NAN,
        )];
        assert!(config.validate_all().is_err());
    }

    #[test]
    fn test_generate_sample_parses_back() {
        let sample = StampedeConfig::generate_sample();
        let config: StampedeConfig = serde_yaml::from_str(&sample).unwrap();
        assert!(config.validate_all().is_ok());
        assert_eq!(config.scenario.stages.len(), 3);
        assert_eq!(config.thresholds.len(), 2);
    }
}
