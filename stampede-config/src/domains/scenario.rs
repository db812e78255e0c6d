//! Load scenario configuration: stages, pacing, drain

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};
use stampede_core::Stage;
use std::time::Duration;

/// Load scenario configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Ordered concurrency stages; executed in listed order
    #[serde(default = "default_stages")]
    pub stages: Vec<StageConfig>,

    /// Pause between iterations on every lane
    #[serde(
        with = "crate::domains::utils::serde_duration_ms",
        default = "default_iteration_delay"
    )]
    pub iteration_delay: Duration,

    /// Maximum wait for in-flight lanes to finish after the final stage
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_drain_timeout"
    )]
    pub drain_timeout: Duration,
}

/// One stage: hold `target` lanes for `duration`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StageConfig {
    /// Stage duration in seconds
    #[serde(with = "crate::domains::utils::serde_duration")]
    pub duration: Duration,

    /// Target concurrency for the stage
    pub target: usize,
}

impl ScenarioConfig {
    /// Convert configured stages into the engine's domain type.
    pub fn stages(&self) -> Vec<Stage> {
        self.stages
            .iter()
            .map(|s| Stage::new(s.duration, s.target))
            .collect()
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            stages: default_stages(),
            iteration_delay: default_iteration_delay(),
            drain_timeout: default_drain_timeout(),
        }
    }
}

impl Validatable for ScenarioConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.stages.is_empty() {
            return Err(self.validation_error("at least one stage must be configured"));
        }

        if self.drain_timeout.is_zero() {
            return Err(self.validation_error("drain_timeout must be greater than 0"));
        }

        if let Some(max) = self.stages.iter().map(|s| s.target).max() {
            if max > 10_000 {
                tracing::warn!(
                    "stage target {} is unusually high; check file descriptor limits",
                    max
                );
            }
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "scenario"
    }
}

// Default value functions
fn default_stages() -> Vec<StageConfig> {
    vec![StageConfig {
        duration: Duration::from_secs(30),
        target: 10,
    }]
}

fn default_iteration_delay() -> Duration {
    Duration::ZERO
}

fn default_drain_timeout() -> Duration {
    Duration::from_secs(5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_config_defaults() {
        let config = ScenarioConfig::default();
        assert_eq!(config.stages.len(), 1);
        assert_eq!(config.stages[0].target, 10);
        assert_eq!(config.iteration_delay, Duration::ZERO);
        assert_eq!(config.drain_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_scenario_config_validation() {
        let mut config = ScenarioConfig::default();
        assert!(config.validate().is_ok());

        config.stages.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_duration_and_target_stages_are_valid() {
        // Ramp-down stages legitimately target zero lanes
        let config = ScenarioConfig {
            stages: vec![
                StageConfig {
                    duration: Duration::from_secs(10),
                    target: 50,
                },
                StageConfig {
                    duration: Duration::from_secs(10),
                    target: 0,
                },
            ],
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_stages_conversion() {
        let config = ScenarioConfig::default();
        let stages = config.stages();
        assert_eq!(stages.len(), 1);
        assert_eq!(stages[0].target, 10);
        assert_eq!(stages[0].duration, Duration::from_secs(30));
    }

    #[test]
    fn test_scenario_yaml_round_trip() {
        let yaml = r#"
stages:
  - duration: 20
    target: 50
  - duration: 10
    target: 0
iteration_delay: 100
drain_timeout: 3
"#;
        let config: ScenarioConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.stages.len(), 2);
        assert_eq!(config.stages[0].duration, Duration::from_secs(20));
        assert_eq!(config.iteration_delay, Duration::from_millis(100));
        assert_eq!(config.drain_timeout, Duration::from_secs(3));
    }
}
