//! Target endpoint configuration for the HTTP work unit

use crate::error::ConfigResult;
use crate::validation::{validate_enum_choice, validate_url, Validatable};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const VALID_METHODS: [&str; 7] = ["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"];

/// Target endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Endpoint URL; required (no usable default exists)
    pub url: String,

    /// HTTP method
    #[serde(default = "default_method")]
    pub method: String,

    /// Extra request headers
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// JSON request body, sent with application/json content type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,

    /// Status code counted as success; any 2xx when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_status: Option<u16>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            method: default_method(),
            headers: HashMap::new(),
            body: None,
            expected_status: None,
        }
    }
}

impl Validatable for TargetConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_url(&self.url, "url", self.domain_name())?;
        validate_enum_choice(&self.method, &VALID_METHODS, "method", self.domain_name())?;

        if let Some(status) = self.expected_status {
            if !(100..=599).contains(&status) {
                return Err(self.validation_error(format!(
                    "expected_status must be a valid HTTP status code, got {}",
                    status
                )));
            }
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "target"
    }
}

// Default value functions
fn default_method() -> String {
    "GET".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_target_config_defaults() {
        let config = TargetConfig::default();
        assert_eq!(config.method, "GET");
        assert!(config.headers.is_empty());
        assert!(config.body.is_none());
        assert!(config.expected_status.is_none());
    }

    #[test]
    fn test_target_config_validation() {
        let mut config = TargetConfig {
            url: "https://example.com/calculate".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        // Empty URL is rejected before any lane starts
        config.url = String::new();
        assert!(config.validate().is_err());

        config.url = "https://example.com/calculate".to_string();
        config.method = "TRACE".to_string();
        assert!(config.validate().is_err());

        config.method = "post".to_string();
        assert!(config.validate().is_ok());

        config.expected_status = Some(999);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_target_yaml() {
        let yaml = r#"
url: https://example.com/calculate
method: POST
headers:
  Content-Type: application/json
body:
  operation: divide
  number1: 5
  number2: 9
expected_status: 200
"#;
        let config: TargetConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.method, "POST");
        assert_eq!(config.expected_status, Some(200));
        assert_eq!(config.body, Some(json!({"operation": "divide", "number1": 5, "number2": 9})));
        assert!(config.validate().is_ok());
    }
}
