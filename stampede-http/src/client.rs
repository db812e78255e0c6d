//! HTTP work-unit implementation

use crate::errors::HttpError;
use crate::types::HttpMethod;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Url};
use serde_json::Value as JsonValue;
use stampede_config::{HttpConfig, TargetConfig};
use stampede_core::{WorkError, WorkUnit};
use std::str::FromStr;
use tracing::debug;

/// One request/response exchange against a fixed target.
///
/// The request shape (method, URL, headers, body) is resolved once at
/// construction; `execute` only clones cheap handles, so the per-iteration
/// cost is the exchange itself.
pub struct HttpWorkUnit {
    client: Client,
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<JsonValue>,
    expected_status: Option<u16>,
}

impl HttpWorkUnit {
    /// Build the work unit from validated configuration.
    pub fn from_config(http: &HttpConfig, target: &TargetConfig) -> Result<Self, HttpError> {
        let method: HttpMethod = target.method.parse()?;

        let url = Url::parse(&target.url)
            .map_err(|e| HttpError::InvalidUrl(format!("{}: {}", target.url, e)))?;

        let mut headers = HeaderMap::new();
        for (name, value) in &target.headers {
            let header_name = HeaderName::from_str(name)
                .map_err(|_| HttpError::InvalidHeaderName(name.clone()))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| HttpError::InvalidHeaderValue(name.clone()))?;
            headers.insert(header_name, header_value);
        }

        debug!(
            "Building HTTP work unit: {} {} (timeout: {}s)",
            method,
            url,
            http.timeout.as_secs()
        );

        let client = Client::builder()
            .timeout(http.timeout)
            .connect_timeout(http.connect_timeout)
            .user_agent(&http.user_agent)
            .danger_accept_invalid_certs(!http.verify_ssl)
            .build()?;

        Ok(Self {
            client,
            method: method.into(),
            url,
            headers,
            body: target.body.clone(),
            expected_status: target.expected_status,
        })
    }

    fn status_matches(&self, status: reqwest::StatusCode) -> bool {
        match self.expected_status {
            Some(expected) => status.as_u16() == expected,
            None => status.is_success(),
        }
    }
}

#[async_trait]
impl WorkUnit for HttpWorkUnit {
    async fn execute(&self, _lane: usize) -> Result<(), WorkError> {
        let mut request = self
            .client
            .request(self.method.clone(), self.url.clone())
            .headers(self.headers.clone());

        if let Some(body) = &self.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(HttpError::NetworkError)?;
        let status = response.status();

        if !self.status_matches(status) {
            let expected = match self.expected_status {
                Some(code) => code.to_string(),
                None => "2xx".to_string(),
            };
            return Err(HttpError::UnexpectedStatus {
                status: status.as_u16(),
                expected,
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(url: &str) -> TargetConfig {
        TargetConfig {
            url: url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_config() {
        let unit = HttpWorkUnit::from_config(
            &HttpConfig::default(),
            &target("https://example.com/calculate"),
        )
        .unwrap();
        assert_eq!(unit.method, Method::GET);
        assert!(unit.body.is_none());
    }

    #[test]
    fn test_from_config_rejects_bad_url() {
        let result = HttpWorkUnit::from_config(&HttpConfig::default(), &target("not-a-url"));
        assert!(matches!(result, Err(HttpError::InvalidUrl(_))));
    }

    #[test]
    fn test_from_config_rejects_bad_header() {
        let mut config = target("https://example.com/");
        config
            .headers
            .insert("bad header\n".to_string(), "x".to_string());
        let result = HttpWorkUnit::from_config(&HttpConfig::default(), &config);
        assert!(matches!(result, Err(HttpError::InvalidHeaderName(_))));
    }

    #[test]
    fn test_status_matching() {
        let mut config = target("https://example.com/");
        config.expected_status = Some(201);
        let unit = HttpWorkUnit::from_config(&HttpConfig::default(), &config).unwrap();

        assert!(unit.status_matches(reqwest::StatusCode::CREATED));
        assert!(!unit.status_matches(reqwest::StatusCode::OK));

        let unit =
            HttpWorkUnit::from_config(&HttpConfig::default(), &target("https://example.com/"))
                .unwrap();
        assert!(unit.status_matches(reqwest::StatusCode::OK));
        assert!(!unit.status_matches(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
    }
}
