//! Transit HTTP client.
//!
//! Provides async access to the journey-planner stop timetable
//! endpoint. Responses are validated before being handed to callers.

use crate::domain::StopId;

use super::error::TransitError;
use super::types::{StopTimetableDto, Timetable};

/// Default base URL for the journey-planner API.
const DEFAULT_BASE_URL: &str = "https://jp.translink.com.au/api";

/// Configuration for the transit client.
#[derive(Debug, Clone)]
pub struct TransitConfig {
    /// Base URL for the API (defaults to the production journey planner)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TransitConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for TransitConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Journey-planner API client.
#[derive(Debug, Clone)]
pub struct TransitClient {
    http: reqwest::Client,
    base_url: String,
}

impl TransitClient {
    /// Create a new transit client with the given configuration.
    pub fn new(config: TransitConfig) -> Result<Self, TransitError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Fetch the timetable for a stop.
    ///
    /// Returns the validated timetable: a response missing the stop
    /// name or the departures list is reported as `Malformed` even when
    /// the request itself succeeded.
    pub async fn get_stop_timetable(&self, stop: &StopId) -> Result<Timetable, TransitError> {
        let url = format!("{}/stop/timetable/{}", self.base_url, stop);

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(TransitError::StopNotFound { stop: stop.clone() });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransitError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let dto: StopTimetableDto =
            serde_json::from_str(&body).map_err(|e| TransitError::Json {
                message: format!(
                    "{} (body: {})",
                    e,
                    body.chars().take(500).collect::<String>()
                ),
            })?;

        Timetable::from_dto(dto).map_err(|source| TransitError::Malformed {
            stop: stop.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = TransitConfig::new();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn config_builder() {
        let config = TransitConfig::new()
            .with_base_url("http://localhost:8080/api")
            .with_timeout(5);

        assert_eq!(config.base_url, "http://localhost:8080/api");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn client_creation() {
        let client = TransitClient::new(TransitConfig::new());
        assert!(client.is_ok());
    }

    // Requests against the live API are not exercised here; the mock
    // client covers the fetch path in the refresh tests.
}
