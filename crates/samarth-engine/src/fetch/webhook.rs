//! HTTP webhook source.
//!
//! This module provides the [`WebhookSource`] which implements the
//! [`DatasetSource`] trait by POSTing the question to a workflow webhook.

use super::{parse_body, DatasetSource, FetchRequest};
use crate::dataset::Dataset;
use crate::error::{Result, SamarthError};
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{info, warn};

/// Default timeout for workflow requests in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default user agent sent to the workflow.
const DEFAULT_USER_AGENT: &str = concat!("samarth-engine/", env!("CARGO_PKG_VERSION"));

/// Configuration for the webhook source.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// User agent header.
    pub user_agent: String,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl WebhookConfig {
    /// Create a new configuration builder.
    pub fn builder() -> WebhookConfigBuilder {
        WebhookConfigBuilder::default()
    }
}

/// Builder for [`WebhookConfig`].
#[derive(Default)]
pub struct WebhookConfigBuilder {
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
}

impl WebhookConfigBuilder {
    /// Set the request timeout in seconds.
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> WebhookConfig {
        WebhookConfig {
            timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            user_agent: self
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        }
    }
}

/// Fetches datasets by POSTing `{query, api_key}` to a workflow webhook.
///
/// # Example
///
/// ```rust,ignore
/// use samarth_engine::fetch::{WebhookConfig, WebhookSource};
///
/// let source = WebhookSource::with_config(
///     WebhookConfig::builder().timeout_secs(30).build(),
/// )?;
/// ```
pub struct WebhookSource {
    config: WebhookConfig,
    client: Client,
}

impl WebhookSource {
    /// Create a webhook source with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> Result<Self> {
        Self::with_config(WebhookConfig::default())
    }

    /// Create a webhook source with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SamarthError::InvalidConfig`] for a zero timeout, or an
    /// internal error if the HTTP client cannot be created.
    pub fn with_config(config: WebhookConfig) -> Result<Self> {
        if config.timeout_secs == 0 {
            return Err(SamarthError::InvalidConfig(
                crate::config::ConfigValidationError::InvalidTimeout(0).to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| SamarthError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &WebhookConfig {
        &self.config
    }

    fn classify(&self, error: reqwest::Error) -> SamarthError {
        if error.is_timeout() {
            SamarthError::Timeout {
                secs: self.config.timeout_secs,
            }
        } else if error.is_connect() {
            SamarthError::Connection(error.to_string())
        } else if error.is_builder() {
            SamarthError::InvalidConfig(format!("Invalid workflow endpoint: {}", error))
        } else {
            SamarthError::HttpRequest(error)
        }
    }
}

impl DatasetSource for WebhookSource {
    fn fetch(&self, request: &FetchRequest) -> Result<Dataset> {
        info!("Contacting data workflow at {}", request.endpoint);

        let response = self
            .client
            .post(&request.endpoint)
            .json(&request.payload())
            .send()
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().map_err(|e| self.classify(e))?;

        if !status.is_success() {
            warn!("Data workflow answered with HTTP {}", status);
            return Err(SamarthError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let dataset = parse_body(&body)?;
        info!(
            "Successfully fetched {} record(s) from '{}'",
            dataset.height(),
            dataset.title
        );
        Ok(dataset)
    }

    fn name(&self) -> &str {
        "webhook"
    }
}

// ============================================================================
// Tests
// ============================================================================
