//! Fetching datasets from the data workflow.
//!
//! The workflow (an n8n webhook in production) receives the question and a
//! data.gov.in API key, decides which resource to pull, and answers with
//! records. This module only defines the seam and the response contract;
//! dataset selection happens on the other side.
//!
//! # Feature Flag
//!
//! [`WebhookSource`] needs the `webhook` feature (on by default). The
//! [`DatasetSource`] trait, [`ClosureSource`] and the response parser are
//! always available.
//!
//! # Example
//!
//! ```rust,ignore
//! use samarth_engine::fetch::{DatasetSource, FetchRequest, WebhookSource};
//!
//! let source = WebhookSource::new()?;
//! let dataset = source.fetch(&FetchRequest::new(
//!     "https://n8n.example.org/webhook/samarth",
//!     "Share of Union Taxes in Telangana",
//!     api_key,
//! ))?;
//! ```

mod response;
#[cfg(feature = "webhook")]
mod webhook;

pub use response::{WORKFLOW_STARTED, parse_body, parse_payload};
#[cfg(feature = "webhook")]
pub use webhook::{WebhookConfig, WebhookConfigBuilder, WebhookSource};

use crate::dataset::Dataset;
use crate::error::Result;
use serde::Serialize;
use std::fmt;

/// One call to the workflow.
#[derive(Clone)]
pub struct FetchRequest {
    pub endpoint: String,
    pub query: String,
    pub api_key: String,
}

impl FetchRequest {
    pub fn new(
        endpoint: impl Into<String>,
        query: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            query: query.into(),
            api_key: api_key.into(),
        }
    }

    /// The JSON body sent to the workflow.
    pub fn payload(&self) -> WebhookPayload<'_> {
        WebhookPayload {
            query: &self.query,
            api_key: &self.api_key,
        }
    }
}

// Keep the key out of logs.
impl fmt::Debug for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchRequest")
            .field("endpoint", &self.endpoint)
            .field("query", &self.query)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Wire body: `{"query": ..., "api_key": ...}`.
#[derive(Debug, Serialize)]
pub struct WebhookPayload<'a> {
    pub query: &'a str,
    pub api_key: &'a str,
}

/// Something that can turn a question into a dataset.
///
/// Implementations must be `Send + Sync`. Errors should use the transport
/// and protocol variants of [`crate::SamarthError`] so callers can tell
/// a timeout from a misconfigured workflow.
pub trait DatasetSource: Send + Sync {
    /// Fetch the dataset for a question.
    fn fetch(&self, request: &FetchRequest) -> Result<Dataset>;

    /// Source name for logging.
    fn name(&self) -> &str;
}

/// A closure-based source, for offline payloads and tests.
///
/// # Example
///
/// ```rust,ignore
/// let source = ClosureSource::new("fixture", |_req| parse_body(&saved_body));
/// ```
pub struct ClosureSource<F>
where
    F: Fn(&FetchRequest) -> Result<Dataset> + Send + Sync,
{
    name: String,
    callback: F,
}

impl<F> ClosureSource<F>
where
    F: Fn(&FetchRequest) -> Result<Dataset> + Send + Sync,
{
    pub fn new(name: impl Into<String>, callback: F) -> Self {
        Self {
            name: name.into(),
            callback,
        }
    }
}

impl<F> DatasetSource for ClosureSource<F>
where
    F: Fn(&FetchRequest) -> Result<Dataset> + Send + Sync,
{
    fn fetch(&self, request: &FetchRequest) -> Result<Dataset> {
        (self.callback)(request)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let request = FetchRequest::new("http://localhost/hook", "rainfall in Kerala", "key-1");
        let json = serde_json::to_value(request.payload()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"query": "rainfall in Kerala", "api_key": "key-1"})
        );
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let request = FetchRequest::new("http://localhost/hook", "q", "secret-key");
        let debug = format!("{:?}", request);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_closure_source() {
        let source = ClosureSource::new("fixture", |req: &FetchRequest| {
            parse_body(&format!(
                r#"{{"data": {{"records": [{{"q": "{}"}}], "title": "Echo"}}}}"#,
                req.query
            ))
        });

        let dataset = source
            .fetch(&FetchRequest::new("unused", "hello", "k"))
            .unwrap();
        assert_eq!(source.name(), "fixture");
        assert_eq!(dataset.title, "Echo");
        assert_eq!(dataset.height(), 1);
    }
}
