//! Error types for the question-answering pipeline.
//!
//! [`SamarthError`] covers everything that can stop a query before an
//! answer is produced: missing credentials, transport faults while talking
//! to the data workflow, and payloads that do not match any known shape.
//! Faults raised while *analysing* a table are a different thing; see
//! [`crate::routines::AnalysisFault`], which never leaves the engine.
//!
//! Errors are serializable so a front end can render them by code.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// Broad grouping of [`SamarthError`] variants, used to pick a user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The user has to supply something before a query can run.
    Credential,
    /// The workflow could not be reached or answered with a bad status.
    Transport,
    /// The workflow answered, but not with a usable dataset.
    Protocol,
    /// Anything else.
    Internal,
}

/// The main error type for the pipeline.
#[derive(Error, Debug)]
pub enum SamarthError {
    /// A required credential (API key, workflow endpoint) was not supplied.
    #[error("Please enter your {0} to start")]
    MissingCredential(String),

    /// The workflow did not answer within the configured timeout.
    #[error("The data workflow did not respond within {secs} seconds")]
    Timeout { secs: u64 },

    /// The workflow endpoint could not be reached at all.
    #[error("Failed to contact the data workflow: {0}")]
    Connection(String),

    /// The workflow answered with a non-success HTTP status.
    #[error("HTTP error {status} from the data workflow: {body}")]
    HttpStatus { status: u16, body: String },

    /// The webhook fired, but the workflow is not wired to respond with data.
    #[error(
        "Error from the data workflow: {message}. The workflow is not returning data; \
         make sure it is activated and its webhook responds with the 'Respond to Webhook' node"
    )]
    WorkflowNotActive { message: String },

    /// The workflow reported an explicit failure.
    #[error("Error from the data workflow: {message} (raw response: {raw})")]
    WorkflowFailed { message: String, raw: String },

    /// The workflow answered with a JSON shape we do not know.
    #[error("Received an unknown response structure from the data workflow: {raw}")]
    UnknownResponse { raw: String },

    /// The workflow answered with something that is not valid data.
    #[error("Malformed response from the data workflow ({reason}): {raw}")]
    MalformedPayload { reason: String, raw: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// HTTP request error not covered by a more specific variant.
    #[cfg(feature = "webhook")]
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<SamarthError>,
    },
}

impl SamarthError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        SamarthError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingCredential(_) => "MISSING_CREDENTIAL",
            Self::Timeout { .. } => "TIMEOUT",
            Self::Connection(_) => "CONNECTION_FAILED",
            Self::HttpStatus { .. } => "HTTP_STATUS",
            Self::WorkflowNotActive { .. } => "WORKFLOW_NOT_ACTIVE",
            Self::WorkflowFailed { .. } => "WORKFLOW_FAILED",
            Self::UnknownResponse { .. } => "UNKNOWN_RESPONSE",
            Self::MalformedPayload { .. } => "MALFORMED_PAYLOAD",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            #[cfg(feature = "webhook")]
            Self::HttpRequest(_) => "HTTP_REQUEST_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Which part of the taxonomy this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingCredential(_) => ErrorCategory::Credential,
            Self::Timeout { .. } | Self::Connection(_) | Self::HttpStatus { .. } => {
                ErrorCategory::Transport
            }
            #[cfg(feature = "webhook")]
            Self::HttpRequest(_) => ErrorCategory::Transport,
            Self::WorkflowNotActive { .. }
            | Self::WorkflowFailed { .. }
            | Self::UnknownResponse { .. }
            | Self::MalformedPayload { .. } => ErrorCategory::Protocol,
            Self::InvalidConfig(_) | Self::Internal(_) | Self::Polars(_) => {
                ErrorCategory::Internal
            }
            Self::WithContext { source, .. } => source.category(),
        }
    }

    /// Check if this error came from the transport layer.
    pub fn is_transport(&self) -> bool {
        self.category() == ErrorCategory::Transport
    }

    /// Check if the query never started because a credential was missing.
    pub fn is_missing_credential(&self) -> bool {
        self.category() == ErrorCategory::Credential
    }
}

/// Errors are serialized as a struct with `code`, `category` and `message`.
impl Serialize for SamarthError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("SamarthError", 3)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("category", &self.category())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, SamarthError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| SamarthError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            SamarthError::MissingCredential("API key".to_string()).error_code(),
            "MISSING_CREDENTIAL"
        );
        assert_eq!(
            SamarthError::UnknownResponse {
                raw: "{}".to_string()
            }
            .error_code(),
            "UNKNOWN_RESPONSE"
        );
    }

    #[test]
    fn test_transport_errors_are_distinct() {
        let timeout = SamarthError::Timeout { secs: 60 };
        let connection = SamarthError::Connection("refused".to_string());
        let status = SamarthError::HttpStatus {
            status: 404,
            body: "not found".to_string(),
        };

        assert!(timeout.is_transport());
        assert!(connection.is_transport());
        assert!(status.is_transport());

        let codes = [
            timeout.error_code(),
            connection.error_code(),
            status.error_code(),
        ];
        assert_eq!(codes, ["TIMEOUT", "CONNECTION_FAILED", "HTTP_STATUS"]);
    }

    #[test]
    fn test_category() {
        assert_eq!(
            SamarthError::MissingCredential("API key".to_string()).category(),
            ErrorCategory::Credential
        );
        assert_eq!(
            SamarthError::WorkflowNotActive {
                message: "Workflow was started".to_string()
            }
            .category(),
            ErrorCategory::Protocol
        );
        assert_eq!(
            SamarthError::Internal("boom".to_string()).category(),
            ErrorCategory::Internal
        );
    }

    #[test]
    fn test_unknown_response_echoes_payload() {
        let error = SamarthError::UnknownResponse {
            raw: r#"{"foo":"bar"}"#.to_string(),
        };
        assert!(error.to_string().contains(r#"{"foo":"bar"}"#));
    }

    #[test]
    fn test_error_serialization() {
        let error = SamarthError::HttpStatus {
            status: 500,
            body: "oops".to_string(),
        };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("HTTP_STATUS"));
        assert!(json.contains("transport"));
        assert!(json.contains("500"));
    }

    #[test]
    fn test_with_context() {
        let error = SamarthError::Connection("refused".to_string()).with_context("Fetching data");
        assert!(error.to_string().contains("Fetching data"));
        assert_eq!(error.error_code(), "CONNECTION_FAILED");
        assert!(error.is_transport());
    }
}
