//! Interpreting workflow responses.
//!
//! Known shapes:
//!
//! - `{"data": {"records": [...], "title"?: ...}, "resource_id"?: ...}`: a dataset
//! - `{"message": "Workflow was started"}`: the webhook fired but the
//!   workflow does not respond with data (not activated / wrong response mode)
//! - `{"error": ..., "message"?: ...}` or any other `{"message": ...}`: an
//!   explicit failure
//!
//! Anything else is an unknown response and is echoed verbatim.

use crate::dataset::Dataset;
use crate::error::{Result, SamarthError};
use serde_json::Value;
use tracing::debug;

/// What n8n answers when a webhook starts a workflow that never responds.
pub const WORKFLOW_STARTED: &str = "Workflow was started";

/// Parse a raw response body.
///
/// The raw text, not a re-serialization, is what error messages echo.
pub fn parse_body(body: &str) -> Result<Dataset> {
    let value: Value = serde_json::from_str(body).map_err(|e| SamarthError::MalformedPayload {
        reason: format!("response is not valid JSON: {}", e),
        raw: body.to_string(),
    })?;
    interpret(&value, body.trim())
}

/// Interpret an already-decoded response.
pub fn parse_payload(value: &Value) -> Result<Dataset> {
    interpret(value, &value.to_string())
}

fn interpret(value: &Value, raw: &str) -> Result<Dataset> {
    if let Some(data) = value.get("data")
        && let Some(records) = data.get("records")
    {
        let records = records
            .as_array()
            .ok_or_else(|| SamarthError::MalformedPayload {
                reason: "'data.records' is not a list".to_string(),
                raw: raw.to_string(),
            })?;
        let title = data.get("title").and_then(Value::as_str);
        let resource_id = value.get("resource_id").map(text_of);
        debug!("Workflow returned {} record(s)", records.len());
        return Dataset::from_records(records, title, resource_id.as_deref());
    }

    if let Some(error) = value.get("error") {
        let message = value
            .get("message")
            .map(text_of)
            .unwrap_or_else(|| text_of(error));
        return Err(SamarthError::WorkflowFailed {
            message,
            raw: raw.to_string(),
        });
    }

    if let Some(message) = value.get("message") {
        let message = text_of(message);
        if message.trim() == WORKFLOW_STARTED {
            return Err(SamarthError::WorkflowNotActive { message });
        }
        return Err(SamarthError::WorkflowFailed {
            message,
            raw: raw.to_string(),
        });
    }

    Err(SamarthError::UnknownResponse {
        raw: raw.to_string(),
    })
}

// Strings without their JSON quotes, everything else as JSON text.
fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
