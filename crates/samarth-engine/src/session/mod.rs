//! Conversation state and the query handler.
//!
//! The [`Conversation`] is a plain value: the caller creates it at the start
//! of a session, passes it into [`QueryHandler::handle`], and gets the
//! updated transcript back. Nothing in the crate keeps history on its own.

mod handler;

pub use handler::{QueryHandler, QueryOutcome};

use crate::error::{Result, SamarthError};
use crate::reporting::{Citation, TableSnapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two things a user must supply before any question can run.
#[derive(Clone, Default)]
pub struct Credentials {
    /// data.gov.in API key, forwarded to the workflow.
    pub api_key: Option<String>,
    /// Workflow webhook URL.
    pub endpoint: Option<String>,
}

impl Credentials {
    pub fn new(api_key: Option<String>, endpoint: Option<String>) -> Self {
        Self { api_key, endpoint }
    }

    /// Return `(api_key, endpoint)`, or the first missing one as an error.
    ///
    /// Blank values count as missing. The API key is checked first.
    pub fn require(&self) -> Result<(&str, &str)> {
        let api_key = non_blank(self.api_key.as_deref())
            .ok_or_else(|| SamarthError::MissingCredential("data.gov.in API key".to_string()))?;
        let endpoint = non_blank(self.endpoint.as_deref())
            .ok_or_else(|| SamarthError::MissingCredential("workflow webhook URL".to_string()))?;
        Ok((api_key, endpoint))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Who said a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One entry in the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    /// Markdown text.
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<TableSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<Citation>,
    #[serde(default)]
    pub is_error: bool,
    pub at: DateTime<Utc>,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            table: None,
            citation: None,
            is_error: false,
            at: Utc::now(),
        }
    }

    pub fn assistant(
        content: impl Into<String>,
        table: Option<TableSnapshot>,
        citation: Option<Citation>,
    ) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            table,
            citation,
            is_error: false,
            at: Utc::now(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            table: None,
            citation: None,
            is_error: true,
            at: Utc::now(),
        }
    }
}

/// The running transcript of a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Append a turn, returning the updated conversation.
    pub fn with_turn(mut self, turn: Turn) -> Self {
        self.turns.push(turn);
        self
    }
}
