//! One question in, one updated transcript out.

use super::{Conversation, Credentials, Turn};
use crate::engine::{AnalysisEngine, Answer};
use crate::error::SamarthError;
use crate::fetch::{DatasetSource, FetchRequest};
use crate::reporting::TableSnapshot;
use std::sync::Arc;
use tracing::{info, warn};

/// The result of handling one question.
#[derive(Debug)]
pub struct QueryOutcome {
    /// The updated transcript.
    pub conversation: Conversation,
    /// Set when the question could not be answered. The transcript already
    /// carries an error turn for it, except for missing credentials.
    pub error: Option<SamarthError>,
}

impl QueryOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Fetches a dataset for each question and answers it with the engine.
///
/// # Example
///
/// ```rust,ignore
/// use samarth_engine::{AnalysisEngine, Conversation, Credentials, QueryHandler};
/// use samarth_engine::fetch::WebhookSource;
/// use std::sync::Arc;
///
/// let handler = QueryHandler::new(AnalysisEngine::default(), Arc::new(WebhookSource::new()?));
/// let credentials = Credentials::new(Some(api_key), Some(endpoint));
///
/// let outcome = handler.handle(Conversation::new(), "Share of Union Taxes in Telangana", &credentials);
/// for turn in outcome.conversation.turns() {
///     println!("{}: {}", turn.role, turn.content);
/// }
/// ```
#[derive(Clone)]
pub struct QueryHandler {
    engine: AnalysisEngine,
    source: Arc<dyn DatasetSource>,
}

static_assertions::assert_impl_all!(QueryHandler: Send, Sync);

impl QueryHandler {
    pub fn new(engine: AnalysisEngine, source: Arc<dyn DatasetSource>) -> Self {
        Self { engine, source }
    }

    pub fn engine(&self) -> &AnalysisEngine {
        &self.engine
    }

    /// Handle a question.
    ///
    /// Missing credentials leave the conversation untouched. Otherwise the
    /// user's turn is always recorded, followed by either an answer or an
    /// error turn.
    pub fn handle(
        &self,
        conversation: Conversation,
        question: &str,
        credentials: &Credentials,
    ) -> QueryOutcome {
        let (api_key, endpoint) = match credentials.require() {
            Ok(pair) => pair,
            Err(e) => {
                warn!("Query rejected: {}", e);
                return QueryOutcome {
                    conversation,
                    error: Some(e),
                };
            }
        };

        info!("Handling question via {} source", self.source.name());
        let conversation = conversation.with_turn(Turn::user(question));

        let request = FetchRequest::new(endpoint, question, api_key);
        match self.source.fetch(&request) {
            Ok(dataset) => {
                let answer = self.engine.answer(question, &dataset);
                QueryOutcome {
                    conversation: conversation.with_turn(answer_turn(answer)),
                    error: None,
                }
            }
            Err(e) => {
                warn!("Fetch failed [{}]: {}", e.error_code(), e);
                QueryOutcome {
                    conversation: conversation.with_turn(Turn::error(e.to_string())),
                    error: Some(e),
                }
            }
        }
    }
}

fn answer_turn(answer: Answer) -> Turn {
    let table = answer.table.as_ref().map(TableSnapshot::from_frame);
    Turn::assistant(answer.markdown, table, Some(answer.citation))
}
