//! The analysis engine: route, run, recover, cite.

use crate::config::EngineConfig;
use crate::dataset::Dataset;
use crate::reporting::Citation;
use crate::router::{Intent, Router};
use crate::routines::{routine_for, summarize, AnalysisContext, AnalysisResult};
use polars::prelude::DataFrame;
use tracing::{debug, info, warn};

/// A rendered answer to one question.
#[derive(Debug, Clone)]
pub struct Answer {
    /// The intent the question was routed to.
    pub intent: Intent,
    /// Markdown shown to the user. Never empty.
    pub markdown: String,
    /// Table behind the answer, if any.
    pub table: Option<DataFrame>,
    pub citation: Citation,
    /// The analysis fault that was recovered from, if any.
    pub fault: Option<String>,
}

/// Answers questions about a dataset without ever failing.
///
/// # Example
///
/// ```rust,ignore
/// use samarth_engine::{AnalysisEngine, Dataset, EngineConfig};
///
/// let engine = AnalysisEngine::new(EngineConfig::default());
/// let answer = engine.answer("Share of Union Taxes in Telangana", &dataset);
/// println!("{}\n\n{}", answer.markdown, answer.citation);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AnalysisEngine {
    config: EngineConfig,
    router: Router,
}

static_assertions::assert_impl_all!(AnalysisEngine: Send, Sync);

impl AnalysisEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            router: Router::default(),
        }
    }

    /// Replace the keyword router.
    pub fn with_router(mut self, router: Router) -> Self {
        self.router = router;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Answer a question.
    ///
    /// A routine fault is turned into a message followed by the generic
    /// summary; a routine with nothing to say is replaced by the summary.
    pub fn answer(&self, question: &str, dataset: &Dataset) -> Answer {
        let intent = self.router.route(question);
        let routine = routine_for(intent);
        info!(
            "Answering with {} over {} record(s) from '{}'",
            routine.name(),
            dataset.height(),
            dataset.title
        );

        let ctx = AnalysisContext {
            question,
            dataset,
            config: &self.config,
        };

        let (markdown, table, fault) = match routine.run(&ctx) {
            Ok(result) if !result.is_blank() => (result.markdown, result.table, None),
            Ok(_) => {
                debug!("{} produced no content, showing summary", routine.name());
                let AnalysisResult { markdown, table } = self.summary(dataset);
                (markdown, table, None)
            }
            Err(fault) => {
                warn!("{} could not complete: {}", routine.name(), fault);
                let AnalysisResult { markdown, table } = self.summary(dataset);
                (
                    format!(
                        "I encountered a problem while analysing the data: {}\n\n{}",
                        fault, markdown
                    ),
                    table,
                    Some(fault.to_string()),
                )
            }
        };

        Answer {
            intent,
            markdown,
            table,
            citation: Citation::for_dataset(dataset),
            fault,
        }
    }

    fn summary(&self, dataset: &Dataset) -> AnalysisResult {
        summarize(dataset, self.config.summary_scope)
    }
}
