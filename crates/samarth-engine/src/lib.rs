//! Samarth Question-Answering Engine
//!
//! Answers natural-language questions about data.gov.in tables (state
//! finances, crop and rainfall statistics) with a small rule-based analysis
//! over whatever table the data workflow returns.
//!
//! # Overview
//!
//! A question goes through two stages:
//!
//! - **Fetching**: the question and an API key are POSTed to a workflow
//!   webhook, which picks a dataset and answers with records, a title and a
//!   resource id ([`fetch`])
//! - **Analysis**: the question is routed by keyword to a routine
//!   ([`router`], [`routines`]) that resolves loosely named columns
//!   ([`columns`]), extracts states and fiscal years ([`entities`]), and
//!   renders markdown with a source citation ([`reporting`])
//!
//! The [`AnalysisEngine`] never fails: when a routine cannot complete, the
//! answer explains why and falls back to a generic summary of the table.
//! Fetch errors, on the other hand, are reported verbatim since they need
//! fixing outside the engine.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use samarth_engine::{AnalysisEngine, Conversation, Credentials, QueryHandler};
//! use samarth_engine::fetch::WebhookSource;
//! use std::sync::Arc;
//!
//! let handler = QueryHandler::new(
//!     AnalysisEngine::default(),
//!     Arc::new(WebhookSource::new()?),
//! );
//! let credentials = Credentials::new(Some(api_key), Some(webhook_url));
//!
//! let outcome = handler.handle(
//!     Conversation::new(),
//!     "Share of Union Taxes for Telangana and Karnataka in the last two years",
//!     &credentials,
//! );
//!
//! if let Some(turn) = outcome.conversation.last() {
//!     println!("{}", turn.content);
//! }
//! ```
//!
//! # Offline Analysis
//!
//! The engine works on any [`Dataset`], so a saved workflow response can be
//! analysed without a network:
//!
//! ```rust,ignore
//! use samarth_engine::{AnalysisEngine, fetch::parse_body};
//!
//! let dataset = parse_body(&std::fs::read_to_string("response.json")?)?;
//! let answer = AnalysisEngine::default().answer("compare rainfall by crop", &dataset);
//! println!("{}\n\nView Data Source: {}", answer.markdown, answer.citation);
//! ```
//!
//! # Configuration
//!
//! ```rust,ignore
//! use samarth_engine::{EngineConfig, SummaryScope};
//!
//! let config = EngineConfig::builder()
//!     .summary_scope(SummaryScope::Head(10))
//!     .default_states(["Kerala", "Tamil Nadu"])
//!     .build()?;
//! ```

pub mod columns;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod entities;
pub mod error;
pub mod fetch;
pub mod reporting;
pub mod router;
pub mod routines;
pub mod session;
pub mod utils;

// Re-exports for convenient access
pub use columns::SemanticField;
pub use config::{ConfigValidationError, EngineConfig, EngineConfigBuilder, SummaryScope};
pub use dataset::Dataset;
pub use engine::{AnalysisEngine, Answer};
pub use entities::{EntityError, EntityFilter};
pub use error::{ErrorCategory, Result as SamarthResult, ResultExt, SamarthError};
pub use fetch::{ClosureSource, DatasetSource, FetchRequest};
pub use reporting::{Citation, TableSnapshot, render_table};
pub use router::{Intent, KeywordRule, Router};
pub use routines::{AnalysisContext, AnalysisFault, AnalysisResult, AnalysisRoutine};
pub use session::{Conversation, Credentials, QueryHandler, QueryOutcome, Role, Turn};
pub use utils::{Numeric, normalize_any, normalize_column, normalize_str};
