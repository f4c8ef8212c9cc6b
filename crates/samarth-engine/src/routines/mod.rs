//! Analysis routines, one per [`Intent`].
//!
//! Each routine turns a question plus a [`Dataset`] into an
//! [`AnalysisResult`] or an [`AnalysisFault`] describing what was missing.
//! Faults are ordinary values: the engine turns them into a message and a
//! fallback summary, so nothing here needs to be infallible except
//! [`GenericSummary`].

mod rainfall;
mod summary;
mod tax;

pub use rainfall::RainfallComparison;
pub use summary::{summarize, GenericSummary};
pub use tax::TaxAnalysis;

use crate::config::EngineConfig;
use crate::dataset::Dataset;
use crate::entities::EntityError;
use crate::router::Intent;
use polars::prelude::*;
use thiserror::Error;

/// Everything a routine may look at.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisContext<'a> {
    pub question: &'a str,
    pub dataset: &'a Dataset,
    pub config: &'a EngineConfig,
}

/// Markdown answer plus, optionally, the derived table behind it.
#[derive(Debug, Clone, Default)]
pub struct AnalysisResult {
    pub markdown: String,
    pub table: Option<DataFrame>,
}

impl AnalysisResult {
    pub fn new(markdown: impl Into<String>, table: Option<DataFrame>) -> Self {
        Self {
            markdown: markdown.into(),
            table,
        }
    }

    /// A result that contributes nothing to the answer.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_blank(&self) -> bool {
        self.markdown.trim().is_empty()
    }
}

/// Why a routine could not produce its analysis.
#[derive(Error, Debug)]
pub enum AnalysisFault {
    #[error(
        "Could not find the required '{column}' column in the dataset. Available columns: {}",
        list(.available)
    )]
    RequiredColumnMissing {
        column: String,
        available: Vec<String>,
    },

    #[error(
        "I found the dataset, but could not find data for {}. States present in the data: {}",
        list(.requested),
        list(.present)
    )]
    NoMatchingStates {
        requested: Vec<String>,
        present: Vec<String>,
    },

    #[error(
        "The dataset has no column for fiscal year(s) {}. Year-like columns available: {}",
        list(.missing),
        list(.available)
    )]
    YearColumnsMissing {
        missing: Vec<String>,
        available: Vec<String>,
    },

    #[error("Unsupported fiscal year: {0}")]
    UnsupportedFiscalYear(#[from] EntityError),

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

fn list(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

/// A single analysis strategy.
///
/// Implementations must be `Send + Sync` so an engine can be shared
/// between request handlers.
pub trait AnalysisRoutine: Send + Sync {
    /// Routine name for logging.
    fn name(&self) -> &str;

    /// Run the analysis.
    fn run(&self, ctx: &AnalysisContext<'_>) -> Result<AnalysisResult, AnalysisFault>;
}

/// The routine that answers a given intent.
pub fn routine_for(intent: Intent) -> &'static dyn AnalysisRoutine {
    match intent {
        Intent::TaxAnalysis => &TaxAnalysis,
        Intent::RainfallCropComparison => &RainfallComparison,
        Intent::GenericSummary => &GenericSummary,
    }
}
