//! Configuration types for the analysis engine.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic engine setup.

use crate::entities::{DEFAULT_FISCAL_YEARS, DEFAULT_STATES};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Column looked up verbatim when no state alias matches.
pub const DEFAULT_STATE_COLUMN: &str = "state_name";

/// Rows shown by the generic summary unless configured otherwise.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

static FISCAL_YEAR_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}$").expect("Invalid regex: fiscal year label"));

/// How much of the table the generic summary renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SummaryScope {
    /// The first `n` records.
    Head(usize),
    /// Every record.
    All,
}

impl Default for SummaryScope {
    fn default() -> Self {
        SummaryScope::Head(DEFAULT_PREVIEW_ROWS)
    }
}

/// Configuration for the analysis engine.
///
/// Use [`EngineConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use samarth_engine::config::{EngineConfig, SummaryScope};
///
/// let config = EngineConfig::builder()
///     .summary_scope(SummaryScope::All)
///     .default_states(["Kerala", "Punjab"])
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How many rows the generic summary shows.
    /// Default: first 5 rows
    pub summary_scope: SummaryScope,

    /// States used when a question names none.
    /// Default: Telangana, Karnataka
    pub default_states: Vec<String>,

    /// Fiscal-year labels used when a question names no year.
    /// Default: 2016-17, 2017-18
    pub default_fiscal_years: Vec<String>,

    /// Column name tried verbatim for tax tables when no state alias matches.
    /// Default: "state_name"
    pub state_column_fallback: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            summary_scope: SummaryScope::default(),
            default_states: DEFAULT_STATES.iter().map(|s| s.to_string()).collect(),
            default_fiscal_years: DEFAULT_FISCAL_YEARS.iter().map(|s| s.to_string()).collect(),
            state_column_fallback: DEFAULT_STATE_COLUMN.to_string(),
        }
    }
}

impl EngineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.summary_scope == SummaryScope::Head(0) {
            return Err(ConfigValidationError::EmptyPreview);
        }

        if self.default_states.is_empty() {
            return Err(ConfigValidationError::EmptyDefaults("default_states".to_string()));
        }

        if self.default_fiscal_years.is_empty() {
            return Err(ConfigValidationError::EmptyDefaults(
                "default_fiscal_years".to_string(),
            ));
        }

        if let Some(bad) = self
            .default_fiscal_years
            .iter()
            .find(|label| !FISCAL_YEAR_LABEL.is_match(label))
        {
            return Err(ConfigValidationError::InvalidFiscalYear(bad.clone()));
        }

        if self.state_column_fallback.trim().is_empty() {
            return Err(ConfigValidationError::EmptyDefaults(
                "state_column_fallback".to_string(),
            ));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("Summary preview must show at least one row")]
    EmptyPreview,

    #[error("'{0}' must not be empty")]
    EmptyDefaults(String),

    #[error("Invalid fiscal year label '{0}' (expected YYYY-YY)")]
    InvalidFiscalYear(String),

    #[error("Invalid timeout: {0} seconds (must be at least 1)")]
    InvalidTimeout(u64),
}

/// Builder for [`EngineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    summary_scope: Option<SummaryScope>,
    default_states: Option<Vec<String>>,
    default_fiscal_years: Option<Vec<String>>,
    state_column_fallback: Option<String>,
}

impl EngineConfigBuilder {
    /// Set how many rows the generic summary renders.
    pub fn summary_scope(mut self, scope: SummaryScope) -> Self {
        self.summary_scope = Some(scope);
        self
    }

    /// Set the states used when a question names none.
    pub fn default_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_states = Some(states.into_iter().map(Into::into).collect());
        self
    }

    /// Set the fiscal-year labels used when a question names no year.
    pub fn default_fiscal_years<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_fiscal_years = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    /// Set the verbatim state column used by the tax routine.
    pub fn state_column_fallback(mut self, column: impl Into<String>) -> Self {
        self.state_column_fallback = Some(column.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `EngineConfig` or an error if validation fails.
    pub fn build(self) -> Result<EngineConfig, ConfigValidationError> {
        let defaults = EngineConfig::default();
        let config = EngineConfig {
            summary_scope: self.summary_scope.unwrap_or(defaults.summary_scope),
            default_states: self.default_states.unwrap_or(defaults.default_states),
            default_fiscal_years: self
                .default_fiscal_years
                .unwrap_or(defaults.default_fiscal_years),
            state_column_fallback: self
                .state_column_fallback
                .unwrap_or(defaults.state_column_fallback),
        };

        config.validate()?;
        Ok(config)
    }
}
