//! Filter criteria pulled out of free-text questions.
//!
//! Only two kinds of entity are recognised: Indian state names from a small
//! fixed vocabulary, and 4-digit years, which are turned into fiscal-year
//! labels (`2016` -> `2016-17`). When a question names neither, documented
//! defaults apply so callers never see an empty selection.

use crate::config::EngineConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// State names recognised in questions, in output order.
pub const KNOWN_STATES: [&str; 14] = [
    "Telangana",
    "Karnataka",
    "Andhra Pradesh",
    "Tamil Nadu",
    "Kerala",
    "Maharashtra",
    "Gujarat",
    "Punjab",
    "Uttar Pradesh",
    "West Bengal",
    "Bihar",
    "Rajasthan",
    "Madhya Pradesh",
    "Odisha",
];

/// States used when the question names none.
pub const DEFAULT_STATES: [&str; 2] = ["Telangana", "Karnataka"];

/// Fiscal years used when the question names none.
pub const DEFAULT_FISCAL_YEARS: [&str; 2] = ["2016-17", "2017-18"];

/// Phrases that always select the default fiscal-year pair.
pub const MULTI_YEAR_MARKERS: [&str; 3] = ["last two years", "past two years", "recent years"];

// Whole runs of ASCII digits. A year is a run of exactly four starting with
// 19 or 20, so letters may touch it (`FY2018-19`) but other digits may not.
static DIGIT_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+").expect("Invalid regex: digit run"));

/// Entity extraction failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntityError {
    /// `YY99` would need a century rollover (`1999-00`), which is not supported.
    #[error("fiscal year starting in {0} rolls over a century boundary and is not supported")]
    UnsupportedRollover(u16),

    #[error("year {0} is outside the supported range 1900-2099")]
    OutOfRange(u16),
}

/// Criteria extracted from one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityFilter {
    pub states: Vec<String>,
    pub fiscal_years: Vec<String>,
}

impl EntityFilter {
    /// Extract states and fiscal years, falling back to the configured defaults.
    pub fn extract(question: &str, config: &EngineConfig) -> Result<Self, EntityError> {
        Ok(Self {
            states: extract_states_or(question, &config.default_states),
            fiscal_years: extract_fiscal_years_or(question, &config.default_fiscal_years)?,
        })
    }
}

/// Build the `YYYY-YY` label for a fiscal year starting in `year`.
///
/// The suffix is last-two-digits arithmetic, so `xx99` is rejected instead
/// of producing a wrong label.
pub fn fiscal_year_label(year: u16) -> Result<String, EntityError> {
    if !(1900..=2099).contains(&year) {
        return Err(EntityError::OutOfRange(year));
    }
    let suffix = year % 100;
    if suffix == 99 {
        return Err(EntityError::UnsupportedRollover(year));
    }
    Ok(format!("{}-{:02}", year, suffix + 1))
}

/// Recognised states named in the question, or the default pair.
pub fn extract_states(question: &str) -> Vec<String> {
    let defaults: Vec<String> = DEFAULT_STATES.iter().map(|s| s.to_string()).collect();
    extract_states_or(question, &defaults)
}

/// Recognised states named in the question, or `defaults`.
pub fn extract_states_or(question: &str, defaults: &[String]) -> Vec<String> {
    let lower = question.to_lowercase();
    let found: Vec<String> = KNOWN_STATES
        .iter()
        .filter(|state| lower.contains(&state.to_lowercase()))
        .map(|state| state.to_string())
        .collect();

    if found.is_empty() {
        defaults.to_vec()
    } else {
        found
    }
}

/// Fiscal-year labels for the years named in the question, or the default pair.
pub fn extract_fiscal_years(question: &str) -> Result<Vec<String>, EntityError> {
    let defaults: Vec<String> = DEFAULT_FISCAL_YEARS.iter().map(|s| s.to_string()).collect();
    extract_fiscal_years_or(question, &defaults)
}

/// Fiscal-year labels for the years named in the question, or `defaults`.
///
/// Labels come out in first-mention order without duplicates.
pub fn extract_fiscal_years_or(
    question: &str,
    defaults: &[String],
) -> Result<Vec<String>, EntityError> {
    let lower = question.to_lowercase();
    if MULTI_YEAR_MARKERS.iter().any(|m| lower.contains(m)) {
        return Ok(defaults.to_vec());
    }

    let mut labels: Vec<String> = Vec::new();
    for run in DIGIT_RUN.find_iter(question) {
        let digits = run.as_str();
        if digits.len() != 4 || !(digits.starts_with("19") || digits.starts_with("20")) {
            continue;
        }
        let Ok(year) = digits.parse::<u16>() else {
            continue;
        };
        let label = fiscal_year_label(year)?;
        if !labels.contains(&label) {
            labels.push(label);
        }
    }

    if labels.is_empty() {
        Ok(defaults.to_vec())
    } else {
        Ok(labels)
    }
}
