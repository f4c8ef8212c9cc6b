//! Keyword routing from a question to an analysis intent.
//!
//! Routing is a table of [`KeywordRule`]s evaluated in order; the first
//! rule that matches decides the [`Intent`]. Questions no rule claims go to
//! [`Intent::GenericSummary`], so routing is total.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Which analysis routine answers a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    TaxAnalysis,
    RainfallCropComparison,
    GenericSummary,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::TaxAnalysis => "tax_analysis",
            Intent::RainfallCropComparison => "rainfall_crop_comparison",
            Intent::GenericSummary => "generic_summary",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A routing rule: every keyword group must have at least one hit.
///
/// `[[tax, duties]]` reads "tax OR duties";
/// `[[compare], [rainfall], [crop]]` reads "compare AND rainfall AND crop".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRule {
    pub intent: Intent,
    pub groups: Vec<Vec<&'static str>>,
}

impl KeywordRule {
    pub fn new(intent: Intent, groups: Vec<Vec<&'static str>>) -> Self {
        Self { intent, groups }
    }

    /// Match against an already lower-cased question.
    fn matches_lower(&self, question_lower: &str) -> bool {
        !self.groups.is_empty()
            && self.groups.iter().all(|group| {
                group
                    .iter()
                    .any(|keyword| question_lower.contains(&keyword.to_lowercase()))
            })
    }

    /// Case-insensitive substring match.
    pub fn matches(&self, question: &str) -> bool {
        self.matches_lower(&question.to_lowercase())
    }
}

/// The built-in rule table, highest priority first.
pub fn default_rules() -> Vec<KeywordRule> {
    vec![
        KeywordRule::new(Intent::TaxAnalysis, vec![vec!["tax", "duties"]]),
        KeywordRule::new(
            Intent::RainfallCropComparison,
            vec![vec!["compare"], vec!["rainfall"], vec!["crop"]],
        ),
    ]
}

/// Ordered keyword router.
#[derive(Debug, Clone)]
pub struct Router {
    rules: Vec<KeywordRule>,
}

impl Default for Router {
    fn default() -> Self {
        Self {
            rules: default_rules(),
        }
    }
}

impl Router {
    /// A router over a custom rule table.
    pub fn with_rules(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    /// Pick the intent for a question.
    pub fn route(&self, question: &str) -> Intent {
        let lower = question.to_lowercase();
        let intent = self
            .rules
            .iter()
            .find(|rule| rule.matches_lower(&lower))
            .map(|rule| rule.intent)
            .unwrap_or(Intent::GenericSummary);
        debug!("Routed question to {}", intent);
        intent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_tax() {
        let router = Router::default();
        assert_eq!(
            router.route("Share of Union Taxes in Telangana"),
            Intent::TaxAnalysis
        );
        assert_eq!(router.route("customs DUTIES for Kerala"), Intent::TaxAnalysis);
    }

    #[test]
    fn test_route_rainfall_crop_comparison() {
        let router = Router::default();
        assert_eq!(
            router.route("compare rainfall across crop regions"),
            Intent::RainfallCropComparison
        );
    }

    #[test]
    fn test_route_comparison_needs_all_keywords() {
        let router = Router::default();
        assert_eq!(
            router.route("compare rainfall across states"),
            Intent::GenericSummary
        );
        assert_eq!(router.route("rainfall and crop output"), Intent::GenericSummary);
    }

    #[test]
    fn test_tax_has_priority_over_comparison() {
        let router = Router::default();
        assert_eq!(
            router.route("compare rainfall, crop and tax receipts"),
            Intent::TaxAnalysis
        );
    }

    #[test]
    fn test_route_fallback_and_determinism() {
        let router = Router::default();
        for question in ["", "what is this dataset?", "district wise production"] {
            let first = router.route(question);
            assert_eq!(first, Intent::GenericSummary);
            assert_eq!(router.route(question), first);
        }
    }

    #[test]
    fn test_custom_rules() {
        let router = Router::with_rules(vec![KeywordRule::new(
            Intent::RainfallCropComparison,
            vec![vec!["monsoon"]],
        )]);
        assert_eq!(router.route("Monsoon patterns"), Intent::RainfallCropComparison);
        assert_eq!(router.route("Union taxes"), Intent::GenericSummary);
    }

    #[test]
    fn test_empty_rule_never_matches() {
        let rule = KeywordRule::new(Intent::TaxAnalysis, vec![]);
        assert!(!rule.matches("anything"));
    }
}
