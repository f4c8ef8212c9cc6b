//! Column lookup by alias, fiscal-year label and year-like shape.

use super::SemanticField;
use crate::dataset::Dataset;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

// A 19xx/20xx token not glued to other digits. Underscores count as separators.
static YEAR_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^0-9])(?:19|20)\d{2}(?:[^0-9]|$)").expect("Invalid regex: year token")
});

static NON_ALNUM_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("Invalid regex: non-alphanumeric run"));

/// Resolve a semantic field against a dataset's columns.
pub fn resolve(dataset: &Dataset, field: SemanticField) -> Option<String> {
    resolve_in(&dataset.column_names(), field)
}

/// Resolve a semantic field against a list of column names.
///
/// Alias order is priority: the first alias that matches any column wins,
/// regardless of where that column sits. Matching is exact after trimming
/// and lower-casing the column name.
pub fn resolve_in(columns: &[String], field: SemanticField) -> Option<String> {
    for alias in field.aliases() {
        if let Some(col) = columns
            .iter()
            .find(|col| col.trim().to_lowercase() == *alias)
        {
            debug!("Resolved {} -> '{}' via alias '{}'", field, col, alias);
            return Some(col.clone());
        }
    }
    debug!("No column found for {}", field);
    None
}

/// Find the column holding figures for a fiscal year label such as `2016-17`.
///
/// Tried in order:
///
/// 1. a column named exactly like the label
/// 2. a column whose simplified name equals the simplified label (`_2016_17`)
/// 3. a column whose simplified name holds the label as whole tokens
///    (`2016-17 (Actuals)`); the one with the fewest tokens wins, so
///    `_2015_16_vs_2016_17_growth` loses to a plainer sibling
pub fn find_fiscal_year_column(columns: &[String], label: &str) -> Option<String> {
    if let Some(exact) = columns.iter().find(|c| c.trim() == label) {
        return Some(exact.clone());
    }

    let needle = simplify(label);
    if needle.is_empty() {
        return None;
    }
    if let Some(equal) = columns.iter().find(|c| simplify(c) == needle) {
        return Some(equal.clone());
    }

    let needle_tokens: Vec<&str> = needle.split('_').collect();
    let mut best: Option<(usize, &String)> = None;
    for col in columns {
        let simplified = simplify(col);
        let tokens: Vec<&str> = simplified.split('_').collect();
        let bounded = tokens
            .windows(needle_tokens.len())
            .any(|window| window == needle_tokens.as_slice());
        if bounded && best.is_none_or(|(count, _)| tokens.len() < count) {
            best = Some((tokens.len(), col));
        }
    }
    if let Some((_, col)) = best {
        debug!("Fiscal year {} -> '{}' by token match", label, col);
    }
    best.map(|(_, col)| col.clone())
}

/// Columns whose names carry a 4-digit year.
pub fn year_like_columns(columns: &[String]) -> Vec<String> {
    columns
        .iter()
        .filter(|c| YEAR_TOKEN.is_match(c))
        .cloned()
        .collect()
}

fn simplify(name: &str) -> String {
    let lower = name.to_lowercase();
    NON_ALNUM_RUN
        .replace_all(&lower, "_")
        .trim_matches('_')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    // ==================== resolve_in tests ====================

    #[test]
    fn test_resolve_case_and_whitespace_insensitive() {
        let columns = cols(&["  State_Name ", "Rainfall_MM"]);
        assert_eq!(
            resolve_in(&columns, SemanticField::State),
            Some("  State_Name ".to_string())
        );
        assert_eq!(
            resolve_in(&columns, SemanticField::Rainfall),
            Some("Rainfall_MM".to_string())
        );
    }

    #[test]
    fn test_resolve_alias_order_is_priority() {
        // "state_name" comes first in the columns, but "state" is the
        // higher-priority alias.
        let columns = cols(&["state_name", "district", "state"]);
        assert_eq!(
            resolve_in(&columns, SemanticField::State),
            Some("state".to_string())
        );
    }

    #[test]
    fn test_resolve_is_exact_not_substring() {
        let columns = cols(&["state_code", "crop_year"]);
        assert_eq!(resolve_in(&columns, SemanticField::State), None);
        assert_eq!(resolve_in(&columns, SemanticField::Crop), None);
    }

    #[test]
    fn test_resolve_not_found_for_every_field() {
        let columns = cols(&["unrelated", "other"]);
        for field in SemanticField::ALL {
            assert_eq!(resolve_in(&columns, field), None, "field {}", field);
        }
        for field in SemanticField::ALL {
            assert_eq!(resolve_in(&[], field), None, "field {}", field);
        }
    }

    // ==================== fiscal year column tests ====================

    #[test]
    fn test_find_fiscal_year_column_exact() {
        let columns = cols(&["state_name", "2016-17", "_2016_17"]);
        assert_eq!(
            find_fiscal_year_column(&columns, "2016-17"),
            Some("2016-17".to_string())
        );
    }

    #[test]
    fn test_find_fiscal_year_column_underscored() {
        let columns = cols(&["state_name", "_2015_16", "_2016_17"]);
        assert_eq!(
            find_fiscal_year_column(&columns, "2016-17"),
            Some("_2016_17".to_string())
        );
    }

    #[test]
    fn test_find_fiscal_year_column_with_suffix() {
        let columns = cols(&["State", "2017-18 (Actuals)"]);
        assert_eq!(
            find_fiscal_year_column(&columns, "2017-18"),
            Some("2017-18 (Actuals)".to_string())
        );
    }

    #[test]
    fn test_find_fiscal_year_column_skips_growth_sibling() {
        let columns = cols(&["state_name", "_2015_16_vs_2016_17_growth", "_2016_17", "_2017_18"]);
        assert_eq!(
            find_fiscal_year_column(&columns, "2016-17"),
            Some("_2016_17".to_string())
        );
    }

    #[test]
    fn test_find_fiscal_year_column_prefers_fewest_tokens() {
        let columns = cols(&["2016-17 vs 2017-18 growth (%)", "2017-18 (Actuals)"]);
        assert_eq!(
            find_fiscal_year_column(&columns, "2017-18"),
            Some("2017-18 (Actuals)".to_string())
        );
    }

    #[test]
    fn test_find_fiscal_year_column_token_bounded() {
        // "2016_170" must not match "2016-17".
        let columns = cols(&["state_name", "x_2016_170"]);
        assert_eq!(find_fiscal_year_column(&columns, "2016-17"), None);
    }

    #[test]
    fn test_find_fiscal_year_column_absent() {
        let columns = cols(&["state_name", "_2015_16"]);
        assert_eq!(find_fiscal_year_column(&columns, "2016-17"), None);
    }

    // ==================== year_like_columns tests ====================

    #[test]
    fn test_year_like_columns() {
        let columns = cols(&["state_name", "_2015_16", "2019-20 - BE", "code_12345", "total"]);
        assert_eq!(year_like_columns(&columns), cols(&["_2015_16", "2019-20 - BE"]));
    }
}
