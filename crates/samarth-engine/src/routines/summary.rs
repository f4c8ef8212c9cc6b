//! Generic table summary, the fallback for every question.

use super::{AnalysisContext, AnalysisFault, AnalysisResult, AnalysisRoutine};
use crate::config::SummaryScope;
use crate::dataset::Dataset;
use crate::reporting::render_table;

/// Shows the dataset title and a table of its leading (or all) records.
pub struct GenericSummary;

impl AnalysisRoutine for GenericSummary {
    fn name(&self) -> &str {
        "generic_summary"
    }

    fn run(&self, ctx: &AnalysisContext<'_>) -> Result<AnalysisResult, AnalysisFault> {
        Ok(summarize(ctx.dataset, ctx.config.summary_scope))
    }
}

/// Summarize a dataset. Never fails, including for zero-row datasets.
pub fn summarize(dataset: &Dataset, scope: SummaryScope) -> AnalysisResult {
    let (shown, what) = match scope {
        SummaryScope::Head(n) => (dataset.frame.head(Some(n)), format!("the first {} rows", n)),
        SummaryScope::All => (
            dataset.frame.clone(),
            format!("all {} rows", dataset.height()),
        ),
    };

    let markdown = format!(
        "I have successfully retrieved the dataset **'{}'**. Here is a summary of {}:\n\n{}\n",
        dataset.title,
        what,
        render_table(&shown)
    );
    AnalysisResult::new(markdown, Some(shown))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(n: usize) -> Dataset {
        let records: Vec<_> = (0..n).map(|i| json!({"id": i, "name": format!("row{}", i)})).collect();
        Dataset::from_records(&records, Some("Crop Production"), Some("r-9")).unwrap()
    }

    #[test]
    fn test_head_summary() {
        let result = summarize(&rows(8), SummaryScope::Head(5));
        let table = result.table.unwrap();
        assert_eq!(table.height(), 5);
        assert!(result.markdown.starts_with(
            "I have successfully retrieved the dataset **'Crop Production'**. \
             Here is a summary of the first 5 rows:"
        ));
        assert!(result.markdown.contains("row4"));
        assert!(!result.markdown.contains("row5"));
    }

    #[test]
    fn test_all_rows_summary() {
        let result = summarize(&rows(8), SummaryScope::All);
        assert_eq!(result.table.unwrap().height(), 8);
        assert!(result.markdown.contains("all 8 rows"));
    }

    #[test]
    fn test_zero_row_summary_is_header_only() {
        let columns_only = {
            let full = rows(2);
            Dataset::new(full.frame.head(Some(0)), Some("Empty"), None)
        };
        let result = summarize(&columns_only, SummaryScope::Head(5));
        assert!(result.markdown.contains("| id | name |\n| --- | --- |\n"));

        let nothing = Dataset::from_records(&[], None, None).unwrap();
        let result = summarize(&nothing, SummaryScope::Head(5));
        assert!(result.markdown.contains("| (no columns) |"));
    }
}
