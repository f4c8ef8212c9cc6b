//! Average rainfall per state.

use super::{AnalysisContext, AnalysisFault, AnalysisResult, AnalysisRoutine};
use crate::columns::{resolve, SemanticField};
use crate::utils::{column_strings, normalize_column};
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

/// Name of the derived mean column.
pub const MEAN_RAINFALL_COLUMN: &str = "mean_rainfall_mm";

/// Groups rows by state and reports the mean rainfall of each group.
///
/// Missing rainfall cells are left out of the mean. Without both a rainfall
/// and a state column the routine contributes nothing.
pub struct RainfallComparison;

impl AnalysisRoutine for RainfallComparison {
    fn name(&self) -> &str {
        "rainfall_comparison"
    }

    fn run(&self, ctx: &AnalysisContext<'_>) -> Result<AnalysisResult, AnalysisFault> {
        let (Some(rain_col), Some(state_col)) = (
            resolve(ctx.dataset, SemanticField::Rainfall),
            resolve(ctx.dataset, SemanticField::State),
        ) else {
            debug!("Rainfall comparison skipped: rainfall or state column not found");
            return Ok(AnalysisResult::empty());
        };

        let frame = &ctx.dataset.frame;
        let rainfall = normalize_column(frame.column(&rain_col)?);
        let states = column_strings(frame.column(&state_col)?);

        // (sum, count) per trimmed state name, ordered by name. Null and
        // blank states belong to no group.
        let mut groups: BTreeMap<String, (f64, usize)> = BTreeMap::new();
        for (state, rain) in states.into_iter().zip(rainfall) {
            let Some(state) = state.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
                continue;
            };
            let entry = groups.entry(state.to_string()).or_insert((0.0, 0));
            if let Some(value) = rain.value() {
                entry.0 += value;
                entry.1 += 1;
            }
        }

        let mut markdown = String::from("**Average Annual Rainfall Analysis:**\n");
        let mut names: Vec<String> = Vec::with_capacity(groups.len());
        let mut means: Vec<Option<f64>> = Vec::with_capacity(groups.len());

        for (state, (sum, count)) in groups {
            let mean = (count > 0).then(|| sum / count as f64);
            match mean {
                Some(mean) => {
                    markdown.push_str(&format!("* **{}**: {:.2} mm (average)\n", state, mean))
                }
                None => markdown.push_str(&format!("* **{}**: n/a (no valid rainfall figures)\n", state)),
            }
            names.push(state);
            means.push(mean);
        }

        let table = DataFrame::new(vec![
            Column::new(state_col.as_str().into(), names),
            Column::new(MEAN_RAINFALL_COLUMN.into(), means),
        ])?;

        Ok(AnalysisResult::new(markdown, Some(table)))
    }
}
