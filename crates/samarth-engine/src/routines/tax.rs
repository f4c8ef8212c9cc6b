//! Share of Union taxes and duties, by state and fiscal year.

use super::{AnalysisContext, AnalysisFault, AnalysisResult, AnalysisRoutine};
use crate::columns::{find_fiscal_year_column, resolve_in, year_like_columns, SemanticField};
use crate::entities::EntityFilter;
use crate::reporting::render_table;
use crate::utils::{column_strings, normalize_column, Numeric};
use polars::prelude::*;
use tracing::{debug, info};

/// Name of the derived row-total column.
pub const TOTAL_COLUMN: &str = "Total";

/// Filters a devolution table to the requested states and sums the
/// requested fiscal-year columns per row.
///
/// Missing or unparseable figures count as zero in the total; only the
/// year columns actually used are normalized.
pub struct TaxAnalysis;

impl TaxAnalysis {
    fn state_column(ctx: &AnalysisContext<'_>, columns: &[String]) -> Result<String, AnalysisFault> {
        let fallback = &ctx.config.state_column_fallback;
        resolve_in(columns, SemanticField::State)
            .or_else(|| columns.iter().find(|c| *c == fallback).cloned())
            .ok_or_else(|| AnalysisFault::RequiredColumnMissing {
                column: fallback.clone(),
                available: columns.to_vec(),
            })
    }
}

impl AnalysisRoutine for TaxAnalysis {
    fn name(&self) -> &str {
        "tax_analysis"
    }

    fn run(&self, ctx: &AnalysisContext<'_>) -> Result<AnalysisResult, AnalysisFault> {
        let filter = EntityFilter::extract(ctx.question, ctx.config)?;
        let frame = &ctx.dataset.frame;
        let columns = ctx.dataset.column_names();

        let state_col = Self::state_column(ctx, &columns)?;
        let state_values = column_strings(frame.column(&state_col)?);

        let wanted: Vec<String> = filter.states.iter().map(|s| s.to_lowercase()).collect();
        let rows: Vec<usize> = state_values
            .iter()
            .enumerate()
            .filter(|(_, value)| {
                value
                    .as_deref()
                    .is_some_and(|v| wanted.contains(&v.trim().to_lowercase()))
            })
            .map(|(idx, _)| idx)
            .collect();

        if rows.is_empty() {
            let mut present: Vec<String> = Vec::new();
            for value in state_values.iter().flatten() {
                let value = value.trim().to_string();
                if !value.is_empty() && !present.contains(&value) {
                    present.push(value);
                }
            }
            return Err(AnalysisFault::NoMatchingStates {
                requested: filter.states,
                present,
            });
        }

        let mut targets: Vec<String> = Vec::new();
        let mut missing: Vec<String> = Vec::new();
        for label in &filter.fiscal_years {
            match find_fiscal_year_column(&columns, label) {
                Some(col) if col != state_col => {
                    if !targets.contains(&col) {
                        targets.push(col);
                    }
                }
                _ => missing.push(label.clone()),
            }
        }
        if !missing.is_empty() {
            return Err(AnalysisFault::YearColumnsMissing {
                missing,
                available: year_like_columns(&columns),
            });
        }
        debug!("Tax analysis over {:?} for {} row(s)", targets, rows.len());

        let mut totals = vec![0.0_f64; rows.len()];
        let mut out: Vec<Column> = Vec::with_capacity(targets.len() + 2);

        let states: Vec<Option<String>> = rows.iter().map(|&i| state_values[i].clone()).collect();
        out.push(Column::new(state_col.as_str().into(), states));

        for target in &targets {
            let normalized = normalize_column(frame.column(target)?);
            let picked: Vec<Numeric> = rows.iter().map(|&i| normalized[i]).collect();
            for (total, value) in totals.iter_mut().zip(&picked) {
                *total += value.value_or_zero();
            }
            let values: Vec<Option<f64>> = picked.iter().map(|v| v.value()).collect();
            out.push(Column::new(target.as_str().into(), values));
        }
        out.push(Column::new(TOTAL_COLUMN.into(), totals));

        let table = DataFrame::new(out)?;
        info!(
            "Tax analysis produced {} row(s) across {} fiscal year column(s)",
            table.height(),
            targets.len()
        );

        let markdown = format!(
            "**Share of Union Taxes and Duties (in Rs. Crore) for {}:**\n\n{}\n",
            filter.states.join(", "),
            render_table(&table)
        );
        Ok(AnalysisResult::new(markdown, Some(table)))
    }
}
