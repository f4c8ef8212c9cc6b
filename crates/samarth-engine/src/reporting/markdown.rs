//! Markdown table rendering.

use crate::utils::column_strings;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Header used when a frame has no columns at all.
const NO_COLUMNS: &str = "(no columns)";

/// Render a frame as a GitHub pipe table.
///
/// A frame with columns but no rows renders as header and separator only.
pub fn render_table(df: &DataFrame) -> String {
    TableSnapshot::from_frame(df).to_markdown()
}

/// A display-ready copy of a table: headers plus stringified cells.
///
/// Snapshots are what a conversation keeps, so the transcript can be
/// serialized and re-rendered without holding on to the frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableSnapshot {
    pub fn from_frame(df: &DataFrame) -> Self {
        let columns: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect();

        let cells: Vec<Vec<Option<String>>> = df.get_columns().iter().map(column_strings).collect();

        let rows = (0..df.height())
            .map(|row| {
                cells
                    .iter()
                    .map(|col| col.get(row).cloned().flatten().unwrap_or_default())
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn to_markdown(&self) -> String {
        let headers: Vec<String> = if self.columns.is_empty() {
            vec![NO_COLUMNS.to_string()]
        } else {
            self.columns.iter().map(|c| escape_cell(c)).collect()
        };

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(format!("| {} |", headers.join(" | ")));
        lines.push(format!(
            "| {} |",
            headers.iter().map(|_| "---").collect::<Vec<_>>().join(" | ")
        ));
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(|c| escape_cell(c)).collect();
            lines.push(format!("| {} |", cells.join(" | ")));
        }
        lines.join("\n")
    }
}

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|").replace(['\n', '\r'], " ")
}
