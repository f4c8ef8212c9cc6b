//! In-memory tables built from workflow records.

use crate::error::{Result, ResultExt, SamarthError};
use polars::prelude::*;
use serde_json::Value;
use std::collections::HashSet;

/// Title used when the workflow does not name the dataset.
pub const DEFAULT_TITLE: &str = "Untitled Dataset";

/// Resource identifier used when the workflow does not supply one.
pub const DEFAULT_RESOURCE_ID: &str = "N/A";

/// A fetched table plus its provenance.
///
/// Built fresh for every query and dropped once the answer is rendered.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub title: String,
    pub resource_id: String,
    pub frame: DataFrame,
}

impl Dataset {
    pub fn new(
        frame: DataFrame,
        title: Option<&str>,
        resource_id: Option<&str>,
    ) -> Self {
        Self {
            title: title.unwrap_or(DEFAULT_TITLE).to_string(),
            resource_id: resource_id.unwrap_or(DEFAULT_RESOURCE_ID).to_string(),
            frame,
        }
    }

    /// Build a dataset from JSON records.
    ///
    /// Columns follow the key order of the first record, then any keys that
    /// only appear later. A column whose non-null cells are all JSON numbers
    /// becomes `Float64`; anything else is kept as text. Missing keys become
    /// nulls.
    ///
    /// # Errors
    ///
    /// Returns [`SamarthError::MalformedPayload`] if a record is not a JSON
    /// object.
    pub fn from_records(
        records: &[Value],
        title: Option<&str>,
        resource_id: Option<&str>,
    ) -> Result<Self> {
        let mut names: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for (idx, record) in records.iter().enumerate() {
            let object = record.as_object().ok_or_else(|| SamarthError::MalformedPayload {
                reason: format!("record {} is not an object", idx),
                raw: record.to_string(),
            })?;
            for key in object.keys() {
                if seen.insert(key.clone()) {
                    names.push(key.clone());
                }
            }
        }

        let columns: Vec<Column> = names
            .iter()
            .map(|name| {
                let cells: Vec<&Value> = records
                    .iter()
                    .map(|r| r.get(name).unwrap_or(&Value::Null))
                    .collect();
                build_column(name, &cells)
            })
            .collect();

        let frame = if columns.is_empty() {
            DataFrame::empty()
        } else {
            DataFrame::new(columns).context("Failed to build table from workflow records")?
        };

        Ok(Self::new(frame, title, resource_id))
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// Number of records.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }
}

fn build_column(name: &str, cells: &[&Value]) -> Column {
    let all_numeric = cells.iter().all(|v| v.is_null() || v.is_number());

    if all_numeric && cells.iter().any(|v| v.is_number()) {
        let values: Vec<Option<f64>> = cells.iter().map(|v| v.as_f64()).collect();
        Column::new(name.into(), values)
    } else {
        let values: Vec<Option<String>> = cells
            .iter()
            .map(|v| match v {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            })
            .collect();
        Column::new(name.into(), values)
    }
}
