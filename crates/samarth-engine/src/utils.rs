//! Shared helpers for turning messy table cells into numbers and text.
//!
//! Open-data tables routinely carry numbers as text with currency symbols,
//! thousands separators and unit suffixes (`"₹1,234.50 Cr"`). The helpers
//! here coerce those cells into [`Numeric`] values where an unparseable
//! cell becomes [`Numeric::Missing`] instead of failing the whole column.

use polars::prelude::*;

// =============================================================================
// Numeric Normalization
// =============================================================================

/// A normalized numeric cell.
///
/// Each caller decides what `Missing` means for its aggregation: sums use
/// [`Numeric::value_or_zero`], means skip it via [`Numeric::value`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Number(f64),
    Missing,
}

impl Numeric {
    /// The number, or `None` for a missing cell.
    pub fn value(self) -> Option<f64> {
        match self {
            Numeric::Number(v) => Some(v),
            Numeric::Missing => None,
        }
    }

    /// The number, with a missing cell counted as zero.
    pub fn value_or_zero(self) -> f64 {
        self.value().unwrap_or(0.0)
    }
}

impl From<f64> for Numeric {
    fn from(value: f64) -> Self {
        if value.is_finite() {
            Numeric::Number(value)
        } else {
            Numeric::Missing
        }
    }
}

/// Keep only ASCII digits and decimal points.
///
/// # Example
///
/// ```rust,ignore
/// assert_eq!(strip_non_numeric("₹1,234.50 Cr"), "1234.50");
/// ```
pub fn strip_non_numeric(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect()
}

/// Normalize a textual cell.
///
/// Every character that is not a digit or `.` is dropped before parsing,
/// so signs are discarded too. Empty or unparseable leftovers are missing.
pub fn normalize_str(s: &str) -> Numeric {
    let stripped = strip_non_numeric(s);
    if stripped.is_empty() {
        return Numeric::Missing;
    }
    stripped
        .parse::<f64>()
        .map(Numeric::from)
        .unwrap_or(Numeric::Missing)
}

/// Normalize a single cell of any dtype. Numeric cells pass through as-is.
pub fn normalize_any(value: &AnyValue<'_>) -> Numeric {
    match value {
        AnyValue::Null => Numeric::Missing,
        AnyValue::String(s) => normalize_str(s),
        AnyValue::StringOwned(s) => normalize_str(s.as_str()),
        AnyValue::Boolean(_) => Numeric::Missing,
        AnyValue::Float64(v) => Numeric::from(*v),
        AnyValue::Float32(v) => Numeric::from(f64::from(*v)),
        other => match other.extract::<f64>() {
            Some(v) => Numeric::from(v),
            None => normalize_str(&other.to_string()),
        },
    }
}

/// Normalize every cell of a column, preserving row order.
pub fn normalize_column(column: &Column) -> Vec<Numeric> {
    let series = column.as_materialized_series();
    (0..series.len())
        .map(|i| {
            series
                .get(i)
                .map(|v| normalize_any(&v))
                .unwrap_or(Numeric::Missing)
        })
        .collect()
}

// =============================================================================
// Cell Formatting
// =============================================================================

/// Render a cell for display. Nulls become empty strings.
pub fn cell_to_string(value: &AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => (*s).to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Float64(v) => format_float(*v),
        AnyValue::Float32(v) => format_float(f64::from(*v)),
        other => other.to_string(),
    }
}

/// Whole floats print without a fractional part (`1234.0` -> `1234`).
pub fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{:.0}", v)
    } else {
        format!("{}", v)
    }
}

/// Read a column as display strings, one per row.
pub fn column_strings(column: &Column) -> Vec<Option<String>> {
    let series = column.as_materialized_series();
    (0..series.len())
        .map(|i| match series.get(i) {
            Ok(AnyValue::Null) | Err(_) => None,
            Ok(v) => Some(cell_to_string(&v)),
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
