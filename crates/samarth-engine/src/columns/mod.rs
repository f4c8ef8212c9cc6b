//! Mapping logical fields onto whatever a dataset actually calls them.
//!
//! Government tables name the same concept many ways (`state`,
//! `State Name`, `state_name`). A [`SemanticField`] carries a static alias
//! list in priority order; [`resolve`] finds the first alias present in a
//! dataset.

mod resolver;

pub use resolver::{find_fiscal_year_column, resolve, resolve_in, year_like_columns};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A logical column role the analysis routines ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticField {
    State,
    District,
    Year,
    Crop,
    Production,
    Rainfall,
}

impl SemanticField {
    /// All fields, in declaration order.
    pub const ALL: [SemanticField; 6] = [
        SemanticField::State,
        SemanticField::District,
        SemanticField::Year,
        SemanticField::Crop,
        SemanticField::Production,
        SemanticField::Rainfall,
    ];

    /// Known column spellings, highest priority first.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            SemanticField::State => &["state", "statename", "state_name"],
            SemanticField::District => &["district", "districtname", "district_name"],
            SemanticField::Year => &["year", "year_code", "financial_year"],
            SemanticField::Crop => &["crop", "crop_name", "commodity"],
            SemanticField::Production => &[
                "production",
                "production_volume_tonnes",
                "production_metric_tonnes",
                "value",
                "yield",
            ],
            SemanticField::Rainfall => &[
                "rainfall",
                "avg_annual_rainfall_mm",
                "actual_rainfall",
                "rainfall_mm",
            ],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SemanticField::State => "state",
            SemanticField::District => "district",
            SemanticField::Year => "year",
            SemanticField::Crop => "crop",
            SemanticField::Production => "production",
            SemanticField::Rainfall => "rainfall",
        }
    }
}

impl fmt::Display for SemanticField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
