//! Dataset provenance attached to every answer.

use crate::dataset::Dataset;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Title and source identifier of the dataset an answer was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub title: String,
    pub resource_id: String,
}

impl Citation {
    pub fn new(title: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            resource_id: resource_id.into(),
        }
    }

    pub fn for_dataset(dataset: &Dataset) -> Self {
        Self::new(dataset.title.clone(), dataset.resource_id.clone())
    }
}

impl fmt::Display for Citation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "**{}** (Source: {}, data.gov.in)",
            self.title, self.resource_id
        )
    }
}
