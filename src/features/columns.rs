//! Ordered feature schema and the single-row vector builder.

use crate::error::ModelLoadError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Column order fixed at training time. Non-empty, no duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FeatureColumns(Vec<String>);

/// One model input row plus the columns that had no value and were set to 0.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRow {
    pub values: Vec<f32>,
    pub defaulted: Vec<String>,
}

impl FeatureColumns {
    pub fn new(columns: Vec<String>) -> Result<Self, ModelLoadError> {
        if columns.is_empty() {
            return Err(ModelLoadError::EmptyColumns);
        }
        let mut seen = HashSet::with_capacity(columns.len());
        for c in &columns {
            if !seen.insert(c.as_str()) {
                return Err(ModelLoadError::DuplicateColumn(c.clone()));
            }
        }
        Ok(Self(columns))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Build the row in column order. Columns `lookup` cannot resolve are
    /// filled with 0 and recorded in [`AlignedRow::defaulted`].
    pub fn align<F>(&self, lookup: F) -> AlignedRow
    where
        F: Fn(&str) -> Option<f64>,
    {
        let mut values = Vec::with_capacity(self.0.len());
        let mut defaulted = Vec::new();
        for column in &self.0 {
            match lookup(column) {
                Some(v) => values.push(v as f32),
                None => {
                    values.push(0.0);
                    defaulted.push(column.clone());
                }
            }
        }
        AlignedRow { values, defaulted }
    }
}

impl TryFrom<Vec<String>> for FeatureColumns {
    type Error = ModelLoadError;

    fn try_from(columns: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(columns)
    }
}

impl From<FeatureColumns> for Vec<String> {
    fn from(columns: FeatureColumns) -> Self {
        columns.0
    }
}
