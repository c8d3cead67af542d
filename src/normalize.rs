//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Qie.
//! The Qie project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! Null-like value normalization applied to the grouping columns.

use crate::dataset::{QiCDataset, QiCValue};
use crate::selection::QiCSelection;

/// Placeholder substituted for missing and null-like values.
pub const QI_PLACEHOLDER: &str = "Unknown";

/// Textual forms treated as missing. Matched exactly, case-sensitive.
pub const QI_NULL_LIKE: [&str; 7] = ["nan", "None", "<NA>", "NoneType", "NA", "NaN", ""];

/// How a single column was normalized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QiCColumnOutcome {
    /// Every cell was stringified and null-like values replaced.
    Stringified,
    /// Stringification failed; the whole column became the placeholder.
    Fallback,
}

/// Result of a normalization pass.
#[derive(Clone, Debug)]
pub struct QiCNormalized {
    pub dataset: QiCDataset,
    /// One entry per selected column, in selection order.
    pub outcomes: Vec<(String, QiCColumnOutcome)>,
}

impl QiCNormalized {
    /// Columns that took the fallback branch.
    #[allow(non_snake_case)]
    pub fn QiFFallbackColumns(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == QiCColumnOutcome::Fallback)
            .map(|(c, _)| c.as_str())
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct QiCNormalizer;

impl QiCNormalizer {
    /// Returns a copy of `dataset` whose selected columns hold text keys.
    ///
    /// Non-selected columns are untouched. Never fails: a column that cannot
    /// be stringified is replaced by the placeholder for every row.
    #[allow(non_snake_case)]
    pub fn QiFNormalize(dataset: &QiCDataset, selection: &QiCSelection) -> QiCNormalized {
        let mut copy = dataset.clone();
        let mut outcomes = Vec::with_capacity(selection.QiFIndices().len());

        for (name, &idx) in selection.QiFColumns().iter().zip(selection.QiFIndices()) {
            let outcome = match stringify_column(dataset, idx) {
                Some(values) => {
                    copy.replace_column(idx, values);
                    QiCColumnOutcome::Stringified
                }
                None => {
                    log::debug!(
                        "column '{}' could not be converted to text; using '{}' for every row",
                        name,
                        QI_PLACEHOLDER
                    );
                    let values = vec![placeholder(); dataset.QiFRowCount()];
                    copy.replace_column(idx, values);
                    QiCColumnOutcome::Fallback
                }
            };
            outcomes.push((name.clone(), outcome));
        }

        QiCNormalized {
            dataset: copy,
            outcomes,
        }
    }

    /// Normalized text for one cell, or `None` when it cannot be stringified.
    #[allow(non_snake_case)]
    pub fn QiFNormalizeValue(value: &QiCValue) -> Option<String> {
        match value.QiFStringify() {
            Ok(None) => Some(QI_PLACEHOLDER.to_string()),
            Ok(Some(text)) if QI_NULL_LIKE.contains(&text.as_str()) => {
                Some(QI_PLACEHOLDER.to_string())
            }
            Ok(Some(text)) => Some(text),
            Err(_) => None,
        }
    }
}

fn placeholder() -> QiCValue {
    QiCValue::Text(QI_PLACEHOLDER.to_string())
}

fn stringify_column(dataset: &QiCDataset, idx: usize) -> Option<Vec<QiCValue>> {
    dataset
        .QiFRows()
        .iter()
        .map(|row| QiCNormalizer::QiFNormalizeValue(&row[idx]).map(QiCValue::Text))
        .collect()
}
