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

//! # Column Selection
//!
//! The ordered set of columns a split is keyed on, validated against a
//! dataset, together with the split mode derived from it. The mode is computed
//! once here and threaded through naming and directory creation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::dataset::QiCDataset;
use crate::errors::{Result, QiError};
use crate::sanitize::QiFSanitize;

/// Directory name used when every column is selected.
pub const QI_ALL_COLUMNS_DIR: &str = "all_columns";

/// Directory name used when the derived name is unusable.
pub const QI_FALLBACK_DIR: &str = "split_output";

/// Maximum output directory name length in characters.
pub const QI_MAX_DIR_LEN: usize = 80;

/// How groups are keyed and named.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QiCSplitMode {
    /// One selected column: one group per distinct value.
    Single,
    /// Several, but not all, columns: one group per value combination.
    Combination,
    /// Every column: one group per distinct row.
    AllColumns,
}

impl QiCSplitMode {
    /// Derives the mode from the selected and total column counts.
    ///
    /// A single selected column is always `Single`, even when the dataset has
    /// only that column.
    #[allow(non_snake_case)]
    pub fn QiFFromCounts(selected: usize, total: usize) -> Self {
        if selected == 1 {
            QiCSplitMode::Single
        } else if selected == total {
            QiCSplitMode::AllColumns
        } else {
            QiCSplitMode::Combination
        }
    }

    /// Short label shown in previews.
    #[allow(non_snake_case)]
    pub fn QiFDescription(&self) -> &'static str {
        match self {
            QiCSplitMode::Single => "Value-based",
            QiCSplitMode::Combination => "Combination-based",
            QiCSplitMode::AllColumns => "Combination-based (All)",
        }
    }
}

/// Validated, ordered column selection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QiCSelection {
    columns: Vec<String>,
    indices: Vec<usize>,
    mode: QiCSplitMode,
}

impl QiCSelection {
    /// Validates `columns` against `dataset`.
    ///
    /// Fails when the selection is empty, names an unknown column, or repeats
    /// a column.
    #[allow(non_snake_case)]
    pub fn QiFNew<S: AsRef<str>>(dataset: &QiCDataset, columns: &[S]) -> Result<Self> {
        if columns.is_empty() {
            return Err(QiError::validation("column selection required"));
        }

        let mut seen = HashSet::with_capacity(columns.len());
        let mut names = Vec::with_capacity(columns.len());
        let mut indices = Vec::with_capacity(columns.len());
        for column in columns {
            let name = column.as_ref();
            if !seen.insert(name) {
                return Err(QiError::validation(format!(
                    "column selected more than once: {}",
                    name
                )));
            }
            let idx = dataset
                .QiFColumnIndex(name)
                .ok_or_else(|| QiError::validation(format!("unknown column: {}", name)))?;
            names.push(name.to_string());
            indices.push(idx);
        }

        let mode = QiCSplitMode::QiFFromCounts(names.len(), dataset.QiFColumnCount());
        Ok(Self {
            columns: names,
            indices,
            mode,
        })
    }

    /// Selects every column in dataset order.
    #[allow(non_snake_case)]
    pub fn QiFAll(dataset: &QiCDataset) -> Result<Self> {
        Self::QiFNew(dataset, dataset.QiFColumns())
    }

    #[allow(non_snake_case)]
    pub fn QiFColumns(&self) -> &[String] {
        &self.columns
    }

    /// Dataset positions of the selected columns, in selection order.
    #[allow(non_snake_case)]
    pub fn QiFIndices(&self) -> &[usize] {
        &self.indices
    }

    #[allow(non_snake_case)]
    pub fn QiFMode(&self) -> QiCSplitMode {
        self.mode
    }

    /// Name of the folder created under the output root for this selection.
    #[allow(non_snake_case)]
    pub fn QiFDirectoryName(&self) -> String {
        let name = match self.mode {
            QiCSplitMode::Single => QiFSanitize(&self.columns[0]),
            QiCSplitMode::AllColumns => QI_ALL_COLUMNS_DIR.to_string(),
            QiCSplitMode::Combination => self
                .columns
                .iter()
                .map(|c| QiFSanitize(c))
                .collect::<Vec<_>>()
                .join("__"),
        };
        if name.is_empty() {
            return QI_FALLBACK_DIR.to_string();
        }
        name.chars().take(QI_MAX_DIR_LEN).collect()
    }
}
