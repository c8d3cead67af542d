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

//! # Grouping
//!
//! Group-by over the selected column tuple of a normalized dataset. The same
//! algorithm serves all three split modes; the mode only matters for naming.
//!
//! Groups come out in ascending key order and rows inside a group keep their
//! dataset order, so identical input always yields identical groups.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dataset::{QiCDataset, QiCValue};
use crate::normalize::QiCNormalizer;
use crate::selection::QiCSelection;

/// Normalized values of the selected columns, in selection order.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QiCGroupKey(pub Vec<String>);

impl QiCGroupKey {
    #[allow(non_snake_case)]
    pub fn QiFValues(&self) -> &[String] {
        &self.0
    }
}

/// Rows sharing one key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QiCGroup {
    pub key: QiCGroupKey,
    /// Row positions in the normalized dataset.
    pub rows: Vec<usize>,
}

impl QiCGroup {
    #[allow(non_snake_case)]
    pub fn QiFLen(&self) -> usize {
        self.rows.len()
    }
}

/// Ordered groups produced by one grouping pass.
#[derive(Clone, Debug, Default)]
pub struct QiCGrouping {
    pub groups: Vec<QiCGroup>,
}

impl QiCGrouping {
    #[allow(non_snake_case)]
    pub fn QiFLen(&self) -> usize {
        self.groups.len()
    }

    #[allow(non_snake_case)]
    pub fn QiFIsEmpty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QiCGroup> {
        self.groups.iter()
    }
}

#[derive(Debug, Default)]
pub struct QiCGrouper;

impl QiCGrouper {
    /// Partitions `dataset` by the selected columns.
    ///
    /// Every row lands in exactly one group. Cells are expected to be
    /// normalized already; any other cell is keyed by its normalized form.
    #[allow(non_snake_case)]
    pub fn QiFGroup(dataset: &QiCDataset, selection: &QiCSelection) -> QiCGrouping {
        let mut buckets: BTreeMap<QiCGroupKey, Vec<usize>> = BTreeMap::new();
        for (row_idx, row) in dataset.QiFRows().iter().enumerate() {
            let key = QiCGroupKey(
                selection
                    .QiFIndices()
                    .iter()
                    .map(|&col| key_text(&row[col]))
                    .collect(),
            );
            buckets.entry(key).or_default().push(row_idx);
        }

        QiCGrouping {
            groups: buckets
                .into_iter()
                .map(|(key, rows)| QiCGroup { key, rows })
                .collect(),
        }
    }
}

fn key_text(value: &QiCValue) -> String {
    match value {
        QiCValue::Text(s) => s.clone(),
        other => QiCNormalizer::QiFNormalizeValue(other)
            .unwrap_or_else(|| other.QiFDisplay()),
    }
}
