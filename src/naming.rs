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

//! # Filename Synthesis
//!
//! Base filenames (without extension) for exported groups:
//!
//! - **Single**: the sanitized key value, e.g. `East`
//! - **Combination**: `Column_Value` pairs joined by `__`, e.g. `Region_East__Year_2024`
//! - **AllColumns**: `Group_001`, `Group_002`, … in export order
//!
//! The `Group_NNN` counter belongs to one synthesizer, which belongs to one
//! run. Preview calls return the literal `Group_NNN` and leave it alone.

use crate::group::QiCGroupKey;
use crate::sanitize::QiFSanitize;
use crate::selection::{QiCSelection, QiCSplitMode};

/// Placeholder name shown for all-columns groups in previews.
pub const QI_PREVIEW_GROUP_NAME: &str = "Group_NNN";

/// Whether a name is for display or for a file about to be written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QiCNameMode {
    Preview,
    Export,
}

/// 1-based counter for all-columns group names.
#[derive(Clone, Debug, Default)]
pub struct QiCGroupCounter {
    issued: usize,
}

impl QiCGroupCounter {
    #[allow(non_snake_case)]
    pub fn QiFNew() -> Self {
        Self::default()
    }

    /// Returns the next group number, starting at 1.
    #[allow(non_snake_case)]
    pub fn QiFAdvance(&mut self) -> usize {
        self.issued += 1;
        self.issued
    }

    /// Number of group numbers handed out so far.
    #[allow(non_snake_case)]
    pub fn QiFIssued(&self) -> usize {
        self.issued
    }
}

/// Run-scoped filename synthesizer.
#[derive(Debug)]
pub struct QiCFilenameSynthesizer<'a> {
    selection: &'a QiCSelection,
    counter: QiCGroupCounter,
}

impl<'a> QiCFilenameSynthesizer<'a> {
    #[allow(non_snake_case)]
    pub fn QiFNew(selection: &'a QiCSelection) -> Self {
        Self {
            selection,
            counter: QiCGroupCounter::QiFNew(),
        }
    }

    /// Base filename for `key`.
    ///
    /// Deterministic for a given selection and key, except for the
    /// all-columns counter which advances on every export-mode call.
    #[allow(non_snake_case)]
    pub fn QiFSynthesize(&mut self, key: &QiCGroupKey, mode: QiCNameMode) -> String {
        match self.selection.QiFMode() {
            QiCSplitMode::AllColumns => match mode {
                QiCNameMode::Export => format!("Group_{:03}", self.counter.QiFAdvance()),
                QiCNameMode::Preview => QI_PREVIEW_GROUP_NAME.to_string(),
            },
            QiCSplitMode::Single => {
                let value = key.QiFValues().first().map(String::as_str).unwrap_or("");
                QiFSanitize(value)
            }
            QiCSplitMode::Combination => self
                .selection
                .QiFColumns()
                .iter()
                .zip(key.QiFValues())
                .map(|(column, value)| format!("{}_{}", QiFSanitize(column), QiFSanitize(value)))
                .collect::<Vec<_>>()
                .join("__"),
        }
    }

    #[allow(non_snake_case)]
    pub fn QiFCounter(&self) -> &QiCGroupCounter {
        &self.counter
    }
}
