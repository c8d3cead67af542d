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

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One successfully exported group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QiCExportRecord {
    /// Base filename as synthesized, before collision suffixes.
    pub name: String,
    /// Absolute path of the written file.
    pub path: PathBuf,
    pub rows: usize,
}

impl QiCExportRecord {
    /// Final file name on disk, including any `_N` suffix and the extension.
    #[allow(non_snake_case)]
    pub fn QiFFileName(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone())
    }
}

/// A group whose export failed; the run carried on without it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QiCExportFailure {
    /// 1-based position of the group in export order.
    pub group: usize,
    pub name: Option<String>,
    pub message: String,
}
