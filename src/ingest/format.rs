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

use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QiCDataFormat {
    Csv,
    /// Any workbook format calamine can open: xlsx, xlsm, xlsb, xls, ods.
    Excel,
    Unknown,
}

#[derive(Clone, Debug, Default)]
pub struct QiCFormatDetector;

impl QiCFormatDetector {
    #[allow(non_snake_case)]
    pub fn QiFNew() -> Self {
        Self
    }

    #[allow(non_snake_case)]
    pub fn QiFDetectFromPath(&self, path: &Path) -> QiCDataFormat {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "csv" => QiCDataFormat::Csv,
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => QiCDataFormat::Excel,
            _ => QiCDataFormat::Unknown,
        }
    }

    /// Sniffs the leading bytes of a file. Workbooks are ZIP or OLE
    /// containers; anything else with a comma on its first line is CSV.
    #[allow(non_snake_case)]
    pub fn QiFDetectFromContent(&self, content: &[u8]) -> QiCDataFormat {
        if content.is_empty() {
            return QiCDataFormat::Unknown;
        }
        if content.starts_with(b"PK\x03\x04") || content.starts_with(&[0xD0, 0xCF, 0x11, 0xE0]) {
            return QiCDataFormat::Excel;
        }

        let first_line = content.split(|b| *b == b'\n').next().unwrap_or(content);
        if first_line.contains(&b',') {
            return QiCDataFormat::Csv;
        }

        QiCDataFormat::Unknown
    }
}
