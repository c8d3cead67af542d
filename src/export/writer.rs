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

//! # Table Writer Module
//!
//! Writes a subset of dataset rows, with every column, as CSV or XLSX.

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_xlsxwriter::{Format, Workbook};
use serde::{Deserialize, Serialize};

use crate::dataset::{QiCDataset, QiCValue};
use crate::errors::{Result, QiError};

/// Worksheet row limit, header row included.
pub const QI_XLSX_MAX_ROWS: usize = 1_048_576;

/// Worksheet column limit.
pub const QI_XLSX_MAX_COLUMNS: usize = 16_384;

/// Number format applied to date-time cells in workbooks.
pub const QI_XLSX_DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Supported output data formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QiCOutputFormat {
    /// Comma-separated values format.
    Csv,
    /// Spreadsheet (xlsx) format.
    Excel,
}

impl QiCOutputFormat {
    /// File extension including the leading dot.
    #[allow(non_snake_case)]
    pub fn QiFExtension(&self) -> &'static str {
        match self {
            QiCOutputFormat::Csv => ".csv",
            QiCOutputFormat::Excel => ".xlsx",
        }
    }
}

impl fmt::Display for QiCOutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QiCOutputFormat::Csv => f.write_str("csv"),
            QiCOutputFormat::Excel => f.write_str("excel"),
        }
    }
}

impl FromStr for QiCOutputFormat {
    type Err = QiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(QiCOutputFormat::Csv),
            "excel" | "xlsx" => Ok(QiCOutputFormat::Excel),
            other => Err(QiError::validation(format!(
                "unknown output format '{}', expected csv or excel",
                other
            ))),
        }
    }
}

/// Configuration for the table writer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QiCWriterConfig {
    /// Output data format.
    pub format: QiCOutputFormat,
    /// CSV field delimiter.
    pub delimiter: u8,
    /// Worksheet name used for xlsx output.
    pub sheet_name: String,
    /// Use atomic write (write to temp then rename).
    pub atomic_write: bool,
}

impl Default for QiCWriterConfig {
    fn default() -> Self {
        Self {
            format: QiCOutputFormat::Csv,
            delimiter: b',',
            sheet_name: "Sheet1".to_string(),
            atomic_write: true,
        }
    }
}

/// Statistics about write operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QiCWriteStats {
    /// Data rows written, header excluded.
    pub rows_written: usize,
    /// Size of the final file.
    pub bytes_written: u64,
    /// Number of files created.
    pub files_created: usize,
}

/// Writer for one group file at a time.
#[derive(Debug, Default)]
pub struct QiCTableWriter {
    config: QiCWriterConfig,
}

impl QiCTableWriter {
    #[allow(non_snake_case)]
    pub fn QiFNew(format: QiCOutputFormat) -> Self {
        Self {
            config: QiCWriterConfig {
                format,
                ..QiCWriterConfig::default()
            },
        }
    }

    #[allow(non_snake_case)]
    pub fn QiFWithConfig(mut self, config: QiCWriterConfig) -> Self {
        self.config = config;
        self
    }

    #[allow(non_snake_case)]
    pub fn QiFFormat(&self) -> QiCOutputFormat {
        self.config.format
    }

    /// Writes the header and the rows at `rows` (positions in `dataset`) to `path`.
    ///
    /// With atomic writes enabled the content goes to a hidden sibling first
    /// and is renamed into place, so `path` never holds a partial file.
    #[allow(non_snake_case)]
    pub fn QiFWriteRows(
        &self,
        dataset: &QiCDataset,
        rows: &[usize],
        path: &Path,
    ) -> Result<QiCWriteStats> {
        if let Some(&bad) = rows.iter().find(|&&r| r >= dataset.QiFRowCount()) {
            return Err(QiError::internal(format!("row index {} out of range", bad)));
        }

        let target = if self.config.atomic_write {
            self.temp_path(path)
        } else {
            path.to_path_buf()
        };

        let written = match self.config.format {
            QiCOutputFormat::Csv => self.write_csv(dataset, rows, &target),
            QiCOutputFormat::Excel => self.write_xlsx(dataset, rows, &target),
        };
        if let Err(err) = written {
            let _ = std::fs::remove_file(&target);
            return Err(err);
        }

        if self.config.atomic_write {
            if let Err(err) = std::fs::rename(&target, path) {
                let _ = std::fs::remove_file(&target);
                return Err(err.into());
            }
        }

        Ok(QiCWriteStats {
            rows_written: rows.len(),
            bytes_written: std::fs::metadata(path).map(|m| m.len()).unwrap_or(0),
            files_created: 1,
        })
    }

    fn write_csv(&self, dataset: &QiCDataset, rows: &[usize], path: &Path) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.config.delimiter)
            .from_path(path)?;

        writer.write_record(dataset.QiFColumns())?;
        for &idx in rows {
            let row = &dataset.QiFRows()[idx];
            writer.write_record(row.iter().map(csv_field))?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_xlsx(&self, dataset: &QiCDataset, rows: &[usize], path: &Path) -> Result<()> {
        if rows.len() + 1 > QI_XLSX_MAX_ROWS {
            return Err(QiError::Xlsx(format!(
                "{} rows exceed the worksheet limit of {}",
                rows.len(),
                QI_XLSX_MAX_ROWS - 1
            )));
        }
        if dataset.QiFColumnCount() > QI_XLSX_MAX_COLUMNS {
            return Err(QiError::Xlsx(format!(
                "{} columns exceed the worksheet limit of {}",
                dataset.QiFColumnCount(),
                QI_XLSX_MAX_COLUMNS
            )));
        }

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(self.config.sheet_name.as_str())?;
        let datetime_format = Format::new().set_num_format(QI_XLSX_DATETIME_FORMAT);

        for (col, name) in dataset.QiFColumns().iter().enumerate() {
            worksheet.write_string(0, col as u16, name.as_str())?;
        }
        for (out_row, &idx) in rows.iter().enumerate() {
            let sheet_row = (out_row + 1) as u32;
            for (col, value) in dataset.QiFRows()[idx].iter().enumerate() {
                let col = col as u16;
                match value {
                    QiCValue::Null => {}
                    QiCValue::Bool(b) => {
                        worksheet.write_boolean(sheet_row, col, *b)?;
                    }
                    QiCValue::Int(v) => {
                        worksheet.write_number(sheet_row, col, *v as f64)?;
                    }
                    QiCValue::Float(v) if v.is_finite() => {
                        worksheet.write_number(sheet_row, col, *v)?;
                    }
                    QiCValue::Float(_) => {}
                    QiCValue::Text(s) => {
                        worksheet.write_string(sheet_row, col, s.as_str())?;
                    }
                    QiCValue::DateTime(dt) => {
                        worksheet.write_datetime_with_format(sheet_row, col, dt, &datetime_format)?;
                    }
                    QiCValue::Bytes(_) => {
                        worksheet.write_string(sheet_row, col, value.QiFDisplay())?;
                    }
                }
            }
        }

        workbook.save(path)?;
        Ok(())
    }

    /// Generates temporary path for atomic writes.
    fn temp_path(&self, path: &Path) -> PathBuf {
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        let parent = path.parent().unwrap_or(Path::new("."));

        parent.join(format!(".{}.tmp", name))
    }
}

fn csv_field(value: &QiCValue) -> Cow<'_, [u8]> {
    match value {
        QiCValue::Null => Cow::Borrowed(&[][..]),
        QiCValue::Float(v) if v.is_nan() => Cow::Borrowed(&[][..]),
        QiCValue::Text(s) => Cow::Borrowed(s.as_bytes()),
        QiCValue::Bytes(b) => Cow::Borrowed(b.as_slice()),
        other => Cow::Owned(other.QiFDisplay().into_bytes()),
    }
}
