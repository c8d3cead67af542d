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

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;

use crate::dataset::{QiCDataset, QiCValue};
use crate::errors::{Result, QiError};
use crate::ingest::format::{QiCDataFormat, QiCFormatDetector};

/// 2^53: above this a float no longer holds every integer exactly.
const QI_MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

#[derive(Clone, Debug)]
pub struct QiCReaderConfig {
    pub delimiter: u8,
    /// Type CSV cells (integers, floats, booleans) instead of keeping text.
    pub infer_types: bool,
    /// Bytes sniffed when the extension does not identify the format.
    pub sniff_bytes: usize,
}

impl Default for QiCReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            infer_types: true,
            sniff_bytes: 8192,
        }
    }
}

/// Loads a CSV file or the first worksheet of a workbook into a dataset.
#[derive(Clone, Debug, Default)]
pub struct QiCTableReader {
    config: QiCReaderConfig,
    detector: QiCFormatDetector,
}

impl QiCTableReader {
    #[allow(non_snake_case)]
    pub fn QiFNew() -> Self {
        Self {
            config: QiCReaderConfig::default(),
            detector: QiCFormatDetector::QiFNew(),
        }
    }

    #[allow(non_snake_case)]
    pub fn QiFWithConfig(mut self, config: QiCReaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Reads `path` fully and validates that the table has columns and rows.
    #[allow(non_snake_case)]
    pub fn QiFReadPath(&self, path: &Path) -> Result<QiCDataset> {
        if !path.exists() {
            return Err(QiError::input(format!("File not found: {}", path.display())));
        }
        if !path.is_file() {
            return Err(QiError::input(format!("Not a file: {}", path.display())));
        }

        let dataset = match self.detect(path)? {
            QiCDataFormat::Csv => self.read_csv(path)?,
            QiCDataFormat::Excel => self.read_excel(path)?,
            QiCDataFormat::Unknown => {
                return Err(QiError::input(format!(
                    "Invalid file format: {}. Please use .xlsx, .xls, or .csv",
                    path.display()
                )))
            }
        };

        if dataset.QiFColumnCount() == 0 {
            return Err(QiError::input("No columns detected in dataset"));
        }
        if dataset.QiFIsEmpty() {
            return Err(QiError::input("Dataset is empty"));
        }

        log::debug!(
            "loaded {} rows x {} columns from {}",
            dataset.QiFRowCount(),
            dataset.QiFColumnCount(),
            path.display()
        );
        Ok(dataset)
    }

    fn detect(&self, path: &Path) -> Result<QiCDataFormat> {
        let by_extension = self.detector.QiFDetectFromPath(path);
        if by_extension != QiCDataFormat::Unknown {
            return Ok(by_extension);
        }

        let mut head = Vec::with_capacity(self.config.sniff_bytes);
        File::open(path)?
            .take(self.config.sniff_bytes as u64)
            .read_to_end(&mut head)?;
        Ok(self.detector.QiFDetectFromContent(&head))
    }

    fn read_csv(&self, path: &Path) -> Result<QiCDataset> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.config.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;

        let headers: Vec<String> = reader
            .byte_headers()?
            .iter()
            .map(|h| String::from_utf8_lossy(h).into_owned())
            .collect();
        let columns = unique_headers(headers);

        let mut rows = Vec::new();
        for (idx, result) in reader.byte_records().enumerate() {
            let record = result?;
            if record.len() > columns.len() {
                return Err(QiError::input(format!(
                    "csv row {} has {} fields, header has {}",
                    idx + 1,
                    record.len(),
                    columns.len()
                )));
            }
            let mut row: Vec<QiCValue> = record.iter().map(|field| self.csv_cell(field)).collect();
            row.resize(columns.len(), QiCValue::Null);
            rows.push(row);
        }

        QiCDataset::QiFNew(columns, rows)
    }

    fn csv_cell(&self, field: &[u8]) -> QiCValue {
        match std::str::from_utf8(field) {
            Ok(text) if self.config.infer_types => QiCValue::QiFInfer(text),
            Ok("") => QiCValue::Null,
            Ok(text) => QiCValue::Text(text.to_string()),
            Err(_) => QiCValue::Bytes(field.to_vec()),
        }
    }

    fn read_excel(&self, path: &Path) -> Result<QiCDataset> {
        let mut workbook = open_workbook_auto(path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| QiError::input("workbook has no worksheets"))??;

        let mut sheet_rows = range.rows();
        let header = match sheet_rows.next() {
            Some(header) => header,
            None => return QiCDataset::QiFNew(Vec::new(), Vec::new()),
        };
        let columns = unique_headers(header.iter().map(|c| excel_cell(c).QiFDisplay()).collect());

        let rows = sheet_rows
            .filter(|r| r.iter().any(|c| !matches!(c, Data::Empty)))
            .map(|r| {
                let mut row: Vec<QiCValue> = r.iter().map(excel_cell).collect();
                row.resize(columns.len(), QiCValue::Null);
                row
            })
            .collect();

        QiCDataset::QiFNew(columns, rows)
    }
}

fn excel_cell(cell: &Data) -> QiCValue {
    match cell {
        Data::Empty => QiCValue::Null,
        Data::Int(v) => QiCValue::Int(*v),
        Data::Float(v) => float_cell(*v),
        Data::Bool(v) => QiCValue::Bool(*v),
        Data::String(s) if s.is_empty() => QiCValue::Null,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => QiCValue::Text(s.clone()),
        Data::DateTime(dt) if dt.is_datetime() => match dt.as_datetime() {
            Some(value) => QiCValue::DateTime(value),
            None => float_cell(dt.as_f64()),
        },
        Data::DateTime(dt) => float_cell(dt.as_f64()),
        Data::Error(e) => QiCValue::Text(e.to_string()),
        #[allow(unreachable_patterns)]
        other => QiCValue::Text(other.to_string()),
    }
}

/// Workbooks store every number as a float; whole values read back as integers.
fn float_cell(v: f64) -> QiCValue {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < QI_MAX_EXACT_INT {
        QiCValue::Int(v as i64)
    } else {
        QiCValue::Float(v)
    }
}

/// Blank headers become `Unnamed: <i>`; repeats get `.1`, `.2`, … suffixes.
fn unique_headers(raw: Vec<String>) -> Vec<String> {
    let mut used = HashSet::with_capacity(raw.len());
    let mut out = Vec::with_capacity(raw.len());
    for (i, name) in raw.into_iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {}", i)
        } else {
            name
        };
        let mut candidate = base.clone();
        let mut n = 1;
        while used.contains(&candidate) {
            candidate = format!("{}.{}", base, n);
            n += 1;
        }
        used.insert(candidate.clone());
        out.push(candidate);
    }
    out
}
