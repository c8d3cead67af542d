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

//! # Qie Dataset Module
//!
//! In-memory table used by every stage of a split run: a list of unique
//! column names and ordered rows of typed cells.
//!
//! ## Usage Example
//!
//! ```rust
//! use qie::dataset::{QiCDataset, QiCValue};
//!
//! let dataset = QiCDataset::QiFNew(
//!     vec!["Region".into(), "Sales".into()],
//!     vec![
//!         vec![QiCValue::Text("East".into()), QiCValue::Int(10)],
//!         vec![QiCValue::Text("West".into()), QiCValue::Int(20)],
//!     ],
//! )?;
//! assert_eq!(dataset.QiFRowCount(), 2);
//! ```

use std::collections::HashSet;
use std::fmt;
use std::str::Utf8Error;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, QiError};

/// Text form of date-time cells, in keys and in CSV output.
pub const QI_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum QiCValue {
    /// Missing value.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Date or date-time read from a workbook.
    DateTime(NaiveDateTime),
    /// Raw cell content that did not decode as UTF-8.
    Bytes(Vec<u8>),
}

impl QiCValue {
    /// Infers a typed value from raw CSV text.
    ///
    /// Empty text is missing; integers, floats and booleans are recognised,
    /// everything else stays text.
    #[allow(non_snake_case)]
    pub fn QiFInfer(raw: &str) -> Self {
        if raw.is_empty() {
            return QiCValue::Null;
        }
        if let Ok(v) = raw.parse::<i64>() {
            return QiCValue::Int(v);
        }
        if looks_numeric(raw) {
            if let Ok(v) = raw.parse::<f64>() {
                return QiCValue::Float(v);
            }
        }
        match raw {
            "True" | "true" | "TRUE" => QiCValue::Bool(true),
            "False" | "false" | "FALSE" => QiCValue::Bool(false),
            _ => QiCValue::Text(raw.to_string()),
        }
    }

    /// String representation used for grouping.
    ///
    /// `Ok(None)` marks a missing value. Fails only for byte cells that are
    /// not valid UTF-8.
    #[allow(non_snake_case)]
    pub fn QiFStringify(&self) -> std::result::Result<Option<String>, Utf8Error> {
        match self {
            QiCValue::Null => Ok(None),
            QiCValue::Bool(true) => Ok(Some("True".to_string())),
            QiCValue::Bool(false) => Ok(Some("False".to_string())),
            QiCValue::Int(v) => Ok(Some(v.to_string())),
            QiCValue::Float(v) => Ok(Some(format_float(*v))),
            QiCValue::Text(s) => Ok(Some(s.clone())),
            QiCValue::DateTime(dt) => Ok(Some(dt.format(QI_DATETIME_FORMAT).to_string())),
            QiCValue::Bytes(b) => std::str::from_utf8(b).map(|s| Some(s.to_string())),
        }
    }

    /// Lossy text form, never fails. Missing values render as an empty string.
    #[allow(non_snake_case)]
    pub fn QiFDisplay(&self) -> String {
        match self {
            QiCValue::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
            other => other.QiFStringify().ok().flatten().unwrap_or_default(),
        }
    }
}

impl fmt::Display for QiCValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.QiFDisplay())
    }
}

fn looks_numeric(raw: &str) -> bool {
    // Rust accepts "inf" / "nan" spellings that a CSV cell should keep as text.
    raw.bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'))
}

/// Shortest round-trip text; scientific notation below 1e-4 and from 1e16 up.
fn format_float(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }
    if v == 0.0 {
        return format!("{:.1}", v);
    }

    let sci = format!("{:e}", v);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    if !(-4..16).contains(&exp) {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exp.abs())
    } else if v.fract() == 0.0 {
        format!("{:.1}", v)
    } else {
        v.to_string()
    }
}

/// Table of named columns and ordered rows.
///
/// Column names are unique and every row holds exactly one cell per column.
/// The engine never mutates a loaded dataset; normalization works on a clone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QiCDataset {
    columns: Vec<String>,
    rows: Vec<Vec<QiCValue>>,
}

impl QiCDataset {
    /// Builds a dataset, rejecting duplicate column names and ragged rows.
    #[allow(non_snake_case)]
    pub fn QiFNew(columns: Vec<String>, rows: Vec<Vec<QiCValue>>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(QiError::input(format!("duplicate column name: {}", name)));
            }
        }
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(QiError::input(format!(
                    "row {} has {} cells, expected {}",
                    idx + 1,
                    row.len(),
                    columns.len()
                )));
            }
        }
        Ok(Self { columns, rows })
    }

    #[allow(non_snake_case)]
    pub fn QiFColumns(&self) -> &[String] {
        &self.columns
    }

    #[allow(non_snake_case)]
    pub fn QiFRows(&self) -> &[Vec<QiCValue>] {
        &self.rows
    }

    #[allow(non_snake_case)]
    pub fn QiFRowCount(&self) -> usize {
        self.rows.len()
    }

    #[allow(non_snake_case)]
    pub fn QiFColumnCount(&self) -> usize {
        self.columns.len()
    }

    #[allow(non_snake_case)]
    pub fn QiFIsEmpty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact name.
    #[allow(non_snake_case)]
    pub fn QiFColumnIndex(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Replaces every cell of one column. `values` must hold one cell per row.
    pub(crate) fn replace_column(&mut self, index: usize, values: Vec<QiCValue>) {
        debug_assert_eq!(values.len(), self.rows.len());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row[index] = value;
        }
    }
}
