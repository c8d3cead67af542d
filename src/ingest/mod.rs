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

//! # Data Ingestion Module
//!
//! Loads the source table of a split into a [`QiCDataset`](crate::dataset::QiCDataset).
//!
//! ## Module Components
//!
//! - **Format Detection** ([format.rs](format/index.html)): extension and content sniffing
//! - **Reader** ([reader.rs](reader/index.html)): CSV and workbook loading with validation
//!
//! ## Supported Input Formats
//!
//! - **CSV**: first record is the header, cells typed by inference
//! - **Workbooks**: `.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods` (first worksheet)
//!
//! ## Usage
//!
//! ```rust
//! use qie::ingest::QiCTableReader;
//!
//! let dataset = QiCTableReader::QiFNew().QiFReadPath(&path)?;
//! println!("{:?}", dataset.QiFColumns());
//! ```

pub mod format;
pub mod reader;

pub use format::{QiCDataFormat, QiCFormatDetector};
pub use reader::{QiCReaderConfig, QiCTableReader};
