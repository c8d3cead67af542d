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

//! # Data Export Module
//!
//! Writes each group of a split to its own file inside a fresh output directory.
//!
//! ## Module Components
//!
//! - **Writer** ([writer.rs](writer/index.html)): CSV and XLSX writing with atomic rename
//! - **Layout** ([layout.rs](layout/index.html)): collision-free directory and file paths
//! - **Report** ([report.rs](report/index.html)): per-group export records and failures
//!
//! ## Supported Output Formats
//!
//! - **CSV**: header row plus data rows, nulls written as empty fields
//! - **Excel**: single `Sheet1` worksheet in `.xlsx`
//!
//! ## Usage Patterns
//!
//! ```rust
//! use qie::export::{QiCFileAllocator, QiCOutputFormat, QiCTableWriter, QiFCreateUniqueDir};
//!
//! let dir = QiFCreateUniqueDir(&root, "Region")?;
//! let mut files = QiCFileAllocator::QiFNew(&dir, QiCOutputFormat::Csv.QiFExtension());
//! let writer = QiCTableWriter::QiFNew(QiCOutputFormat::Csv);
//! let stats = writer.QiFWriteRows(&dataset, &[0, 2], &files.QiFAllocate("East"))?;
//! ```

pub mod layout;
pub mod report;
pub mod writer;

pub use layout::{QiCFileAllocator, QiFCreateUniqueDir, QiFNextFreePath};
pub use report::{QiCExportFailure, QiCExportRecord};
pub use writer::{
    QiCOutputFormat, QiCTableWriter, QiCWriteStats, QiCWriterConfig, QI_XLSX_MAX_COLUMNS,
    QI_XLSX_MAX_ROWS,
};
