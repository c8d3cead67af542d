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

//! # Qie Core Library
//!
//! Qie splits a tabular dataset into one file per distinct value (or value
//! combination) of the chosen columns and bundles the results into a ZIP.
//!
//! ## Module Overview
//!
//! - **dataset**: In-memory table of typed cells
//! - **ingest**: CSV and workbook loading with format detection
//! - **sanitize**: Filesystem-safe tokens from arbitrary strings
//! - **selection**: Validated column selection and the split mode
//! - **normalize**: Null-like values in grouping columns mapped to `Unknown`
//! - **group**: Group-by over the selected columns
//! - **naming**: Per-group base filenames and the `Group_NNN` counter
//! - **export**: Collision-free paths and CSV/XLSX writing
//! - **archive**: ZIP bundle of a run's files
//! - **progress**: Run events delivered to a caller-supplied sink
//! - **run**: Sessions, previews and the split state machine
//! - **log**: Leveled logging to console and a rotating file
//!
//! ## Quick Start
//!
//! ```rust
//! use qie::{QiCCancelToken, QiCOutputFormat, QiCSession, QiCSplitRequest};
//!
//! let session = QiCSession::QiFLoad("sales.csv")?;
//! let request = QiCSplitRequest::QiFNew(["Region"], QiCOutputFormat::Csv, "out");
//! let summary = session.QiFRun(&request, &QiCCancelToken::QiFNew(), None)?;
//! println!("{} files, archive {:?}", summary.QiFExportedCount(), summary.archive);
//! ```
//!
//! ## Error Handling
//!
//! All operations return `Result<T, QiError>`. A failure to write one group is
//! recorded in the run summary; input, destination and archive failures end
//! the run.

#![allow(non_snake_case)]

pub mod errors;
pub mod log;

pub mod dataset;
pub mod ingest;
pub mod sanitize;
pub mod selection;
pub mod normalize;
pub mod group;
pub mod naming;
pub mod export;
pub mod archive;
pub mod progress;
pub mod run;

pub use errors::{Result, QiError};
pub use dataset::{QiCDataset, QiCValue};
pub use ingest::{QiCDataFormat, QiCFormatDetector, QiCReaderConfig, QiCTableReader};
pub use sanitize::QiFSanitize;
pub use selection::{QiCSelection, QiCSplitMode};
pub use normalize::{QiCNormalized, QiCNormalizer, QI_PLACEHOLDER};
pub use group::{QiCGroup, QiCGroupKey, QiCGrouper, QiCGrouping};
pub use naming::{QiCFilenameSynthesizer, QiCGroupCounter, QiCNameMode};
pub use export::{
    QiCExportFailure, QiCExportRecord, QiCFileAllocator, QiCOutputFormat, QiCTableWriter,
    QiFCreateUniqueDir,
};
pub use archive::{QiCArchiveInfo, QiCArchiver};
pub use progress::{QiCEventSink, QiCProgressReporter, QiCRunEvent, QiFChannelSink};
pub use run::{
    QiCCancelToken, QiCPreview, QiCRunState, QiCRunSummary, QiCSession, QiCSplitRequest,
};
