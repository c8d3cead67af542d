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

//! # Qie Error Module
//!
//! This module defines the error types used throughout the Qie engine for
//! consistent error handling and reporting.
//!
//! ## Error Categories
//!
//! - **Input**: Source file missing or unreadable, empty dataset, zero columns
//! - **Destination**: Output folder missing or not writable
//! - **Validation**: Invalid column selection
//! - **Export**: A single group could not be written (absorbed by the run)
//! - **Archive**: The ZIP bundle could not be created (fatal to the run)
//! - **Busy**: A split run is already active on the session
//! - **Io / Csv / Xlsx / Zip / Serde**: Wrapped lower-level failures
//! - **Internal**: Unexpected internal failures
//!
//! Input, destination, validation and archive errors end a run. Export errors
//! are recorded per group and summarized once the run completes.

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zip::result::ZipError;

/// Convenience result type used throughout Qie.
pub type Result<T> = std::result::Result<T, QiError>;

/// Canonical error enumeration for Qie.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum QiError {
    /// Errors originating from filesystem IO.
    #[error("io error: {0}")]
    Io(String),

    /// The source table is missing, unreadable, or structurally unusable.
    #[error("input error: {message}")]
    Input { message: String },

    /// The output folder cannot receive exported files.
    #[error("destination error: {message}")]
    Destination { message: String },

    /// Validation errors triggered by invalid parameters such as the column selection.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Failure while exporting a single group.
    #[error("export of '{file}' failed: {message}")]
    Export { file: String, message: String },

    /// Failure while building the ZIP bundle.
    #[error("archive error: {message}")]
    Archive { message: String },

    /// A split run is already in flight for this session.
    #[error("a split operation is already in progress")]
    Busy,

    /// CSV parsing or writing failures.
    #[error("csv error: {0}")]
    Csv(String),

    /// Spreadsheet reading or writing failures.
    #[error("xlsx error: {0}")]
    Xlsx(String),

    /// Errors originating from ZIP file operations.
    #[error("zip error: {0}")]
    Zip(String),

    /// Wrapper for serde-style serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Catch-all variant for unexpected situations.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for QiError {
    fn from(err: io::Error) -> Self {
        QiError::Io(err.to_string())
    }
}

impl From<csv::Error> for QiError {
    fn from(err: csv::Error) -> Self {
        QiError::Csv(err.to_string())
    }
}

impl From<calamine::Error> for QiError {
    fn from(err: calamine::Error) -> Self {
        QiError::Xlsx(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for QiError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        QiError::Xlsx(err.to_string())
    }
}

impl From<serde_json::Error> for QiError {
    fn from(err: serde_json::Error) -> Self {
        QiError::Serde(err.to_string())
    }
}

impl From<ZipError> for QiError {
    fn from(err: ZipError) -> Self {
        QiError::Zip(err.to_string())
    }
}

impl QiError {
    /// Helper to construct input errors.
    pub fn input<T: Into<String>>(message: T) -> Self {
        QiError::Input {
            message: message.into(),
        }
    }

    /// Helper to construct destination errors.
    pub fn destination<T: Into<String>>(message: T) -> Self {
        QiError::Destination {
            message: message.into(),
        }
    }

    /// Helper to construct simple validation errors.
    pub fn validation<T: Into<String>>(message: T) -> Self {
        QiError::Validation {
            message: message.into(),
        }
    }

    /// Helper to construct per-group export errors.
    pub fn export(file: impl Into<String>, message: impl Into<String>) -> Self {
        QiError::Export {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Helper to construct archive errors.
    pub fn archive<T: Into<String>>(message: T) -> Self {
        QiError::Archive {
            message: message.into(),
        }
    }

    /// Helper to construct internal errors.
    pub fn internal<T: Into<String>>(message: T) -> Self {
        QiError::Internal(message.into())
    }
}
