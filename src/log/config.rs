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

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::core::{QiCLogLevel, QiCLogRecord};
use crate::errors::Result;

/// Default rotation threshold for the log file.
pub const QI_DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// Default number of rotated log files kept next to the active one.
pub const QI_DEFAULT_BACKUP_COUNT: u32 = 5;

/// Configuration for the QiCLogger: console/file enablement, threshold
/// level, output format per handler and size-based rotation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QiCLogConfig {
    pub default_level: String,
    pub console_enabled: bool,
    pub json_format_console: bool,
    /// Whether file logging is enabled.
    pub file_enabled: bool,
    /// Log file path when file logging is enabled.
    pub file_path: Option<String>,
    pub json_format_file: bool,
    /// Rotation strategy; only "size" rotates.
    pub rotate_when: Option<String>,
    /// Maximum file size in bytes before rotation.
    pub max_bytes: Option<u64>,
    /// Number of backup files to keep when rotating.
    pub backup_count: Option<u32>,
}

impl Default for QiCLogConfig {
    fn default() -> Self {
        QiCLogConfig {
            default_level: "INFO".to_string(),
            console_enabled: true,
            json_format_console: false,
            file_enabled: true,
            file_path: QiFDefaultLogPath(),
            json_format_file: false,
            rotate_when: Some("size".to_string()),
            max_bytes: Some(QI_DEFAULT_MAX_BYTES),
            backup_count: Some(QI_DEFAULT_BACKUP_COUNT),
        }
    }
}

/// `<data_local_dir>/qie/qie.log`, when the platform has such a directory.
#[allow(non_snake_case)]
pub fn QiFDefaultLogPath() -> Option<String> {
    dirs::data_local_dir().map(|d| d.join("qie").join("qie.log").to_string_lossy().into_owned())
}

impl QiCLogConfig {
    #[allow(non_snake_case)]
    pub fn QiFShouldLog(&self, record: &QiCLogRecord) -> bool {
        record.level.QiFValue() >= self.QiFLevel().QiFValue()
    }

    #[allow(non_snake_case)]
    pub fn QiFLevel(&self) -> QiCLogLevel {
        QiCLogLevel::QiFParse(&self.default_level)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct QiCLogConfigBuilder {
    pub default_level: Option<String>,
    pub console_enabled: Option<bool>,
    pub json_format_console: Option<bool>,
    pub file_enabled: Option<bool>,
    pub file_path: Option<String>,
    pub json_format_file: Option<bool>,
    pub rotate_when: Option<String>,
    pub max_bytes: Option<u64>,
    pub backup_count: Option<u32>,
}

impl QiCLogConfigBuilder {
    #[allow(non_snake_case)]
    pub fn QiFNew() -> Self {
        Self::default()
    }

    #[allow(non_snake_case)]
    pub fn QiFLevel(mut self, level: impl Into<String>) -> Self {
        self.default_level = Some(level.into());
        self
    }

    #[allow(non_snake_case)]
    pub fn QiFConsole(mut self, enabled: bool) -> Self {
        self.console_enabled = Some(enabled);
        self
    }

    /// Enables file logging at `path`.
    #[allow(non_snake_case)]
    pub fn QiFFile(mut self, path: impl Into<String>) -> Self {
        self.file_enabled = Some(true);
        self.file_path = Some(path.into());
        self
    }

    #[allow(non_snake_case)]
    pub fn QiFNoFile(mut self) -> Self {
        self.file_enabled = Some(false);
        self
    }

    #[allow(non_snake_case)]
    pub fn QiFRotation(mut self, max_bytes: u64, backup_count: u32) -> Self {
        self.rotate_when = Some("size".to_string());
        self.max_bytes = Some(max_bytes);
        self.backup_count = Some(backup_count);
        self
    }

    #[allow(non_snake_case)]
    pub fn QiFBuild(self) -> QiCLogConfig {
        let base = QiCLogConfig::default();
        QiCLogConfig {
            default_level: self.default_level.unwrap_or(base.default_level),
            console_enabled: self.console_enabled.unwrap_or(base.console_enabled),
            json_format_console: self.json_format_console.unwrap_or(base.json_format_console),
            file_enabled: self.file_enabled.unwrap_or(base.file_enabled),
            file_path: self.file_path.or(base.file_path),
            json_format_file: self.json_format_file.unwrap_or(base.json_format_file),
            rotate_when: self.rotate_when.or(base.rotate_when),
            max_bytes: self.max_bytes.or(base.max_bytes),
            backup_count: self.backup_count.or(base.backup_count),
        }
    }

    /// Builds a config from a JSON object; absent keys keep their defaults.
    #[allow(non_snake_case)]
    pub fn QiFFromJson(value: &Value) -> Result<QiCLogConfig> {
        let builder: QiCLogConfigBuilder = serde_json::from_value(value.clone())?;
        Ok(builder.QiFBuild())
    }
}
