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

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::log::config::QI_DEFAULT_BACKUP_COUNT;
use crate::log::core::QiCLogRecord;
use crate::log::formatters::{QiCJsonFormatter, QiCTextFormatter};

pub trait QiCLogHandler {
    fn handle(&self, record: &QiCLogRecord);
}

/// Writes to stderr so stdout stays free for command output.
pub struct QiCConsoleHandler {
    json: bool,
}

impl QiCConsoleHandler {
    #[allow(non_snake_case)]
    pub fn QiFNew(json: bool) -> Self {
        QiCConsoleHandler { json }
    }
}

impl QiCLogHandler for QiCConsoleHandler {
    fn handle(&self, record: &QiCLogRecord) {
        let line = if self.json {
            QiCJsonFormatter::QiFFormat(record)
        } else {
            QiCTextFormatter::QiFFormat(record)
        };
        eprintln!("{}", line);
    }
}

pub struct QiCFileHandler {
    path: PathBuf,
    json: bool,
    rotate_when: Option<String>,
    max_bytes: Option<u64>,
    backup_count: Option<u32>,
    file: Mutex<()>,
}

impl QiCFileHandler {
    #[allow(non_snake_case)]
    pub fn QiFNew(
        path: impl Into<PathBuf>,
        json: bool,
        rotate_when: Option<String>,
        max_bytes: Option<u64>,
        backup_count: Option<u32>,
    ) -> Self {
        QiCFileHandler {
            path: path.into(),
            json,
            rotate_when,
            max_bytes,
            backup_count,
            file: Mutex::new(()),
        }
    }

    fn backup_path(&self, idx: u32) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(format!(".{}", idx));
        PathBuf::from(name)
    }

    fn rotate_if_needed(&self) {
        if self.rotate_when.as_deref() != Some("size") {
            return;
        }
        let max_bytes = match self.max_bytes {
            Some(v) => v,
            None => return,
        };
        match fs::metadata(&self.path) {
            Ok(meta) if meta.len() >= max_bytes => {}
            _ => return,
        }

        let backup_count = self.backup_count.unwrap_or(QI_DEFAULT_BACKUP_COUNT);
        if backup_count == 0 {
            let _ = fs::remove_file(&self.path);
            return;
        }

        // path.(N-1) -> path.N, ..., path -> path.1; the oldest is overwritten.
        for idx in (1..backup_count).rev() {
            let from = self.backup_path(idx);
            if from.exists() {
                let _ = fs::rename(&from, self.backup_path(idx + 1));
            }
        }
        let _ = fs::rename(&self.path, self.backup_path(1));
    }

    #[allow(non_snake_case)]
    pub fn QiFPath(&self) -> &Path {
        &self.path
    }
}

impl QiCLogHandler for QiCFileHandler {
    fn handle(&self, record: &QiCLogRecord) {
        let _guard = match self.file.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.rotate_if_needed();

        let line = if self.json {
            QiCJsonFormatter::QiFFormat(record)
        } else {
            QiCTextFormatter::QiFFormat(record)
        };
        if let Some(parent) = self.path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{}", line);
        }
    }
}
