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

use std::sync::OnceLock;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::log::config::QiCLogConfig;
use crate::log::handlers::{QiCConsoleHandler, QiCFileHandler, QiCLogHandler};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QiCLogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Success,
}

impl QiCLogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            QiCLogLevel::Debug => "DEBUG",
            QiCLogLevel::Info => "INFO",
            QiCLogLevel::Warning => "WARNING",
            QiCLogLevel::Error => "ERROR",
            QiCLogLevel::Success => "SUCCESS",
        }
    }

    /// Severity rank used for threshold filtering. SUCCESS sits between INFO and WARNING.
    #[allow(non_snake_case)]
    pub fn QiFValue(&self) -> i32 {
        match self {
            QiCLogLevel::Debug => 10,
            QiCLogLevel::Info => 20,
            QiCLogLevel::Success => 25,
            QiCLogLevel::Warning => 30,
            QiCLogLevel::Error => 40,
        }
    }

    /// Parses a level name; unknown names map to INFO.
    #[allow(non_snake_case)]
    pub fn QiFParse(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" => QiCLogLevel::Debug,
            "WARNING" | "WARN" => QiCLogLevel::Warning,
            "ERROR" => QiCLogLevel::Error,
            "SUCCESS" => QiCLogLevel::Success,
            _ => QiCLogLevel::Info,
        }
    }
}

#[derive(Clone, Debug)]
pub struct QiCLogRecord {
    pub level: QiCLogLevel,
    pub event: String,
    pub message: String,
    pub fields: Map<String, Value>,
    pub timestamp: DateTime<Local>,
}

impl QiCLogRecord {
    #[allow(non_snake_case)]
    pub fn QiFNew(level: QiCLogLevel, event: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            event: event.into(),
            message: message.into(),
            fields: Map::new(),
            timestamp: Local::now(),
        }
    }

    #[allow(non_snake_case)]
    pub fn QiFToJson(&self) -> Value {
        let mut data = Map::new();
        data.insert("level".into(), json!(self.level.as_str()));
        data.insert("event".into(), json!(self.event));
        data.insert("message".into(), json!(self.message));
        data.insert("timestamp".into(), json!(self.timestamp.to_rfc3339()));
        data.insert("fields".into(), Value::Object(self.fields.clone()));
        Value::Object(data)
    }
}

struct QiCLoggerInner {
    config: QiCLogConfig,
    handlers: Vec<Box<dyn QiCLogHandler + Send + Sync>>,
}

impl QiCLoggerInner {
    fn emit(&self, record: QiCLogRecord) {
        if !self.config.QiFShouldLog(&record) {
            return;
        }
        for h in &self.handlers {
            h.handle(&record);
        }
    }
}

static LOGGER: OnceLock<QiCLoggerInner> = OnceLock::new();

/// Process-wide structured logger.
#[derive(Debug, Default)]
pub struct QiCLogger;

impl QiCLogger {
    /// Initialize the global logger with a configuration. Safe to call multiple
    /// times; the first call wins. Returns whether this call installed it.
    #[allow(non_snake_case)]
    pub fn QiFInit(config: QiCLogConfig) -> bool {
        let mut installed = false;
        let _ = LOGGER.get_or_init(|| {
            installed = true;
            let mut handlers: Vec<Box<dyn QiCLogHandler + Send + Sync>> = Vec::new();
            if config.console_enabled {
                handlers.push(Box::new(QiCConsoleHandler::QiFNew(config.json_format_console)));
            }
            if config.file_enabled {
                if let Some(path) = &config.file_path {
                    handlers.push(Box::new(QiCFileHandler::QiFNew(
                        path.clone(),
                        config.json_format_file,
                        config.rotate_when.clone(),
                        config.max_bytes,
                        config.backup_count,
                    )));
                }
            }
            QiCLoggerInner { config, handlers }
        });
        installed
    }

    #[allow(non_snake_case)]
    pub fn QiFIsInitialized() -> bool {
        LOGGER.get().is_some()
    }

    /// Emit a structured log event. A no-op until [`QiCLogger::QiFInit`] ran.
    #[allow(non_snake_case)]
    pub fn QiFEvent<L, S>(level: QiCLogLevel, event: S, message: S, fields: L)
    where
        L: IntoIterator<Item = (String, Value)>,
        S: Into<String>,
    {
        if let Some(inner) = LOGGER.get() {
            let mut record = QiCLogRecord::QiFNew(level, event, message);
            record.fields.extend(fields);
            inner.emit(record);
        }
    }

    #[allow(non_snake_case)]
    pub fn QiFLog(level: QiCLogLevel, message: impl Into<String>) {
        Self::QiFEvent(level, "qie".to_string(), message.into(), std::iter::empty());
    }
}

/// Forwards records from the `log` facade into [`QiCLogger`].
pub struct QiCLogBridge;

static BRIDGE: QiCLogBridge = QiCLogBridge;

impl QiCLogBridge {
    /// Installs the bridge as the `log` backend. Fails if another backend is set.
    #[allow(non_snake_case)]
    pub fn QiFInstall(level: QiCLogLevel) -> bool {
        let filter = match level {
            QiCLogLevel::Debug => ::log::LevelFilter::Debug,
            QiCLogLevel::Info | QiCLogLevel::Success => ::log::LevelFilter::Info,
            QiCLogLevel::Warning => ::log::LevelFilter::Warn,
            QiCLogLevel::Error => ::log::LevelFilter::Error,
        };
        match ::log::set_logger(&BRIDGE) {
            Ok(()) => {
                ::log::set_max_level(filter);
                true
            }
            Err(_) => false,
        }
    }
}

impl ::log::Log for QiCLogBridge {
    fn enabled(&self, metadata: &::log::Metadata<'_>) -> bool {
        metadata.level() <= ::log::max_level()
    }

    fn log(&self, record: &::log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = match record.level() {
            ::log::Level::Error => QiCLogLevel::Error,
            ::log::Level::Warn => QiCLogLevel::Warning,
            ::log::Level::Info => QiCLogLevel::Info,
            ::log::Level::Debug | ::log::Level::Trace => QiCLogLevel::Debug,
        };
        QiCLogger::QiFEvent(
            level,
            record.target().to_string(),
            record.args().to_string(),
            std::iter::empty(),
        );
    }

    fn flush(&self) {}
}
