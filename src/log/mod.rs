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

//! # Logging Module
//!
//! Leveled run logging: DEBUG, INFO, WARNING, ERROR and SUCCESS records go to
//! a size-rotated text log file and to the console.
//!
//! ## Module Components
//!
//! - **Core** ([core.rs](core/index.html)): levels, records, the global logger and the `log` bridge
//! - **Config** ([config.rs](config/index.html)): serde config with builder and JSON loading
//! - **Handlers** ([handlers.rs](handlers/index.html)): console and rotating file sinks
//! - **Formatters** ([formatters.rs](formatters/index.html)): text and JSON line formats
//!
//! ## Usage
//!
//! ```rust
//! use qie::log::{QiCLogConfigBuilder, QiCLogger, QiCLogLevel};
//!
//! QiCLogger::QiFInit(QiCLogConfigBuilder::QiFNew().QiFFile("/tmp/qie.log").QiFBuild());
//! QiCLogger::QiFLog(QiCLogLevel::Success, "Total files exported: 3");
//! ```

pub mod config;
pub mod core;
pub mod formatters;
pub mod handlers;

pub use self::config::{
    QiCLogConfig, QiCLogConfigBuilder, QiFDefaultLogPath, QI_DEFAULT_BACKUP_COUNT,
    QI_DEFAULT_MAX_BYTES,
};
pub use self::core::{QiCLogBridge, QiCLogLevel, QiCLogRecord, QiCLogger};
pub use self::formatters::{QiCJsonFormatter, QiCTextFormatter};
pub use self::handlers::{QiCConsoleHandler, QiCFileHandler, QiCLogHandler};
