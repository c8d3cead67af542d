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

use crate::log::core::QiCLogRecord;

pub struct QiCJsonFormatter;

impl QiCJsonFormatter {
    #[allow(non_snake_case)]
    pub fn QiFFormat(record: &QiCLogRecord) -> String {
        record.QiFToJson().to_string()
    }
}

/// `[YYYY-MM-DD HH:MM:SS] [LEVEL] message`
pub struct QiCTextFormatter;

impl QiCTextFormatter {
    #[allow(non_snake_case)]
    pub fn QiFFormat(record: &QiCLogRecord) -> String {
        format!(
            "[{}] [{}] {}",
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            record.level.as_str(),
            record.message
        )
    }
}
