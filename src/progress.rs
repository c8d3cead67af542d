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

//! # Progress Reporting
//!
//! Runs talk to their caller through a plain callback. The engine invokes the
//! sink from the run's own thread; marshaling onto a UI loop is the caller's job.

use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};

use crate::log::{QiCLogLevel, QiCLogger};
use crate::run::QiCRunState;

/// One event emitted by a run.
#[derive(Clone, Debug, PartialEq)]
pub enum QiCRunEvent {
    /// Completion percentage, non-decreasing within a run and ending at 100.
    Progress { percent: u8, message: String },
    Log { level: QiCLogLevel, message: String },
    State(QiCRunState),
}

/// Callback receiving run events.
pub type QiCEventSink = Arc<dyn Fn(&QiCRunEvent) + Send + Sync>;

/// A sink that forwards every event into a channel, plus its receiving end.
#[allow(non_snake_case)]
pub fn QiFChannelSink() -> (QiCEventSink, Receiver<QiCRunEvent>) {
    let (tx, rx) = mpsc::channel();
    let tx = Mutex::new(tx);
    let sink: QiCEventSink = Arc::new(move |event: &QiCRunEvent| {
        if let Ok(tx) = tx.lock() {
            let _ = tx.send(event.clone());
        }
    });
    (sink, rx)
}

/// Per-run reporter. Clamps progress so it never goes backwards and mirrors
/// log events into the global logger.
pub struct QiCProgressReporter {
    sink: Option<QiCEventSink>,
    last_percent: u8,
}

impl QiCProgressReporter {
    #[allow(non_snake_case)]
    pub fn QiFNew(sink: Option<QiCEventSink>) -> Self {
        Self {
            sink,
            last_percent: 0,
        }
    }

    #[allow(non_snake_case)]
    pub fn QiFProgress(&mut self, percent: u8, message: impl Into<String>) {
        let percent = percent.min(100).max(self.last_percent);
        self.last_percent = percent;
        self.emit(QiCRunEvent::Progress {
            percent,
            message: message.into(),
        });
    }

    #[allow(non_snake_case)]
    pub fn QiFLog(&self, level: QiCLogLevel, message: impl Into<String>) {
        let message = message.into();
        QiCLogger::QiFEvent(level, "split".to_string(), message.clone(), std::iter::empty());
        self.emit(QiCRunEvent::Log { level, message });
    }

    #[allow(non_snake_case)]
    pub fn QiFInfo(&self, message: impl Into<String>) {
        self.QiFLog(QiCLogLevel::Info, message);
    }

    #[allow(non_snake_case)]
    pub fn QiFWarning(&self, message: impl Into<String>) {
        self.QiFLog(QiCLogLevel::Warning, message);
    }

    #[allow(non_snake_case)]
    pub fn QiFError(&self, message: impl Into<String>) {
        self.QiFLog(QiCLogLevel::Error, message);
    }

    #[allow(non_snake_case)]
    pub fn QiFSuccess(&self, message: impl Into<String>) {
        self.QiFLog(QiCLogLevel::Success, message);
    }

    #[allow(non_snake_case)]
    pub fn QiFState(&self, state: QiCRunState) {
        log::debug!("run state -> {:?}", state);
        self.emit(QiCRunEvent::State(state));
    }

    fn emit(&self, event: QiCRunEvent) {
        if let Some(sink) = &self.sink {
            sink(&event);
        }
    }
}

/// Percentage after `done` of `total` groups: 15 at the start, 80 when all are written.
#[allow(non_snake_case)]
pub fn QiFExportPercent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 80;
    }
    (15 + 65 * done.min(total) / total) as u8
}
