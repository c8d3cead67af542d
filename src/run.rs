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

//! # Split Runs
//!
//! A [`QiCSession`] owns one loaded dataset and executes split runs over it,
//! one at a time. A run walks
//! `Idle → Normalizing → Grouping → Exporting[i]* → Archiving → Done`
//! and lands in `Failed` on any unrecoverable error. Per-group write errors
//! are recorded and the run moves on.
//!
//! ## Progress checkpoints
//!
//! | Percent | Step |
//! |---------|------|
//! | 5 | preparing data |
//! | 10 | computing groups |
//! | 15 → 80 | one step per exported group |
//! | 82 | creating the archive |
//! | 100 | finished, successfully or not |

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};

use crate::archive::{QiCArchiveInfo, QiCArchiver};
use crate::dataset::QiCDataset;
use crate::errors::{Result, QiError};
use crate::export::{
    QiCExportFailure, QiCExportRecord, QiCFileAllocator, QiCOutputFormat, QiCTableWriter,
    QiFCreateUniqueDir,
};
use crate::group::QiCGrouper;
use crate::ingest::QiCTableReader;
use crate::naming::{QiCFilenameSynthesizer, QiCNameMode};
use crate::normalize::QiCNormalizer;
use crate::progress::{QiCEventSink, QiCProgressReporter, QiFExportPercent};
use crate::selection::{QiCSelection, QiCSplitMode};

/// Number of dataset rows included in a preview.
pub const QI_PREVIEW_ROWS: usize = 30;

/// Default number of planned filenames listed in a preview.
pub const QI_PREVIEW_SAMPLES: usize = 10;

/// What to split on and where to put the result.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QiCSplitRequest {
    /// Grouping columns, in order.
    pub columns: Vec<String>,
    pub format: QiCOutputFormat,
    /// Existing, writable folder receiving the output directory and archive.
    pub output_root: PathBuf,
}

impl QiCSplitRequest {
    #[allow(non_snake_case)]
    pub fn QiFNew<I, S>(columns: I, format: QiCOutputFormat, output_root: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            format,
            output_root: output_root.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QiCRunState {
    Idle,
    Normalizing,
    Grouping,
    /// Writing group `index` (1-based) of `total`.
    Exporting { index: usize, total: usize },
    Archiving,
    Done,
    Failed,
}

/// Outcome of a completed run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QiCRunSummary {
    pub mode: QiCSplitMode,
    pub total_groups: usize,
    /// `None` when there was nothing to export.
    pub output_dir: Option<PathBuf>,
    pub exported: Vec<QiCExportRecord>,
    pub failures: Vec<QiCExportFailure>,
    pub archive: Option<QiCArchiveInfo>,
    /// Set when the run stopped early on request.
    pub cancelled: bool,
    pub state: QiCRunState,
}

impl QiCRunSummary {
    fn empty(mode: QiCSplitMode) -> Self {
        Self {
            mode,
            total_groups: 0,
            output_dir: None,
            exported: Vec::new(),
            failures: Vec::new(),
            archive: None,
            cancelled: false,
            state: QiCRunState::Idle,
        }
    }

    #[allow(non_snake_case)]
    pub fn QiFExportedCount(&self) -> usize {
        self.exported.len()
    }

    #[allow(non_snake_case)]
    pub fn QiFFailureCount(&self) -> usize {
        self.failures.len()
    }

    #[allow(non_snake_case)]
    pub fn QiFExportedRows(&self) -> usize {
        self.exported.iter().map(|r| r.rows).sum()
    }
}

/// Dry-run view of a split: nothing is written.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QiCPreview {
    pub mode: QiCSplitMode,
    pub description: String,
    pub total_rows: usize,
    pub group_count: usize,
    /// Planned filenames, extension included, for the first groups.
    pub sample_files: Vec<String>,
    /// Groups not listed in `sample_files`.
    pub remaining: usize,
    /// Selected column names, the header of `sample_rows`.
    pub columns: Vec<String>,
    pub sample_rows: Vec<Vec<String>>,
}

/// Cooperative cancellation, observed between groups.
#[derive(Clone, Debug, Default)]
pub struct QiCCancelToken(Arc<AtomicBool>);

impl QiCCancelToken {
    #[allow(non_snake_case)]
    pub fn QiFNew() -> Self {
        Self::default()
    }

    #[allow(non_snake_case)]
    pub fn QiFCancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[allow(non_snake_case)]
    pub fn QiFIsCancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Clears the session's active flag when the run ends, however it ends.
struct QiCActiveGuard(Arc<AtomicBool>);

impl QiCActiveGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| QiError::Busy)?;
        Ok(Self(Arc::clone(flag)))
    }
}

impl Drop for QiCActiveGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A loaded dataset plus the single-active-run guard.
#[derive(Clone, Debug)]
pub struct QiCSession {
    dataset: Arc<QiCDataset>,
    active: Arc<AtomicBool>,
}

impl QiCSession {
    #[allow(non_snake_case)]
    pub fn QiFNew(dataset: QiCDataset) -> Self {
        Self {
            dataset: Arc::new(dataset),
            active: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Reads a CSV or workbook file into a new session.
    #[allow(non_snake_case)]
    pub fn QiFLoad(path: impl AsRef<Path>) -> Result<Self> {
        let dataset = QiCTableReader::QiFNew().QiFReadPath(path.as_ref())?;
        Ok(Self::QiFNew(dataset))
    }

    #[allow(non_snake_case)]
    pub fn QiFDataset(&self) -> &QiCDataset {
        &self.dataset
    }

    #[allow(non_snake_case)]
    pub fn QiFIsRunning(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Plans a split without touching the filesystem.
    #[allow(non_snake_case)]
    pub fn QiFPreview<S: AsRef<str>>(
        &self,
        columns: &[S],
        format: QiCOutputFormat,
        sample_count: usize,
    ) -> Result<QiCPreview> {
        let dataset = self.dataset.as_ref();
        let selection = QiCSelection::QiFNew(dataset, columns)?;
        let normalized = QiCNormalizer::QiFNormalize(dataset, &selection);
        let grouping = QiCGrouper::QiFGroup(&normalized.dataset, &selection);

        let mut names = QiCFilenameSynthesizer::QiFNew(&selection);
        let sample_files: Vec<String> = grouping
            .iter()
            .take(sample_count)
            .map(|g| {
                format!(
                    "{}{}",
                    names.QiFSynthesize(&g.key, QiCNameMode::Preview),
                    format.QiFExtension()
                )
            })
            .collect();

        let sample_rows = dataset
            .QiFRows()
            .iter()
            .take(QI_PREVIEW_ROWS)
            .map(|row| {
                selection
                    .QiFIndices()
                    .iter()
                    .map(|&i| row[i].QiFDisplay())
                    .collect()
            })
            .collect();

        Ok(QiCPreview {
            mode: selection.QiFMode(),
            description: selection.QiFMode().QiFDescription().to_string(),
            total_rows: dataset.QiFRowCount(),
            group_count: grouping.QiFLen(),
            remaining: grouping.QiFLen() - sample_files.len(),
            sample_files,
            columns: selection.QiFColumns().to_vec(),
            sample_rows,
        })
    }

    /// Runs a split on the calling thread.
    ///
    /// Returns [`QiError::Busy`] if another run of this session is active.
    #[allow(non_snake_case)]
    pub fn QiFRun(
        &self,
        request: &QiCSplitRequest,
        cancel: &QiCCancelToken,
        sink: Option<QiCEventSink>,
    ) -> Result<QiCRunSummary> {
        let _guard = QiCActiveGuard::acquire(&self.active)?;
        execute(&self.dataset, request, cancel, sink)
    }

    /// Runs a split on a background thread.
    ///
    /// The session is marked busy before the thread starts, so a second call
    /// made right after this one returns fails with [`QiError::Busy`].
    #[allow(non_snake_case)]
    pub fn QiFSpawn(
        &self,
        request: QiCSplitRequest,
        cancel: QiCCancelToken,
        sink: Option<QiCEventSink>,
    ) -> Result<JoinHandle<Result<QiCRunSummary>>> {
        let guard = QiCActiveGuard::acquire(&self.active)?;
        let dataset = Arc::clone(&self.dataset);
        let handle = thread::Builder::new()
            .name("qie-split".to_string())
            .spawn(move || {
                let _guard = guard;
                execute(&dataset, &request, &cancel, sink)
            })?;
        Ok(handle)
    }
}

fn execute(
    dataset: &QiCDataset,
    request: &QiCSplitRequest,
    cancel: &QiCCancelToken,
    sink: Option<QiCEventSink>,
) -> Result<QiCRunSummary> {
    let mut reporter = QiCProgressReporter::QiFNew(sink);
    reporter.QiFState(QiCRunState::Idle);

    match split(dataset, request, cancel, &mut reporter) {
        Ok(summary) => Ok(summary),
        Err(err) => {
            reporter.QiFError(format!("Split operation failed: {}", err));
            reporter.QiFProgress(100, format!("Split failed: {}", err));
            reporter.QiFState(QiCRunState::Failed);
            Err(err)
        }
    }
}

fn split(
    dataset: &QiCDataset,
    request: &QiCSplitRequest,
    cancel: &QiCCancelToken,
    reporter: &mut QiCProgressReporter,
) -> Result<QiCRunSummary> {
    reporter.QiFProgress(5, "Preparing data...");
    let selection = QiCSelection::QiFNew(dataset, request.columns.as_slice())?;
    let root = check_destination(&request.output_root)?;
    let mut summary = QiCRunSummary::empty(selection.QiFMode());

    reporter.QiFState(QiCRunState::Normalizing);
    let normalized = QiCNormalizer::QiFNormalize(dataset, &selection);
    for column in normalized.QiFFallbackColumns() {
        reporter.QiFWarning(format!(
            "Column '{}' could not be converted to text; its values are treated as Unknown",
            column
        ));
    }

    reporter.QiFProgress(10, "Computing groups...");
    reporter.QiFState(QiCRunState::Grouping);
    let grouping = QiCGrouper::QiFGroup(&normalized.dataset, &selection);
    if grouping.QiFIsEmpty() {
        reporter.QiFWarning("No groups found to export.");
        reporter.QiFProgress(100, "No groups to export");
        reporter.QiFState(QiCRunState::Done);
        summary.state = QiCRunState::Done;
        return Ok(summary);
    }

    let total = grouping.QiFLen();
    summary.total_groups = total;
    reporter.QiFInfo(format!(
        "Split mode: {} on {} ({} groups)",
        selection.QiFMode().QiFDescription(),
        selection.QiFColumns().join(", "),
        total
    ));

    let output_dir = QiFCreateUniqueDir(&root, &selection.QiFDirectoryName())?;
    reporter.QiFInfo(format!("Output directory: {}", output_dir.display()));
    summary.output_dir = Some(output_dir.clone());
    reporter.QiFProgress(15, format!("Exporting {} groups...", total));

    let writer = QiCTableWriter::QiFNew(request.format);
    let mut files = QiCFileAllocator::QiFNew(&output_dir, request.format.QiFExtension());
    let mut names = QiCFilenameSynthesizer::QiFNew(&selection);

    for (i, group) in grouping.iter().enumerate() {
        if cancel.QiFIsCancelled() {
            reporter.QiFWarning(format!("Split cancelled after {} of {} groups", i, total));
            summary.cancelled = true;
            break;
        }
        reporter.QiFState(QiCRunState::Exporting {
            index: i + 1,
            total,
        });

        let name = names.QiFSynthesize(&group.key, QiCNameMode::Export);
        let path = files.QiFAllocate(&name);
        match writer.QiFWriteRows(&normalized.dataset, &group.rows, &path) {
            Ok(stats) => {
                let record = QiCExportRecord {
                    name,
                    path,
                    rows: stats.rows_written,
                };
                reporter.QiFInfo(format!(
                    "Exported: {} ({} rows)",
                    record.QiFFileName(),
                    record.rows
                ));
                summary.exported.push(record);
            }
            Err(err) => {
                let file = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| name.clone());
                let err = QiError::export(file, err.to_string());
                reporter.QiFError(format!("Error exporting group {}: {}", i + 1, err));
                summary.failures.push(QiCExportFailure {
                    group: i + 1,
                    name: Some(name),
                    message: err.to_string(),
                });
            }
        }
        reporter.QiFProgress(
            QiFExportPercent(i + 1, total),
            format!("Exported {}/{} groups", i + 1, total),
        );
    }

    if !summary.failures.is_empty() {
        reporter.QiFWarning(format!("Completed with {} errors", summary.failures.len()));
    }

    reporter.QiFProgress(82, "Creating ZIP archive...");
    reporter.QiFState(QiCRunState::Archiving);
    let exported: Vec<PathBuf> = summary.exported.iter().map(|r| r.path.clone()).collect();
    let archive = QiCArchiver::QiFNew().QiFCreate(&root, &output_dir, &exported)?;
    reporter.QiFSuccess(format!(
        "ZIP archive created: {} ({:.2} MB)",
        archive.QiFFileName(),
        archive.QiFSizeMb()
    ));
    reporter.QiFSuccess(format!("Total files exported: {}", summary.exported.len()));
    summary.archive = Some(archive);

    let message = if summary.cancelled {
        "Split cancelled"
    } else if summary.failures.is_empty() {
        "Split completed"
    } else {
        "Split completed with errors"
    };
    reporter.QiFProgress(100, message);
    reporter.QiFState(QiCRunState::Done);
    summary.state = QiCRunState::Done;
    Ok(summary)
}

/// Confirms `root` is an existing, writable directory and returns its canonical form.
fn check_destination(root: &Path) -> Result<PathBuf> {
    if !root.exists() {
        return Err(QiError::destination(format!(
            "Output folder does not exist: {}",
            root.display()
        )));
    }
    if !root.is_dir() {
        return Err(QiError::destination(format!(
            "Output path is not a folder: {}",
            root.display()
        )));
    }
    tempfile::Builder::new()
        .prefix(".qie-probe")
        .tempfile_in(root)
        .map_err(|e| {
            QiError::destination(format!(
                "Output folder is not writable: {} ({})",
                root.display(),
                e
            ))
        })?;
    root.canonicalize().map_err(|e| {
        QiError::destination(format!("Cannot resolve {}: {}", root.display(), e))
    })
}
