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

//! # Archive Module
//!
//! Bundles the files of a run into one deflated ZIP placed next to the
//! output directory, e.g. `root/Region.zip` holding `Region/East.csv`.

use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::errors::{Result, QiError};
use crate::export::QiFNextFreePath;
use crate::sanitize::QiFSanitize;

/// The archive written at the end of a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QiCArchiveInfo {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub entries: usize,
}

impl QiCArchiveInfo {
    #[allow(non_snake_case)]
    pub fn QiFSizeMb(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0)
    }

    #[allow(non_snake_case)]
    pub fn QiFFileName(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug)]
pub struct QiCArchiver {
    compression: CompressionMethod,
}

impl Default for QiCArchiver {
    fn default() -> Self {
        Self {
            compression: CompressionMethod::Deflated,
        }
    }
}

impl QiCArchiver {
    #[allow(non_snake_case)]
    pub fn QiFNew() -> Self {
        Self::default()
    }

    /// Writes every file in `files` into `root/<output dir name>.zip`.
    ///
    /// Entry names are the file paths relative to `root`, joined with `/`.
    /// On failure the partial archive is removed; the exported files stay.
    #[allow(non_snake_case)]
    pub fn QiFCreate(&self, root: &Path, output_dir: &Path, files: &[PathBuf]) -> Result<QiCArchiveInfo> {
        let stem = output_dir
            .file_name()
            .map(|n| QiFSanitize(&n.to_string_lossy()))
            .unwrap_or_else(|| QiFSanitize(""));

        let (path, file) = create_archive_file(root, &stem)?;
        match self.write_entries(file, root, files) {
            Ok(entries) => {
                let size_bytes = fs::metadata(&path)
                    .map_err(|e| QiError::archive(format!("cannot stat {}: {}", path.display(), e)))?
                    .len();
                Ok(QiCArchiveInfo {
                    path,
                    size_bytes,
                    entries,
                })
            }
            Err(err) => {
                let _ = fs::remove_file(&path);
                Err(err)
            }
        }
    }

    fn write_entries(&self, file: File, root: &Path, files: &[PathBuf]) -> Result<usize> {
        let mut zip = ZipWriter::new(file);
        let options = FileOptions::default().compression_method(self.compression);

        for path in files {
            let name = entry_name(root, path)?;
            zip.start_file(name.as_str(), options)
                .map_err(|e| QiError::archive(format!("cannot add {}: {}", name, e)))?;
            let mut source = File::open(path)
                .map_err(|e| QiError::archive(format!("cannot read {}: {}", path.display(), e)))?;
            io::copy(&mut source, &mut zip)
                .map_err(|e| QiError::archive(format!("cannot write {}: {}", name, e)))?;
        }

        zip.finish()
            .map_err(|e| QiError::archive(format!("cannot finish archive: {}", e)))?;
        Ok(files.len())
    }
}

fn create_archive_file(root: &Path, stem: &str) -> Result<(PathBuf, File)> {
    loop {
        let path = QiFNextFreePath(root, stem, ".zip", |p| p.exists());
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
            Err(err) => {
                return Err(QiError::archive(format!(
                    "cannot create {}: {}",
                    path.display(),
                    err
                )))
            }
        }
    }
}

fn entry_name(root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(root).map_err(|_| {
        QiError::archive(format!(
            "{} is outside the output root {}",
            path.display(),
            root.display()
        ))
    })?;
    Ok(relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/"))
}
