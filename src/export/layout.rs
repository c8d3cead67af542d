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

//! # Output Layout
//!
//! Collision-free paths for the run directory, group files and the archive.
//! A taken name `base` is retried as `base_1`, `base_2`, … until free.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::errors::{Result, QiError};

/// Creates `root/name`, or the first free `root/name_N`, and returns it.
///
/// Creation and the existence check are one step, so a directory that
/// appears concurrently is skipped rather than reused.
#[allow(non_snake_case)]
pub fn QiFCreateUniqueDir(root: &Path, name: &str) -> Result<PathBuf> {
    let mut candidate = root.join(name);
    let mut suffix = 1usize;
    loop {
        match fs::create_dir(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                candidate = root.join(format!("{}_{}", name, suffix));
                suffix += 1;
            }
            Err(err) => {
                return Err(QiError::destination(format!(
                    "cannot create output directory {}: {}",
                    candidate.display(),
                    err
                )))
            }
        }
    }
}

/// First path `dir/stem[_N]extension` for which `taken` is false.
#[allow(non_snake_case)]
pub fn QiFNextFreePath<F>(dir: &Path, stem: &str, extension: &str, taken: F) -> PathBuf
where
    F: Fn(&Path) -> bool,
{
    let mut candidate = dir.join(format!("{}{}", stem, extension));
    let mut suffix = 1usize;
    while taken(&candidate) {
        candidate = dir.join(format!("{}_{}{}", stem, suffix, extension));
        suffix += 1;
    }
    candidate
}

/// Hands out group file paths inside one output directory.
///
/// A path counts as taken if it exists on disk or was already handed out
/// in this run, so two groups whose names sanitize identically never
/// share a file even before the first one is written.
#[derive(Debug)]
pub struct QiCFileAllocator {
    dir: PathBuf,
    extension: String,
    reserved: HashSet<PathBuf>,
}

impl QiCFileAllocator {
    #[allow(non_snake_case)]
    pub fn QiFNew(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
            reserved: HashSet::new(),
        }
    }

    #[allow(non_snake_case)]
    pub fn QiFAllocate(&mut self, stem: &str) -> PathBuf {
        let reserved = &self.reserved;
        let path = QiFNextFreePath(&self.dir, stem, &self.extension, |p| {
            p.exists() || reserved.contains(p)
        });
        self.reserved.insert(path.clone());
        path
    }
}
