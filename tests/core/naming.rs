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

use proptest::prelude::*;
use qie::naming::QI_PREVIEW_GROUP_NAME;
use qie::{
    QiCDataset, QiCFilenameSynthesizer, QiCGroupKey, QiCNameMode, QiCSelection, QiCSplitMode,
    QiCValue, QiFSanitize,
};

fn dataset(columns: &[&str]) -> QiCDataset {
    QiCDataset::QiFNew(
        columns.iter().map(|c| c.to_string()).collect(),
        vec![vec![QiCValue::Null; columns.len()]],
    )
    .unwrap()
}

fn key(values: &[&str]) -> QiCGroupKey {
    QiCGroupKey(values.iter().map(|v| v.to_string()).collect())
}

#[test]
fn QiFTSanitizeMapsSeparatorsToSingleUnderscore() {
    assert_eq!(QiFSanitize("A/B"), "A_B");
    assert_eq!(QiFSanitize("A_B"), "A_B");
    assert_eq!(QiFSanitize("a <> b"), "a_b");
    assert_eq!(QiFSanitize("__foo"), "_foo");
}

#[test]
fn QiFTSanitizeStripsDotsAndFallsBackToEmpty() {
    assert_eq!(QiFSanitize("..report.."), "report");
    assert_eq!(QiFSanitize(""), "empty");
    assert_eq!(QiFSanitize("..."), "empty");
}

#[test]
fn QiFTSanitizeTruncatesToHundredCharacters() {
    let long = "x".repeat(250);
    assert_eq!(QiFSanitize(&long).chars().count(), 100);
}

#[test]
fn QiFTSingleModeUsesSanitizedValue() {
    let ds = dataset(&["Region", "Sales"]);
    let selection = QiCSelection::QiFNew(&ds, &["Region"]).unwrap();
    assert_eq!(selection.QiFMode(), QiCSplitMode::Single);

    let mut names = QiCFilenameSynthesizer::QiFNew(&selection);
    assert_eq!(names.QiFSynthesize(&key(&["North/East"]), QiCNameMode::Export), "North_East");
}

#[test]
fn QiFTSingleColumnDatasetStaysSingleMode() {
    let ds = dataset(&["Region"]);
    let selection = QiCSelection::QiFNew(&ds, &["Region"]).unwrap();
    assert_eq!(selection.QiFMode(), QiCSplitMode::Single);
    assert_eq!(selection.QiFDirectoryName(), "Region");
}

#[test]
fn QiFTCombinationModeJoinsPairsInSelectionOrder() {
    let ds = dataset(&["Region", "Year", "Sales"]);
    let selection = QiCSelection::QiFNew(&ds, &["Year", "Region"]).unwrap();
    assert_eq!(selection.QiFMode(), QiCSplitMode::Combination);
    assert_eq!(selection.QiFDirectoryName(), "Year__Region");

    let mut names = QiCFilenameSynthesizer::QiFNew(&selection);
    assert_eq!(
        names.QiFSynthesize(&key(&["2024", "East"]), QiCNameMode::Export),
        "Year_2024__Region_East"
    );
}

#[test]
fn QiFTAllColumnsCounterIsRunScoped() {
    let ds = dataset(&["Region", "Sales"]);
    let selection = QiCSelection::QiFAll(&ds).unwrap();
    assert_eq!(selection.QiFMode(), QiCSplitMode::AllColumns);
    assert_eq!(selection.QiFDirectoryName(), "all_columns");

    let k = key(&["East", "10"]);
    let mut first_run = QiCFilenameSynthesizer::QiFNew(&selection);
    assert_eq!(first_run.QiFSynthesize(&k, QiCNameMode::Preview), QI_PREVIEW_GROUP_NAME);
    assert_eq!(first_run.QiFSynthesize(&k, QiCNameMode::Export), "Group_001");
    assert_eq!(first_run.QiFSynthesize(&k, QiCNameMode::Export), "Group_002");

    let mut second_run = QiCFilenameSynthesizer::QiFNew(&selection);
    assert_eq!(second_run.QiFSynthesize(&k, QiCNameMode::Export), "Group_001");
}

#[test]
fn QiFTDirectoryNameIsCappedAtEightyCharacters() {
    let a = "a".repeat(60);
    let b = "b".repeat(60);
    let ds = dataset(&[a.as_str(), b.as_str(), "c"]);
    let selection = QiCSelection::QiFNew(&ds, &[a.as_str(), b.as_str()]).unwrap();
    assert_eq!(selection.QiFDirectoryName().chars().count(), 80);
}

proptest! {
    #[test]
    fn QiFTSanitizeIsIdempotent(input in ".{0,160}") {
        let once = QiFSanitize(&input);
        prop_assert_eq!(QiFSanitize(&once), once.clone());
    }

    #[test]
    fn QiFTSanitizeOutputIsFilesystemSafe(input in ".{0,160}") {
        let out = QiFSanitize(&input);
        prop_assert!(!out.is_empty());
        prop_assert!(out.chars().count() <= 100);
        prop_assert!(!out.contains(|c: char| "<>:\"/\\|?* ".contains(c)));
        prop_assert!(!out.contains("__"));
    }
}
