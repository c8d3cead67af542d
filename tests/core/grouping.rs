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

use std::collections::HashSet;

use proptest::prelude::*;
use qie::{QiCDataset, QiCGrouper, QiCNormalizer, QiCSelection, QiCValue, QI_PLACEHOLDER};

fn table(rows: Vec<Vec<QiCValue>>) -> QiCDataset {
    QiCDataset::QiFNew(vec!["Region".into(), "Year".into(), "Sales".into()], rows).unwrap()
}

fn text(s: &str) -> QiCValue {
    QiCValue::Text(s.to_string())
}

#[test]
fn QiFTNullLikeValuesShareUnknownGroup() {
    let ds = table(vec![
        vec![QiCValue::Null, QiCValue::Int(2024), QiCValue::Int(1)],
        vec![text(""), QiCValue::Int(2024), QiCValue::Int(2)],
        vec![text("NaN"), QiCValue::Int(2024), QiCValue::Int(3)],
        vec![text("East"), QiCValue::Int(2024), QiCValue::Int(4)],
    ]);
    let selection = QiCSelection::QiFNew(&ds, &["Region"]).unwrap();
    let normalized = QiCNormalizer::QiFNormalize(&ds, &selection);
    let grouping = QiCGrouper::QiFGroup(&normalized.dataset, &selection);

    let unknown = grouping
        .iter()
        .find(|g| g.key.QiFValues() == [QI_PLACEHOLDER])
        .expect("Unknown group");
    assert_eq!(unknown.rows, vec![0, 1, 2]);
    assert_eq!(grouping.QiFLen(), 2);
}

#[test]
fn QiFTNormalizationLeavesSourceAndOtherColumnsAlone() {
    let ds = table(vec![vec![QiCValue::Null, QiCValue::Float(2.5), QiCValue::Int(1)]]);
    let selection = QiCSelection::QiFNew(&ds, &["Region"]).unwrap();
    let normalized = QiCNormalizer::QiFNormalize(&ds, &selection);

    assert_eq!(ds.QiFRows()[0][0], QiCValue::Null);
    assert_eq!(normalized.dataset.QiFRows()[0][0], text("Unknown"));
    assert_eq!(normalized.dataset.QiFRows()[0][1], QiCValue::Float(2.5));
}

#[test]
fn QiFTCombinationGroupsByValueTuple() {
    let ds = table(vec![
        vec![text("East"), QiCValue::Int(2024), QiCValue::Int(1)],
        vec![text("East"), QiCValue::Int(2025), QiCValue::Int(2)],
        vec![text("East"), QiCValue::Int(2024), QiCValue::Int(3)],
        vec![text("West"), QiCValue::Int(2024), QiCValue::Int(4)],
    ]);
    let selection = QiCSelection::QiFNew(&ds, &["Region", "Year"]).unwrap();
    let normalized = QiCNormalizer::QiFNormalize(&ds, &selection);
    let grouping = QiCGrouper::QiFGroup(&normalized.dataset, &selection);

    let keys: Vec<Vec<String>> = grouping.iter().map(|g| g.key.0.clone()).collect();
    assert_eq!(
        keys,
        vec![
            vec!["East".to_string(), "2024".to_string()],
            vec!["East".to_string(), "2025".to_string()],
            vec!["West".to_string(), "2024".to_string()],
        ]
    );
    assert_eq!(grouping.groups[0].rows, vec![0, 2]);
}

#[test]
fn QiFTEmptySelectionIsRejected() {
    let ds = table(vec![vec![text("East"), QiCValue::Int(2024), QiCValue::Int(1)]]);
    let err = QiCSelection::QiFNew::<&str>(&ds, &[]).unwrap_err();
    assert!(err.to_string().contains("column selection required"));
}

#[test]
fn QiFTUnknownAndRepeatedColumnsAreRejected() {
    let ds = table(vec![vec![text("East"), QiCValue::Int(2024), QiCValue::Int(1)]]);
    assert!(QiCSelection::QiFNew(&ds, &["Country"]).is_err());
    assert!(QiCSelection::QiFNew(&ds, &["Region", "Region"]).is_err());
}

fn cell() -> impl Strategy<Value = QiCValue> {
    prop_oneof![
        Just(QiCValue::Null),
        (0i64..4).prop_map(QiCValue::Int),
        "[ab]{0,1}".prop_map(QiCValue::Text),
        Just(QiCValue::Text("None".into())),
    ]
}

proptest! {
    #[test]
    fn QiFTGroupsPartitionEveryRowExactlyOnce(
        cells in prop::collection::vec((cell(), cell()), 1..40),
        columns in prop::sample::subsequence(vec!["Region", "Year", "Sales"], 1..=3),
    ) {
        let rows: Vec<Vec<QiCValue>> = cells
            .into_iter()
            .enumerate()
            .map(|(i, (a, b))| vec![a, b, QiCValue::Int(i as i64 % 3)])
            .collect();
        let total = rows.len();
        let ds = table(rows);
        let selection = QiCSelection::QiFNew(&ds, columns.as_slice()).unwrap();
        let normalized = QiCNormalizer::QiFNormalize(&ds, &selection);
        let grouping = QiCGrouper::QiFGroup(&normalized.dataset, &selection);

        let mut seen = HashSet::new();
        let mut keys = HashSet::new();
        for group in grouping.iter() {
            prop_assert!(!group.rows.is_empty());
            prop_assert!(keys.insert(group.key.clone()));
            prop_assert!(group.rows.windows(2).all(|w| w[0] < w[1]));
            for &row in &group.rows {
                prop_assert!(seen.insert(row));
                let actual: Vec<String> = selection
                    .QiFIndices()
                    .iter()
                    .map(|&c| normalized.dataset.QiFRows()[row][c].QiFDisplay())
                    .collect();
                prop_assert_eq!(&actual, &group.key.0);
            }
        }
        prop_assert_eq!(seen.len(), total);
    }
}
