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

use std::fs::{self, File};
use std::io::Read;

use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::NaiveDate;
use qie::export::QiCWriterConfig;
use qie::{
    QiCArchiver, QiCDataset, QiCFileAllocator, QiCOutputFormat, QiCTableWriter, QiCValue,
    QiFCreateUniqueDir,
};
use tempfile::tempdir;
use zip::ZipArchive;

fn sales() -> QiCDataset {
    QiCDataset::QiFNew(
        vec!["Region".into(), "Sales".into(), "Active".into()],
        vec![
            vec![QiCValue::Text("East".into()), QiCValue::Int(10), QiCValue::Bool(true)],
            vec![QiCValue::Text("West".into()), QiCValue::Float(20.5), QiCValue::Null],
            vec![QiCValue::Text("East".into()), QiCValue::Int(30), QiCValue::Bool(false)],
        ],
    )
    .unwrap()
}

#[test]
fn QiFTCsvKeepsAllColumnsAndRowOrder() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("East.csv");
    QiCTableWriter::QiFNew(QiCOutputFormat::Csv)
        .QiFWriteRows(&sales(), &[0, 2], &path)
        .unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text, "Region,Sales,Active\nEast,10,True\nEast,30,False\n");
}

fn non_finite() -> QiCDataset {
    QiCDataset::QiFNew(
        vec!["Label".into(), "Value".into(), "Tag".into()],
        vec![
            vec![QiCValue::Text("nan".into()), QiCValue::Float(f64::NAN), QiCValue::Text("a".into())],
            vec![QiCValue::Text("pos".into()), QiCValue::Float(f64::INFINITY), QiCValue::Text("b".into())],
            vec![QiCValue::Text("neg".into()), QiCValue::Float(f64::NEG_INFINITY), QiCValue::Text("c".into())],
            vec![QiCValue::Text("big".into()), QiCValue::Float(1e300), QiCValue::Text("d".into())],
        ],
    )
    .unwrap()
}

#[test]
fn QiFTCsvNonFiniteFloats() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("values.csv");
    QiCTableWriter::QiFNew(QiCOutputFormat::Csv)
        .QiFWriteRows(&non_finite(), &[0, 1, 2, 3], &path)
        .unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(
        text,
        "Label,Value,Tag\nnan,,a\npos,inf,b\nneg,-inf,c\nbig,1e+300,d\n"
    );
}

#[test]
fn QiFTXlsxLeavesNonFiniteCellsEmpty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("values.xlsx");
    QiCTableWriter::QiFNew(QiCOutputFormat::Excel)
        .QiFWriteRows(&non_finite(), &[0, 1, 2, 3], &path)
        .unwrap();

    let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
    let range = workbook.worksheet_range("Sheet1").unwrap();
    assert_eq!(range.get((1, 1)), Some(&Data::Empty));
    assert_eq!(range.get((2, 1)), Some(&Data::Empty));
    assert_eq!(range.get((3, 1)), Some(&Data::Empty));
    assert_eq!(range.get((4, 1)), Some(&Data::Float(1e300)));
    assert_eq!(range.get((3, 2)), Some(&Data::String("c".into())));
}

#[test]
fn QiFTDateTimesSurviveBothFormats() {
    let stamp = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap().and_hms_opt(6, 0, 0).unwrap();
    let ds = QiCDataset::QiFNew(
        vec!["Day".into(), "Units".into()],
        vec![vec![QiCValue::DateTime(stamp), QiCValue::Int(4)]],
    )
    .unwrap();
    let dir = tempdir().unwrap();

    let csv_path = dir.path().join("day.csv");
    QiCTableWriter::QiFNew(QiCOutputFormat::Csv)
        .QiFWriteRows(&ds, &[0], &csv_path)
        .unwrap();
    assert_eq!(
        fs::read_to_string(&csv_path).unwrap(),
        "Day,Units\n2024-01-15 06:00:00,4\n"
    );

    let xlsx_path = dir.path().join("day.xlsx");
    QiCTableWriter::QiFNew(QiCOutputFormat::Excel)
        .QiFWriteRows(&ds, &[0], &xlsx_path)
        .unwrap();
    let mut workbook: Xlsx<_> = open_workbook(&xlsx_path).unwrap();
    let range = workbook.worksheet_range("Sheet1").unwrap();
    match range.get((1, 0)) {
        Some(Data::DateTime(dt)) => assert_eq!(dt.as_datetime(), Some(stamp)),
        other => panic!("expected a date-time cell, got {:?}", other),
    }
}

#[test]
fn QiFTCsvWritesRawBytesUnchanged() {
    let ds = QiCDataset::QiFNew(
        vec!["k".into()],
        vec![vec![QiCValue::Bytes(vec![0xff, b'x'])]],
    )
    .unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("raw.csv");
    QiCTableWriter::QiFNew(QiCOutputFormat::Csv)
        .QiFWriteRows(&ds, &[0], &path)
        .unwrap();

    assert_eq!(fs::read(&path).unwrap(), b"k\n\xffx\n");
}

#[test]
fn QiFTXlsxRoundTripsThroughCalamine() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("West.xlsx");
    let stats = QiCTableWriter::QiFNew(QiCOutputFormat::Excel)
        .QiFWriteRows(&sales(), &[1], &path)
        .unwrap();
    assert_eq!(stats.rows_written, 1);

    let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["Sheet1".to_string()]);
    let range = workbook.worksheet_range("Sheet1").unwrap();
    let rows: Vec<_> = range.rows().collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], Data::String("Region".into()));
    assert_eq!(rows[1][0], Data::String("West".into()));
    assert_eq!(rows[1][1], Data::Float(20.5));
}

#[test]
fn QiFTCustomDelimiterIsHonoured() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("East.csv");
    let config = QiCWriterConfig {
        delimiter: b';',
        ..QiCWriterConfig::default()
    };
    QiCTableWriter::QiFNew(QiCOutputFormat::Csv)
        .QiFWithConfig(config)
        .QiFWriteRows(&sales(), &[0], &path)
        .unwrap();

    assert!(fs::read_to_string(&path).unwrap().starts_with("Region;Sales;Active\n"));
}

#[test]
fn QiFTCollidingNamesGetNumericSuffixes() {
    let root = tempdir().unwrap();
    let first = QiFCreateUniqueDir(root.path(), "Region").unwrap();
    let second = QiFCreateUniqueDir(root.path(), "Region").unwrap();
    let third = QiFCreateUniqueDir(root.path(), "Region").unwrap();
    assert_eq!(first.file_name().unwrap(), "Region");
    assert_eq!(second.file_name().unwrap(), "Region_1");
    assert_eq!(third.file_name().unwrap(), "Region_2");

    let mut files = QiCFileAllocator::QiFNew(&first, ".csv");
    let a = files.QiFAllocate("A_B");
    let b = files.QiFAllocate("A_B");
    assert_eq!(a.file_name().unwrap(), "A_B.csv");
    assert_eq!(b.file_name().unwrap(), "A_B_1.csv");
}

#[test]
fn QiFTArchiveNestsFilesUnderOutputDirectory() {
    let root = tempdir().unwrap();
    let dir = QiFCreateUniqueDir(root.path(), "Region").unwrap();
    let writer = QiCTableWriter::QiFNew(QiCOutputFormat::Csv);
    let east = dir.join("East.csv");
    let west = dir.join("West.csv");
    writer.QiFWriteRows(&sales(), &[0, 2], &east).unwrap();
    writer.QiFWriteRows(&sales(), &[1], &west).unwrap();

    let info = QiCArchiver::QiFNew()
        .QiFCreate(root.path(), &dir, &[east, west])
        .unwrap();
    assert_eq!(info.path, root.path().join("Region.zip"));
    assert!(info.size_bytes > 0);

    let mut archive = ZipArchive::new(File::open(&info.path).unwrap()).unwrap();
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    assert_eq!(names, vec!["Region/East.csv", "Region/West.csv"]);

    let mut entry = archive.by_name("Region/West.csv").unwrap();
    assert_eq!(entry.compression(), zip::CompressionMethod::Deflated);
    let mut content = String::new();
    entry.read_to_string(&mut content).unwrap();
    assert_eq!(content, "Region,Sales,Active\nWest,20.5,\n");
}
