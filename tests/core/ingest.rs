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

use std::fs;

use qie::{QiCDataFormat, QiCFormatDetector, QiCSession, QiCTableReader, QiCValue, QiError};
use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook};
use tempfile::tempdir;

#[test]
fn QiFTReadsCsvWithInferredTypes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sales.csv");
    fs::write(&path, "Region,Sales,Active\nEast,10,True\nWest,2.5,false\n,,\n").unwrap();

    let ds = QiCTableReader::QiFNew().QiFReadPath(&path).unwrap();
    assert_eq!(ds.QiFColumns(), ["Region", "Sales", "Active"]);
    assert_eq!(ds.QiFRowCount(), 3);
    assert_eq!(ds.QiFRows()[0][1], QiCValue::Int(10));
    assert_eq!(ds.QiFRows()[0][2], QiCValue::Bool(true));
    assert_eq!(ds.QiFRows()[1][1], QiCValue::Float(2.5));
    assert_eq!(ds.QiFRows()[2][0], QiCValue::Null);
}

#[test]
fn QiFTReadsFirstWorksheetOfXlsx() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sales.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Region").unwrap();
    sheet.write_string(0, 1, "Sales").unwrap();
    sheet.write_string(1, 0, "East").unwrap();
    sheet.write_number(1, 1, 10).unwrap();
    sheet.write_string(2, 0, "West").unwrap();
    workbook.save(&path).unwrap();

    let ds = QiCTableReader::QiFNew().QiFReadPath(&path).unwrap();
    assert_eq!(ds.QiFColumns(), ["Region", "Sales"]);
    assert_eq!(ds.QiFRowCount(), 2);
    assert_eq!(ds.QiFRows()[0][0], QiCValue::Text("East".into()));
    assert_eq!(ds.QiFRows()[0][1], QiCValue::Int(10));
    assert_eq!(ds.QiFRows()[1][1], QiCValue::Null);
}

#[test]
fn QiFTXlsxDatesAndWholeNumbersKeepTheirValues() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("calendar.xlsx");
    let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap().and_hms_opt(0, 0, 0).unwrap();
    let stamp = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap().and_hms_opt(18, 0, 0).unwrap();

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let stamp_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
    sheet.write_string(0, 0, "Year").unwrap();
    sheet.write_string(0, 1, "Day").unwrap();
    sheet.write_string(0, 2, "Ratio").unwrap();
    sheet.write_number(1, 0, 2024).unwrap();
    sheet.write_datetime_with_format(1, 1, &day, &date_format).unwrap();
    sheet.write_number(1, 2, 0.25).unwrap();
    sheet.write_number(2, 0, 2025).unwrap();
    sheet.write_datetime_with_format(2, 1, &stamp, &stamp_format).unwrap();
    sheet.write_number(2, 2, 3).unwrap();
    workbook.save(&path).unwrap();

    let ds = QiCTableReader::QiFNew().QiFReadPath(&path).unwrap();
    let rows = ds.QiFRows();
    assert_eq!(rows[0][0], QiCValue::Int(2024));
    assert_eq!(rows[0][1], QiCValue::DateTime(day));
    assert_eq!(rows[0][1].QiFDisplay(), "2024-01-15 00:00:00");
    assert_eq!(rows[0][2], QiCValue::Float(0.25));
    assert_eq!(rows[1][1].QiFDisplay(), "2024-02-01 18:00:00");
    assert_eq!(rows[1][2], QiCValue::Int(3));
}

#[test]
fn QiFTSniffsCsvWithoutExtension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("export_2024");
    fs::write(&path, "a,b\n1,2\n").unwrap();

    let session = QiCSession::QiFLoad(&path).unwrap();
    assert_eq!(session.QiFDataset().QiFColumns(), ["a", "b"]);
}

#[test]
fn QiFTRejectsMissingAndUnsupportedFiles() {
    let dir = tempdir().unwrap();

    let missing = QiCTableReader::QiFNew()
        .QiFReadPath(&dir.path().join("nope.csv"))
        .unwrap_err();
    assert!(missing.to_string().contains("File not found"));

    let notes = dir.path().join("notes.txt");
    fs::write(&notes, "just some words\n").unwrap();
    let unsupported = QiCTableReader::QiFNew().QiFReadPath(&notes).unwrap_err();
    assert!(matches!(unsupported, QiError::Input { .. }));
}

#[test]
fn QiFTRejectsRowsLongerThanHeader() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ragged.csv");
    fs::write(&path, "a,b\n1,2,3\n").unwrap();

    let err = QiCTableReader::QiFNew().QiFReadPath(&path).unwrap_err();
    assert!(matches!(err, QiError::Input { .. }));
}

#[test]
fn QiFTDetectorPrefersExtension() {
    let detector = QiCFormatDetector::QiFNew();
    assert_eq!(detector.QiFDetectFromPath(std::path::Path::new("a.ods")), QiCDataFormat::Excel);
    assert_eq!(detector.QiFDetectFromContent(&[0xD0, 0xCF, 0x11, 0xE0, 0]), QiCDataFormat::Excel);
}
