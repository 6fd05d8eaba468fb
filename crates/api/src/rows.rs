// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Canonicalization of bulk upload rows.
//!
//! Uploads arrive either as CSV files or as JSON arrays of loosely keyed
//! objects. Spreadsheets in the wild disagree on header spelling
//! ("Bus No", `bus_no`, `busNo`), so both paths normalize keys before
//! mapping cells into the canonical [`BusRow`] / [`StudentRow`] shapes
//! the import reconciler consumes. Placeholder cells ("---", "null",
//! blanks) read as absent.

use bsms::{BusRow, StudentRow};
use csv::StringRecord;
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::ApiError;

const BUS_NO_ALIASES: &[&str] = &["bus_no", "busno"];
const VEHICLE_NO_ALIASES: &[&str] = &["vehicle_no", "vehicleno"];
const DRIVER_ALIASES: &[&str] = &["driver"];
const DRIVER_CONTACT_ALIASES: &[&str] = &["driver_contact", "drivercontact"];
const HELPER_ALIASES: &[&str] = &["helper"];
const HELPER_CONTACT_ALIASES: &[&str] = &["helper_contact", "helpercontact"];
const ROUTE_ALIASES: &[&str] = &["route"];
const TIME_ALIASES: &[&str] = &["time"];
const CAPACITY_ALIASES: &[&str] = &["capacity"];
const CONDUCTOR_ID_ALIASES: &[&str] = &["conductor_id", "conductorid"];

const STUDENT_ID_ALIASES: &[&str] = &["student_id", "studentid"];
const NAME_ALIASES: &[&str] = &["name"];
const COURSE_ALIASES: &[&str] = &["course"];
const YEAR_ALIASES: &[&str] = &["year"];
const FEE_PAID_ALIASES: &[&str] = &["fee_paid", "feepaid"];

/// Normalizes a header or object key for alias matching.
fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace(' ', "_")
}

/// Collapses placeholder cells to `None`.
fn clean_cell(raw: &str) -> Option<String> {
    let trimmed: &str = raw.trim();
    if trimmed.is_empty() || trimmed == "---" || trimmed.eq_ignore_ascii_case("null") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_u32_cell(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok()
}

/// One upload row with normalized keys, whatever the transport was.
struct RowFields {
    values: HashMap<String, String>,
}

impl RowFields {
    fn from_record(header_map: &HashMap<String, usize>, record: &StringRecord) -> Self {
        let values: HashMap<String, String> = header_map
            .iter()
            .filter_map(|(key, idx)| {
                record
                    .get(*idx)
                    .map(|cell| (key.clone(), cell.to_string()))
            })
            .collect();
        Self { values }
    }

    fn from_object(object: &Map<String, Value>) -> Self {
        let values: HashMap<String, String> = object
            .iter()
            .map(|(key, value)| (normalize_key(key), json_cell_to_string(value)))
            .collect();
        Self { values }
    }

    fn raw(&self, aliases: &[&str]) -> Option<&str> {
        aliases
            .iter()
            .find_map(|alias| self.values.get(*alias))
            .map(String::as_str)
    }

    fn cleaned(&self, aliases: &[&str]) -> Option<String> {
        self.raw(aliases).and_then(clean_cell)
    }

    fn trimmed(&self, aliases: &[&str]) -> String {
        self.raw(aliases).unwrap_or_default().trim().to_string()
    }

    fn number(&self, aliases: &[&str]) -> Option<u32> {
        self.raw(aliases).and_then(parse_u32_cell)
    }
}

fn json_cell_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

fn bus_row_from_fields(fields: &RowFields) -> BusRow {
    BusRow {
        bus_no: fields.number(BUS_NO_ALIASES),
        vehicle_no: fields.cleaned(VEHICLE_NO_ALIASES),
        driver: fields.cleaned(DRIVER_ALIASES),
        driver_contact: fields.cleaned(DRIVER_CONTACT_ALIASES),
        helper: fields.cleaned(HELPER_ALIASES),
        helper_contact: fields.cleaned(HELPER_CONTACT_ALIASES),
        route: fields.trimmed(ROUTE_ALIASES),
        time: fields.cleaned(TIME_ALIASES),
        capacity: fields.number(CAPACITY_ALIASES),
        conductor_id: fields.cleaned(CONDUCTOR_ID_ALIASES),
    }
}

fn student_row_from_fields(fields: &RowFields) -> StudentRow {
    StudentRow {
        student_id: fields.trimmed(STUDENT_ID_ALIASES),
        name: fields.trimmed(NAME_ALIASES),
        course: fields.cleaned(COURSE_ALIASES),
        year: fields.number(YEAR_ALIASES),
        route: fields.trimmed(ROUTE_ALIASES),
        fee_paid: fields.trimmed(FEE_PAID_ALIASES),
    }
}

fn csv_rows(bytes: &[u8]) -> Result<Vec<RowFields>, ApiError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers: StringRecord = reader
        .headers()
        .map_err(|err| ApiError::InvalidCsvFormat {
            reason: err.to_string(),
        })?
        .clone();
    let header_map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| (normalize_key(header), idx))
        .collect();

    let mut rows: Vec<RowFields> = Vec::new();
    for record in reader.records() {
        let record: StringRecord = record.map_err(|err| ApiError::InvalidCsvFormat {
            reason: err.to_string(),
        })?;
        rows.push(RowFields::from_record(&header_map, &record));
    }
    Ok(rows)
}

/// Parses a bus roster CSV into canonical rows.
///
/// # Errors
///
/// Returns an error if the bytes are not a well-formed CSV document.
pub fn bus_rows_from_csv(bytes: &[u8]) -> Result<Vec<BusRow>, ApiError> {
    Ok(csv_rows(bytes)?
        .iter()
        .map(bus_row_from_fields)
        .collect())
}

/// Parses a student roster CSV into canonical rows.
///
/// # Errors
///
/// Returns an error if the bytes are not a well-formed CSV document.
pub fn student_rows_from_csv(bytes: &[u8]) -> Result<Vec<StudentRow>, ApiError> {
    Ok(csv_rows(bytes)?
        .iter()
        .map(student_row_from_fields)
        .collect())
}

/// Maps a JSON bulk payload into canonical bus rows.
#[must_use]
pub fn bus_rows_from_json(objects: &[Map<String, Value>]) -> Vec<BusRow> {
    objects
        .iter()
        .map(|object| bus_row_from_fields(&RowFields::from_object(object)))
        .collect()
}

/// Maps a JSON bulk payload into canonical student rows.
#[must_use]
pub fn student_rows_from_json(objects: &[Map<String, Value>]) -> Vec<StudentRow> {
    objects
        .iter()
        .map(|object| student_row_from_fields(&RowFields::from_object(object)))
        .collect()
}
