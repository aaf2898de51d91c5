//! Parses CSV and Excel sources into a `Table`.
//!
//! The first record (CSV) or the first row of the used range (Excel) is the header.
//! Cells are stringified the way a reader of the sheet would see them.

use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{NaiveDateTime, Timelike};

use crate::table::{LoadError, SourceFormat, Table};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Cell texts treated as missing values and replaced by `""`.
const MISSING_VALUE_MARKERS: [&str; 19] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null", "",
];

/// Loads a table from in-memory bytes according to `format`.
pub fn load_table(bytes: &[u8], format: SourceFormat) -> Result<Table, LoadError> {
    match format {
        SourceFormat::DelimitedText => load_delimited(bytes),
        SourceFormat::Spreadsheet => load_spreadsheet(bytes),
    }
}

/// Reads `path` fully and loads it according to `format`.
pub fn load_table_from_path(path: &Path, format: SourceFormat) -> Result<Table, LoadError> {
    let bytes = std::fs::read(path)
        .map_err(|e| LoadError::CorruptInput(format!("unable to read upload: {e}")))?;
    load_table(&bytes, format)
}

// ────────────────────────────────────────────────────────────────────────────
// CSV
// ────────────────────────────────────────────────────────────────────────────

fn load_delimited(bytes: &[u8]) -> Result<Table, LoadError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let mut records = reader.records();

    let header_record = match records.next() {
        Some(record) => record.map_err(csv_error)?,
        None => return Err(LoadError::EmptyTable { columns: 0, rows: 0 }),
    };
    let headers = name_headers(header_record.iter().map(str::to_string));

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(csv_error)?;
        if record.len() > headers.len() {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(LoadError::CorruptInput(format!(
                "expected {} fields in line {line}, saw {}",
                headers.len(),
                record.len()
            )));
        }
        let mut row: Vec<String> = record.iter().map(normalize_text).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    Table::new(headers, rows)
}

fn csv_error(err: csv::Error) -> LoadError {
    LoadError::CorruptInput(err.to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Excel
// ────────────────────────────────────────────────────────────────────────────

fn load_spreadsheet(bytes: &[u8]) -> Result<Table, LoadError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| LoadError::CorruptInput(format!("unable to open workbook: {e}")))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LoadError::EmptyTable { columns: 0, rows: 0 })?
        .map_err(|e| LoadError::CorruptInput(format!("unable to read first sheet: {e}")))?;

    let mut sheet_rows = range.rows();
    let headers = match sheet_rows.next() {
        Some(row) => name_headers(row.iter().map(header_text)),
        None => return Err(LoadError::EmptyTable { columns: 0, rows: 0 }),
    };
    let rows = sheet_rows
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    Table::new(headers, rows)
}

/// Renders one spreadsheet cell as display text.
pub(crate) fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => normalize_text(s),
        Data::Float(f) => format_float(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::Error(e) => e.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => format_datetime(value),
            None => format_float(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

/// Header cells keep their literal text; only data cells treat `NA` and friends as missing.
fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        other => cell_text(other),
    }
}

fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn format_datetime(value: NaiveDateTime) -> String {
    if value.time().num_seconds_from_midnight() == 0 {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Shared helpers
// ────────────────────────────────────────────────────────────────────────────

fn normalize_text(value: &str) -> String {
    if MISSING_VALUE_MARKERS.contains(&value) {
        String::new()
    } else {
        value.to_string()
    }
}

/// Blank header cells get a positional `Unnamed: N` name.
fn name_headers(raw: impl Iterator<Item = String>) -> Vec<String> {
    raw.enumerate()
        .map(|(index, name)| {
            if name.trim().is_empty() {
                format!("Unnamed: {index}")
            } else {
                name
            }
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
