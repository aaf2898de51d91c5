//! Table loader: turns an uploaded CSV or spreadsheet into a rectangular grid of strings.
//!
//! Every cell is a display string. Missing values are normalized to `""` and no
//! type information survives loading; the layout engine only ever sees text.

pub mod loader;

use thiserror::Error;

use crate::errors::ErrorKind;

pub use loader::load_table_from_path;

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// Failure to produce a `Table` from caller-supplied input.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Invalid file type '{0}'. Please upload .xlsx, .xls, .xlsm or .csv")]
    UnsupportedFormat(String),

    #[error("The uploaded file is empty ({columns} columns, {rows} data rows)")]
    EmptyTable { columns: usize, rows: usize },

    #[error("Could not read tabular data: {0}")]
    CorruptInput(String),
}

impl LoadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoadError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            LoadError::EmptyTable { .. } => ErrorKind::EmptyTable,
            LoadError::CorruptInput(_) => ErrorKind::CorruptInput,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Source format
// ────────────────────────────────────────────────────────────────────────────

/// How the uploaded bytes should be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Comma-separated text with a header record.
    DelimitedText,
    /// An Excel workbook (`xlsx`, `xlsm`, `xls`); only the first sheet is read.
    Spreadsheet,
}

impl SourceFormat {
    /// Maps a bare extension (no dot, any case) to a format.
    pub fn from_extension(extension: &str) -> Result<Self, LoadError> {
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Ok(SourceFormat::DelimitedText),
            "xlsx" | "xlsm" | "xls" => Ok(SourceFormat::Spreadsheet),
            other => Err(LoadError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Infers the format from an uploaded filename's last extension.
    ///
    /// A name without a dot is rejected, as is anything but `csv`, `xlsx`, `xlsm` and `xls`.
    pub fn from_filename(filename: &str) -> Result<Self, LoadError> {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .ok_or_else(|| LoadError::UnsupportedFormat(String::new()))?;
        Self::from_extension(extension)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Table
// ────────────────────────────────────────────────────────────────────────────

/// A rectangular grid: one header per column and rows of equal length.
///
/// Construction through `Table::new` guarantees at least one column, at least one
/// data row, and that every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, LoadError> {
        if headers.is_empty() || rows.is_empty() {
            return Err(LoadError::EmptyTable {
                columns: headers.len(),
                rows: rows.len(),
            });
        }
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            return Err(LoadError::CorruptInput(format!(
                "row {} has {} cells, expected {}",
                index + 1,
                row.len(),
                headers.len()
            )));
        }
        Ok(Table { headers, rows })
    }

    /// Builds a table without the shape checks, so the engine's own guard can be exercised.
    #[cfg(test)]
    pub(crate) fn new_unchecked(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Table { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Iterates the cells of column `index` in row order.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(move |row| row[index].as_str())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
