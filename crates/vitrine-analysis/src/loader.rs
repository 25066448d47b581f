//! Dataset loading from spreadsheet and CSV files
//!
//! The loader reads one tabular file and turns it into a [`Table`]:
//!
//! 1. Cells are read into an untyped [`RawCell`] grid. Spreadsheets
//!    (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`) go through `calamine` and use
//!    their first worksheet; `.csv` files go through the `csv` crate. The first
//!    row is the header.
//! 2. Empty header cells are named `Unnamed: <index>` and duplicate names get a
//!    `.1`, `.2`, ... suffix. Columns whose name starts with `Unnamed` are then
//!    dropped.
//! 3. Columns whose name mentions `data` (any case) are parsed as date-times.
//!    So are columns whose name mentions `date` when their cells are text or
//!    date-times and hold at least one date. Everything else gets a type
//!    inferred from its cells.
//!
//! Cells that cannot be converted to their column's type become missing and
//! are reported through `tracing` warnings rather than errors.
//!
//! [`DatasetLoader`] memoizes parsed tables by a SHA-256 digest of the file
//! bytes, so reloading an unchanged file shares the previous [`Table`].

use std::{
    collections::HashSet,
    fs,
    io::{self, Cursor},
    path::{Path, PathBuf},
    sync::Arc,
};

use calamine::{Data, DataType as _, Reader as _};
use chrono::{NaiveDate, NaiveDateTime};
use sha2::{Digest as _, Sha256};

use crate::{
    cache::{Memo, MemoStats},
    table::{Column, ColumnData, Table, TableError},
};

/// Prefix of the placeholder names given to empty header cells.
pub const UNNAMED_PREFIX: &str = "Unnamed";

/// Strings read as missing values.
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LoadError {
    #[display("data file not found: {}", path.display())]
    DataNotFound { path: PathBuf },
    #[display("failed to read {}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("unsupported file format '{extension}' (expected xlsx, xlsm, xlsb, xls, ods or csv)")]
    UnsupportedFormat { extension: String },
    #[display("failed to parse spreadsheet")]
    Spreadsheet { source: calamine::Error },
    #[display("spreadsheet has no worksheet")]
    NoWorksheet,
    #[display("failed to parse CSV")]
    Csv { source: csv::Error },
    #[display("failed to build table")]
    Table { source: TableError },
}

/// File formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    Spreadsheet,
    Csv,
}

impl FileFormat {
    /// Format implied by the file extension.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(FileFormat::Spreadsheet),
            "csv" => Ok(FileFormat::Csv),
            _ => Err(LoadError::UnsupportedFormat { extension }),
        }
    }
}

/// An untyped cell as read from the file.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    DateTime(NaiveDateTime),
}

impl RawCell {
    /// Text cell, or [`RawCell::Empty`] for a missing-value marker.
    fn from_text(text: &str) -> Self {
        if NA_VALUES.contains(&text) {
            RawCell::Empty
        } else {
            RawCell::Text(text.to_owned())
        }
    }

    fn from_spreadsheet(cell: &Data) -> Self {
        match cell {
            Data::Empty | Data::Error(_) => RawCell::Empty,
            Data::Int(i) => RawCell::Int(*i),
            Data::Float(f) => RawCell::Float(*f),
            Data::Bool(b) => RawCell::Bool(*b),
            Data::String(s) => RawCell::from_text(s),
            Data::DurationIso(s) => RawCell::Text(s.clone()),
            Data::DateTime(_) | Data::DateTimeIso(_) => {
                cell.as_datetime().map_or(RawCell::Empty, RawCell::DateTime)
            }
        }
    }

    fn from_csv_field(field: &str) -> Self {
        if NA_VALUES.contains(&field) {
            return RawCell::Empty;
        }
        if let Ok(i) = field.parse::<i64>() {
            return RawCell::Int(i);
        }
        if let Ok(f) = field.parse::<f64>() {
            return RawCell::Float(f);
        }
        match field {
            "True" | "TRUE" | "true" => RawCell::Bool(true),
            "False" | "FALSE" | "false" => RawCell::Bool(false),
            _ => RawCell::Text(field.to_owned()),
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, RawCell::Empty)
    }

    fn to_text(&self) -> Option<String> {
        let text = match self {
            RawCell::Empty => return None,
            RawCell::Int(i) => i.to_string(),
            RawCell::Float(f) => format!("{f:?}"),
            RawCell::Bool(b) => (if *b { "True" } else { "False" }).to_owned(),
            RawCell::Text(s) => s.clone(),
            RawCell::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        };
        Some(text)
    }
}

/// Parses a date or date-time written in one of the accepted text forms.
///
/// # Examples
///
/// ```
/// use vitrine_analysis::loader::parse_datetime;
///
/// assert!(parse_datetime("2024-03-09").is_some());
/// assert!(parse_datetime("03/09/2024 14:05:00").is_some());
/// assert!(parse_datetime("N/A").is_none());
/// ```
#[must_use]
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .map(|date| date.and_time(chrono::NaiveTime::MIN))
        })
}

/// Whether a column of this name always holds dates.
///
/// Names mentioning `data` (any case) are date columns whatever their cells
/// hold. Names that only mention `date` go through [`is_date_like`] instead.
#[must_use]
pub fn is_date_column(name: &str) -> bool {
    name.to_lowercase().contains("data")
}

/// Whether a column named `*date*` should be parsed as date-times.
///
/// Its non-empty cells must all be text or spreadsheet date-times, and at
/// least one of them must be a date. A numeric `Candidates` or a yes/no
/// `Updated` column keeps its inferred type.
fn is_date_like(name: &str, cells: &[RawCell]) -> bool {
    if !name.to_lowercase().contains("date") {
        return false;
    }
    let mut any_date = false;
    for cell in cells {
        match cell {
            RawCell::Empty => {}
            RawCell::DateTime(_) => any_date = true,
            RawCell::Text(text) => any_date |= parse_datetime(text).is_some(),
            RawCell::Int(_) | RawCell::Float(_) | RawCell::Bool(_) => return false,
        }
    }
    any_date
}

/// Whether a column of this name is a spurious index column.
#[must_use]
pub fn is_unnamed_column(name: &str) -> bool {
    name.starts_with(UNNAMED_PREFIX)
}

/// Reads and parses a dataset file without memoization.
pub fn read_table(path: &Path) -> Result<Table, LoadError> {
    let (format, bytes) = read_source(path)?;
    parse_table(&bytes, format)
}

/// Parses file contents in the given format.
pub fn parse_table(bytes: &[u8], format: FileFormat) -> Result<Table, LoadError> {
    let grid = match format {
        FileFormat::Spreadsheet => read_spreadsheet(bytes)?,
        FileFormat::Csv => read_csv(bytes)?,
    };
    build_table(grid)
}

fn read_source(path: &Path) -> Result<(FileFormat, Vec<u8>), LoadError> {
    if !path.exists() {
        return Err(LoadError::DataNotFound {
            path: path.to_owned(),
        });
    }
    let format = FileFormat::from_path(path)?;
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_owned(),
        source,
    })?;
    Ok((format, bytes))
}

/// Header names and data rows, before any typing.
#[derive(Debug, Default)]
struct RawGrid {
    header: Vec<RawCell>,
    rows: Vec<Vec<RawCell>>,
}

fn read_spreadsheet(bytes: &[u8]) -> Result<RawGrid, LoadError> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|source| LoadError::Spreadsheet { source })?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LoadError::NoWorksheet)?
        .map_err(|source| LoadError::Spreadsheet { source })?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(RawCell::from_spreadsheet).collect::<Vec<_>>());
    let header = rows.next().unwrap_or_default();
    Ok(RawGrid {
        header,
        rows: rows.collect(),
    })
}

fn read_csv(bytes: &[u8]) -> Result<RawGrid, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);
    let header = reader
        .headers()
        .map_err(|source| LoadError::Csv { source })?
        .iter()
        .map(|name| {
            if name.is_empty() {
                RawCell::Empty
            } else {
                RawCell::Text(name.to_owned())
            }
        })
        .collect();
    let rows = reader
        .records()
        .map(|record| {
            record
                .map(|record| record.iter().map(RawCell::from_csv_field).collect())
                .map_err(|source| LoadError::Csv { source })
        })
        .collect::<Result<_, _>>()?;
    Ok(RawGrid { header, rows })
}

/// Column names with placeholders for empty cells and duplicates suffixed.
fn header_names(header: &[RawCell]) -> Vec<String> {
    let mut used = HashSet::new();
    header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = cell
                .to_text()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| format!("{UNNAMED_PREFIX}: {idx}"));
            let mut name = base.clone();
            let mut suffix = 1;
            while used.contains(&name) {
                name = format!("{base}.{suffix}");
                suffix += 1;
            }
            used.insert(name.clone());
            name
        })
        .collect()
}

fn build_table(grid: RawGrid) -> Result<Table, LoadError> {
    let names = header_names(&grid.header);
    let mut columns = Vec::new();
    for (idx, name) in names.into_iter().enumerate() {
        if is_unnamed_column(&name) {
            tracing::debug!(column = %name, "dropping unnamed column");
            continue;
        }
        let cells = grid
            .rows
            .iter()
            .map(|row| row.get(idx).cloned().unwrap_or(RawCell::Empty))
            .collect::<Vec<_>>();
        let (data, failures) = if is_date_column(&name) || is_date_like(&name, &cells) {
            datetime_column(cells)
        } else {
            (infer_column(cells), 0)
        };
        if failures > 0 {
            tracing::warn!(
                column = %name,
                failures,
                "cells could not be parsed as date-times and were set to missing"
            );
        }
        columns.push(Column::new(name, data));
    }
    Table::new(columns).map_err(|source| LoadError::Table { source })
}

fn datetime_column(cells: Vec<RawCell>) -> (ColumnData, usize) {
    let mut failures = 0;
    let values = cells
        .into_iter()
        .map(|cell| {
            let value = match &cell {
                RawCell::Empty => return None,
                RawCell::DateTime(dt) => Some(*dt),
                RawCell::Text(text) => parse_datetime(text),
                RawCell::Int(_) | RawCell::Float(_) | RawCell::Bool(_) => None,
            };
            if value.is_none() {
                failures += 1;
            }
            value
        })
        .collect();
    (ColumnData::DateTime(values), failures)
}

/// Types a non-date column from the kinds of its non-empty cells.
#[expect(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn infer_column(cells: Vec<RawCell>) -> ColumnData {
    let present = || cells.iter().filter(|cell| !cell.is_empty());
    let all = |pred: fn(&RawCell) -> bool| present().all(pred);

    if present().next().is_none() {
        return ColumnData::Float(vec![None; cells.len()]);
    }
    if all(|cell| matches!(cell, RawCell::Int(_) | RawCell::Float(_))) {
        let whole = all(|cell| match cell {
            RawCell::Float(f) => is_whole(*f),
            _ => true,
        });
        return if whole {
            ColumnData::Integer(
                cells
                    .iter()
                    .map(|cell| match cell {
                        RawCell::Int(i) => Some(*i),
                        RawCell::Float(f) => Some(*f as i64),
                        _ => None,
                    })
                    .collect(),
            )
        } else {
            ColumnData::Float(
                cells
                    .iter()
                    .map(|cell| match cell {
                        RawCell::Int(i) => Some(*i as f64),
                        RawCell::Float(f) => Some(*f),
                        _ => None,
                    })
                    .collect(),
            )
        };
    }
    if all(|cell| matches!(cell, RawCell::Bool(_))) {
        return ColumnData::Boolean(
            cells
                .iter()
                .map(|cell| match cell {
                    RawCell::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect(),
        );
    }
    if all(|cell| matches!(cell, RawCell::DateTime(_))) {
        return ColumnData::DateTime(
            cells
                .iter()
                .map(|cell| match cell {
                    RawCell::DateTime(dt) => Some(*dt),
                    _ => None,
                })
                .collect(),
        );
    }
    ColumnData::Text(cells.iter().map(RawCell::to_text).collect())
}

#[expect(clippy::cast_precision_loss)]
fn is_whole(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64
}

/// Loads datasets, reusing tables parsed from identical file contents.
#[derive(Debug, Default)]
pub struct DatasetLoader {
    cache: Memo<(FileFormat, [u8; 32]), Table>,
}

impl DatasetLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the dataset at `path`.
    ///
    /// The file is read on every call; parsing only happens when its contents
    /// differ from every previously loaded file.
    pub fn load(&mut self, path: &Path) -> Result<Arc<Table>, LoadError> {
        let (format, bytes) = read_source(path)?;
        let digest: [u8; 32] = Sha256::digest(&bytes).into();
        let key = (format, digest);
        if self.cache.contains(&key) {
            tracing::debug!(path = %path.display(), "dataset unchanged, reusing parsed table");
        }
        self.cache.get_or_try_insert_with(key, || {
            let table = parse_table(&bytes, format)?;
            let (rows, columns) = table.shape();
            tracing::debug!(path = %path.display(), rows, columns, "parsed dataset");
            Ok(Arc::new(table))
        })
    }

    #[must_use]
    pub fn cache_stats(&self) -> MemoStats {
        self.cache.stats()
    }
}
