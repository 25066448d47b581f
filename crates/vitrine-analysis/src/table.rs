//! In-memory column-oriented table
//!
//! A [`Table`] is an ordered collection of uniquely named [`Column`]s of equal
//! length. Each column holds values of a single [`ColumnKind`]; every cell may
//! be missing (`None`).
//!
//! Tables are immutable once built. Operations that select rows
//! ([`Table::take_rows`], [`Table::head`]) return new tables. Every table
//! carries a [`TableId`] fingerprint derived from its content, which serves as
//! its identity in memoization keys.
//!
//! # Numeric coercion
//!
//! Statistics work on numbers, so columns can be coerced with
//! [`Column::to_numeric`]:
//!
//! | Kind | Coerced value |
//! |---|---|
//! | integer, float | the value itself |
//! | boolean | `1.0` / `0.0` |
//! | text | trimmed text parsed as `f64`, missing when unparseable |
//! | date-time | nanoseconds since the Unix epoch |
//!
//! # Text form
//!
//! Grouping compares cells by their text form ([`Column::text_at`]).
//! Floats render in shortest round-trip form with a trailing `.0` for whole
//! values, booleans as `True`/`False`, date-times as `YYYY-MM-DD HH:MM:SS`.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::Serialize;
use sha2::{Digest as _, Sha256};

/// Content fingerprint of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TableId(u64);

/// Value type of a column.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
pub enum ColumnKind {
    #[display("Int64")]
    Integer,
    #[display("Float64")]
    Float,
    #[display("boolean")]
    Boolean,
    #[display("string")]
    Text,
    #[display("datetime64[ns]")]
    DateTime,
}

impl ColumnKind {
    /// Whether the kind holds numbers (integers or floating point).
    ///
    /// Booleans are not numeric.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }
}

/// Typed storage of a column's cells.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Integer(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Boolean(Vec<Option<bool>>),
    Text(Vec<Option<String>>),
    DateTime(Vec<Option<NaiveDateTime>>),
}

impl ColumnData {
    #[must_use]
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Integer(_) => ColumnKind::Integer,
            ColumnData::Float(_) => ColumnKind::Float,
            ColumnData::Boolean(_) => ColumnKind::Boolean,
            ColumnData::Text(_) => ColumnKind::Text,
            ColumnData::DateTime(_) => ColumnKind::DateTime,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Integer(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Boolean(v) => v.len(),
            ColumnData::Text(v) => v.len(),
            ColumnData::DateTime(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the cell at `row` is missing.
    ///
    /// `NaN` floats count as missing.
    #[must_use]
    pub fn is_null(&self, row: usize) -> bool {
        match self {
            ColumnData::Integer(v) => v[row].is_none(),
            ColumnData::Float(v) => v[row].is_none_or(f64::is_nan),
            ColumnData::Boolean(v) => v[row].is_none(),
            ColumnData::Text(v) => v[row].is_none(),
            ColumnData::DateTime(v) => v[row].is_none(),
        }
    }

    fn take(&self, indices: &[usize]) -> Self {
        fn pick<T: Clone>(values: &[T], indices: &[usize]) -> Vec<T> {
            indices.iter().map(|&i| values[i].clone()).collect()
        }
        match self {
            ColumnData::Integer(v) => ColumnData::Integer(pick(v, indices)),
            ColumnData::Float(v) => ColumnData::Float(pick(v, indices)),
            ColumnData::Boolean(v) => ColumnData::Boolean(pick(v, indices)),
            ColumnData::Text(v) => ColumnData::Text(pick(v, indices)),
            ColumnData::DateTime(v) => ColumnData::DateTime(pick(v, indices)),
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

/// Result of coercing a column to numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericValues {
    /// One entry per row; `None` for missing or uncoercible cells.
    pub values: Vec<Option<f64>>,
    /// Number of present cells that could not be coerced.
    pub coercion_failures: usize,
}

impl NumericValues {
    /// Present values in row order, missing entries dropped.
    #[must_use]
    pub fn present(&self) -> Vec<f64> {
        self.values.iter().flatten().copied().collect()
    }
}

impl Column {
    #[must_use]
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    #[must_use]
    pub fn kind(&self) -> ColumnKind {
        self.data.kind()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of missing cells.
    #[must_use]
    pub fn null_count(&self) -> usize {
        (0..self.len()).filter(|&row| self.data.is_null(row)).count()
    }

    /// Coerces every cell to `f64`, turning uncoercible cells into missing values.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn to_numeric(&self) -> NumericValues {
        let mut coercion_failures = 0;
        let values = match &self.data {
            ColumnData::Integer(v) => v.iter().map(|c| c.map(|i| i as f64)).collect(),
            ColumnData::Float(v) => v.iter().map(|c| c.filter(|f| !f.is_nan())).collect(),
            ColumnData::Boolean(v) => v
                .iter()
                .map(|c| c.map(|b| if b { 1.0 } else { 0.0 }))
                .collect(),
            ColumnData::Text(v) => v
                .iter()
                .map(|c| {
                    let text = c.as_deref()?;
                    let parsed = text.trim().parse::<f64>().ok().filter(|f| !f.is_nan());
                    if parsed.is_none() {
                        coercion_failures += 1;
                    }
                    parsed
                })
                .collect(),
            ColumnData::DateTime(v) => v
                .iter()
                .map(|c| {
                    c.and_then(|dt| dt.and_utc().timestamp_nanos_opt())
                        .map(|ns| ns as f64)
                })
                .collect(),
        };
        NumericValues {
            values,
            coercion_failures,
        }
    }

    /// Text form of the cell at `row`, `None` when missing.
    #[must_use]
    pub fn text_at(&self, row: usize) -> Option<String> {
        if self.data.is_null(row) {
            return None;
        }
        let text = match &self.data {
            ColumnData::Integer(v) => v[row]?.to_string(),
            ColumnData::Float(v) => format_float(v[row]?),
            ColumnData::Boolean(v) => (if v[row]? { "True" } else { "False" }).to_owned(),
            ColumnData::Text(v) => v[row].clone()?,
            ColumnData::DateTime(v) => v[row]?.format("%Y-%m-%d %H:%M:%S").to_string(),
        };
        Some(text)
    }

    /// Text form of every cell in row order.
    pub fn text_values(&self) -> impl Iterator<Item = Option<String>> + '_ {
        (0..self.len()).map(|row| self.text_at(row))
    }
}

fn format_float(value: f64) -> String {
    // `Debug` keeps the `.0` on whole numbers, which `Display` drops
    format!("{value:?}")
}

/// Errors raised when assembling a table from columns.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum TableError {
    #[display("duplicate column name '{name}'")]
    DuplicateColumn { name: String },
    #[display("column '{name}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
}

/// An immutable table of equally long, uniquely named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    id: TableId,
    row_count: usize,
    columns: Vec<Column>,
}

impl Table {
    /// Builds a table, checking name uniqueness and column lengths.
    ///
    /// # Examples
    ///
    /// ```
    /// use vitrine_analysis::table::{Column, ColumnData, Table};
    ///
    /// let table = Table::new(vec![
    ///     Column::new("Qty", ColumnData::Integer(vec![Some(1), Some(2), None])),
    ///     Column::new("Status", ColumnData::Text(vec![Some("ok".into()), None, None])),
    /// ])
    /// .unwrap();
    /// assert_eq!(table.shape(), (3, 2));
    /// assert_eq!(table.column("Qty").unwrap().null_count(), 1);
    /// ```
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        let row_count = columns.first().map_or(0, Column::len);
        let mut names = HashSet::new();
        for column in &columns {
            if !names.insert(column.name()) {
                return Err(TableError::DuplicateColumn {
                    name: column.name().to_owned(),
                });
            }
            if column.len() != row_count {
                return Err(TableError::LengthMismatch {
                    name: column.name().to_owned(),
                    expected: row_count,
                    actual: column.len(),
                });
            }
        }
        let id = fingerprint(&columns);
        Ok(Self {
            id,
            row_count,
            columns,
        })
    }

    #[must_use]
    pub fn id(&self) -> TableId {
        self.id
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(Column::name)
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count, self.columns.len())
    }

    /// New table holding the given rows, in the given order.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of bounds.
    #[must_use]
    pub fn take_rows(&self, indices: &[usize]) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(c.name.clone(), c.data.take(indices)))
            .collect::<Vec<_>>();
        Self {
            id: fingerprint(&columns),
            row_count: indices.len(),
            columns,
        }
    }

    /// New table holding the first `n` rows.
    #[must_use]
    pub fn head(&self, n: usize) -> Self {
        let indices = (0..n.min(self.row_count)).collect::<Vec<_>>();
        self.take_rows(&indices)
    }
}

fn fingerprint(columns: &[Column]) -> TableId {
    let mut hasher = Sha256::new();
    for column in columns {
        hasher.update(column.name.as_bytes());
        hasher.update([0xff, column.kind() as u8]);
        for row in 0..column.len() {
            match &column.data {
                ColumnData::Integer(v) => hash_cell(&mut hasher, v[row].map(i64::to_le_bytes)),
                ColumnData::Float(v) => {
                    hash_cell(&mut hasher, v[row].map(|f| f.to_bits().to_le_bytes()));
                }
                ColumnData::Boolean(v) => hash_cell(&mut hasher, v[row].map(|b| [u8::from(b)])),
                ColumnData::Text(v) => {
                    hash_cell(&mut hasher, v[row].as_deref().map(str::as_bytes));
                    hasher.update([0xfe]);
                }
                ColumnData::DateTime(v) => hash_cell(
                    &mut hasher,
                    v[row].map(|dt| {
                        let utc = dt.and_utc();
                        let mut bytes = [0; 12];
                        bytes[..8].copy_from_slice(&utc.timestamp().to_le_bytes());
                        bytes[8..].copy_from_slice(&utc.timestamp_subsec_nanos().to_le_bytes());
                        bytes
                    }),
                ),
            }
        }
    }
    let digest = hasher.finalize();
    let mut id = [0; 8];
    id.copy_from_slice(&digest[..8]);
    TableId(u64::from_le_bytes(id))
}

fn hash_cell<B: AsRef<[u8]>>(hasher: &mut Sha256, cell: Option<B>) {
    match cell {
        Some(bytes) => {
            hasher.update([1]);
            hasher.update(bytes.as_ref());
        }
        None => hasher.update([0]),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn sample_table() -> Table {
        Table::new(vec![
            Column::new(
                "Qty",
                ColumnData::Integer(vec![Some(1), Some(2), None, Some(4)]),
            ),
            Column::new(
                "Amount",
                ColumnData::Float(vec![Some(1.5), Some(f64::NAN), Some(3.0), None]),
            ),
            Column::new(
                "B2B",
                ColumnData::Boolean(vec![Some(true), Some(false), None, Some(true)]),
            ),
            Column::new(
                "Note",
                ColumnData::Text(vec![
                    Some(" 12.5 ".into()),
                    Some("abc".into()),
                    None,
                    Some("7".into()),
                ]),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = Table::new(vec![
            Column::new("a", ColumnData::Integer(vec![])),
            Column::new("a", ColumnData::Float(vec![])),
        ])
        .unwrap_err();
        assert!(matches!(err, TableError::DuplicateColumn { name } if name == "a"));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = Table::new(vec![
            Column::new("a", ColumnData::Integer(vec![Some(1)])),
            Column::new("b", ColumnData::Integer(vec![])),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            TableError::LengthMismatch {
                expected: 1,
                actual: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_null_counts_include_nan() {
        let table = sample_table();
        assert_eq!(table.column("Qty").unwrap().null_count(), 1);
        assert_eq!(table.column("Amount").unwrap().null_count(), 2);
        assert_eq!(table.column("B2B").unwrap().null_count(), 1);
    }

    #[test]
    fn test_numeric_coercion() {
        let table = sample_table();
        let note = table.column("Note").unwrap().to_numeric();
        assert_eq!(note.values, vec![Some(12.5), None, None, Some(7.0)]);
        assert_eq!(note.coercion_failures, 1);
        assert_eq!(note.present(), vec![12.5, 7.0]);

        let flags = table.column("B2B").unwrap().to_numeric();
        assert_eq!(flags.values, vec![Some(1.0), Some(0.0), None, Some(1.0)]);

        let amount = table.column("Amount").unwrap().to_numeric();
        assert_eq!(amount.values, vec![Some(1.5), None, Some(3.0), None]);
        assert_eq!(amount.coercion_failures, 0);
    }

    #[test]
    fn test_datetime_coerces_to_epoch_nanos() {
        let dt = NaiveDate::from_ymd_opt(1970, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let column = Column::new("Data", ColumnData::DateTime(vec![Some(dt), None]));
        assert_eq!(column.to_numeric().values, vec![Some(86_400e9), None]);
    }

    #[test]
    fn test_text_forms() {
        let table = sample_table();
        let qty = table.column("Qty").unwrap();
        assert_eq!(qty.text_at(0).as_deref(), Some("1"));
        assert_eq!(qty.text_at(2), None);
        let amount = table.column("Amount").unwrap();
        assert_eq!(amount.text_at(0).as_deref(), Some("1.5"));
        assert_eq!(amount.text_at(1), None);
        assert_eq!(amount.text_at(2).as_deref(), Some("3.0"));
        let flags = table.column("B2B").unwrap();
        assert_eq!(flags.text_at(0).as_deref(), Some("True"));
        assert_eq!(flags.text_at(1).as_deref(), Some("False"));

        let dt = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap();
        let column = Column::new("Data", ColumnData::DateTime(vec![Some(dt)]));
        assert_eq!(column.text_at(0).as_deref(), Some("2024-03-09 14:05:00"));
    }

    #[test]
    fn test_take_rows_and_head() {
        let table = sample_table();
        let taken = table.take_rows(&[3, 0]);
        assert_eq!(taken.shape(), (2, 4));
        assert_eq!(
            taken.column("Qty").unwrap().data(),
            &ColumnData::Integer(vec![Some(4), Some(1)])
        );
        assert_eq!(table.head(2).row_count(), 2);
        assert_eq!(table.head(100).row_count(), 4);
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let table = sample_table();
        assert_eq!(table.id(), sample_table().id());
        assert_eq!(table.take_rows(&[0, 1, 2, 3]).id(), table.id());
        assert_ne!(table.head(3).id(), table.id());

        let text = |cells: [&str; 2]| {
            let cells = cells.iter().map(|s| Some((*s).to_owned())).collect();
            Table::new(vec![Column::new("x", ColumnData::Text(cells))]).unwrap()
        };
        let a = text(["ab", "c"]);
        let b = text(["a", "bc"]);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_empty_table() {
        let table = Table::new(vec![]).unwrap();
        assert_eq!(table.shape(), (0, 0));
    }
}
