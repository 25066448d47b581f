//! Per-column type and missing-value report

use serde::Serialize;

use crate::table::{ColumnKind, Table};

/// One row of the type report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnTypeReport {
    pub column: String,
    pub kind: ColumnKind,
    /// Type name as shown to users (`Int64`, `string`, ...).
    pub dtype: String,
    /// Share of missing cells in percent, rounded to two decimals.
    pub null_percent: f64,
}

/// Reports every column of `table` in table order.
///
/// The missing share is `0` for a table without rows.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn type_report(table: &Table) -> Vec<ColumnTypeReport> {
    let rows = table.row_count();
    table
        .columns()
        .iter()
        .map(|column| {
            let null_percent = if rows == 0 {
                0.0
            } else {
                round2(column.null_count() as f64 / rows as f64 * 100.0)
            };
            ColumnTypeReport {
                column: column.name().to_owned(),
                kind: column.kind(),
                dtype: column.kind().to_string(),
                null_percent,
            }
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Cells of a table in text form, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePreview {
    pub columns: Vec<String>,
    /// Row-major cells; `None` marks a missing value.
    pub rows: Vec<Vec<Option<String>>>,
}

impl TablePreview {
    #[must_use]
    pub fn new(table: &Table) -> Self {
        let columns = table.column_names().map(str::to_owned).collect();
        let rows = (0..table.row_count())
            .map(|row| table.columns().iter().map(|c| c.text_at(row)).collect())
            .collect();
        Self { columns, rows }
    }
}
