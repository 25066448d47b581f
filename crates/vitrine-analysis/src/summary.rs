//! Descriptive summary table over numeric columns

use serde::Serialize;
use vitrine_stats::descriptive::DescriptiveStats;

use crate::{error::AnalysisError, table::Table};

/// Descriptive statistics of one column.
///
/// `count` is the number of non-missing values after numeric coercion. The
/// location and range fields are `None` for an empty column, `std` and `var`
/// additionally for a column with a single value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
    pub var: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl SummaryRow {
    fn new(column: &str, stats: Option<DescriptiveStats>) -> Self {
        Self {
            column: column.to_owned(),
            count: stats.map_or(0, |s| s.count),
            mean: stats.map(|s| s.mean),
            median: stats.map(|s| s.median),
            std: stats.and_then(|s| s.std_dev),
            var: stats.and_then(|s| s.variance),
            min: stats.map(|s| s.min),
            max: stats.map(|s| s.max),
        }
    }
}

/// Summarizes the requested columns, in request order.
///
/// Cells that do not coerce to numbers are treated as missing.
///
/// # Examples
///
/// ```
/// use vitrine_analysis::{summary::describe_columns, table::{Column, ColumnData, Table}};
///
/// let qty = [1, 2, 3, 4, 5, 100].into_iter().map(Some).collect();
/// let table = Table::new(vec![Column::new("Qty", ColumnData::Integer(qty))]).unwrap();
/// let rows = describe_columns(&table, &["Qty"]).unwrap();
/// assert_eq!(rows[0].median, Some(3.5));
/// assert_eq!(rows[0].max, Some(100.0));
/// ```
pub fn describe_columns<S>(table: &Table, columns: &[S]) -> Result<Vec<SummaryRow>, AnalysisError>
where
    S: AsRef<str>,
{
    columns
        .iter()
        .map(|name| {
            let name = name.as_ref();
            let column = table
                .column(name)
                .ok_or_else(|| AnalysisError::UnknownColumn {
                    name: name.to_owned(),
                })?;
            let numeric = column.to_numeric();
            if numeric.coercion_failures > 0 {
                tracing::warn!(
                    column = name,
                    failures = numeric.coercion_failures,
                    "non-numeric cells treated as missing"
                );
            }
            Ok(SummaryRow::new(name, DescriptiveStats::new(numeric.present())))
        })
        .collect()
}

/// Picks the columns to summarize.
///
/// Keeps requested names that are numeric, in request order and without
/// repeats, up to `max` of them. With no request, the first `max` numeric
/// columns are used.
#[must_use]
pub fn select_columns<S>(requested: &[S], numeric: &[String], max: usize) -> Vec<String>
where
    S: AsRef<str>,
{
    if requested.is_empty() {
        return numeric.iter().take(max).cloned().collect();
    }
    let mut selected = Vec::new();
    for name in requested.iter().map(AsRef::as_ref) {
        if selected.len() == max {
            break;
        }
        if numeric.iter().any(|n| n == name) && !selected.iter().any(|s| s == name) {
            selected.push(name.to_owned());
        }
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, ColumnData};

    fn sales_table() -> Table {
        Table::new(vec![
            Column::new(
                "Qty",
                ColumnData::Integer([1, 2, 3, 4, 5, 100].into_iter().map(Some).collect()),
            ),
            Column::new(
                "Amount",
                ColumnData::Float(vec![Some(10.0), None, None, None, None, None]),
            ),
            Column::new("Empty", ColumnData::Float(vec![None; 6])),
            Column::new(
                "Note",
                ColumnData::Text(vec![
                    Some("1".into()),
                    Some("x".into()),
                    Some("3".into()),
                    None,
                    None,
                    None,
                ]),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_qty_summary() {
        let rows = describe_columns(&sales_table(), &["Qty"]).unwrap();
        let qty = &rows[0];
        assert_eq!(qty.column, "Qty");
        assert_eq!(qty.count, 6);
        assert!((qty.mean.unwrap() - 19.166_667).abs() < 1e-5);
        assert_eq!(qty.median, Some(3.5));
        assert!((qty.std.unwrap() - 39.625_3).abs() < 1e-4);
        assert!((qty.var.unwrap() - 1570.166_667).abs() < 1e-5);
        assert_eq!(qty.min, Some(1.0));
        assert_eq!(qty.max, Some(100.0));
    }

    #[test]
    fn test_rows_follow_request_order() {
        let rows = describe_columns(&sales_table(), &["Amount", "Qty"]).unwrap();
        let names = rows.iter().map(|r| r.column.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["Amount", "Qty"]);
    }

    #[test]
    fn test_degenerate_columns() {
        let rows = describe_columns(&sales_table(), &["Amount", "Empty"]).unwrap();
        let single = &rows[0];
        assert_eq!(single.count, 1);
        assert_eq!(single.mean, Some(10.0));
        assert_eq!(single.std, None);
        assert_eq!(single.var, None);

        let empty = &rows[1];
        assert_eq!(empty.count, 0);
        assert_eq!(empty.mean, None);
        assert_eq!(empty.median, None);
        assert_eq!(empty.min, None);
    }

    #[test]
    fn test_text_is_coerced() {
        let rows = describe_columns(&sales_table(), &["Note"]).unwrap();
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[0].mean, Some(2.0));
    }

    #[test]
    fn test_empty_request() {
        let rows = describe_columns::<&str>(&sales_table(), &[]).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_unknown_column() {
        let err = describe_columns(&sales_table(), &["Nope"]).unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownColumn { name } if name == "Nope"));
    }

    #[test]
    fn test_select_columns() {
        let numeric = ["a", "b", "c", "d"].map(String::from);
        assert_eq!(select_columns::<&str>(&[], &numeric, 2), vec!["a", "b"]);
        assert_eq!(
            select_columns(&["d", "x", "d", "a", "b"], &numeric, 2),
            vec!["d", "a"]
        );
        assert!(select_columns(&["x"], &numeric, 5).is_empty());
    }
}
