//! Numeric/categorical partition of a table's columns

use serde::Serialize;

use crate::table::Table;

/// Column names split by whether they hold numbers.
///
/// Every column lands in exactly one list and both lists keep table order.
/// Integer and floating-point columns are numeric; text, boolean and
/// date-time columns are categorical.
///
/// Boolean columns differ from dataframe libraries that count `bool` as a
/// numeric dtype: here a `True`/`False` column is a grouping column and never
/// enters the default summary. [`crate::summary::describe_columns`] still
/// accepts it by name and reads it as 0/1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnClassification {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
}

impl ColumnClassification {
    #[must_use]
    pub fn from_table(table: &Table) -> Self {
        let (numeric, categorical) = table
            .columns()
            .iter()
            .partition::<Vec<_>, _>(|column| column.kind().is_numeric());
        let names = |columns: Vec<&crate::table::Column>| {
            columns.into_iter().map(|c| c.name().to_owned()).collect()
        };
        Self {
            numeric: names(numeric),
            categorical: names(categorical),
        }
    }

    #[must_use]
    pub fn is_numeric(&self, name: &str) -> bool {
        self.numeric.iter().any(|n| n == name)
    }

    #[must_use]
    pub fn is_categorical(&self, name: &str) -> bool {
        self.categorical.iter().any(|n| n == name)
    }
}
