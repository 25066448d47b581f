use std::sync::Arc;

use crate::{classify::ColumnClassification, table::Table};

/// A loaded table together with its column classification.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub table: Arc<Table>,
    pub classification: ColumnClassification,
}

impl Dataset {
    #[must_use]
    pub fn new(table: Arc<Table>) -> Self {
        let classification = ColumnClassification::from_table(&table);
        Self {
            table,
            classification,
        }
    }
}
