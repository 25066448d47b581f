//! Seeded row sampling
//!
//! Statistics and plots run on a uniform random subset of the table's rows
//! when the table is large. Sampling is reproducible: the same table, size and
//! seed always select the same rows.
//!
//! Selection uses [`rand::seq::index::sample`] over a [`Pcg32`] generator
//! seeded from the requested seed, so rows are drawn without replacement. The
//! selected rows are returned in their original table order.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use vitrine_analysis::{
//!     sample::{SampleSpec, sample_rows},
//!     table::{Column, ColumnData, Table},
//! };
//!
//! let values = (0..100).map(Some).collect();
//! let table = Arc::new(Table::new(vec![Column::new("n", ColumnData::Integer(values))]).unwrap());
//!
//! let sample = sample_rows(&table, SampleSpec::new(10, 42));
//! assert_eq!(sample.row_count(), 10);
//!
//! // Asking for at least every row returns the table itself
//! let full = sample_rows(&table, SampleSpec::new(500, 42));
//! assert!(Arc::ptr_eq(&full, &table));
//! ```

use std::sync::Arc;

use rand::SeedableRng as _;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{
    cache::{Memo, MemoStats},
    table::{Table, TableId},
};

/// Requested sample size and seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleSpec {
    pub size: usize,
    pub seed: u64,
}

impl SampleSpec {
    pub const DEFAULT_SEED: u64 = 42;

    #[must_use]
    pub fn new(size: usize, seed: u64) -> Self {
        Self { size, seed }
    }

    #[must_use]
    pub fn with_default_seed(size: usize) -> Self {
        Self::new(size, Self::DEFAULT_SEED)
    }
}

/// Row indices of a sample, ascending.
#[must_use]
pub fn sample_indices(row_count: usize, spec: SampleSpec) -> Vec<usize> {
    if spec.size >= row_count {
        return (0..row_count).collect();
    }
    let mut rng = Pcg32::seed_from_u64(spec.seed);
    let mut indices = rand::seq::index::sample(&mut rng, row_count, spec.size).into_vec();
    indices.sort_unstable();
    indices
}

/// Samples `spec.size` rows of `table`.
///
/// Returns the same [`Arc`] when the table has no more rows than requested.
#[must_use]
pub fn sample_rows(table: &Arc<Table>, spec: SampleSpec) -> Arc<Table> {
    if spec.size >= table.row_count() {
        return Arc::clone(table);
    }
    let indices = sample_indices(table.row_count(), spec);
    Arc::new(table.take_rows(&indices))
}

/// Memoizing front of [`sample_rows`].
#[derive(Debug, Default)]
pub struct Sampler {
    cache: Memo<(TableId, SampleSpec), Table>,
}

impl Sampler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample of `table`, reused for repeated `(table, size, seed)` requests.
    pub fn sample(&mut self, table: &Arc<Table>, spec: SampleSpec) -> Arc<Table> {
        if spec.size >= table.row_count() {
            return Arc::clone(table);
        }
        self.cache.get_or_insert_with((table.id(), spec), || {
            tracing::debug!(
                rows = table.row_count(),
                size = spec.size,
                seed = spec.seed,
                "drawing sample"
            );
            sample_rows(table, spec)
        })
    }

    #[must_use]
    pub fn cache_stats(&self) -> MemoStats {
        self.cache.stats()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::table::{Column, ColumnData};

    fn numbered_table(rows: usize) -> Arc<Table> {
        let values = (0..rows).map(|i| Some(i64::try_from(i).unwrap())).collect();
        Arc::new(Table::new(vec![Column::new("row", ColumnData::Integer(values))]).unwrap())
    }

    fn row_values(table: &Table) -> Vec<i64> {
        match table.column("row").unwrap().data() {
            ColumnData::Integer(values) => values.iter().map(|v| v.unwrap()).collect(),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_same_seed_same_rows() {
        let table = numbered_table(1000);
        let a = sample_rows(&table, SampleSpec::new(50, 7));
        let b = sample_rows(&table, SampleSpec::new(50, 7));
        assert_eq!(row_values(&a), row_values(&b));
    }

    #[test]
    fn test_different_seed_different_rows() {
        let table = numbered_table(1000);
        let a = sample_rows(&table, SampleSpec::new(50, 1));
        let b = sample_rows(&table, SampleSpec::new(50, 2));
        assert_ne!(row_values(&a), row_values(&b));
    }

    #[test]
    fn test_size_at_least_rows_returns_table() {
        let table = numbered_table(30);
        assert!(Arc::ptr_eq(&sample_rows(&table, SampleSpec::new(30, 0)), &table));
        assert!(Arc::ptr_eq(&sample_rows(&table, SampleSpec::new(31, 0)), &table));
    }

    #[test]
    fn test_zero_size() {
        let table = numbered_table(10);
        assert_eq!(sample_rows(&table, SampleSpec::new(0, 0)).row_count(), 0);
    }

    #[test]
    fn test_sampler_memoizes() {
        let table = numbered_table(100);
        let mut sampler = Sampler::new();
        let a = sampler.sample(&table, SampleSpec::with_default_seed(10));
        let b = sampler.sample(&table, SampleSpec::with_default_seed(10));
        let c = sampler.sample(&table, SampleSpec::with_default_seed(11));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(c.row_count(), 11);
        assert_eq!(sampler.cache_stats(), MemoStats { hits: 1, misses: 2 });
    }

    proptest! {
        #[test]
        fn prop_sample_is_ordered_subset(rows in 0usize..300, size in 0usize..400, seed: u64) {
            let table = numbered_table(rows);
            let sample = sample_rows(&table, SampleSpec::new(size, seed));
            let values = row_values(&sample);
            prop_assert_eq!(values.len(), size.min(rows));
            // strictly increasing: no duplicates and original order kept
            prop_assert!(values.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(values.iter().all(|&v| (0..rows as i64).contains(&v)));
        }
    }
}
