//! Keyed memoization of derived values
//!
//! [`Memo`] stores computed values behind [`Arc`] so that repeated requests
//! with an equal key share one result instead of recomputing it. Entries are
//! never evicted; a session holds at most a handful of datasets and samples.

use std::{collections::HashMap, hash::Hash, sync::Arc};

/// Hit and miss counters of a [`Memo`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MemoStats {
    pub hits: u64,
    pub misses: u64,
}

/// Unbounded memo table keyed by `K`.
#[derive(Debug)]
pub struct Memo<K, V> {
    entries: HashMap<K, Arc<V>>,
    stats: MemoStats,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            stats: MemoStats::default(),
        }
    }
}

impl<K, V> Memo<K, V>
where
    K: Eq + Hash,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `key`, computing and storing it on a miss.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use vitrine_analysis::cache::Memo;
    ///
    /// let mut memo = Memo::new();
    /// let first = memo.get_or_insert_with("k", || Arc::new(1));
    /// let second = memo.get_or_insert_with("k", || Arc::new(2));
    /// assert!(Arc::ptr_eq(&first, &second));
    /// assert_eq!(memo.stats().hits, 1);
    /// ```
    pub fn get_or_insert_with<F>(&mut self, key: K, compute: F) -> Arc<V>
    where
        F: FnOnce() -> Arc<V>,
    {
        match self.get_or_try_insert_with(key, || Ok::<_, std::convert::Infallible>(compute())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Like [`Memo::get_or_insert_with`], but the computation may fail.
    ///
    /// Failures are not cached; the next request for the key retries.
    pub fn get_or_try_insert_with<F, E>(&mut self, key: K, compute: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Result<Arc<V>, E>,
    {
        if let Some(value) = self.entries.get(&key) {
            self.stats.hits += 1;
            return Ok(Arc::clone(value));
        }
        self.stats.misses += 1;
        let value = compute()?;
        self.entries.insert(key, Arc::clone(&value));
        Ok(value)
    }

    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> MemoStats {
        self.stats
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
