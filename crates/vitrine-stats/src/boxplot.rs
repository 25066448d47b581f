use serde::Serialize;

use crate::percentiles::Percentiles;

/// Five-number summary with Tukey fences, the data behind a box plot.
///
/// Whiskers extend to the most extreme values within 1.5 × IQR of the
/// quartiles; anything beyond is reported as an outlier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxPlotSummary {
    pub count: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    /// Values outside the fences, in ascending order.
    pub outliers: Vec<f64>,
}

impl BoxPlotSummary {
    const FENCE_FACTOR: f64 = 1.5;

    /// Summarizes unsorted values, `None` for an empty dataset.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vitrine_stats::boxplot::BoxPlotSummary;
    /// let summary = BoxPlotSummary::new([1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).unwrap();
    /// assert_eq!(summary.median, 3.5);
    /// assert_eq!(summary.upper_whisker, 5.0);
    /// assert_eq!(summary.outliers, vec![100.0]);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values.into_iter().collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted)
    }

    /// Summarizes pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        if sorted_values.is_empty() {
            return None;
        }
        let quartiles = Percentiles::from_sorted(sorted_values, &[25.0, 50.0, 75.0]);
        let q1 = quartiles.get(25.0)?;
        let median = quartiles.get(50.0)?;
        let q3 = quartiles.get(75.0)?;

        let iqr = q3 - q1;
        let low_fence = q1 - Self::FENCE_FACTOR * iqr;
        let high_fence = q3 + Self::FENCE_FACTOR * iqr;
        let inside = || {
            sorted_values
                .iter()
                .copied()
                .filter(|v| (low_fence..=high_fence).contains(v))
        };
        let lower_whisker = inside().next()?;
        let upper_whisker = inside().last()?;
        let outliers = sorted_values
            .iter()
            .copied()
            .filter(|v| !(low_fence..=high_fence).contains(v))
            .collect();

        Some(Self {
            count: sorted_values.len(),
            q1,
            median,
            q3,
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}
