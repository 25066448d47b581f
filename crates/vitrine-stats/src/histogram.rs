use std::ops::Range;

use serde::Serialize;

/// A histogram representation of a dataset's distribution.
///
/// The histogram divides the data range into equal-width bins and counts the
/// frequency of values falling into each bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// The bins comprising the histogram, in ascending order.
    pub bins: Vec<HistogramBin>,
}

/// A single bin in a histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    /// The range of values covered by this bin (inclusive start, exclusive end).
    pub range: Range<f64>,
    /// The number of values that fall within this bin's range.
    pub count: u64,
}

impl Histogram {
    /// Number of bins used when the caller has no preference.
    pub const DEFAULT_NUM_BINS: usize = 30;

    /// Creates a histogram from unsorted values.
    ///
    /// # Arguments
    ///
    /// * `values` - The data points to create the histogram from. Will be sorted internally.
    /// * `num_bins` - The number of bins to create.
    /// * `explicit_min` - If provided, overrides the lower bound of the first bin.
    /// * `explicit_max` - If provided, overrides the upper bound of the last bin.
    ///
    /// Values outside an explicit range are not counted.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vitrine_stats::histogram::Histogram;
    /// let values = [5.0, 2.0, 8.0, 1.0, 9.0, 3.0, 7.0, 4.0, 6.0, 10.0];
    /// let histogram = Histogram::new(values, 3, None, None);
    /// assert_eq!(histogram.bins.len(), 3);
    /// assert_eq!(histogram.total_count(), 10);
    /// ```
    #[must_use]
    pub fn new<I>(
        values: I,
        num_bins: usize,
        explicit_min: Option<f64>,
        explicit_max: Option<f64>,
    ) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values.into_iter().collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, num_bins, explicit_min, explicit_max)
    }

    /// Creates a histogram from pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vitrine_stats::histogram::Histogram;
    /// // A single distinct value gets one unit-wide bin centered on it
    /// let histogram = Histogram::from_sorted(&[4.0, 4.0], 30, None, None);
    /// assert_eq!(histogram.bins.len(), 1);
    /// assert_eq!(histogram.bins[0].range, 3.5..4.5);
    /// assert_eq!(histogram.bins[0].count, 2);
    /// ```
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    #[must_use]
    pub fn from_sorted(
        sorted_values: &[f64],
        num_bins: usize,
        explicit_min: Option<f64>,
        explicit_max: Option<f64>,
    ) -> Self {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        if sorted_values.is_empty() || num_bins == 0 {
            return Self { bins: vec![] };
        }

        let min = explicit_min.unwrap_or(sorted_values[0]);
        let max = explicit_max.unwrap_or(sorted_values[sorted_values.len() - 1]);

        if max - min < f64::EPSILON * min.abs().max(1.0) {
            // Distribution is concentrated at a single value
            let range = (min - 0.5)..(min + 0.5);
            let count = sorted_values.iter().filter(|v| range.contains(v)).count() as u64;
            return Self {
                bins: vec![HistogramBin { range, count }],
            };
        }

        let bin_width = (max - min) / num_bins as f64;
        let mut bins = (0..num_bins)
            .map(|bin_idx| {
                // Recompute boundaries from `min` to avoid floating-point accumulation errors
                let start = min + bin_idx as f64 * bin_width;
                let end = if bin_idx == num_bins - 1 {
                    // Last bin is closed on the right so that `max` is counted
                    max.next_up()
                } else {
                    min + (bin_idx + 1) as f64 * bin_width
                };
                HistogramBin {
                    range: start..end,
                    count: 0,
                }
            })
            .collect::<Vec<_>>();

        for &val in sorted_values {
            if val < min || val > max {
                continue;
            }
            let mut idx = (((val - min) / bin_width).floor() as usize).min(num_bins - 1);
            // Rounding in the division may land one bin off near a boundary
            while idx > 0 && val < bins[idx].range.start {
                idx -= 1;
            }
            while idx < num_bins - 1 && val >= bins[idx].range.end {
                idx += 1;
            }
            bins[idx].count += 1;
        }

        Self { bins }
    }

    /// Total number of values counted across all bins.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.bins.iter().map(|bin| bin.count).sum()
    }

    /// Largest single-bin count, zero for an empty histogram.
    #[must_use]
    pub fn max_count(&self) -> u64 {
        self.bins.iter().map(|bin| bin.count).max().unwrap_or(0)
    }
}
