use serde::Serialize;

use crate::percentiles;

/// Descriptive statistics summarizing a dataset.
///
/// This structure contains common measures of central tendency and
/// dispersion for a non-empty dataset of `f64` values. Dispersion uses the
/// sample (Bessel-corrected, divisor `n - 1`) estimators and is therefore
/// undefined for a single value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DescriptiveStats {
    /// The number of values in the dataset.
    pub count: usize,
    /// The minimum value in the dataset.
    pub min: f64,
    /// The maximum value in the dataset.
    pub max: f64,
    /// The arithmetic mean (average) of the dataset.
    pub mean: f64,
    /// The median value of the dataset.
    ///
    /// For an even number of values this is the midpoint of the two central values.
    pub median: f64,
    /// The sample variance of the dataset, `None` with fewer than two values.
    pub variance: Option<f64>,
    /// The sample standard deviation of the dataset, `None` with fewer than two values.
    pub std_dev: Option<f64>,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// This method will sort the values internally before computing statistics.
    ///
    /// # Arguments
    ///
    /// * `values` - An iterator over `f64` values. Must not contain `NaN`;
    ///   callers drop missing values before calling.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the dataset contains at least one value
    /// * `None` - if the dataset is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use vitrine_stats::descriptive::DescriptiveStats;
    /// let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
    /// let stats = DescriptiveStats::new(values).unwrap();
    /// assert_eq!(stats.count, 6);
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 100.0);
    /// assert_eq!(stats.median, 3.5);
    /// assert!((stats.mean - 19.1667).abs() < 1e-4);
    /// assert!((stats.std_dev.unwrap() - 39.6253).abs() < 1e-4);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes descriptive statistics from pre-sorted values.
    ///
    /// This is an optimized version that skips the sorting step.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order
    /// (which includes the case of a `NaN` entry).
    ///
    /// # Examples
    ///
    /// ```
    /// # use vitrine_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::from_sorted(&[42.0]).unwrap();
    /// assert_eq!(stats.mean, 42.0);
    /// assert_eq!(stats.std_dev, None);
    /// ```
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let mean = mean(sorted_values)?;
        let median = percentiles::compute_percentile(sorted_values, 50.0);
        let variance = sample_variance(sorted_values);
        let std_dev = variance.map(f64::sqrt);

        Some(Self {
            count: sorted_values.len(),
            min,
            max,
            mean,
            median,
            variance,
            std_dev,
        })
    }
}

/// Arithmetic mean, `None` for an empty slice.
///
/// ```
/// # use vitrine_stats::descriptive::mean;
/// assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
/// assert_eq!(mean(&[]), None);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance with Bessel's correction (divisor `n - 1`).
///
/// Returns `None` when fewer than two values are given.
///
/// ```
/// # use vitrine_stats::descriptive::sample_variance;
/// assert_eq!(sample_variance(&[2.0, 4.0, 6.0]), Some(4.0));
/// assert_eq!(sample_variance(&[2.0]), None);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let sum_sq = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    Some(sum_sq / (values.len() - 1) as f64)
}

/// Sample standard deviation, the square root of [`sample_variance`].
#[must_use]
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_empty_values() {
        assert!(DescriptiveStats::new(Vec::<f64>::new()).is_none());
    }

    #[test]
    fn test_qty_summary() {
        let stats = DescriptiveStats::new([1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).unwrap();
        assert_eq!(stats.count, 6);
        assert!((stats.mean - 115.0 / 6.0).abs() < 1e-12);
        assert_eq!(stats.median, 3.5);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 100.0);
        let variance = stats.variance.unwrap();
        assert!((variance - 1570.166_666_666_667).abs() < 1e-6);
        assert!((stats.std_dev.unwrap() - variance.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_single_value_has_no_dispersion() {
        let stats = DescriptiveStats::new([3.0]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.variance, None);
        assert_eq!(stats.std_dev, None);
    }

    #[test]
    fn test_constant_values_have_zero_variance() {
        let stats = DescriptiveStats::new([5.0, 5.0, 5.0]).unwrap();
        assert_eq!(stats.variance, Some(0.0));
        assert_eq!(stats.std_dev, Some(0.0));
    }

    #[test]
    #[should_panic(expected = "values must be sorted")]
    fn test_from_sorted_rejects_unsorted() {
        let _ = DescriptiveStats::from_sorted(&[2.0, 1.0]);
    }

    proptest! {
        #[test]
        fn prop_min_median_max_are_ordered(values in prop::collection::vec(-1e6f64..1e6, 1..200)) {
            let stats = DescriptiveStats::new(values.iter().copied()).unwrap();
            prop_assert_eq!(stats.count, values.len());
            prop_assert!(stats.min <= stats.median);
            prop_assert!(stats.median <= stats.max);
            prop_assert!(stats.min <= stats.mean + 1e-6);
            prop_assert!(stats.mean <= stats.max + 1e-6);
        }

        #[test]
        fn prop_variance_defined_iff_two_values(
            values in prop::collection::vec(-1e3f64..1e3, 1..20)
        ) {
            let stats = DescriptiveStats::new(values.iter().copied()).unwrap();
            prop_assert_eq!(stats.variance.is_some(), values.len() >= 2);
            if let Some(variance) = stats.variance {
                prop_assert!(variance >= 0.0);
            }
        }
    }
}
