//! Confidence intervals for a population mean
//!
//! The interval is the classic two-sided Student t interval under unknown
//! variance:
//!
//! ```text
//! mean ± t(1 - α/2, n - 1) · s / √n
//! ```
//!
//! where `s` is the Bessel-corrected sample standard deviation.
//!
//! A degenerate sample (a single value, or all values equal) cannot support an
//! interval: the point estimate is still reported, the bounds are `None`.
//!
//! # Examples
//!
//! ```
//! use vitrine_stats::confidence::{DEFAULT_ALPHA, MeanEstimate};
//!
//! let estimate = MeanEstimate::new(&[10.0, 12.0, 11.0, 13.0], DEFAULT_ALPHA);
//! assert_eq!(estimate.mean, Some(11.5));
//! let interval = estimate.interval.unwrap();
//! assert!(interval.lower < 11.5 && 11.5 < interval.upper);
//!
//! let degenerate = MeanEstimate::new(&[4.0, 4.0, 4.0], DEFAULT_ALPHA);
//! assert_eq!(degenerate.mean, Some(4.0));
//! assert!(degenerate.interval.is_none());
//! ```

use serde::Serialize;
use statrs::distribution::{ContinuousCDF as _, StudentsT};

use crate::descriptive;

/// Significance level used throughout the analysis (95% confidence).
pub const DEFAULT_ALPHA: f64 = 0.05;

/// A closed interval `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    /// Distance between the bounds.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Whether `value` lies within the interval (bounds included).
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Point estimate and confidence interval for the mean of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeanEstimate {
    /// Number of values the estimate is based on.
    pub count: usize,
    /// Sample mean, `None` for an empty sample.
    pub mean: Option<f64>,
    /// Confidence interval for the mean, `None` for degenerate samples.
    pub interval: Option<ConfidenceInterval>,
}

impl MeanEstimate {
    /// Estimates the mean of `values` with a `100 * (1 - alpha)`% interval.
    ///
    /// `values` must not contain `NaN`; use [`Self::from_optional`] for data
    /// with missing entries.
    ///
    /// # Panics
    ///
    /// Panics if `alpha` is not strictly between 0 and 1.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(values: &[f64], alpha: f64) -> Self {
        assert!(
            alpha > 0.0 && alpha < 1.0,
            "alpha must lie strictly between 0 and 1, got {alpha}"
        );

        let count = values.len();
        let mean = descriptive::mean(values);
        let interval = mean.zip(descriptive::sample_std_dev(values)).and_then(
            |(mean, std_dev)| {
                if std_dev.is_nan() || std_dev == 0.0 {
                    return None;
                }
                let critical = t_critical_value(alpha, count - 1)?;
                let margin = critical * std_dev / (count as f64).sqrt();
                Some(ConfidenceInterval {
                    lower: mean - margin,
                    upper: mean + margin,
                })
            },
        );

        Self {
            count,
            mean,
            interval,
        }
    }

    /// Like [`Self::new`], but drops missing (`None` or `NaN`) entries first.
    ///
    /// ```
    /// # use vitrine_stats::confidence::{DEFAULT_ALPHA, MeanEstimate};
    /// let estimate = MeanEstimate::from_optional([Some(1.0), None, Some(3.0)], DEFAULT_ALPHA);
    /// assert_eq!(estimate.count, 2);
    /// assert_eq!(estimate.mean, Some(2.0));
    /// ```
    #[must_use]
    pub fn from_optional<I>(values: I, alpha: f64) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let values = values
            .into_iter()
            .flatten()
            .filter(|v| !v.is_nan())
            .collect::<Vec<_>>();
        Self::new(&values, alpha)
    }
}

/// Two-tailed critical value of the Student t distribution.
///
/// Returns the `1 - alpha / 2` quantile with `degrees_of_freedom` degrees of
/// freedom, or `None` when the distribution is undefined (zero degrees of
/// freedom).
///
/// ```
/// # use vitrine_stats::confidence::t_critical_value;
/// let t = t_critical_value(0.05, 10).unwrap();
/// assert!((t - 2.228).abs() < 1e-3);
/// assert!(t_critical_value(0.05, 0).is_none());
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn t_critical_value(alpha: f64, degrees_of_freedom: usize) -> Option<f64> {
    let dist = StudentsT::new(0.0, 1.0, degrees_of_freedom as f64).ok()?;
    Some(dist.inverse_cdf(1.0 - alpha / 2.0))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng as _;
    use rand_distr::{Distribution as _, Normal};
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_empty_sample_has_no_estimate() {
        let estimate = MeanEstimate::new(&[], DEFAULT_ALPHA);
        assert_eq!(estimate.count, 0);
        assert_eq!(estimate.mean, None);
        assert_eq!(estimate.interval, None);
    }

    #[test]
    fn test_single_value_has_mean_but_no_interval() {
        let estimate = MeanEstimate::new(&[7.5], DEFAULT_ALPHA);
        assert_eq!(estimate.mean, Some(7.5));
        assert_eq!(estimate.interval, None);
    }

    #[test]
    fn test_zero_variance_has_no_interval() {
        let estimate = MeanEstimate::new(&[2.0, 2.0, 2.0, 2.0], DEFAULT_ALPHA);
        assert_eq!(estimate.mean, Some(2.0));
        assert_eq!(estimate.interval, None);
    }

    #[test]
    fn test_known_interval() {
        // mean 11.5, s = sqrt(5/3), n = 4, t(0.975, 3) = 3.182446
        let estimate = MeanEstimate::new(&[10.0, 12.0, 11.0, 13.0], DEFAULT_ALPHA);
        let interval = estimate.interval.unwrap();
        let margin = 3.182_446 * (5.0_f64 / 3.0).sqrt() / 2.0;
        assert!((interval.lower - (11.5 - margin)).abs() < 1e-4);
        assert!((interval.upper - (11.5 + margin)).abs() < 1e-4);
    }

    #[test]
    fn test_missing_values_are_dropped() {
        let estimate =
            MeanEstimate::from_optional([Some(1.0), None, Some(f64::NAN), Some(5.0)], 0.05);
        assert_eq!(estimate.count, 2);
        assert_eq!(estimate.mean, Some(3.0));
        assert!(estimate.interval.is_some());
    }

    #[test]
    fn test_wider_confidence_gives_wider_interval() {
        let values = [3.0, 4.5, 2.0, 8.0, 5.5, 6.0];
        let narrow = MeanEstimate::new(&values, 0.10).interval.unwrap();
        let wide = MeanEstimate::new(&values, 0.01).interval.unwrap();
        assert!(wide.width() > narrow.width());
    }

    #[test]
    #[should_panic(expected = "alpha must lie strictly between 0 and 1")]
    fn test_invalid_alpha_panics() {
        let _ = MeanEstimate::new(&[1.0, 2.0], 1.5);
    }

    #[test]
    fn test_coverage_of_normal_samples() {
        // 95% intervals over repeated normal samples should cover the true
        // mean in roughly 95% of cases.
        let mut rng = Pcg32::seed_from_u64(7);
        let normal = Normal::new(50.0, 10.0).unwrap();
        let trials = 2000;
        let covered = (0..trials)
            .filter(|_| {
                let values = (0..15).map(|_| normal.sample(&mut rng)).collect::<Vec<_>>();
                MeanEstimate::new(&values, DEFAULT_ALPHA)
                    .interval
                    .unwrap()
                    .contains(50.0)
            })
            .count();
        let rate = f64::from(u32::try_from(covered).unwrap()) / f64::from(trials);
        assert!((0.92..0.98).contains(&rate), "coverage rate {rate}");
    }

    proptest! {
        #[test]
        fn prop_interval_defined_iff_not_degenerate(
            values in prop::collection::vec(-100i32..100, 0..30)
        ) {
            let values = values.into_iter().map(f64::from).collect::<Vec<_>>();
            let estimate = MeanEstimate::new(&values, DEFAULT_ALPHA);
            let degenerate = values.len() <= 1
                || descriptive::sample_std_dev(&values).is_none_or(|s| s == 0.0);
            prop_assert_eq!(estimate.interval.is_none(), degenerate);
            if let (Some(mean), Some(interval)) = (estimate.mean, estimate.interval) {
                prop_assert!(interval.lower < mean);
                prop_assert!(mean < interval.upper);
            }
        }
    }
}
