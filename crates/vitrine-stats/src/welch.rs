//! Welch's unequal-variance two-sample t-test
//!
//! Tests whether two independent samples share a population mean without
//! assuming equal variances or equal sizes:
//!
//! ```text
//! t  = (mean_a - mean_b) / sqrt(var_a / n_a + var_b / n_b)
//! df = (var_a / n_a + var_b / n_b)^2
//!      / ((var_a / n_a)^2 / (n_a - 1) + (var_b / n_b)^2 / (n_b - 1))
//! ```
//!
//! The degrees of freedom follow the Welch–Satterthwaite approximation and the
//! p-value is two-tailed.
//!
//! # Examples
//!
//! ```
//! use vitrine_stats::welch::WelchTTest;
//!
//! let a = [10.0, 12.0, 11.0, 13.0];
//! let b = [20.0, 22.0, 21.0, 19.0];
//! let test = WelchTTest::new(&a, &b).unwrap();
//!
//! assert_eq!(test.mean_difference, -9.0);
//! assert!(test.t_statistic < 0.0);
//! assert!(test.p_value < 0.05);
//! ```

use serde::Serialize;
use statrs::distribution::{ContinuousCDF as _, StudentsT};

use crate::descriptive;

/// Result of Welch's t-test between samples A and B.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WelchTTest {
    /// Mean of sample A.
    pub mean_a: f64,
    /// Mean of sample B.
    pub mean_b: f64,
    /// `mean_a - mean_b`.
    pub mean_difference: f64,
    /// Test statistic; its sign follows `mean_difference`.
    pub t_statistic: f64,
    /// Welch–Satterthwaite degrees of freedom (generally non-integer).
    pub degrees_of_freedom: f64,
    /// Two-tailed p-value.
    pub p_value: f64,
}

impl WelchTTest {
    /// Runs the test on two samples without missing values.
    ///
    /// Returns `None` when the statistic is undefined: either sample has fewer
    /// than two values, or both samples have zero variance.
    ///
    /// ```
    /// # use vitrine_stats::welch::WelchTTest;
    /// assert!(WelchTTest::new(&[1.0], &[2.0, 3.0]).is_none());
    /// assert!(WelchTTest::new(&[1.0, 1.0], &[2.0, 2.0]).is_none());
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(a: &[f64], b: &[f64]) -> Option<Self> {
        if a.len() < 2 || b.len() < 2 {
            return None;
        }
        let n_a = a.len() as f64;
        let n_b = b.len() as f64;
        let mean_a = descriptive::mean(a)?;
        let mean_b = descriptive::mean(b)?;
        let se2_a = descriptive::sample_variance(a)? / n_a;
        let se2_b = descriptive::sample_variance(b)? / n_b;
        let se2 = se2_a + se2_b;
        if !se2.is_finite() || se2 <= 0.0 {
            return None;
        }

        let mean_difference = mean_a - mean_b;
        let t_statistic = mean_difference / se2.sqrt();
        let degrees_of_freedom =
            se2.powi(2) / (se2_a.powi(2) / (n_a - 1.0) + se2_b.powi(2) / (n_b - 1.0));
        let dist = StudentsT::new(0.0, 1.0, degrees_of_freedom).ok()?;
        let p_value = (2.0 * dist.sf(t_statistic.abs())).min(1.0);

        Some(Self {
            mean_a,
            mean_b,
            mean_difference,
            t_statistic,
            degrees_of_freedom,
            p_value,
        })
    }

    /// Whether the p-value falls below the significance level `alpha`.
    #[must_use]
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_separated_groups() {
        let test = WelchTTest::new(&[10.0, 12.0, 11.0, 13.0], &[20.0, 22.0, 21.0, 19.0]).unwrap();
        assert_eq!(test.mean_a, 11.5);
        assert_eq!(test.mean_b, 20.5);
        assert_eq!(test.mean_difference, -9.0);
        // Equal variances and sizes: df = n_a + n_b - 2
        assert!((test.degrees_of_freedom - 6.0).abs() < 1e-9);
        assert!((test.t_statistic - (-9.0 / (5.0_f64 / 6.0).sqrt())).abs() < 1e-9);
        assert!((test.p_value - 6.280e-5).abs() < 1e-7);
        assert!(test.is_significant(0.05));
    }

    #[test]
    fn test_identical_groups_are_not_significant() {
        let values = [3.0, 5.0, 4.0, 6.0, 2.0];
        let test = WelchTTest::new(&values, &values).unwrap();
        assert_eq!(test.t_statistic, 0.0);
        assert!((test.p_value - 1.0).abs() < 1e-9);
        assert!(!test.is_significant(0.05));
    }

    #[test]
    fn test_reference_value_with_unequal_variances() {
        // t = -2.0740, df = 10.209, p = 0.06428
        let a = [19.8, 20.4, 19.6, 17.8, 18.5, 18.9, 18.3, 18.9, 19.5, 22.0];
        let b = [28.2, 26.6, 20.1, 23.3, 25.2, 22.1, 17.7, 27.6, 20.6, 13.7];
        let test = WelchTTest::new(&a, &b).unwrap();
        assert!((test.t_statistic - (-2.074_014_6)).abs() < 1e-6);
        assert!((test.degrees_of_freedom - 10.209_185).abs() < 1e-5);
        assert!((test.p_value - 0.064_28).abs() < 1e-4);
        assert!(!test.is_significant(0.05));
    }

    #[test]
    fn test_one_constant_group_uses_other_variance() {
        let test = WelchTTest::new(&[5.0, 5.0, 5.0], &[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!((test.degrees_of_freedom - 3.0).abs() < 1e-9);
        assert!((test.t_statistic - 3.872_983).abs() < 1e-6);
        assert!((test.p_value - 0.030_466).abs() < 1e-5);
    }

    #[test]
    fn test_too_small_groups() {
        assert!(WelchTTest::new(&[], &[1.0, 2.0]).is_none());
        assert!(WelchTTest::new(&[1.0, 2.0], &[3.0]).is_none());
    }

    proptest! {
        #[test]
        fn prop_swapping_groups_negates_statistic(
            a in prop::collection::vec(-1e3f64..1e3, 2..40),
            b in prop::collection::vec(-1e3f64..1e3, 2..40)
        ) {
            let forward = WelchTTest::new(&a, &b);
            let backward = WelchTTest::new(&b, &a);
            prop_assert_eq!(forward.is_some(), backward.is_some());
            if let (Some(forward), Some(backward)) = (forward, backward) {
                prop_assert_eq!(forward.t_statistic, -backward.t_statistic);
                prop_assert_eq!(forward.mean_difference, -backward.mean_difference);
                prop_assert_eq!(forward.p_value, backward.p_value);
                prop_assert!(forward.t_statistic == 0.0
                    || forward.t_statistic.signum() == forward.mean_difference.signum());
            }
        }
    }
}
