//! Statistical routines for the Vitrine exploratory analysis panel.
//!
//! This crate works on plain `f64` slices with missing values already
//! removed. It knows nothing about tables, columns or files; the
//! `vitrine-analysis` crate extracts the numbers and hands them over.
//!
//! - **Descriptive statistics**: count, mean, median, sample variance and
//!   standard deviation, min, max
//! - **Percentiles**: linear-interpolated percentile values
//! - **Confidence intervals**: Student t interval for a mean
//! - **Welch's t-test**: two-sample test for equal means under unequal variances
//! - **Histogram generation**: equal-width frequency distributions
//! - **Box plots**: quartiles, Tukey whiskers and outliers
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`percentiles`]: Percentile computation and storage
//! - [`confidence`]: Confidence intervals for a population mean
//! - [`welch`]: Welch's unequal-variance t-test
//! - [`histogram`]: Histogram construction for visualizing data distributions
//! - [`boxplot`]: Box-plot summaries
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use vitrine_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! assert_eq!(stats.variance, Some(2.5));
//! ```
//!
//! ## Estimating a mean
//!
//! ```
//! use vitrine_stats::confidence::{DEFAULT_ALPHA, MeanEstimate};
//!
//! let estimate = MeanEstimate::new(&[4.0, 6.0, 5.0, 7.0, 3.0], DEFAULT_ALPHA);
//! assert_eq!(estimate.mean, Some(5.0));
//! assert!(estimate.interval.unwrap().contains(5.0));
//! ```
//!
//! ## Comparing two groups
//!
//! ```
//! use vitrine_stats::welch::WelchTTest;
//!
//! let test = WelchTTest::new(&[1.0, 2.0, 3.0], &[7.0, 8.0, 9.5]).unwrap();
//! assert!(test.is_significant(0.05));
//! ```

pub mod boxplot;
pub mod confidence;
pub mod descriptive;
pub mod histogram;
pub mod percentiles;
pub mod welch;
