//! Exploratory analysis of a single tabular dataset
//!
//! This crate loads a spreadsheet or CSV file into an immutable [`table::Table`]
//! and computes what an exploratory dashboard shows about it: column types and
//! missing values, descriptive statistics, confidence intervals for group
//! means, a Welch two-sample comparison, and the data behind histograms and
//! box plots. Numeric routines live in `vitrine-stats`; this crate turns table
//! columns into the numbers those routines take.
//!
//! # Overview
//!
//! ```text
//! file ──► loader ──► Table ──► classify ──► Dataset
//!                                              │
//!           report / summary (full table) ◄────┤
//!                                              ▼
//!                                           sample ──► comparison, visual
//! ```
//!
//! 1. **Load** ([`loader::DatasetLoader`]): read the file, name and drop
//!    columns, parse date columns, infer types
//! 2. **Classify** ([`classify::ColumnClassification`]): split columns into
//!    numeric and categorical
//! 3. **Report** ([`report::type_report`]): type and missing share per column
//! 4. **Summarize** ([`summary::describe_columns`]): count, mean, median,
//!    standard deviation, variance, min and max
//! 5. **Sample** ([`sample::Sampler`]): seeded row subset for the analyses below
//! 6. **Compare** ([`comparison::compare_groups`]): group means with confidence
//!    intervals and Welch's t-test
//! 7. **Visualize** ([`visual`]): histogram bins and box-plot summaries
//!
//! [`session::Session`] drives all of the above from an
//! [`config::AnalysisConfig`] and memoizes loading, sampling and reporting.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use vitrine_analysis::{
//!     classify::ColumnClassification,
//!     comparison::{ComparisonRequest, compare_groups},
//!     sample::{SampleSpec, Sampler},
//!     summary::describe_columns,
//!     table::{Column, ColumnData, Table},
//! };
//! use vitrine_stats::confidence::DEFAULT_ALPHA;
//!
//! let qty = (0..60).map(|i| Some(i % 7)).collect();
//! let channel = (0..60)
//!     .map(|i| Some(if i % 2 == 0 { "web" } else { "store" }.to_owned()))
//!     .collect();
//! let table = Arc::new(
//!     Table::new(vec![
//!         Column::new("Qty", ColumnData::Integer(qty)),
//!         Column::new("Channel", ColumnData::Text(channel)),
//!     ])
//!     .unwrap(),
//! );
//!
//! let classification = ColumnClassification::from_table(&table);
//! assert_eq!(classification.numeric, vec!["Qty"]);
//!
//! let summary = describe_columns(&table, &classification.numeric).unwrap();
//! assert_eq!(summary[0].count, 60);
//!
//! let sample = Sampler::new().sample(&table, SampleSpec::with_default_seed(40));
//! let request = ComparisonRequest::new("Qty", "Channel", "web", "store", 5);
//! let comparison = compare_groups(&sample, &request, DEFAULT_ALPHA).unwrap();
//! assert!(comparison.is_completed());
//! ```

pub mod cache;
pub mod classify;
pub mod comparison;
pub mod config;
pub mod dataset;
pub mod error;
pub mod loader;
pub mod report;
pub mod sample;
pub mod session;
pub mod summary;
pub mod table;
pub mod visual;
