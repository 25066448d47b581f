//! One user's analysis session over a dataset
//!
//! A [`Session`] ties the configuration to the loaded dataset and owns the
//! memo tables, so that repeated requests (re-rendering the same view,
//! switching back to a previous sample size) reuse earlier work.
//!
//! # Data Flow
//!
//! ```text
//! AnalysisConfig
//! └─ dataset_path ──► DatasetLoader ──► Dataset (full table + classification)
//!                                       ├─ type report, preview, summary
//!                                       └─ Sampler (use_sample, sample_size, sample_seed)
//!                                          └─ working table
//!                                             ├─ categories
//!                                             ├─ histograms, box plots
//!                                             └─ group comparison
//! ```
//!
//! The type report, preview and descriptive summary always use the full table;
//! everything downstream of the sampler uses the working table, which is the
//! full table when sampling is disabled or the table is small.
//!
//! # Examples
//!
//! ```no_run
//! use vitrine_analysis::{config::AnalysisConfig, session::Session};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let mut session = Session::open(AnalysisConfig::default())?;
//! let (rows, columns) = session.dataset().table.shape();
//! println!("{rows} rows, {columns} columns");
//!
//! for row in session.describe::<&str>(&[])? {
//!     println!("{}: mean {:?}", row.column, row.mean);
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use vitrine_stats::confidence::DEFAULT_ALPHA;

use crate::{
    cache::Memo,
    comparison::{self, ComparisonRequest, GroupComparison},
    config::{AnalysisConfig, ConfigError},
    dataset::Dataset,
    error::AnalysisError,
    loader::{DatasetLoader, LoadError},
    report::{self, ColumnTypeReport},
    sample::Sampler,
    summary::{self, SummaryRow},
    table::{Table, TableId},
    visual::{self, CategoryBoxPlot, ColumnHistogram, ComparisonPlot},
};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum SessionError {
    #[display("failed to load dataset")]
    Load(#[error(source)] LoadError),
    #[display("invalid configuration")]
    Config(#[error(source)] ConfigError),
    #[display("analysis failed")]
    Analysis(#[error(source)] AnalysisError),
}

#[derive(Debug)]
pub struct Session {
    config: AnalysisConfig,
    loader: DatasetLoader,
    sampler: Sampler,
    reports: Memo<TableId, Vec<ColumnTypeReport>>,
    dataset: Dataset,
}

impl Session {
    /// Validates `config` and loads its dataset.
    pub fn open(config: AnalysisConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let mut loader = DatasetLoader::new();
        let table = loader.load(&config.dataset_path)?;
        Ok(Self {
            config,
            loader,
            sampler: Sampler::new(),
            reports: Memo::new(),
            dataset: Dataset::new(table),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Replaces the configuration, reloading when the dataset path changed.
    ///
    /// On error the session keeps its previous configuration.
    pub fn set_config(&mut self, config: AnalysisConfig) -> Result<(), SessionError> {
        config.validate()?;
        if config.dataset_path != self.config.dataset_path {
            let table = self.loader.load(&config.dataset_path)?;
            self.dataset = Dataset::new(table);
        }
        self.config = config;
        Ok(())
    }

    /// Re-reads the dataset file.
    ///
    /// Unchanged contents keep the current table and its derived values.
    pub fn reload(&mut self) -> Result<(), SessionError> {
        let table = self.loader.load(&self.config.dataset_path)?;
        if !Arc::ptr_eq(&table, &self.dataset.table) {
            tracing::debug!("dataset contents changed");
            self.dataset = Dataset::new(table);
        }
        Ok(())
    }

    /// Table that sample-based analyses run on.
    pub fn working_table(&mut self) -> Arc<Table> {
        match self.config.sample_spec() {
            Some(spec) => self.sampler.sample(&self.dataset.table, spec),
            None => Arc::clone(&self.dataset.table),
        }
    }

    /// Type and missing-value report of the full table.
    pub fn type_report(&mut self) -> Arc<Vec<ColumnTypeReport>> {
        let table = &self.dataset.table;
        self.reports
            .get_or_insert_with(table.id(), || Arc::new(report::type_report(table)))
    }

    /// First `display_rows` rows of the full table.
    #[must_use]
    pub fn preview(&self) -> Table {
        self.dataset.table.head(self.config.display_rows)
    }

    /// Descriptive summary of the full table.
    ///
    /// Non-numeric and repeated names are ignored; at most
    /// `max_summary_columns` columns are summarized. An empty request
    /// summarizes the first numeric columns.
    pub fn describe<S>(&self, requested: &[S]) -> Result<Vec<SummaryRow>, SessionError>
    where
        S: AsRef<str>,
    {
        let columns = summary::select_columns(
            requested,
            &self.dataset.classification.numeric,
            self.config.max_summary_columns,
        );
        Ok(summary::describe_columns(&self.dataset.table, &columns)?)
    }

    /// Distinct labels of `column` in the working table.
    ///
    /// Fewer than two labels leave nothing to compare; this is logged, not
    /// raised.
    pub fn categories(&mut self, column: &str) -> Result<Vec<String>, SessionError> {
        let labels = comparison::distinct_labels(&self.working_table(), column)?;
        if labels.len() < 2 {
            tracing::warn!(column, labels = labels.len(), "fewer than two categories to compare");
        }
        Ok(labels)
    }

    /// Compares `metric` between two labels of `group_column` in the working
    /// table, at the fixed 95% confidence level.
    pub fn compare(
        &mut self,
        metric: &str,
        group_column: &str,
        label_a: &str,
        label_b: &str,
    ) -> Result<GroupComparison, SessionError> {
        let request = self.comparison_request(metric, group_column, label_a, label_b);
        Ok(comparison::compare_groups(
            &self.working_table(),
            &request,
            DEFAULT_ALPHA,
        )?)
    }

    /// Plot data for the two groups of [`Session::compare`].
    pub fn comparison_plot(
        &mut self,
        metric: &str,
        group_column: &str,
        label_a: &str,
        label_b: &str,
    ) -> Result<ComparisonPlot, SessionError> {
        let request = self.comparison_request(metric, group_column, label_a, label_b);
        Ok(visual::comparison_plot(
            &self.working_table(),
            &request,
            self.config.histogram_bins,
        )?)
    }

    pub fn histogram(&mut self, column: &str) -> Result<ColumnHistogram, SessionError> {
        Ok(visual::column_histogram(
            &self.working_table(),
            column,
            self.config.histogram_bins,
        )?)
    }

    pub fn box_plots(
        &mut self,
        metric: &str,
        group_column: &str,
    ) -> Result<Vec<CategoryBoxPlot>, SessionError> {
        Ok(visual::box_plots_by(
            &self.working_table(),
            metric,
            group_column,
        )?)
    }

    fn comparison_request(
        &self,
        metric: &str,
        group_column: &str,
        label_a: &str,
        label_b: &str,
    ) -> ComparisonRequest {
        ComparisonRequest::new(
            metric,
            group_column,
            label_a,
            label_b,
            self.config.min_group_size,
        )
    }
}
