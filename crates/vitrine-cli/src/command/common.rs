//! Options shared by every subcommand

use std::{ops::RangeInclusive, path::PathBuf};

use anyhow::Context;
use clap::Args;
use vitrine_analysis::{config::AnalysisConfig, session::Session};

use crate::util::{self, Output};

#[derive(Debug, Clone, Default, Args)]
pub(crate) struct DatasetArg {
    /// JSON file with analysis settings; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Dataset file (xlsx, xlsm, xlsb, xls, ods or csv)
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Analyze the full table instead of a random sample
    #[arg(long)]
    pub no_sample: bool,

    /// Number of rows to sample
    #[arg(long, value_parser = ranged(AnalysisConfig::SAMPLE_SIZE_RANGE))]
    pub sample_size: Option<usize>,

    /// Seed of the row sampler
    #[arg(long)]
    pub seed: Option<u64>,
}

impl DatasetArg {
    pub fn config(&self) -> anyhow::Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file::<AnalysisConfig, _>("config", path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(dataset) = &self.dataset {
            config.dataset_path.clone_from(dataset);
        }
        if self.no_sample {
            config.use_sample = false;
        }
        if let Some(size) = self.sample_size {
            config.sample_size = size;
        }
        if let Some(seed) = self.seed {
            config.sample_seed = seed;
        }
        Ok(config)
    }

    /// Opens a session on the configured dataset.
    ///
    /// `customize` applies subcommand-specific overrides before validation.
    pub fn open_session<F>(&self, customize: F) -> anyhow::Result<Session>
    where
        F: FnOnce(&mut AnalysisConfig),
    {
        let mut config = self.config()?;
        customize(&mut config);
        tracing::debug!(?config, "analysis settings");
        let path = config.dataset_path.clone();
        eprintln!("Loading dataset from {}...", path.display());
        let session = Session::open(config)
            .with_context(|| format!("Failed to open dataset: {}", path.display()))?;
        let (rows, columns) = session.dataset().table.shape();
        eprintln!("Loaded {rows} rows x {columns} columns");
        Ok(session)
    }
}

#[derive(Debug, Clone, Default, Args)]
pub(crate) struct OutputArg {
    /// Print JSON instead of text tables
    #[arg(long)]
    pub json: bool,

    /// Write JSON to this file (implies --json)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl OutputArg {
    /// Writes `value` as JSON if requested, returning whether it did.
    pub fn emit_json<T>(&self, value: &T) -> anyhow::Result<bool>
    where
        T: serde::Serialize,
    {
        if !self.json && self.output.is_none() {
            return Ok(false);
        }
        Output::save_json(value, self.output.as_deref())?;
        Ok(true)
    }
}

/// Value parser accepting integers within `range`.
pub(crate) fn ranged(
    range: RangeInclusive<usize>,
) -> impl Fn(&str) -> Result<usize, String> + Clone + Send + Sync + 'static {
    move |s| {
        let value = s
            .parse::<usize>()
            .map_err(|e| format!("`{s}` is not a number: {e}"))?;
        if range.contains(&value) {
            Ok(value)
        } else {
            Err(format!(
                "{value} is not in {}..={}",
                range.start(),
                range.end()
            ))
        }
    }
}
