//! Analysis settings supplied by the presentation layer

use std::{ops::RangeInclusive, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::sample::SampleSpec;

/// User-adjustable analysis settings.
///
/// Every field has a default, so a partial JSON document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub dataset_path: PathBuf,
    /// Run statistics on a random sample instead of the full table.
    pub use_sample: bool,
    pub sample_size: usize,
    pub sample_seed: u64,
    /// Rows shown in table previews.
    pub display_rows: usize,
    /// Upper bound on the columns in the descriptive summary.
    pub max_summary_columns: usize,
    /// Values each group needs before a comparison is tested.
    pub min_group_size: usize,
    pub histogram_bins: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(Self::DEFAULT_DATASET_PATH),
            use_sample: true,
            sample_size: 3000,
            sample_seed: SampleSpec::DEFAULT_SEED,
            display_rows: 20,
            max_summary_columns: 5,
            min_group_size: 20,
            histogram_bins: 30,
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("{field} must be within {min}..={max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },
}

impl AnalysisConfig {
    pub const DEFAULT_DATASET_PATH: &'static str = "data/df_selecionado.xlsx";
    pub const SAMPLE_SIZE_RANGE: RangeInclusive<usize> = 500..=20_000;
    pub const DISPLAY_ROWS_RANGE: RangeInclusive<usize> = 5..=200;
    pub const MIN_GROUP_SIZE_RANGE: RangeInclusive<usize> = 5..=200;
    pub const MAX_SUMMARY_COLUMNS_RANGE: RangeInclusive<usize> = 1..=usize::MAX;
    pub const HISTOGRAM_BINS_RANGE: RangeInclusive<usize> = 1..=usize::MAX;

    /// Checks every bounded field.
    ///
    /// ```
    /// use vitrine_analysis::config::AnalysisConfig;
    ///
    /// assert!(AnalysisConfig::default().validate().is_ok());
    /// let config = AnalysisConfig { sample_size: 100, ..AnalysisConfig::default() };
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        check("sample_size", self.sample_size, &Self::SAMPLE_SIZE_RANGE)?;
        check("display_rows", self.display_rows, &Self::DISPLAY_ROWS_RANGE)?;
        check(
            "max_summary_columns",
            self.max_summary_columns,
            &Self::MAX_SUMMARY_COLUMNS_RANGE,
        )?;
        check(
            "min_group_size",
            self.min_group_size,
            &Self::MIN_GROUP_SIZE_RANGE,
        )?;
        check(
            "histogram_bins",
            self.histogram_bins,
            &Self::HISTOGRAM_BINS_RANGE,
        )?;
        Ok(())
    }

    /// Sample request for the current settings, `None` when sampling is off.
    #[must_use]
    pub fn sample_spec(&self) -> Option<SampleSpec> {
        self.use_sample
            .then(|| SampleSpec::new(self.sample_size, self.sample_seed))
    }
}

fn check(
    field: &'static str,
    value: usize,
    range: &RangeInclusive<usize>,
) -> Result<(), ConfigError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.dataset_path, PathBuf::from("data/df_selecionado.xlsx"));
        assert_eq!(config.sample_spec(), Some(SampleSpec::new(3000, 42)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{ "sample_size": 800, "use_sample": false }"#).unwrap();
        assert_eq!(config.sample_size, 800);
        assert_eq!(config.sample_spec(), None);
        assert_eq!(config.min_group_size, 20);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(serde_json::from_str::<AnalysisConfig>(r#"{ "alpha": 0.1 }"#).is_err());
    }

    #[test]
    fn test_out_of_range_fields() {
        let cases = [
            AnalysisConfig {
                sample_size: 20_001,
                ..AnalysisConfig::default()
            },
            AnalysisConfig {
                display_rows: 4,
                ..AnalysisConfig::default()
            },
            AnalysisConfig {
                max_summary_columns: 0,
                ..AnalysisConfig::default()
            },
            AnalysisConfig {
                min_group_size: 201,
                ..AnalysisConfig::default()
            },
            AnalysisConfig {
                histogram_bins: 0,
                ..AnalysisConfig::default()
            },
        ];
        let fields = cases
            .iter()
            .map(|config| match config.validate().unwrap_err() {
                ConfigError::OutOfRange { field, .. } => field,
            })
            .collect::<Vec<_>>();
        assert_eq!(
            fields,
            vec![
                "sample_size",
                "display_rows",
                "max_summary_columns",
                "min_group_size",
                "histogram_bins"
            ]
        );
    }
}
