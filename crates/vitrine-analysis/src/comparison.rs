//! Two-group comparison of a numeric metric
//!
//! Rows are split by the text form of a grouping column. The metric values of
//! the rows labelled A and B form two groups; each gets a mean with a t-based
//! confidence interval, and the groups are compared with Welch's t-test.
//!
//! Groups smaller than the configured minimum are not tested; the result is
//! [`GroupComparison::InsufficientData`] carrying both counts instead.
//!
//! # Examples
//!
//! ```
//! use vitrine_analysis::{
//!     comparison::{ComparisonRequest, GroupComparison, compare_groups},
//!     table::{Column, ColumnData, Table},
//! };
//! use vitrine_stats::confidence::DEFAULT_ALPHA;
//!
//! let amounts = [10.0, 12.0, 11.0, 13.0, 20.0, 22.0, 21.0, 19.0];
//! let labels = ["A", "A", "A", "A", "B", "B", "B", "B"];
//! let table = Table::new(vec![
//!     Column::new("Amount", ColumnData::Float(amounts.map(Some).to_vec())),
//!     Column::new("Group", ColumnData::Text(labels.map(|l| Some(l.to_owned())).to_vec())),
//! ])
//! .unwrap();
//!
//! let request = ComparisonRequest::new("Amount", "Group", "A", "B", 3);
//! let comparison = compare_groups(&table, &request, DEFAULT_ALPHA).unwrap();
//! let GroupComparison::Completed(result) = comparison else {
//!     panic!("both groups are large enough");
//! };
//! assert_eq!(result.mean_difference, Some(-9.0));
//! assert!(result.is_significant(DEFAULT_ALPHA));
//! ```

use std::collections::HashSet;

use serde::Serialize;
use vitrine_stats::{
    confidence::{ConfidenceInterval, MeanEstimate},
    welch::WelchTTest,
};

use crate::{error::AnalysisError, table::Table};

/// Parameters of a two-group comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRequest {
    /// Numeric column whose means are compared.
    pub metric: String,
    /// Column whose text form assigns rows to groups.
    pub group_column: String,
    pub label_a: String,
    pub label_b: String,
    /// Minimum number of values each group needs before testing.
    pub min_group_size: usize,
}

impl ComparisonRequest {
    #[must_use]
    pub fn new(
        metric: impl Into<String>,
        group_column: impl Into<String>,
        label_a: impl Into<String>,
        label_b: impl Into<String>,
        min_group_size: usize,
    ) -> Self {
        Self {
            metric: metric.into(),
            group_column: group_column.into(),
            label_a: label_a.into(),
            label_b: label_b.into(),
            min_group_size,
        }
    }
}

/// Mean estimate of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupEstimate {
    pub label: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub interval: Option<ConfidenceInterval>,
}

impl GroupEstimate {
    fn new(label: &str, values: &[f64], alpha: f64) -> Self {
        let MeanEstimate {
            count,
            mean,
            interval,
        } = MeanEstimate::new(values, alpha);
        Self {
            label: label.to_owned(),
            count,
            mean,
            interval,
        }
    }
}

/// Outcome of a completed comparison.
///
/// The test fields are `None` when Welch's statistic is undefined (both
/// groups have zero variance).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub group_a: GroupEstimate,
    pub group_b: GroupEstimate,
    /// `mean_a - mean_b`.
    pub mean_difference: Option<f64>,
    pub t_statistic: Option<f64>,
    pub degrees_of_freedom: Option<f64>,
    pub p_value: Option<f64>,
}

impl ComparisonResult {
    /// Whether the test rejects equal means at level `alpha`.
    #[must_use]
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value.is_some_and(|p| p < alpha)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, derive_more::IsVariant)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GroupComparison {
    Completed(ComparisonResult),
    InsufficientData {
        label_a: String,
        label_b: String,
        count_a: usize,
        count_b: usize,
        min_group_size: usize,
    },
}

/// Metric values of both groups, missing values dropped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupValues {
    pub a: Vec<f64>,
    pub b: Vec<f64>,
}

/// Collects the metric values of the rows labelled `label_a` and `label_b`.
///
/// Rows with a missing group label or a missing (or non-numeric) metric are
/// skipped.
pub fn group_values(
    table: &Table,
    request: &ComparisonRequest,
) -> Result<GroupValues, AnalysisError> {
    if request.label_a == request.label_b {
        return Err(AnalysisError::SameGroupLabels {
            label: request.label_a.clone(),
        });
    }
    let metric = column(table, &request.metric)?.to_numeric();
    let groups = column(table, &request.group_column)?;
    if metric.coercion_failures > 0 {
        tracing::warn!(
            column = %request.metric,
            failures = metric.coercion_failures,
            "non-numeric cells treated as missing"
        );
    }

    let mut values = GroupValues::default();
    for (label, value) in groups.text_values().zip(&metric.values) {
        let (Some(label), Some(value)) = (label, value) else {
            continue;
        };
        if label == request.label_a {
            values.a.push(*value);
        } else if label == request.label_b {
            values.b.push(*value);
        }
    }
    Ok(values)
}

/// Compares the metric means of two groups.
///
/// # Panics
///
/// Panics if `alpha` is not strictly between 0 and 1.
pub fn compare_groups(
    table: &Table,
    request: &ComparisonRequest,
    alpha: f64,
) -> Result<GroupComparison, AnalysisError> {
    let values = group_values(table, request)?;
    let (count_a, count_b) = (values.a.len(), values.b.len());
    if count_a < request.min_group_size || count_b < request.min_group_size {
        tracing::debug!(count_a, count_b, min = request.min_group_size, "groups too small to test");
        return Ok(GroupComparison::InsufficientData {
            label_a: request.label_a.clone(),
            label_b: request.label_b.clone(),
            count_a,
            count_b,
            min_group_size: request.min_group_size,
        });
    }

    let group_a = GroupEstimate::new(&request.label_a, &values.a, alpha);
    let group_b = GroupEstimate::new(&request.label_b, &values.b, alpha);
    let mean_difference = group_a.mean.zip(group_b.mean).map(|(a, b)| a - b);
    let test = WelchTTest::new(&values.a, &values.b);
    Ok(GroupComparison::Completed(ComparisonResult {
        group_a,
        group_b,
        mean_difference,
        t_statistic: test.map(|t| t.t_statistic),
        degrees_of_freedom: test.map(|t| t.degrees_of_freedom),
        p_value: test.map(|t| t.p_value),
    }))
}

/// Distinct non-missing labels of a column, in order of first appearance.
pub fn distinct_labels(table: &Table, column_name: &str) -> Result<Vec<String>, AnalysisError> {
    let mut seen = HashSet::new();
    Ok(column(table, column_name)?
        .text_values()
        .flatten()
        .filter(|label| seen.insert(label.clone()))
        .collect())
}

fn column<'a>(table: &'a Table, name: &str) -> Result<&'a crate::table::Column, AnalysisError> {
    table.column(name).ok_or_else(|| AnalysisError::UnknownColumn {
        name: name.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use vitrine_stats::confidence::DEFAULT_ALPHA;

    use super::*;
    use crate::table::{Column, ColumnData};

    fn grouped_table(a: &[f64], b: &[f64]) -> Table {
        let mut amounts = Vec::new();
        let mut labels = Vec::new();
        for (label, values) in [("A", a), ("B", b)] {
            for &value in values {
                amounts.push(Some(value));
                labels.push(Some(label.to_owned()));
            }
        }
        // rows outside both groups and rows with missing labels
        amounts.extend([Some(1000.0), Some(-1000.0)]);
        labels.extend([Some("C".to_owned()), None]);
        Table::new(vec![
            Column::new("Amount", ColumnData::Float(amounts)),
            Column::new("Group", ColumnData::Text(labels)),
        ])
        .unwrap()
    }

    fn request(min_group_size: usize) -> ComparisonRequest {
        ComparisonRequest::new("Amount", "Group", "A", "B", min_group_size)
    }

    #[test]
    fn test_separated_groups() {
        let table = grouped_table(&[10.0, 12.0, 11.0, 13.0], &[20.0, 22.0, 21.0, 19.0]);
        let comparison = compare_groups(&table, &request(3), DEFAULT_ALPHA).unwrap();
        let GroupComparison::Completed(result) = comparison else {
            panic!("expected a completed comparison");
        };
        assert_eq!(result.group_a.count, 4);
        assert_eq!(result.group_a.mean, Some(11.5));
        assert_eq!(result.group_b.mean, Some(20.5));
        assert_eq!(result.mean_difference, Some(-9.0));
        assert!(result.t_statistic.unwrap() < 0.0);
        assert!(result.p_value.unwrap() < 0.001);
        assert!(result.is_significant(DEFAULT_ALPHA));
        assert!(result.group_a.interval.unwrap().contains(11.5));
    }

    #[test]
    fn test_small_group_is_insufficient() {
        let b = (0..25).map(f64::from).collect::<Vec<_>>();
        let table = grouped_table(&[1.0, 2.0], &b);
        let comparison = compare_groups(&table, &request(20), DEFAULT_ALPHA).unwrap();
        assert!(comparison.is_insufficient_data());
        assert_eq!(
            comparison,
            GroupComparison::InsufficientData {
                label_a: "A".into(),
                label_b: "B".into(),
                count_a: 2,
                count_b: 25,
                min_group_size: 20,
            }
        );
    }

    #[test]
    fn test_constant_groups_have_undefined_statistic() {
        let table = grouped_table(&[5.0, 5.0, 5.0], &[7.0, 7.0, 7.0]);
        let GroupComparison::Completed(result) =
            compare_groups(&table, &request(3), DEFAULT_ALPHA).unwrap()
        else {
            panic!("expected a completed comparison");
        };
        assert_eq!(result.mean_difference, Some(-2.0));
        assert_eq!(result.group_a.interval, None);
        assert_eq!(result.t_statistic, None);
        assert_eq!(result.p_value, None);
        assert!(!result.is_significant(DEFAULT_ALPHA));
    }

    #[test]
    fn test_groups_match_on_text_form() {
        let table = Table::new(vec![
            Column::new(
                "Qty",
                ColumnData::Integer(vec![Some(1), Some(2), Some(3), None]),
            ),
            Column::new(
                "B2B",
                ColumnData::Boolean(vec![Some(true), Some(false), Some(true), Some(true)]),
            ),
        ])
        .unwrap();
        let request = ComparisonRequest::new("Qty", "B2B", "True", "False", 1);
        let values = group_values(&table, &request).unwrap();
        assert_eq!(values.a, vec![1.0, 3.0]);
        assert_eq!(values.b, vec![2.0]);
    }

    #[test]
    fn test_errors() {
        let table = grouped_table(&[1.0], &[2.0]);
        let unknown = ComparisonRequest::new("Nope", "Group", "A", "B", 1);
        assert!(matches!(
            compare_groups(&table, &unknown, DEFAULT_ALPHA),
            Err(AnalysisError::UnknownColumn { name }) if name == "Nope"
        ));
        let same = ComparisonRequest::new("Amount", "Group", "A", "A", 1);
        assert!(matches!(
            compare_groups(&table, &same, DEFAULT_ALPHA),
            Err(AnalysisError::SameGroupLabels { .. })
        ));
    }

    #[test]
    fn test_distinct_labels_in_first_appearance_order() {
        let table = grouped_table(&[1.0, 2.0], &[3.0]);
        assert_eq!(distinct_labels(&table, "Group").unwrap(), vec!["A", "B", "C"]);
        assert!(distinct_labels(&table, "Nope").is_err());
    }

    #[test]
    fn test_serializes_with_status_tag() {
        let comparison = GroupComparison::InsufficientData {
            label_a: "A".into(),
            label_b: "B".into(),
            count_a: 1,
            count_b: 2,
            min_group_size: 20,
        };
        let json = serde_json::to_value(&comparison).unwrap();
        assert_eq!(json["status"], "insufficient_data");
        assert_eq!(json["count_b"], 2);
    }
}
