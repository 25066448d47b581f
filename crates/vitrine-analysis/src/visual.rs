//! Data behind the distribution plots
//!
//! Nothing here draws; these functions compute what a renderer needs:
//! histogram bins of a column, box-plot summaries per category, and the
//! overlaid histograms of the two groups of a comparison.

use serde::Serialize;
use vitrine_stats::{boxplot::BoxPlotSummary, histogram::Histogram};

use crate::{
    comparison::{self, ComparisonRequest},
    error::AnalysisError,
    table::Table,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnHistogram {
    pub column: String,
    /// Number of non-missing values binned.
    pub count: usize,
    pub histogram: Histogram,
}

/// Equal-width histogram of a column's numeric values.
pub fn column_histogram(
    table: &Table,
    column_name: &str,
    num_bins: usize,
) -> Result<ColumnHistogram, AnalysisError> {
    let column = table
        .column(column_name)
        .ok_or_else(|| AnalysisError::UnknownColumn {
            name: column_name.to_owned(),
        })?;
    let values = column.to_numeric().present();
    Ok(ColumnHistogram {
        column: column_name.to_owned(),
        count: values.len(),
        histogram: Histogram::new(values, num_bins, None, None),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBoxPlot {
    pub label: String,
    pub summary: BoxPlotSummary,
}

/// Box-plot summary of `metric` for each label of `group_column`.
///
/// Labels appear in order of first appearance. Rows with a missing label are
/// skipped, as are labels without any numeric metric value.
pub fn box_plots_by(
    table: &Table,
    metric: &str,
    group_column: &str,
) -> Result<Vec<CategoryBoxPlot>, AnalysisError> {
    let unknown = |name: &str| AnalysisError::UnknownColumn {
        name: name.to_owned(),
    };
    let values = table.column(metric).ok_or_else(|| unknown(metric))?.to_numeric();
    let groups = table
        .column(group_column)
        .ok_or_else(|| unknown(group_column))?;

    let mut by_label: Vec<(String, Vec<f64>)> = Vec::new();
    for (label, value) in groups.text_values().zip(values.values) {
        let Some(label) = label else { continue };
        let idx = match by_label.iter().position(|(l, _)| *l == label) {
            Some(idx) => idx,
            None => {
                by_label.push((label, Vec::new()));
                by_label.len() - 1
            }
        };
        by_label[idx].1.extend(value);
    }

    Ok(by_label
        .into_iter()
        .filter_map(|(label, values)| {
            BoxPlotSummary::new(values).map(|summary| CategoryBoxPlot { label, summary })
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupDistribution {
    pub label: String,
    pub histogram: Histogram,
    pub box_plot: Option<BoxPlotSummary>,
}

/// Distributions of the two groups of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonPlot {
    pub metric: String,
    pub group_a: GroupDistribution,
    pub group_b: GroupDistribution,
}

/// Histograms of both groups over a shared range, plus their box plots.
///
/// Sharing the range makes bin `i` of both histograms cover the same values.
pub fn comparison_plot(
    table: &Table,
    request: &ComparisonRequest,
    num_bins: usize,
) -> Result<ComparisonPlot, AnalysisError> {
    let values = comparison::group_values(table, request)?;
    let all = || values.a.iter().chain(&values.b).copied();
    let min = all().min_by(f64::total_cmp);
    let max = all().max_by(f64::total_cmp);
    let distribution = |label: &str, group: &[f64]| GroupDistribution {
        label: label.to_owned(),
        histogram: Histogram::new(group.iter().copied(), num_bins, min, max),
        box_plot: BoxPlotSummary::new(group.iter().copied()),
    };
    Ok(ComparisonPlot {
        metric: request.metric.clone(),
        group_a: distribution(&request.label_a, &values.a),
        group_b: distribution(&request.label_b, &values.b),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, ColumnData};

    fn table() -> Table {
        Table::new(vec![
            Column::new(
                "Amount",
                ColumnData::Float(vec![
                    Some(1.0),
                    Some(2.0),
                    Some(3.0),
                    Some(10.0),
                    None,
                    Some(20.0),
                    Some(5.0),
                ]),
            ),
            Column::new(
                "Status",
                ColumnData::Text(
                    ["Shipped", "Shipped", "Cancelled", "Cancelled", "Pending", "Shipped"]
                        .into_iter()
                        .map(|s| Some(s.to_owned()))
                        .chain([None])
                        .collect(),
                ),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_column_histogram_counts_present_values() {
        let histogram = column_histogram(&table(), "Amount", 30).unwrap();
        assert_eq!(histogram.count, 6);
        assert_eq!(histogram.histogram.bins.len(), 30);
        assert_eq!(histogram.histogram.total_count(), 6);
        assert!(column_histogram(&table(), "Nope", 30).is_err());
    }

    #[test]
    fn test_box_plots_per_label() {
        let plots = box_plots_by(&table(), "Amount", "Status").unwrap();
        let labels = plots.iter().map(|p| p.label.as_str()).collect::<Vec<_>>();
        // "Pending" has only a missing amount, the unlabelled row is skipped
        assert_eq!(labels, vec!["Shipped", "Cancelled"]);
        assert_eq!(plots[0].summary.count, 3);
        assert_eq!(plots[0].summary.median, 2.0);
        assert_eq!(plots[1].summary.count, 2);
    }

    #[test]
    fn test_comparison_plot_shares_range() {
        let request = ComparisonRequest::new("Amount", "Status", "Shipped", "Cancelled", 1);
        let plot = comparison_plot(&table(), &request, 4).unwrap();
        let a = &plot.group_a.histogram;
        let b = &plot.group_b.histogram;
        assert_eq!(a.bins.len(), 4);
        assert_eq!(a.bins[0].range, b.bins[0].range);
        assert_eq!(a.bins[0].range.start, 1.0);
        assert_eq!(a.total_count(), 3);
        assert_eq!(b.total_count(), 2);
        assert_eq!(plot.group_b.box_plot.as_ref().unwrap().median, 6.5);
    }
}
