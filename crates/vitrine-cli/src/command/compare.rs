use clap::Args;
use serde::Serialize;
use vitrine_analysis::{
    comparison::{ComparisonResult, GroupComparison, GroupEstimate},
    config::AnalysisConfig,
    visual::ComparisonPlot,
};
use vitrine_stats::confidence::DEFAULT_ALPHA;

use crate::{
    command::common::{DatasetArg, OutputArg, ranged},
    util::{self, format_opt},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct CompareArg {
    #[clap(flatten)]
    dataset: DatasetArg,
    #[clap(flatten)]
    output: OutputArg,
    /// Numeric column to compare
    metric: String,
    /// Column whose labels define the groups
    #[arg(long = "by")]
    group_column: String,
    /// Label of group A
    label_a: String,
    /// Label of group B
    label_b: String,
    /// Minimum number of values per group
    #[arg(long, value_parser = ranged(AnalysisConfig::MIN_GROUP_SIZE_RANGE))]
    min_group_size: Option<usize>,
    /// Include histogram and box-plot data of both groups
    #[arg(long)]
    plot: bool,
    /// Number of histogram bins for --plot
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    bins: Option<u16>,
}

#[derive(Debug, Serialize)]
struct CompareOutput {
    comparison: GroupComparison,
    #[serde(skip_serializing_if = "Option::is_none")]
    plot: Option<ComparisonPlot>,
}

pub(crate) fn run(arg: &CompareArg) -> anyhow::Result<()> {
    let mut session = arg.dataset.open_session(|config| {
        if let Some(min) = arg.min_group_size {
            config.min_group_size = min;
        }
        if let Some(bins) = arg.bins {
            config.histogram_bins = usize::from(bins);
        }
    })?;
    let comparison = session.compare(&arg.metric, &arg.group_column, &arg.label_a, &arg.label_b)?;
    let plot = if arg.plot {
        Some(session.comparison_plot(
            &arg.metric,
            &arg.group_column,
            &arg.label_a,
            &arg.label_b,
        )?)
    } else {
        None
    };
    let output = CompareOutput { comparison, plot };
    if arg.output.emit_json(&output)? {
        return Ok(());
    }

    println!(
        "Comparing mean '{}' by '{}': {} vs {}\n",
        arg.metric, arg.group_column, arg.label_a, arg.label_b
    );
    match &output.comparison {
        GroupComparison::Completed(result) => print_result(result),
        GroupComparison::InsufficientData {
            label_a,
            label_b,
            count_a,
            count_b,
            min_group_size,
        } => {
            println!("Insufficient data: each group needs at least {min_group_size} values.");
            println!("  {label_a}: {count_a}");
            println!("  {label_b}: {count_b}");
        }
    }
    if let Some(plot) = &output.plot {
        println!();
        print_plot(plot);
    }
    Ok(())
}

fn print_result(result: &ComparisonResult) {
    let header = ["Group", "N", "Mean", "95% CI"].map(String::from);
    let row = |group: &GroupEstimate| {
        let interval = group.interval.map_or_else(
            || "N/A".to_string(),
            |ci| format!("[{:.2}, {:.2}]", ci.lower, ci.upper),
        );
        vec![
            group.label.clone(),
            group.count.to_string(),
            format_opt(group.mean, 2),
            interval,
        ]
    };
    util::print_text_table(&header, &[row(&result.group_a), row(&result.group_b)]);
    println!();
    println!("  Difference (A - B): {}", format_opt(result.mean_difference, 2));
    println!("  t statistic:        {}", format_opt(result.t_statistic, 4));
    println!("  Degrees of freedom: {}", format_opt(result.degrees_of_freedom, 2));
    println!("  p-value:            {}", format_opt(result.p_value, 4));
    println!();
    match result.p_value {
        Some(_) if result.is_significant(DEFAULT_ALPHA) => {
            println!("The difference between the means is statistically significant at 5%.");
        }
        Some(_) => {
            println!("No statistically significant difference between the means at 5%.");
        }
        None => println!("The test is undefined: both groups have zero variance."),
    }
}

fn print_plot(plot: &ComparisonPlot) {
    println!("Distribution of '{}':", plot.metric);
    let header = ["Group", "Min", "Q1", "Median", "Q3", "Max", "Outliers"].map(String::from);
    let rows = [&plot.group_a, &plot.group_b]
        .into_iter()
        .filter_map(|group| {
            let b = group.box_plot.as_ref()?;
            Some(vec![
                group.label.clone(),
                format!("{:.2}", b.lower_whisker),
                format!("{:.2}", b.q1),
                format!("{:.2}", b.median),
                format!("{:.2}", b.q3),
                format!("{:.2}", b.upper_whisker),
                b.outliers.len().to_string(),
            ])
        })
        .collect::<Vec<_>>();
    util::print_text_table(&header, &rows);
}
