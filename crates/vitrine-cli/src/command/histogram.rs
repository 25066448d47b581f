use clap::Args;
use vitrine_stats::histogram::Histogram;

use crate::command::common::{DatasetArg, OutputArg};

const BAR_WIDTH: u64 = 40;

#[derive(Debug, Clone, Args)]
pub(crate) struct HistogramArg {
    #[clap(flatten)]
    dataset: DatasetArg,
    #[clap(flatten)]
    output: OutputArg,
    /// Numeric column
    column: String,
    /// Number of bins
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    bins: Option<u16>,
}

pub(crate) fn run(arg: &HistogramArg) -> anyhow::Result<()> {
    let mut session = arg.dataset.open_session(|config| {
        if let Some(bins) = arg.bins {
            config.histogram_bins = usize::from(bins);
        }
    })?;
    let histogram = session.histogram(&arg.column)?;
    if arg.output.emit_json(&histogram)? {
        return Ok(());
    }

    println!(
        "Histogram of '{}' ({} values):",
        histogram.column, histogram.count
    );
    print_bars(&histogram.histogram);
    Ok(())
}

fn print_bars(histogram: &Histogram) {
    let max_count = histogram.max_count().max(1);
    for bin in &histogram.bins {
        let width = usize::try_from(bin.count * BAR_WIDTH / max_count).unwrap_or(0);
        println!(
            "  [{:>12.2}, {:>12.2}) {:>7} {}",
            bin.range.start,
            bin.range.end,
            bin.count,
            "#".repeat(width)
        );
    }
}
