use clap::Args;

use crate::{
    command::common::{DatasetArg, OutputArg},
    util,
};

#[derive(Debug, Clone, Args)]
pub(crate) struct BoxplotArg {
    #[clap(flatten)]
    dataset: DatasetArg,
    #[clap(flatten)]
    output: OutputArg,
    /// Numeric column
    metric: String,
    /// Column whose labels define the boxes
    #[arg(long = "by")]
    group_column: String,
}

pub(crate) fn run(arg: &BoxplotArg) -> anyhow::Result<()> {
    let mut session = arg.dataset.open_session(|_| {})?;
    let plots = session.box_plots(&arg.metric, &arg.group_column)?;
    if arg.output.emit_json(&plots)? {
        return Ok(());
    }

    println!("'{}' by '{}':", arg.metric, arg.group_column);
    let header = [
        "Category", "N", "Lower", "Q1", "Median", "Q3", "Upper", "Outliers",
    ]
    .map(String::from);
    let rows = plots
        .iter()
        .map(|plot| {
            let s = &plot.summary;
            vec![
                plot.label.clone(),
                s.count.to_string(),
                format!("{:.2}", s.lower_whisker),
                format!("{:.2}", s.q1),
                format!("{:.2}", s.median),
                format!("{:.2}", s.q3),
                format!("{:.2}", s.upper_whisker),
                s.outliers.len().to_string(),
            ]
        })
        .collect::<Vec<_>>();
    util::print_text_table(&header, &rows);
    Ok(())
}
