use clap::Args;

use crate::{
    command::common::{DatasetArg, OutputArg},
    util::{self, format_opt},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct DescribeArg {
    #[clap(flatten)]
    dataset: DatasetArg,
    #[clap(flatten)]
    output: OutputArg,
    /// Numeric columns to summarize (comma-separated); defaults to the first ones
    #[arg(value_delimiter = ',')]
    columns: Vec<String>,
    /// Maximum number of columns to summarize
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    max_columns: Option<u16>,
}

pub(crate) fn run(arg: &DescribeArg) -> anyhow::Result<()> {
    let session = arg.dataset.open_session(|config| {
        if let Some(max) = arg.max_columns {
            config.max_summary_columns = usize::from(max);
        }
    })?;
    let numeric = &session.dataset().classification.numeric;
    for name in arg.columns.iter().filter(|name| !numeric.contains(name)) {
        eprintln!("Skipping '{name}': not a numeric column");
    }
    let summary = session.describe(arg.columns.as_slice())?;
    if arg.output.emit_json(&summary)? {
        return Ok(());
    }

    println!("Descriptive statistics (full table):");
    let header = ["Column", "Count", "Mean", "Median", "Std", "Var", "Min", "Max"]
        .map(String::from);
    let rows = summary
        .iter()
        .map(|row| {
            vec![
                row.column.clone(),
                row.count.to_string(),
                format_opt(row.mean, 4),
                format_opt(row.median, 4),
                format_opt(row.std, 4),
                format_opt(row.var, 4),
                format_opt(row.min, 4),
                format_opt(row.max, 4),
            ]
        })
        .collect::<Vec<_>>();
    util::print_text_table(&header, &rows);
    Ok(())
}
