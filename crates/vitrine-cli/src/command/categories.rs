use clap::Args;

use crate::command::common::{DatasetArg, OutputArg};

#[derive(Debug, Clone, Args)]
pub(crate) struct CategoriesArg {
    #[clap(flatten)]
    dataset: DatasetArg,
    #[clap(flatten)]
    output: OutputArg,
    /// Grouping column
    column: String,
}

pub(crate) fn run(arg: &CategoriesArg) -> anyhow::Result<()> {
    let mut session = arg.dataset.open_session(|_| {})?;
    let labels = session.categories(&arg.column)?;
    if arg.output.emit_json(&labels)? {
        return Ok(());
    }

    println!("Categories of '{}' ({}):", arg.column, labels.len());
    for label in &labels {
        println!("  {label}");
    }
    if labels.len() < 2 {
        println!("\nFewer than two categories: nothing to compare.");
    }
    Ok(())
}
