use std::path::Path;

use clap::Args;
use serde::Serialize;
use vitrine_analysis::{
    classify::ColumnClassification,
    config::AnalysisConfig,
    report::{ColumnTypeReport, TablePreview},
};

use crate::{
    command::common::{DatasetArg, OutputArg, ranged},
    util,
};

#[derive(Debug, Clone, Args)]
pub(crate) struct OverviewArg {
    #[clap(flatten)]
    dataset: DatasetArg,
    #[clap(flatten)]
    output: OutputArg,
    /// Number of rows to preview
    #[arg(long, value_parser = ranged(AnalysisConfig::DISPLAY_ROWS_RANGE))]
    rows: Option<usize>,
}

#[derive(Debug, Serialize)]
struct Overview<'a> {
    dataset: &'a Path,
    rows: usize,
    columns: usize,
    classification: &'a ColumnClassification,
    column_types: &'a [ColumnTypeReport],
    preview: TablePreview,
}

pub(crate) fn run(arg: &OverviewArg) -> anyhow::Result<()> {
    let mut session = arg.dataset.open_session(|config| {
        if let Some(rows) = arg.rows {
            config.display_rows = rows;
        }
    })?;
    let column_types = session.type_report();
    let dataset = session.dataset();
    let (rows, columns) = dataset.table.shape();
    let overview = Overview {
        dataset: &session.config().dataset_path,
        rows,
        columns,
        classification: &dataset.classification,
        column_types: &column_types,
        preview: TablePreview::new(&session.preview()),
    };
    if arg.output.emit_json(&overview)? {
        return Ok(());
    }

    println!("Dataset: {}", overview.dataset.display());
    println!("Shape: {rows} rows x {columns} columns\n");

    println!("Numeric columns:     {}", overview.classification.numeric.join(", "));
    println!("Categorical columns: {}\n", overview.classification.categorical.join(", "));

    println!("Column types:");
    let header = ["Column", "Type", "Missing%"].map(String::from);
    let type_rows = overview
        .column_types
        .iter()
        .map(|r| vec![r.column.clone(), r.dtype.clone(), format!("{:.2}", r.null_percent)])
        .collect::<Vec<_>>();
    util::print_text_table(&header, &type_rows);
    println!();

    println!("Preview (first {} rows):", overview.preview.rows.len());
    let preview_rows = overview
        .preview
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| cell.clone().unwrap_or_else(|| "<NA>".to_string()))
                .collect()
        })
        .collect::<Vec<_>>();
    util::print_text_table(&overview.preview.columns, &preview_rows);
    Ok(())
}
