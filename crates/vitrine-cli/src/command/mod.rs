use clap::{Parser, Subcommand};

use self::{
    boxplot::BoxplotArg, categories::CategoriesArg, compare::CompareArg, describe::DescribeArg,
    histogram::HistogramArg, overview::OverviewArg,
};

mod boxplot;
mod categories;
mod common;
mod compare;
mod describe;
mod histogram;
mod overview;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What to compute
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Show shape, preview, column types and missing values
    Overview(#[clap(flatten)] OverviewArg),
    /// Descriptive statistics of numeric columns
    Describe(#[clap(flatten)] DescribeArg),
    /// List the labels of a grouping column
    Categories(#[clap(flatten)] CategoriesArg),
    /// Compare a metric between two groups with Welch's t-test
    Compare(#[clap(flatten)] CompareArg),
    /// Histogram of a numeric column
    Histogram(#[clap(flatten)] HistogramArg),
    /// Box-plot summaries of a metric per category
    Boxplot(#[clap(flatten)] BoxplotArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Overview(arg) => overview::run(&arg)?,
        Mode::Describe(arg) => describe::run(&arg)?,
        Mode::Categories(arg) => categories::run(&arg)?,
        Mode::Compare(arg) => compare::run(&arg)?,
        Mode::Histogram(arg) => histogram::run(&arg)?,
        Mode::Boxplot(arg) => boxplot::run(&arg)?,
    }
    Ok(())
}
