use std::path::PathBuf;

use clap::Args;
use rtdelta_analysis::descriptive::{DescriptiveRow, describe_by_cell};

use crate::{
    tabular,
    util::{self, Output},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct DescribeArg {
    /// Path to the per-trial CSV file
    pub trials: PathBuf,
    /// Also write the table as CSV to this path
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &DescribeArg) -> anyhow::Result<()> {
    let trials = util::read_trials_file(&arg.trials)?;
    let rows = describe_by_cell(&trials);

    println!("Descriptive Statistics by Difficulty x Stimulus Type x Signal");
    println!("=============================================================\n");
    print_table(&rows);

    if let Some(path) = &arg.output {
        let mut output = Output::open(path.clone())?;
        output.write_csv(|out| tabular::write_descriptive_rows(&rows, out))?;
        println!("\nDescriptive statistics saved to: {}", path.display());
    }
    Ok(())
}

fn print_table(rows: &[DescriptiveRow]) {
    println!(
        "  {:<10} {:<10} {:<8} {:>8} {:>10} {:>10} {:>10} {:>10}",
        "Difficulty", "Stimulus", "Signal", "Trials", "Mean RT", "SD RT", "Median RT", "Accuracy"
    );
    println!("  {}", "-".repeat(83));
    for row in rows {
        println!(
            "  {:<10} {:<10} {:<8} {:>8} {:>10.3} {:>10} {:>10.3} {:>10.3}",
            row.difficulty.as_str(),
            row.stimulus_type.as_str(),
            row.signal.as_str(),
            row.n_trials,
            row.mean_rt,
            util::fmt_value(row.std_rt),
            row.median_rt,
            row.accuracy_mean,
        );
    }
}
