use std::path::PathBuf;

use clap::Args;
use rtdelta_analysis::{
    config::AnalysisConfig,
    population::{PopulationQuantiles, population_quantile_table},
};

use crate::{tabular, util};

#[derive(Debug, Clone, Args)]
pub(crate) struct PopulationArg {
    /// Path to the quantile table CSV
    pub checkpoint: PathBuf,
}

pub(crate) fn run(arg: &PopulationArg) -> anyhow::Result<()> {
    let config = AnalysisConfig::default();
    let table = util::read_checkpoint_file(&arg.checkpoint, &config)?;
    let rows = population_quantile_table(&table);

    println!(
        "Mean RT quantiles across {} participants",
        table.participants().len()
    );
    println!("==========================================\n");
    print_rows(&rows, &config);
    Ok(())
}

fn print_rows(rows: &[PopulationQuantiles], config: &AnalysisConfig) {
    println!("  {} {:>6}", tabular::percentile_header("Condition (mode)", config), "N");
    for row in rows {
        let label = format!("{} ({})", row.label, row.mode);
        let values = row
            .trace
            .values
            .iter()
            .map(|v| format!(" {:>8}", util::fmt_value(v)))
            .collect::<String>();
        let n = row.trace.contributors.iter().max().copied().unwrap_or(0);
        println!("  {label:<24}{values} {n:>6}");
    }
}
