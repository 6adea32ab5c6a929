use std::path::PathBuf;

use clap::Args;
use rtdelta_analysis::{
    checkpoint,
    config::{AnalysisConfig, DEFAULT_MIN_SAMPLES},
    quantile::QuantileTable,
};

use crate::util::{self, Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct QuantilesArg {
    /// Path to the per-trial CSV file
    pub trials: PathBuf,
    /// Output path for the quantile table CSV (stdout if omitted)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
    /// Minimum number of trials for a group's percentiles to be defined
    #[arg(long, default_value_t = DEFAULT_MIN_SAMPLES)]
    pub min_samples: usize,
}

pub(crate) fn run(arg: &QuantilesArg) -> anyhow::Result<()> {
    let config = AnalysisConfig::default().with_min_samples(arg.min_samples);
    let trials = util::read_trials_file(&arg.trials)?;
    let table = QuantileTable::from_trials(&trials, &config);
    log_summary(&table);

    let mut output = Output::from_output_path(arg.output.clone())?;
    output.write_csv(|out| checkpoint::write_quantile_table(&table, out))?;
    if let Output::File { path, .. } = &output {
        log::info!("Quantile table saved to {}", path.display());
    }
    Ok(())
}

pub(super) fn log_summary(table: &QuantileTable) {
    let undefined = table.iter().filter(|s| s.quantiles.is_undefined()).count();
    log::info!(
        "Computed {} quantile summaries for {} participants ({undefined} undefined)",
        table.len(),
        table.participants().len()
    );
}
