use std::path::PathBuf;

use clap::Args;
use rtdelta_analysis::{
    config::AnalysisConfig,
    delta::{Comparison, DeltaFamily, DeltaTrace, participant_deltas},
    mode::AccuracyMode,
    population::population_delta,
    quantile::QuantileTable,
};

use crate::{
    tabular,
    util::{self, Output},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct DeltasArg {
    /// Path to the quantile table CSV
    pub checkpoint: PathBuf,
    /// Delta family to compute (all families if omitted)
    #[arg(long)]
    pub family: Option<DeltaFamily>,
    /// Accuracy mode for the condition families
    #[arg(long, default_value_t = AccuracyMode::Overall)]
    pub mode: AccuracyMode,
    /// Output path for the delta CSV (stdout if omitted)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &DeltasArg) -> anyhow::Result<()> {
    let config = AnalysisConfig::default();
    let table = util::read_checkpoint_file(&arg.checkpoint, &config)?;

    let families = match arg.family {
        Some(family) => vec![family],
        None => DeltaFamily::ALL.to_vec(),
    };
    let comparisons = families
        .iter()
        .flat_map(|family| family.comparisons(arg.mode))
        .collect::<Vec<_>>();
    let traces = delta_traces(&table, &comparisons);

    let records = traces
        .iter()
        .flat_map(|trace| trace.records(table.config()))
        .collect::<Vec<_>>();
    let undefined = records.iter().filter(|r| r.value.is_none()).count();
    log::info!(
        "Computed {} delta records ({undefined} undefined) for {} comparisons",
        records.len(),
        comparisons.len()
    );

    let mut output = Output::from_output_path(arg.output.clone())?;
    output.write_csv(|out| tabular::write_delta_records(&records, out))?;
    Ok(())
}

/// Per-participant traces followed by the population trace of each comparison.
pub(super) fn delta_traces(table: &QuantileTable, comparisons: &[Comparison]) -> Vec<DeltaTrace> {
    let mut traces = participant_deltas(table, comparisons);
    traces.extend(
        comparisons
            .iter()
            .map(|&comparison| population_delta(table, comparison)),
    );
    traces
}
