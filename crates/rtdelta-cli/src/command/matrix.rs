use std::path::PathBuf;

use anyhow::bail;
use clap::Args;
use rtdelta_analysis::{config::AnalysisConfig, matrix::DeltaMatrix};

use crate::util::{self, Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct MatrixArg {
    /// Path to the quantile table CSV
    pub checkpoint: PathBuf,
    /// Participant to build the matrix for (population mean if omitted)
    #[arg(long)]
    pub participant: Option<u32>,
    /// Output path for the matrix JSON (stdout if omitted)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &MatrixArg) -> anyhow::Result<()> {
    let config = AnalysisConfig::default();
    let table = util::read_checkpoint_file(&arg.checkpoint, &config)?;

    let matrix = match arg.participant {
        Some(participant_id) => {
            if !table.participants().contains(&participant_id) {
                bail!(
                    "Participant {participant_id} not found in {}",
                    arg.checkpoint.display()
                );
            }
            DeltaMatrix::for_participant(&table, participant_id)
        }
        None => DeltaMatrix::for_population(&table),
    };
    log::info!(
        "Delta matrix for {}: {} populated cells",
        matrix.subject,
        matrix.populated_cells()
    );

    Output::save_json(&matrix, arg.output.clone())
}
