//! Full analysis pipeline
//!
//! Writes into the output directory:
//!
//! - `quantile_table.csv`: the quantile table checkpoint
//! - one RT-curve and one delta-matrix artifact per participant
//! - one delta-trace artifact per delta family, participants and population
//! - the population quantile table and population delta matrix
//! - `manifest.json` listing everything above

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Args;
use rtdelta_analysis::{
    checkpoint,
    config::{AnalysisConfig, DEFAULT_MIN_SAMPLES},
    delta::DeltaFamily,
    matrix::DeltaMatrix,
    mode::AccuracyMode,
    population::population_quantile_table,
    quantile::QuantileTable,
};
use serde::Serialize;

use crate::{
    command::{deltas, quantiles},
    sink::{ArtifactSink, JsonArtifactSink},
    util::{self, Output},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct ReportArg {
    /// Path to the per-trial CSV file
    pub trials: PathBuf,
    /// Directory to write the artifacts to
    #[arg(long)]
    pub output_dir: PathBuf,
    /// Minimum number of trials for a group's percentiles to be defined
    #[arg(long, default_value_t = DEFAULT_MIN_SAMPLES)]
    pub min_samples: usize,
}

#[derive(Debug, Serialize)]
struct ReportManifest {
    generated_at: DateTime<Utc>,
    trials: PathBuf,
    config: AnalysisConfig,
    participants: Vec<u32>,
    checkpoint: PathBuf,
    artifacts: Vec<PathBuf>,
}

pub(crate) fn run(arg: &ReportArg) -> anyhow::Result<()> {
    let config = AnalysisConfig::default().with_min_samples(arg.min_samples);
    let trials = util::read_trials_file(&arg.trials)?;
    let mut sink = JsonArtifactSink::new(arg.output_dir.clone(), config)?;

    let table = QuantileTable::from_trials(&trials, &config);
    quantiles::log_summary(&table);

    let checkpoint_path = sink.dir().join("quantile_table.csv");
    let mut output = Output::open(checkpoint_path.clone())?;
    output.write_csv(|out| checkpoint::write_quantile_table(&table, out))?;

    let artifacts = write_artifacts(&mut sink, &table)?;
    println!(
        "Wrote {} artifacts to {}",
        artifacts.len() + 1,
        sink.dir().display()
    );

    let manifest = ReportManifest {
        generated_at: Utc::now(),
        trials: arg.trials.clone(),
        config,
        participants: table.participants().into_iter().collect(),
        checkpoint: checkpoint_path,
        artifacts,
    };
    let manifest_path = sink.dir().join("manifest.json");
    Output::save_json(&manifest, Some(manifest_path.clone()))?;
    println!("Manifest saved to: {}", manifest_path.display());
    Ok(())
}

/// Hands every derived structure of `table` to `sink`.
fn write_artifacts<S>(sink: &mut S, table: &QuantileTable) -> anyhow::Result<Vec<PathBuf>>
where
    S: ArtifactSink,
{
    let mut artifacts = vec![];

    for participant_id in table.participants() {
        let curves = table.participant_curves(participant_id, AccuracyMode::Overall);
        artifacts.push(sink.participant_curves(participant_id, &curves)?);
        let matrix = DeltaMatrix::for_participant(table, participant_id);
        artifacts.push(sink.delta_matrix(&matrix)?);
    }

    for family in DeltaFamily::ALL {
        let comparisons = match family {
            DeltaFamily::Accuracy => family.comparisons(AccuracyMode::Overall),
            DeltaFamily::Difficulty | DeltaFamily::Stimulus => AccuracyMode::ALL
                .into_iter()
                .flat_map(|mode| family.comparisons(mode))
                .collect(),
        };
        let traces = deltas::delta_traces(table, &comparisons);
        artifacts.push(sink.delta_traces(family.as_str(), &traces)?);
    }

    artifacts.push(sink.population_quantiles(&population_quantile_table(table))?);
    artifacts.push(sink.delta_matrix(&DeltaMatrix::for_population(table))?);

    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use rtdelta_analysis::{
        condition::Condition,
        delta::DeltaTrace,
        population::PopulationQuantiles,
        quantile::{ConditionCurve, QuantileSummary, QuantileVector},
    };

    use super::*;

    /// Records what it receives instead of writing files.
    #[derive(Default)]
    struct RecordingSink {
        calls: Vec<String>,
    }

    impl RecordingSink {
        fn record(&mut self, call: String) -> PathBuf {
            self.calls.push(call.clone());
            PathBuf::from(call)
        }
    }

    impl ArtifactSink for RecordingSink {
        fn participant_curves(
            &mut self,
            participant_id: u32,
            curves: &[ConditionCurve],
        ) -> anyhow::Result<PathBuf> {
            Ok(self.record(format!("curves/{participant_id}/{}", curves.len())))
        }

        fn delta_traces(&mut self, name: &str, traces: &[DeltaTrace]) -> anyhow::Result<PathBuf> {
            Ok(self.record(format!("deltas/{name}/{}", traces.len())))
        }

        fn delta_matrix(&mut self, matrix: &DeltaMatrix) -> anyhow::Result<PathBuf> {
            Ok(self.record(format!("matrix/{}", matrix.subject)))
        }

        fn population_quantiles(
            &mut self,
            rows: &[PopulationQuantiles],
        ) -> anyhow::Result<PathBuf> {
            Ok(self.record(format!("population/{}", rows.len())))
        }
    }

    #[test]
    fn test_write_artifacts_covers_every_structure() {
        let summaries = [1, 2].into_iter().flat_map(|participant_id| {
            [Condition::ALL[0], Condition::ALL[3]].map(|condition| QuantileSummary {
                participant_id,
                condition,
                mode: AccuracyMode::Overall,
                sample_count: None,
                quantiles: QuantileVector::from_values([0.4, 0.5, 0.6, 0.7, 0.8]),
            })
        });
        let table = QuantileTable::from_summaries(&AnalysisConfig::default(), summaries);
        let mut sink = RecordingSink::default();
        let artifacts = write_artifacts(&mut sink, &table).unwrap();

        assert_eq!(
            sink.calls,
            [
                "curves/1/2",
                "matrix/1",
                "curves/2/2",
                "matrix/2",
                // 2 comparisons x 3 modes, for 2 participants plus the population
                "deltas/difficulty/18",
                "deltas/stimulus/18",
                // 4 comparisons
                "deltas/accuracy/12",
                "population/2",
                "matrix/population",
            ]
        );
        assert_eq!(artifacts.len(), sink.calls.len());
    }
}
