//! Rendering sink for analysis artifacts
//!
//! The analysis core hands finished structures to an [`ArtifactSink`] and only
//! keeps the returned path. [`JsonArtifactSink`] writes each artifact as a
//! pretty-printed JSON document that a plotting front end can draw.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use rtdelta_analysis::{
    config::AnalysisConfig,
    delta::{DeltaTrace, Subject},
    matrix::DeltaMatrix,
    population::PopulationQuantiles,
    quantile::ConditionCurve,
};
use serde::Serialize;

use crate::util::Output;

pub trait ArtifactSink {
    /// Quantile curves of every condition for one participant.
    fn participant_curves(
        &mut self,
        participant_id: u32,
        curves: &[ConditionCurve],
    ) -> anyhow::Result<PathBuf>;

    /// A named collection of delta traces.
    fn delta_traces(&mut self, name: &str, traces: &[DeltaTrace]) -> anyhow::Result<PathBuf>;

    fn delta_matrix(&mut self, matrix: &DeltaMatrix) -> anyhow::Result<PathBuf>;

    fn population_quantiles(&mut self, rows: &[PopulationQuantiles]) -> anyhow::Result<PathBuf>;
}

#[derive(Debug, Serialize)]
struct Artifact<'a, T> {
    kind: &'static str,
    percentiles: &'a [f64],
    data: T,
}

#[derive(Debug, Clone)]
pub struct JsonArtifactSink {
    dir: PathBuf,
    config: AnalysisConfig,
}

impl JsonArtifactSink {
    pub fn new(dir: PathBuf, config: AnalysisConfig) -> anyhow::Result<Self> {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
        Ok(Self { dir, config })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write<T>(&self, file_name: &str, kind: &'static str, data: T) -> anyhow::Result<PathBuf>
    where
        T: Serialize,
    {
        let path = self.dir.join(file_name);
        Output::open(path.clone())?.write_json(Artifact {
            kind,
            percentiles: &self.config.percentiles,
            data,
        })?;
        log::debug!("wrote {kind} artifact to {}", path.display());
        Ok(path)
    }
}

impl ArtifactSink for JsonArtifactSink {
    fn participant_curves(
        &mut self,
        participant_id: u32,
        curves: &[ConditionCurve],
    ) -> anyhow::Result<PathBuf> {
        self.write(
            &format!("participant_{participant_id}_rt_curves.json"),
            "rt_curves",
            curves,
        )
    }

    fn delta_traces(&mut self, name: &str, traces: &[DeltaTrace]) -> anyhow::Result<PathBuf> {
        self.write(&format!("deltas_{name}.json"), "delta_traces", traces)
    }

    fn delta_matrix(&mut self, matrix: &DeltaMatrix) -> anyhow::Result<PathBuf> {
        let file_name = match matrix.subject {
            Subject::Participant(id) => format!("matrix_participant_{id}.json"),
            Subject::Population => "matrix_population.json".to_owned(),
        };
        self.write(&file_name, "delta_matrix", matrix)
    }

    fn population_quantiles(&mut self, rows: &[PopulationQuantiles]) -> anyhow::Result<PathBuf> {
        self.write("population_quantiles.json", "population_quantiles", rows)
    }
}

#[cfg(test)]
mod tests {
    use rtdelta_analysis::{
        condition::Condition, mode::AccuracyMode, population::population_quantile_table,
        quantile::{QuantileSummary, QuantileTable, QuantileVector},
    };

    use super::*;

    fn table() -> QuantileTable {
        let summary = |participant_id: u32, code: usize, base: f64| QuantileSummary {
            participant_id,
            condition: Condition::ALL[code],
            mode: AccuracyMode::Overall,
            sample_count: None,
            quantiles: QuantileVector::from_values([
                base,
                base + 0.1,
                base + 0.2,
                base + 0.3,
                base + 0.4,
            ]),
        };
        QuantileTable::from_summaries(
            &AnalysisConfig::default(),
            [summary(1, 0, 0.4), summary(1, 2, 0.5), summary(2, 0, 0.45)],
        )
    }

    fn read_json(path: &Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_writes_one_document_per_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let table = table();
        let mut sink = JsonArtifactSink::new(dir.path().join("out"), *table.config()).unwrap();

        let curves = table.participant_curves(1, AccuracyMode::Overall);
        let path = sink.participant_curves(1, &curves).unwrap();
        assert_eq!(path.file_name().unwrap(), "participant_1_rt_curves.json");
        let json = read_json(&path);
        assert_eq!(json["kind"], "rt_curves");
        assert_eq!(json["percentiles"][2], 50.0);
        assert_eq!(json["data"][1]["label"], "Hard Simple");
        assert!(json["data"][0]["quantiles"][0].is_number());

        let matrix = DeltaMatrix::for_population(&table);
        let path = sink.delta_matrix(&matrix).unwrap();
        assert_eq!(path.file_name().unwrap(), "matrix_population.json");
        assert_eq!(read_json(&path)["data"]["subject"], "population");

        let path = sink
            .population_quantiles(&population_quantile_table(&table))
            .unwrap();
        let json = read_json(&path);
        assert_eq!(json["data"][0]["trace"]["contributors"][0], 2);
        assert!(path.starts_with(sink.dir()));
    }

    #[test]
    fn test_undefined_values_serialize_as_null() {
        let dir = tempfile::tempdir().unwrap();
        let table = table();
        let mut sink = JsonArtifactSink::new(dir.path().to_path_buf(), *table.config()).unwrap();

        let matrix = DeltaMatrix::for_participant(&table, 2);
        let path = sink.delta_matrix(&matrix).unwrap();
        let json = read_json(&path);
        // participant 2 has no hard-simple summary
        assert!(json["data"]["cells"][0][2]["traces"][0]["values"][0].is_null());
    }
}
