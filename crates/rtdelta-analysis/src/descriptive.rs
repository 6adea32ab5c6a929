//! Descriptive statistics per design cell
//!
//! A design cell is one `(difficulty, stimulus type, signal)` combination.
//! This is a side output for reporting; nothing in the delta pipeline reads it.

use std::collections::BTreeMap;

use rtdelta_stats::descriptive::{DescriptiveStats, mean};
use serde::Serialize;

use crate::trial::{Difficulty, Signal, StimulusType, Trial};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveRow {
    pub difficulty: Difficulty,
    pub stimulus_type: StimulusType,
    pub signal: Signal,
    pub n_trials: usize,
    pub mean_rt: f64,
    /// Sample standard deviation; undefined for a single trial.
    pub std_rt: Option<f64>,
    pub median_rt: f64,
    /// Fraction of correct responses.
    pub accuracy_mean: f64,
}

/// Summarizes RT and accuracy for every design cell that has trials, in
/// difficulty, stimulus type, signal order.
#[must_use]
pub fn describe_by_cell(trials: &[Trial]) -> Vec<DescriptiveRow> {
    let mut cells = BTreeMap::<_, Vec<&Trial>>::new();
    for trial in trials {
        cells
            .entry((trial.difficulty, trial.stimulus_type, trial.signal))
            .or_default()
            .push(trial);
    }

    cells
        .into_iter()
        .filter_map(|((difficulty, stimulus_type, signal), cell)| {
            let stats = DescriptiveStats::new(cell.iter().map(|t| t.rt))?;
            let accuracy_mean = mean(cell.iter().map(|t| f64::from(u8::from(t.accurate))))?;
            Some(DescriptiveRow {
                difficulty,
                stimulus_type,
                signal,
                n_trials: stats.count,
                mean_rt: stats.mean,
                std_rt: stats.std_dev,
                median_rt: stats.median,
                accuracy_mean,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trial(difficulty: Difficulty, signal: Signal, accurate: bool, rt: f64) -> Trial {
        Trial {
            participant_id: 1,
            difficulty,
            stimulus_type: StimulusType::Simple,
            signal,
            accurate,
            rt,
        }
    }

    #[test]
    fn test_groups_by_cell() {
        let trials = [
            trial(Difficulty::Hard, Signal::Present, true, 0.6),
            trial(Difficulty::Easy, Signal::Present, true, 0.4),
            trial(Difficulty::Easy, Signal::Present, false, 0.5),
            trial(Difficulty::Easy, Signal::Present, true, 0.6),
            trial(Difficulty::Easy, Signal::Present, true, 0.7),
            trial(Difficulty::Easy, Signal::Absent, false, 0.9),
        ];
        let rows = describe_by_cell(&trials);
        assert_eq!(rows.len(), 3);

        let first = &rows[0];
        assert_eq!(
            (first.difficulty, first.signal),
            (Difficulty::Easy, Signal::Present)
        );
        assert_eq!(first.n_trials, 4);
        assert!((first.mean_rt - 0.55).abs() < 1e-9);
        assert!((first.median_rt - 0.55).abs() < 1e-9);
        assert!((first.accuracy_mean - 0.75).abs() < 1e-9);
        let std = first.std_rt.unwrap();
        assert!((std - (0.05f64 / 3.0).sqrt()).abs() < 1e-9);

        assert_eq!(rows[1].signal, Signal::Absent);
        assert_eq!(rows[1].std_rt, None);
        assert!(rows[1].accuracy_mean.abs() < 1e-12);
        assert_eq!(rows[2].difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_empty_input() {
        assert!(describe_by_cell(&[]).is_empty());
    }
}
