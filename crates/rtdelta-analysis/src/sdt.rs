//! Signal-detection counts and posterior summaries
//!
//! The signal-detection model itself is fitted outside this crate. This
//! module shapes the trials into the per-participant, per-condition response
//! counts the model consumes, and reads back the posterior summary it
//! produces.
//!
//! | signal  | correct           | error        |
//! |---------|-------------------|--------------|
//! | present | hit               | miss         |
//! | absent  | correct rejection | false alarm  |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    condition::Condition,
    trial::{Signal, Trial},
};

/// Response counts of one participant in one condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SdtCounts {
    pub participant_id: u32,
    pub condition: Condition,
    pub hits: usize,
    pub misses: usize,
    pub false_alarms: usize,
    pub correct_rejections: usize,
}

impl SdtCounts {
    fn new(participant_id: u32, condition: Condition) -> Self {
        Self {
            participant_id,
            condition,
            hits: 0,
            misses: 0,
            false_alarms: 0,
            correct_rejections: 0,
        }
    }

    fn record(&mut self, trial: &Trial) {
        let slot = match (trial.signal, trial.accurate) {
            (Signal::Present, true) => &mut self.hits,
            (Signal::Present, false) => &mut self.misses,
            (Signal::Absent, false) => &mut self.false_alarms,
            (Signal::Absent, true) => &mut self.correct_rejections,
        };
        *slot += 1;
    }

    #[must_use]
    pub const fn signal_trials(&self) -> usize {
        self.hits + self.misses
    }

    #[must_use]
    pub const fn noise_trials(&self) -> usize {
        self.false_alarms + self.correct_rejections
    }

    /// Hits over signal-present trials; undefined without such trials.
    #[must_use]
    pub fn hit_rate(&self) -> Option<f64> {
        rate(self.hits, self.signal_trials())
    }

    /// False alarms over signal-absent trials; undefined without such trials.
    #[must_use]
    pub fn false_alarm_rate(&self) -> Option<f64> {
        rate(self.false_alarms, self.noise_trials())
    }
}

#[expect(clippy::cast_precision_loss)]
fn rate(count: usize, total: usize) -> Option<f64> {
    (total > 0).then(|| count as f64 / total as f64)
}

/// Counts responses for every `(participant, condition)` that has trials,
/// ordered by participant then condition code.
#[must_use]
pub fn sdt_counts(trials: &[Trial]) -> Vec<SdtCounts> {
    let mut counts = BTreeMap::new();
    for trial in trials {
        let key = (trial.participant_id, trial.condition());
        counts
            .entry(key)
            .or_insert_with(|| SdtCounts::new(key.0, key.1))
            .record(trial);
    }
    counts.into_values().collect()
}

/// Posterior mean and standard deviation of one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub mean: f64,
    pub sd: f64,
}

/// Group-level estimates for one condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConditionPosterior {
    pub condition: Condition,
    /// Sensitivity.
    pub d_prime: Estimate,
    /// Response bias.
    pub criterion: Estimate,
}

/// Posterior summary written by the external model.
///
/// ```json
/// {
///   "conditions": [
///     { "condition": 0,
///       "d_prime": { "mean": 1.52, "sd": 0.11 },
///       "criterion": { "mean": 0.08, "sd": 0.05 } }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PosteriorSummary {
    pub conditions: Vec<ConditionPosterior>,
}

impl PosteriorSummary {
    #[must_use]
    pub fn get(&self, condition: Condition) -> Option<&ConditionPosterior> {
        self.conditions.iter().find(|c| c.condition == condition)
    }
}
