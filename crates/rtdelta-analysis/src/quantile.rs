//! Per-participant RT quantile summaries
//!
//! This module turns the encoded trial table into the quantile table that the
//! rest of the pipeline works from: one [`QuantileSummary`] per
//! `(participant, condition, accuracy mode)`.
//!
//! # Grouping
//!
//! ```text
//! trials
//!   └─ (participant, condition)           one group per pair that has trials
//!        ├─ Overall   all trials of the group
//!        ├─ Accurate  accuracy = 1 subset
//!        └─ Error     accuracy = 0 subset
//! ```
//!
//! # Minimum-sample policy
//!
//! Each sub-group is checked against [`AnalysisConfig::min_samples`] on its
//! own. A sub-group below the threshold still produces a summary, but with
//! every percentile undefined ([`QuantileVector::UNDEFINED`]). Every existing
//! group therefore always has all three mode rows, which keeps downstream
//! grids rectangular.
//!
//! # Examples
//!
//! ```
//! use rtdelta_analysis::{
//!     config::AnalysisConfig,
//!     condition::Condition,
//!     mode::AccuracyMode,
//!     quantile::QuantileTable,
//!     trial::{Difficulty, Signal, StimulusType, Trial},
//! };
//!
//! let trials = (0..12)
//!     .map(|i| Trial {
//!         participant_id: 1,
//!         difficulty: Difficulty::Easy,
//!         stimulus_type: StimulusType::Simple,
//!         signal: Signal::Present,
//!         accurate: true,
//!         rt: 0.4 + f64::from(i) * 0.01,
//!     })
//!     .collect::<Vec<_>>();
//!
//! let table = QuantileTable::from_trials(&trials, &AnalysisConfig::default());
//! let condition = Condition::ALL[0];
//! assert!(table.quantiles(1, condition, AccuracyMode::Overall).is_defined());
//! assert!(table.quantiles(1, condition, AccuracyMode::Error).is_undefined());
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};

use rtdelta_stats::percentiles::Percentiles;
use serde::{Deserialize, Serialize};

use crate::{
    condition::Condition,
    config::{AnalysisConfig, NUM_PERCENTILES},
    mode::AccuracyMode,
    trial::Trial,
};

/// Percentile estimates for one group, aligned with
/// [`AnalysisConfig::percentiles`].
///
/// `None` marks an undefined value: the group had too few trials, or the
/// value was derived from an undefined operand.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QuantileVector([Option<f64>; NUM_PERCENTILES]);

impl QuantileVector {
    pub const UNDEFINED: Self = Self([None; NUM_PERCENTILES]);

    #[must_use]
    pub const fn new(values: [Option<f64>; NUM_PERCENTILES]) -> Self {
        Self(values)
    }

    /// A vector with every value defined.
    #[must_use]
    pub fn from_values(values: [f64; NUM_PERCENTILES]) -> Self {
        Self(values.map(Some))
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied().flatten()
    }

    #[must_use]
    pub const fn values(&self) -> &[Option<f64>; NUM_PERCENTILES] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.0.iter().copied()
    }

    /// Whether every percentile is defined.
    #[must_use]
    pub fn is_defined(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }

    /// Whether every percentile is undefined.
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    /// Whether the defined values never decrease with the percentile.
    #[must_use]
    pub fn is_non_decreasing(&self) -> bool {
        let defined = self.0.iter().flatten().collect::<Vec<_>>();
        defined.windows(2).all(|w| w[0] <= w[1])
    }

    /// Combines two vectors element-wise; undefined on either side stays undefined.
    #[must_use]
    pub fn zip_with<F>(&self, other: &Self, mut f: F) -> Self
    where
        F: FnMut(f64, f64) -> f64,
    {
        let mut out = [None; NUM_PERCENTILES];
        for (slot, (a, b)) in out.iter_mut().zip(self.0.iter().zip(&other.0)) {
            *slot = a.zip(*b).map(|(a, b)| f(a, b));
        }
        Self(out)
    }
}

/// Estimates the configured percentiles of `rts`.
///
/// Returns [`QuantileVector::UNDEFINED`] when there are fewer than
/// `config.min_samples` values (and always for an empty slice).
#[must_use]
pub fn estimate_quantiles(rts: &[f64], config: &AnalysisConfig) -> QuantileVector {
    if rts.len() < config.min_samples {
        return QuantileVector::UNDEFINED;
    }
    let Some(percentiles) = Percentiles::new(rts, &config.percentiles) else {
        return QuantileVector::UNDEFINED;
    };
    let mut values = [None; NUM_PERCENTILES];
    for (slot, (_, value)) in values.iter_mut().zip(percentiles.iter()) {
        *slot = Some(value);
    }
    QuantileVector(values)
}

/// Key of one row of the quantile table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub participant_id: u32,
    pub condition: Condition,
    pub mode: AccuracyMode,
}

/// Quantile summary of one `(participant, condition, mode)` group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantileSummary {
    pub participant_id: u32,
    pub condition: Condition,
    pub mode: AccuracyMode,
    /// Number of trials in the group.
    ///
    /// `None` when the summary was reloaded from a checkpoint, which does not
    /// record counts.
    pub sample_count: Option<usize>,
    pub quantiles: QuantileVector,
}

impl QuantileSummary {
    #[must_use]
    pub const fn key(&self) -> GroupKey {
        GroupKey {
            participant_id: self.participant_id,
            condition: self.condition,
            mode: self.mode,
        }
    }
}

/// The quantile curve of one condition, as handed to the rendering sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionCurve {
    pub condition: Condition,
    pub label: String,
    pub quantiles: QuantileVector,
}

/// All quantile summaries of an analysis run, keyed by [`GroupKey`].
///
/// This is the checkpoint of the pipeline: it can be written out and reloaded
/// (see [`checkpoint`](crate::checkpoint)) without losing anything the delta
/// and population stages need.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileTable {
    config: AnalysisConfig,
    summaries: BTreeMap<GroupKey, QuantileSummary>,
}

impl QuantileTable {
    /// Groups trials by participant and condition and summarizes every
    /// accuracy mode of every group.
    #[must_use]
    pub fn from_trials(trials: &[Trial], config: &AnalysisConfig) -> Self {
        let mut groups = HashMap::<(u32, Condition), Vec<&Trial>>::new();
        for trial in trials {
            groups
                .entry((trial.participant_id, trial.condition()))
                .or_default()
                .push(trial);
        }

        let mut summaries = BTreeMap::new();
        let mut insufficient = 0;
        for ((participant_id, condition), group) in groups {
            for mode in AccuracyMode::ALL {
                let rts = group
                    .iter()
                    .filter(|t| mode.includes(t.accurate))
                    .map(|t| t.rt)
                    .collect::<Vec<_>>();
                let quantiles = estimate_quantiles(&rts, config);
                if quantiles.is_undefined() {
                    insufficient += 1;
                    log::debug!(
                        "participant {participant_id}, condition {condition}, {mode}: \
                         {} trials < {}, percentiles undefined",
                        rts.len(),
                        config.min_samples
                    );
                }
                let summary = QuantileSummary {
                    participant_id,
                    condition,
                    mode,
                    sample_count: Some(rts.len()),
                    quantiles,
                };
                summaries.insert(summary.key(), summary);
            }
        }

        if insufficient > 0 {
            log::warn!(
                "{insufficient} of {} groups had fewer than {} trials and were left undefined",
                summaries.len(),
                config.min_samples
            );
        }

        Self {
            config: *config,
            summaries,
        }
    }

    /// Builds a table from already computed summaries.
    ///
    /// A later summary with the same key replaces an earlier one.
    #[must_use]
    pub fn from_summaries<I>(config: &AnalysisConfig, summaries: I) -> Self
    where
        I: IntoIterator<Item = QuantileSummary>,
    {
        let summaries = summaries.into_iter().map(|s| (s.key(), s)).collect();
        Self {
            config: *config,
            summaries,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Summaries in `(participant, condition, mode)` order.
    pub fn iter(&self) -> impl Iterator<Item = &QuantileSummary> {
        self.summaries.values()
    }

    #[must_use]
    pub fn get(
        &self,
        participant_id: u32,
        condition: Condition,
        mode: AccuracyMode,
    ) -> Option<&QuantileSummary> {
        self.summaries.get(&GroupKey {
            participant_id,
            condition,
            mode,
        })
    }

    /// Quantiles of a group, undefined if the group has no summary at all.
    #[must_use]
    pub fn quantiles(
        &self,
        participant_id: u32,
        condition: Condition,
        mode: AccuracyMode,
    ) -> QuantileVector {
        self.get(participant_id, condition, mode)
            .map_or(QuantileVector::UNDEFINED, |s| s.quantiles)
    }

    /// Participant ids present in the table, ascending.
    #[must_use]
    pub fn participants(&self) -> BTreeSet<u32> {
        self.summaries.keys().map(|k| k.participant_id).collect()
    }

    /// Summaries of a single participant.
    pub fn for_participant(&self, participant_id: u32) -> impl Iterator<Item = &QuantileSummary> {
        self.summaries
            .range(
                GroupKey {
                    participant_id,
                    condition: Condition::ALL[0],
                    mode: AccuracyMode::Overall,
                }..,
            )
            .take_while(move |(k, _)| k.participant_id == participant_id)
            .map(|(_, s)| s)
    }

    /// Per-condition quantile curves of one participant in one mode.
    ///
    /// Conditions the participant has no trials in are skipped.
    #[must_use]
    pub fn participant_curves(
        &self,
        participant_id: u32,
        mode: AccuracyMode,
    ) -> Vec<ConditionCurve> {
        self.for_participant(participant_id)
            .filter(|s| s.mode == mode)
            .map(|s| ConditionCurve {
                condition: s.condition,
                label: s.condition.label(),
                quantiles: s.quantiles,
            })
            .collect()
    }
}


#[cfg(test)]
mod proptests {
    use super::tests::trial;
    use super::*;
    use proptest::prelude::*;

    fn trials_strategy() -> impl Strategy<Value = Vec<Trial>> {
        prop::collection::vec((1u32..4, 0usize..4, any::<bool>(), 0.15f64..2.5), 0..300).prop_map(
            |rows| {
                rows.into_iter()
                    .map(|(p, c, accurate, rt)| trial(p, Condition::ALL[c], accurate, rt))
                    .collect()
            },
        )
    }

    proptest! {
        /// Accurate and error counts add up to the overall count in every group.
        #[test]
        fn prop_partition_completeness(trials in trials_strategy()) {
            let table = QuantileTable::from_trials(&trials, &AnalysisConfig::default());
            for summary in table.iter().filter(|s| s.mode == AccuracyMode::Overall) {
                let count = |mode| {
                    table
                        .get(summary.participant_id, summary.condition, mode)
                        .and_then(|s| s.sample_count)
                        .unwrap()
                };
                prop_assert_eq!(
                    count(AccuracyMode::Accurate) + count(AccuracyMode::Error),
                    count(AccuracyMode::Overall)
                );
            }
            let total = table
                .iter()
                .filter(|s| s.mode == AccuracyMode::Overall)
                .filter_map(|s| s.sample_count)
                .sum::<usize>();
            prop_assert_eq!(total, trials.len());
        }

        /// Defined percentile vectors are non-decreasing.
        #[test]
        fn prop_defined_quantiles_are_monotone(trials in trials_strategy()) {
            let table = QuantileTable::from_trials(&trials, &AnalysisConfig::default());
            for summary in table.iter() {
                let q = &summary.quantiles;
                prop_assert!(q.is_defined() || q.is_undefined());
                if q.is_defined() {
                    let values = q.iter().flatten().collect::<Vec<_>>();
                    prop_assert!(values.windows(2).all(|w| w[0] <= w[1]), "{:?}", values);
                }
            }
        }
    }
}
