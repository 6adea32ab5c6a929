//! Population-level summary curves
//!
//! Two reductions across participants are provided. They answer different
//! questions and are kept separate:
//!
//! - [`mean_of_quantiles`]: average each participant's raw quantile estimate
//!   (a population quantile trace for one condition and mode)
//! - [`mean_of_deltas`] / [`population_delta`]: average each participant's
//!   delta (a population delta trace for one comparison)
//!
//! Both skip undefined values per percentile, so each percentile may average
//! over a different set of participants ([`PopulationTrace::contributors`]).
//!
//! When every participant has defined values for both operands at a
//! percentile, the mean of deltas equals the difference of the means of
//! quantiles there. Under partial missingness the two diverge, because the
//! quantile means then average over participants the deltas do not include.
//! That divergence is expected.

use serde::Serialize;

use crate::{
    condition::Condition,
    config::NUM_PERCENTILES,
    delta::{Comparison, DeltaTrace, Subject, participant_delta},
    mode::AccuracyMode,
    quantile::{QuantileTable, QuantileVector},
};

/// Per-percentile means across participants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PopulationTrace {
    pub values: QuantileVector,
    /// Number of participants with a defined value at each percentile.
    pub contributors: [usize; NUM_PERCENTILES],
}

impl PopulationTrace {
    /// Averages the vectors percentile by percentile, ignoring undefined entries.
    #[must_use]
    pub fn mean_across<I>(vectors: I) -> Self
    where
        I: IntoIterator<Item = QuantileVector>,
    {
        let mut columns: [Vec<f64>; NUM_PERCENTILES] = Default::default();
        for vector in vectors {
            for (column, value) in columns.iter_mut().zip(vector.iter()) {
                column.extend(value);
            }
        }
        let values = columns
            .each_ref()
            .map(|column| rtdelta_stats::descriptive::mean(column.iter().copied()));
        let contributors = columns.each_ref().map(Vec::len);
        Self {
            values: QuantileVector::new(values),
            contributors,
        }
    }
}

/// Mean quantile trace of one condition and mode across all participants.
#[must_use]
pub fn mean_of_quantiles(
    table: &QuantileTable,
    condition: Condition,
    mode: AccuracyMode,
) -> PopulationTrace {
    PopulationTrace::mean_across(
        table
            .iter()
            .filter(|s| s.condition == condition && s.mode == mode)
            .map(|s| s.quantiles),
    )
}

/// Mean of the participant traces for `comparison`.
///
/// Traces of other comparisons and population traces are ignored.
#[must_use]
pub fn mean_of_deltas(traces: &[DeltaTrace], comparison: Comparison) -> PopulationTrace {
    PopulationTrace::mean_across(
        traces
            .iter()
            .filter(|t| t.comparison == comparison && matches!(t.subject, Subject::Participant(_)))
            .map(|t| t.values),
    )
}

/// Population delta trace of one comparison, computed as the mean of the
/// per-participant deltas.
#[must_use]
pub fn population_delta(table: &QuantileTable, comparison: Comparison) -> DeltaTrace {
    let traces = table
        .participants()
        .into_iter()
        .map(|participant_id| participant_delta(table, participant_id, comparison))
        .collect::<Vec<_>>();
    DeltaTrace {
        subject: Subject::Population,
        comparison,
        values: mean_of_deltas(&traces, comparison).values,
    }
}

/// Mean quantile trace of one `(condition, mode)` pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationQuantiles {
    pub condition: Condition,
    pub label: String,
    pub mode: AccuracyMode,
    pub trace: PopulationTrace,
}

/// Mean-of-quantiles traces for every `(condition, mode)` pair present in the
/// table, in condition then mode order.
#[must_use]
pub fn population_quantile_table(table: &QuantileTable) -> Vec<PopulationQuantiles> {
    Condition::ALL
        .into_iter()
        .flat_map(|condition| AccuracyMode::ALL.map(|mode| (condition, mode)))
        .filter(|&(condition, mode)| {
            table
                .iter()
                .any(|s| s.condition == condition && s.mode == mode)
        })
        .map(|(condition, mode)| PopulationQuantiles {
            condition,
            label: condition.label(),
            mode,
            trace: mean_of_quantiles(table, condition, mode),
        })
        .collect()
}
