//! Quantile-wise differences between RT distributions
//!
//! A delta is the percentile-by-percentile difference `B - A` between two
//! quantile vectors of the same participant. Two comparison axes exist:
//!
//! - **Condition vs. condition** in a fixed accuracy mode, e.g. Hard - Easy
//!   with the stimulus type held fixed
//! - **Mode vs. mode** in a fixed condition, e.g. Error - Accurate
//!
//! Undefined operands stay undefined: if either side has no value at a
//! percentile, the delta at that percentile is `None`, never `0`.
//!
//! Swapping the operands negates every defined value
//! (`delta(A -> B) = -delta(B -> A)`).

use std::{fmt, str::FromStr};

use serde::{Serialize, Serializer};

use crate::{
    condition::Condition,
    config::AnalysisConfig,
    mode::AccuracyMode,
    quantile::{QuantileSummary, QuantileTable, QuantileVector},
    trial::{Difficulty, StimulusType},
};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum DeltaError {
    #[display("cannot subtract quantiles of participant {from} from participant {to}")]
    OperandMismatch { from: u32, to: u32 },
}

/// Whose distribution a delta describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Subject {
    Participant(u32),
    /// Mean across participants.
    Population,
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Participant(id) => write!(f, "{id}"),
            Self::Population => f.write_str("population"),
        }
    }
}

impl Serialize for Subject {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Participant(id) => serializer.serialize_u32(*id),
            Self::Population => serializer.serialize_str("population"),
        }
    }
}

/// An ordered pair of groups to compare: `from` is A, `to` is B in `B - A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "axis", rename_all = "snake_case")]
pub enum Comparison {
    Conditions {
        from: Condition,
        to: Condition,
        mode: AccuracyMode,
    },
    Modes {
        condition: Condition,
        from: AccuracyMode,
        to: AccuracyMode,
    },
}

impl Comparison {
    /// The `(condition, mode)` groups for A and B.
    #[must_use]
    pub const fn operands(self) -> ((Condition, AccuracyMode), (Condition, AccuracyMode)) {
        match self {
            Self::Conditions { from, to, mode } => ((from, mode), (to, mode)),
            Self::Modes {
                condition,
                from,
                to,
            } => ((condition, from), (condition, to)),
        }
    }

    /// The same comparison with A and B swapped.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Conditions { from, to, mode } => Self::Conditions {
                from: to,
                to: from,
                mode,
            },
            Self::Modes {
                condition,
                from,
                to,
            } => Self::Modes {
                condition,
                from: to,
                to: from,
            },
        }
    }

    /// Human-readable description, e.g. `Hard Simple - Easy Simple (overall)`.
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::Conditions { from, to, mode } => {
                format!("{} - {} ({mode})", to.label(), from.label())
            }
            Self::Modes {
                condition,
                from,
                to,
            } => format!("{to} - {from} ({})", condition.label()),
        }
    }
}

/// Compact comparison key, e.g. `0->2/overall` or `1/accurate->error`.
impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conditions { from, to, mode } => write!(f, "{from}->{to}/{mode}"),
            Self::Modes {
                condition,
                from,
                to,
            } => write!(f, "{condition}/{from}->{to}"),
        }
    }
}

/// Standard families of delta plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaFamily {
    /// Hard - Easy, within each stimulus type.
    Difficulty,
    /// Complex - Simple, within each difficulty.
    Stimulus,
    /// Error - Accurate, within each condition.
    Accuracy,
}

impl DeltaFamily {
    pub const ALL: [Self; 3] = [Self::Difficulty, Self::Stimulus, Self::Accuracy];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Difficulty => "difficulty",
            Self::Stimulus => "stimulus",
            Self::Accuracy => "accuracy",
        }
    }

    /// The comparisons that make up this family.
    ///
    /// `mode` selects the accuracy mode for the condition families and is
    /// ignored by [`DeltaFamily::Accuracy`].
    #[must_use]
    pub fn comparisons(self, mode: AccuracyMode) -> Vec<Comparison> {
        match self {
            Self::Difficulty => StimulusType::ALL
                .into_iter()
                .map(|stimulus_type| Comparison::Conditions {
                    from: Condition::new(stimulus_type, Difficulty::Easy),
                    to: Condition::new(stimulus_type, Difficulty::Hard),
                    mode,
                })
                .collect(),
            Self::Stimulus => Difficulty::ALL
                .into_iter()
                .map(|difficulty| Comparison::Conditions {
                    from: Condition::new(StimulusType::Simple, difficulty),
                    to: Condition::new(StimulusType::Complex, difficulty),
                    mode,
                })
                .collect(),
            Self::Accuracy => Condition::ALL
                .into_iter()
                .map(|condition| Comparison::Modes {
                    condition,
                    from: AccuracyMode::Accurate,
                    to: AccuracyMode::Error,
                })
                .collect(),
        }
    }
}

impl FromStr for DeltaFamily {
    type Err = UnknownDeltaFamily;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|family| family.as_str() == s)
            .ok_or_else(|| UnknownDeltaFamily {
                value: s.to_owned(),
            })
    }
}

impl fmt::Display for DeltaFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown delta family '{value}' (expected difficulty, stimulus or accuracy)")]
pub struct UnknownDeltaFamily {
    pub value: String,
}

/// One delta value at one percentile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeltaRecord {
    pub subject: Subject,
    pub comparison: Comparison,
    pub percentile: f64,
    pub value: Option<f64>,
}

/// The full delta curve of one comparison for one subject.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeltaTrace {
    pub subject: Subject,
    pub comparison: Comparison,
    pub values: QuantileVector,
}

impl DeltaTrace {
    /// Splits the trace into one record per percentile.
    #[must_use]
    pub fn records(&self, config: &AnalysisConfig) -> Vec<DeltaRecord> {
        config
            .percentiles
            .iter()
            .zip(self.values.iter())
            .map(|(&percentile, value)| DeltaRecord {
                subject: self.subject,
                comparison: self.comparison,
                percentile,
                value,
            })
            .collect()
    }
}

/// `to - from`, percentile by percentile.
#[must_use]
pub fn quantile_delta(from: &QuantileVector, to: &QuantileVector) -> QuantileVector {
    from.zip_with(to, |a, b| b - a)
}

/// Delta between two summaries of the same participant.
pub fn summary_delta(
    from: &QuantileSummary,
    to: &QuantileSummary,
) -> Result<QuantileVector, DeltaError> {
    if from.participant_id != to.participant_id {
        return Err(DeltaError::OperandMismatch {
            from: from.participant_id,
            to: to.participant_id,
        });
    }
    Ok(quantile_delta(&from.quantiles, &to.quantiles))
}

/// Delta trace of one comparison for one participant.
///
/// A group with no summary in the table counts as undefined.
#[must_use]
pub fn participant_delta(
    table: &QuantileTable,
    participant_id: u32,
    comparison: Comparison,
) -> DeltaTrace {
    let ((from_condition, from_mode), (to_condition, to_mode)) = comparison.operands();
    let from = table.quantiles(participant_id, from_condition, from_mode);
    let to = table.quantiles(participant_id, to_condition, to_mode);
    let values = quantile_delta(&from, &to);
    if !values.is_defined() {
        log::debug!("participant {participant_id}, {comparison}: undefined operand values");
    }
    DeltaTrace {
        subject: Subject::Participant(participant_id),
        comparison,
        values,
    }
}

/// Delta traces of every comparison for every participant in the table.
#[must_use]
pub fn participant_deltas(table: &QuantileTable, comparisons: &[Comparison]) -> Vec<DeltaTrace> {
    table
        .participants()
        .into_iter()
        .flat_map(|participant_id| {
            comparisons
                .iter()
                .map(move |&comparison| participant_delta(table, participant_id, comparison))
        })
        .collect()
}
