//! Trial records and factor encoding
//!
//! The experiment crosses three binary factors: difficulty, stimulus type and
//! signal presence. Raw input rows carry these as text labels; [`Trial`] holds
//! them as closed enums, so an unknown label is rejected while encoding
//! instead of becoming a missing value further down the pipeline.
//!
//! Label tables:
//!
//! | Column          | Code 0      | Code 1      |
//! |-----------------|-------------|-------------|
//! | `difficulty`    | `"easy"`    | `"hard"`    |
//! | `stimulus_type` | `"simple"`  | `"complex"` |
//! | `signal`        | `"present"` | `"absent"`  |
//!
//! # Examples
//!
//! ```
//! use rtdelta_analysis::trial::{RawTrial, Trial, encode_trials};
//!
//! let raw = RawTrial {
//!     participant_id: 1,
//!     difficulty: "hard".to_owned(),
//!     stimulus_type: "simple".to_owned(),
//!     signal: "present".to_owned(),
//!     accuracy: 1.0,
//!     rt: 0.52,
//! };
//! let trials = encode_trials(&[raw]).unwrap();
//! assert_eq!(trials[0].condition().code(), 2);
//!
//! let typo = RawTrial { difficulty: "hrad".to_owned(), ..Default::default() };
//! assert!(Trial::from_raw(&typo).is_err());
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::condition::Condition;

/// A categorical or numeric value outside the known input schema.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum SchemaError {
    #[display("unknown {column} label '{value}'")]
    UnknownLabel { column: &'static str, value: String },
    #[display("accuracy must be 0 or 1, got {value}")]
    InvalidAccuracy { value: f64 },
    #[display("rt must be a positive number of seconds, got {value}")]
    InvalidRt { value: f64 },
    #[display("condition code {code} is outside 0..=3")]
    UnknownCondition { code: u8 },
    #[display("unknown accuracy mode '{value}'")]
    UnknownMode { value: String },
}

/// A [`SchemaError`] located at a 1-based data row of the input table.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
#[display("row {row}: {source}")]
pub struct EncodeError {
    pub row: usize,
    pub source: SchemaError,
}

/// Task difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 2] = [Self::Easy, Self::Hard];

    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Easy => 0,
            Self::Hard => 1,
        }
    }

    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Easy),
            1 => Some(Self::Hard),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Hard => "hard",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Hard => "Hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Self::Easy),
            "hard" => Ok(Self::Hard),
            _ => Err(SchemaError::UnknownLabel {
                column: "difficulty",
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stimulus complexity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StimulusType {
    Simple,
    Complex,
}

impl StimulusType {
    pub const ALL: [Self; 2] = [Self::Simple, Self::Complex];

    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Simple => 0,
            Self::Complex => 1,
        }
    }

    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Simple),
            1 => Some(Self::Complex),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Complex => "complex",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Simple => "Simple",
            Self::Complex => "Complex",
        }
    }
}

impl FromStr for StimulusType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(Self::Simple),
            "complex" => Ok(Self::Complex),
            _ => Err(SchemaError::UnknownLabel {
                column: "stimulus_type",
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for StimulusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the target signal was present on the trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Present,
    Absent,
}

impl Signal {
    pub const ALL: [Self; 2] = [Self::Present, Self::Absent];

    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Present => 0,
            Self::Absent => 1,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
        }
    }
}

impl FromStr for Signal {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            _ => Err(SchemaError::UnknownLabel {
                column: "signal",
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the input table, with factor columns still as text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTrial {
    pub participant_id: u32,
    pub difficulty: String,
    pub stimulus_type: String,
    pub signal: String,
    /// `1` for a correct response, `0` for an error.
    pub accuracy: f64,
    /// Reaction time in seconds.
    pub rt: f64,
}

/// A validated trial with encoded factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    pub participant_id: u32,
    pub difficulty: Difficulty,
    pub stimulus_type: StimulusType,
    pub signal: Signal,
    /// Whether the response was correct.
    pub accurate: bool,
    /// Reaction time in seconds.
    pub rt: f64,
}

impl Trial {
    /// Validates and encodes a raw row.
    ///
    /// Fails on an unknown factor label, an accuracy other than 0/1, or a
    /// reaction time that is not a positive finite number.
    #[expect(clippy::float_cmp)]
    pub fn from_raw(raw: &RawTrial) -> Result<Self, SchemaError> {
        let difficulty = raw.difficulty.parse()?;
        let stimulus_type = raw.stimulus_type.parse()?;
        let signal = raw.signal.parse()?;

        let accurate = if raw.accuracy == 1.0 {
            true
        } else if raw.accuracy == 0.0 {
            false
        } else {
            return Err(SchemaError::InvalidAccuracy {
                value: raw.accuracy,
            });
        };

        if !(raw.rt.is_finite() && raw.rt > 0.0) {
            return Err(SchemaError::InvalidRt { value: raw.rt });
        }

        Ok(Self {
            participant_id: raw.participant_id,
            difficulty,
            stimulus_type,
            signal,
            accurate,
            rt: raw.rt,
        })
    }

    /// The combined difficulty x stimulus-type condition of this trial.
    #[must_use]
    pub const fn condition(&self) -> Condition {
        Condition::new(self.stimulus_type, self.difficulty)
    }
}

/// Encodes a whole raw table, failing on the first invalid row.
pub fn encode_trials(raw_trials: &[RawTrial]) -> Result<Vec<Trial>, EncodeError> {
    raw_trials
        .iter()
        .enumerate()
        .map(|(i, raw)| Trial::from_raw(raw).map_err(|source| EncodeError { row: i + 1, source }))
        .collect()
}
