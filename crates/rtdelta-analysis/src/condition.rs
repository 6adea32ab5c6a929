//! Difficulty x stimulus-type condition codes
//!
//! A [`Condition`] packs the two within-participant factors that shape the RT
//! distribution into a single code in `0..=3`:
//!
//! ```text
//! code = stimulus_code + difficulty_code * 2
//!
//! 0: Easy Simple    1: Easy Complex
//! 2: Hard Simple    3: Hard Complex
//! ```
//!
//! The encoding is a bijection, so [`Condition::from_code`] always recovers
//! the pair a code was built from.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::trial::{Difficulty, SchemaError, StimulusType};

/// Number of conditions in the design.
pub const NUM_CONDITIONS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Condition {
    // Field order gives `Ord` the same order as `code()`.
    difficulty: Difficulty,
    stimulus_type: StimulusType,
}

impl Condition {
    /// All conditions, in code order.
    pub const ALL: [Self; NUM_CONDITIONS] = [
        Self::new(StimulusType::Simple, Difficulty::Easy),
        Self::new(StimulusType::Complex, Difficulty::Easy),
        Self::new(StimulusType::Simple, Difficulty::Hard),
        Self::new(StimulusType::Complex, Difficulty::Hard),
    ];

    #[must_use]
    pub const fn new(stimulus_type: StimulusType, difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            stimulus_type,
        }
    }

    #[must_use]
    pub const fn stimulus_type(self) -> StimulusType {
        self.stimulus_type
    }

    #[must_use]
    pub const fn difficulty(self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub const fn code(self) -> u8 {
        self.stimulus_type.code() + self.difficulty.code() * 2
    }

    /// Position of this condition in [`Condition::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self.code() as usize
    }

    pub fn from_code(code: u8) -> Result<Self, SchemaError> {
        let stimulus_type = StimulusType::from_code(code % 2);
        let difficulty = Difficulty::from_code(code / 2);
        match (stimulus_type, difficulty) {
            (Some(stimulus_type), Some(difficulty)) => Ok(Self::new(stimulus_type, difficulty)),
            _ => Err(SchemaError::UnknownCondition { code }),
        }
    }

    /// Human-readable label such as `"Hard Simple"`.
    #[must_use]
    pub fn label(self) -> String {
        format!("{} {}", self.difficulty.title(), self.stimulus_type.title())
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for Condition {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = u8::deserialize(deserializer)?;
        Self::from_code(code).map_err(serde::de::Error::custom)
    }
}
