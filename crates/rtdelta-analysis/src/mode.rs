use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::trial::SchemaError;

/// Partition of a trial group by response correctness.
///
/// `Accurate` and `Error` partition `Overall`: every trial belongs to exactly
/// one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccuracyMode {
    Overall,
    Accurate,
    Error,
}

impl AccuracyMode {
    pub const ALL: [Self; 3] = [Self::Overall, Self::Accurate, Self::Error];

    /// Whether a trial with the given correctness belongs to this mode.
    #[must_use]
    pub const fn includes(self, accurate: bool) -> bool {
        match self {
            Self::Overall => true,
            Self::Accurate => accurate,
            Self::Error => !accurate,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overall => "overall",
            Self::Accurate => "accurate",
            Self::Error => "error",
        }
    }
}

impl FromStr for AccuracyMode {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overall" => Ok(Self::Overall),
            "accurate" => Ok(Self::Accurate),
            "error" => Ok(Self::Error),
            _ => Err(SchemaError::UnknownMode {
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for AccuracyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accurate_and_error_partition_overall() {
        for accurate in [true, false] {
            assert!(AccuracyMode::Overall.includes(accurate));
            assert_ne!(
                AccuracyMode::Accurate.includes(accurate),
                AccuracyMode::Error.includes(accurate)
            );
        }
    }

    #[test]
    fn test_parse() {
        for mode in AccuracyMode::ALL {
            assert_eq!(mode.as_str().parse::<AccuracyMode>(), Ok(mode));
        }
        assert!("correct".parse::<AccuracyMode>().is_err());
    }
}
