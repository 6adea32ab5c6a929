//! Analysis configuration
//!
//! The percentile set and the minimum-sample threshold are passed explicitly
//! to every entry point of the pipeline. [`AnalysisConfig::default`] gives the
//! values used by the experiment: percentiles `{10, 30, 50, 70, 90}` and a
//! minimum of 10 trials per group.

use serde::{Deserialize, Serialize};

/// Number of percentile points in a quantile vector.
pub const NUM_PERCENTILES: usize = 5;

/// Percentile points estimated for every group.
pub const DEFAULT_PERCENTILES: [f64; NUM_PERCENTILES] = [10.0, 30.0, 50.0, 70.0, 90.0];

/// Minimum number of trials a group needs before its percentiles are defined.
pub const DEFAULT_MIN_SAMPLES: usize = 10;

/// Immutable configuration shared by all pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Percentile points, in ascending order.
    pub percentiles: [f64; NUM_PERCENTILES],
    /// Groups with fewer trials than this get undefined percentiles.
    pub min_samples: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            percentiles: DEFAULT_PERCENTILES,
            min_samples: DEFAULT_MIN_SAMPLES,
        }
    }
}

impl AnalysisConfig {
    #[must_use]
    pub fn with_min_samples(self, min_samples: usize) -> Self {
        Self {
            min_samples,
            ..self
        }
    }

    /// Column name for the percentile at `index` (e.g. `p50`).
    #[must_use]
    pub fn column_name(&self, index: usize) -> String {
        format!("p{}", self.percentiles[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_columns() {
        let config = AnalysisConfig::default();
        let columns = (0..NUM_PERCENTILES)
            .map(|i| config.column_name(i))
            .collect::<Vec<_>>();
        assert_eq!(columns, ["p10", "p30", "p50", "p70", "p90"]);
    }

    #[test]
    fn test_default_percentiles_are_ascending() {
        assert!(DEFAULT_PERCENTILES.is_sorted_by(|a, b| a < b));
    }
}
