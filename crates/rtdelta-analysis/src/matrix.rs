//! Pairwise delta matrix over all conditions
//!
//! For one subject, an N x N grid is built over the N conditions. Cell
//! `(row, col)` compares `condition[row] -> condition[col]`, i.e. it holds
//! `quantile(col) - quantile(row)`.
//!
//! ```text
//!            col 0      col 1      col 2      col 3
//! row 0    disabled    overall    overall    overall
//! row 1    acc+err    disabled    overall    overall
//! row 2    acc+err     acc+err   disabled    overall
//! row 3    acc+err     acc+err    acc+err   disabled
//! ```
//!
//! - Diagonal cells have nothing to compare and are disabled.
//! - Cells above the diagonal hold the `Overall` delta trace.
//! - Cells below the diagonal hold two labeled traces, `Accurate` and `Error`,
//!   to show whether correct and incorrect responses shift differently.
//!
//! Every cell is computed on its own; an undefined trace in one cell leaves
//! the others untouched.

use serde::Serialize;

use crate::{
    condition::{Condition, NUM_CONDITIONS},
    config::{AnalysisConfig, NUM_PERCENTILES},
    delta::{Comparison, Subject, participant_delta},
    mode::AccuracyMode,
    population::population_delta,
    quantile::{QuantileTable, QuantileVector},
};

/// Modes displayed in cell `(row, col)`.
#[must_use]
pub const fn cell_modes(row: usize, col: usize) -> &'static [AccuracyMode] {
    if row == col {
        &[]
    } else if row < col {
        &[AccuracyMode::Overall]
    } else {
        &[AccuracyMode::Accurate, AccuracyMode::Error]
    }
}

/// A delta trace with the mode it was computed in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabeledTrace {
    pub mode: AccuracyMode,
    pub values: QuantileVector,
}

#[derive(Debug, Clone, PartialEq, Serialize, derive_more::IsVariant)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatrixCell {
    /// Diagonal placeholder.
    Disabled,
    Traces {
        from: Condition,
        to: Condition,
        traces: Vec<LabeledTrace>,
    },
}

impl MatrixCell {
    /// The trace for `mode`, if this cell displays it.
    #[must_use]
    pub fn trace(&self, mode: AccuracyMode) -> Option<&LabeledTrace> {
        match self {
            Self::Disabled => None,
            Self::Traces { traces, .. } => traces.iter().find(|t| t.mode == mode),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionHeader {
    pub condition: Condition,
    pub label: String,
}

/// Delta grid for one participant or for the population.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaMatrix {
    pub subject: Subject,
    pub percentiles: [f64; NUM_PERCENTILES],
    pub conditions: Vec<ConditionHeader>,
    /// Row-major cells, `cells[row][col]`.
    pub cells: Vec<Vec<MatrixCell>>,
}

impl DeltaMatrix {
    /// Builds the grid, asking `delta_of` for each displayed trace.
    pub fn build<F>(subject: Subject, config: &AnalysisConfig, mut delta_of: F) -> Self
    where
        F: FnMut(Comparison) -> QuantileVector,
    {
        let cells = (0..NUM_CONDITIONS)
            .map(|row| {
                (0..NUM_CONDITIONS)
                    .map(|col| {
                        let modes = cell_modes(row, col);
                        if modes.is_empty() {
                            return MatrixCell::Disabled;
                        }
                        let from = Condition::ALL[row];
                        let to = Condition::ALL[col];
                        let traces = modes
                            .iter()
                            .map(|&mode| LabeledTrace {
                                mode,
                                values: delta_of(Comparison::Conditions { from, to, mode }),
                            })
                            .collect();
                        MatrixCell::Traces { from, to, traces }
                    })
                    .collect()
            })
            .collect();

        Self {
            subject,
            percentiles: config.percentiles,
            conditions: Condition::ALL
                .into_iter()
                .map(|condition| ConditionHeader {
                    condition,
                    label: condition.label(),
                })
                .collect(),
            cells,
        }
    }

    /// Grid of one participant's deltas.
    #[must_use]
    pub fn for_participant(table: &QuantileTable, participant_id: u32) -> Self {
        Self::build(
            Subject::Participant(participant_id),
            table.config(),
            |comparison| participant_delta(table, participant_id, comparison).values,
        )
    }

    /// Grid of population deltas (mean of per-participant deltas).
    #[must_use]
    pub fn for_population(table: &QuantileTable) -> Self {
        Self::build(Subject::Population, table.config(), |comparison| {
            population_delta(table, comparison).values
        })
    }

    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> &MatrixCell {
        &self.cells[row][col]
    }

    /// Number of cells with at least one defined value.
    #[must_use]
    pub fn populated_cells(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| match cell {
                MatrixCell::Disabled => false,
                MatrixCell::Traces { traces, .. } => {
                    traces.iter().any(|t| !t.values.is_undefined())
                }
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantile::{QuantileSummary, tests::assert_close};

    fn summary(participant_id: u32, code: u8, mode: AccuracyMode, base: f64) -> QuantileSummary {
        QuantileSummary {
            participant_id,
            condition: Condition::from_code(code).unwrap(),
            mode,
            sample_count: None,
            quantiles: QuantileVector::from_values([
                base,
                base + 0.05,
                base + 0.1,
                base + 0.15,
                base + 0.3,
            ]),
        }
    }

    fn full_table() -> QuantileTable {
        let mut summaries = vec![];
        for participant_id in [1, 2] {
            for code in 0..4 {
                let base = 0.4 + f64::from(code) * 0.05 + f64::from(participant_id) * 0.01;
                summaries.push(summary(participant_id, code, AccuracyMode::Overall, base));
                summaries.push(summary(participant_id, code, AccuracyMode::Accurate, base - 0.01));
                summaries.push(summary(participant_id, code, AccuracyMode::Error, base + 0.08));
            }
        }
        QuantileTable::from_summaries(&AnalysisConfig::default(), summaries)
    }

    #[test]
    fn test_display_policy() {
        let matrix = DeltaMatrix::for_participant(&full_table(), 1);
        for row in 0..NUM_CONDITIONS {
            for col in 0..NUM_CONDITIONS {
                let cell = matrix.cell(row, col);
                match row.cmp(&col) {
                    std::cmp::Ordering::Equal => assert!(cell.is_disabled()),
                    std::cmp::Ordering::Less => {
                        assert!(cell.trace(AccuracyMode::Overall).is_some());
                        assert!(cell.trace(AccuracyMode::Accurate).is_none());
                        assert!(cell.trace(AccuracyMode::Error).is_none());
                    }
                    std::cmp::Ordering::Greater => {
                        assert!(cell.trace(AccuracyMode::Overall).is_none());
                        assert!(cell.trace(AccuracyMode::Accurate).is_some());
                        assert!(cell.trace(AccuracyMode::Error).is_some());
                    }
                }
            }
        }
        assert_eq!(matrix.populated_cells(), 12);
    }

    #[test]
    fn test_cell_direction() {
        let matrix = DeltaMatrix::for_participant(&full_table(), 1);
        // row 0 -> col 2: condition 2 minus condition 0
        let above = matrix.cell(0, 2).trace(AccuracyMode::Overall).unwrap();
        assert_close(above.values.get(0), 0.10);
        // row 2 -> col 0 is the reverse comparison
        let below = matrix.cell(2, 0).trace(AccuracyMode::Error).unwrap();
        assert_close(below.values.get(0), -0.10);
    }

    #[test]
    fn test_missing_traces_do_not_block_other_cells() {
        // participant 3 only has data for conditions 0 and 1
        let table = QuantileTable::from_summaries(
            &AnalysisConfig::default(),
            [
                summary(3, 0, AccuracyMode::Overall, 0.4),
                summary(3, 1, AccuracyMode::Overall, 0.5),
            ],
        );
        let matrix = DeltaMatrix::for_participant(&table, 3);
        assert_close(
            matrix.cell(0, 1).trace(AccuracyMode::Overall).unwrap().values.get(2),
            0.1,
        );
        assert!(matrix.cell(0, 3).trace(AccuracyMode::Overall).unwrap().values.is_undefined());
        assert!(matrix.cell(1, 0).trace(AccuracyMode::Accurate).unwrap().values.is_undefined());
        assert_eq!(matrix.populated_cells(), 1);
    }

    #[test]
    fn test_population_matrix_averages_participants() {
        let matrix = DeltaMatrix::for_population(&full_table());
        assert_eq!(matrix.subject, Subject::Population);
        let cell = matrix.cell(1, 3).trace(AccuracyMode::Overall).unwrap();
        assert_close(cell.values.get(4), 0.10);
    }

    #[test]
    fn test_serializes_cell_kinds() {
        let matrix = DeltaMatrix::for_participant(&full_table(), 2);
        let json = serde_json::to_value(&matrix).unwrap();
        assert_eq!(json["subject"], 2);
        assert_eq!(json["cells"][0][0]["kind"], "disabled");
        assert_eq!(json["cells"][0][1]["kind"], "traces");
        assert_eq!(json["cells"][3][0]["traces"][1]["mode"], "error");
        assert_eq!(json["conditions"][2]["label"], "Hard Simple");
    }
}
