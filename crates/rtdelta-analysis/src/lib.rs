//! Delta-plot analysis of reaction-time distributions
//!
//! This crate turns per-trial reaction-time (RT) data from a 2 x 2 design
//! (difficulty x stimulus type) into quantile summaries and the differences
//! between them, per participant and across the population.
//!
//! # Overview
//!
//! The analysis is a single forward pipeline:
//!
//! 1. **Encode Trials** ([`trial::encode_trials`]): Validate raw rows and encode
//!    the factor labels; each trial gets a [`condition::Condition`] code
//! 2. **Aggregate Quantiles** ([`quantile::QuantileTable`]): Estimate the
//!    10/30/50/70/90th RT percentiles per participant, condition and
//!    [`mode::AccuracyMode`], leaving groups with too few trials undefined
//! 3. **Checkpoint** ([`checkpoint`]): Persist the quantile table as CSV and
//!    reload it for the later stages
//! 4. **Compute Deltas** ([`delta::participant_delta`]): Subtract quantile
//!    vectors between conditions or between accuracy modes
//! 5. **Aggregate Population** ([`population`]): Average quantiles or deltas
//!    across participants, skipping undefined values
//! 6. **Build Matrices** ([`matrix::DeltaMatrix`]): Arrange every pairwise
//!    condition delta in one grid for display
//!
//! Side outputs that do not feed the pipeline:
//!
//! - **Descriptive Statistics** ([`descriptive::describe_by_cell`])
//! - **Signal Detection** ([`sdt`]): response counts for an external model and
//!   its posterior summary
//!
//! # Undefined values
//!
//! Percentile and delta values are `Option<f64>`. `None` means "not
//! computable" (too few trials, or a missing operand) and is carried through
//! every stage rather than replaced with zero.
//!
//! # Examples
//!
//! ```
//! use rtdelta_analysis::{
//!     condition::Condition,
//!     config::AnalysisConfig,
//!     delta::{DeltaFamily, participant_delta},
//!     mode::AccuracyMode,
//!     quantile::QuantileTable,
//!     trial::{Signal, Trial},
//! };
//!
//! let trials = Condition::ALL
//!     .into_iter()
//!     .flat_map(|condition| {
//!         (0..10).map(move |i| Trial {
//!             participant_id: 1,
//!             difficulty: condition.difficulty(),
//!             stimulus_type: condition.stimulus_type(),
//!             signal: Signal::Present,
//!             accurate: true,
//!             rt: 0.4 + f64::from(condition.code()) * 0.05 + f64::from(i) * 0.01,
//!         })
//!     })
//!     .collect::<Vec<_>>();
//!
//! let table = QuantileTable::from_trials(&trials, &AnalysisConfig::default());
//! let comparison = DeltaFamily::Difficulty.comparisons(AccuracyMode::Overall)[0];
//! let trace = participant_delta(&table, 1, comparison);
//! assert!((trace.values.get(2).unwrap() - 0.1).abs() < 1e-9);
//! ```

pub mod checkpoint;
pub mod condition;
pub mod config;
pub mod delta;
pub mod descriptive;
pub mod matrix;
pub mod mode;
pub mod population;
pub mod quantile;
pub mod sdt;
pub mod trial;
