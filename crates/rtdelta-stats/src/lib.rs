//! Statistical primitives for reaction-time distribution analysis.
//!
//! This crate provides the small numeric toolkit the analysis pipeline is
//! built on:
//!
//! - **Percentiles**: Linear-interpolation percentile estimates that are
//!   guaranteed to be non-decreasing in the percentile
//! - **Descriptive statistics**: Count, mean, median, sample variance and
//!   standard deviation, plus a `mean` that reports an empty input as `None`
//!
//! # Modules
//!
//! - [`percentiles`]: Percentile computation and storage
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//!
//! # Examples
//!
//! ## Computing percentiles
//!
//! ```
//! use rtdelta_stats::percentiles::Percentiles;
//!
//! let rts = [0.40, 0.42, 0.45, 0.47, 0.50, 0.52, 0.55, 0.58, 0.60, 0.65];
//! let percentiles = Percentiles::new(&rts, &[10.0, 50.0, 90.0]).unwrap();
//! assert!((percentiles.get(50.0).unwrap() - 0.51).abs() < 1e-9);
//! ```
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use rtdelta_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```

pub mod descriptive;
pub mod percentiles;
