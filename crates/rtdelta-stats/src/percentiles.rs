/// Precomputed percentile values for a dataset.
///
/// Stores percentile-value pairs in the order the percentile points were
/// requested. Values are estimated with linear interpolation between order
/// statistics (see [`compute_percentile`]).
///
/// # Examples
///
/// ```
/// use rtdelta_stats::percentiles::Percentiles;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let percentiles = Percentiles::new(&values, &[25.0, 50.0, 75.0]).unwrap();
///
/// assert_eq!(percentiles.get(50.0), Some(3.0));
/// assert_eq!(percentiles.get(25.0), Some(2.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Percentiles {
    /// Percentile-value pairs, in request order.
    /// Each tuple contains (percentile, value) where percentile is 0.0-100.0.
    values: Vec<(f64, f64)>,
}

impl Percentiles {
    /// Computes percentiles from sorted values.
    ///
    /// # Arguments
    ///
    /// * `sorted_values` - Values sorted in ascending order
    /// * `percentile_points` - The percentile points to compute (e.g., [10.0, 50.0, 90.0])
    ///
    /// # Returns
    ///
    /// * `Some(Percentiles)` - if the dataset contains at least one value
    /// * `None` - if the dataset is empty
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64], percentile_points: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let values = percentile_points
            .iter()
            .map(|&p| compute_percentile(sorted_values, p).map(|v| (p, v)))
            .collect::<Option<Vec<_>>>()?;
        Some(Self { values })
    }

    /// Computes percentiles from unsorted values.
    ///
    /// This method will sort the values internally before computing percentiles.
    ///
    /// # Examples
    ///
    /// ```
    /// use rtdelta_stats::percentiles::Percentiles;
    ///
    /// let values = [0.5, 0.2, 0.8, 0.1, 0.9];
    /// let percentiles = Percentiles::new(&values, &[50.0]).unwrap();
    /// assert_eq!(percentiles.get(50.0), Some(0.5));
    ///
    /// assert!(Percentiles::new(&[], &[50.0]).is_none());
    /// ```
    #[must_use]
    pub fn new(values: &[f64], percentile_points: &[f64]) -> Option<Self> {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, percentile_points)
    }

    /// Gets the value at a specific percentile.
    ///
    /// Returns `None` if the percentile was not precomputed.
    #[must_use]
    pub fn get(&self, percentile: f64) -> Option<f64> {
        self.values.iter().find_map(|(p, value)| {
            if (*p - percentile).abs() < f64::EPSILON {
                Some(*value)
            } else {
                None
            }
        })
    }

    /// Returns an iterator over all (percentile, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values.iter().copied()
    }

    /// Returns all percentile-value pairs as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[(f64, f64)] {
        &self.values
    }
}

/// Computes a single percentile value from sorted data.
///
/// Uses linear interpolation between the two closest order statistics: for
/// `n` values the target rank is `p / 100 * (n - 1)`, and the result lies on
/// the straight line between the values at `floor(rank)` and `ceil(rank)`.
/// This is the estimator most statistics packages use by default.
///
/// The result is clamped to its bracketing order statistics, so for a fixed
/// dataset the output is non-decreasing in `percentile` even under floating
/// point rounding.
///
/// Percentiles outside `0.0..=100.0` are clamped to that range.
///
/// # Returns
///
/// The value at the specified percentile, or `None` if the input is empty.
///
/// # Examples
///
/// ```
/// use rtdelta_stats::percentiles::compute_percentile;
///
/// let values = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(compute_percentile(&values, 50.0), Some(2.5));
/// assert_eq!(compute_percentile(&values, 0.0), Some(1.0));
/// assert_eq!(compute_percentile(&values, 100.0), Some(4.0));
/// assert_eq!(compute_percentile(&[], 50.0), None);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn compute_percentile(sorted_values: &[f64], percentile: f64) -> Option<f64> {
    let last = sorted_values.len().checked_sub(1)?;
    let rank = percentile.clamp(0.0, 100.0) / 100.0 * last as f64;
    let lower = (rank.floor() as usize).min(last);
    let upper = (lower + 1).min(last);
    let fraction = rank - lower as f64;

    let lo = sorted_values[lower];
    let hi = sorted_values[upper];
    Some((lo + (hi - lo) * fraction).max(lo).min(hi))
}
