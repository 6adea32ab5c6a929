use crate::percentiles::compute_percentile;

/// Descriptive statistics summarizing a dataset.
///
/// This structure contains common measures of central tendency and
/// dispersion for a dataset of `f64` values.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    /// The number of values in the dataset.
    pub count: usize,
    /// The minimum value in the dataset.
    pub min: f64,
    /// The maximum value in the dataset.
    pub max: f64,
    /// The arithmetic mean (average) of the dataset.
    pub mean: f64,
    /// The median value of the dataset (interpolated for even counts).
    pub median: f64,
    /// The sample variance (`n - 1` denominator).
    ///
    /// `None` when the dataset has fewer than two values.
    pub variance: Option<f64>,
    /// The sample standard deviation.
    ///
    /// `None` when the dataset has fewer than two values.
    pub std_dev: Option<f64>,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// This method will sort the values internally before computing statistics.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the dataset contains at least one value
    /// * `None` - if the dataset is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use rtdelta_stats::descriptive::DescriptiveStats;
    /// let values = [5.0, 2.0, 4.0, 1.0, 3.0];
    /// let stats = DescriptiveStats::new(values).unwrap();
    /// assert_eq!(stats.count, 5);
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// assert_eq!(stats.variance, Some(2.5));
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes descriptive statistics from pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let mean = mean(sorted_values.iter().copied())?;
        let median = compute_percentile(sorted_values, 50.0)?;
        let variance = (count >= 2).then(|| {
            sorted_values
                .iter()
                .map(|v| (v - mean).powi(2))
                .sum::<f64>()
                / (count - 1) as f64
        });
        let std_dev = variance.map(f64::sqrt);

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            variance,
            std_dev,
        })
    }
}

/// Arithmetic mean of the given values.
///
/// Returns `None` for an empty input rather than `NaN`.
///
/// # Examples
///
/// ```
/// # use rtdelta_stats::descriptive::mean;
/// assert_eq!(mean([0.5, 0.6]), Some(0.55));
/// assert_eq!(mean(std::iter::empty()), None);
///
/// // Undefined entries can be skipped with `flatten`.
/// assert_eq!(mean([Some(1.0), None, Some(3.0)].into_iter().flatten()), Some(2.0));
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values() {
        assert!(DescriptiveStats::new(std::iter::empty()).is_none());
    }

    #[test]
    fn test_single_value_has_no_spread() {
        let stats = DescriptiveStats::new([0.7]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.median, 0.7);
        assert_eq!(stats.variance, None);
        assert_eq!(stats.std_dev, None);
    }

    #[test]
    fn test_even_count_median_is_interpolated() {
        let stats = DescriptiveStats::new([4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.mean, 2.5);
    }

    #[test]
    fn test_sample_std_dev() {
        let stats = DescriptiveStats::new([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        let expected = (32.0_f64 / 7.0).sqrt();
        assert!((stats.std_dev.unwrap() - expected).abs() < 1e-12);
    }
}
