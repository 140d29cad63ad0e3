//! Order statistics over intensity samples
//!
//! Background levels are taken as a percentile of the working region. The
//! interpolation between ranks matches the usual "linear" definition: the
//! p-th percentile of `n` sorted samples sits at fractional rank
//! `p / 100 * (n - 1)`.

use thiserror::Error;

/// Error types for percentile computation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("NaN value encountered at index {0}")]
    NaNEncountered(usize),
    #[error("Percentile must be within [0, 100], got {0}")]
    InvalidPercentile(f64),
}

/// Compute the `p`-th percentile of a set of samples.
///
/// An empty sample set has a percentile of 0.0 so that a fully clipped
/// crop region degrades to an all-zero background instead of failing.
///
/// # Arguments
/// * `samples` - Sample values in any order
/// * `p` - Percentile in [0, 100]
///
/// # Returns
/// * `Ok(f64)` - The interpolated percentile
/// * `Err(StatsError::NaNEncountered(index))` - If a NaN sample was found
/// * `Err(StatsError::InvalidPercentile(p))` - If `p` is outside [0, 100]
pub fn percentile<I>(samples: I, p: f64) -> Result<f64, StatsError>
where
    I: IntoIterator<Item = f64>,
{
    if !(0.0..=100.0).contains(&p) {
        return Err(StatsError::InvalidPercentile(p));
    }

    let mut values = Vec::new();
    for (index, value) in samples.into_iter().enumerate() {
        if value.is_nan() {
            return Err(StatsError::NaNEncountered(index));
        }
        values.push(value);
    }

    if values.is_empty() {
        return Ok(0.0);
    }

    let rank = p / 100.0 * (values.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let fraction = rank - lower as f64;

    let (_, &mut low, upper_part) = values.select_nth_unstable_by(lower, f64::total_cmp);
    if fraction == 0.0 || upper_part.is_empty() {
        return Ok(low);
    }

    // Next order statistic is the smallest value above the selected rank
    let high = upper_part
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min);

    Ok(low + (high - low) * fraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_median_odd() {
        let p = percentile([3.0, 1.0, 2.0], 50.0).unwrap();
        assert_eq!(p, 2.0);
    }

    #[test]
    fn test_interpolates_between_ranks() {
        // Sorted: [1, 2, 3, 4]; rank = 0.5 * 3 = 1.5 -> 2.5
        let p = percentile([4.0, 2.0, 1.0, 3.0], 50.0).unwrap();
        assert_relative_eq!(p, 2.5, epsilon = 1e-12);

        // rank = 0.15 * 3 = 0.45 -> 1.45
        let p = percentile([4.0, 2.0, 1.0, 3.0], 15.0).unwrap();
        assert_relative_eq!(p, 1.45, epsilon = 1e-12);
    }

    #[test]
    fn test_extremes() {
        let data = [5.0, -2.0, 9.0, 0.5];
        assert_eq!(percentile(data, 0.0).unwrap(), -2.0);
        assert_eq!(percentile(data, 100.0).unwrap(), 9.0);
    }

    #[test]
    fn test_duplicates() {
        let p = percentile([7.0, 7.0, 7.0, 7.0, 1.0], 30.0).unwrap();
        assert_relative_eq!(p, 7.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(percentile(Vec::<f64>::new(), 15.0).unwrap(), 0.0);
    }

    #[test]
    fn test_single_value() {
        assert_eq!(percentile([42.0], 15.0).unwrap(), 42.0);
    }

    #[test]
    fn test_nan_reported_with_index() {
        assert_eq!(
            percentile([1.0, 2.0, f64::NAN, 3.0], 50.0),
            Err(StatsError::NaNEncountered(2))
        );
    }

    #[test]
    fn test_invalid_percentile() {
        assert_eq!(
            percentile([1.0], 101.0),
            Err(StatsError::InvalidPercentile(101.0))
        );
        assert!(matches!(
            percentile([1.0], f64::NAN),
            Err(StatsError::InvalidPercentile(_))
        ));
    }
}
