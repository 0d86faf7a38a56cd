use anyhow::ensure;
use log::debug;

/// Returns the `q`-th percentile (`0..=100`) of `values` using linear
/// interpolation between closest ranks: `rank = q / 100 * (n - 1)`.
///
/// The input does not need to be sorted. An empty population is an error,
/// callers must short-circuit before asking for a percentile of nothing.
pub fn percentile(
    values: &[f64],
    q: f64,
) -> anyhow::Result<f64> {
    ensure!(!values.is_empty(), "Cannot compute a percentile of zero values");
    ensure!(
        q.is_finite() && (0.0..=100.0).contains(&q),
        "Percentile must be within [0, 100], got {}",
        q
    );

    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);

    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;

    let result = if lower == upper {
        sorted[lower]
    }
    else {
        sorted[lower] + (sorted[upper] - sorted[lower]) * frac
    };
    debug!(
        "Percentile {} over {} values (rank {:.3}) = {}",
        q,
        sorted.len(),
        rank,
        result
    );
    Ok(result)
}

/// Mean of unsigned integers truncated toward zero. `None` for empty input.
pub fn truncated_mean<I>(values: I) -> Option<u64>
where
    I: IntoIterator<Item = u64>, {
    let (sum, count) = values
        .into_iter()
        .fold((0u128, 0u128), |(s, c), v| (s + v as u128, c + 1));
    if count == 0 {
        None
    }
    else {
        Some((sum / count) as u64)
    }
}

/// Rounds `value` to `decimals` digits after the decimal point, halves to
/// even.
pub fn round_to(
    value: f64,
    decimals: u32,
) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0.0, 1.0)]
    #[case(100.0, 5.0)]
    #[case(50.0, 3.0)]
    #[case(25.0, 2.0)]
    #[case(90.0, 4.6)]
    #[case(98.0, 4.92)]
    fn test_percentile_linear(
        #[case] q: f64,
        #[case] expected: f64,
    ) {
        let values = [5.0, 1.0, 4.0, 2.0, 3.0];
        assert_approx_eq!(percentile(&values, q).unwrap(), expected, 1e-12);
    }

    #[test]
    fn test_percentile_single_value() {
        assert_eq!(percentile(&[0.7], 98.0).unwrap(), 0.7);
    }

    #[test]
    fn test_percentile_rejects_empty_and_out_of_range() {
        assert!(percentile(&[], 50.0).is_err());
        assert!(percentile(&[1.0], 100.5).is_err());
        assert!(percentile(&[1.0], -1.0).is_err());
        assert!(percentile(&[1.0], f64::NAN).is_err());
    }

    #[test]
    fn test_truncated_mean() {
        assert_eq!(truncated_mean([10, 11]), Some(10));
        assert_eq!(truncated_mean([10, 11, 12, 12]), Some(11));
        assert_eq!(truncated_mean([7]), Some(7));
        assert_eq!(truncated_mean(std::iter::empty()), None);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.123456789, 5), 0.12346);
        assert_eq!(round_to(0.99, 5), 0.99);
        assert_eq!(round_to(-1.000004, 5), -1.0);
    }

    #[rstest]
    #[case(0.000025, 0.00002)]
    #[case(0.000015, 0.00002)]
    #[case(0.000125, 0.00012)]
    #[case(0.5, 0.5)]
    fn test_round_to_halves_to_even(
        #[case] value: f64,
        #[case] expected: f64,
    ) {
        assert_eq!(round_to(value, 5), expected);
    }
}
