/// Day-over-day percent changes: `ret[t] = close[t] / close[t-1] - 1`.
/// The first observation has no predecessor, so the output is one shorter
/// than the input (empty for fewer than two closes).
pub fn daily_returns(closes: &[f64]) -> Vec<f64> {
    closes.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

/// Sample standard deviation (n - 1 denominator).
/// Returns `None` for fewer than two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);

    Some(variance.sqrt())
}

/// Pearson correlation coefficient between two equal-length sequences:
/// - +1.0: move together
/// -  0.0: independent movement
/// - -1.0: move opposite
///
/// Returns `None` on length mismatch, fewer than two observations, or zero
/// variance in either sequence.
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;

    for (x, y) in xs.iter().zip(ys.iter()) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let std_x = var_x.sqrt();
    let std_y = var_y.sqrt();

    if std_x < f64::EPSILON || std_y < f64::EPSILON {
        return None;
    }

    Some(cov / (std_x * std_y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close_to(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-10, "{a} != {b}");
    }

    #[test]
    fn returns_are_ratios_minus_one() {
        let rets = daily_returns(&[100.0, 110.0, 121.0]);
        assert_eq!(rets.len(), 2);
        close_to(rets[0], 0.10);
        close_to(rets[1], 0.10);
    }

    #[test]
    fn returns_empty_for_single_close() {
        assert!(daily_returns(&[100.0]).is_empty());
        assert!(daily_returns(&[]).is_empty());
    }

    #[test]
    fn std_dev_matches_hand_computation() {
        // mean 4, squared deviations 4+1+1+4 = 10, sample variance 10/3
        let sd = sample_std_dev(&[2.0, 3.0, 5.0, 6.0]).unwrap();
        close_to(sd, (10.0_f64 / 3.0).sqrt());
    }

    #[test]
    fn std_dev_needs_two_values() {
        assert!(sample_std_dev(&[1.0]).is_none());
    }

    #[test]
    fn perfectly_linear_sequences_correlate_at_one() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [10.0, 20.0, 30.0, 40.0];
        close_to(pearson_correlation(&xs, &ys).unwrap(), 1.0);

        let neg = [4.0, 3.0, 2.0, 1.0];
        close_to(pearson_correlation(&xs, &neg).unwrap(), -1.0);
    }

    #[test]
    fn zero_variance_yields_none() {
        assert!(pearson_correlation(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_none());
    }

    #[test]
    fn length_mismatch_yields_none() {
        assert!(pearson_correlation(&[1.0, 2.0], &[1.0, 2.0, 3.0]).is_none());
    }
}
