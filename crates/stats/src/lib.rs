//! Descriptive statistics for synthesized attenuation series.
//!
//! Used by validation code and tests to check marginal and joint properties
//! of generated traces (moments, cross-site correlation, persistence).

/// Arithmetic mean of a slice. Returns 0.0 if empty.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Sample variance with N-1 denominator.
/// Returns 0.0 if fewer than 2 elements.
pub fn variance(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(data);
    data.iter().map(|&x| (x - m) * (x - m)).sum::<f64>() / (n as f64 - 1.0)
}

/// Sample standard deviation with N-1 denominator.
pub fn sd(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// Type-7 (linear interpolation) quantile of pre-sorted data.
///
/// **Expects ascending input** (caller's responsibility).
///
/// # Panics
///
/// Panics if `sorted` is empty.
pub fn quantile_type7(sorted: &[f64], p: f64) -> f64 {
    assert!(
        !sorted.is_empty(),
        "quantile_type7: input must not be empty"
    );
    let n = sorted.len();
    let h = (n - 1) as f64 * p.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    sorted[lo] + (h - h.floor()) * (sorted[hi] - sorted[lo])
}

/// Value exceeded by `percent` % of the samples.
///
/// Sorts a copy of `data` and reads the type-7 quantile at
/// `1 - percent / 100`. Returns `None` for empty input or a percentage
/// outside `[0, 100]`.
pub fn exceeded_value(data: &[f64], percent: f64) -> Option<f64> {
    if data.is_empty() || !(0.0..=100.0).contains(&percent) {
        return None;
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Some(quantile_type7(&sorted, 1.0 - percent / 100.0))
}

/// Fraction of samples strictly greater than `threshold`, in percent.
pub fn percent_above(data: &[f64], threshold: f64) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let count = data.iter().filter(|&&x| x > threshold).count();
    100.0 * count as f64 / data.len() as f64
}

/// Pearson correlation coefficient.
///
/// Filters to indices where both `x[i]` and `y[i]` are finite.
/// Returns `None` if fewer than 3 finite pairs or if either series is
/// constant.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y.iter())
        .filter(|(xi, yi)| xi.is_finite() && yi.is_finite())
        .map(|(xi, yi)| (*xi, *yi))
        .collect();

    if pairs.len() < 3 {
        return None;
    }

    let n = pairs.len() as f64;
    let mx: f64 = pairs.iter().map(|(xi, _)| xi).sum::<f64>() / n;
    let my: f64 = pairs.iter().map(|(_, yi)| yi).sum::<f64>() / n;

    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    let mut sum_yy = 0.0;
    for &(xi, yi) in &pairs {
        let dx = xi - mx;
        let dy = yi - my;
        sum_xy += dx * dy;
        sum_xx += dx * dx;
        sum_yy += dy * dy;
    }

    let denom = (sum_xx * sum_yy).sqrt();
    if denom == 0.0 {
        return None;
    }

    Some(sum_xy / denom)
}

/// Lag-`lag` sample autocorrelation (biased estimator, N denominator).
///
/// Returns `None` if `lag >= data.len()` or the series is constant.
pub fn autocorrelation(data: &[f64], lag: usize) -> Option<f64> {
    let n = data.len();
    if lag >= n {
        return None;
    }
    let m = mean(data);
    let var: f64 = data.iter().map(|x| (x - m).powi(2)).sum();
    if var == 0.0 {
        return None;
    }
    let cov: f64 = data
        .iter()
        .skip(lag)
        .zip(data.iter())
        .map(|(a, b)| (a - m) * (b - m))
        .sum();
    Some(cov / var)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&data), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_sd() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(sd(&data), 2.138090, epsilon = 1e-6);
    }

    #[test]
    fn test_variance_two() {
        // [3.0, 7.0]: mean=5, sum_sq=8, var=8/1=8
        assert_relative_eq!(variance(&[3.0, 7.0]), 8.0, epsilon = 1e-12);
    }

    #[test]
    fn test_variance_short() {
        assert_eq!(variance(&[]), 0.0);
        assert_eq!(variance(&[5.0]), 0.0);
    }

    #[test]
    fn test_quantile_type7_interpolation() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(quantile_type7(&sorted, 0.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(quantile_type7(&sorted, 0.1), 1.4, epsilon = 1e-12);
        assert_relative_eq!(quantile_type7(&sorted, 0.5), 3.0, epsilon = 1e-12);
        assert_relative_eq!(quantile_type7(&sorted, 1.0), 5.0, epsilon = 1e-12);
    }

    #[test]
    #[should_panic(expected = "quantile_type7: input must not be empty")]
    fn test_quantile_type7_empty_panics() {
        quantile_type7(&[], 0.5);
    }

    #[test]
    fn test_exceeded_value() {
        let data: Vec<f64> = (1..=101).map(|x| x as f64).collect();
        // 10 % of samples exceed the 0.9 quantile
        assert_relative_eq!(exceeded_value(&data, 10.0).unwrap(), 91.0, epsilon = 1e-12);
        assert_relative_eq!(exceeded_value(&data, 100.0).unwrap(), 1.0, epsilon = 1e-12);
        assert!(exceeded_value(&data, 101.0).is_none());
        assert!(exceeded_value(&[], 1.0).is_none());
    }

    #[test]
    fn test_percent_above() {
        let data = [0.0, 0.0, 0.0, 1.5, 3.0];
        assert_relative_eq!(percent_above(&data, 0.0), 40.0, epsilon = 1e-12);
        assert_relative_eq!(percent_above(&data, 2.0), 20.0, epsilon = 1e-12);
        assert_eq!(percent_above(&[], 0.0), 0.0);
    }

    #[test]
    fn test_pearson_correlation_perfect() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 6.0, 8.0, 10.0];
        assert_relative_eq!(pearson_correlation(&x, &y).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pearson_correlation_insufficient() {
        assert!(pearson_correlation(&[1.0, 2.0], &[3.0, 4.0]).is_none());
    }

    #[test]
    fn test_pearson_correlation_constant() {
        assert!(pearson_correlation(&[0.0; 5], &[1.0, 2.0, 3.0, 4.0, 5.0]).is_none());
    }

    #[test]
    fn test_pearson_correlation_with_nan() {
        let x = [1.0, f64::NAN, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, f64::NAN, 8.0, 10.0];
        // Finite pairs: (1,2), (4,8), (5,10)
        assert_relative_eq!(pearson_correlation(&x, &y).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_autocorrelation_alternating() {
        let data = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        // cov at lag 1 = -5, var = 6
        assert_relative_eq!(autocorrelation(&data, 1).unwrap(), -5.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(autocorrelation(&data, 0).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_autocorrelation_degenerate() {
        assert!(autocorrelation(&[1.0, 2.0], 2).is_none());
        assert!(autocorrelation(&[3.0; 10], 1).is_none());
    }
}
