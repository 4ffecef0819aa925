//! Histogram and reverse cumulative sum.

use crate::accumulator::CcdfAccumulator;
use crate::error::CcdfError;
use crate::result::CcdfResult;

/// Empirical CCDF over `bins` equal-width bins spanning `[min, max]`.
///
/// A constant input widens the range by 0.5 on each side. The maximum
/// sample falls in the last bin. Percentages are relative to all samples.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`CcdfError::EmptyData`] | `samples` is empty |
/// | [`CcdfError::ZeroBins`] | `bins == 0` |
/// | [`CcdfError::NonFiniteSample`] | a sample is NaN or infinite |
pub fn ccdf(samples: &[f64], bins: usize) -> Result<CcdfResult, CcdfError> {
    check_samples(samples)?;
    if bins == 0 {
        return Err(CcdfError::ZeroBins);
    }

    let (lo, hi) = samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        });
    let mut acc = CcdfAccumulator::new(lo, hi, bins)?;
    acc.extend(samples)?;
    acc.finish()
}

/// Empirical CCDF over explicit ascending bin edges.
///
/// Samples outside `[edges[0], edges[last]]` are not counted in any bin but
/// still count in the normalization; a sample equal to the last edge falls
/// in the last bin.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`CcdfError::EmptyData`] | `samples` is empty |
/// | [`CcdfError::NonFiniteSample`] | a sample is NaN or infinite |
/// | [`CcdfError::InvalidEdges`] | fewer than two edges, a non-finite edge, or edges not strictly ascending |
pub fn ccdf_with_edges(samples: &[f64], edges: &[f64]) -> Result<CcdfResult, CcdfError> {
    check_samples(samples)?;
    if edges.len() < 2 {
        return Err(CcdfError::InvalidEdges {
            reason: format!("need at least 2 edges, got {}", edges.len()),
        });
    }
    if let Some(i) = edges.iter().position(|e| !e.is_finite()) {
        return Err(CcdfError::InvalidEdges {
            reason: format!("edge {i} is not finite"),
        });
    }
    if let Some(i) = edges.windows(2).position(|w| w[1] <= w[0]) {
        return Err(CcdfError::InvalidEdges {
            reason: format!("edges not strictly ascending at index {}", i + 1),
        });
    }

    let bins = edges.len() - 1;
    let (first, last) = (edges[0], edges[bins]);
    let mut counts = vec![0_u64; bins];
    for &x in samples {
        if x < first || x > last {
            continue;
        }
        let idx = edges.partition_point(|&e| e <= x).saturating_sub(1).min(bins - 1);
        counts[idx] += 1;
    }

    Ok(CcdfResult::new(
        edges.to_vec(),
        reverse_percent(&counts, samples.len()),
    ))
}

fn check_samples(samples: &[f64]) -> Result<(), CcdfError> {
    if samples.is_empty() {
        return Err(CcdfError::EmptyData);
    }
    if let Some((index, &value)) = samples.iter().enumerate().find(|(_, x)| !x.is_finite()) {
        return Err(CcdfError::NonFiniteSample { index, value });
    }
    Ok(())
}

pub(crate) fn reverse_percent(counts: &[u64], total: usize) -> Vec<f64> {
    let mut out = vec![0.0; counts.len()];
    let mut acc = 0_u64;
    for (o, &c) in out.iter_mut().zip(counts).rev() {
        acc += c;
        *o = 100.0 * acc as f64 / total as f64;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn uniform_ramp() {
        let samples: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let r = ccdf(&samples, 10).unwrap();
        assert_eq!(r.bin_edges().len(), 11);
        assert_relative_eq!(r.bin_edges()[0], 0.0);
        assert_relative_eq!(r.bin_edges()[10], 99.0);
        assert_eq!(r.exceedance()[0], 100.0);
        // Each bin of width 9.9 holds 10 samples.
        for (i, &p) in r.exceedance().iter().enumerate() {
            assert_relative_eq!(p, 100.0 - 10.0 * i as f64, epsilon = 1e-12);
        }
    }

    #[test]
    fn max_in_last_bin() {
        let r = ccdf(&[0.0, 1.0, 2.0], 2).unwrap();
        assert_relative_eq!(r.exceedance()[1], 200.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn constant_input_widened() {
        let r = ccdf(&[3.0; 4], 4).unwrap();
        assert_relative_eq!(r.bin_edges()[0], 2.5);
        assert_relative_eq!(r.bin_edges()[4], 3.5);
        // 3.0 sits at the lower edge of bin 2.
        assert_eq!(r.exceedance(), &[100.0, 100.0, 100.0, 0.0]);
    }

    #[test]
    fn non_increasing() {
        let samples: Vec<f64> = (0..1000).map(|i| ((i * 7919) % 1000) as f64 / 37.0).collect();
        let r = ccdf(&samples, 33).unwrap();
        assert!(r.exceedance().windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(r.exceedance()[0], 100.0);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(ccdf(&[], 10), Err(CcdfError::EmptyData));
        assert_eq!(ccdf(&[1.0], 0), Err(CcdfError::ZeroBins));
        assert!(matches!(
            ccdf(&[1.0, f64::INFINITY], 10),
            Err(CcdfError::NonFiniteSample { index: 1, .. })
        ));
    }

    #[test]
    fn explicit_edges_count_out_of_range_in_total() {
        let samples = [-1.0, 0.0, 0.5, 1.0, 1.5, 2.0, 5.0, 9.0];
        let r = ccdf_with_edges(&samples, &[0.0, 1.0, 2.0]).unwrap();
        // Bin 0: 0.0, 0.5; bin 1: 1.0, 1.5, 2.0; -1.0, 5.0 and 9.0 unbinned.
        assert_relative_eq!(r.exceedance()[0], 62.5, epsilon = 1e-12);
        assert_relative_eq!(r.exceedance()[1], 37.5, epsilon = 1e-12);
    }

    #[test]
    fn explicit_edges_validation() {
        assert!(matches!(
            ccdf_with_edges(&[1.0], &[0.0]),
            Err(CcdfError::InvalidEdges { .. })
        ));
        let err = ccdf_with_edges(&[1.0], &[0.0, 2.0, 1.0]).unwrap_err();
        assert!(err.to_string().contains("index 2"));
        assert!(ccdf_with_edges(&[1.0], &[0.0, f64::NAN]).is_err());
        assert_eq!(ccdf_with_edges(&[], &[0.0, 1.0]), Err(CcdfError::EmptyData));
    }

    #[test]
    fn edges_match_equal_width_estimator() {
        let samples: Vec<f64> = (0..500).map(|i| (i as f64 * 0.013).sin().abs() * 4.0).collect();
        let a = ccdf(&samples, 20).unwrap();
        let b = ccdf_with_edges(&samples, a.bin_edges()).unwrap();
        for (x, y) in a.exceedance().iter().zip(b.exceedance()) {
            assert_relative_eq!(x, y, epsilon = 1e-12);
        }
    }
}
