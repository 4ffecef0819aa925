use approx::assert_relative_eq;
use tlaloc_ccdf::{ccdf, ccdf_with_edges};

/// Deterministic unit-exponential sample: the midpoint quantiles.
fn exponential(n: usize) -> Vec<f64> {
    (0..n)
        .map(|k| -(1.0 - (k as f64 + 0.5) / n as f64).ln())
        .collect()
}

#[test]
fn recovers_exponential_tail() {
    let samples = exponential(100_000);
    let r = ccdf(&samples, 300).unwrap();
    assert_eq!(r.n_bins(), 300);
    assert_relative_eq!(r.exceedance_at(1.0), 100.0 * (-1.0_f64).exp(), epsilon = 0.1);
    assert_relative_eq!(r.attenuation_at(10.0).unwrap(), 10.0_f64.ln(), epsilon = 0.02);
    assert_relative_eq!(r.attenuation_at(1.0).unwrap(), 100.0_f64.ln(), epsilon = 0.05);
}

#[test]
fn explicit_grid_matches_direct_count() {
    let samples = exponential(10_000);
    let edges: Vec<f64> = (0..=20).map(|i| i as f64 * 0.25).collect();
    let r = ccdf_with_edges(&samples, &edges).unwrap();
    for (i, &e) in edges[..20].iter().enumerate() {
        // Samples beyond the last edge are unbinned, so subtract them.
        let beyond = samples.iter().filter(|&&x| x > 5.0).count();
        let at_or_above = samples.iter().filter(|&&x| x >= e).count() - beyond;
        assert_relative_eq!(
            r.exceedance()[i],
            100.0 * at_or_above as f64 / samples.len() as f64,
            epsilon = 1e-9
        );
    }
}

#[test]
fn json_round_trip_preserves_result() {
    let r = ccdf(&exponential(1000), 50).unwrap();
    let json = serde_json::to_string_pretty(&r).unwrap();
    let back: tlaloc_ccdf::CcdfResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back.n_bins(), r.n_bins());
    for (a, b) in back.points().zip(r.points()) {
        assert_relative_eq!(a.0, b.0, max_relative = 1e-15);
        assert_relative_eq!(a.1, b.1, max_relative = 1e-15);
    }
}
