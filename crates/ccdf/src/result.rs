//! CCDF result container.

use serde::{Deserialize, Serialize};

/// Empirical CCDF: `bins + 1` ascending edges and one exceedance
/// percentage per bin.
///
/// `exceedance()[i]` is the percentage of samples `≥ bin_edges()[i]`, so the
/// sequence is non-increasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CcdfResult {
    bin_edges: Vec<f64>,
    exceedance: Vec<f64>,
}

impl CcdfResult {
    pub(crate) fn new(bin_edges: Vec<f64>, exceedance: Vec<f64>) -> Self {
        debug_assert_eq!(bin_edges.len(), exceedance.len() + 1);
        Self {
            bin_edges,
            exceedance,
        }
    }

    /// Bin edges, ascending, `n_bins() + 1` entries.
    pub fn bin_edges(&self) -> &[f64] {
        &self.bin_edges
    }

    /// Exceedance percentages, one per bin.
    pub fn exceedance(&self) -> &[f64] {
        &self.exceedance
    }

    /// Number of bins.
    pub fn n_bins(&self) -> usize {
        self.exceedance.len()
    }

    /// `(lower edge, percentage)` pairs, one per bin.
    ///
    /// The percentage is exact at the lower edge. Plots that pair each
    /// percentage with the bin's upper edge, as `bin_edges[1..]` does, use
    /// [`upper_points`](Self::upper_points) instead; that curve sits one bin
    /// width to the right of this one.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.bin_edges
            .iter()
            .copied()
            .zip(self.exceedance.iter().copied())
    }

    /// `(upper edge, percentage)` pairs, one per bin.
    pub fn upper_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.bin_edges[1..]
            .iter()
            .copied()
            .zip(self.exceedance.iter().copied())
    }

    /// Percentage of samples at or above `x`, interpolated linearly between
    /// bin edges. The curve is taken to reach 0 at the last edge.
    pub fn exceedance_at(&self, x: f64) -> f64 {
        let n = self.n_bins();
        if x <= self.bin_edges[0] {
            return self.exceedance[0];
        }
        if x >= self.bin_edges[n] {
            return 0.0;
        }
        let i = self.bin_edges.partition_point(|&e| e <= x) - 1;
        let (x0, x1) = (self.bin_edges[i], self.bin_edges[i + 1]);
        let (y0, y1) = (self.exceedance[i], self.level(i + 1));
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }

    /// Attenuation exceeded `p` % of the time: the inverse of
    /// [`exceedance_at`](Self::exceedance_at).
    ///
    /// Returns `None` unless `0 < p ≤ exceedance()[0]`.
    pub fn attenuation_at(&self, p: f64) -> Option<f64> {
        if !p.is_finite() || p <= 0.0 || p > self.exceedance[0] {
            return None;
        }
        let n = self.n_bins();
        let i = (0..n).find(|&i| self.level(i + 1) < p)?;
        let (y0, y1) = (self.exceedance[i], self.level(i + 1));
        let (x0, x1) = (self.bin_edges[i], self.bin_edges[i + 1]);
        Some(x0 + (x1 - x0) * (y0 - p) / (y0 - y1))
    }

    fn level(&self, i: usize) -> f64 {
        self.exceedance.get(i).copied().unwrap_or(0.0)
    }
}
