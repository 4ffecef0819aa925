//! Incremental CCDF over a known sample range.

use crate::error::CcdfError;
use crate::estimator::reverse_percent;
use crate::result::CcdfResult;

/// Equal-width histogram filled one chunk at a time.
///
/// Gives the same result as [`crate::ccdf`] when `min` and `max` are the
/// extremes of the data, without holding the samples. Used for traces too
/// long to collect: a first pass finds the range, a second pass fills the
/// bins.
///
/// ```
/// use tlaloc_ccdf::{CcdfAccumulator, ccdf};
///
/// let samples = [0.0, 0.0, 1.0, 2.5, 4.0];
/// let mut acc = CcdfAccumulator::new(0.0, 4.0, 4).unwrap();
/// acc.extend(&samples[..2]).unwrap();
/// acc.extend(&samples[2..]).unwrap();
/// assert_eq!(acc.finish().unwrap(), ccdf(&samples, 4).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct CcdfAccumulator {
    edges: Vec<f64>,
    counts: Vec<u64>,
    lo: f64,
    hi: f64,
    scale: f64,
    total: usize,
}

impl CcdfAccumulator {
    /// Creates `bins` equal-width bins over `[min, max]`. Equal bounds are
    /// widened by 0.5 on each side.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`CcdfError::ZeroBins`] | `bins == 0` |
    /// | [`CcdfError::InvalidEdges`] | a bound is not finite, or `min > max` |
    pub fn new(min: f64, max: f64, bins: usize) -> Result<Self, CcdfError> {
        if bins == 0 {
            return Err(CcdfError::ZeroBins);
        }
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(CcdfError::InvalidEdges {
                reason: format!("range [{min}, {max}] is not a finite interval"),
            });
        }
        let (lo, hi) = if min == max {
            (min - 0.5, max + 0.5)
        } else {
            (min, max)
        };

        let width = (hi - lo) / bins as f64;
        let mut edges: Vec<f64> = (0..=bins).map(|i| lo + i as f64 * width).collect();
        edges[bins] = hi;

        Ok(Self {
            edges,
            counts: vec![0; bins],
            lo,
            hi,
            scale: bins as f64 / (hi - lo),
            total: 0,
        })
    }

    /// Adds one sample. Samples outside the range count towards the total
    /// but fall in no bin.
    ///
    /// # Errors
    ///
    /// Returns [`CcdfError::NonFiniteSample`] with the sample's position in
    /// the whole stream.
    pub fn push(&mut self, x: f64) -> Result<(), CcdfError> {
        if !x.is_finite() {
            return Err(CcdfError::NonFiniteSample {
                index: self.total,
                value: x,
            });
        }
        self.total += 1;
        if x < self.lo || x > self.hi {
            return Ok(());
        }
        let bins = self.counts.len();
        let mut idx = (((x - self.lo) * self.scale) as usize).min(bins - 1);
        // Rounding in the scaled index can land one bin off.
        if x < self.edges[idx] {
            idx -= 1;
        } else if idx + 1 < bins && x >= self.edges[idx + 1] {
            idx += 1;
        }
        self.counts[idx] += 1;
        Ok(())
    }

    /// Adds a chunk of samples.
    ///
    /// # Errors
    ///
    /// Same as [`push`](Self::push); samples before the offending one stay
    /// counted.
    pub fn extend(&mut self, samples: &[f64]) -> Result<(), CcdfError> {
        samples.iter().try_for_each(|&x| self.push(x))
    }

    /// Samples seen so far.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn bin_edges(&self) -> &[f64] {
        &self.edges
    }

    /// Converts the counts to exceedance percentages.
    ///
    /// # Errors
    ///
    /// Returns [`CcdfError::EmptyData`] if no sample was added.
    pub fn finish(self) -> Result<CcdfResult, CcdfError> {
        if self.total == 0 {
            return Err(CcdfError::EmptyData);
        }
        let exceedance = reverse_percent(&self.counts, self.total);
        Ok(CcdfResult::new(self.edges, exceedance))
    }
}
