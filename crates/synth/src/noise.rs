//! Spatially correlated standard-normal innovations.

use ndarray::ArrayViewMut2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use tlaloc_spatial::CorrelationFactor;

use crate::config::SynthConfig;
use crate::error::SynthError;

/// Draws one vector `ε = L·z` per time step, `z` i.i.d. standard normal.
///
/// All sites share one generator, so the sequence depends only on the seed
/// and the number of steps drawn, not on how steps are grouped into blocks.
#[derive(Debug, Clone)]
pub struct CorrelatedNoise {
    factor: CorrelationFactor,
    rng: StdRng,
    z: Vec<f64>,
    eps: Vec<f64>,
}

impl CorrelatedNoise {
    /// Creates a generator seeded with `seed`, or from the OS when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::MissingSeed`] if `seed` is `None` and the
    /// configuration requires a seed.
    pub fn new(
        factor: CorrelationFactor,
        seed: Option<u64>,
        config: &SynthConfig,
    ) -> Result<Self, SynthError> {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None if config.require_seed() => return Err(SynthError::MissingSeed),
            None => StdRng::from_os_rng(),
        };
        let n = factor.n_sites();
        Ok(Self {
            factor,
            rng,
            z: vec![0.0; n],
            eps: vec![0.0; n],
        })
    }

    /// Number of sites.
    pub fn n_sites(&self) -> usize {
        self.factor.n_sites()
    }

    /// The correlation factor in use.
    pub fn factor(&self) -> &CorrelationFactor {
        &self.factor
    }

    /// Draws the next correlated vector into `out`.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::BufferLengthMismatch`] if `out` does not have
    /// one entry per site.
    pub fn next_into(&mut self, out: &mut [f64]) -> Result<(), SynthError> {
        if out.len() != self.n_sites() {
            return Err(SynthError::BufferLengthMismatch {
                expected: self.n_sites(),
                got: out.len(),
            });
        }
        for z in &mut self.z {
            *z = self.rng.sample(StandardNormal);
        }
        self.factor.project(&self.z, out)?;
        Ok(())
    }

    /// Fills a `sites × steps` block column by column, in time order.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::BufferLengthMismatch`] if the block does not
    /// have one row per site.
    pub fn fill_block(&mut self, mut block: ArrayViewMut2<'_, f64>) -> Result<(), SynthError> {
        if block.nrows() != self.n_sites() {
            return Err(SynthError::BufferLengthMismatch {
                expected: self.n_sites(),
                got: block.nrows(),
            });
        }
        let mut eps = std::mem::take(&mut self.eps);
        for mut column in block.columns_mut() {
            self.next_into(&mut eps)?;
            for (dst, &src) in column.iter_mut().zip(&eps) {
                *dst = src;
            }
        }
        self.eps = eps;
        Ok(())
    }
}
