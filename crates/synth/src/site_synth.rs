//! Per-site state machine: temporal filter followed by the marginal map.

use crate::error::SynthError;
use crate::filter::Ar1Filter;
use crate::mapper::LognormalMapper;

/// Synthesizer for one site.
///
/// Holds only the filter state `G[n−1]`; samples are pulled one at a time
/// in strict temporal order.
#[derive(Debug, Clone)]
pub struct SiteSynthesizer {
    filter: Ar1Filter,
    mapper: LognormalMapper,
}

impl SiteSynthesizer {
    /// Creates a synthesizer from its two stages.
    pub fn new(filter: Ar1Filter, mapper: LognormalMapper) -> Self {
        Self { filter, mapper }
    }

    /// The temporal filter.
    pub fn filter(&self) -> &Ar1Filter {
        &self.filter
    }

    /// The marginal map.
    pub fn mapper(&self) -> &LognormalMapper {
        &self.mapper
    }

    /// Consumes innovation `eps` and returns the next attenuation sample (dB).
    pub fn next_sample(&mut self, eps: f64) -> f64 {
        self.mapper.map(self.filter.step(eps))
    }

    /// Fills `out` from the innovations in `eps`.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::BufferLengthMismatch`] if the lengths differ.
    pub fn fill(&mut self, eps: &[f64], out: &mut [f64]) -> Result<(), SynthError> {
        if eps.len() != out.len() {
            return Err(SynthError::BufferLengthMismatch {
                expected: eps.len(),
                got: out.len(),
            });
        }
        for (o, &e) in out.iter_mut().zip(eps) {
            *o = self.next_sample(e);
        }
        Ok(())
    }
}
