//! Validated synthesis requests.

use tlaloc_site::{SiteDescriptor, SiteError, sites_from_arrays};

use crate::error::SynthError;

/// What to synthesize: sites, sample count, sampling interval and seed.
///
/// # Example
///
/// ```
/// use tlaloc_synth::SynthesisRequest;
///
/// let req = SynthesisRequest::from_arrays(
///     &[50.66, 46.20],
///     &[4.62, 6.15],
///     &[39.4, 39.4],
///     &[35.0, 35.0],
///     &[45.0, 45.0],
///     86_400,
///     1.0,
/// )
/// .unwrap()
/// .with_seed(42);
/// assert_eq!(req.n_sites(), 2);
/// assert_eq!(req.duration_s(), 86_400.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    sites: Vec<SiteDescriptor>,
    n_samples: usize,
    sampling_interval_s: f64,
    seed: Option<u64>,
}

impl SynthesisRequest {
    /// Creates a request from already-built sites.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`SynthError::Site`] | `sites` is empty |
    /// | [`SynthError::ZeroSamples`] | `n_samples == 0` |
    /// | [`SynthError::InvalidSamplingInterval`] | `sampling_interval_s` not finite and > 0 |
    pub fn new(
        sites: Vec<SiteDescriptor>,
        n_samples: usize,
        sampling_interval_s: f64,
    ) -> Result<Self, SynthError> {
        if sites.is_empty() {
            return Err(SiteError::NoSites.into());
        }
        if n_samples == 0 {
            return Err(SynthError::ZeroSamples);
        }
        if !sampling_interval_s.is_finite() || sampling_interval_s <= 0.0 {
            return Err(SynthError::InvalidSamplingInterval {
                value: sampling_interval_s,
            });
        }
        Ok(Self {
            sites,
            n_samples,
            sampling_interval_s,
            seed: None,
        })
    }

    /// Creates a request from per-site parallel arrays.
    ///
    /// # Errors
    ///
    /// As [`new`](Self::new), plus [`SynthError::Site`] wrapping
    /// [`SiteError::LengthMismatch`] (naming the field) or an invalid site.
    pub fn from_arrays(
        latitude: &[f64],
        longitude: &[f64],
        frequency_ghz: &[f64],
        elevation_deg: &[f64],
        tilt_deg: &[f64],
        n_samples: usize,
        sampling_interval_s: f64,
    ) -> Result<Self, SynthError> {
        let sites = sites_from_arrays(latitude, longitude, frequency_ghz, elevation_deg, tilt_deg)?;
        Self::new(sites, n_samples, sampling_interval_s)
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns the sites.
    pub fn sites(&self) -> &[SiteDescriptor] {
        &self.sites
    }

    /// Number of sites.
    pub fn n_sites(&self) -> usize {
        self.sites.len()
    }

    /// Number of samples per site.
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Sampling interval in seconds.
    pub fn sampling_interval_s(&self) -> f64 {
        self.sampling_interval_s
    }

    /// Random seed, if set.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Covered duration in seconds.
    pub fn duration_s(&self) -> f64 {
        self.n_samples as f64 * self.sampling_interval_s
    }
}

/// Number of samples covering `duration_s` at interval `sampling_interval_s`:
/// `floor(duration / Ts)`.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`SynthError::InvalidDuration`] | `duration_s` negative or not finite, or more samples than `usize` can count |
/// | [`SynthError::InvalidSamplingInterval`] | `sampling_interval_s` not finite and > 0 |
pub fn samples_for_duration(duration_s: f64, sampling_interval_s: f64) -> Result<usize, SynthError> {
    if !duration_s.is_finite() || duration_s < 0.0 {
        return Err(SynthError::InvalidDuration { value: duration_s });
    }
    if !sampling_interval_s.is_finite() || sampling_interval_s <= 0.0 {
        return Err(SynthError::InvalidSamplingInterval {
            value: sampling_interval_s,
        });
    }
    let samples = (duration_s / sampling_interval_s).floor();
    if samples >= usize::MAX as f64 {
        return Err(SynthError::InvalidDuration { value: duration_s });
    }
    Ok(samples as usize)
}
