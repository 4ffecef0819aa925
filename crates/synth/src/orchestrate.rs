//! Lock-step multi-site synthesis.
//!
//! One correlated innovation vector is drawn per time step from a single
//! generator. Per block, the innovations are drawn sequentially and the
//! sites then advance in parallel, each reading only its own row.

use ndarray::{Array2, ArrayViewMut2, Axis, s};
use rayon::prelude::*;
use tlaloc_exceedance::{ClimatologyProvider, ExceedanceError, fit_lognormal};
use tlaloc_site::SiteDescriptor;
use tlaloc_spatial::{
    CorrelationFactor, CorrelationMatrix, SpatialConfig, correlation_factor, factorize,
};
use tracing::{debug, info, warn};

use crate::config::SynthConfig;
use crate::error::SynthError;
use crate::filter::Ar1Filter;
use crate::mapper::LognormalMapper;
use crate::noise::CorrelatedNoise;
use crate::request::SynthesisRequest;
use crate::series::{TimeSeries, TimeSeriesBlock};
use crate::site_synth::SiteSynthesizer;

/// A prepared multi-site run.
///
/// Construction performs every check and every provider query, so once it
/// succeeds sampling cannot fail on configuration grounds.
#[derive(Debug)]
pub struct MultiSiteSynthesis {
    noise: CorrelatedNoise,
    sites: Vec<SiteSynthesizer>,
    n_samples: usize,
    produced: usize,
    sampling_interval_s: f64,
    block_len: usize,
    max_in_memory_values: usize,
}

impl MultiSiteSynthesis {
    /// Validates the configuration and site domain, queries `provider` for
    /// each site, fits the marginal maps, factorizes the correlation matrix
    /// and seeds the generator. Warm-up samples, if configured, are
    /// generated and discarded here.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`SynthError::InvalidConfig`] / [`SynthError::Spatial`] | `config` fails validation |
    /// | [`SynthError::OutOfDomain`] | a site's frequency or elevation is outside the validated range |
    /// | [`SynthError::Exceedance`] | the provider or the lognormal fit fails for a site |
    /// | [`SynthError::InvalidTimeConstant`] | the provider reports an invalid time constant |
    /// | [`SynthError::Spatial`] | the correlation matrix cannot be factorized |
    /// | [`SynthError::MissingSeed`] | no seed while the configuration requires one |
    #[tracing::instrument(skip_all, fields(n_sites = request.n_sites(), n_samples = request.n_samples()))]
    pub fn new<P>(
        request: &SynthesisRequest,
        provider: &P,
        config: &SynthConfig,
    ) -> Result<Self, SynthError>
    where
        P: ClimatologyProvider + ?Sized,
    {
        config.validate()?;
        check_domain(request.sites(), config)?;

        let ts = request.sampling_interval_s();
        let mut sites = Vec::with_capacity(request.n_sites());
        let mut rates = Vec::with_capacity(request.n_sites());
        for (i, site) in request.sites().iter().enumerate() {
            let at_site = move |source: ExceedanceError| SynthError::Exceedance { site: i, source };
            let curve = provider.exceedance_curve(site).map_err(at_site)?;
            let fit = fit_lognormal(&curve).map_err(at_site)?;

            let time_constant = provider
                .time_constant(site)
                .unwrap_or(config.time_constant());
            if !time_constant.is_finite() || time_constant <= 0.0 {
                return Err(SynthError::InvalidTimeConstant {
                    site: i,
                    value: time_constant,
                });
            }
            debug!(
                site = i,
                mu = fit.mu(),
                sigma = fit.sigma(),
                p_rain = fit.rain_probability(),
                time_constant,
                "site model fitted"
            );

            rates.push(ts / time_constant);
            let filter = Ar1Filter::new(ts, time_constant, config.initial_state())?;
            let mapper = LognormalMapper::new(&fit, config.dry_transition());
            sites.push(SiteSynthesizer::new(filter, mapper));
        }

        let factor = innovation_factor(request.sites(), &rates, config.spatial())?;
        let regularized = factor.regularized();
        let noise = CorrelatedNoise::new(factor, request.seed(), config)?;

        let mut synthesis = Self {
            noise,
            sites,
            n_samples: request.n_samples(),
            produced: 0,
            sampling_interval_s: ts,
            block_len: config.block_len(),
            max_in_memory_values: config.max_in_memory_values(),
        };
        synthesis.warm_up(config.warmup_samples())?;

        info!(
            seeded = request.seed().is_some(),
            regularized,
            warmup = config.warmup_samples(),
            "synthesis initialized"
        );
        Ok(synthesis)
    }

    /// Number of sites.
    pub fn n_sites(&self) -> usize {
        self.sites.len()
    }

    /// Total number of samples per site in this run.
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Samples per site produced so far.
    pub fn produced(&self) -> usize {
        self.produced
    }

    /// Samples per site still to be produced.
    pub fn remaining(&self) -> usize {
        self.n_samples - self.produced
    }

    /// Sampling interval in seconds.
    pub fn sampling_interval_s(&self) -> f64 {
        self.sampling_interval_s
    }

    /// The correlation factor shared by all sites.
    pub fn factor(&self) -> &CorrelationFactor {
        self.noise.factor()
    }

    /// Per-site synthesizers, in request order.
    pub fn sites(&self) -> &[SiteSynthesizer] {
        &self.sites
    }

    /// Produces the next block of at most `max_len` samples per site, or
    /// `None` once the run is complete.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::InvalidConfig`] if `max_len == 0`.
    pub fn next_block(&mut self, max_len: usize) -> Result<Option<TimeSeriesBlock>, SynthError> {
        if max_len == 0 {
            return Err(SynthError::InvalidConfig {
                reason: "block length must be positive".to_string(),
            });
        }
        let len = max_len.min(self.remaining());
        if len == 0 {
            return Ok(None);
        }
        let mut values = Array2::<f64>::zeros((self.n_sites(), len));
        self.advance_into(values.view_mut())?;
        let block = TimeSeriesBlock::new(self.produced, values, self.sampling_interval_s);
        self.produced += len;
        Ok(Some(block))
    }

    /// Generates every remaining sample into one in-memory matrix.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::MemoryCeiling`] before allocating if the output
    /// would exceed the configured value budget.
    pub fn run(mut self) -> Result<TimeSeries, SynthError> {
        let n = self.remaining();
        check_memory(self.n_sites(), n, self.max_in_memory_values)?;

        let mut values = Array2::<f64>::zeros((self.n_sites(), n));
        let mut start = 0;
        while start < n {
            let end = (start + self.block_len).min(n);
            self.advance_into(values.slice_mut(s![.., start..end]))?;
            start = end;
        }
        self.produced = self.n_samples;
        debug!(n_samples = n, "in-memory run complete");
        Ok(TimeSeries::new(values, self.sampling_interval_s))
    }

    /// Turns this run into a stream of blocks of `block_len` samples per
    /// site (the last block may be shorter).
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::InvalidConfig`] if `block_len == 0`.
    pub fn into_blocks(self, block_len: usize) -> Result<BlockStream, SynthError> {
        if block_len == 0 {
            return Err(SynthError::InvalidConfig {
                reason: "block length must be positive".to_string(),
            });
        }
        Ok(BlockStream {
            synthesis: self,
            block_len,
            done: false,
        })
    }

    fn warm_up(&mut self, n: usize) -> Result<(), SynthError> {
        if n == 0 {
            return Ok(());
        }
        let mut left = n;
        let mut scratch = Array2::<f64>::zeros((self.n_sites(), self.block_len.min(n)));
        while left > 0 {
            let len = left.min(scratch.ncols());
            self.advance_into(scratch.slice_mut(s![.., ..len]))?;
            left -= len;
        }
        debug!(samples = n, "warm-up discarded");
        Ok(())
    }

    fn advance_into(&mut self, mut out: ArrayViewMut2<'_, f64>) -> Result<(), SynthError> {
        let mut noise = Array2::<f64>::zeros(out.raw_dim());
        self.noise.fill_block(noise.view_mut())?;

        self.sites
            .par_iter_mut()
            .zip(out.axis_iter_mut(Axis(0)).into_par_iter())
            .zip(noise.axis_iter(Axis(0)).into_par_iter())
            .for_each(|((synth, mut row), eps)| {
                for (o, &e) in row.iter_mut().zip(eps.iter()) {
                    *o = synth.next_sample(e);
                }
            });
        Ok(())
    }
}

/// Iterator over the blocks of a streamed run.
///
/// Filter state carries across block boundaries, so concatenating the
/// blocks reproduces the in-memory output for the same seed. Dropping the
/// stream between blocks cancels the run.
#[derive(Debug)]
pub struct BlockStream {
    synthesis: MultiSiteSynthesis,
    block_len: usize,
    done: bool,
}

impl BlockStream {
    /// Number of sites.
    pub fn n_sites(&self) -> usize {
        self.synthesis.n_sites()
    }

    /// Total number of samples per site.
    pub fn n_samples(&self) -> usize {
        self.synthesis.n_samples()
    }

    /// Samples per site not yet yielded.
    pub fn remaining(&self) -> usize {
        self.synthesis.remaining()
    }

    /// Block length in samples.
    pub fn block_len(&self) -> usize {
        self.block_len
    }

    /// Sampling interval in seconds.
    pub fn sampling_interval_s(&self) -> f64 {
        self.synthesis.sampling_interval_s()
    }
}

impl Iterator for BlockStream {
    type Item = Result<TimeSeriesBlock, SynthError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.synthesis.next_block(self.block_len) {
            Ok(Some(block)) => Some(Ok(block)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let n = self.remaining().div_ceil(self.block_len);
        (n, Some(n))
    }
}

impl std::iter::FusedIterator for BlockStream {}

/// Synthesizes the full `sites × samples` matrix in memory.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`SynthError::MemoryCeiling`] | `sites × samples` exceeds the configured budget (checked first) |
/// | any | see [`MultiSiteSynthesis::new`] |
///
/// # Example
///
/// ```
/// use tlaloc_exceedance::LognormalClimatology;
/// use tlaloc_synth::{SynthConfig, SynthesisRequest, synthesize};
///
/// let provider = LognormalClimatology::new(-0.5, 1.0, 5.0).unwrap();
/// let request = SynthesisRequest::from_arrays(
///     &[45.0, 45.2], &[5.0, 5.1], &[20.0, 20.0], &[35.0, 35.0], &[0.0, 0.0],
///     1_000, 1.0,
/// )
/// .unwrap()
/// .with_seed(7);
/// let series = synthesize(&request, &provider, &SynthConfig::new()).unwrap();
/// assert_eq!(series.values().dim(), (2, 1_000));
/// assert!(series.values().iter().all(|a| a.is_finite() && *a >= 0.0));
/// ```
pub fn synthesize<P>(
    request: &SynthesisRequest,
    provider: &P,
    config: &SynthConfig,
) -> Result<TimeSeries, SynthError>
where
    P: ClimatologyProvider + ?Sized,
{
    config.validate()?;
    check_memory(
        request.n_sites(),
        request.n_samples(),
        config.max_in_memory_values(),
    )?;
    MultiSiteSynthesis::new(request, provider, config)?.run()
}

/// Prepares a streamed run yielding blocks of `block_len` samples per site.
///
/// # Errors
///
/// As [`MultiSiteSynthesis::new`], plus [`SynthError::InvalidConfig`] if
/// `block_len == 0`.
pub fn synthesize_blocks<P>(
    request: &SynthesisRequest,
    provider: &P,
    config: &SynthConfig,
    block_len: usize,
) -> Result<BlockStream, SynthError>
where
    P: ClimatologyProvider + ?Sized,
{
    if block_len == 0 {
        return Err(SynthError::InvalidConfig {
            reason: "block length must be positive".to_string(),
        });
    }
    MultiSiteSynthesis::new(request, provider, config)?.into_blocks(block_len)
}

/// One-call form taking per-site parallel arrays.
///
/// # Errors
///
/// As [`SynthesisRequest::from_arrays`] and [`synthesize`].
#[allow(clippy::too_many_arguments)]
pub fn rain_attenuation_synthesis<P>(
    latitude: &[f64],
    longitude: &[f64],
    frequency_ghz: &[f64],
    elevation_deg: &[f64],
    tilt_deg: &[f64],
    n_samples: usize,
    sampling_interval_s: f64,
    seed: Option<u64>,
    provider: &P,
    config: &SynthConfig,
) -> Result<TimeSeries, SynthError>
where
    P: ClimatologyProvider + ?Sized,
{
    let mut request = SynthesisRequest::from_arrays(
        latitude,
        longitude,
        frequency_ghz,
        elevation_deg,
        tilt_deg,
        n_samples,
        sampling_interval_s,
    )?;
    if let Some(s) = seed {
        request = request.with_seed(s);
    }
    synthesize(&request, provider, config)
}

/// Factor of the innovation correlation that gives the filtered processes
/// the distance-derived correlation.
///
/// Two AR(1) filters with rates `r_i = Ts/β_i` driven by innovations of
/// correlation `c` have stationary output correlation
/// `c·b_i·b_j / (1 − a_i·a_j)`, so each entry is scaled by the inverse of
/// that gain. A target the pair cannot reach is capped at 1, which gives the
/// largest correlation their time constants allow.
fn innovation_factor(
    sites: &[SiteDescriptor],
    rates: &[f64],
    spatial: &SpatialConfig,
) -> Result<CorrelationFactor, SynthError> {
    if rates.windows(2).all(|w| w[0] == w[1]) {
        return Ok(correlation_factor(sites, spatial)?);
    }

    spatial.validate()?;
    let target = CorrelationMatrix::from_sites(sites, spatial.model())?;
    let mut values = target.values().clone();
    let n = rates.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let gain = filter_gain(rates[i], rates[j]);
            let wanted = values[[i, j]] * gain;
            if wanted > 1.0 {
                warn!(
                    first = i,
                    second = j,
                    target = values[[i, j]],
                    reachable = 1.0 / gain,
                    "time constants cap the correlation between sites"
                );
            }
            let c = wanted.min(1.0);
            values[[i, j]] = c;
            values[[j, i]] = c;
        }
    }
    let matrix = CorrelationMatrix::from_array(values)?;
    Ok(factorize(&matrix, spatial)?)
}

/// `(1 − a_i·a_j) / (b_i·b_j)` for `a = e^{−r}`, `b = √(1 − e^{−2r})`.
/// Equals 1 for equal rates and grows as they diverge.
fn filter_gain(r_i: f64, r_j: f64) -> f64 {
    -(-(r_i + r_j)).exp_m1() / ((-2.0 * r_i).exp_m1() * (-2.0 * r_j).exp_m1()).sqrt()
}

fn check_domain(sites: &[SiteDescriptor], config: &SynthConfig) -> Result<(), SynthError> {
    let (f_min, f_max) = config.frequency_range();
    let (e_min, e_max) = config.elevation_range();
    for (i, site) in sites.iter().enumerate() {
        for (name, value, min, max) in [
            ("frequency_ghz", site.frequency_ghz(), f_min, f_max),
            ("elevation_deg", site.elevation_deg(), e_min, e_max),
        ] {
            if value < min || value > max {
                return Err(SynthError::OutOfDomain {
                    site: i,
                    name,
                    value,
                    min,
                    max,
                });
            }
        }
    }
    Ok(())
}

fn check_memory(n_sites: usize, n_samples: usize, limit: usize) -> Result<(), SynthError> {
    match n_sites.checked_mul(n_samples) {
        Some(total) if total <= limit => Ok(()),
        _ => Err(SynthError::MemoryCeiling {
            n_sites,
            n_samples,
            limit,
        }),
    }
}
