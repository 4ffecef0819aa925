//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result, bail};

use crate::config::*;

use tlaloc_exceedance::{
    ClimatologyProvider, ExceedanceCurve, LognormalClimatology, TabulatedClimatology,
};
use tlaloc_io::{Compression, WriterConfig};
use tlaloc_site::SiteDescriptor;
use tlaloc_spatial::{CorrelationModel, SpatialConfig};
use tlaloc_synth::{
    DryTransition, InitialState, SynthConfig, SynthesisRequest, samples_for_duration,
};

/// Parses a compression algorithm name string into the corresponding enum variant.
pub fn parse_compression(s: &str) -> Result<Compression> {
    match s.to_lowercase().as_str() {
        "none" => Ok(Compression::None),
        "snappy" => Ok(Compression::Snappy),
        "zstd" => Ok(Compression::Zstd),
        other => bail!("unknown compression: {other:?}"),
    }
}

/// Parses an initial filter state name.
pub fn parse_initial_state(s: &str) -> Result<InitialState> {
    match s.to_lowercase().as_str() {
        "stationary" => Ok(InitialState::Stationary),
        "zero" => Ok(InitialState::Zero),
        other => bail!("unknown initial state: {other:?}"),
    }
}

/// Parses a dry-to-wet transition name.
pub fn parse_dry_transition(s: &str) -> Result<DryTransition> {
    match s.to_lowercase().as_str() {
        "step" => Ok(DryTransition::Step),
        "offset" => Ok(DryTransition::Offset),
        other => bail!("unknown dry transition: {other:?}"),
    }
}

/// Builds a [`SpatialConfig`] from the TOML spatial configuration.
pub fn build_spatial_config(spatial: &SpatialToml) -> SpatialConfig {
    let model = CorrelationModel::new()
        .with_short_range(spatial.short_weight, spatial.short_scale_km)
        .with_long_range(spatial.long_weight, spatial.long_scale_km);
    SpatialConfig::new()
        .with_model(model)
        .with_regularization(spatial.regularization)
        .with_psd_tolerance(spatial.psd_tolerance)
}

/// Builds a [`SynthConfig`] from the synthesis, spatial and output sections.
pub fn build_synth_config(config: &TlalocConfig) -> Result<SynthConfig> {
    let synthesis = &config.synthesis;
    let [f_min, f_max] = synthesis.frequency_range;
    let [e_min, e_max] = synthesis.elevation_range;
    let cfg = SynthConfig::new()
        .with_time_constant(synthesis.time_constant)
        .with_initial_state(parse_initial_state(&synthesis.initial_state)?)
        .with_dry_transition(parse_dry_transition(&synthesis.dry_transition)?)
        .with_warmup_samples(synthesis.warmup_samples)
        .with_frequency_range(f_min, f_max)
        .with_elevation_range(e_min, e_max)
        .with_max_in_memory_values(synthesis.max_in_memory_values)
        .with_require_seed(synthesis.require_seed)
        .with_block_len(config.output.block_len)
        .with_spatial(build_spatial_config(&config.spatial));
    Ok(cfg)
}

/// Builds the [`SynthesisRequest`] for the configured sites and run length.
///
/// An explicit `seed` (from the command line) takes precedence over the
/// config file.
pub fn build_request(config: &TlalocConfig, seed: Option<u64>) -> Result<SynthesisRequest> {
    let run = &config.run;
    let n_samples = match (run.n_samples, run.duration) {
        (Some(n), None) => n,
        (None, Some(d)) => samples_for_duration(d, run.sampling_interval)?,
        (Some(_), Some(_)) => bail!("[run] must set exactly one of n_samples or duration, got both"),
        (None, None) => bail!("[run] must set exactly one of n_samples or duration, got neither"),
    };

    let sites = &config.sites;
    let latitude: Vec<f64> = sites.iter().map(|s| s.latitude).collect();
    let longitude: Vec<f64> = sites.iter().map(|s| s.longitude).collect();
    let frequency: Vec<f64> = sites.iter().map(|s| s.frequency).collect();
    let elevation: Vec<f64> = sites.iter().map(|s| s.elevation).collect();
    let tilt: Vec<f64> = sites.iter().map(|s| s.tilt).collect();
    let mut request = SynthesisRequest::from_arrays(
        &latitude,
        &longitude,
        &frequency,
        &elevation,
        &tilt,
        n_samples,
        run.sampling_interval,
    )?;
    if let Some(s) = seed.or(config.seed) {
        request = request.with_seed(s);
    }
    Ok(request)
}

/// Builds the climatology provider for the sites of `request`.
///
/// Either a `[climatology]` section applies one lognormal law to every site,
/// or every `[[sites]]` entry carries its own curve. Per-site curves are
/// keyed on the full site, so co-located links keep their own curve and
/// time constant.
pub fn build_provider(
    config: &TlalocConfig,
    request: &SynthesisRequest,
) -> Result<Box<dyn ClimatologyProvider>> {
    let has_curves = config
        .sites
        .iter()
        .any(|s| s.probabilities.is_some() || s.attenuations.is_some());

    if let Some(ref clim) = config.climatology {
        if has_curves {
            bail!("[climatology] cannot be combined with per-site curves");
        }
        let mut provider = LognormalClimatology::new(clim.mu, clim.sigma, clim.rain_probability)
            .context("invalid [climatology] parameters")?;
        if let Some(tc) = clim.time_constant {
            provider = provider.with_time_constant(tc);
        }
        return Ok(Box::new(provider));
    }

    let mut provider = TabulatedClimatology::new();
    let mut seen: Vec<(SiteDescriptor, ExceedanceCurve, Option<f64>)> = Vec::new();
    for (i, (entry, &site)) in config.sites.iter().zip(request.sites()).enumerate() {
        let curve = build_curve(entry).with_context(|| format!("site {i}: invalid curve"))?;
        if let Some(j) = seen.iter().position(|(s, _, _)| *s == site) {
            let (_, first, tc) = &seen[j];
            if *first != curve || *tc != entry.time_constant {
                bail!("sites {j} and {i} describe the same link with different statistics");
            }
            continue;
        }
        provider = provider.with_site_curve(site, curve.clone(), entry.time_constant);
        seen.push((site, curve, entry.time_constant));
    }
    Ok(Box::new(provider))
}

fn build_curve(site: &SiteToml) -> Result<ExceedanceCurve> {
    let (Some(probs), Some(atts)) = (&site.probabilities, &site.attenuations) else {
        bail!("probabilities and attenuations are required without [climatology]");
    };
    let curve = ExceedanceCurve::from_pairs(probs, atts)?;
    Ok(match site.rain_probability {
        Some(p) => curve.with_rain_probability(p)?,
        None => curve,
    })
}

/// Builds a [`WriterConfig`] from the TOML output configuration.
pub fn build_writer_config(output: &OutputToml) -> Result<WriterConfig> {
    let compression = parse_compression(&output.compression)?;
    Ok(WriterConfig::default()
        .with_compression(compression)
        .with_row_group_size(output.row_group_size))
}
