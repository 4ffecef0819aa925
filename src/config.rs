use std::path::PathBuf;

use serde::Deserialize;

/// Top-level Tlaloc configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TlalocConfig {
    /// Global RNG seed.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Run length and sampling.
    pub run: RunToml,

    /// Ground stations, in output order.
    pub sites: Vec<SiteToml>,

    /// Analytic lognormal statistics shared by every site. Mutually
    /// exclusive with per-site curves.
    #[serde(default)]
    pub climatology: Option<ClimatologyToml>,

    /// Synthesis settings.
    #[serde(default)]
    pub synthesis: SynthesisToml,

    /// Spatial correlation settings.
    #[serde(default)]
    pub spatial: SpatialToml,

    /// Output settings.
    #[serde(default)]
    pub output: OutputToml,
}

/// Exactly one of `n_samples` or `duration` should be set.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunToml {
    /// Sampling interval in seconds.
    #[serde(default = "default_sampling_interval")]
    pub sampling_interval: f64,
    pub n_samples: Option<usize>,
    /// Duration in seconds.
    pub duration: Option<f64>,
}

fn default_sampling_interval() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteToml {
    pub latitude: f64,
    pub longitude: f64,
    /// Carrier frequency, GHz.
    pub frequency: f64,
    /// Elevation angle, degrees.
    pub elevation: f64,
    /// Polarization tilt, degrees.
    #[serde(default)]
    pub tilt: f64,
    /// Exceedance probabilities (%), descending.
    #[serde(default)]
    pub probabilities: Option<Vec<f64>>,
    /// Attenuation (dB) at each probability.
    #[serde(default)]
    pub attenuations: Option<Vec<f64>>,
    #[serde(default)]
    pub rain_probability: Option<f64>,
    /// Site-specific time constant, seconds.
    #[serde(default)]
    pub time_constant: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClimatologyToml {
    pub mu: f64,
    pub sigma: f64,
    pub rain_probability: f64,
    #[serde(default)]
    pub time_constant: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SynthesisToml {
    #[serde(default = "default_time_constant")]
    pub time_constant: f64,
    #[serde(default = "default_initial_state")]
    pub initial_state: String,
    #[serde(default = "default_dry_transition")]
    pub dry_transition: String,
    #[serde(default)]
    pub warmup_samples: usize,
    #[serde(default = "default_frequency_range")]
    pub frequency_range: [f64; 2],
    #[serde(default = "default_elevation_range")]
    pub elevation_range: [f64; 2],
    #[serde(default = "default_max_in_memory_values")]
    pub max_in_memory_values: usize,
    #[serde(default)]
    pub require_seed: bool,
}

impl Default for SynthesisToml {
    fn default() -> Self {
        Self {
            time_constant: default_time_constant(),
            initial_state: default_initial_state(),
            dry_transition: default_dry_transition(),
            warmup_samples: 0,
            frequency_range: default_frequency_range(),
            elevation_range: default_elevation_range(),
            max_in_memory_values: default_max_in_memory_values(),
            require_seed: false,
        }
    }
}

fn default_time_constant() -> f64 {
    5000.0
}
fn default_initial_state() -> String {
    "stationary".to_string()
}
fn default_dry_transition() -> String {
    "step".to_string()
}
fn default_frequency_range() -> [f64; 2] {
    [1.0, 55.0]
}
fn default_elevation_range() -> [f64; 2] {
    [5.0, 90.0]
}
fn default_max_in_memory_values() -> usize {
    1 << 28
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpatialToml {
    #[serde(default = "default_short_weight")]
    pub short_weight: f64,
    #[serde(default = "default_short_scale_km")]
    pub short_scale_km: f64,
    #[serde(default = "default_long_weight")]
    pub long_weight: f64,
    #[serde(default = "default_long_scale_km")]
    pub long_scale_km: f64,
    #[serde(default = "default_regularization")]
    pub regularization: f64,
    #[serde(default = "default_psd_tolerance")]
    pub psd_tolerance: f64,
}

impl Default for SpatialToml {
    fn default() -> Self {
        Self {
            short_weight: default_short_weight(),
            short_scale_km: default_short_scale_km(),
            long_weight: default_long_weight(),
            long_scale_km: default_long_scale_km(),
            regularization: default_regularization(),
            psd_tolerance: default_psd_tolerance(),
        }
    }
}

fn default_short_weight() -> f64 {
    0.94
}
fn default_short_scale_km() -> f64 {
    30.0
}
fn default_long_weight() -> f64 {
    0.06
}
fn default_long_scale_km() -> f64 {
    500.0
}
fn default_regularization() -> f64 {
    1e-6
}
fn default_psd_tolerance() -> f64 {
    1e-12
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputToml {
    pub path: Option<PathBuf>,
    #[serde(default = "default_compression")]
    pub compression: String,
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,
    #[serde(default = "default_block_len")]
    pub block_len: usize,
    /// Per-site CCDF JSON written after the time series.
    #[serde(default)]
    pub ccdf: Option<PathBuf>,
    #[serde(default = "default_ccdf_bins")]
    pub ccdf_bins: usize,
}

impl Default for OutputToml {
    fn default() -> Self {
        Self {
            path: None,
            compression: default_compression(),
            row_group_size: default_row_group_size(),
            block_len: default_block_len(),
            ccdf: None,
            ccdf_bins: default_ccdf_bins(),
        }
    }
}

fn default_compression() -> String {
    "snappy".to_string()
}
fn default_row_group_size() -> usize {
    1_000_000
}
fn default_block_len() -> usize {
    65_536
}
fn default_ccdf_bins() -> usize {
    300
}
