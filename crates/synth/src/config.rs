//! Configuration for time-series synthesis.

use tlaloc_spatial::SpatialConfig;

use crate::error::SynthError;

/// How the first filter output of a run is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitialState {
    /// The first output is the first correlated increment itself, i.e. a
    /// draw from the stationary distribution. No transient.
    #[default]
    Stationary,
    /// The filter starts at zero, so the first output is `b · ε[1]`. Pair
    /// with [`SynthConfig::with_warmup_samples`] to discard the transient.
    Zero,
}

/// How attenuation behaves just above the dry threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DryTransition {
    /// `A = exp(μ + σG)` above the threshold, `0` below: a step at the onset
    /// of rain that reproduces the curve exactly.
    #[default]
    Step,
    /// `A = exp(μ + σG) − exp(μ + σ g_th)`, continuous at the threshold.
    Offset,
}

/// Configuration for the synthesis engine.
///
/// Use the builder methods to customise parameters.
///
/// # Example
///
/// ```
/// use tlaloc_synth::{InitialState, SynthConfig};
///
/// let config = SynthConfig::new()
///     .with_time_constant(3600.0)
///     .with_initial_state(InitialState::Zero)
///     .with_warmup_samples(200_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SynthConfig {
    time_constant_s: f64,
    initial_state: InitialState,
    dry_transition: DryTransition,
    warmup_samples: usize,
    frequency_range_ghz: (f64, f64),
    elevation_range_deg: (f64, f64),
    spatial: SpatialConfig,
    block_len: usize,
    max_in_memory_values: usize,
    require_seed: bool,
}

impl SynthConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `time_constant = 5000 s` (rate `2e-4 s⁻¹`),
    /// `initial_state = Stationary`, `dry_transition = Step`,
    /// `warmup_samples = 0`, frequency range `[1, 55]` GHz, elevation range
    /// `[5, 90]` degrees, default [`SpatialConfig`], `block_len = 65_536`,
    /// `max_in_memory_values = 2^28`, `require_seed = false`.
    pub fn new() -> Self {
        Self {
            time_constant_s: 5000.0,
            initial_state: InitialState::Stationary,
            dry_transition: DryTransition::Step,
            warmup_samples: 0,
            frequency_range_ghz: (1.0, 55.0),
            elevation_range_deg: (5.0, 90.0),
            spatial: SpatialConfig::new(),
            block_len: 65_536,
            max_in_memory_values: 1 << 28,
            require_seed: false,
        }
    }

    /// Sets the default time constant `β` in seconds. A provider may
    /// override it per site.
    pub fn with_time_constant(mut self, seconds: f64) -> Self {
        self.time_constant_s = seconds;
        self
    }

    /// Sets the filter's initial state.
    pub fn with_initial_state(mut self, state: InitialState) -> Self {
        self.initial_state = state;
        self
    }

    /// Sets the behaviour at the dry threshold.
    pub fn with_dry_transition(mut self, transition: DryTransition) -> Self {
        self.dry_transition = transition;
        self
    }

    /// Sets the number of leading samples computed and discarded.
    pub fn with_warmup_samples(mut self, n: usize) -> Self {
        self.warmup_samples = n;
        self
    }

    /// Sets the validated carrier-frequency range in GHz.
    pub fn with_frequency_range(mut self, min_ghz: f64, max_ghz: f64) -> Self {
        self.frequency_range_ghz = (min_ghz, max_ghz);
        self
    }

    /// Sets the validated elevation-angle range in degrees.
    pub fn with_elevation_range(mut self, min_deg: f64, max_deg: f64) -> Self {
        self.elevation_range_deg = (min_deg, max_deg);
        self
    }

    /// Sets the spatial correlation configuration.
    pub fn with_spatial(mut self, spatial: SpatialConfig) -> Self {
        self.spatial = spatial;
        self
    }

    /// Sets the internal block length used by in-memory runs.
    pub fn with_block_len(mut self, len: usize) -> Self {
        self.block_len = len;
        self
    }

    /// Sets the largest `sites × samples` an in-memory run may allocate.
    pub fn with_max_in_memory_values(mut self, n: usize) -> Self {
        self.max_in_memory_values = n;
        self
    }

    /// Requires an explicit seed; runs without one fail with
    /// [`SynthError::MissingSeed`].
    pub fn with_require_seed(mut self, require: bool) -> Self {
        self.require_seed = require;
        self
    }

    // --- Accessors ---

    /// Returns the default time constant in seconds.
    pub fn time_constant(&self) -> f64 {
        self.time_constant_s
    }

    /// Returns the filter's initial state.
    pub fn initial_state(&self) -> InitialState {
        self.initial_state
    }

    /// Returns the behaviour at the dry threshold.
    pub fn dry_transition(&self) -> DryTransition {
        self.dry_transition
    }

    /// Returns the number of discarded leading samples.
    pub fn warmup_samples(&self) -> usize {
        self.warmup_samples
    }

    /// Returns the validated frequency range `(min, max)` in GHz.
    pub fn frequency_range(&self) -> (f64, f64) {
        self.frequency_range_ghz
    }

    /// Returns the validated elevation range `(min, max)` in degrees.
    pub fn elevation_range(&self) -> (f64, f64) {
        self.elevation_range_deg
    }

    /// Returns the spatial correlation configuration.
    pub fn spatial(&self) -> &SpatialConfig {
        &self.spatial
    }

    /// Returns the internal block length.
    pub fn block_len(&self) -> usize {
        self.block_len
    }

    /// Returns the in-memory value ceiling.
    pub fn max_in_memory_values(&self) -> usize {
        self.max_in_memory_values
    }

    /// Returns whether an explicit seed is required.
    pub fn require_seed(&self) -> bool {
        self.require_seed
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), SynthError> {
        if !self.time_constant_s.is_finite() || self.time_constant_s <= 0.0 {
            return Err(SynthError::InvalidConfig {
                reason: format!(
                    "time_constant must be finite and positive, got {}",
                    self.time_constant_s
                ),
            });
        }
        Self::validate_range("frequency_range", self.frequency_range_ghz)?;
        Self::validate_range("elevation_range", self.elevation_range_deg)?;
        if self.block_len == 0 {
            return Err(SynthError::InvalidConfig {
                reason: "block_len must be positive".to_string(),
            });
        }
        if self.max_in_memory_values == 0 {
            return Err(SynthError::InvalidConfig {
                reason: "max_in_memory_values must be positive".to_string(),
            });
        }
        self.spatial.validate()?;
        Ok(())
    }

    fn validate_range(name: &str, (min, max): (f64, f64)) -> Result<(), SynthError> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(SynthError::InvalidConfig {
                reason: format!("{name} must be finite with min <= max, got [{min}, {max}]"),
            });
        }
        Ok(())
    }
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self::new()
    }
}
