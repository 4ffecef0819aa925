//! Distance decay law for the correlation of the underlying Gaussian
//! processes.

use crate::error::SpatialError;

/// Two-term distance decay law.
///
/// ```text
/// ρ(d) = short_weight · exp(−d / short_scale) + long_weight · exp(−(d / long_scale)²)
/// ```
///
/// The short-range exponential term captures convective cells, the
/// long-range Gaussian term the stratiform/synoptic component.
///
/// # Example
///
/// ```
/// use tlaloc_spatial::CorrelationModel;
///
/// let model = CorrelationModel::new();
/// assert_eq!(model.correlation(0.0), 1.0);
/// assert!(model.correlation(100.0) < model.correlation(10.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CorrelationModel {
    short_weight: f64,
    short_scale_km: f64,
    long_weight: f64,
    long_scale_km: f64,
}

impl CorrelationModel {
    /// Creates the default model.
    ///
    /// Defaults: `short_weight = 0.94`, `short_scale_km = 30`,
    /// `long_weight = 0.06`, `long_scale_km = 500`.
    pub fn new() -> Self {
        Self {
            short_weight: 0.94,
            short_scale_km: 30.0,
            long_weight: 0.06,
            long_scale_km: 500.0,
        }
    }

    /// Sets the weight and scale (km) of the exponential term.
    pub fn with_short_range(mut self, weight: f64, scale_km: f64) -> Self {
        self.short_weight = weight;
        self.short_scale_km = scale_km;
        self
    }

    /// Sets the weight and scale (km) of the Gaussian term.
    pub fn with_long_range(mut self, weight: f64, scale_km: f64) -> Self {
        self.long_weight = weight;
        self.long_scale_km = scale_km;
        self
    }

    // --- Accessors ---

    /// Returns the weight of the exponential term.
    pub fn short_weight(&self) -> f64 {
        self.short_weight
    }

    /// Returns the scale (km) of the exponential term.
    pub fn short_scale_km(&self) -> f64 {
        self.short_scale_km
    }

    /// Returns the weight of the Gaussian term.
    pub fn long_weight(&self) -> f64 {
        self.long_weight
    }

    /// Returns the scale (km) of the Gaussian term.
    pub fn long_scale_km(&self) -> f64 {
        self.long_scale_km
    }

    /// Correlation coefficient at separation `distance_km`.
    ///
    /// Exactly 1 at zero distance and never above 1.
    pub fn correlation(&self, distance_km: f64) -> f64 {
        if distance_km <= 0.0 {
            return 1.0;
        }
        let short = self.short_weight * (-distance_km / self.short_scale_km).exp();
        let long = self.long_weight * (-(distance_km / self.long_scale_km).powi(2)).exp();
        (short + long).clamp(0.0, 1.0)
    }

    /// Validates this model.
    ///
    /// Weights must be finite, non-negative and sum to 1; scales must be
    /// finite and positive.
    pub fn validate(&self) -> Result<(), SpatialError> {
        for (name, w) in [
            ("short_weight", self.short_weight),
            ("long_weight", self.long_weight),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(SpatialError::InvalidConfig {
                    reason: format!("{name} must be finite and non-negative, got {w}"),
                });
            }
        }
        let sum = self.short_weight + self.long_weight;
        if (sum - 1.0).abs() > 1e-9 {
            return Err(SpatialError::InvalidConfig {
                reason: format!("correlation weights must sum to 1, got {sum}"),
            });
        }
        for (name, s) in [
            ("short_scale_km", self.short_scale_km),
            ("long_scale_km", self.long_scale_km),
        ] {
            if !s.is_finite() || s <= 0.0 {
                return Err(SpatialError::InvalidConfig {
                    reason: format!("{name} must be finite and positive, got {s}"),
                });
            }
        }
        Ok(())
    }
}

impl Default for CorrelationModel {
    fn default() -> Self {
        Self::new()
    }
}
