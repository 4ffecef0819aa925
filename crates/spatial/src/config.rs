//! Configuration for correlation-matrix construction and factorization.

use crate::error::SpatialError;
use crate::model::CorrelationModel;

/// Configuration for the spatial correlation engine.
///
/// # Example
///
/// ```
/// use tlaloc_spatial::{CorrelationModel, SpatialConfig};
///
/// let config = SpatialConfig::new()
///     .with_model(CorrelationModel::new().with_short_range(0.9, 25.0).with_long_range(0.1, 400.0))
///     .with_regularization(1e-5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SpatialConfig {
    model: CorrelationModel,
    regularization: f64,
    psd_tolerance: f64,
}

impl SpatialConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: default [`CorrelationModel`], `regularization = 1e-6`,
    /// `psd_tolerance = 1e-12`.
    pub fn new() -> Self {
        Self {
            model: CorrelationModel::new(),
            regularization: 1e-6,
            psd_tolerance: 1e-12,
        }
    }

    /// Sets the distance decay law.
    pub fn with_model(mut self, model: CorrelationModel) -> Self {
        self.model = model;
        self
    }

    /// Sets the diagonal loading `δ` used by the single regularization retry.
    pub fn with_regularization(mut self, delta: f64) -> Self {
        self.regularization = delta;
        self
    }

    /// Sets the tolerance below which a pivot is treated as zero.
    pub fn with_psd_tolerance(mut self, tol: f64) -> Self {
        self.psd_tolerance = tol;
        self
    }

    // --- Accessors ---

    /// Returns the distance decay law.
    pub fn model(&self) -> &CorrelationModel {
        &self.model
    }

    /// Returns the diagonal loading `δ`.
    pub fn regularization(&self) -> f64 {
        self.regularization
    }

    /// Returns the semidefinite pivot tolerance.
    pub fn psd_tolerance(&self) -> f64 {
        self.psd_tolerance
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), SpatialError> {
        self.model.validate()?;
        if !self.regularization.is_finite() || self.regularization <= 0.0 {
            return Err(SpatialError::InvalidConfig {
                reason: format!(
                    "regularization must be finite and positive, got {}",
                    self.regularization
                ),
            });
        }
        if !self.psd_tolerance.is_finite() || self.psd_tolerance < 0.0 {
            return Err(SpatialError::InvalidConfig {
                reason: format!(
                    "psd_tolerance must be finite and non-negative, got {}",
                    self.psd_tolerance
                ),
            });
        }
        Ok(())
    }
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self::new()
    }
}
