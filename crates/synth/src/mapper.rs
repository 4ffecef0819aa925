//! Standard-normal to attenuation mapping.

use tlaloc_exceedance::{ExceedanceCurve, ExceedanceError, LognormalFit, fit_lognormal};

use crate::config::DryTransition;

/// Largest exponent passed to `exp`, keeping the output finite.
const MAX_EXPONENT: f64 = 700.0;

/// Maps a standard-normal process value `G` to attenuation in dB.
///
/// `G` below the dry threshold `g_th = Q⁻¹(P_rain / 100)` gives 0 dB;
/// above it the marginal is lognormal with parameters `μ`, `σ`. The map is
/// monotone non-decreasing and always returns a finite value `≥ 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LognormalMapper {
    mu: f64,
    sigma: f64,
    dry_threshold: f64,
    transition: DryTransition,
    offset: f64,
}

impl LognormalMapper {
    /// Creates a mapper from fitted parameters.
    pub fn new(fit: &LognormalFit, transition: DryTransition) -> Self {
        let mu = fit.mu();
        let sigma = fit.sigma();
        let dry_threshold = fit.dry_threshold();
        let offset = match transition {
            DryTransition::Offset if dry_threshold.is_finite() => {
                (mu + sigma * dry_threshold).min(MAX_EXPONENT).exp()
            }
            _ => 0.0,
        };
        Self {
            mu,
            sigma,
            dry_threshold,
            transition,
            offset,
        }
    }

    /// Fits `curve` and creates a mapper from the result.
    ///
    /// # Errors
    ///
    /// Propagates [`fit_lognormal`] errors.
    pub fn from_curve(
        curve: &ExceedanceCurve,
        transition: DryTransition,
    ) -> Result<Self, ExceedanceError> {
        Ok(Self::new(&fit_lognormal(curve)?, transition))
    }

    /// Location `μ` of `ln A`.
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Scale `σ` of `ln A`.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Dry threshold `g_th` (`-∞` when it always rains).
    pub fn dry_threshold(&self) -> f64 {
        self.dry_threshold
    }

    /// Behaviour at the threshold.
    pub fn transition(&self) -> DryTransition {
        self.transition
    }

    /// Attenuation (dB) for process value `g`.
    pub fn map(&self, g: f64) -> f64 {
        if g.is_nan() || g < self.dry_threshold {
            return 0.0;
        }
        let a = (self.mu + self.sigma * g).min(MAX_EXPONENT).exp();
        (a - self.offset).max(0.0)
    }
}
