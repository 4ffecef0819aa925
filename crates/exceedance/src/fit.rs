//! Lognormal fit of a rain-attenuation exceedance curve.
//!
//! Conditional on rain, attenuation is modelled as lognormal, so the curve
//! satisfies `ln A(p) = μ + σ · Q⁻¹(p / 100)` for `p ≤ P_rain`. The fit is an
//! ordinary least-squares line through the transformed points.

use tracing::debug;

use crate::curve::ExceedanceCurve;
use crate::error::ExceedanceError;
use crate::normal::{inverse_survival, survival};

/// Fitted lognormal parameters of one site's attenuation distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LognormalFit {
    mu: f64,
    sigma: f64,
    rain_probability: f64,
}

impl LognormalFit {
    /// Creates a fit from known parameters.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`ExceedanceError::InvalidParameter`] | `mu` non-finite or `sigma` not finite and > 0 |
    /// | [`ExceedanceError::InvalidRainProbability`] | `rain_probability` outside (0, 100] |
    pub fn new(mu: f64, sigma: f64, rain_probability: f64) -> Result<Self, ExceedanceError> {
        if !mu.is_finite() {
            return Err(ExceedanceError::InvalidParameter {
                name: "mu",
                value: mu,
            });
        }
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(ExceedanceError::InvalidParameter {
                name: "sigma",
                value: sigma,
            });
        }
        if !rain_probability.is_finite() || rain_probability <= 0.0 || rain_probability > 100.0 {
            return Err(ExceedanceError::InvalidRainProbability {
                value: rain_probability,
            });
        }
        Ok(Self {
            mu,
            sigma,
            rain_probability,
        })
    }

    /// Location `μ` of `ln A` given rain.
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Scale `σ` of `ln A` given rain.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Percentage of time with measurable rain.
    pub fn rain_probability(&self) -> f64 {
        self.rain_probability
    }

    /// Standard-normal level below which the path is dry:
    /// `Q⁻¹(P_rain / 100)`. `-∞` when it rains all the time.
    pub fn dry_threshold(&self) -> f64 {
        inverse_survival(self.rain_probability / 100.0)
    }

    /// Attenuation (dB) exceeded `p` % of the time under the fitted model.
    ///
    /// Zero for `p > P_rain`.
    pub fn attenuation_at(&self, p: f64) -> f64 {
        if p > self.rain_probability {
            return 0.0;
        }
        (self.mu + self.sigma * inverse_survival(p / 100.0)).exp()
    }

    /// Percentage of time attenuation `a` dB is exceeded under the fitted
    /// model. Capped at `P_rain`.
    pub fn exceedance_of(&self, a: f64) -> f64 {
        if a <= 0.0 {
            return self.rain_probability;
        }
        let p = 100.0 * survival((a.ln() - self.mu) / self.sigma);
        p.min(self.rain_probability)
    }
}

/// Fits lognormal parameters to an exceedance curve.
///
/// Uses the points with `p ≤ P_rain` and `A > 0`.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`ExceedanceError::TooFewPoints`] | fewer than two usable points (including an all-dry curve) |
/// | [`ExceedanceError::DegenerateFit`] | usable points share one probability, or the slope is not positive |
pub fn fit_lognormal(curve: &ExceedanceCurve) -> Result<LognormalFit, ExceedanceError> {
    let Some(rain_probability) = curve.rain_probability() else {
        return Err(ExceedanceError::TooFewPoints { n: 0, min: 2 });
    };

    let (xs, ys): (Vec<f64>, Vec<f64>) = curve
        .points()
        .filter(|&(p, a)| p <= rain_probability && a > 0.0)
        .map(|(p, a)| (inverse_survival(p / 100.0), a.ln()))
        .unzip();

    if xs.len() < 2 {
        return Err(ExceedanceError::TooFewPoints {
            n: xs.len(),
            min: 2,
        });
    }

    let n = xs.len() as f64;
    let mx = xs.iter().sum::<f64>() / n;
    let my = ys.iter().sum::<f64>() / n;
    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (x, y) in xs.iter().zip(&ys) {
        sxy += (x - mx) * (y - my);
        sxx += (x - mx) * (x - mx);
    }
    if sxx <= 0.0 {
        return Err(ExceedanceError::DegenerateFit {
            reason: "all usable points share the same probability".to_string(),
        });
    }

    let sigma = sxy / sxx;
    let mu = my - sigma * mx;
    if !sigma.is_finite() || sigma <= 0.0 || !mu.is_finite() {
        return Err(ExceedanceError::DegenerateFit {
            reason: format!("sigma = {sigma}, mu = {mu}"),
        });
    }

    debug!(mu, sigma, rain_probability, n_points = xs.len(), "fitted lognormal");
    LognormalFit::new(mu, sigma, rain_probability)
}
