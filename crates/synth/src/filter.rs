//! First-order recursive filter imposing the attenuation time constant.

use crate::config::InitialState;
use crate::error::SynthError;

/// AR(1) low-pass filter `G[n] = a·G[n−1] + b·ε[n]`.
///
/// With `a = exp(−Ts/β)` and `b = √(1 − a²)` a unit-variance input yields a
/// unit-variance output whose autocorrelation at lag `k` is `a^k`.
#[derive(Debug, Clone)]
pub struct Ar1Filter {
    a: f64,
    b: f64,
    state: f64,
    fresh: bool,
    initial: InitialState,
}

impl Ar1Filter {
    /// Creates a filter for sampling interval `sampling_interval_s` and time
    /// constant `time_constant_s`, both in seconds.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`SynthError::InvalidSamplingInterval`] | `sampling_interval_s` not finite and > 0 |
    /// | [`SynthError::InvalidConfig`] | `time_constant_s` not finite and > 0 |
    pub fn new(
        sampling_interval_s: f64,
        time_constant_s: f64,
        initial: InitialState,
    ) -> Result<Self, SynthError> {
        if !sampling_interval_s.is_finite() || sampling_interval_s <= 0.0 {
            return Err(SynthError::InvalidSamplingInterval {
                value: sampling_interval_s,
            });
        }
        if !time_constant_s.is_finite() || time_constant_s <= 0.0 {
            return Err(SynthError::InvalidConfig {
                reason: format!("time_constant must be finite and positive, got {time_constant_s}"),
            });
        }
        let ratio = sampling_interval_s / time_constant_s;
        let a = (-ratio).exp();
        // 1 − exp(−2r) without cancellation for small r.
        let b = (-(-2.0 * ratio).exp_m1()).sqrt();
        Ok(Self {
            a,
            b,
            state: 0.0,
            fresh: true,
            initial,
        })
    }

    /// Lag-one autocorrelation `a`.
    pub fn coefficient(&self) -> f64 {
        self.a
    }

    /// Innovation scale `b`.
    pub fn innovation_scale(&self) -> f64 {
        self.b
    }

    /// Last output `G[n−1]` (zero before the first step).
    pub fn state(&self) -> f64 {
        self.state
    }

    /// Advances one step with innovation `eps` and returns the new output.
    pub fn step(&mut self, eps: f64) -> f64 {
        if self.fresh {
            self.fresh = false;
            if self.initial == InitialState::Stationary {
                self.state = eps;
                return self.state;
            }
        }
        self.state = self.a * self.state + self.b * eps;
        self.state
    }
}
