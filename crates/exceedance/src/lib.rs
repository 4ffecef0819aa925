//! # tlaloc-exceedance
//!
//! Long-term rain-attenuation statistics as consumed by the synthesis
//! engine.
//!
//! The climatological prediction itself is external: a
//! [`ClimatologyProvider`] hands back an [`ExceedanceCurve`] per site. This
//! crate validates such curves and fits the lognormal parameters the
//! synthesizer needs.
//!
//! ## Pipeline
//!
//! ```text
//!  ┌────────────────────┐     ┌──────────────────┐     ┌──────────────────┐
//!  │ ClimatologyProvider│────▶│ ExceedanceCurve  │────▶│  LognormalFit    │
//!  │ (per site)         │     │ (p % → A dB)     │     │  (μ, σ, P_rain)  │
//!  └────────────────────┘     └──────────────────┘     └──────────────────┘
//! ```
//!
//! ## Glossary
//!
//! | Symbol | Meaning |
//! |--------|---------|
//! | `p` | exceedance probability, % of time |
//! | `P_rain` | % of time with measurable rain on the path |
//! | `Q⁻¹` | inverse standard-normal survival function |
//! | `μ`, `σ` | location/scale of `ln A` given rain: `ln A(p) = μ + σ Q⁻¹(p/100)` |
//!
//! ## Quick start
//!
//! ```
//! use tlaloc_exceedance::{ExceedanceCurve, fit_lognormal};
//!
//! let curve = ExceedanceCurve::from_pairs(
//!     &[5.0, 1.0, 0.1, 0.01],
//!     &[0.4, 2.1, 9.5, 27.0],
//! )
//! .unwrap();
//! let fit = fit_lognormal(&curve).unwrap();
//! assert!(fit.sigma() > 0.0);
//! assert_eq!(fit.rain_probability(), 5.0);
//! ```

mod curve;
mod error;
mod fit;
mod normal;
mod provider;

pub use curve::ExceedanceCurve;
pub use error::ExceedanceError;
pub use fit::{LognormalFit, fit_lognormal};
pub use normal::{inverse_survival, survival};
pub use provider::{ClimatologyProvider, LognormalClimatology, TabulatedClimatology};
