//! # tlaloc-synth
//!
//! Correlated multi-site rain-attenuation time-series synthesis.
//!
//! Each site's attenuation is a memoryless transform of a unit-variance
//! Gaussian AR(1) process. The processes of different sites are driven by
//! innovations that are correlated according to their separation.
//!
//! ## Pipeline
//!
//! ```mermaid
//! graph LR
//!     A["SynthesisRequest"] --> B["MultiSiteSynthesis::new()"]
//!     P["ClimatologyProvider"] -->|"curve per site"| B
//!     B --> C["CorrelatedNoise (ε = L·z)"]
//!     C --> D["Ar1Filter per site (G)"]
//!     D --> E["LognormalMapper per site (A dB)"]
//!     E --> F["TimeSeries / BlockStream"]
//! ```
//!
//! ## Glossary
//!
//! | Symbol | Meaning |
//! |--------|---------|
//! | `Ts` | sampling interval, seconds |
//! | `β` | time constant of the attenuation dynamics, seconds |
//! | `a`, `b` | filter coefficients `exp(−Ts/β)` and `√(1 − a²)` |
//! | `G` | filtered standard-normal process |
//! | `g_th` | dry threshold `Q⁻¹(P_rain / 100)` |
//! | `μ`, `σ` | lognormal parameters of attenuation given rain |
//!
//! ## Quick start
//!
//! ```
//! use tlaloc_exceedance::LognormalClimatology;
//! use tlaloc_synth::{SynthConfig, SynthesisRequest, synthesize_blocks};
//!
//! let provider = LognormalClimatology::new(-0.5, 1.0, 5.0).unwrap();
//! let request = SynthesisRequest::from_arrays(
//!     &[50.66], &[4.62], &[39.4], &[35.0], &[45.0], 10_000, 1.0,
//! )
//! .unwrap()
//! .with_seed(1);
//! let mut n = 0;
//! for block in synthesize_blocks(&request, &provider, &SynthConfig::new(), 4096).unwrap() {
//!     n += block.unwrap().len();
//! }
//! assert_eq!(n, 10_000);
//! ```

mod config;
mod error;
mod filter;
mod mapper;
mod noise;
mod orchestrate;
mod request;
mod series;
mod site_synth;

pub use config::{DryTransition, InitialState, SynthConfig};
pub use error::{ErrorClass, SynthError};
pub use filter::Ar1Filter;
pub use mapper::LognormalMapper;
pub use noise::CorrelatedNoise;
pub use orchestrate::{
    BlockStream, MultiSiteSynthesis, rain_attenuation_synthesis, synthesize, synthesize_blocks,
};
pub use request::{SynthesisRequest, samples_for_duration};
pub use series::{TimeSeries, TimeSeriesBlock};
pub use site_synth::SiteSynthesizer;
