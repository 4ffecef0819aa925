//! # tlaloc-spatial
//!
//! Spatial correlation between rain-attenuation processes at separated
//! ground stations.
//!
//! ## Pipeline
//!
//! ```mermaid
//! graph LR
//!     A["&[SiteDescriptor]"] -->|"great-circle distances"| B["CorrelationMatrix"]
//!     B -->|"factorize(&matrix, &config)?"| C["CorrelationFactor (L)"]
//!     C --> D[".project(&z, &mut eps)"]
//! ```
//!
//! The decay law maps distance `d` (km) to a correlation coefficient of the
//! underlying Gaussian processes:
//!
//! ```text
//! ρ(d) = w_s · exp(−d / d_s) + w_l · exp(−(d / d_l)²)
//! ```
//!
//! The factor `L` is lower-triangular with `L·Lᵗ = C`, so projecting a
//! vector of independent standard-normal draws through `L` yields draws with
//! correlation `C`.
//!
//! ## Quick start
//!
//! ```
//! use tlaloc_site::SiteDescriptor;
//! use tlaloc_spatial::{SpatialConfig, correlation_factor};
//!
//! let sites = [
//!     SiteDescriptor::new(50.66, 4.62, 39.4, 35.0, 45.0).unwrap(),
//!     SiteDescriptor::new(46.20, 6.15, 39.4, 35.0, 45.0).unwrap(),
//! ];
//! let factor = correlation_factor(&sites, &SpatialConfig::new()).unwrap();
//! assert_eq!(factor.n_sites(), 2);
//! assert!(!factor.regularized());
//! ```

mod config;
mod error;
mod factor;
mod matrix;
mod model;

pub use config::SpatialConfig;
pub use error::SpatialError;
pub use factor::{CorrelationFactor, factorize};
pub use matrix::CorrelationMatrix;
pub use model::CorrelationModel;

use tlaloc_site::SiteDescriptor;

/// Builds the distance-derived correlation matrix for `sites` and factorizes
/// it.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`SpatialError::InvalidConfig`] | `config` fails validation |
/// | [`SpatialError::EmptyMatrix`] | `sites` is empty |
/// | [`SpatialError::NotPositiveSemiDefinite`] | factorization fails after one regularization retry |
pub fn correlation_factor(
    sites: &[SiteDescriptor],
    config: &SpatialConfig,
) -> Result<CorrelationFactor, SpatialError> {
    config.validate()?;
    let matrix = CorrelationMatrix::from_sites(sites, config.model())?;
    factorize(&matrix, config)
}
