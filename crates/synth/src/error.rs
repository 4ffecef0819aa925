//! Error types for the tlaloc-synth crate.

use tlaloc_exceedance::ExceedanceError;
use tlaloc_site::SiteError;
use tlaloc_spatial::SpatialError;

/// Broad class of a [`SynthError`], for callers that only need to decide
/// whether to fix their inputs, their model, or their resource budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Invalid request, site, curve or configuration value.
    Configuration,
    /// Numerical breakdown (correlation matrix not positive semi-definite).
    Numerical,
    /// The requested output does not fit the memory budget.
    Resource,
    /// The random source could not be initialized as configured.
    Initialization,
}

/// Error type for all fallible operations in the tlaloc-synth crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SynthError {
    /// Site construction error (array lengths, coordinates).
    #[error(transparent)]
    Site(#[from] SiteError),

    /// Correlation matrix or factorization error.
    #[error(transparent)]
    Spatial(#[from] SpatialError),

    /// The climatology provider or lognormal fit failed for a site.
    #[error("site {site}: {source}")]
    Exceedance {
        /// Index of the offending site.
        site: usize,
        /// Underlying error.
        source: ExceedanceError,
    },

    /// A site parameter lies outside the model's validated range.
    #[error("site {site}: {name} = {value} outside validated range [{min}, {max}]")]
    OutOfDomain {
        /// Index of the offending site.
        site: usize,
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
        /// Lower bound of the range.
        min: f64,
        /// Upper bound of the range.
        max: f64,
    },

    /// A provider-supplied time constant is not finite and positive.
    #[error("site {site}: time constant must be finite and positive, got {value} s")]
    InvalidTimeConstant {
        /// Index of the offending site.
        site: usize,
        /// Offending value in seconds.
        value: f64,
    },

    /// Returned when zero samples are requested.
    #[error("sample count must be positive")]
    ZeroSamples,

    /// Returned when the sampling interval is not finite and positive.
    #[error("sampling interval must be finite and positive, got {value} s")]
    InvalidSamplingInterval {
        /// Offending value in seconds.
        value: f64,
    },

    /// Returned when a duration is negative or not finite.
    #[error("duration must be finite and non-negative, got {value} s")]
    InvalidDuration {
        /// Offending value in seconds.
        value: f64,
    },

    /// Returned when a configuration value is invalid.
    #[error("invalid synthesis configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when no seed is given but the configuration requires one.
    #[error("no seed supplied and the configuration requires one")]
    MissingSeed,

    /// Returned when an in-memory run would exceed the value budget.
    #[error(
        "{n_sites} sites x {n_samples} samples exceeds the in-memory limit of {limit} values; use block streaming instead"
    )]
    MemoryCeiling {
        /// Number of sites requested.
        n_sites: usize,
        /// Number of samples per site requested.
        n_samples: usize,
        /// Configured ceiling.
        limit: usize,
    },

    /// Returned when a caller-supplied buffer has the wrong length.
    #[error("buffer length mismatch: expected {expected}, got {got}")]
    BufferLengthMismatch {
        /// Expected buffer length.
        expected: usize,
        /// Actual buffer length.
        got: usize,
    },
}

impl SynthError {
    /// Returns the broad class of this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Spatial(SpatialError::NotPositiveSemiDefinite { .. }) => ErrorClass::Numerical,
            Self::MemoryCeiling { .. } => ErrorClass::Resource,
            Self::MissingSeed => ErrorClass::Initialization,
            _ => ErrorClass::Configuration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_site_transparent() {
        let err = SynthError::from(SiteError::NoSites);
        assert_eq!(err.to_string(), SiteError::NoSites.to_string());
        assert_eq!(err.class(), ErrorClass::Configuration);
    }

    #[test]
    fn error_spatial_not_psd_is_numerical() {
        let err = SynthError::from(SpatialError::NotPositiveSemiDefinite {
            index: 1,
            pivot: -0.5,
        });
        assert_eq!(err.class(), ErrorClass::Numerical);
        let err = SynthError::from(SpatialError::EmptyMatrix);
        assert_eq!(err.class(), ErrorClass::Configuration);
    }

    #[test]
    fn error_exceedance_carries_site() {
        let err = SynthError::Exceedance {
            site: 3,
            source: ExceedanceError::NoCurveForSite {
                latitude: 1.0,
                longitude: 2.0,
            },
        };
        assert!(err.to_string().starts_with("site 3: "));
    }

    #[test]
    fn error_out_of_domain() {
        let err = SynthError::OutOfDomain {
            site: 1,
            name: "frequency_ghz",
            value: 80.0,
            min: 1.0,
            max: 55.0,
        };
        assert_eq!(
            err.to_string(),
            "site 1: frequency_ghz = 80 outside validated range [1, 55]"
        );
    }

    #[test]
    fn error_zero_samples() {
        assert_eq!(
            SynthError::ZeroSamples.to_string(),
            "sample count must be positive"
        );
    }

    #[test]
    fn error_sampling_interval() {
        let err = SynthError::InvalidSamplingInterval { value: 0.0 };
        assert_eq!(
            err.to_string(),
            "sampling interval must be finite and positive, got 0 s"
        );
    }

    #[test]
    fn error_memory_ceiling() {
        let err = SynthError::MemoryCeiling {
            n_sites: 4,
            n_samples: 1000,
            limit: 100,
        };
        assert_eq!(
            err.to_string(),
            "4 sites x 1000 samples exceeds the in-memory limit of 100 values; use block streaming instead"
        );
        assert_eq!(err.class(), ErrorClass::Resource);
    }

    #[test]
    fn error_missing_seed() {
        assert_eq!(SynthError::MissingSeed.class(), ErrorClass::Initialization);
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<SynthError>();
    }
}
