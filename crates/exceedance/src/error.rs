//! Error types for the tlaloc-exceedance crate.

/// Error type for all fallible operations in the tlaloc-exceedance crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExceedanceError {
    /// Returned when the probability and attenuation slices differ in length.
    #[error("length mismatch: {probabilities} probabilities, {attenuations} attenuations")]
    LengthMismatch {
        /// Number of probabilities.
        probabilities: usize,
        /// Number of attenuations.
        attenuations: usize,
    },

    /// Returned when a curve has fewer points than required.
    #[error("too few points: got {n}, need at least {min}")]
    TooFewPoints {
        /// Number of usable points.
        n: usize,
        /// Minimum required.
        min: usize,
    },

    /// Returned when a probability is outside (0, 100] or non-finite.
    #[error("probability at index {index} is {value} (must be in (0, 100])")]
    InvalidProbability {
        /// Zero-based point index.
        index: usize,
        /// Offending value.
        value: f64,
    },

    /// Returned when probabilities are not strictly descending.
    #[error("probabilities must be strictly descending (index {index})")]
    NotDescending {
        /// Index of the first point that breaks the ordering.
        index: usize,
    },

    /// Returned when an attenuation is negative or non-finite.
    #[error("attenuation at index {index} is {value} dB (must be finite and >= 0)")]
    InvalidAttenuation {
        /// Zero-based point index.
        index: usize,
        /// Offending value.
        value: f64,
    },

    /// Returned when attenuation decreases while probability decreases.
    #[error("attenuation must not decrease as probability decreases (index {index})")]
    NotMonotone {
        /// Index of the first point that breaks monotonicity.
        index: usize,
    },

    /// Returned when the rain probability is outside (0, 100].
    #[error("rain probability {value} % is outside (0, 100]")]
    InvalidRainProbability {
        /// Offending value.
        value: f64,
    },

    /// Returned when the least-squares fit yields a non-positive or
    /// non-finite scale.
    #[error("degenerate lognormal fit: {reason}")]
    DegenerateFit {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a provider has no curve for the requested site.
    #[error("no exceedance curve for site at ({latitude}, {longitude})")]
    NoCurveForSite {
        /// Site latitude in degrees.
        latitude: f64,
        /// Site longitude in degrees.
        longitude: f64,
    },

    /// Returned when a provider parameter is invalid.
    #[error("invalid parameter {name} = {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
}
