//! Error types for the tlaloc-ccdf crate.

/// Error type for all fallible operations in the tlaloc-ccdf crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CcdfError {
    /// Returned when the sample slice is empty.
    #[error("input data is empty")]
    EmptyData,

    /// Returned when zero bins are requested.
    #[error("number of bins must be positive")]
    ZeroBins,

    /// Returned when a sample is NaN or infinite.
    #[error("sample {index} is not finite: {value}")]
    NonFiniteSample {
        /// Position of the offending sample.
        index: usize,
        /// Offending value.
        value: f64,
    },

    /// Returned when explicit bin edges are unusable.
    #[error("invalid bin edges: {reason}")]
    InvalidEdges {
        /// Description of the problem.
        reason: String,
    },
}
