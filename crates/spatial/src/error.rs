//! Error types for the tlaloc-spatial crate.

/// Error type for all fallible operations in the tlaloc-spatial crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpatialError {
    /// Returned when no sites (or a 0×0 matrix) are supplied.
    #[error("correlation matrix is empty")]
    EmptyMatrix,

    /// Returned when a supplied matrix is not square.
    #[error("correlation matrix is not square: {rows}x{cols}")]
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// Returned when a supplied matrix violates a correlation-matrix
    /// invariant (symmetry, unit diagonal, entries in [0, 1]).
    #[error("invalid correlation matrix at ({row}, {col}): {reason}")]
    InvalidEntry {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
        /// Description of the violated invariant.
        reason: String,
    },

    /// Returned when the matrix is not positive semi-definite, even after
    /// the diagonal regularization retry.
    #[error(
        "correlation matrix is not positive semi-definite: pivot {pivot:e} at index {index} after regularization"
    )]
    NotPositiveSemiDefinite {
        /// Column at which the factorization broke down.
        index: usize,
        /// Offending pivot value.
        pivot: f64,
    },

    /// Returned when a configuration value is invalid.
    #[error("invalid spatial configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a projection buffer has the wrong length.
    #[error("buffer length mismatch: expected {expected}, got {got}")]
    BufferLengthMismatch {
        /// Expected buffer length.
        expected: usize,
        /// Actual buffer length.
        got: usize,
    },
}
