//! Error types for the tlaloc-site crate.

/// Error type for site construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SiteError {
    /// Returned when a site parameter is NaN or infinite.
    #[error("{name} must be finite, got {value}")]
    NonFinite {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },

    /// Returned when a coordinate is outside its geographic range.
    #[error("{name} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
        /// Lower bound (inclusive).
        min: f64,
        /// Upper bound (inclusive).
        max: f64,
    },

    /// Returned when per-site parallel arrays differ in length.
    #[error("length mismatch: {field} has {got} entries, latitude has {expected}")]
    LengthMismatch {
        /// Name of the mismatched field.
        field: &'static str,
        /// Expected length (number of latitudes).
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Returned when no sites are supplied.
    #[error("at least one site is required")]
    NoSites,

    /// Wraps a construction failure with the index of the offending site.
    #[error("site {index}: {source}")]
    AtSite {
        /// Zero-based site index.
        index: usize,
        /// Underlying error.
        #[source]
        source: Box<SiteError>,
    },
}
