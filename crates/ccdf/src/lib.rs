//! # tlaloc-ccdf
//!
//! Histogram-based empirical complementary cumulative distribution
//! function, used to check a synthesized trace against its target
//! exceedance curve.
//!
//! Entry `i` of the result is the percentage of samples greater than or
//! equal to `bin_edges[i]`.
//!
//! ## Quick start
//!
//! ```
//! use tlaloc_ccdf::ccdf;
//!
//! let samples = [0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
//! let result = ccdf(&samples, 5).unwrap();
//! assert_eq!(result.bin_edges().len(), 6);
//! assert_eq!(result.exceedance()[0], 100.0);
//! assert_eq!(result.exceedance()[4], 25.0);
//! ```

mod accumulator;
mod error;
mod estimator;
mod result;

pub use accumulator::CcdfAccumulator;
pub use error::CcdfError;
pub use estimator::{ccdf, ccdf_with_edges};
pub use result::CcdfResult;
