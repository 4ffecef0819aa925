//! # tlaloc-io
//!
//! Write synthesized attenuation series to Parquet, read them back, and
//! store CCDF results as JSON.
//!
//! ## Parquet layout
//!
//! One row per site per sample, site-major within each written block:
//!
//! | Column | Type | Meaning |
//! |--------|------|---------|
//! | `site` | `UInt32` | site index in request order |
//! | `sample` | `UInt64` | sample index from the start of the run |
//! | `time_s` | `Float64` | `sample × Ts`, seconds |
//! | `attenuation_db` | `Float64` | attenuation, dB |
//!
//! Long runs are written block by block through [`TimeSeriesWriter`], so the
//! full matrix never has to be held in memory.

mod error;
mod json;
mod parquet_read;
mod parquet_write;
mod stored;
mod writer;

pub use error::IoError;
pub use json::{SiteCcdf, read_ccdf_json, write_ccdf_json};
pub use parquet_read::{read_parquet, scan_parquet};
pub use stored::StoredSeries;
pub use writer::{Compression, TimeSeriesWriter, WriterConfig, write_parquet};
