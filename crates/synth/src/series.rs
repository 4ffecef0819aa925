//! Output containers.

use ndarray::{Array2, ArrayView1};

/// Complete `sites × samples` attenuation matrix (dB).
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    values: Array2<f64>,
    sampling_interval_s: f64,
}

impl TimeSeries {
    pub(crate) fn new(values: Array2<f64>, sampling_interval_s: f64) -> Self {
        Self {
            values,
            sampling_interval_s,
        }
    }

    /// Returns the matrix, one row per site.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Consumes the series and returns the matrix.
    pub fn into_values(self) -> Array2<f64> {
        self.values
    }

    /// Returns the trace of site `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= n_sites()`.
    pub fn site(&self, index: usize) -> ArrayView1<'_, f64> {
        self.values.row(index)
    }

    /// Number of sites.
    pub fn n_sites(&self) -> usize {
        self.values.nrows()
    }

    /// Number of samples per site.
    pub fn n_samples(&self) -> usize {
        self.values.ncols()
    }

    /// Sampling interval in seconds.
    pub fn sampling_interval_s(&self) -> f64 {
        self.sampling_interval_s
    }

    /// Covered duration `n_samples × Ts` in seconds.
    pub fn duration_s(&self) -> f64 {
        self.n_samples() as f64 * self.sampling_interval_s
    }
}

/// A contiguous slice of a streamed run: `sites × len` values starting at
/// sample `start`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesBlock {
    start: usize,
    values: Array2<f64>,
    sampling_interval_s: f64,
}

impl TimeSeriesBlock {
    pub(crate) fn new(start: usize, values: Array2<f64>, sampling_interval_s: f64) -> Self {
        Self {
            start,
            values,
            sampling_interval_s,
        }
    }

    /// Index of the first sample in this block.
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the index of the last sample in this block.
    pub fn end(&self) -> usize {
        self.start + self.len()
    }

    /// Number of samples per site in this block.
    pub fn len(&self) -> usize {
        self.values.ncols()
    }

    /// Returns `true` if the block holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of sites.
    pub fn n_sites(&self) -> usize {
        self.values.nrows()
    }

    /// Returns the block matrix, one row per site.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Returns the block slice of site `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= n_sites()`.
    pub fn site(&self, index: usize) -> ArrayView1<'_, f64> {
        self.values.row(index)
    }

    /// Time in seconds of the block's `offset`-th sample, counted from the
    /// start of the run.
    pub fn time_s(&self, offset: usize) -> f64 {
        (self.start + offset) as f64 * self.sampling_interval_s
    }

    /// Sampling interval in seconds.
    pub fn sampling_interval_s(&self) -> f64 {
        self.sampling_interval_s
    }
}
