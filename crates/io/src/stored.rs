//! Attenuation series read back from disk.

use ndarray::{Array2, ArrayView1};

/// A `sites × samples` attenuation matrix loaded from a Parquet file.
///
/// Unlike [`tlaloc_synth::TimeSeries`], the site identifiers are those stored
/// in the file, which need not be contiguous.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSeries {
    site_ids: Vec<u32>,
    values: Array2<f64>,
    sampling_interval_s: f64,
}

impl StoredSeries {
    pub(crate) fn new(site_ids: Vec<u32>, values: Array2<f64>, sampling_interval_s: f64) -> Self {
        debug_assert_eq!(site_ids.len(), values.nrows());
        Self {
            site_ids,
            values,
            sampling_interval_s,
        }
    }

    /// Site identifiers, ascending.
    pub fn site_ids(&self) -> &[u32] {
        &self.site_ids
    }

    /// Full matrix, one row per entry of [`site_ids`](Self::site_ids).
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Trace of site `id`, or `None` if the file has no such site.
    pub fn trace(&self, id: u32) -> Option<ArrayView1<'_, f64>> {
        let row = self.site_ids.binary_search(&id).ok()?;
        Some(self.values.row(row))
    }

    /// `(site id, trace)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, ArrayView1<'_, f64>)> + '_ {
        self.site_ids.iter().copied().zip(self.values.outer_iter())
    }

    pub fn n_sites(&self) -> usize {
        self.site_ids.len()
    }

    pub fn n_samples(&self) -> usize {
        self.values.ncols()
    }

    /// Sampling interval, seconds. Zero when the file holds a single sample
    /// per site and the interval cannot be inferred.
    pub fn sampling_interval_s(&self) -> f64 {
        self.sampling_interval_s
    }
}
