//! Symmetric unit-diagonal correlation matrices.

use ndarray::Array2;
use tlaloc_site::{SiteDescriptor, great_circle_km};
use tracing::debug;

use crate::error::SpatialError;
use crate::model::CorrelationModel;

const SYMMETRY_TOL: f64 = 1e-12;

/// Site-by-site correlation matrix of the underlying Gaussian processes.
///
/// Always square, symmetric, unit-diagonal, with finite entries in `[0, 1]`.
/// Positive semi-definiteness is checked by [`factorize`](crate::factorize).
#[derive(Clone, Debug, PartialEq)]
pub struct CorrelationMatrix {
    values: Array2<f64>,
}

impl CorrelationMatrix {
    /// Builds the matrix from pairwise great-circle distances between
    /// `sites`, mapped through `model`.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::EmptyMatrix`] if `sites` is empty.
    pub fn from_sites(
        sites: &[SiteDescriptor],
        model: &CorrelationModel,
    ) -> Result<Self, SpatialError> {
        let n = sites.len();
        if n == 0 {
            return Err(SpatialError::EmptyMatrix);
        }
        let mut values = Array2::<f64>::eye(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = great_circle_km(&sites[i], &sites[j]);
                let rho = model.correlation(d);
                values[[i, j]] = rho;
                values[[j, i]] = rho;
            }
        }
        debug!(n_sites = n, "built distance-derived correlation matrix");
        Ok(Self { values })
    }

    /// Wraps a caller-supplied matrix after validating it.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`SpatialError::EmptyMatrix`] | 0×0 input |
    /// | [`SpatialError::NotSquare`] | rows ≠ columns |
    /// | [`SpatialError::InvalidEntry`] | non-finite, outside `[0, 1]`, non-unit diagonal, or asymmetric entry |
    pub fn from_array(values: Array2<f64>) -> Result<Self, SpatialError> {
        let (rows, cols) = values.dim();
        if rows != cols {
            return Err(SpatialError::NotSquare { rows, cols });
        }
        if rows == 0 {
            return Err(SpatialError::EmptyMatrix);
        }
        for ((row, col), &v) in values.indexed_iter() {
            let invalid = |reason: String| SpatialError::InvalidEntry { row, col, reason };
            if !v.is_finite() {
                return Err(invalid(format!("entry {v} is not finite")));
            }
            if !(0.0..=1.0).contains(&v) {
                return Err(invalid(format!("entry {v} outside [0, 1]")));
            }
            if row == col && (v - 1.0).abs() > SYMMETRY_TOL {
                return Err(invalid(format!("diagonal entry {v} is not 1")));
            }
            if col > row && (v - values[[col, row]]).abs() > SYMMETRY_TOL {
                return Err(invalid(format!(
                    "entry {v} differs from its transpose {}",
                    values[[col, row]]
                )));
            }
        }
        Ok(Self { values })
    }

    /// Builds a matrix from row vectors.
    ///
    /// # Errors
    ///
    /// Same as [`from_array`](Self::from_array); ragged rows are reported as
    /// [`SpatialError::NotSquare`].
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, SpatialError> {
        let n = rows.len();
        if let Some(bad) = rows.iter().find(|r| r.len() != n) {
            return Err(SpatialError::NotSquare {
                rows: n,
                cols: bad.len(),
            });
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let values = Array2::from_shape_vec((n, n), flat).map_err(|_| SpatialError::NotSquare {
            rows: n,
            cols: n,
        })?;
        Self::from_array(values)
    }

    /// Number of sites (matrix order).
    pub fn n_sites(&self) -> usize {
        self.values.nrows()
    }

    /// Correlation between sites `i` and `j`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[[i, j]]
    }

    /// Returns the underlying matrix.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Returns `(C + δI) / (1 + δ)`, which keeps the unit diagonal.
    pub(crate) fn regularized(&self, delta: f64) -> Self {
        let n = self.n_sites();
        let values = (&self.values + &(Array2::<f64>::eye(n) * delta)) / (1.0 + delta);
        let mut out = Self { values };
        // Division can leave the diagonal a rounding error away from 1.
        for i in 0..n {
            out.values[[i, i]] = 1.0;
        }
        out
    }
}
