//! Semidefinite Cholesky factorization with a single regularization retry.

use ndarray::Array2;
use tracing::{debug, warn};

use crate::config::SpatialConfig;
use crate::error::SpatialError;
use crate::matrix::CorrelationMatrix;

/// Lower-triangular factor `L` with `L·Lᵗ = C`.
///
/// Produced by [`factorize`]. If the original matrix had to be regularized,
/// `L·Lᵗ` reproduces `(C + δI) / (1 + δ)` instead and
/// [`regularized`](Self::regularized) returns `true`.
#[derive(Clone, Debug)]
pub struct CorrelationFactor {
    lower: Array2<f64>,
    regularized: bool,
}

impl CorrelationFactor {
    /// Identity factor for `n_sites` mutually uncorrelated sites.
    pub fn identity(n_sites: usize) -> Self {
        Self {
            lower: Array2::eye(n_sites),
            regularized: false,
        }
    }

    /// Number of sites.
    pub fn n_sites(&self) -> usize {
        self.lower.nrows()
    }

    /// Whether the diagonal regularization retry was needed.
    pub fn regularized(&self) -> bool {
        self.regularized
    }

    /// Returns the lower-triangular factor.
    pub fn lower(&self) -> &Array2<f64> {
        &self.lower
    }

    /// Reconstructs `L·Lᵗ`.
    pub fn reconstruct(&self) -> Array2<f64> {
        self.lower.dot(&self.lower.t())
    }

    /// Computes `out = L · z`.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::BufferLengthMismatch`] if `z` or `out` does
    /// not have one entry per site.
    pub fn project(&self, z: &[f64], out: &mut [f64]) -> Result<(), SpatialError> {
        let n = self.n_sites();
        for len in [z.len(), out.len()] {
            if len != n {
                return Err(SpatialError::BufferLengthMismatch {
                    expected: n,
                    got: len,
                });
            }
        }
        for (i, (o, row)) in out.iter_mut().zip(self.lower.rows()).enumerate() {
            *o = row
                .iter()
                .zip(z)
                .take(i + 1)
                .fold(0.0, |acc, (l, zk)| acc + l * zk);
        }
        Ok(())
    }
}

/// Factorizes `matrix`, retrying once with diagonal loading if it is not
/// positive semi-definite.
///
/// Pivots in `[-tol, 0]` are treated as exact zeros and the column below
/// them is zeroed, so perfectly correlated sites (identical coordinates)
/// factor cleanly.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`SpatialError::InvalidConfig`] | `config` fails validation |
/// | [`SpatialError::NotPositiveSemiDefinite`] | the regularized matrix still has a negative pivot |
///
/// # Example
///
/// ```
/// use tlaloc_spatial::{CorrelationMatrix, SpatialConfig, factorize};
///
/// let c = CorrelationMatrix::from_rows(&[vec![1.0, 0.6], vec![0.6, 1.0]]).unwrap();
/// let f = factorize(&c, &SpatialConfig::new()).unwrap();
/// assert!((f.lower()[[1, 1]] - 0.8).abs() < 1e-12);
/// ```
pub fn factorize(
    matrix: &CorrelationMatrix,
    config: &SpatialConfig,
) -> Result<CorrelationFactor, SpatialError> {
    config.validate()?;
    let tol = config.psd_tolerance();
    match cholesky_semidefinite(matrix.values(), tol) {
        Ok(lower) => {
            debug!(n_sites = matrix.n_sites(), "factorized correlation matrix");
            Ok(CorrelationFactor {
                lower,
                regularized: false,
            })
        }
        Err((index, pivot)) => {
            let delta = config.regularization();
            warn!(
                index,
                pivot, delta, "correlation matrix not positive semi-definite, regularizing"
            );
            let loaded = matrix.regularized(delta);
            cholesky_semidefinite(loaded.values(), tol)
                .map(|lower| CorrelationFactor {
                    lower,
                    regularized: true,
                })
                .map_err(|(index, pivot)| SpatialError::NotPositiveSemiDefinite { index, pivot })
        }
    }
}

/// Column-wise Cholesky–Banachiewicz with a zero-pivot allowance.
///
/// Returns the failing `(index, pivot)` on breakdown.
fn cholesky_semidefinite(c: &Array2<f64>, tol: f64) -> Result<Array2<f64>, (usize, f64)> {
    let n = c.nrows();
    let residual_tol = tol.sqrt().max(f64::EPSILON);
    let mut l = Array2::<f64>::zeros((n, n));

    for j in 0..n {
        let mut d = c[[j, j]];
        for k in 0..j {
            d -= l[[j, k]] * l[[j, k]];
        }

        if d < -tol {
            return Err((j, d));
        }

        if d <= tol {
            // Zero pivot: the rest of the column must vanish too.
            for i in (j + 1)..n {
                let mut s = c[[i, j]];
                for k in 0..j {
                    s -= l[[i, k]] * l[[j, k]];
                }
                if s.abs() > residual_tol {
                    return Err((j, d));
                }
            }
            continue;
        }

        let pivot = d.sqrt();
        l[[j, j]] = pivot;
        for i in (j + 1)..n {
            let mut s = c[[i, j]];
            for k in 0..j {
                s -= l[[i, k]] * l[[j, k]];
            }
            l[[i, j]] = s / pivot;
        }
    }

    Ok(l)
}
