//! Standard-normal tail functions via `statrs`.

use std::f64::consts::SQRT_2;

use statrs::function::erf::{erfc, erfc_inv};

/// Standard-normal survival function `Q(x) = P(Z > x)`.
pub fn survival(x: f64) -> f64 {
    0.5 * erfc(x / SQRT_2)
}

/// Inverse standard-normal survival function `Q⁻¹(q)`.
///
/// `q` is a probability fraction (not a percentage). Returns `+∞` for
/// `q <= 0`, `-∞` for `q >= 1`, and NaN for NaN input.
pub fn inverse_survival(q: f64) -> f64 {
    if q.is_nan() {
        return f64::NAN;
    }
    if q <= 0.0 {
        return f64::INFINITY;
    }
    if q >= 1.0 {
        return f64::NEG_INFINITY;
    }
    SQRT_2 * erfc_inv(2.0 * q)
}
