//! Cross-entropy cost, optionally with an L2 weight penalty.

use crate::error::{NetworkError, Result};
use crate::training::Parameters;
use ndarray::{ArrayView2, Zip};

fn check_prediction_shape(a3: ArrayView2<f64>, y: ArrayView2<f64>) -> Result<()> {
    if a3.dim() != y.dim() || a3.nrows() != 1 {
        return Err(NetworkError::shape("A3 against Y", (1, y.ncols()), a3.dim()));
    }
    if y.ncols() == 0 {
        return Err(NetworkError::shape("Y columns", "at least 1", 0));
    }
    Ok(())
}

/// Binary cross-entropy `(1/m) · Σ −y·ln(a) − (1−y)·ln(1−a)`.
///
/// Terms that evaluate to NaN (such as `0 · ln 0` for a saturated, correct
/// prediction) are skipped rather than poisoning the sum.
///
/// # Examples
///
/// ```
/// use ndarray::array;
/// use rust_regularized_networks::training::compute_cost;
///
/// let a3 = array![[0.5, 0.5]];
/// let y = array![[1.0, 0.0]];
/// let cost = compute_cost(a3.view(), y.view()).unwrap();
/// assert!((cost - std::f64::consts::LN_2).abs() < 1e-12);
/// ```
pub fn compute_cost(a3: ArrayView2<f64>, y: ArrayView2<f64>) -> Result<f64> {
    check_prediction_shape(a3, y)?;
    let m = y.ncols() as f64;

    let mut total = 0.0;
    Zip::from(&a3).and(&y).for_each(|&a, &label| {
        let term = -label * a.ln() - (1.0 - label) * (1.0 - a).ln();
        if !term.is_nan() {
            total += term;
        }
    });
    Ok(total / m)
}

/// Cross-entropy plus `(lambd / 2m) · (‖W1‖² + ‖W2‖² + ‖W3‖²)`.
///
/// Biases are not penalized. With `lambd == 0` the result equals
/// [`compute_cost`].
pub fn compute_cost_with_regularization(
    a3: ArrayView2<f64>,
    y: ArrayView2<f64>,
    parameters: &Parameters,
    lambd: f64,
) -> Result<f64> {
    let cross_entropy_cost = compute_cost(a3, y)?;
    if lambd == 0.0 {
        return Ok(cross_entropy_cost);
    }
    let m = y.ncols() as f64;
    let l2_regularization_cost = lambd / (2.0 * m) * parameters.weights_squared_norm();
    Ok(cross_entropy_cost + l2_regularization_cost)
}
