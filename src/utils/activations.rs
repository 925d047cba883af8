//! Activation functions for the three-layer network
//!
//! Hidden layers use ReLU, the output layer uses sigmoid. All functions work
//! on column-major sample matrices (units × samples) of `f64`.

use crate::error::{NetworkError, Result};
use ndarray::{Array2, ArrayView2, Zip};

/// Sigmoid activation function.
///
/// Returns the sigmoid of the input: 1 / (1 + exp(-x))
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Element-wise sigmoid of a matrix.
pub fn sigmoid_matrix(z: ArrayView2<f64>) -> Array2<f64> {
    z.mapv(sigmoid)
}

/// Element-wise ReLU of a matrix.
///
/// Sets all negative values to 0.0, keeps positive values unchanged.
pub fn relu(z: ArrayView2<f64>) -> Array2<f64> {
    z.mapv(|value| value.max(0.0))
}

/// Backpropagate through ReLU: `dA ⊙ 1[Z > 0]`.
///
/// # Arguments
///
/// * `d_activation` - Gradient of the cost with respect to the ReLU output
/// * `pre_activation` - The `Z` that was fed into the ReLU, same shape
///
/// # Returns
///
/// `dZ`, or a shape error when the two matrices differ in shape.
pub fn relu_backward(d_activation: ArrayView2<f64>, pre_activation: ArrayView2<f64>) -> Result<Array2<f64>> {
    if d_activation.dim() != pre_activation.dim() {
        return Err(NetworkError::shape(
            "ReLU pre-activation",
            d_activation.dim(),
            pre_activation.dim(),
        ));
    }
    let mut dz = d_activation.to_owned();
    Zip::from(&mut dz)
        .and(&pre_activation)
        .for_each(|grad, &z| {
            if z <= 0.0 {
                *grad = 0.0;
            }
        });
    Ok(dz)
}
