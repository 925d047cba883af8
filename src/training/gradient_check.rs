//! Numerical gradient checking.

use crate::error::Result;
use crate::training::backward::backward_with_regularization;
use crate::training::cost::compute_cost_with_regularization;
use crate::training::propagation::forward;
use crate::training::Parameters;
use ndarray::{Array1, ArrayView2};
use tracing::debug;

/// Compare the analytical gradient with two-sided finite differences.
///
/// Every parameter entry θ_i is perturbed by ±`epsilon` and the cost (L2
/// regularized when `lambd != 0`) is re-evaluated. Returns
/// `‖g − g̃‖ / (‖g‖ + ‖g̃‖)`, where `g` is the analytical gradient and `g̃`
/// the numerical one; a correct backward pass gives values around 1e-8 or
/// below.
pub fn gradient_check(
    x: ArrayView2<f64>,
    y: ArrayView2<f64>,
    parameters: &Parameters,
    lambd: f64,
    epsilon: f64,
) -> Result<f64> {
    let (_, cache) = forward(x, parameters)?;
    let analytical = backward_with_regularization(x, y, &cache, lambd)?.to_vector();

    let cost_at = |theta: &Array1<f64>| -> Result<f64> {
        let perturbed = parameters.with_vector(theta)?;
        let (a3, _) = forward(x, &perturbed)?;
        compute_cost_with_regularization(a3.view(), y, &perturbed, lambd)
    };

    let theta = parameters.to_vector();
    let mut numerical = Array1::zeros(theta.len());
    let mut shifted = theta.clone();
    for i in 0..theta.len() {
        shifted[i] = theta[i] + epsilon;
        let cost_plus = cost_at(&shifted)?;
        shifted[i] = theta[i] - epsilon;
        let cost_minus = cost_at(&shifted)?;
        shifted[i] = theta[i];

        numerical[i] = (cost_plus - cost_minus) / (2.0 * epsilon);
    }

    let norm = |v: &Array1<f64>| v.dot(v).sqrt();
    let numerator = norm(&(&analytical - &numerical));
    let denominator = norm(&analytical) + norm(&numerical);
    let difference = if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    };

    debug!(difference, parameters = theta.len(), "gradient check");
    Ok(difference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::layer_dims;
    use crate::utils::{seeded, standard_normal};
    use ndarray::array;

    #[test]
    fn test_gradient_check_plain() {
        let mut rng = seeded(1);
        let params = Parameters::initialize(&layer_dims(4), &mut rng).unwrap();
        let x = standard_normal(4, 3, &mut rng);
        let y = array![[1.0, 1.0, 0.0]];

        let difference = gradient_check(x.view(), y.view(), &params, 0.0, 1e-5).unwrap();
        assert!(difference < 1e-7, "difference {}", difference);
    }

    #[test]
    fn test_gradient_check_regularized() {
        let mut rng = seeded(2);
        let params = Parameters::initialize(&layer_dims(3), &mut rng).unwrap();
        let x = standard_normal(3, 4, &mut rng);
        let y = array![[0.0, 1.0, 1.0, 0.0]];

        let difference = gradient_check(x.view(), y.view(), &params, 0.7, 1e-5).unwrap();
        assert!(difference < 1e-7, "difference {}", difference);
    }
}
