//! Batch gradient descent
//!
//! Performs the update `θ = θ − α · dθ` for every weight matrix and bias
//! vector of the network.

use crate::error::{NetworkError, Result};
use crate::optimizers::Optimizer;
use crate::training::{Gradients, Parameters};

/// Vanilla gradient descent with a fixed learning rate.
///
/// # Example
///
/// ```
/// use rust_regularized_networks::optimizers::{GradientDescent, Optimizer};
///
/// let optimizer = GradientDescent::new(0.3).unwrap();
/// assert_eq!(optimizer.learning_rate(), 0.3);
/// assert!(GradientDescent::new(-1.0).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct GradientDescent {
    learning_rate: f64,
}

impl GradientDescent {
    /// Creates a new optimizer; the learning rate must be positive and finite.
    pub fn new(learning_rate: f64) -> Result<Self> {
        validate_learning_rate(learning_rate)?;
        Ok(Self { learning_rate })
    }
}

pub(crate) fn validate_learning_rate(learning_rate: f64) -> Result<()> {
    if learning_rate.is_finite() && learning_rate > 0.0 {
        Ok(())
    } else {
        Err(NetworkError::configuration(format!(
            "learning_rate must be positive and finite, got {}",
            learning_rate
        )))
    }
}

impl Optimizer for GradientDescent {
    fn update(&mut self, parameters: &mut Parameters, gradients: &Gradients) -> Result<()> {
        for (layer, grads) in parameters.layers().into_iter().zip(gradients.layers()) {
            if grads.dw.dim() != layer.weights().dim() {
                return Err(NetworkError::shape(
                    "weight gradient",
                    layer.weights().dim(),
                    grads.dw.dim(),
                ));
            }
            if grads.db.dim() != layer.biases().dim() {
                return Err(NetworkError::shape(
                    "bias gradient",
                    layer.biases().dim(),
                    grads.db.dim(),
                ));
            }
        }

        for (layer, grads) in parameters.layers_mut().into_iter().zip(gradients.layers()) {
            layer.weights_mut().scaled_add(-self.learning_rate, &grads.dw);
            layer.biases_mut().scaled_add(-self.learning_rate, &grads.db);
        }
        Ok(())
    }

    fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    fn set_learning_rate(&mut self, lr: f64) {
        self.learning_rate = lr;
    }
}
