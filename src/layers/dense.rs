//! Dense (fully connected) layer implementation
//!
//! This module provides a DenseLayer that performs the transformation
//! `Z = W · A_prev + b` on column-major sample matrices (features × samples).

use crate::error::{NetworkError, Result};
use crate::utils::standard_normal;
use ndarray::{Array2, ArrayView2};
use rand::Rng;

/// Dense (fully connected) layer with weights and biases.
///
/// Performs the linear transformation: Z = W·A + b
/// where A is the input (input_size × m),
/// W is the weight matrix (output_size × input_size),
/// and b is the bias column (output_size × 1), broadcast over samples.
///
/// # Example
///
/// ```
/// use rust_regularized_networks::layers::DenseLayer;
/// use rust_regularized_networks::utils::seeded;
///
/// let layer = DenseLayer::new(2, 20, &mut seeded(3));
/// assert_eq!(layer.input_size(), 2);
/// assert_eq!(layer.output_size(), 20);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DenseLayer {
    weights: Array2<f64>,
    biases: Array2<f64>,
}

impl DenseLayer {
    /// Create a new DenseLayer with scaled normal initialization.
    ///
    /// Weights are sampled from N(0, 1) and divided by sqrt(input_size).
    /// Biases are initialized to zero.
    pub fn new<R: Rng + ?Sized>(input_size: usize, output_size: usize, rng: &mut R) -> Self {
        let scale = (input_size as f64).sqrt();
        let weights = standard_normal(output_size, input_size, rng) / scale;

        Self {
            weights,
            biases: Array2::zeros((output_size, 1)),
        }
    }

    /// Build a layer from explicit weights `(n_out, n_in)` and biases `(n_out, 1)`.
    pub fn from_parts(weights: Array2<f64>, biases: Array2<f64>) -> Result<Self> {
        if biases.dim() != (weights.nrows(), 1) {
            return Err(NetworkError::shape(
                "dense layer biases",
                (weights.nrows(), 1),
                biases.dim(),
            ));
        }
        Ok(Self { weights, biases })
    }

    /// Linear forward step `W · input + b`.
    pub fn linear_forward(&self, input: ArrayView2<f64>) -> Result<Array2<f64>> {
        if input.nrows() != self.input_size() {
            return Err(NetworkError::shape(
                "dense layer input rows",
                self.input_size(),
                input.nrows(),
            ));
        }
        Ok(self.weights.dot(&input) + &self.biases)
    }

    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    pub fn biases(&self) -> &Array2<f64> {
        &self.biases
    }

    pub fn weights_mut(&mut self) -> &mut Array2<f64> {
        &mut self.weights
    }

    pub fn biases_mut(&mut self) -> &mut Array2<f64> {
        &mut self.biases
    }

    /// Get the input size of the layer.
    pub fn input_size(&self) -> usize {
        self.weights.ncols()
    }

    /// Get the output size of the layer.
    pub fn output_size(&self) -> usize {
        self.weights.nrows()
    }

    /// Get the number of trainable parameters.
    ///
    /// Returns output_size × input_size (weights) + output_size (biases).
    pub fn parameter_count(&self) -> usize {
        self.weights.len() + self.biases.len()
    }

    /// Squared Frobenius norm of the weights (biases excluded).
    pub fn weights_squared_norm(&self) -> f64 {
        self.weights.iter().map(|w| w * w).sum()
    }
}
