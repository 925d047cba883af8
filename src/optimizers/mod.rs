//! Parameter update rules
//!
//! An optimizer consumes the gradients of one iteration and updates the
//! network parameters in place. The trainer only depends on the
//! [`Optimizer`] trait, so other rules can be plugged in.
//!
//! # Example
//!
//! ```ignore
//! use rust_regularized_networks::optimizers::{GradientDescent, Optimizer};
//!
//! let mut optimizer = GradientDescent::new(0.3)?;
//! optimizer.update(&mut parameters, &gradients)?;
//! ```

pub mod gradient_descent;

pub use gradient_descent::GradientDescent;

use crate::error::Result;
use crate::training::{Gradients, Parameters};

/// Core trait for parameter update rules.
pub trait Optimizer {
    /// Update every weight and bias in place from `gradients`.
    ///
    /// # Errors
    ///
    /// Returns a shape error if any gradient does not match its parameter;
    /// in that case no parameter is modified.
    fn update(&mut self, parameters: &mut Parameters, gradients: &Gradients) -> Result<()>;

    /// Get the learning rate for this optimizer.
    fn learning_rate(&self) -> f64;

    /// Set the learning rate for this optimizer.
    fn set_learning_rate(&mut self, lr: f64);
}
