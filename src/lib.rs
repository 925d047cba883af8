//! Regularized Neural Networks Library
//!
//! A three-layer binary classifier (`[n_x, 20, 3, 1]`, ReLU/ReLU/sigmoid)
//! trained by full-batch gradient descent in one of three modes: plain,
//! L2-regularized or inverted dropout. Also provides the forward pass of a
//! 2D convolution.
//!
//! # Modules
//!
//! - `layers`: Dense layer, dropout masks, convolution forward pass
//! - `training`: Parameters, forward/backward passes, cost, trainer, gradient check
//! - `optimizers`: Optimizer trait and gradient descent
//! - `utils`: Activation functions and seedable random sources
//! - `config`: Training configuration and mode selection
//! - `data`: Dataset loading and synthetic 2D data
//! - `error`: Error types

pub mod config;
pub mod data;
pub mod error;
pub mod layers;
pub mod optimizers;
pub mod training;
pub mod utils;

pub use error::{NetworkError, Result};
