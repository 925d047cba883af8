//! Shared utilities for the network implementation
//!
//! This module provides the activation functions and the seedable random
//! sources used by the layers, the initializer and the dataset generator.

pub mod activations;
pub mod rng;

pub use activations::{relu, relu_backward, sigmoid, sigmoid_matrix};
pub use rng::{seeded, standard_normal};
