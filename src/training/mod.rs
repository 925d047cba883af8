//! Training of the `[n_x, 20, 3, 1]` binary classifier
//!
//! - `parameters`: per-layer weights and biases, initialization
//! - `propagation`: plain and dropout forward passes with their caches
//! - `cost`: cross-entropy with optional L2 penalty
//! - `backward`: plain, L2 and dropout gradients
//! - `trainer`: the fixed-iteration gradient-descent loop
//! - `predict`: labels and accuracy
//! - `gradient_check`: finite-difference verification of the gradients

pub mod backward;
pub mod cost;
pub mod gradient_check;
pub mod parameters;
pub mod predict;
pub mod propagation;
pub mod trainer;

pub use backward::{backward, backward_with_dropout, backward_with_regularization, Gradients, LayerGradients};
pub use cost::{compute_cost, compute_cost_with_regularization};
pub use gradient_check::gradient_check;
pub use parameters::{layer_dims, Parameters, HIDDEN_UNITS};
pub use predict::{accuracy, predict};
pub use propagation::{forward, forward_with_dropout, Cache, DropoutCache, DropoutMasks};
pub use trainer::{CostRecord, MaskSampling, TrainedModel, Trainer, DROPOUT_MASK_SEED};
