//! Layer building blocks
//!
//! Dense layers and inverted dropout make up the three-layer classifier;
//! the convolution forward pass is a standalone primitive.

pub mod conv2d;
pub mod dense;
pub mod dropout;

pub use conv2d::{conv_forward, conv_single_step, zero_pad, ConvCache, ConvHyperparameters};
pub use dense::DenseLayer;
pub use dropout::{DropoutMask, KeepProb};
