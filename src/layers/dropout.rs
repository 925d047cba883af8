//! Inverted dropout for hidden activations
//!
//! During training each hidden unit is kept independently with probability
//! `keep_prob`; kept activations are divided by `keep_prob` so the expected
//! magnitude is unchanged. The sampled mask is stored and reapplied, bit for
//! bit, to the matching gradient in the backward pass.

use crate::error::{NetworkError, Result};
use ndarray::{Array2, Zip};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Probability of keeping a unit, guaranteed to lie in (0, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct KeepProb(f64);

impl KeepProb {
    /// Keep every unit; dropout becomes the identity.
    pub const ONE: KeepProb = KeepProb(1.0);

    /// Validates `keep_prob` against (0, 1].
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_regularized_networks::layers::KeepProb;
    ///
    /// assert!(KeepProb::new(0.86).is_ok());
    /// assert!(KeepProb::new(0.0).is_err());
    /// assert!(KeepProb::new(1.5).is_err());
    /// ```
    pub fn new(keep_prob: f64) -> Result<Self> {
        if keep_prob > 0.0 && keep_prob <= 1.0 {
            Ok(KeepProb(keep_prob))
        } else {
            Err(NetworkError::configuration(format!(
                "keep_prob must be in (0, 1], got {}",
                keep_prob
            )))
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// True when no unit can be dropped.
    pub fn is_one(self) -> bool {
        self.0 == 1.0
    }
}

impl TryFrom<f64> for KeepProb {
    type Error = NetworkError;

    fn try_from(value: f64) -> Result<Self> {
        KeepProb::new(value)
    }
}

impl From<KeepProb> for f64 {
    fn from(value: KeepProb) -> f64 {
        value.0
    }
}

/// Boolean keep-mask sampled for one hidden layer in one forward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DropoutMask {
    keep: Array2<bool>,
    keep_prob: KeepProb,
}

impl DropoutMask {
    /// Sample a mask of `shape` where each entry is kept when `u < keep_prob`
    /// for `u` drawn uniformly from [0, 1).
    pub fn sample<R: Rng + ?Sized>(
        shape: (usize, usize),
        keep_prob: KeepProb,
        rng: &mut R,
    ) -> Self {
        let p = keep_prob.get();
        let keep = Array2::from_shape_simple_fn(shape, || rng.gen::<f64>() < p);
        Self { keep, keep_prob }
    }

    /// Build a mask from explicit keep flags.
    pub fn from_keep(keep: Array2<bool>, keep_prob: KeepProb) -> Self {
        Self { keep, keep_prob }
    }

    /// Zero the dropped entries of `values` and divide the kept ones by
    /// `keep_prob`. Used for activations in the forward pass and for their
    /// gradients in the backward pass.
    pub fn apply(&self, values: &mut Array2<f64>) -> Result<()> {
        if values.dim() != self.keep.dim() {
            return Err(NetworkError::shape(
                "dropout mask",
                self.keep.dim(),
                values.dim(),
            ));
        }
        let p = self.keep_prob.get();
        Zip::from(values).and(&self.keep).for_each(|value, &keep| {
            *value = if keep { *value / p } else { 0.0 };
        });
        Ok(())
    }

    pub fn keep(&self) -> &Array2<bool> {
        &self.keep
    }

    pub fn keep_prob(&self) -> KeepProb {
        self.keep_prob
    }

    pub fn dim(&self) -> (usize, usize) {
        self.keep.dim()
    }

    /// Number of units kept by this mask.
    pub fn kept_count(&self) -> usize {
        self.keep.iter().filter(|&&keep| keep).count()
    }
}
