//! Configuration structures for training
//!
//! This module provides the hyperparameters of a training run, how they are
//! read from JSON files, and how they resolve into a [`TrainingMode`].

use crate::error::{NetworkError, Result};
use crate::layers::KeepProb;
use crate::training::{MaskSampling, DROPOUT_MASK_SEED};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Hyperparameters of one training run.
///
/// Missing fields take the values of [`TrainingConfig::default`]. At most one
/// regularizer may be active: `lambd != 0` together with `keep_prob < 1` is
/// rejected.
///
/// # Example
///
/// ```json
/// {
///   "learning_rate": 0.3,
///   "num_iterations": 30000,
///   "keep_prob": 0.86,
///   "seed": 3
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainingConfig {
    /// Gradient-descent step size
    pub learning_rate: f64,

    /// Number of parameter updates; there is no early stopping
    pub num_iterations: usize,

    /// Log the cost at every recorded iteration
    pub print_cost: bool,

    /// L2 coefficient; 0 disables the penalty
    pub lambd: f64,

    /// Dropout keep probability in (0, 1]; 1 disables dropout
    pub keep_prob: f64,

    /// Record the cost every this many iterations, starting at 0
    pub cost_interval: usize,

    /// Seed for parameter initialization
    pub seed: u64,

    /// Seed the dropout masks are redrawn from on every forward pass
    pub mask_seed: u64,

    /// Draw new dropout masks every iteration from the run's generator
    /// instead of reseeding with `mask_seed`
    pub fresh_masks: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.3,
            num_iterations: 30_000,
            print_cost: true,
            lambd: 0.0,
            keep_prob: 1.0,
            cost_interval: 10_000,
            seed: 3,
            mask_seed: DROPOUT_MASK_SEED,
            fresh_masks: false,
        }
    }
}

impl TrainingConfig {
    /// Check every field and resolve the regularization mode.
    pub fn validate(&self) -> Result<TrainingMode> {
        crate::optimizers::gradient_descent::validate_learning_rate(self.learning_rate)?;
        if self.cost_interval == 0 {
            return Err(NetworkError::configuration("cost_interval must be positive"));
        }
        TrainingMode::from_hyperparameters(self.lambd, self.keep_prob)
    }

    /// How dropout masks are sampled across iterations.
    pub fn mask_sampling(&self) -> MaskSampling {
        if self.fresh_masks {
            MaskSampling::Fresh
        } else {
            MaskSampling::Reseeded(self.mask_seed)
        }
    }

    /// The regularization mode selected by `lambd` and `keep_prob`.
    pub fn mode(&self) -> Result<TrainingMode> {
        TrainingMode::from_hyperparameters(self.lambd, self.keep_prob)
    }
}

/// Which forward/cost/backward variant a run uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrainingMode {
    /// Plain cross-entropy, no regularization.
    Plain,
    /// Cross-entropy plus an L2 penalty on the weights.
    L2 { lambd: f64 },
    /// Inverted dropout on both hidden layers.
    Dropout { keep_prob: KeepProb },
}

impl TrainingMode {
    /// Resolve the mode from raw hyperparameters.
    ///
    /// # Errors
    ///
    /// - `keep_prob` outside (0, 1]
    /// - `lambd` not finite
    /// - `lambd != 0` and `keep_prob < 1` at the same time
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_regularized_networks::config::TrainingMode;
    ///
    /// assert_eq!(TrainingMode::from_hyperparameters(0.0, 1.0).unwrap(), TrainingMode::Plain);
    /// assert_eq!(
    ///     TrainingMode::from_hyperparameters(0.7, 1.0).unwrap(),
    ///     TrainingMode::L2 { lambd: 0.7 }
    /// );
    /// assert!(TrainingMode::from_hyperparameters(0.7, 0.8).is_err());
    /// ```
    pub fn from_hyperparameters(lambd: f64, keep_prob: f64) -> Result<Self> {
        let keep_prob = KeepProb::new(keep_prob)?;
        if !lambd.is_finite() {
            return Err(NetworkError::configuration(format!(
                "lambd must be finite, got {}",
                lambd
            )));
        }

        match (lambd == 0.0, keep_prob.is_one()) {
            (true, true) => Ok(TrainingMode::Plain),
            (false, true) => {
                if lambd < 0.0 {
                    warn!(lambd, "negative lambd rewards large weights");
                }
                Ok(TrainingMode::L2 { lambd })
            }
            (true, false) => Ok(TrainingMode::Dropout { keep_prob }),
            (false, false) => Err(NetworkError::configuration(format!(
                "L2 regularization (lambd = {}) and dropout (keep_prob = {}) cannot be combined",
                lambd,
                keep_prob.get()
            ))),
        }
    }

    /// L2 coefficient in effect (0 outside `L2`).
    pub fn lambd(&self) -> f64 {
        match self {
            TrainingMode::L2 { lambd } => *lambd,
            _ => 0.0,
        }
    }

    /// Keep probability in effect (1 outside `Dropout`).
    pub fn keep_prob(&self) -> KeepProb {
        match self {
            TrainingMode::Dropout { keep_prob } => *keep_prob,
            _ => KeepProb::ONE,
        }
    }
}

/// Loads a training configuration from a JSON file.
///
/// Reads the file at `path`, deserializes it into a `TrainingConfig` and
/// validates it.
///
/// # Examples
///
/// ```no_run
/// use rust_regularized_networks::config::load_config;
///
/// let cfg = load_config("config/dropout.json").unwrap();
/// assert_eq!(cfg.keep_prob, 0.86);
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<TrainingConfig> {
    let contents = fs::read_to_string(path)?;
    let config: TrainingConfig = serde_json::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}
