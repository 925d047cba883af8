//! Full-batch training loop.

use crate::config::{TrainingConfig, TrainingMode};
use crate::error::{NetworkError, Result};
use crate::optimizers::{GradientDescent, Optimizer};
use crate::training::backward::{backward, backward_with_dropout, backward_with_regularization};
use crate::training::cost::{compute_cost, compute_cost_with_regularization};
use crate::layers::KeepProb;
use crate::training::propagation::{forward, forward_with_dropout, DropoutCache};
use crate::training::{layer_dims, Parameters};
use crate::utils::seeded;
use ndarray::{Array2, ArrayView2};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

/// Cost observed at one iteration, before that iteration's update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostRecord {
    pub iteration: usize,
    pub cost: f64,
}

/// Seed the dropout mask generator is reset to before every forward pass.
pub const DROPOUT_MASK_SEED: u64 = 1;

/// Where the dropout masks of each iteration come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskSampling {
    /// A generator rebuilt from this seed on every forward pass, so every
    /// iteration drops the same units.
    Reseeded(u64),
    /// New masks every iteration, drawn from the run's random source.
    Fresh,
}

impl Default for MaskSampling {
    fn default() -> Self {
        MaskSampling::Reseeded(DROPOUT_MASK_SEED)
    }
}

/// Result of a training run.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub parameters: Parameters,
    /// Costs at iterations 0, interval, 2·interval, ...
    pub costs: Vec<CostRecord>,
}

/// Runs a fixed number of gradient-descent iterations in one
/// [`TrainingMode`].
///
/// # Example
///
/// ```
/// use ndarray::array;
/// use rust_regularized_networks::config::TrainingConfig;
/// use rust_regularized_networks::training::Trainer;
/// use rust_regularized_networks::utils::seeded;
///
/// let config = TrainingConfig {
///     num_iterations: 10,
///     cost_interval: 5,
///     print_cost: false,
///     ..TrainingConfig::default()
/// };
/// let x = array![[0.1, -0.4, 0.3], [0.2, 0.5, -0.6]];
/// let y = array![[1.0, 0.0, 1.0]];
///
/// let mut trainer = Trainer::from_config(&config).unwrap();
/// let model = trainer.fit(x.view(), y.view(), &mut seeded(config.seed)).unwrap();
/// assert_eq!(model.costs.len(), 2);
/// ```
pub struct Trainer<O: Optimizer = GradientDescent> {
    mode: TrainingMode,
    num_iterations: usize,
    cost_interval: usize,
    print_cost: bool,
    mask_sampling: MaskSampling,
    optimizer: O,
}

impl Trainer<GradientDescent> {
    /// Build a gradient-descent trainer from a validated configuration.
    pub fn from_config(config: &TrainingConfig) -> Result<Self> {
        let mode = config.validate()?;
        Ok(Self {
            mode,
            num_iterations: config.num_iterations,
            cost_interval: config.cost_interval,
            print_cost: config.print_cost,
            mask_sampling: config.mask_sampling(),
            optimizer: GradientDescent::new(config.learning_rate)?,
        })
    }
}

impl<O: Optimizer> Trainer<O> {
    /// Trainer with a custom update rule. Costs are recorded every 10 000
    /// iterations and not printed; dropout masks are reseeded with
    /// [`DROPOUT_MASK_SEED`].
    pub fn with_optimizer(mode: TrainingMode, num_iterations: usize, optimizer: O) -> Self {
        Self {
            mode,
            num_iterations,
            cost_interval: 10_000,
            print_cost: false,
            mask_sampling: MaskSampling::default(),
            optimizer,
        }
    }

    pub fn cost_interval(mut self, interval: usize) -> Self {
        self.cost_interval = interval;
        self
    }

    pub fn print_cost(mut self, print_cost: bool) -> Self {
        self.print_cost = print_cost;
        self
    }

    pub fn mask_sampling(mut self, mask_sampling: MaskSampling) -> Self {
        self.mask_sampling = mask_sampling;
        self
    }

    pub fn mode(&self) -> TrainingMode {
        self.mode
    }

    pub fn optimizer(&self) -> &O {
        &self.optimizer
    }

    /// Initialize `[n_x, 20, 3, 1]` parameters from `rng` and train them.
    pub fn fit<R: Rng + ?Sized>(
        &mut self,
        x: ArrayView2<f64>,
        y: ArrayView2<f64>,
        rng: &mut R,
    ) -> Result<TrainedModel> {
        let parameters = Parameters::initialize(&layer_dims(x.nrows()), rng)?;
        self.fit_from(x, y, parameters, rng)
    }

    /// Train the given parameters for exactly `num_iterations` updates.
    ///
    /// # Arguments
    ///
    /// * `x` - Features, one sample per column `(n_x, m)`
    /// * `y` - Labels `(1, m)` of 0.0/1.0
    /// * `parameters` - Starting point; consumed and updated in place
    /// * `rng` - Source of dropout masks under [`MaskSampling::Fresh`];
    ///   not drawn from otherwise
    ///
    /// # Returns
    ///
    /// The trained parameters and the costs recorded at iterations 0,
    /// `cost_interval`, 2·`cost_interval`, ... Shape and configuration
    /// problems are reported before the first update.
    pub fn fit_from<R: Rng + ?Sized>(
        &mut self,
        x: ArrayView2<f64>,
        y: ArrayView2<f64>,
        mut parameters: Parameters,
        rng: &mut R,
    ) -> Result<TrainedModel> {
        if self.cost_interval == 0 {
            return Err(NetworkError::configuration("cost_interval must be positive"));
        }
        if x.nrows() != parameters.input_size() {
            return Err(NetworkError::shape("X rows", parameters.input_size(), x.nrows()));
        }
        if x.ncols() == 0 {
            return Err(NetworkError::shape("X columns", "at least 1", 0));
        }
        if y.dim() != (1, x.ncols()) {
            return Err(NetworkError::shape("Y", (1, x.ncols()), y.dim()));
        }

        info!(
            mode = ?self.mode,
            iterations = self.num_iterations,
            learning_rate = self.optimizer.learning_rate(),
            samples = x.ncols(),
            "starting training"
        );

        let mut costs = Vec::new();
        for i in 0..self.num_iterations {
            let cost = self.step(x, y, &mut parameters, rng)?;

            if i % self.cost_interval == 0 {
                if self.print_cost {
                    info!("cost after iteration {}: {}", i, cost);
                } else {
                    debug!(iteration = i, cost, "cost recorded");
                }
                costs.push(CostRecord { iteration: i, cost });
            }
        }

        Ok(TrainedModel { parameters, costs })
    }

    /// One forward/cost/backward/update iteration; returns the cost before
    /// the update.
    fn step<R: Rng + ?Sized>(
        &mut self,
        x: ArrayView2<f64>,
        y: ArrayView2<f64>,
        parameters: &mut Parameters,
        rng: &mut R,
    ) -> Result<f64> {
        let (cost, gradients) = match self.mode {
            TrainingMode::Plain => {
                let (a3, cache) = forward(x, parameters)?;
                let cost = compute_cost(a3.view(), y)?;
                (cost, backward(x, y, &cache)?)
            }
            TrainingMode::L2 { lambd } => {
                let (a3, cache) = forward(x, parameters)?;
                let cost = compute_cost_with_regularization(a3.view(), y, parameters, lambd)?;
                (cost, backward_with_regularization(x, y, &cache, lambd)?)
            }
            TrainingMode::Dropout { keep_prob } => {
                let (a3, cache) = self.dropout_forward(x, parameters, keep_prob, rng)?;
                let cost = compute_cost(a3.view(), y)?;
                (cost, backward_with_dropout(x, y, &cache)?)
            }
        };

        self.optimizer.update(parameters, &gradients)?;
        Ok(cost)
    }

    fn dropout_forward<'p, R: Rng + ?Sized>(
        &self,
        x: ArrayView2<f64>,
        parameters: &'p Parameters,
        keep_prob: KeepProb,
        rng: &mut R,
    ) -> Result<(Array2<f64>, DropoutCache<'p>)> {
        match self.mask_sampling {
            MaskSampling::Reseeded(seed) => {
                forward_with_dropout(x, parameters, keep_prob, &mut seeded(seed))
            }
            MaskSampling::Fresh => forward_with_dropout(x, parameters, keep_prob, rng),
        }
    }
}
