//! Backward passes: plain, L2-regularized and dropout.
//!
//! All three share the same recursion, starting from `dZ3 = A3 − Y`:
//!
//! ```text
//! dW_l = (1/m) · dZ_l · A_{l-1}ᵀ      db_l = (1/m) · Σ_samples dZ_l
//! dA_{l-1} = W_lᵀ · dZ_l              dZ_{l-1} = dA_{l-1} ⊙ 1[Z_{l-1} > 0]
//! ```
//!
//! The L2 variant adds `(lambd/m) · W_l` to each weight gradient; the dropout
//! variant reapplies the forward masks to `dA_2` and `dA_1`.

use crate::error::{NetworkError, Result};
use crate::training::propagation::{check_input, Cache, DropoutCache, DropoutMasks};
use crate::utils::relu_backward;
use ndarray::{Array1, Array2, ArrayView2, Axis};

/// Gradient of the cost with respect to one dense layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGradients {
    pub dw: Array2<f64>,
    pub db: Array2<f64>,
}

/// Gradients for all parameters, plus the hidden activation gradients
/// (after dropout masking when it applies).
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub layer1: LayerGradients,
    pub layer2: LayerGradients,
    pub layer3: LayerGradients,
    pub da1: Array2<f64>,
    pub da2: Array2<f64>,
}

impl Gradients {
    pub fn layers(&self) -> [&LayerGradients; 3] {
        [&self.layer1, &self.layer2, &self.layer3]
    }

    /// Flatten in the same order as `Parameters::to_vector`.
    pub fn to_vector(&self) -> Array1<f64> {
        self.layers()
            .into_iter()
            .flat_map(|grads| grads.dw.iter().chain(grads.db.iter()))
            .copied()
            .collect()
    }
}

/// Gradients of the unregularized cross-entropy cost.
///
/// # Arguments
///
/// * `x` - The input the cache was computed from, `(n_x, m)`
/// * `y` - Labels `(1, m)`
/// * `cache` - Result of [`forward`](crate::training::forward) on `x`
///
/// # Returns
///
/// [`Gradients`] with `dw`/`db` shaped like the matching parameters, or a
/// shape error when `x`, `y` or the cached matrices disagree.
pub fn backward(x: ArrayView2<f64>, y: ArrayView2<f64>, cache: &Cache<'_>) -> Result<Gradients> {
    backpropagate(x, y, cache, 0.0, None)
}

/// Gradients of the L2-regularized cost; `(lambd/m) · W_l` is added to each
/// weight gradient, biases are left unregularized.
///
/// # Arguments
///
/// * `x` - The input the cache was computed from, `(n_x, m)`
/// * `y` - Labels `(1, m)`
/// * `cache` - Result of [`forward`](crate::training::forward) on `x`
/// * `lambd` - L2 coefficient; 0 gives the same result as [`backward`]
pub fn backward_with_regularization(
    x: ArrayView2<f64>,
    y: ArrayView2<f64>,
    cache: &Cache<'_>,
    lambd: f64,
) -> Result<Gradients> {
    backpropagate(x, y, cache, lambd, None)
}

/// Gradients through a dropout forward pass.
///
/// The masks recorded in `cache` are applied to `dA2` and `dA1` (and the
/// survivors divided by `keep_prob`) before the ReLU derivative.
///
/// # Arguments
///
/// * `x` - The input the cache was computed from, `(n_x, m)`
/// * `y` - Labels `(1, m)`
/// * `cache` - Result of
///   [`forward_with_dropout`](crate::training::forward_with_dropout) on `x`
///
/// # Returns
///
/// [`Gradients`] whose `da1`/`da2` are zero wherever the masks dropped a unit.
pub fn backward_with_dropout(
    x: ArrayView2<f64>,
    y: ArrayView2<f64>,
    cache: &DropoutCache<'_>,
) -> Result<Gradients> {
    backpropagate(x, y, &cache.cache, 0.0, Some(&cache.masks))
}

fn backpropagate(
    x: ArrayView2<f64>,
    y: ArrayView2<f64>,
    cache: &Cache<'_>,
    lambd: f64,
    masks: Option<&DropoutMasks>,
) -> Result<Gradients> {
    let parameters = cache.parameters;
    check_input(x, parameters)?;
    if y.dim() != (1, x.ncols()) {
        return Err(NetworkError::shape("Y", (1, x.ncols()), y.dim()));
    }
    if cache.a3.dim() != y.dim() {
        return Err(NetworkError::shape("cached A3", y.dim(), cache.a3.dim()));
    }
    let hidden1 = (parameters.layer1().output_size(), x.ncols());
    let hidden2 = (parameters.layer2().output_size(), x.ncols());
    for (name, matrix, expected) in [
        ("cached Z1", &cache.z1, hidden1),
        ("cached A1", &cache.a1, hidden1),
        ("cached Z2", &cache.z2, hidden2),
        ("cached A2", &cache.a2, hidden2),
    ] {
        if matrix.dim() != expected {
            return Err(NetworkError::shape(name, expected, matrix.dim()));
        }
    }
    let m = x.ncols() as f64;

    let layer_gradients = |dz: &Array2<f64>, a_prev: ArrayView2<f64>, weights: &Array2<f64>| {
        let mut dw = dz.dot(&a_prev.t()) / m;
        if lambd != 0.0 {
            dw.scaled_add(lambd / m, weights);
        }
        let db = dz.sum_axis(Axis(1)).insert_axis(Axis(1)) / m;
        LayerGradients { dw, db }
    };

    let dz3 = &cache.a3 - &y;
    let layer3 = layer_gradients(&dz3, cache.a2.view(), parameters.layer3().weights());

    let mut da2 = parameters.layer3().weights().t().dot(&dz3);
    if let Some(masks) = masks {
        masks.d2.apply(&mut da2)?;
    }
    let dz2 = relu_backward(da2.view(), cache.z2.view())?;
    let layer2 = layer_gradients(&dz2, cache.a1.view(), parameters.layer2().weights());

    let mut da1 = parameters.layer2().weights().t().dot(&dz2);
    if let Some(masks) = masks {
        masks.d1.apply(&mut da1)?;
    }
    let dz1 = relu_backward(da1.view(), cache.z1.view())?;
    let layer1 = layer_gradients(&dz1, x, parameters.layer1().weights());

    Ok(Gradients {
        layer1,
        layer2,
        layer3,
        da1,
        da2,
    })
}
