//! Forward passes of the three-layer network.
//!
//! `X` holds one sample per column. Hidden layers are LINEAR → RELU, the
//! output layer is LINEAR → SIGMOID.

use crate::error::{NetworkError, Result};
use crate::layers::{DropoutMask, KeepProb};
use crate::training::Parameters;
use crate::utils::{relu, sigmoid_matrix};
use ndarray::{Array2, ArrayView2};
use rand::Rng;

/// Intermediate values of one forward pass.
///
/// Borrows the parameters it was computed with, so they cannot be updated
/// while the cache is alive.
#[derive(Debug, Clone)]
pub struct Cache<'p> {
    pub z1: Array2<f64>,
    pub a1: Array2<f64>,
    pub z2: Array2<f64>,
    pub a2: Array2<f64>,
    pub z3: Array2<f64>,
    pub a3: Array2<f64>,
    pub parameters: &'p Parameters,
}

/// Keep-masks sampled for the two hidden layers.
#[derive(Debug, Clone, PartialEq)]
pub struct DropoutMasks {
    pub d1: DropoutMask,
    pub d2: DropoutMask,
}

/// Cache of a dropout forward pass: the activations (after masking) plus the
/// masks that produced them.
#[derive(Debug, Clone)]
pub struct DropoutCache<'p> {
    pub cache: Cache<'p>,
    pub masks: DropoutMasks,
}

impl DropoutCache<'_> {
    pub fn keep_prob(&self) -> KeepProb {
        self.masks.d1.keep_prob()
    }
}

pub(crate) fn check_input(x: ArrayView2<f64>, parameters: &Parameters) -> Result<()> {
    if x.nrows() != parameters.input_size() {
        return Err(NetworkError::shape(
            "X rows",
            parameters.input_size(),
            x.nrows(),
        ));
    }
    if x.ncols() == 0 {
        return Err(NetworkError::shape("X columns", "at least 1", 0));
    }
    Ok(())
}

/// LINEAR → RELU → LINEAR → RELU → LINEAR → SIGMOID.
///
/// Returns the output `A3` of shape `(1, m)` and the cache for the backward
/// pass. No randomness is involved.
pub fn forward<'p>(x: ArrayView2<f64>, parameters: &'p Parameters) -> Result<(Array2<f64>, Cache<'p>)> {
    check_input(x, parameters)?;

    let z1 = parameters.layer1().linear_forward(x)?;
    let a1 = relu(z1.view());
    let z2 = parameters.layer2().linear_forward(a1.view())?;
    let a2 = relu(z2.view());
    let z3 = parameters.layer3().linear_forward(a2.view())?;
    let a3 = sigmoid_matrix(z3.view());

    let cache = Cache {
        z1,
        a1,
        z2,
        a2,
        z3,
        a3: a3.clone(),
        parameters,
    };
    Ok((a3, cache))
}

/// LINEAR → RELU + DROPOUT → LINEAR → RELU + DROPOUT → LINEAR → SIGMOID.
///
/// Each hidden unit is kept with probability `keep_prob`, survivors are
/// scaled by `1 / keep_prob`. Masks are drawn from `rng` (layer 1 first, row
/// by row) and stored in the returned cache. With `keep_prob == 1` the result
/// equals [`forward`].
///
/// # Arguments
///
/// * `x` - Input features, one sample per column `(n_x, m)`
/// * `parameters` - Network weights; borrowed by the returned cache
/// * `keep_prob` - Probability of keeping each hidden unit
/// * `rng` - Source of the two keep-masks
///
/// # Returns
///
/// `A3` of shape `(1, m)` and a [`DropoutCache`] holding the masked
/// activations and the masks for [`backward_with_dropout`].
///
/// # Examples
///
/// ```
/// use ndarray::array;
/// use rust_regularized_networks::layers::KeepProb;
/// use rust_regularized_networks::training::{forward_with_dropout, layer_dims, Parameters};
/// use rust_regularized_networks::utils::seeded;
///
/// let params = Parameters::initialize(&layer_dims(2), &mut seeded(3)).unwrap();
/// let x = array![[0.5, -0.2, 0.1], [0.3, 0.8, -0.7]];
/// let keep_prob = KeepProb::new(0.86).unwrap();
///
/// let (a3, cache) = forward_with_dropout(x.view(), &params, keep_prob, &mut seeded(1)).unwrap();
/// assert_eq!(a3.dim(), (1, 3));
/// assert_eq!(cache.masks.d1.dim(), (20, 3));
/// ```
///
/// [`backward_with_dropout`]: crate::training::backward_with_dropout
pub fn forward_with_dropout<'p, R: Rng + ?Sized>(
    x: ArrayView2<f64>,
    parameters: &'p Parameters,
    keep_prob: KeepProb,
    rng: &mut R,
) -> Result<(Array2<f64>, DropoutCache<'p>)> {
    check_input(x, parameters)?;

    let z1 = parameters.layer1().linear_forward(x)?;
    let mut a1 = relu(z1.view());
    let d1 = DropoutMask::sample(a1.dim(), keep_prob, rng);
    d1.apply(&mut a1)?;

    let z2 = parameters.layer2().linear_forward(a1.view())?;
    let mut a2 = relu(z2.view());
    let d2 = DropoutMask::sample(a2.dim(), keep_prob, rng);
    d2.apply(&mut a2)?;

    let z3 = parameters.layer3().linear_forward(a2.view())?;
    let a3 = sigmoid_matrix(z3.view());

    let cache = DropoutCache {
        cache: Cache {
            z1,
            a1,
            z2,
            a2,
            z3,
            a3: a3.clone(),
            parameters,
        },
        masks: DropoutMasks { d1, d2 },
    };
    Ok((a3, cache))
}
