//! 2D convolution forward pass
//!
//! Works on NHWC tensors: activations are `(m, n_H, n_W, n_C)`, kernels are
//! `(f, f, n_C_prev, n_C)` and biases `(1, 1, 1, n_C)`.

use crate::error::{NetworkError, Result};
use ndarray::{s, Array4, ArrayView3, Zip};
use serde::{Deserialize, Serialize};

/// Stride and zero-padding of a convolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvHyperparameters {
    pub stride: usize,
    pub pad: usize,
}

/// Values kept from `conv_forward` for a later backward pass.
#[derive(Debug, Clone)]
pub struct ConvCache {
    pub a_prev: Array4<f64>,
    pub weights: Array4<f64>,
    pub biases: Array4<f64>,
    pub hparameters: ConvHyperparameters,
}

/// Output length along one spatial axis.
///
/// Calculated as: floor((n_prev - f + 2*pad) / stride) + 1
pub fn output_dim(n_prev: usize, f: usize, pad: usize, stride: usize) -> Result<usize> {
    if stride == 0 {
        return Err(NetworkError::configuration("convolution stride must be positive"));
    }
    let padded = n_prev + 2 * pad;
    if f == 0 || f > padded {
        return Err(NetworkError::shape(
            "convolution kernel size",
            format!("1..={}", padded),
            f,
        ));
    }
    Ok((padded - f) / stride + 1)
}

/// Zero-pad the height and width axes of an NHWC batch by `pad` on every side.
pub fn zero_pad(x: &Array4<f64>, pad: usize) -> Array4<f64> {
    let (m, h, w, c) = x.dim();
    let mut padded = Array4::zeros((m, h + 2 * pad, w + 2 * pad, c));
    padded
        .slice_mut(s![.., pad..pad + h, pad..pad + w, ..])
        .assign(x);
    padded
}

/// Apply one filter to one `(f, f, n_C_prev)` slice: `sum(slice ⊙ W) + b`.
pub fn conv_single_step(a_slice: ArrayView3<f64>, weights: ArrayView3<f64>, bias: f64) -> Result<f64> {
    if a_slice.dim() != weights.dim() {
        return Err(NetworkError::shape(
            "convolution slice",
            weights.dim(),
            a_slice.dim(),
        ));
    }
    let mut total = 0.0;
    Zip::from(a_slice)
        .and(weights)
        .for_each(|&a, &w| total += a * w);
    Ok(total + bias)
}

/// Forward propagation of a convolution layer.
///
/// # Arguments
///
/// * `a_prev` - Input activations `(m, n_H_prev, n_W_prev, n_C_prev)`
/// * `weights` - Filters `(f, f, n_C_prev, n_C)`
/// * `biases` - Per-filter bias `(1, 1, 1, n_C)`
/// * `hparameters` - Stride and padding
///
/// # Returns
///
/// The output `Z` of shape `(m, n_H, n_W, n_C)` and the cache of inputs.
///
/// # Examples
///
/// ```
/// use ndarray::Array4;
/// use rust_regularized_networks::layers::conv2d::{conv_forward, ConvHyperparameters};
///
/// let a_prev = Array4::<f64>::ones((2, 5, 5, 3));
/// let weights = Array4::<f64>::ones((3, 3, 3, 4));
/// let biases = Array4::<f64>::zeros((1, 1, 1, 4));
/// let hp = ConvHyperparameters { stride: 1, pad: 0 };
///
/// let (z, _cache) = conv_forward(&a_prev, &weights, &biases, hp).unwrap();
/// assert_eq!(z.dim(), (2, 3, 3, 4));
/// assert_eq!(z[[0, 1, 1, 2]], 27.0);
/// ```
pub fn conv_forward(
    a_prev: &Array4<f64>,
    weights: &Array4<f64>,
    biases: &Array4<f64>,
    hparameters: ConvHyperparameters,
) -> Result<(Array4<f64>, ConvCache)> {
    let (m, n_h_prev, n_w_prev, n_c_prev) = a_prev.dim();
    let (f, f_w, kernel_channels, n_c) = weights.dim();

    if f != f_w {
        return Err(NetworkError::shape("square kernel", (f, f), (f, f_w)));
    }
    if kernel_channels != n_c_prev {
        return Err(NetworkError::shape(
            "kernel input channels",
            n_c_prev,
            kernel_channels,
        ));
    }
    if biases.dim() != (1, 1, 1, n_c) {
        return Err(NetworkError::shape("convolution biases", (1, 1, 1, n_c), biases.dim()));
    }

    let ConvHyperparameters { stride, pad } = hparameters;
    let n_h = output_dim(n_h_prev, f, pad, stride)?;
    let n_w = output_dim(n_w_prev, f, pad, stride)?;

    let a_prev_pad = zero_pad(a_prev, pad);
    let mut z = Array4::zeros((m, n_h, n_w, n_c));

    for i in 0..m {
        for h in 0..n_h {
            let vert_start = stride * h;
            for w in 0..n_w {
                let horiz_start = stride * w;
                let a_slice = a_prev_pad.slice(s![
                    i,
                    vert_start..vert_start + f,
                    horiz_start..horiz_start + f,
                    ..
                ]);
                for c in 0..n_c {
                    z[[i, h, w, c]] = conv_single_step(
                        a_slice,
                        weights.slice(s![.., .., .., c]),
                        biases[[0, 0, 0, c]],
                    )?;
                }
            }
        }
    }

    let cache = ConvCache {
        a_prev: a_prev.clone(),
        weights: weights.clone(),
        biases: biases.clone(),
        hparameters,
    };
    Ok((z, cache))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::seeded;
    use ndarray::Array3;
    use ndarray_rand::rand_distr::StandardNormal;
    use ndarray_rand::RandomExt;

    #[test]
    fn test_output_dim_formula() {
        assert_eq!(output_dim(28, 3, 1, 1).unwrap(), 28);
        assert_eq!(output_dim(28, 3, 0, 1).unwrap(), 26);
        assert_eq!(output_dim(5, 3, 1, 2).unwrap(), 3);
        assert_eq!(output_dim(7, 3, 1, 2).unwrap(), 4);
    }

    #[test]
    fn test_output_dim_rejects_zero_stride() {
        assert!(matches!(
            output_dim(4, 2, 0, 0),
            Err(NetworkError::Configuration { .. })
        ));
    }

    #[test]
    fn test_output_dim_rejects_oversized_kernel() {
        assert!(matches!(
            output_dim(3, 6, 1, 1),
            Err(NetworkError::Shape { .. })
        ));
    }

    #[test]
    fn test_zero_pad_shape_and_border() {
        let mut rng = seeded(1);
        let x = Array4::random_using((4, 3, 3, 2), StandardNormal, &mut rng);
        let padded = zero_pad(&x, 2);

        assert_eq!(padded.dim(), (4, 7, 7, 2));
        assert_eq!(padded[[1, 1, 1, 0]], 0.0);
        assert_eq!(padded[[1, 2, 2, 1]], x[[1, 0, 0, 1]]);
        assert_eq!(padded[[3, 4, 4, 0]], x[[3, 2, 2, 0]]);
    }

    #[test]
    fn test_conv_single_step_value() {
        let a = Array3::from_elem((2, 2, 1), 2.0);
        let w = Array3::from_elem((2, 2, 1), 0.5);
        let z = conv_single_step(a.view(), w.view(), -1.0).unwrap();
        assert!((z - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_conv_single_step_shape_mismatch() {
        let a = Array3::<f64>::zeros((2, 2, 1));
        let w = Array3::<f64>::zeros((3, 3, 1));
        assert!(conv_single_step(a.view(), w.view(), 0.0).is_err());
    }

    #[test]
    fn test_conv_forward_rejects_channel_mismatch() {
        let a_prev = Array4::<f64>::zeros((1, 4, 4, 3));
        let w = Array4::<f64>::zeros((2, 2, 2, 8));
        let b = Array4::<f64>::zeros((1, 1, 1, 8));
        let hp = ConvHyperparameters { stride: 1, pad: 0 };
        assert!(conv_forward(&a_prev, &w, &b, hp).is_err());
    }

    #[test]
    fn test_conv_forward_padding_only_sees_bias_in_corner() {
        // With pad=2 and f=2, the top-left window covers only padding.
        let a_prev = Array4::<f64>::ones((1, 4, 4, 3));
        let w = Array4::<f64>::ones((2, 2, 3, 1));
        let b = Array4::from_elem((1, 1, 1, 1), 0.25);
        let hp = ConvHyperparameters { stride: 2, pad: 2 };

        let (z, cache) = conv_forward(&a_prev, &w, &b, hp).unwrap();
        assert_eq!(z.dim(), (1, 4, 4, 1));
        assert_eq!(z[[0, 0, 0, 0]], 0.25);
        assert_eq!(z[[0, 1, 1, 0]], 12.25);
        assert_eq!(cache.hparameters, hp);
        assert_eq!(cache.a_prev, a_prev);
    }
}
