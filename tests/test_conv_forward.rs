// Integration tests for the convolution forward pass.
// Output dimensions follow floor((n_prev - f + 2*pad) / stride) + 1.

use approx::assert_relative_eq;
use ndarray::{s, Array4};
use ndarray_rand::rand_distr::StandardNormal;
use ndarray_rand::RandomExt;
use rust_regularized_networks::layers::conv2d::{
    conv_forward, conv_single_step, output_dim, zero_pad, ConvHyperparameters,
};
use rust_regularized_networks::utils::seeded;

fn random_inputs() -> (Array4<f64>, Array4<f64>, Array4<f64>) {
    let mut rng = seeded(1);
    let a_prev = Array4::random_using((10, 4, 4, 3), StandardNormal, &mut rng);
    let weights = Array4::random_using((2, 2, 3, 8), StandardNormal, &mut rng);
    let biases = Array4::random_using((1, 1, 1, 8), StandardNormal, &mut rng);
    (a_prev, weights, biases)
}

// Direct evaluation of one output entry without slicing helpers.
fn naive_entry(
    a_prev: &Array4<f64>,
    weights: &Array4<f64>,
    biases: &Array4<f64>,
    hp: ConvHyperparameters,
    (i, h, w, c): (usize, usize, usize, usize),
) -> f64 {
    let (_, n_h_prev, n_w_prev, n_c_prev) = a_prev.dim();
    let f = weights.dim().0;
    let mut total = biases[[0, 0, 0, c]];
    for dh in 0..f {
        for dw in 0..f {
            let row = (hp.stride * h + dh) as isize - hp.pad as isize;
            let col = (hp.stride * w + dw) as isize - hp.pad as isize;
            if row < 0 || col < 0 || row >= n_h_prev as isize || col >= n_w_prev as isize {
                continue;
            }
            for k in 0..n_c_prev {
                total += a_prev[[i, row as usize, col as usize, k]] * weights[[dh, dw, k, c]];
            }
        }
    }
    total
}

#[test]
fn test_output_shape_for_reference_configuration() {
    let (a_prev, weights, biases) = random_inputs();
    let hp = ConvHyperparameters { stride: 2, pad: 2 };

    let (z, _) = conv_forward(&a_prev, &weights, &biases, hp).unwrap();

    // floor((4 - 2 + 2*2) / 2) + 1 = 4
    let n_h = (4 - 2 + 2 * 2) / 2 + 1;
    assert_eq!(n_h, output_dim(4, 2, 2, 2).unwrap());
    assert_eq!(z.dim(), (10, n_h, n_h, 8));
}

#[test]
fn test_output_matches_naive_convolution() {
    let (a_prev, weights, biases) = random_inputs();
    let hp = ConvHyperparameters { stride: 2, pad: 2 };

    let (z, _) = conv_forward(&a_prev, &weights, &biases, hp).unwrap();

    for &(i, h, w, c) in &[(0, 0, 0, 0), (3, 2, 1, 5), (9, 3, 3, 7), (5, 1, 2, 2)] {
        let expected = naive_entry(&a_prev, &weights, &biases, hp, (i, h, w, c));
        assert_relative_eq!(z[[i, h, w, c]], expected, epsilon = 1e-12);
    }
}

#[test]
fn test_stride_one_no_padding() {
    let (a_prev, weights, biases) = random_inputs();
    let hp = ConvHyperparameters { stride: 1, pad: 0 };

    let (z, cache) = conv_forward(&a_prev, &weights, &biases, hp).unwrap();
    assert_eq!(z.dim(), (10, 3, 3, 8));
    assert_eq!(cache.weights, weights);

    let expected = naive_entry(&a_prev, &weights, &biases, hp, (2, 1, 1, 4));
    assert_relative_eq!(z[[2, 1, 1, 4]], expected, epsilon = 1e-12);
}

#[test]
fn test_single_step_on_padded_slice() {
    let (a_prev, weights, biases) = random_inputs();
    let padded = zero_pad(&a_prev, 1);
    let slice = padded.slice(s![0, 1..3, 1..3, ..]);

    let z = conv_single_step(slice, weights.slice(s![.., .., .., 0]), biases[[0, 0, 0, 0]]).unwrap();
    let expected = naive_entry(
        &a_prev,
        &weights,
        &biases,
        ConvHyperparameters { stride: 1, pad: 1 },
        (0, 1, 1, 0),
    );
    assert_relative_eq!(z, expected, epsilon = 1e-12);
}

#[test]
fn test_rejects_bias_shape() {
    let (a_prev, weights, _) = random_inputs();
    let biases = Array4::<f64>::zeros((1, 1, 1, 4));
    let hp = ConvHyperparameters { stride: 1, pad: 0 };
    assert!(conv_forward(&a_prev, &weights, &biases, hp).is_err());
}
