//! Predictions and accuracy of a trained network.

use crate::error::{NetworkError, Result};
use crate::training::propagation::forward;
use crate::training::Parameters;
use ndarray::{Array2, ArrayView2, Zip};

/// Predict 0/1 labels for every column of `x` (`A3 > 0.5`).
pub fn predict(x: ArrayView2<f64>, parameters: &Parameters) -> Result<Array2<f64>> {
    let (a3, _) = forward(x, parameters)?;
    Ok(a3.mapv(|p| if p > 0.5 { 1.0 } else { 0.0 }))
}

/// Fraction of predictions equal to the labels.
pub fn accuracy(predictions: ArrayView2<f64>, y: ArrayView2<f64>) -> Result<f64> {
    if predictions.dim() != y.dim() {
        return Err(NetworkError::shape("predictions against Y", y.dim(), predictions.dim()));
    }
    if y.is_empty() {
        return Err(NetworkError::shape("Y", "at least one label", 0));
    }
    let mut correct = 0usize;
    Zip::from(&predictions).and(&y).for_each(|&p, &label| {
        if p == label {
            correct += 1;
        }
    });
    Ok(correct as f64 / y.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::DenseLayer;
    use ndarray::array;

    #[test]
    fn test_predict_thresholds_at_half() {
        // Output is sigmoid(x0 - x1) through identity-like hidden layers.
        let params = Parameters::new(
            DenseLayer::from_parts(array![[1.0, 0.0], [0.0, 1.0]], array![[0.0], [0.0]]).unwrap(),
            DenseLayer::from_parts(array![[1.0, 0.0], [0.0, 1.0]], array![[0.0], [0.0]]).unwrap(),
            DenseLayer::from_parts(array![[1.0, -1.0]], array![[0.0]]).unwrap(),
        )
        .unwrap();
        let x = array![[2.0, 0.0, 1.0], [0.0, 3.0, 1.0]];

        let predictions = predict(x.view(), &params).unwrap();
        assert_eq!(predictions, array![[1.0, 0.0, 0.0]]);
    }

    #[test]
    fn test_accuracy() {
        let predictions = array![[1.0, 0.0, 1.0, 1.0]];
        let y = array![[1.0, 1.0, 1.0, 0.0]];
        assert!((accuracy(predictions.view(), y.view()).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_accuracy_shape_mismatch() {
        let predictions = array![[1.0, 0.0]];
        let y = array![[1.0, 1.0, 1.0]];
        assert!(accuracy(predictions.view(), y.view()).is_err());
    }
}
