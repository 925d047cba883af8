//! Datasets for the binary classifier
//!
//! Features are stored one sample per column `(n_x, m)`, labels as a single
//! row `(1, m)` of 0.0/1.0 values.

use crate::error::{NetworkError, Result};
use ndarray::Array2;
use rand::Rng;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// Train and test splits with matching feature dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub train_x: Array2<f64>,
    pub train_y: Array2<f64>,
    pub test_x: Array2<f64>,
    pub test_y: Array2<f64>,
}

impl Dataset {
    /// Assemble a dataset, checking the shape contract of both splits.
    pub fn new(
        train_x: Array2<f64>,
        train_y: Array2<f64>,
        test_x: Array2<f64>,
        test_y: Array2<f64>,
    ) -> Result<Self> {
        check_split("train", &train_x, &train_y)?;
        check_split("test", &test_x, &test_y)?;
        if train_x.nrows() != test_x.nrows() {
            return Err(NetworkError::shape(
                "test feature rows",
                train_x.nrows(),
                test_x.nrows(),
            ));
        }
        Ok(Self {
            train_x,
            train_y,
            test_x,
            test_y,
        })
    }

    pub fn feature_dim(&self) -> usize {
        self.train_x.nrows()
    }
}

fn check_split(name: &str, x: &Array2<f64>, y: &Array2<f64>) -> Result<()> {
    if x.ncols() == 0 || x.nrows() == 0 {
        return Err(NetworkError::shape(
            format!("{} features", name),
            "non-empty",
            x.dim(),
        ));
    }
    if y.dim() != (1, x.ncols()) {
        return Err(NetworkError::shape(
            format!("{} labels", name),
            (1, x.ncols()),
            y.dim(),
        ));
    }
    if y.iter().any(|&label| label != 0.0 && label != 1.0) {
        return Err(NetworkError::configuration(format!(
            "{} labels must be 0 or 1",
            name
        )));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DatasetFile {
    train_x: Vec<Vec<f64>>,
    train_y: Vec<Vec<f64>>,
    test_x: Vec<Vec<f64>>,
    test_y: Vec<Vec<f64>>,
}

fn to_matrix(name: &str, rows: Vec<Vec<f64>>) -> Result<Array2<f64>> {
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, Vec::len);
    if let Some(bad) = rows.iter().find(|row| row.len() != n_cols) {
        return Err(NetworkError::shape(
            format!("{} row length", name),
            n_cols,
            bad.len(),
        ));
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((n_rows, n_cols), flat)
        .map_err(|err| NetworkError::shape(name.to_string(), (n_rows, n_cols), err.to_string()))
}

/// Load a dataset from a JSON file of row-major nested arrays.
///
/// ```json
/// {
///   "train_x": [[0.1, 0.2, 0.3], [0.4, 0.5, 0.6]],
///   "train_y": [[0, 1, 1]],
///   "test_x": [[0.7], [0.8]],
///   "test_y": [[0]]
/// }
/// ```
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let file: DatasetFile = serde_json::from_str(&contents)?;

    let dataset = Dataset::new(
        to_matrix("train_x", file.train_x)?,
        to_matrix("train_y", file.train_y)?,
        to_matrix("test_x", file.test_x)?,
        to_matrix("test_y", file.test_y)?,
    )?;
    info!(
        path = %path.display(),
        features = dataset.feature_dim(),
        train = dataset.train_x.ncols(),
        test = dataset.test_x.ncols(),
        "loaded dataset"
    );
    Ok(dataset)
}

/// Seeded synthetic 2-D classification problem.
///
/// Points are uniform in [-0.75, 0.75]²; a point is labelled 1 when it lies
/// above the curve `x2 = 0.25 · sin(4 · x1)`. Each label is flipped with
/// probability `noise`, which must be in [0, 1).
pub fn two_dimensional_dataset<R: Rng + ?Sized>(
    n_train: usize,
    n_test: usize,
    noise: f64,
    rng: &mut R,
) -> Result<Dataset> {
    if !(0.0..1.0).contains(&noise) {
        return Err(NetworkError::configuration(format!(
            "noise must be in [0, 1), got {}",
            noise
        )));
    }

    let mut sample = |m: usize| {
        let mut x = Array2::<f64>::zeros((2, m));
        let mut y = Array2::<f64>::zeros((1, m));
        for j in 0..m {
            let x1: f64 = rng.gen_range(-0.75..0.75);
            let x2: f64 = rng.gen_range(-0.75..0.75);
            let mut label = x2 > 0.25 * (4.0 * x1).sin();
            if rng.gen::<f64>() < noise {
                label = !label;
            }
            x[[0, j]] = x1;
            x[[1, j]] = x2;
            y[[0, j]] = if label { 1.0 } else { 0.0 };
        }
        (x, y)
    };

    let (train_x, train_y) = sample(n_train);
    let (test_x, test_y) = sample(n_test);
    Dataset::new(train_x, train_y, test_x, test_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::seeded;

    #[test]
    fn test_two_dimensional_shapes() {
        let data = two_dimensional_dataset(211, 200, 0.05, &mut seeded(1)).unwrap();
        assert_eq!(data.train_x.dim(), (2, 211));
        assert_eq!(data.train_y.dim(), (1, 211));
        assert_eq!(data.test_x.dim(), (2, 200));
        assert_eq!(data.feature_dim(), 2);
        assert!(data.train_x.iter().all(|v| v.abs() <= 0.75));
    }

    #[test]
    fn test_two_dimensional_noise_free_labels_follow_boundary() {
        let data = two_dimensional_dataset(100, 10, 0.0, &mut seeded(4)).unwrap();
        for j in 0..100 {
            let (x1, x2) = (data.train_x[[0, j]], data.train_x[[1, j]]);
            let expected = if x2 > 0.25 * (4.0 * x1).sin() { 1.0 } else { 0.0 };
            assert_eq!(data.train_y[[0, j]], expected);
        }
    }

    #[test]
    fn test_two_dimensional_deterministic() {
        let a = two_dimensional_dataset(50, 20, 0.1, &mut seeded(9)).unwrap();
        let b = two_dimensional_dataset(50, 20, 0.1, &mut seeded(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_two_dimensional_rejects_bad_noise() {
        assert!(two_dimensional_dataset(10, 10, 1.0, &mut seeded(1)).is_err());
        assert!(two_dimensional_dataset(10, 10, -0.1, &mut seeded(1)).is_err());
    }

    #[test]
    fn test_dataset_new_rejects_label_width() {
        let result = Dataset::new(
            Array2::zeros((2, 3)),
            Array2::zeros((1, 2)),
            Array2::zeros((2, 1)),
            Array2::zeros((1, 1)),
        );
        assert!(matches!(result, Err(NetworkError::Shape { .. })));
    }

    #[test]
    fn test_dataset_new_rejects_non_binary_labels() {
        let result = Dataset::new(
            Array2::zeros((2, 2)),
            Array2::from_elem((1, 2), 0.5),
            Array2::zeros((2, 1)),
            Array2::zeros((1, 1)),
        );
        assert!(matches!(result, Err(NetworkError::Configuration { .. })));
    }

    #[test]
    fn test_to_matrix_rejects_ragged_rows() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(to_matrix("train_x", rows).is_err());
    }
}
