//! Learned parameters of the three-layer network.

use crate::error::{NetworkError, Result};
use crate::layers::DenseLayer;
use ndarray::{Array1, Array2};
use rand::Rng;

/// Units in the two hidden layers.
pub const HIDDEN_UNITS: [usize; 2] = [20, 3];

/// Layer sizes `[input_dim, 20, 3, 1]` of the classifier.
pub fn layer_dims(input_dim: usize) -> [usize; 4] {
    [input_dim, HIDDEN_UNITS[0], HIDDEN_UNITS[1], 1]
}

/// Weights and biases for the three dense layers.
///
/// Layer `l` holds `W_l` of shape `(n_l, n_{l-1})` and `b_l` of shape
/// `(n_l, 1)`. The shapes chain from layer 1 to layer 3 and layer 3 has a
/// single output unit; every constructor checks this.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    layer1: DenseLayer,
    layer2: DenseLayer,
    layer3: DenseLayer,
}

impl Parameters {
    /// Initialize parameters for `layer_dims = [n0, n1, n2, n3]`.
    ///
    /// Weights are drawn from N(0, 1) / sqrt(n_{l-1}); biases start at zero.
    ///
    /// # Arguments
    ///
    /// * `layer_dims` - Exactly four positive sizes `[n_x, n_1, n_2, 1]`
    /// * `rng` - Source of the weight draws, layer 1 first
    ///
    /// # Returns
    ///
    /// The initialized parameters, or a configuration error for a wrong count
    /// or a zero size.
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_regularized_networks::training::{layer_dims, Parameters};
    /// use rust_regularized_networks::utils::seeded;
    ///
    /// let params = Parameters::initialize(&layer_dims(2), &mut seeded(3)).unwrap();
    /// assert_eq!(params.layer1().weights().dim(), (20, 2));
    /// assert_eq!(params.layer3().biases().dim(), (1, 1));
    /// ```
    pub fn initialize<R: Rng + ?Sized>(layer_dims: &[usize], rng: &mut R) -> Result<Self> {
        let dims: [usize; 4] = layer_dims.try_into().map_err(|_| {
            NetworkError::configuration(format!(
                "expected 4 layer sizes, got {}",
                layer_dims.len()
            ))
        })?;
        if dims.iter().any(|&n| n == 0) {
            return Err(NetworkError::configuration(format!(
                "layer sizes must be positive, got {:?}",
                dims
            )));
        }

        Self::new(
            DenseLayer::new(dims[0], dims[1], rng),
            DenseLayer::new(dims[1], dims[2], rng),
            DenseLayer::new(dims[2], dims[3], rng),
        )
    }

    /// Assemble parameters from three layers, checking that their shapes chain.
    pub fn new(layer1: DenseLayer, layer2: DenseLayer, layer3: DenseLayer) -> Result<Self> {
        let params = Self {
            layer1,
            layer2,
            layer3,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check the layer-to-layer shape invariant.
    pub fn validate(&self) -> Result<()> {
        if self.layer2.input_size() != self.layer1.output_size() {
            return Err(NetworkError::shape(
                "W2 columns",
                self.layer1.output_size(),
                self.layer2.input_size(),
            ));
        }
        if self.layer3.input_size() != self.layer2.output_size() {
            return Err(NetworkError::shape(
                "W3 columns",
                self.layer2.output_size(),
                self.layer3.input_size(),
            ));
        }
        if self.layer3.output_size() != 1 {
            return Err(NetworkError::shape("W3 rows", 1, self.layer3.output_size()));
        }
        Ok(())
    }

    pub fn layer1(&self) -> &DenseLayer {
        &self.layer1
    }

    pub fn layer2(&self) -> &DenseLayer {
        &self.layer2
    }

    pub fn layer3(&self) -> &DenseLayer {
        &self.layer3
    }

    pub fn layers(&self) -> [&DenseLayer; 3] {
        [&self.layer1, &self.layer2, &self.layer3]
    }

    pub(crate) fn layers_mut(&mut self) -> [&mut DenseLayer; 3] {
        [&mut self.layer1, &mut self.layer2, &mut self.layer3]
    }

    /// Number of input features expected by layer 1.
    pub fn input_size(&self) -> usize {
        self.layer1.input_size()
    }

    pub fn layer_dims(&self) -> [usize; 4] {
        [
            self.layer1.input_size(),
            self.layer1.output_size(),
            self.layer2.output_size(),
            self.layer3.output_size(),
        ]
    }

    pub fn parameter_count(&self) -> usize {
        self.layers().iter().map(|layer| layer.parameter_count()).sum()
    }

    /// `‖W1‖²_F + ‖W2‖²_F + ‖W3‖²_F`.
    pub fn weights_squared_norm(&self) -> f64 {
        self.layers()
            .iter()
            .map(|layer| layer.weights_squared_norm())
            .sum()
    }

    /// Flatten into one vector, ordered W1, b1, W2, b2, W3, b3 (row-major).
    pub fn to_vector(&self) -> Array1<f64> {
        self.layers()
            .into_iter()
            .flat_map(|layer| layer.weights().iter().chain(layer.biases().iter()))
            .copied()
            .collect()
    }

    /// Rebuild parameters with the shapes of `self` from a flat vector
    /// produced by [`Parameters::to_vector`].
    pub fn with_vector(&self, values: &Array1<f64>) -> Result<Self> {
        if values.len() != self.parameter_count() {
            return Err(NetworkError::shape(
                "flattened parameters",
                self.parameter_count(),
                values.len(),
            ));
        }

        let mut offset = 0;
        let mut take = |shape: (usize, usize)| -> Result<Array2<f64>> {
            let len = shape.0 * shape.1;
            let slice = values.slice(ndarray::s![offset..offset + len]).to_vec();
            offset += len;
            Array2::from_shape_vec(shape, slice)
                .map_err(|err| NetworkError::shape("flattened parameters", shape, err.to_string()))
        };

        let mut rebuilt = Vec::with_capacity(3);
        for layer in self.layers() {
            let weights = take(layer.weights().dim())?;
            let biases = take(layer.biases().dim())?;
            rebuilt.push(DenseLayer::from_parts(weights, biases)?);
        }
        let layer3 = rebuilt.pop();
        let layer2 = rebuilt.pop();
        let layer1 = rebuilt.pop();
        match (layer1, layer2, layer3) {
            (Some(l1), Some(l2), Some(l3)) => Self::new(l1, l2, l3),
            _ => Err(NetworkError::configuration("parameters must have three layers")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::seeded;
    use ndarray::array;

    #[test]
    fn test_layer_dims() {
        assert_eq!(layer_dims(2), [2, 20, 3, 1]);
    }

    #[test]
    fn test_initialize_shapes() {
        let params = Parameters::initialize(&[2, 20, 3, 1], &mut seeded(3)).unwrap();

        assert_eq!(params.layer1().weights().dim(), (20, 2));
        assert_eq!(params.layer1().biases().dim(), (20, 1));
        assert_eq!(params.layer2().weights().dim(), (3, 20));
        assert_eq!(params.layer2().biases().dim(), (3, 1));
        assert_eq!(params.layer3().weights().dim(), (1, 3));
        assert_eq!(params.layer3().biases().dim(), (1, 1));
        assert_eq!(params.layer_dims(), [2, 20, 3, 1]);
        assert_eq!(params.parameter_count(), 40 + 20 + 60 + 3 + 3 + 1);
    }

    #[test]
    fn test_initialize_rejects_bad_dims() {
        assert!(Parameters::initialize(&[2, 20, 1], &mut seeded(1)).is_err());
        assert!(Parameters::initialize(&[2, 0, 3, 1], &mut seeded(1)).is_err());
        assert!(Parameters::initialize(&[2, 20, 3, 2], &mut seeded(1)).is_err());
    }

    #[test]
    fn test_new_rejects_broken_chain() {
        let mut rng = seeded(5);
        let result = Parameters::new(
            DenseLayer::new(2, 20, &mut rng),
            DenseLayer::new(19, 3, &mut rng),
            DenseLayer::new(3, 1, &mut rng),
        );
        assert!(matches!(result, Err(NetworkError::Shape { .. })));
    }

    #[test]
    fn test_weights_squared_norm_sums_layers() {
        let params = Parameters::new(
            DenseLayer::from_parts(array![[1.0, 2.0]], array![[5.0]]).unwrap(),
            DenseLayer::from_parts(array![[3.0]], array![[5.0]]).unwrap(),
            DenseLayer::from_parts(array![[-1.0]], array![[5.0]]).unwrap(),
        )
        .unwrap();
        assert!((params.weights_squared_norm() - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_vector_roundtrip_preserves_order() {
        let params = Parameters::initialize(&[4, 20, 3, 1], &mut seeded(11)).unwrap();
        let flat = params.to_vector();

        assert_eq!(flat.len(), params.parameter_count());
        assert_eq!(flat[0], params.layer1().weights()[[0, 0]]);
        assert_eq!(flat[1], params.layer1().weights()[[0, 1]]);
        assert_eq!(params.with_vector(&flat).unwrap(), params);
    }

    #[test]
    fn test_with_vector_rejects_wrong_length() {
        let params = Parameters::initialize(&[2, 20, 3, 1], &mut seeded(2)).unwrap();
        assert!(params.with_vector(&Array1::zeros(3)).is_err());
    }
}
