use std::collections::HashMap;

use crate::layers::Dense;
use crate::math::Matrix;

/// RMSProp keeps an exponentially-decayed average of squared gradients per
/// parameter and divides each step by its square root, so frequently-large
/// gradients get damped and rarely-updated weights keep moving.
///
/// Update rule, applied cell-wise:
///   cache = rho · cache + (1 - rho) · g²
///   param = param - lr · g / (sqrt(cache) + ε)
pub struct RmsProp {
    pub learning_rate: f64,
    pub rho: f64,
    pub epsilon: f64,
    /// Squared-gradient accumulators, keyed by layer index. Layers may be
    /// stepped in any order; entries appear on first use.
    cache: HashMap<usize, (Matrix, Matrix)>,
}

impl RmsProp {
    /// Stock hyperparameters: rho = 0.9, ε = 1e-7.
    pub fn new(learning_rate: f64) -> RmsProp {
        RmsProp::with_params(learning_rate, 0.9, 1e-7)
    }

    pub fn with_params(learning_rate: f64, rho: f64, epsilon: f64) -> RmsProp {
        RmsProp {
            learning_rate,
            rho,
            epsilon,
            cache: HashMap::new(),
        }
    }

    /// Applies one RMSProp update to `layer` given its averaged gradients.
    pub fn step(
        &mut self,
        layer_index: usize,
        layer: &mut Dense,
        weights_grad: &Matrix,
        biases_grad: &Matrix,
    ) {
        let (w_cache, b_cache) = self.cache.entry(layer_index).or_insert_with(|| {
            (
                Matrix::zeros(weights_grad.rows, weights_grad.cols),
                Matrix::zeros(biases_grad.rows, biases_grad.cols),
            )
        });

        let rho = self.rho;
        *w_cache = w_cache.zip(weights_grad, |c, g| rho * c + (1.0 - rho) * g * g);
        *b_cache = b_cache.zip(biases_grad, |c, g| rho * c + (1.0 - rho) * g * g);

        let lr = self.learning_rate;
        let eps = self.epsilon;
        let weights_step = w_cache.zip(weights_grad, |c, g| lr * g / (c.sqrt() + eps));
        let biases_step = b_cache.zip(biases_grad, |c, g| lr * g / (c.sqrt() + eps));

        layer.apply_update(&weights_step, &biases_step);
    }

    /// Drops all accumulated state, e.g. between independent training runs.
    pub fn reset(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::ActivationFunction;

    fn unit_layer() -> Dense {
        let mut layer = Dense::new(1, 1, ActivationFunction::Sigmoid, 0.0);
        layer.weights = Matrix::from_rows(vec![vec![1.0]]);
        layer.biases = Matrix::zeros(1, 1);
        layer
    }

    #[test]
    fn step_moves_weights_against_the_gradient() {
        let mut optimizer = RmsProp::new(0.001);
        let mut layer = unit_layer();
        let grad = Matrix::from_rows(vec![vec![2.0]]);
        let zero = Matrix::zeros(1, 1);

        optimizer.step(0, &mut layer, &grad, &zero);
        assert!(layer.weights.get(0, 0) < 1.0);

        // First step is ≈ lr / sqrt(1 - rho) regardless of gradient scale.
        let expected = 1.0 - 0.001 / (1.0f64 - 0.9).sqrt();
        assert!((layer.weights.get(0, 0) - expected).abs() < 1e-4);
    }

    #[test]
    fn cache_damps_repeated_gradients() {
        let mut optimizer = RmsProp::new(0.001);
        let mut layer = unit_layer();
        let grad = Matrix::from_rows(vec![vec![2.0]]);
        let zero = Matrix::zeros(1, 1);

        optimizer.step(0, &mut layer, &grad, &zero);
        let first_step = 1.0 - layer.weights.get(0, 0);
        let before_second = layer.weights.get(0, 0);
        optimizer.step(0, &mut layer, &grad, &zero);
        let second_step = before_second - layer.weights.get(0, 0);

        // The accumulator grows, so the same gradient yields a smaller step.
        assert!(second_step < first_step);
        assert!(second_step > 0.0);
    }

    #[test]
    fn layers_keep_independent_state() {
        let mut optimizer = RmsProp::new(0.001);
        let mut a = unit_layer();
        let mut b = unit_layer();
        let grad = Matrix::from_rows(vec![vec![1.0]]);
        let zero = Matrix::zeros(1, 1);

        // Warm up layer 0's cache only; layer 1's first step must still be
        // the full cold-start step.
        optimizer.step(0, &mut a, &grad, &zero);
        optimizer.step(0, &mut a, &grad, &zero);
        optimizer.step(1, &mut b, &grad, &zero);

        let expected_cold = 1.0 - 0.001 / (1.0f64 - 0.9).sqrt();
        assert!((b.weights.get(0, 0) - expected_cold).abs() < 1e-4);
    }

    #[test]
    fn reset_forgets_the_accumulators() {
        let mut optimizer = RmsProp::new(0.001);
        let mut layer = unit_layer();
        let grad = Matrix::from_rows(vec![vec![1.0]]);
        let zero = Matrix::zeros(1, 1);

        optimizer.step(0, &mut layer, &grad, &zero);
        optimizer.reset();
        let before = layer.weights.get(0, 0);
        optimizer.step(0, &mut layer, &grad, &zero);

        let expected_cold_step = 0.001 / (1.0f64 - 0.9).sqrt();
        assert!((before - layer.weights.get(0, 0) - expected_cold_step).abs() < 1e-4);
    }
}
