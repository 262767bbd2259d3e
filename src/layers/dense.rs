use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::activation::ActivationFunction;
use crate::math::Matrix;

/// Fully-connected layer with an optional dropout rate on its output.
///
/// Dropout is the inverted variant: during training each output unit is
/// zeroed with probability `dropout` and the survivors are scaled by
/// `1 / (1 - dropout)`, so inference runs the plain affine + activation
/// with no rescaling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dense {
    pub size: usize,
    pub input_size: usize,
    pub weights: Matrix,
    pub biases: Matrix,
    pub activation: ActivationFunction,
    pub dropout: f64,
    /// Post-activation, post-dropout values from the last forward pass.
    #[serde(skip)]
    activations: Matrix,
    /// Pre-activation values (z = xW + b) from the last forward pass,
    /// needed for the activation derivative during backprop.
    #[serde(skip)]
    pre_activations: Matrix,
    /// Mask applied on the last training forward pass; entries are 0 or
    /// 1/(1-p). All ones outside training.
    #[serde(skip)]
    dropout_mask: Matrix,
}

impl Dense {
    /// Creates a layer with weights initialized to match the activation
    /// (He before ReLU, Xavier before Sigmoid) and zero biases.
    pub fn new(
        size: usize,
        input_size: usize,
        activation: ActivationFunction,
        dropout: f64,
    ) -> Dense {
        assert!(
            (0.0..1.0).contains(&dropout),
            "dropout rate must be in [0, 1)"
        );
        let weights = match activation {
            ActivationFunction::ReLU => Matrix::he(input_size, size),
            ActivationFunction::Sigmoid => Matrix::xavier(input_size, size),
        };
        Dense {
            size,
            input_size,
            weights,
            biases: Matrix::zeros(1, size),
            activation,
            dropout,
            activations: Matrix::zeros(1, size),
            pre_activations: Matrix::zeros(1, size),
            dropout_mask: Matrix::ones(1, size),
        }
    }

    /// Runs one sample through the layer.
    ///
    /// With `training` set, a fresh dropout mask is sampled and the
    /// pre-activations, activations and mask are cached for
    /// `compute_gradients`. Without it the layer is deterministic.
    pub fn forward(&mut self, input: &[f64], training: bool) -> Vec<f64> {
        assert_eq!(input.len(), self.input_size, "input width mismatch");
        let x = Matrix::from_rows(vec![input.to_vec()]);
        let z = &(&x * &self.weights) + &self.biases;
        let activation = self.activation;
        let mut a = z.map(|v| activation.function(v));

        self.dropout_mask = if training && self.dropout > 0.0 {
            let keep = 1.0 - self.dropout;
            let mut rng = rand::thread_rng();
            Matrix::from_fn(1, self.size, || {
                if rng.gen::<f64>() < keep {
                    1.0 / keep
                } else {
                    0.0
                }
            })
        } else {
            Matrix::ones(1, self.size)
        };
        a = a.hadamard(&self.dropout_mask);

        self.pre_activations = z;
        self.activations = a.clone();
        a.into_row()
    }

    /// Post-activation output of the last forward pass; feeds the next
    /// layer's gradient computation.
    pub fn activations(&self) -> &Matrix {
        &self.activations
    }

    /// Computes gradients for the last training forward pass.
    ///
    /// `delta` is ∂L/∂a for this layer (in dropped-activation space) and
    /// `inputs` is the row that was fed in. Returns
    /// `(weights_grad, biases_grad)`; `biases_grad` is also ∂L/∂z, which
    /// the caller propagates through the weights to the previous layer.
    pub fn compute_gradients(&self, delta: &Matrix, inputs: &Matrix) -> (Matrix, Matrix) {
        // δ_z = δ_a ⊙ mask ⊙ σ'(z); the mask routes gradient only through
        // the units that survived dropout, with the same 1/(1-p) scale.
        let act_derivative = self
            .pre_activations
            .map(|x| self.activation.derivative(x));
        let layer_delta = delta.hadamard(&self.dropout_mask).hadamard(&act_derivative);

        let weights_grad = &inputs.transpose() * &layer_delta;
        (weights_grad, layer_delta)
    }

    /// Applies pre-scaled update matrices (the optimizer owns the scaling).
    pub fn apply_update(&mut self, weights_step: &Matrix, biases_step: &Matrix) {
        self.weights = &self.weights - weights_step;
        self.biases = &self.biases - biases_step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_has_layer_width() {
        let mut layer = Dense::new(4, 3, ActivationFunction::ReLU, 0.0);
        let out = layer.forward(&[0.1, 0.2, 0.3], true);
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn no_dropout_makes_training_and_inference_agree() {
        let mut layer = Dense::new(5, 2, ActivationFunction::Sigmoid, 0.0);
        let input = [0.4, -0.7];
        let train_out = layer.forward(&input, true);
        let eval_out = layer.forward(&input, false);
        assert_eq!(train_out, eval_out);
    }

    #[test]
    fn dropout_zeroes_some_training_outputs() {
        // Sigmoid never produces an exact 0.0 on its own, so any zero in
        // the output must come from the dropout mask.
        let mut layer = Dense::new(10, 2, ActivationFunction::Sigmoid, 0.6);
        let input = [1.0, -1.0];
        let mut saw_zero = false;
        for _ in 0..50 {
            let out = layer.forward(&input, true);
            if out.iter().any(|&v| v == 0.0) {
                saw_zero = true;
                break;
            }
        }
        assert!(saw_zero, "dropout 0.6 never zeroed an output in 50 passes");
    }

    #[test]
    fn dropout_is_inactive_at_inference() {
        let mut layer = Dense::new(10, 2, ActivationFunction::Sigmoid, 0.6);
        let input = [1.0, -1.0];
        let baseline = layer.forward(&input, false);
        for _ in 0..20 {
            assert_eq!(layer.forward(&input, false), baseline);
        }
        assert!(baseline.iter().all(|&v| v > 0.0));
    }

    #[test]
    fn surviving_units_are_scaled_up() {
        let mut layer = Dense::new(8, 2, ActivationFunction::Sigmoid, 0.5);
        let input = [0.3, 0.9];
        let eval_out = layer.forward(&input, false);
        let train_out = layer.forward(&input, true);
        for (t, e) in train_out.iter().zip(eval_out.iter()) {
            if *t != 0.0 {
                // keep probability 0.5 → survivors scaled by 2
                assert!((t - e * 2.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn serialization_drops_runtime_caches() {
        let mut layer = Dense::new(3, 2, ActivationFunction::ReLU, 0.5);
        layer.forward(&[1.0, 2.0], true);
        let json = serde_json::to_string(&layer).unwrap();
        let restored: Dense = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.weights, layer.weights);
        assert_eq!(restored.biases, layer.biases);
        assert_eq!(restored.activations().rows, 0);
    }
}
