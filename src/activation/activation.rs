use serde::{Deserialize, Serialize};

/// Element-wise activations used by the procedure classifier: ReLU on the
/// hidden layer, Sigmoid on the single output unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFunction {
    ReLU,
    Sigmoid,
}

impl ActivationFunction {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::ReLU => {
                if x > 0.0 {
                    x
                } else {
                    0.0
                }
            }
            ActivationFunction::Sigmoid => 1.0 / (1.0 + (-x).exp()),
        }
    }

    /// Derivative with respect to the pre-activation value.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::ReLU => {
                if x > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            ActivationFunction::Sigmoid => {
                let fx = self.function(x);
                fx * (1.0 - fx)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relu_clips_negatives() {
        let relu = ActivationFunction::ReLU;
        assert_eq!(relu.function(-3.0), 0.0);
        assert_eq!(relu.function(2.5), 2.5);
        assert_eq!(relu.derivative(-3.0), 0.0);
        assert_eq!(relu.derivative(2.5), 1.0);
    }

    #[test]
    fn sigmoid_is_centered_at_half() {
        let sigmoid = ActivationFunction::Sigmoid;
        assert!((sigmoid.function(0.0) - 0.5).abs() < 1e-12);
        // σ'(0) = 0.25 is the maximum of the derivative
        assert!((sigmoid.derivative(0.0) - 0.25).abs() < 1e-12);
        assert!(sigmoid.function(10.0) > 0.999);
        assert!(sigmoid.function(-10.0) < 0.001);
    }
}
