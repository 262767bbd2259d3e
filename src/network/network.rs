use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::activation::ActivationFunction;
use crate::error::Error;
use crate::layers::Dense;
use crate::network::metadata::ModelMetadata;

/// Hidden width of the procedure classifier.
pub const HIDDEN_UNITS: usize = 32;
/// Dropout rate applied to the hidden layer during training.
pub const DROPOUT_RATE: f64 = 0.5;

/// A stack of dense layers plus optional artifact metadata. The whole
/// struct is the serialized model artifact.
#[derive(Debug, Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Dense>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ModelMetadata>,
}

impl Network {
    pub fn new(layers: Vec<Dense>) -> Network {
        Network {
            layers,
            metadata: None,
        }
    }

    /// The fixed architecture used to spot procedure text:
    /// `input_dim → 32 (ReLU, dropout 0.5) → 1 (Sigmoid)`.
    pub fn procedure_classifier(input_dim: usize) -> Network {
        Network::new(vec![
            Dense::new(HIDDEN_UNITS, input_dim, ActivationFunction::ReLU, DROPOUT_RATE),
            Dense::new(1, HIDDEN_UNITS, ActivationFunction::Sigmoid, 0.0),
        ])
    }

    fn forward(&mut self, input: &[f64], training: bool) -> Vec<f64> {
        let mut current = input.to_vec();
        for layer in &mut self.layers {
            current = layer.forward(&current, training);
        }
        current
    }

    /// Forward pass with dropout active; caches activations in each layer
    /// for backprop.
    pub fn forward_train(&mut self, input: &[f64]) -> Vec<f64> {
        self.forward(input, true)
    }

    /// Inference-mode forward pass: no dropout, deterministic.
    pub fn predict(&mut self, input: &[f64]) -> Vec<f64> {
        self.forward(input, false)
    }

    /// Serializes the model to a pretty-printed JSON artifact.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| Error::io(path, e))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self).map_err(|e| Error::json(path, e))
    }

    /// Deserializes a model from a JSON artifact written by `save_json`.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Network, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| Error::json(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifier_has_expected_shape() {
        let mut network = Network::procedure_classifier(102);
        assert_eq!(network.layers.len(), 2);
        assert_eq!(network.layers[0].input_size, 102);
        assert_eq!(network.layers[0].size, HIDDEN_UNITS);
        assert_eq!(network.layers[1].size, 1);

        let out = network.predict(&vec![0.0; 102]);
        assert_eq!(out.len(), 1);
        assert!(out[0] > 0.0 && out[0] < 1.0, "sigmoid output must be in (0, 1)");
    }

    #[test]
    fn artifact_round_trips_through_disk() {
        let mut network = Network::procedure_classifier(6);
        network.metadata = Some(ModelMetadata {
            description: Some("test artifact".into()),
            feature_dim: Some(6),
            output_labels: Some(vec!["other".into(), "procedure".into()]),
        });
        let input = vec![0.25; 6];
        let before = network.predict(&input);

        let path = std::env::temp_dir().join("procedure-net-artifact-test.json");
        network.save_json(&path).unwrap();
        let mut restored = Network::load_json(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(restored.predict(&input), before);
        let meta = restored.metadata.expect("metadata must survive the round trip");
        assert_eq!(meta.feature_dim, Some(6));
    }

    #[test]
    fn load_json_reports_missing_file() {
        let err = Network::load_json("no/such/artifact.json").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
