use serde::{Deserialize, Serialize};

/// Optional annotations stored inside a saved model artifact.
/// All fields are Option<> so artifacts without them deserialize cleanly.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ModelMetadata {
    pub description: Option<String>,
    /// Width of the feature vectors the model was trained on.
    pub feature_dim: Option<usize>,
    /// Names for the two classes, below/above the 0.5 threshold.
    pub output_labels: Option<Vec<String>>,
}
