use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::Error;

/// Feature width produced by the upstream extraction step: inverse token
/// count, a starts-with-digit flag, and a 100-dimensional normalized
/// word-vector sum.
pub const FEATURE_DIM: usize = 102;

/// The learning data: one feature row per text node, with a parallel 0/1
/// label marking whether the node is a procedure step.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub features: Vec<Vec<f64>>,
    pub labels: Vec<f64>,
}

impl Dataset {
    /// Reads the two JSON documents — a flat array of equal-width numeric
    /// arrays and a flat array of 0/1 scalars — and checks that they line
    /// up: non-empty, uniform feature width, one label per row, labels
    /// binary.
    pub fn from_files(
        features_path: impl AsRef<Path>,
        labels_path: impl AsRef<Path>,
    ) -> Result<Dataset, Error> {
        let features: Vec<Vec<f64>> = read_json(features_path.as_ref())?;
        let labels: Vec<f64> = read_json(labels_path.as_ref())?;
        Dataset::from_parts(features, labels)
    }

    /// Validates already-parsed arrays; `from_files` after the I/O.
    pub fn from_parts(features: Vec<Vec<f64>>, labels: Vec<f64>) -> Result<Dataset, Error> {
        if features.is_empty() {
            return Err(Error::EmptyDataset);
        }
        if features.len() != labels.len() {
            return Err(Error::LengthMismatch {
                features: features.len(),
                labels: labels.len(),
            });
        }
        let width = features[0].len();
        for (index, row) in features.iter().enumerate() {
            if row.len() != width {
                return Err(Error::RaggedFeatures {
                    index,
                    expected: width,
                    found: row.len(),
                });
            }
        }
        for (index, &value) in labels.iter().enumerate() {
            if value != 0.0 && value != 1.0 {
                return Err(Error::InvalidLabel { index, value });
            }
        }
        Ok(Dataset { features, labels })
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Width of every feature row.
    pub fn feature_dim(&self) -> usize {
        self.features[0].len()
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Error> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| Error::json(path, e))
}
