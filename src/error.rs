use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong between reading the learning data and
/// writing the trained artifact.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("feature and label counts differ ({features} feature rows, {labels} labels)")]
    LengthMismatch { features: usize, labels: usize },

    #[error("feature row {index} has {found} values, expected {expected}")]
    RaggedFeatures {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("label {index} is {value}, expected 0 or 1")]
    InvalidLabel { index: usize, value: f64 },

    #[error("learning data is empty")]
    EmptyDataset,
}

impl Error {
    /// Attaches the offending path to a raw I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Error {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Attaches the offending path to a serde_json error.
    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Error {
        Error::Json {
            path: path.into(),
            source,
        }
    }
}
