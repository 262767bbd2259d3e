pub mod activation;
pub mod data;
pub mod error;
pub mod layers;
pub mod loss;
pub mod math;
pub mod network;
pub mod optim;
pub mod report;
pub mod train;

// Convenience re-exports
pub use activation::ActivationFunction;
pub use data::dataset::{Dataset, FEATURE_DIM};
pub use data::split::{holdout_split, three_way_split, Subset};
pub use error::Error;
pub use layers::dense::Dense;
pub use loss::bce::BceLoss;
pub use math::matrix::Matrix;
pub use network::{ModelMetadata, Network};
pub use optim::rmsprop::RmsProp;
pub use report::history::TrainingHistory;
pub use train::{evaluate, train_loop, EpochStats, TrainConfig};
