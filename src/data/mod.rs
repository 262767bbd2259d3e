pub mod dataset;
pub mod split;

pub use dataset::Dataset;
pub use split::{holdout_split, three_way_split, Subset};
