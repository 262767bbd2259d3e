pub mod history;
pub mod svg;

pub use history::TrainingHistory;
