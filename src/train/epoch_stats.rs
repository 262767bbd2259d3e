use serde::{Deserialize, Serialize};

/// Per-epoch training statistics emitted by `train_loop`.
///
/// One value is handed to the epoch callback at the end of every completed
/// epoch; the run log writes these out as the training curves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean training loss over all samples in this epoch, with dropout
    /// active (the same figure the loop optimized).
    pub train_loss: f64,
    /// Mean validation loss in inference mode, if a validation set was
    /// provided.
    pub val_loss: Option<f64>,
    /// Fraction of training samples on the correct side of the 0.5
    /// threshold during the epoch's forward passes.
    pub train_accuracy: f64,
    /// Validation accuracy in inference mode, if a validation set was
    /// provided.
    pub val_accuracy: Option<f64>,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}
