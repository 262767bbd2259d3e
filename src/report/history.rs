use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::train::EpochStats;

/// Collects per-epoch stats and appends them to `<log dir>/history.csv` as
/// training progresses, so the curves are on disk even if the run is cut
/// short. External plotting tools read the CSV directly.
///
/// Columns: `epoch,train_loss,val_loss,train_accuracy,val_accuracy,elapsed_ms`
/// with empty cells where no validation set was configured.
pub struct TrainingHistory {
    epochs: Vec<EpochStats>,
    writer: BufWriter<File>,
    csv_path: PathBuf,
}

impl TrainingHistory {
    /// Creates the log directory (and parents) and starts a fresh CSV with
    /// a header row.
    pub fn create(log_dir: impl AsRef<Path>) -> Result<TrainingHistory, Error> {
        let log_dir = log_dir.as_ref();
        fs::create_dir_all(log_dir).map_err(|e| Error::io(log_dir, e))?;

        let csv_path = log_dir.join("history.csv");
        let file = File::create(&csv_path).map_err(|e| Error::io(&csv_path, e))?;
        let mut writer = BufWriter::new(file);
        writeln!(
            writer,
            "epoch,train_loss,val_loss,train_accuracy,val_accuracy,elapsed_ms"
        )
        .map_err(|e| Error::io(&csv_path, e))?;

        Ok(TrainingHistory {
            epochs: Vec::new(),
            writer,
            csv_path,
        })
    }

    /// Appends one epoch. A failed disk write is logged and skipped rather
    /// than aborting a training run that is otherwise healthy.
    pub fn record(&mut self, stats: &EpochStats) {
        self.epochs.push(stats.clone());

        let row = format!(
            "{},{:.6},{},{:.6},{},{}",
            stats.epoch,
            stats.train_loss,
            stats
                .val_loss
                .map(|v| format!("{v:.6}"))
                .unwrap_or_default(),
            stats.train_accuracy,
            stats
                .val_accuracy
                .map(|v| format!("{v:.6}"))
                .unwrap_or_default(),
            stats.elapsed_ms,
        );
        if let Err(e) = writeln!(self.writer, "{row}").and_then(|_| self.writer.flush()) {
            log::warn!("could not append to {}: {e}", self.csv_path.display());
        }
    }

    /// Everything recorded so far, in epoch order.
    pub fn stats(&self) -> &[EpochStats] {
        &self.epochs
    }
}
