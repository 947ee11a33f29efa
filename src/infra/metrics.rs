// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Write-only scalar telemetry for external visualisation.
// Nothing in the training loop ever reads these files back.
//
// Files in the run directory:
//   step_metrics.csv   step,loss,train_acc,lr   (one row per step)
//   epoch_metrics.csv  epoch,train_loss,train_acc,val_acc
//   model_graph.txt    one-time dump of the module tree
//
// How to read the metrics:
//   - Loss should decrease over steps (model is learning)
//   - lr ramps up over the first epoch, then follows the cosine
//   - If val_acc stalls while train_acc climbs → overfitting
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};
use serde::{Deserialize, Serialize};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Average cross-entropy loss over all training batches
    pub train_loss: f64,

    /// Average batch accuracy over all training batches
    pub train_acc: f64,

    /// Accuracy over the entire validation split
    pub val_acc: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, train_acc: f64, val_acc: f64) -> Self {
        Self { epoch, train_loss, train_acc, val_acc }
    }

    /// True iff this epoch STRICTLY beat the best validation
    /// accuracy so far. Equal accuracy is not an improvement —
    /// the best checkpoint keeps the earlier weights.
    pub fn is_improvement(&self, best_acc: f64) -> bool {
        self.val_acc > best_acc
    }
}

/// Appends scalar time series to CSV files in the run directory.
pub struct MetricsLogger {
    step_path:  PathBuf,
    epoch_path: PathBuf,
    graph_path: PathBuf,
}

impl MetricsLogger {
    /// Create the run directory and CSV headers if missing.
    /// Existing files are appended to across runs.
    pub fn new(dir: impl Into<String>) -> Result<Self> {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir)?;

        let step_path  = dir.join("step_metrics.csv");
        let epoch_path = dir.join("epoch_metrics.csv");
        let graph_path = dir.join("model_graph.txt");

        if !step_path.exists() {
            let mut f = fs::File::create(&step_path)?;
            writeln!(f, "step,loss,train_acc,lr")?;
        }
        if !epoch_path.exists() {
            let mut f = fs::File::create(&epoch_path)?;
            writeln!(f, "epoch,train_loss,train_acc,val_acc")?;
        }

        Ok(Self { step_path, epoch_path, graph_path })
    }

    /// Append one global step's scalars.
    /// `step` counts from 1 across epoch boundaries.
    pub fn log_step(&self, step: usize, loss: f64, train_acc: f64, lr: f64) -> Result<()> {
        let mut f = OpenOptions::new().append(true).open(&self.step_path)?;
        writeln!(f, "{},{:.6},{:.6},{:e}", step, loss, train_acc, lr)?;
        Ok(())
    }

    /// Append one epoch's summary row.
    pub fn log_epoch(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new().append(true).open(&self.epoch_path)?;
        writeln!(
            f,
            "{},{:.6},{:.6},{:.6}",
            m.epoch, m.train_loss, m.train_acc, m.val_acc,
        )?;
        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, val_acc={:.4}",
            m.epoch, m.train_loss, m.val_acc,
        );
        Ok(())
    }

    /// One-time dump of the module tree, written at setup.
    pub fn log_model_graph(&self, graph: &str) -> Result<()> {
        fs::write(&self.graph_path, graph)?;
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_improvement_is_strict() {
        let m = EpochMetrics::new(2, 0.5, 0.8, 0.75);
        assert!(m.is_improvement(0.70));
        // Equal accuracy must NOT count as an improvement
        assert!(!m.is_improvement(0.75));
        assert!(!m.is_improvement(0.80));
    }

    #[test]
    fn test_csv_rows_appended() {
        let dir    = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path().to_str().unwrap()).unwrap();

        logger.log_step(1, 0.69, 0.5, 1e-6).unwrap();
        logger.log_step(2, 0.65, 0.6, 2e-6).unwrap();
        logger
            .log_epoch(&EpochMetrics::new(1, 0.67, 0.55, 0.6))
            .unwrap();

        let steps = fs::read_to_string(dir.path().join("step_metrics.csv")).unwrap();
        assert_eq!(steps.lines().count(), 3); // header + 2 rows
        assert!(steps.starts_with("step,loss,train_acc,lr"));

        let epochs = fs::read_to_string(dir.path().join("epoch_metrics.csv")).unwrap();
        assert_eq!(epochs.lines().count(), 2);
    }

    #[test]
    fn test_model_graph_written_once() {
        let dir    = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path().to_str().unwrap()).unwrap();
        logger.log_model_graph("SentenceClassifier { .. }").unwrap();

        let graph = fs::read_to_string(dir.path().join("model_graph.txt")).unwrap();
        assert!(graph.contains("SentenceClassifier"));
    }
}
