// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores model weights using Burn's CompactRecorder.
//
// Two rotating slots live in the checkpoint directory:
//
//   model/
//     best_model.mpk.gz  ← highest validation accuracy so far
//     most_model.mpk.gz  ← overwritten at every epoch end
//     train_config.json  ← run config, for rebuilding the model
//
// The "best" slot is only ever overwritten when validation
// accuracy strictly improves, so the accuracy it represents is
// non-decreasing across the run. The "most recent" slot is
// overwritten unconditionally and exists for manual resume and
// debugging; the test phase reloads "best", never "most".
//
// Burn's CompactRecorder serialises to MessagePack + gzip and
// is type-safe: loading fails if the architecture differs.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::SentenceClassifier;

const BEST_STEM: &str = "best_model";
const MOST_RECENT_STEM: &str = "most_model";

/// Manages the best / most-recent checkpoint slots plus the
/// persisted training config.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Creates the directory if it doesn't already exist.
    pub fn new(dir: impl Into<String>) -> Self {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir).ok();
        Self { dir }
    }

    /// Overwrite the "best" slot. The trainer calls this only
    /// when validation accuracy strictly improved.
    pub fn save_best<B: AutodiffBackend>(&self, model: &SentenceClassifier<B>) -> Result<()> {
        self.save_slot(model, BEST_STEM)
    }

    /// Overwrite the "most recent" slot. Called once per epoch,
    /// improvement or not.
    pub fn save_most_recent<B: AutodiffBackend>(&self, model: &SentenceClassifier<B>) -> Result<()> {
        self.save_slot(model, MOST_RECENT_STEM)
    }

    fn save_slot<B: AutodiffBackend>(
        &self,
        model: &SentenceClassifier<B>,
        stem:  &str,
    ) -> Result<()> {
        let path = self.dir.join(stem);
        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| {
                format!("Failed to save checkpoint to '{}'", path.display())
            })?;
        tracing::debug!("Saved checkpoint slot '{}'", stem);
        Ok(())
    }

    /// Restore the "best" slot into a model with matching
    /// architecture. Used for the test phase and by `eval`.
    pub fn load_best<B: Backend>(
        &self,
        model:  SentenceClassifier<B>,
        device: &B::Device,
    ) -> Result<SentenceClassifier<B>> {
        let path = self.dir.join(BEST_STEM);
        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!(
                    "Cannot load checkpoint '{}'. Have you trained the model first?",
                    path.display()
                )
            })?;
        Ok(model.load_record(record))
    }

    pub fn best_exists(&self) -> bool {
        self.dir.join(format!("{BEST_STEM}.mpk")).exists()
    }

    pub fn most_recent_exists(&self) -> bool {
        self.dir.join(format!("{MOST_RECENT_STEM}.mpk")).exists()
    }

    /// Persist the training configuration so `eval` can rebuild
    /// the exact model architecture later.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join("train_config.json");
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join("train_config.json");
        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read config from '{}'. Make sure you have run 'train' before 'eval'.",
                    path.display()
                )
            })?;
        Ok(serde_json::from_str(&json)?)
    }
}
