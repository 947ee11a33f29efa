// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates a full fine-tuning run in order:
//
//   Step 1: Load pretrained bundle   (Layer 6 - infra)
//   Step 2: Load dataset splits      (Layer 4 - data)
//   Step 3: Tokenise and pad         (Layer 4 - data)
//   Step 4: Build model + encoder    (Layer 5 - ml)
//   Step 5: Save config              (Layer 6 - infra)
//   Step 6: Run training loop        (Layer 5 - ml)
//
// The loop itself trains, validates, checkpoints, and finally
// evaluates the best checkpoint on the test split.
//
// Reference: Burn Book §5 (Training)

use anyhow::Result;
use burn::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::SentenceDataset,
    encode::SentenceEncoder,
    loader::JsonSentenceLoader,
};
use crate::domain::traits::SampleSource;
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::MetricsLogger,
    pretrained::PretrainedBundle,
};
use crate::ml::model::SentenceClassifier;
use crate::ml::trainer::{run_training, TrainBackend, TrainDevice, TrainOutcome};

// ─── Training Configuration ──────────────────────────────────────────────────
// All settings for one run, constructed once and passed down —
// nothing is read from process-global state. Serialisable so it
// can be saved alongside the checkpoints and reloaded by `eval`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub plm_dir:        String,
    pub data_dir:       String,
    pub checkpoint_dir: String,
    pub log_dir:        String,
    pub max_seq_len:    usize,
    pub batch_size:     usize,
    pub epochs:         usize,
    pub lr:             f64,
    pub weight_decay:   f64,
    pub classes:        usize,
    pub seed:           u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            plm_dir:        "pretrained".to_string(),
            data_dir:       "data/classify_data".to_string(),
            checkpoint_dir: "model".to_string(),
            log_dir:        "runs".to_string(),
            max_seq_len:    128,
            batch_size:     4,
            epochs:         2,
            lr:             2e-5,
            weight_decay:   1e-4,
            classes:        2,
            seed:           42,
        }
    }
}

impl TrainConfig {
    fn split_path(&self, name: &str) -> std::path::PathBuf {
        std::path::Path::new(&self.data_dir).join(name)
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full fine-tuning pipeline end to end.
    pub fn execute(&self) -> Result<TrainOutcome> {
        let cfg = &self.config;

        // ── Step 1: Load the pretrained bundle ────────────────────────────────
        tracing::info!("Loading pretrained bundle from '{}'", cfg.plm_dir);
        let bundle    = PretrainedBundle::new(&cfg.plm_dir);
        let plm_cfg   = bundle.load_config()?;
        let tokenizer = bundle.load_tokenizer()?;
        let model_cfg = plm_cfg.classifier_config(cfg.classes, cfg.max_seq_len);

        // ── Step 2: Load the three dataset splits ─────────────────────────────
        let train_raw = JsonSentenceLoader::new(cfg.split_path("train_data.json")).load_all()?;
        let valid_raw = JsonSentenceLoader::new(cfg.split_path("valid_data.json")).load_all()?;
        let test_raw  = JsonSentenceLoader::new(cfg.split_path("test_data.json")).load_all()?;

        // ── Step 3: Tokenise and pad every split ──────────────────────────────
        let encoder = SentenceEncoder::new(tokenizer, model_cfg.max_seq_len);
        let train_dataset = SentenceDataset::new(encoder.encode_all(&train_raw)?);
        let valid_dataset = SentenceDataset::new(encoder.encode_all(&valid_raw)?);
        let test_dataset  = SentenceDataset::new(encoder.encode_all(&test_raw)?);

        // ── Step 4: Build the model on the training backend ───────────────────
        // Seed first so weight init (and dropout) are reproducible,
        // then graft the pretrained encoder weights onto the fresh
        // model, keeping the randomly initialised head.
        let device = TrainDevice::default();
        TrainBackend::seed(&device, cfg.seed);
        let model: SentenceClassifier<TrainBackend> = model_cfg.init(&device);
        let encoder_net = bundle.load_encoder(model.encoder.clone(), &device)?;
        let model = model.with_encoder(encoder_net);

        // ── Step 5: Persist the run config for `eval` ─────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);
        ckpt_manager.save_config(cfg)?;
        let logger = MetricsLogger::new(&cfg.log_dir)?;

        // ── Step 6: Run the training loop (Layer 5) ───────────────────────────
        run_training(
            cfg,
            model,
            train_dataset,
            valid_dataset,
            test_dataset,
            &ckpt_manager,
            &logger,
            device,
        )
    }
}
