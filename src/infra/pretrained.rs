// ============================================================
// Layer 6 — Pretrained Bundle
// ============================================================
// The pretrained model directory holds three files by
// convention:
//
//   pretrained/
//     config.json     ← encoder hyperparameters (HF-style keys)
//     tokenizer.json  ← the vocabulary the encoder was trained with
//     encoder.mpk.gz  ← serialised encoder weights (optional)
//
// The config and tokenizer are required: without them the
// architecture and vocabulary are unknown. The weights file is
// optional — when it is missing the encoder trains from random
// initialisation, which keeps smoke runs possible without
// shipping a multi-hundred-megabyte bundle.
//
// Reference: Burn Book §5 (Records)

use anyhow::{Context, Result};
use std::path::PathBuf;
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};
use serde::{Deserialize, Serialize};
use tokenizers::Tokenizer;

use crate::ml::model::{SentenceClassifierConfig, TransformerEncoder};

/// Encoder hyperparameters as stored in the bundle's
/// config.json. Field names follow the HuggingFace BERT config
/// convention so an exported config can be dropped in as-is;
/// unknown fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PretrainedConfig {
    pub vocab_size:              usize,
    pub hidden_size:             usize,
    pub num_hidden_layers:       usize,
    pub num_attention_heads:     usize,
    pub intermediate_size:       usize,
    pub max_position_embeddings: usize,
    #[serde(default = "default_type_vocab_size")]
    pub type_vocab_size:         usize,
    #[serde(default = "default_hidden_dropout_prob")]
    pub hidden_dropout_prob:     f64,
}

fn default_type_vocab_size() -> usize { 2 }
fn default_hidden_dropout_prob() -> f64 { 0.1 }

impl PretrainedConfig {
    /// Combine the encoder hyperparameters with run-level
    /// settings into the full model config. The sequence length
    /// is clamped to the encoder's positional limit.
    pub fn classifier_config(&self, classes: usize, max_seq_len: usize) -> SentenceClassifierConfig {
        SentenceClassifierConfig::new(
            self.vocab_size,
            max_seq_len.min(self.max_position_embeddings),
            self.type_vocab_size,
            self.hidden_size,
            self.num_attention_heads,
            self.num_hidden_layers,
            self.intermediate_size,
            self.hidden_dropout_prob,
            classes,
        )
    }
}

/// Handle on a pretrained model directory.
pub struct PretrainedBundle {
    dir: PathBuf,
}

impl PretrainedBundle {
    pub fn new(dir: impl Into<String>) -> Self {
        Self { dir: PathBuf::from(dir.into()) }
    }

    /// Read the encoder hyperparameters from config.json.
    pub fn load_config(&self) -> Result<PretrainedConfig> {
        let path = self.dir.join("config.json");
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("Cannot read pretrained config '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed pretrained config '{}'", path.display()))
    }

    /// Load the bundled tokenizer.
    pub fn load_tokenizer(&self) -> Result<Tokenizer> {
        let path = self.dir.join("tokenizer.json");
        Tokenizer::from_file(&path)
            .map_err(|e| anyhow::anyhow!(
                "Cannot load tokenizer from '{}': {}", path.display(), e
            ))
    }

    /// Restore pretrained encoder weights into a freshly
    /// initialised encoder. A missing weights file is not an
    /// error — the encoder is returned unchanged (random init)
    /// with a warning.
    pub fn load_encoder<B: Backend>(
        &self,
        encoder: TransformerEncoder<B>,
        device:  &B::Device,
    ) -> Result<TransformerEncoder<B>> {
        let stem = self.dir.join("encoder");
        if !self.dir.join("encoder.mpk.gz").exists() {
            tracing::warn!(
                "No encoder weights at '{}' — training from random initialisation",
                self.dir.join("encoder.mpk.gz").display()
            );
            return Ok(encoder);
        }

        let record = CompactRecorder::new()
            .load(stem.clone(), device)
            .with_context(|| {
                format!("Corrupt pretrained encoder weights '{}'", stem.display())
            })?;

        tracing::info!("Restored pretrained encoder weights from '{}'", self.dir.display());
        Ok(encoder.load_record(record))
    }
}
