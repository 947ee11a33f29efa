// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `train` and `eval`, and their
// configurable flags. Defaults reproduce the canonical run:
// 2 epochs, batch size 4, AdamW at 2e-5 with 1e-4 weight decay,
// warmup for one epoch then cosine decay.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fine-tune the classifier, then test the best checkpoint
    Train(TrainArgs),

    /// Evaluate a saved best checkpoint on the test split
    Eval(EvalArgs),
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug, Clone)]
pub struct TrainArgs {
    /// Pretrained bundle directory (config.json, tokenizer.json,
    /// optional encoder weights)
    #[arg(long, default_value = "pretrained")]
    pub plm_dir: String,

    /// Directory with train_data.json / valid_data.json / test_data.json
    #[arg(long, default_value = "data/classify_data")]
    pub data_dir: String,

    /// Directory for best_model / most_model checkpoint slots
    #[arg(long, default_value = "model")]
    pub checkpoint_dir: String,

    /// Directory for CSV telemetry and the model graph dump
    #[arg(long, default_value = "runs")]
    pub log_dir: String,

    /// Maximum tokens per input sequence, clamped to the
    /// encoder's positional limit
    #[arg(long, default_value_t = 128)]
    pub max_seq_len: usize,

    /// Number of samples processed together in one forward pass
    #[arg(long, default_value_t = 4)]
    pub batch_size: usize,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 2)]
    pub epochs: usize,

    /// Peak learning rate — the warmup ramps up to this value
    /// over the first epoch
    #[arg(long, default_value_t = 2e-5)]
    pub lr: f64,

    /// AdamW decoupled weight decay
    #[arg(long, default_value_t = 1e-4)]
    pub weight_decay: f64,

    /// Number of target classes
    #[arg(long, default_value_t = 2)]
    pub classes: usize,

    /// Seed for weight init, dropout, and data shuffling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// This is the boundary between Layer 1 and Layer 2 —
/// the application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            plm_dir:        a.plm_dir,
            data_dir:       a.data_dir,
            checkpoint_dir: a.checkpoint_dir,
            log_dir:        a.log_dir,
            max_seq_len:    a.max_seq_len,
            batch_size:     a.batch_size,
            epochs:         a.epochs,
            lr:             a.lr,
            weight_decay:   a.weight_decay,
            classes:        a.classes,
            seed:           a.seed,
        }
    }
}

/// All arguments for the `eval` command
#[derive(Args, Debug, Clone)]
pub struct EvalArgs {
    /// Directory where checkpoints were saved during training
    #[arg(long, default_value = "model")]
    pub checkpoint_dir: String,
}
