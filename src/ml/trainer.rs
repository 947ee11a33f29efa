// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Full fine-tuning run: train + validate per epoch, checkpoint
// to the best / most-recent slots, then reload the best weights
// and evaluate the held-out test split.
//
// Key Burn insight:
//   - Training uses TrainBackend (Autodiff<NdArray>) for gradients
//   - model.valid() returns model on EvalBackend (NdArray),
//     which disables dropout for deterministic evaluation
//   - Gradients are rebuilt from scratch by every backward()
//     call (GradientsParams::from_grads), so one batch's
//     gradients can never accumulate into the next step —
//     the equivalent of zeroing before backward, not after
//
// Step order is fixed: forward → loss → backward → optimiser
// step at the schedule's current rate → advance the schedule.
//
// There is no retry or recovery here. A failed batch, a full
// disk, or a corrupt checkpoint terminates the run.
//
// Reference: Burn Book §5, Loshchilov & Hutter (2019) AdamW

use anyhow::Result;
use std::io::Write as _;
use std::time::Instant;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamWConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::SentenceBatcher, dataset::SentenceDataset};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::evaluate::{
    accuracy, batch_accuracy, classification_report, int_tensor_to_labels, predicted_labels,
};
use crate::ml::model::SentenceClassifier;
use crate::ml::schedule::WarmupCosineSchedule;

pub type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;
pub type EvalBackend  = burn::backend::NdArray;
pub type TrainDevice  = burn::backend::ndarray::NdArrayDevice;

/// Everything a finished run reports back to the caller.
pub struct TrainOutcome {
    /// Per-epoch summary rows, in epoch order
    pub epochs: Vec<EpochMetrics>,

    /// Highest validation accuracy seen across the run —
    /// the accuracy of the "best" checkpoint
    pub best_val_acc: f64,

    /// Accuracy of the best checkpoint on the test split
    pub test_acc: f64,

    /// Per-class precision/recall/F1/support breakdown
    pub report: String,
}

pub fn run_training(
    cfg:           &TrainConfig,
    mut model:     SentenceClassifier<TrainBackend>,
    train_dataset: SentenceDataset,
    valid_dataset: SentenceDataset,
    test_dataset:  SentenceDataset,
    ckpt_manager:  &CheckpointManager,
    logger:        &MetricsLogger,
    device:        TrainDevice,
) -> Result<TrainOutcome> {
    tracing::info!(
        "Model ready: {} parameters, {} train / {} valid / {} test samples",
        model.num_params(),
        train_dataset.sample_count(),
        valid_dataset.sample_count(),
        test_dataset.sample_count(),
    );
    logger.log_model_graph(&format!("{model}"))?;

    // ── AdamW optimiser ───────────────────────────────────────────────────────
    // Decoupled weight decay — the decay is applied to the
    // weights directly, not mixed into the gradient moments.
    let optim_cfg = AdamWConfig::new()
        .with_epsilon(1e-8)
        .with_weight_decay(cfg.weight_decay as f32);
    let mut optim = optim_cfg.init();

    // ── Warmup + cosine schedule ──────────────────────────────────────────────
    // Warmup spans exactly the first epoch's steps; the cosine
    // decay covers every remaining step down to 0.
    let steps_per_epoch = train_dataset.sample_count().div_ceil(cfg.batch_size);
    let total_steps     = cfg.epochs * steps_per_epoch;
    let mut schedule    = WarmupCosineSchedule::new(cfg.lr, steps_per_epoch, total_steps);

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let train_batcher = SentenceBatcher::<TrainBackend>::new(device);
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    // ── Validation / test loaders (EvalBackend — no autodiff overhead) ────────
    let valid_batcher = SentenceBatcher::<EvalBackend>::new(device);
    let valid_loader  = DataLoaderBuilder::new(valid_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(valid_dataset);

    let test_batcher = SentenceBatcher::<EvalBackend>::new(device);
    let test_loader  = DataLoaderBuilder::new(test_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(test_dataset);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    let mut best_acc      = 0.0f64;
    let mut epoch_rows    = Vec::with_capacity(cfg.epochs);
    let mut global_step   = 0usize;

    for epoch in 1..=cfg.epochs {
        let start_time = Instant::now();
        println!("***** Running training epoch {epoch} *****");

        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut train_acc_sum  = 0.0f64;
        let mut batch_index    = 0usize;

        for batch in train_loader.iter() {
            batch_index += 1;
            global_step += 1;

            let (loss, logits) = model.forward_loss(
                batch.input_ids,
                batch.attention_mask,
                batch.token_type_ids,
                batch.labels.clone(),
            );

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            train_loss_sum += loss_val;
            train_acc_sum  += batch_accuracy(logits.detach(), batch.labels);

            // Backward pass + AdamW update at the schedule's
            // current rate, then advance the schedule one step.
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(schedule.lr(), model, grads);
            schedule.step();

            // ── Per-step bookkeeping ──────────────────────────────────────────
            // Running means so far this epoch; the logged rate
            // reflects the schedule update already applied.
            let loss_mean = train_loss_sum / batch_index as f64;
            let acc_mean  = train_acc_sum / batch_index as f64;
            let elapsed   = start_time.elapsed().as_secs_f64();
            let step_time = elapsed / batch_index as f64;
            let remaining = step_time * (steps_per_epoch - batch_index) as f64;

            print!(
                "\rEpoch {:04} | Step {:04}/{:04} | Elapsed {:.1}s | Remaining {:.1}s | Step Time {:.1}s | Loss {:.4} | Batch Accuracy {:.4} | LR {:e}",
                epoch, batch_index, steps_per_epoch,
                elapsed, remaining, step_time,
                loss_mean, acc_mean, schedule.lr(),
            );
            std::io::stdout().flush().ok();

            logger.log_step(global_step, loss_mean, acc_mean, schedule.lr())?;
        }
        println!();

        let avg_train_loss = if batch_index > 0 {
            train_loss_sum / batch_index as f64
        } else { f64::NAN };
        let avg_train_acc = if batch_index > 0 {
            train_acc_sum / batch_index as f64
        } else { 0.0 };

        // ── Validation phase ──────────────────────────────────────────────────
        // model.valid() → SentenceClassifier<EvalBackend>,
        // dropout disabled for deterministic evaluation
        let model_valid = model.valid();
        let (y_true, y_pred) = evaluate_split(&model_valid, valid_loader.as_ref());
        let val_acc = accuracy(&y_true, &y_pred);

        // ── Checkpoint policy ─────────────────────────────────────────────────
        // "best" only on a STRICT improvement; "most recent"
        // unconditionally, every epoch.
        let metrics = EpochMetrics::new(epoch, avg_train_loss, avg_train_acc, val_acc);
        if metrics.is_improvement(best_acc) {
            best_acc = val_acc;
            ckpt_manager.save_best(&model)?;
            tracing::info!("New best checkpoint at epoch {} (val_acc={:.4})", epoch, val_acc);
        }
        ckpt_manager.save_most_recent(&model)?;
        logger.log_epoch(&metrics)?;
        epoch_rows.push(metrics);

        println!("current val_acc is {val_acc:.4}, best val_acc is {best_acc:.4}");
        println!("Train and Valid Time {:.1}s\n", start_time.elapsed().as_secs_f64());
    }

    // ── Test phase ────────────────────────────────────────────────────────────
    // Explicit transition: reload the BEST checkpoint (the last
    // epoch may have regressed), then one pass over the test set.
    tracing::info!("Training complete — loading best checkpoint for test evaluation");
    let model_test = ckpt_manager.load_best(model.valid(), &device)?;
    let (y_true, y_pred) = evaluate_split(&model_test, test_loader.as_ref());
    let test_acc = accuracy(&y_true, &y_pred);
    let report   = classification_report(&y_true, &y_pred);

    println!("\nTest Accuracy = {test_acc:.4}\n");
    println!("{report}");

    Ok(TrainOutcome {
        epochs: epoch_rows,
        best_val_acc: best_acc,
        test_acc,
        report,
    })
}

/// One pass over a split with no gradient computation,
/// collecting ground-truth and predicted labels.
fn evaluate_split(
    model:  &SentenceClassifier<EvalBackend>,
    loader: &dyn burn::data::dataloader::DataLoader<EvalBackend, crate::data::batcher::SentenceBatch<EvalBackend>>,
) -> (Vec<usize>, Vec<usize>) {
    let mut y_true = Vec::new();
    let mut y_pred = Vec::new();

    for batch in loader.iter() {
        let logits = model.forward(
            batch.input_ids,
            batch.attention_mask,
            batch.token_type_ids,
        );
        y_true.extend(int_tensor_to_labels(batch.labels));
        y_pred.extend(predicted_labels(logits));
    }

    (y_true, y_pred)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::SentenceSample;
    use crate::ml::model::SentenceClassifierConfig;

    const SEQ_LEN: usize = 6;
    const SEED: u64 = 42;

    fn tiny_config() -> SentenceClassifierConfig {
        // vocab, max_seq, type_vocab, hidden, heads, layers, ff, dropout, classes
        SentenceClassifierConfig::new(16, SEQ_LEN, 2, 8, 2, 1, 16, 0.0, 2)
    }

    fn train_config(ckpt_dir: &str) -> TrainConfig {
        TrainConfig {
            checkpoint_dir: ckpt_dir.to_string(),
            epochs:     2,
            batch_size: 4,
            lr:         1e-3,
            seed:       SEED,
            ..TrainConfig::default()
        }
    }

    /// A trivially separable synthetic dataset: class 0 draws
    /// tokens from one range of the vocabulary, class 1 from
    /// another. Deterministic given the rng seed.
    fn synthetic_split(count: usize, rng_seed: u64) -> SentenceDataset {
        use rand::{rngs::StdRng, Rng, SeedableRng};
        let mut rng = StdRng::seed_from_u64(rng_seed);

        let samples: Vec<SentenceSample> = (0..count)
            .map(|i| {
                let label = i % 2;
                let lo = if label == 0 { 2u32 } else { 8u32 };
                let ids: Vec<u32> = (0..SEQ_LEN as u32)
                    .map(|_| lo + rng.gen_range(0..4))
                    .collect();
                SentenceSample {
                    input_ids:      ids,
                    attention_mask: vec![1; SEQ_LEN],
                    token_type_ids: vec![0; SEQ_LEN],
                    label,
                }
            })
            .collect();

        SentenceDataset::new(samples)
    }

    fn run_once(ckpt_dir: &std::path::Path, log_dir: &std::path::Path) -> TrainOutcome {
        let cfg    = train_config(ckpt_dir.to_str().unwrap());
        let device = TrainDevice::default();

        // Seed BEFORE model init so both weights and dropout
        // draws are reproducible.
        TrainBackend::seed(&device, cfg.seed);
        let model: SentenceClassifier<TrainBackend> = tiny_config().init(&device);

        let ckpt   = CheckpointManager::new(ckpt_dir.to_str().unwrap());
        let logger = MetricsLogger::new(log_dir.to_str().unwrap()).unwrap();

        run_training(
            &cfg,
            model,
            synthetic_split(16, 7),
            synthetic_split(8, 8),
            synthetic_split(8, 9),
            &ckpt,
            &logger,
            device,
        )
        .unwrap()
    }

    #[test]
    fn test_two_epoch_run_checkpoints_and_reports() {
        let ckpt_dir = tempfile::tempdir().unwrap();
        let log_dir  = tempfile::tempdir().unwrap();
        let outcome  = run_once(ckpt_dir.path(), log_dir.path());

        assert_eq!(outcome.epochs.len(), 2);

        // Most-recent slot written every epoch, best slot written
        // at least once (validation accuracy starts above 0).
        let ckpt = CheckpointManager::new(ckpt_dir.path().to_str().unwrap());
        assert!(ckpt.most_recent_exists());
        assert!(ckpt.best_exists());

        // Best accuracy is the max over epochs by construction.
        let max_val = outcome
            .epochs
            .iter()
            .map(|m| m.val_acc)
            .fold(f64::MIN, f64::max);
        assert_eq!(outcome.best_val_acc, max_val);

        assert!(outcome.report.contains("precision"));
        assert!((0.0..=1.0).contains(&outcome.test_acc));

        // Telemetry: 2 epochs x 4 steps + header rows.
        let steps = std::fs::read_to_string(log_dir.path().join("step_metrics.csv")).unwrap();
        assert_eq!(steps.lines().count(), 1 + 8);
        let epochs = std::fs::read_to_string(log_dir.path().join("epoch_metrics.csv")).unwrap();
        assert_eq!(epochs.lines().count(), 1 + 2);
    }

    #[test]
    fn test_fixed_seed_run_is_deterministic() {
        let a = {
            let ckpt = tempfile::tempdir().unwrap();
            let logs = tempfile::tempdir().unwrap();
            run_once(ckpt.path(), logs.path())
        };
        let b = {
            let ckpt = tempfile::tempdir().unwrap();
            let logs = tempfile::tempdir().unwrap();
            run_once(ckpt.path(), logs.path())
        };

        assert_eq!(a.epochs.len(), b.epochs.len());
        for (ma, mb) in a.epochs.iter().zip(b.epochs.iter()) {
            assert!((ma.train_loss - mb.train_loss).abs() < 1e-9);
            assert!((ma.train_acc - mb.train_acc).abs() < 1e-9);
            assert!((ma.val_acc - mb.val_acc).abs() < 1e-9);
        }
        assert!((a.test_acc - b.test_acc).abs() < 1e-9);
    }

    #[test]
    fn test_best_checkpoint_accuracy_is_non_decreasing() {
        let ckpt_dir = tempfile::tempdir().unwrap();
        let log_dir  = tempfile::tempdir().unwrap();
        let outcome  = run_once(ckpt_dir.path(), log_dir.path());

        // Replay the checkpoint policy over the recorded epochs:
        // the best value never decreases.
        let mut best      = 0.0f64;
        let mut prev_best = 0.0f64;
        for m in &outcome.epochs {
            if m.is_improvement(best) {
                best = m.val_acc;
            }
            assert!(best >= prev_best);
            prev_best = best;
        }
        assert_eq!(best, outcome.best_val_acc);
    }
}
