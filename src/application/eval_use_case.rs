// ============================================================
// Layer 2 — EvalUseCase
// ============================================================
// Standalone test-set evaluation of a previously trained run:
// rebuild the model architecture from the persisted config,
// restore the BEST checkpoint (never "most recent" — the last
// epoch may have regressed), and score the test split.
//
// Reference: Burn Book §5 (Records)

use anyhow::Result;

use crate::data::{
    dataset::SentenceDataset,
    encode::SentenceEncoder,
    loader::JsonSentenceLoader,
};
use crate::domain::traits::SampleSource;
use crate::infra::{checkpoint::CheckpointManager, pretrained::PretrainedBundle};
use crate::ml::evaluate::{accuracy, classification_report, int_tensor_to_labels, predicted_labels};
use crate::ml::model::SentenceClassifier;
use crate::ml::trainer::{EvalBackend, TrainDevice};

use burn::data::dataloader::DataLoaderBuilder;
use crate::data::batcher::SentenceBatcher;

/// The result of one standalone evaluation.
pub struct EvalOutcome {
    pub test_acc: f64,
    pub report:   String,
}

pub struct EvalUseCase {
    checkpoint_dir: String,
}

impl EvalUseCase {
    pub fn new(checkpoint_dir: impl Into<String>) -> Self {
        Self { checkpoint_dir: checkpoint_dir.into() }
    }

    pub fn execute(&self) -> Result<EvalOutcome> {
        // ── Rebuild the architecture from the saved run config ────────────────
        let ckpt_manager = CheckpointManager::new(&self.checkpoint_dir);
        let cfg = ckpt_manager.load_config()?;

        let bundle    = PretrainedBundle::new(&cfg.plm_dir);
        let plm_cfg   = bundle.load_config()?;
        let tokenizer = bundle.load_tokenizer()?;
        let model_cfg = plm_cfg.classifier_config(cfg.classes, cfg.max_seq_len);

        // ── Restore the best checkpoint ───────────────────────────────────────
        let device = TrainDevice::default();
        let model: SentenceClassifier<EvalBackend> = model_cfg.init(&device);
        let model = ckpt_manager.load_best(model, &device)?;
        tracing::info!("Best checkpoint loaded from '{}'", self.checkpoint_dir);

        // ── Score the test split ──────────────────────────────────────────────
        let test_path = std::path::Path::new(&cfg.data_dir).join("test_data.json");
        let test_raw  = JsonSentenceLoader::new(test_path).load_all()?;
        let encoder   = SentenceEncoder::new(tokenizer, model_cfg.max_seq_len);
        let test_dataset = SentenceDataset::new(encoder.encode_all(&test_raw)?);

        let test_loader = DataLoaderBuilder::new(SentenceBatcher::<EvalBackend>::new(device))
            .batch_size(cfg.batch_size)
            .num_workers(1)
            .build(test_dataset);

        let mut y_true = Vec::new();
        let mut y_pred = Vec::new();
        for batch in test_loader.iter() {
            let logits = model.forward(
                batch.input_ids,
                batch.attention_mask,
                batch.token_type_ids,
            );
            y_true.extend(int_tensor_to_labels(batch.labels));
            y_pred.extend(predicted_labels(logits));
        }

        Ok(EvalOutcome {
            test_acc: accuracy(&y_true, &y_pred),
            report:   classification_report(&y_true, &y_pred),
        })
    }
}
