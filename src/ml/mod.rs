// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// No other layer imports from burn directly — only this one
// and the data batcher.
//
// What's in this layer:
//
//   model.rs    — The transformer encoder + classification head
//                 Token / position / segment embeddings,
//                 multi-head self-attention blocks (GELU FFN),
//                 a tanh pooler over the [CLS] position, and
//                 a dropout + linear projection to class logits
//
//   schedule.rs — Warmup + cosine learning-rate schedule
//                 Linear ramp from 0 to the peak rate over the
//                 first epoch's steps, then cosine decay to 0
//
//   trainer.rs  — The training loop
//                 Forward, cross-entropy, backward, AdamW step,
//                 schedule step, per-epoch validation, best/
//                 most-recent checkpoints, final test pass
//
//   evaluate.rs — Accuracy and the classification report
//                 (per-class precision / recall / F1 / support)
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Vaswani et al. (2017) Attention Is All You Need
//            Devlin et al. (2019) BERT

/// Transformer encoder + sentence classification head
pub mod model;

/// Warmup + cosine learning-rate schedule
pub mod schedule;

/// Full training loop with validation, checkpointing, and test
pub mod trainer;

/// Accuracy metrics and classification report
pub mod evaluate;
