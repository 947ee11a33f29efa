// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that don't belong in any specific
// business layer:
//
//   pretrained.rs — Pretrained bundle loading
//                   Reads the bundle's config.json, its
//                   tokenizer.json, and (when present) the
//                   serialised encoder weights, so fine-tuning
//                   starts from pretrained parameters.
//
//   checkpoint.rs — Saving and loading model weights
//                   Two rotating slots: "best" (only written
//                   on a strict validation improvement) and
//                   "most recent" (written every epoch).
//                   Uses Burn's CompactRecorder.
//
//   metrics.rs    — Scalar telemetry
//                   Appends per-step and per-epoch scalars to
//                   CSV files in the run directory, plus a
//                   one-time model-graph dump. Write-only: the
//                   training loop never reads these back.
//
// Reference: Burn Book §5 (Records and Checkpointing)

/// Pretrained encoder bundle (config, tokenizer, weights)
pub mod pretrained;

/// Best / most-recent model checkpoint slots
pub mod checkpoint;

/// CSV scalar telemetry and model graph dump
pub mod metrics;
