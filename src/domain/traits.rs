// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams between layers. The application layer depends on
// these traits, never on concrete implementations, so the
// dataset format can be swapped without touching the workflow.
//
// Reference: Rust Book §10 (Traits)

use anyhow::Result;

use crate::domain::sentence::LabeledSentence;

/// Anything that can produce labelled sentences for one dataset
/// split (train, validation, or test).
///
/// Implemented by data::loader::JsonSentenceLoader.
pub trait SampleSource {
    /// Load every sample in this split, in file order.
    fn load_all(&self) -> Result<Vec<LabeledSentence>>;
}
