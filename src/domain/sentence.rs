// ============================================================
// Layer 3 — LabeledSentence Domain Type
// ============================================================
// Represents a single supervised classification example:
// a sentence of raw text and the integer class it belongs to.
//
// Labels are plain integers (0, 1, ... classes-1), matching
// the integer targets that cross-entropy loss expects.
//
// Reference: Rust Book §5 (Structs)

use serde::{Deserialize, Serialize};

/// One labelled sentence as it appears in a dataset JSON file.
///
/// The label is an index into the class set, NOT a class name —
/// mapping names to indices is the dataset author's job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledSentence {
    /// The raw sentence text, before tokenisation
    #[serde(alias = "sentence")]
    pub text: String,

    /// The ground-truth class index in [0, classes)
    pub label: usize,
}

impl LabeledSentence {
    /// Create a new LabeledSentence.
    /// Uses impl Into<String> so callers can pass &str or String.
    pub fn new(text: impl Into<String>, label: usize) -> Self {
        Self { text: text.into(), label }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_text_key() {
        let s: LabeledSentence =
            serde_json::from_str(r#"{"text": "good movie", "label": 1}"#).unwrap();
        assert_eq!(s.text, "good movie");
        assert_eq!(s.label, 1);
    }

    #[test]
    fn test_deserialize_with_sentence_alias() {
        let s: LabeledSentence =
            serde_json::from_str(r#"{"sentence": "bad movie", "label": 0}"#).unwrap();
        assert_eq!(s.text, "bad movie");
        assert_eq!(s.label, 0);
    }
}
