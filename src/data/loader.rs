// ============================================================
// Layer 4 — Dataset Loader
// ============================================================
// Reads one dataset split from a JSON file. Each file is a
// JSON array of {"text": ..., "label": ...} objects.
//
// There is no recovery here: a missing file or malformed
// record is a fatal error for the whole run, because training
// on a silently truncated dataset is worse than not training.
//
// Reference: Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::domain::sentence::LabeledSentence;
use crate::domain::traits::SampleSource;

/// Loads one split (train, valid, or test) from a JSON file.
pub struct JsonSentenceLoader {
    /// Full path to the split's JSON file
    path: PathBuf,
}

impl JsonSentenceLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SampleSource for JsonSentenceLoader {
    fn load_all(&self) -> Result<Vec<LabeledSentence>> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read dataset file '{}'", self.path.display()))?;

        let samples: Vec<LabeledSentence> = serde_json::from_str(&raw)
            .with_context(|| format!("Malformed dataset JSON in '{}'", self.path.display()))?;

        tracing::info!(
            "Loaded {} samples from '{}'",
            samples.len(),
            self.path.display()
        );
        Ok(samples)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_valid_file() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("train_data.json");
        let mut f = fs::File::create(&path).unwrap();
        write!(
            f,
            r#"[{{"text": "great film", "label": 1}}, {{"text": "waste of time", "label": 0}}]"#
        )
        .unwrap();

        let loader  = JsonSentenceLoader::new(&path);
        let samples = loader.load_all().unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].text, "great film");
        assert_eq!(samples[1].label, 0);
    }

    #[test]
    fn test_missing_file_is_error() {
        let loader = JsonSentenceLoader::new("no/such/file.json");
        assert!(loader.load_all().is_err());
    }

    #[test]
    fn test_malformed_json_is_error() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        let loader = JsonSentenceLoader::new(&path);
        assert!(loader.load_all().is_err());
    }
}
