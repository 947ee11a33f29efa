// ============================================================
// Layer 4 — Sentence Encoder
// ============================================================
// Converts raw labelled sentences into fixed-length token
// sequences ready for batching.
//
// Sequence format (standard BERT single-sentence input):
//   [CLS] sentence tokens [SEP] [PAD] [PAD] ...
//
// All sequences are padded to exactly max_seq_len so the
// batcher can stack them without dynamic padding. Sentences
// longer than max_seq_len - 2 are truncated (the [SEP] is
// always kept as the last real token).
//
// token_type_ids are all zero: this is single-sentence
// classification, there is no second segment.
//
// Reference: Devlin et al. (2019) BERT, §4.1

use anyhow::Result;
use tokenizers::Tokenizer;

use crate::data::dataset::SentenceSample;
use crate::domain::sentence::LabeledSentence;

// BERT-convention fallback IDs, used only when the tokenizer
// JSON does not declare the special tokens itself.
const DEFAULT_CLS_ID: u32 = 101;
const DEFAULT_SEP_ID: u32 = 102;
const PAD_ID: u32 = 0;

/// Tokenises sentences with the pretrained model's vocabulary
/// and pads them to a fixed length.
pub struct SentenceEncoder {
    tokenizer:   Tokenizer,
    max_seq_len: usize,
    cls_id:      u32,
    sep_id:      u32,
}

impl SentenceEncoder {
    pub fn new(tokenizer: Tokenizer, max_seq_len: usize) -> Self {
        let cls_id = tokenizer.token_to_id("[CLS]").unwrap_or(DEFAULT_CLS_ID);
        let sep_id = tokenizer.token_to_id("[SEP]").unwrap_or(DEFAULT_SEP_ID);
        Self { tokenizer, max_seq_len, cls_id, sep_id }
    }

    /// Encode one sentence into a padded SentenceSample.
    pub fn encode(&self, sentence: &LabeledSentence) -> Result<SentenceSample> {
        let enc = self
            .tokenizer
            .encode(sentence.text.as_str(), false)
            .map_err(|e| anyhow::anyhow!("Tokenisation error: {e}"))?;

        // [CLS] tokens [SEP], truncated so [SEP] always fits
        let body_budget = self.max_seq_len.saturating_sub(2);
        let mut input_ids = vec![self.cls_id];
        input_ids.extend(enc.get_ids().iter().take(body_budget));
        input_ids.push(self.sep_id);

        // 1 for real tokens, 0 for padding
        let real_len = input_ids.len();
        let mut attention_mask = vec![1u32; real_len];

        while input_ids.len() < self.max_seq_len {
            input_ids.push(PAD_ID);
            attention_mask.push(0);
        }

        let token_type_ids = vec![0u32; self.max_seq_len];

        Ok(SentenceSample {
            input_ids,
            attention_mask,
            token_type_ids,
            label: sentence.label,
        })
    }

    /// Encode a whole split.
    pub fn encode_all(&self, sentences: &[LabeledSentence]) -> Result<Vec<SentenceSample>> {
        sentences.iter().map(|s| self.encode(s)).collect()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    /// A minimal word-level tokenizer, built the same way the
    /// pretrained bundle's tokenizer.json is structured.
    fn tiny_tokenizer() -> Tokenizer {
        let json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [
                {"id": 0,   "content": "[PAD]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": 1,   "content": "[UNK]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": 101, "content": "[CLS]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": 102, "content": "[SEP]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true}
            ],
            "normalizer": null,
            "pre_tokenizer": { "type": "Whitespace" },
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": {
                    "[PAD]": 0, "[UNK]": 1, "[CLS]": 101, "[SEP]": 102,
                    "good": 5, "bad": 6, "movie": 7
                },
                "unk_token": "[UNK]"
            }
        });
        Tokenizer::from_bytes(serde_json::to_vec(&json).unwrap()).unwrap()
    }

    #[test]
    fn test_encode_pads_to_max_len() {
        let encoder = SentenceEncoder::new(tiny_tokenizer(), 8);
        let sample  = encoder.encode(&LabeledSentence::new("good movie", 1)).unwrap();

        assert_eq!(sample.input_ids.len(), 8);
        assert_eq!(sample.attention_mask.len(), 8);
        assert_eq!(sample.token_type_ids.len(), 8);
        // [CLS] good movie [SEP] [PAD] x4
        assert_eq!(sample.input_ids[0], 101);
        assert_eq!(sample.input_ids[1], 5);
        assert_eq!(sample.input_ids[2], 7);
        assert_eq!(sample.input_ids[3], 102);
        assert_eq!(sample.input_ids[4], 0);
        assert_eq!(sample.attention_mask, vec![1, 1, 1, 1, 0, 0, 0, 0]);
        assert_eq!(sample.label, 1);
    }

    #[test]
    fn test_encode_truncates_long_sentence() {
        let encoder = SentenceEncoder::new(tiny_tokenizer(), 4);
        let sample  = encoder
            .encode(&LabeledSentence::new("good bad movie good bad movie", 0))
            .unwrap();

        assert_eq!(sample.input_ids.len(), 4);
        assert_eq!(sample.input_ids[0], 101);
        // [SEP] survives truncation as the last real token
        assert_eq!(sample.input_ids[3], 102);
        assert_eq!(sample.attention_mask, vec![1, 1, 1, 1]);
    }

    #[test]
    fn test_token_type_ids_all_zero() {
        let encoder = SentenceEncoder::new(tiny_tokenizer(), 6);
        let sample  = encoder.encode(&LabeledSentence::new("bad", 0)).unwrap();
        assert!(sample.token_type_ids.iter().all(|&t| t == 0));
    }
}
