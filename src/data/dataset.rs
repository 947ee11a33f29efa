use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One fully tokenised and padded classification sample.
/// Sequence format: [CLS] sentence [SEP] [PAD]...
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentenceSample {
    pub input_ids:      Vec<u32>,
    pub attention_mask: Vec<u32>,
    pub token_type_ids: Vec<u32>,
    pub label:          usize,
}

impl SentenceSample {
    pub fn seq_len(&self) -> usize {
        self.input_ids.len()
    }
}

pub struct SentenceDataset {
    samples: Vec<SentenceSample>,
}

impl SentenceDataset {
    pub fn new(samples: Vec<SentenceSample>) -> Self { Self { samples } }

    pub fn sample_count(&self) -> usize { self.samples.len() }
}

impl Dataset<SentenceSample> for SentenceDataset {
    fn get(&self, index: usize) -> Option<SentenceSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
