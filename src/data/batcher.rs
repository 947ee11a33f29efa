// ============================================================
// Layer 4 — Sentence Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec of
// SentenceSamples into tensor batches.
//
// Input:  Vec of N samples, each padded to seq_len S
// Output: SentenceBatch with [N, S] tensors plus [N] labels
//
// All sequences are already padded to the same length by
// SentenceEncoder, so stacking is a flatten + reshape with
// no dynamic padding.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::SentenceSample;

// ─── SentenceBatch ────────────────────────────────────────────────────────────
/// A batch of classification samples ready for the forward pass.
/// All tensors have batch_size as their first dimension.
///
/// B is the Burn Backend — generic so the same batcher serves
/// the autodiff training backend and the plain eval backend.
#[derive(Debug, Clone)]
pub struct SentenceBatch<B: Backend> {
    /// Token ID sequences — shape: [batch_size, seq_len]
    pub input_ids: Tensor<B, 2, Int>,

    /// Attention masks — shape: [batch_size, seq_len]
    /// 1 = real token, 0 = padding
    pub attention_mask: Tensor<B, 2, Int>,

    /// Segment IDs — shape: [batch_size, seq_len]
    /// All zero for single-sentence classification
    pub token_type_ids: Tensor<B, 2, Int>,

    /// Ground truth class indices — shape: [batch_size]
    pub labels: Tensor<B, 1, Int>,
}

// ─── SentenceBatcher ──────────────────────────────────────────────────────────
/// Holds the target device so tensors are created where the
/// model lives.
#[derive(Clone, Debug)]
pub struct SentenceBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> SentenceBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    fn stack_2d(&self, items: &[SentenceSample], field: fn(&SentenceSample) -> &[u32]) -> Tensor<B, 2, Int> {
        let batch_size = items.len();
        let seq_len    = items[0].seq_len();

        let flat: Vec<i32> = items
            .iter()
            .flat_map(|s| field(s).iter().map(|&x| x as i32))
            .collect();

        Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .reshape([batch_size, seq_len])
    }
}

// The DataLoader calls .batch(items) with each mini-batch of samples.
impl<B: Backend> Batcher<B, SentenceSample, SentenceBatch<B>> for SentenceBatcher<B> {
    fn batch(&self, items: Vec<SentenceSample>, _device: &B::Device) -> SentenceBatch<B> {
        let input_ids      = self.stack_2d(&items, |s| &s.input_ids);
        let attention_mask = self.stack_2d(&items, |s| &s.attention_mask);
        let token_type_ids = self.stack_2d(&items, |s| &s.token_type_ids);

        let label_vec: Vec<i32> = items.iter().map(|s| s.label as i32).collect();
        let labels = Tensor::<B, 1, Int>::from_ints(label_vec.as_slice(), &self.device);

        SentenceBatch { input_ids, attention_mask, token_type_ids, labels }
    }
}
