// ============================================================
// Layer 4 — Sentence Batcher
// ============================================================
// Implements Burn's Batcher trait to turn a Vec<SentenceSample>
// into tensors for one forward pass.
//
//   Input:  N samples, each pre-padded to length S
//   Output: SentenceBatch with
//             input_ids, attention_mask  [N, S]  (Int)
//             labels                     [N]     (Int, class targets)
//             sentiment_targets          [N]     (Float, label as f32)
//
// The sentiment regression target is the class label cast to
// float; the multi-task loss uses the same ground truth for
// both heads.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
    tensor::TensorData,
};

use crate::data::dataset::SentenceSample;
use crate::data::tokenize::TokenBatch;

// ─── SentenceBatch ────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct SentenceBatch<B: Backend> {
    /// [batch_size, seq_len]
    pub input_ids: Tensor<B, 2, Int>,

    /// [batch_size, seq_len], 1 = real token, 0 = padding
    pub attention_mask: Tensor<B, 2, Int>,

    /// [batch_size] class index per sample
    pub labels: Tensor<B, 1, Int>,

    /// [batch_size] regression target per sample
    pub sentiment_targets: Tensor<B, 1>,
}

// ─── SentenceBatcher ──────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct SentenceBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> SentenceBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<SentenceSample, SentenceBatch<B>> for SentenceBatcher<B> {
    fn batch(&self, items: Vec<SentenceSample>) -> SentenceBatch<B> {
        let batch_size = items.len();
        // All samples of a split share one padded length
        let seq_len = items.first().map_or(0, |s| s.input_ids.len());

        let input_ids      = int_matrix::<B>(items.iter().map(|s| s.input_ids.as_slice()), batch_size, seq_len, &self.device);
        let attention_mask = int_matrix::<B>(items.iter().map(|s| s.attention_mask.as_slice()), batch_size, seq_len, &self.device);

        let labels: Vec<i64> = items.iter().map(|s| s.label as i64).collect();
        let targets: Vec<f32> = items.iter().map(|s| s.sentiment).collect();

        SentenceBatch {
            input_ids,
            attention_mask,
            labels: Tensor::from_data(TensorData::new(labels, [batch_size]), &self.device),
            sentiment_targets: Tensor::from_data(TensorData::new(targets, [batch_size]), &self.device),
        }
    }
}

/// Build (input_ids, attention_mask) tensors from an already padded token batch.
pub fn token_tensors<B: Backend>(
    batch:  &TokenBatch,
    device: &B::Device,
) -> (Tensor<B, 2, Int>, Tensor<B, 2, Int>) {
    let (n, s) = (batch.input_ids.len(), batch.seq_len());
    let ids  = int_matrix::<B>(batch.input_ids.iter().map(Vec::as_slice), n, s, device);
    let mask = int_matrix::<B>(batch.attention_mask.iter().map(Vec::as_slice), n, s, device);
    (ids, mask)
}

/// Flatten equal-length rows into one [rows, cols] Int tensor.
fn int_matrix<'a, B: Backend>(
    rows:   impl Iterator<Item = &'a [u32]>,
    n_rows: usize,
    n_cols: usize,
    device: &B::Device,
) -> Tensor<B, 2, Int> {
    let flat: Vec<i64> = rows.flat_map(|r| r.iter().map(|&x| x as i64)).collect();
    Tensor::from_data(TensorData::new(flat, [n_rows, n_cols]), device)
}
