// ============================================================
// Layer 5 — Predictor
// ============================================================
// No-gradient inference over raw sentences.
//
// The predictor is built on the INNER backend (a model obtained
// through `model.valid()`), so no autodiff graph is recorded and
// dropout is disabled.
//
//   encode(sentences)  → normalised shared embedding per sentence
//   predict(sentences) → (arg-max class, sentiment scalar) per sentence
//
// Sentences are processed in chunks of `batch_size`; the encoder
// masks padding, so chunking does not change any result.

use anyhow::Result;
use burn::prelude::*;
use burn::tensor::activation::softmax;

use crate::data::batcher::token_tensors;
use crate::data::tokenize::BatchTokenizer;
use crate::ml::model::MultiTaskModel;

/// Model output for one sentence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label:     usize,
    pub sentiment: f32,
}

pub struct Predictor<'a, B: Backend> {
    model:      &'a MultiTaskModel<B>,
    tokenizer:  &'a BatchTokenizer,
    device:     B::Device,
    batch_size: usize,
}

impl<'a, B: Backend> Predictor<'a, B> {
    pub fn new(
        model:      &'a MultiTaskModel<B>,
        tokenizer:  &'a BatchTokenizer,
        device:     B::Device,
        batch_size: usize,
    ) -> Self {
        Self { model, tokenizer, device, batch_size: batch_size.max(1) }
    }

    /// Normalised shared embeddings, one row per sentence.
    pub fn encode<S: AsRef<str>>(&self, sentences: &[S]) -> Result<Vec<Vec<f32>>> {
        let mut rows = Vec::with_capacity(sentences.len());
        for chunk in sentences.chunks(self.batch_size) {
            let (ids, mask) = self.tensors(chunk)?;
            let emb = self.model.shared_embedding(ids, mask);
            let [n, dim] = emb.dims();
            let flat = to_f32_vec(emb.reshape([n * dim]))?;
            rows.extend(flat.chunks(dim).map(<[f32]>::to_vec));
        }
        Ok(rows)
    }

    /// Predicted class index and sentiment score per sentence.
    pub fn predict<S: AsRef<str>>(&self, sentences: &[S]) -> Result<Vec<Prediction>> {
        let mut predictions = Vec::with_capacity(sentences.len());
        for chunk in sentences.chunks(self.batch_size) {
            let (ids, mask) = self.tensors(chunk)?;
            let output = self.model.forward(ids, mask);

            let probs  = softmax(output.logits, 1);
            let labels = probs.argmax(1).squeeze::<1>(1).into_data().convert::<i64>();
            let labels = labels
                .to_vec::<i64>()
                .map_err(|e| anyhow::anyhow!("Cannot read predicted labels: {e:?}"))?;
            let scores = to_f32_vec(output.sentiment)?;

            predictions.extend(labels.into_iter().zip(scores).map(|(label, sentiment)| Prediction {
                label: label as usize,
                sentiment,
            }));
        }
        Ok(predictions)
    }

    fn tensors<S: AsRef<str>>(&self, sentences: &[S]) -> Result<(Tensor<B, 2, Int>, Tensor<B, 2, Int>)> {
        let batch = self.tokenizer.encode_batch(sentences)?;
        Ok(token_tensors::<B>(&batch, &self.device))
    }
}

fn to_f32_vec<B: Backend>(t: Tensor<B, 1>) -> Result<Vec<f32>> {
    t.into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| anyhow::anyhow!("Cannot read tensor data: {e:?}"))
}
