use anyhow::Result;
use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::data::tokenize::BatchTokenizer;
use crate::domain::example::LabeledExample;

/// One tokenised, padded training sample.
/// Sequence format: [CLS] sentence [SEP] [PAD]...
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentenceSample {
    pub input_ids:      Vec<u32>,
    pub attention_mask: Vec<u32>,
    pub label:          u8,
    /// Regression target for the sentiment head
    pub sentiment:      f32,
}

pub struct SentenceDataset {
    samples: Vec<SentenceSample>,
}

impl SentenceDataset {
    pub fn new(samples: Vec<SentenceSample>) -> Self { Self { samples } }

    /// Tokenise a whole split at once, padding every sample to the
    /// longest sentence in the split.
    pub fn encode(examples: &[LabeledExample], tokenizer: &BatchTokenizer) -> Result<Self> {
        let texts: Vec<&str> = examples.iter().map(|e| e.text.as_str()).collect();
        let batch = tokenizer.encode_batch(&texts)?;

        let samples = batch
            .input_ids
            .into_iter()
            .zip(batch.attention_mask)
            .zip(examples)
            .map(|((input_ids, attention_mask), ex)| SentenceSample {
                input_ids,
                attention_mask,
                label:     ex.label,
                sentiment: ex.sentiment_target(),
            })
            .collect();

        Ok(Self::new(samples))
    }

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tokenize::tests::test_tokenizer;
    use crate::domain::example::Source;

    #[test]
    fn test_encode_keeps_labels_in_order() {
        let examples = vec![
            LabeledExample::from_line("bad movie", Source::Negative),
            LabeledExample::from_line("great movie", Source::Positive),
            LabeledExample::from_line("the worst film of the year", Source::Negative),
        ];
        let ds = SentenceDataset::encode(&examples, &test_tokenizer(32)).unwrap();
        assert_eq!(ds.len(), 3);
        let labels: Vec<u8> = (0..3).map(|i| ds.get(i).unwrap().label).collect();
        assert_eq!(labels, vec![1, 0, 1]);
        let targets: Vec<f32> = (0..3).map(|i| ds.get(i).unwrap().sentiment).collect();
        assert_eq!(targets, vec![1.0, 0.0, 1.0]);
        assert!((0..3).all(|i| ds.get(i).unwrap().input_ids.len() == 8));
        assert!(ds.get(3).is_none());
    }
}
