// ============================================================
// Layer 4 — Batch Tokenisation
// ============================================================
// Converts sentences into the padded (input_ids, attention_mask)
// pairs the encoder consumes.
//
// Sequence format (BERT convention):
//   [CLS] sentence tokens [SEP] [PAD] [PAD] ...
//
//   - truncated so [CLS] + tokens + [SEP] fits in max_seq_len
//   - padded with id 0 up to the LONGEST sequence in the set
//     being encoded (not up to max_seq_len)
//   - attention mask: 1 = real token, 0 = padding
//
// [CLS]/[SEP] ids are looked up in the tokenizer vocabulary and
// fall back to the BERT ids 101/102.
//
// Reference: HuggingFace tokenizers crate documentation

use anyhow::{bail, Result};
use tokenizers::Tokenizer;

const DEFAULT_CLS_ID: u32 = 101;
const DEFAULT_SEP_ID: u32 = 102;
const PAD_ID: u32 = 0;

/// Token ids and masks for a set of sentences, all the same length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBatch {
    pub input_ids:      Vec<Vec<u32>>,
    pub attention_mask: Vec<Vec<u32>>,
}

impl TokenBatch {
    /// Common padded length (0 for an empty batch).
    pub fn seq_len(&self) -> usize {
        self.input_ids.first().map_or(0, Vec::len)
    }
}

/// Wraps a `tokenizers::Tokenizer` with padding and truncation.
#[derive(Clone)]
pub struct BatchTokenizer {
    tokenizer:   Tokenizer,
    max_seq_len: usize,
    cls_id:      u32,
    sep_id:      u32,
}

impl BatchTokenizer {
    pub fn new(tokenizer: Tokenizer, max_seq_len: usize) -> Result<Self> {
        if max_seq_len < 2 {
            bail!("max_seq_len must leave room for [CLS] and [SEP], got {max_seq_len}");
        }
        let cls_id = tokenizer.token_to_id("[CLS]").unwrap_or(DEFAULT_CLS_ID);
        let sep_id = tokenizer.token_to_id("[SEP]").unwrap_or(DEFAULT_SEP_ID);
        Ok(Self { tokenizer, max_seq_len, cls_id, sep_id })
    }

    /// Largest token id this tokenizer can emit, special ids included.
    pub fn max_token_id(&self) -> u32 {
        self.tokenizer
            .get_vocab(true)
            .values()
            .copied()
            .chain([self.cls_id, self.sep_id, PAD_ID])
            .max()
            .unwrap_or(PAD_ID)
    }

    /// Tokenise one sentence to `[CLS] … [SEP]`, unpadded.
    pub fn encode_one(&self, sentence: &str) -> Result<Vec<u32>> {
        let enc = self
            .tokenizer
            .encode(sentence, false)
            .map_err(|e| anyhow::anyhow!("Tokenisation error: {e}"))?;

        let budget = self.max_seq_len - 2;
        let mut ids = Vec::with_capacity(budget.min(enc.get_ids().len()) + 2);
        ids.push(self.cls_id);
        ids.extend(enc.get_ids().iter().take(budget));
        ids.push(self.sep_id);
        Ok(ids)
    }

    /// Tokenise every sentence and pad to the longest one.
    pub fn encode_batch<S: AsRef<str>>(&self, sentences: &[S]) -> Result<TokenBatch> {
        let mut input_ids = sentences
            .iter()
            .map(|s| self.encode_one(s.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let longest = input_ids.iter().map(Vec::len).max().unwrap_or(0);
        let mut attention_mask = Vec::with_capacity(input_ids.len());

        for ids in &mut input_ids {
            let mut mask = vec![1u32; ids.len()];
            mask.resize(longest, 0);
            ids.resize(longest, PAD_ID);
            attention_mask.push(mask);
        }

        Ok(TokenBatch { input_ids, attention_mask })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::infra::tokenizer_store::word_level_tokenizer;

    pub(crate) fn test_tokenizer(max_seq_len: usize) -> BatchTokenizer {
        let corpus = vec![
            "bad movie".to_string(),
            "great movie".to_string(),
            "the worst film of the year".to_string(),
        ];
        let tok = word_level_tokenizer(&corpus, 200).unwrap();
        BatchTokenizer::new(tok, max_seq_len).unwrap()
    }

    #[test]
    fn test_wraps_with_cls_and_sep() {
        let bt = test_tokenizer(16);
        let ids = bt.encode_one("bad movie").unwrap();
        assert_eq!(ids.len(), 4);
        assert_eq!(ids[0], 101);
        assert_eq!(ids[3], 102);
    }

    #[test]
    fn test_pads_to_longest() {
        let bt = test_tokenizer(32);
        let batch = bt.encode_batch(&["bad movie", "the worst film of the year"]).unwrap();
        assert_eq!(batch.input_ids.len(), 2);
        assert_eq!(batch.seq_len(), 8);
        assert_eq!(batch.input_ids[0].len(), 8);
        assert_eq!(batch.attention_mask[0], vec![1, 1, 1, 1, 0, 0, 0, 0]);
        assert_eq!(batch.input_ids[0][4..], [0, 0, 0, 0]);
        assert!(batch.attention_mask[1].iter().all(|&m| m == 1));
    }

    #[test]
    fn test_truncates_to_max_seq_len() {
        let bt = test_tokenizer(4);
        let ids = bt.encode_one("the worst film of the year").unwrap();
        assert_eq!(ids.len(), 4);
        assert_eq!(*ids.last().unwrap(), 102);
    }

    #[test]
    fn test_unknown_words_still_encode() {
        let bt = test_tokenizer(16);
        let ids = bt.encode_one("zyzzyva").unwrap();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_empty_sentence_is_cls_sep() {
        let bt = test_tokenizer(16);
        assert_eq!(bt.encode_one("").unwrap(), vec![101, 102]);
    }

    #[test]
    fn test_rejects_tiny_max_len() {
        let tok = word_level_tokenizer(&["a".to_string()], 200).unwrap();
        assert!(BatchTokenizer::new(tok, 1).is_err());
    }
}
