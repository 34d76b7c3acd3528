// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Supplies the tokenizer collaborator:
//
//   - a HuggingFace `tokenizer.json` (e.g. bert-base-uncased)
//     when a path is configured, or
//   - a word-level tokenizer built from the training sentences.
//
// The built tokenizer is assembled as tokenizer JSON and parsed
// back, which avoids the trainer/ModelWrapper type mismatch of
// `train_from_files` in tokenizers 0.15.
//
// Special ids follow the BERT convention:
//   [PAD]=0  [UNK]=1  [CLS]=101  [SEP]=102  [MASK]=103
//
// Reference: Sennrich et al. (2016) BPE paper

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use tokenizers::pre_tokenizers::whitespace::Whitespace;
use tokenizers::{OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer, Tokenizer};

const FIRST_WORD_ID: usize = 104;

pub struct TokenizerStore {
    path: Option<PathBuf>,
}

impl TokenizerStore {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Load the configured tokenizer, or build one from `texts`.
    pub fn load_or_build(&self, texts: &[String], vocab_size: usize) -> Result<Tokenizer> {
        match &self.path {
            Some(path) => {
                tracing::info!("Loading tokenizer from '{}'", path.display());
                Tokenizer::from_file(path).map_err(|e| {
                    anyhow::anyhow!("Cannot load tokenizer from '{}': {}", path.display(), e)
                })
            }
            None => {
                tracing::info!("Building word-level tokenizer (vocab_size={})", vocab_size);
                word_level_tokenizer(texts, vocab_size)
            }
        }
    }
}

/// Build a word-level tokenizer whose ids all stay below `vocab_size`.
pub fn word_level_tokenizer(texts: &[String], vocab_size: usize) -> Result<Tokenizer> {
    if vocab_size <= FIRST_WORD_ID {
        bail!("vocab_size must exceed {FIRST_WORD_ID} to fit the special tokens, got {vocab_size}");
    }

    // ── Step 1: Word frequencies ──────────────────────────────────────────────
    // Counted over the same `\w+|[^\w\s]+` pieces the tokenizer's
    // pre-tokenizer produces, so every counted piece is encodable.
    let mut freq: HashMap<String, usize> = HashMap::new();
    for text in texts {
        for piece in pre_tokenize(&text.to_lowercase())? {
            *freq.entry(piece).or_insert(0) += 1;
        }
    }

    // Most frequent first; ties broken alphabetically so the vocabulary
    // is the same for the same corpus.
    let mut words: Vec<(String, usize)> = freq.into_iter().collect();
    words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    words.truncate(vocab_size - FIRST_WORD_ID);

    // ── Step 2: Vocabulary ────────────────────────────────────────────────────
    let mut vocab = serde_json::json!({
        "[PAD]":  0,
        "[UNK]":  1,
        "[CLS]":  101,
        "[SEP]":  102,
        "[MASK]": 103,
    });
    let mut next_id = FIRST_WORD_ID;
    for (word, _) in &words {
        if vocab.get(word).is_none() {
            vocab[word] = serde_json::json!(next_id);
            next_id += 1;
        }
    }

    // ── Step 3: Tokenizer JSON in HuggingFace format ──────────────────────────
    let tokenizer_json = serde_json::json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [
            {"id": 0,   "content": "[PAD]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
            {"id": 1,   "content": "[UNK]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
            {"id": 101, "content": "[CLS]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
            {"id": 102, "content": "[SEP]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
            {"id": 103, "content": "[MASK]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true}
        ],
        "normalizer": {
            "type": "BertNormalizer",
            "clean_text": true,
            "handle_chinese_chars": true,
            "strip_accents": null,
            "lowercase": true
        },
        "pre_tokenizer": {
            "type": "Whitespace"
        },
        "post_processor": null,
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": vocab,
            "unk_token": "[UNK]"
        }
    });

    let json = serde_json::to_string(&tokenizer_json)
        .context("Cannot serialise tokenizer JSON")?;
    let tokenizer = Tokenizer::from_str(&json)
        .map_err(|e| anyhow::anyhow!("Cannot build tokenizer: {e}"))?;

    tracing::info!("Tokenizer built with {} words", next_id - FIRST_WORD_ID);
    Ok(tokenizer)
}

/// Split `text` the way the `Whitespace` pre-tokenizer does.
fn pre_tokenize(text: &str) -> Result<Vec<String>> {
    let mut pretokenized = PreTokenizedString::from(text);
    Whitespace::default()
        .pre_tokenize(&mut pretokenized)
        .map_err(|e| anyhow::anyhow!("Cannot pre-tokenize '{text}': {e}"))?;
    Ok(pretokenized
        .get_splits(OffsetReferential::Original, OffsetType::Byte)
        .into_iter()
        .map(|(piece, _, _)| piece.to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_stay_below_vocab_size() {
        let texts: Vec<String> = (0..500).map(|i| format!("word{i}")).collect();
        let tok = word_level_tokenizer(&texts, 150).unwrap();
        let max_id = tok.get_vocab(true).values().copied().max().unwrap();
        assert!(max_id < 150, "max id {max_id}");
    }

    #[test]
    fn test_known_and_unknown_words() {
        let tok = word_level_tokenizer(&["Great movie!".to_string()], 200).unwrap();
        let enc = tok.encode("great unseen", false).unwrap();
        assert_eq!(enc.get_ids().len(), 2);
        assert!(enc.get_ids()[0] >= FIRST_WORD_ID as u32);
        assert_eq!(enc.get_ids()[1], 1);
    }

    #[test]
    fn test_pre_tokenize_splits_words_and_punctuation() {
        assert_eq!(pre_tokenize("don't stop!").unwrap(), vec!["don", "'", "t", "stop", "!"]);
    }

    #[test]
    fn test_contractions_encode_without_unknowns() {
        let tok = word_level_tokenizer(&["I don't like it".to_string()], 200).unwrap();
        let enc = tok.encode("don't", false).unwrap();
        assert_eq!(enc.get_ids().len(), 3);
        assert!(enc.get_ids().iter().all(|&id| id >= FIRST_WORD_ID as u32), "{:?}", enc.get_ids());
    }

    #[test]
    fn test_vocab_too_small_errors() {
        assert!(word_level_tokenizer(&["a".to_string()], 50).is_err());
    }

    #[test]
    fn test_missing_tokenizer_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenizerStore::new(Some(dir.path().join("tokenizer.json")));
        assert!(store.load_or_build(&[], 1000).is_err());
    }
}
