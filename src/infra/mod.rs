// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by the application layer:
//
//   tokenizer_store.rs — loads a HuggingFace tokenizer.json or
//                        builds a word-level one from the corpus
//
//   encoder_store.rs   — encoder architecture (burn Config JSON)
//                        and pretrained weights (full-precision .mpk.gz)
//
//   metrics.rs         — epoch / run metrics and the CSV logger
//
//   backend.rs         — training and inference backend types
//
// Reference: Rust Book §7 (Modules)

/// Tokenizer loading and building
pub mod tokenizer_store;

/// Pretrained encoder config and weights
pub mod encoder_store;

/// Training metrics and CSV logger
pub mod metrics;

/// Burn backend selection
pub mod backend;
