// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from the two raw text files to tensor batches.
//
//   negative.txt / positive.txt
//       │
//       ▼
//   TextFileLoader    → raw lines per source
//       │
//       ▼
//   labeler           → interleave, label by source, shuffle
//       │
//       ▼
//   splitter          → seeded 80/20 train/test split
//       │
//       ▼
//   BatchTokenizer    → [CLS] ids [SEP] + padding + attention mask
//       │
//       ▼
//   SentenceDataset   → implements Burn's Dataset trait
//       │
//       ▼
//   SentenceBatcher   → stacks samples into tensor batches
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads the two label-partitioned text files
pub mod loader;

/// Interleaves both sources with labels and shuffles
pub mod labeler;

/// Seeded train/test split
pub mod splitter;

/// Sentence → padded token ids and attention mask
pub mod tokenize;

/// Implements Burn's Dataset trait for tokenised sentences
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
