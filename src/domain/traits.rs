// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer depends on these traits rather than on
// concrete loaders, so a different corpus source (a directory
// of files, an in-memory fixture in tests) drops in unchanged.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

// ─── Corpus ───────────────────────────────────────────────────────────────────
/// Raw lines from the two label-partitioned sources.
/// Lines keep their original whitespace (including terminators).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    pub negative: Vec<String>,
    pub positive: Vec<String>,
}

impl Corpus {
    pub fn total_lines(&self) -> usize {
        self.negative.len() + self.positive.len()
    }
}

// ─── CorpusSource ─────────────────────────────────────────────────────────────
/// Any component that can produce the two-source corpus.
///
/// Implementations:
///   - TextFileLoader → reads `negative.txt` / `positive.txt` from disk
pub trait CorpusSource {
    /// Load both sources. Fails if either source cannot be read.
    fn load(&self) -> Result<Corpus>;
}
