// ============================================================
// Layer 4 — Corpus Loader
// ============================================================
// Reads the two label-partitioned text files into sequences of
// raw lines.
//
// Line handling:
//   - each line keeps its terminator and surrounding whitespace;
//     stripping happens later, when lines become examples
//   - "\r\n" and lone "\r" are read as "\n" (universal newlines)
//   - bytes that are not valid UTF-8 are dropped silently
//   - an empty file yields zero lines
//
// A missing or unreadable file is an error naming the path.
//
// Reference: Rust Book §9 (Error Handling)
//            std::primitive::slice::utf8_chunks

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};

use crate::domain::traits::{Corpus, CorpusSource};

/// Loads the negative/positive corpus from two plain-text files.
pub struct TextFileLoader {
    negative: PathBuf,
    positive: PathBuf,
}

impl TextFileLoader {
    pub fn new(negative: impl Into<PathBuf>, positive: impl Into<PathBuf>) -> Self {
        Self { negative: negative.into(), positive: positive.into() }
    }
}

impl CorpusSource for TextFileLoader {
    fn load(&self) -> Result<Corpus> {
        let negative = read_lines(&self.negative)?;
        let positive = read_lines(&self.positive)?;
        tracing::info!(
            "Loaded {} negative lines from '{}', {} positive lines from '{}'",
            negative.len(),
            self.negative.display(),
            positive.len(),
            self.positive.display(),
        );
        Ok(Corpus { negative, positive })
    }
}

/// Read a file into raw lines, ignoring undecodable bytes.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path)
        .with_context(|| format!("Cannot read corpus file '{}'", path.display()))?;

    let text = decode_ignoring_invalid(&bytes);
    let lines = split_lines(&text);

    tracing::debug!("{}: {} bytes, {} lines", path.display(), bytes.len(), lines.len());
    Ok(lines)
}

/// Decode UTF-8, skipping every invalid byte sequence.
fn decode_ignoring_invalid(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

/// Split into lines, keeping "\n" terminators.
fn split_lines(text: &str) -> Vec<String> {
    let normalised = text.replace("\r\n", "\n").replace('\r', "\n");
    normalised
        .split_inclusive('\n')
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(bytes).unwrap();
        path
    }

    #[test]
    fn test_lines_keep_terminators() {
        let lines = split_lines("bad movie\nawful plot\nno newline");
        assert_eq!(lines, vec!["bad movie\n", "awful plot\n", "no newline"]);
    }

    #[test]
    fn test_crlf_normalised() {
        let lines = split_lines("a\r\nb\rc");
        assert_eq!(lines, vec!["a\n", "b\n", "c"]);
    }

    #[test]
    fn test_invalid_bytes_dropped() {
        let decoded = decode_ignoring_invalid(b"caf\xff\xfee ok");
        assert_eq!(decoded, "cafe ok");
    }

    #[test]
    fn test_empty_file_has_no_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "empty.txt", b"");
        assert!(read_lines(&path).unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("negative.txt");
        let err = read_lines(&missing).unwrap_err();
        assert!(format!("{err:#}").contains("negative.txt"));
    }

    #[test]
    fn test_loader_reads_both_sources() {
        let dir = tempfile::tempdir().unwrap();
        let neg = write_file(dir.path(), "negative.txt", b"bad movie\n");
        let pos = write_file(dir.path(), "positive.txt", b"great movie\nfine film\n");
        let corpus = TextFileLoader::new(neg, pos).load().unwrap();
        assert_eq!(corpus.negative, vec!["bad movie\n"]);
        assert_eq!(corpus.positive.len(), 2);
        assert_eq!(corpus.total_lines(), 3);
    }
}
