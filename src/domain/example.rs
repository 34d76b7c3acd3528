// ============================================================
// Layer 3 — LabeledExample Domain Type
// ============================================================
// One training/test example: a sentence and the integer label
// of the file it was read from.
//
// The label encodes SOURCE MEMBERSHIP, not linguistic sentiment:
//   label 1 → line came from the "negative" source
//   label 0 → line came from the "positive" source
//
// LABEL_NAMES maps a predicted class index to a display name
// (index 0 → "Positive", index 1 → "Negative"). It is a separate
// table from the source labels and is only used for printing.
//
// Reference: Rust Book §5 (Structs and Methods)

use serde::{Deserialize, Serialize};

/// Display names for predicted class indices, in index order.
pub const LABEL_NAMES: [&str; 2] = ["Positive", "Negative"];

/// Which input file a line was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    Negative,
    Positive,
}

impl Source {
    /// The integer class label assigned to lines from this source.
    pub fn label(self) -> u8 {
        match self {
            Source::Negative => 1,
            Source::Positive => 0,
        }
    }
}

/// A sentence with exactly one binary label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledExample {
    pub text:  String,
    pub label: u8,
}

impl LabeledExample {
    /// Build an example from a raw line. Trailing whitespace
    /// (including the line terminator) is stripped.
    pub fn from_line(line: &str, source: Source) -> Self {
        Self {
            text:  line.trim_end().to_string(),
            label: source.label(),
        }
    }

    /// Regression target for the sentiment head: the class label cast to float.
    pub fn sentiment_target(&self) -> f32 {
        self.label as f32
    }
}

/// Look up the display name for a predicted class index.
/// Returns "Unknown" for anything outside the two-element table.
pub fn label_name(index: usize) -> &'static str {
    LABEL_NAMES.get(index).copied().unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_labels() {
        assert_eq!(Source::Negative.label(), 1);
        assert_eq!(Source::Positive.label(), 0);
    }

    #[test]
    fn test_from_line_strips_trailing_whitespace_only() {
        let ex = LabeledExample::from_line("  bad movie \t\r\n", Source::Negative);
        assert_eq!(ex.text, "  bad movie");
        assert_eq!(ex.label, 1);
    }

    #[test]
    fn test_label_name_table() {
        assert_eq!(label_name(0), "Positive");
        assert_eq!(label_name(1), "Negative");
        assert_eq!(label_name(7), "Unknown");
    }

    #[test]
    fn test_sentiment_target_is_label() {
        let ex = LabeledExample::from_line("great movie", Source::Positive);
        assert_eq!(ex.sentiment_target(), 0.0);
    }
}
