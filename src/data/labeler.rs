// ============================================================
// Layer 4 — Labeler / Shuffler
// ============================================================
// Turns the two-source corpus into one shuffled list of
// LabeledExamples.
//
// Drawing order:
//   Alternately take one uniformly random remaining line from the
//   negative source (label 1) and one from the positive source
//   (label 0). When one source runs out, keep draining the other.
//
//   A uniformly random draw without replacement is the same as
//   walking a random permutation front to back, so each source is
//   shuffled once and then consumed by index. Duplicate lines are
//   therefore kept as distinct examples.
//
// After interleaving, the whole list is shuffled again.
//
// Reference: rand crate documentation (SliceRandom)

use rand::{seq::SliceRandom, Rng};

use crate::domain::example::{LabeledExample, Source};
use crate::domain::traits::Corpus;

/// Interleave both sources with their labels, in random draw order.
pub fn interleave<R: Rng + ?Sized>(corpus: &Corpus, rng: &mut R) -> Vec<LabeledExample> {
    let negative = permuted(&corpus.negative, rng);
    let positive = permuted(&corpus.positive, rng);

    let mut labeled = Vec::with_capacity(corpus.total_lines());
    let rounds = negative.len().max(positive.len());
    for i in 0..rounds {
        if let Some(line) = negative.get(i) {
            labeled.push(LabeledExample::from_line(line, Source::Negative));
        }
        if let Some(line) = positive.get(i) {
            labeled.push(LabeledExample::from_line(line, Source::Positive));
        }
    }
    labeled
}

/// Interleave, label, then shuffle the combined list.
pub fn label_and_shuffle<R: Rng + ?Sized>(corpus: &Corpus, rng: &mut R) -> Vec<LabeledExample> {
    let mut labeled = interleave(corpus, rng);
    labeled.shuffle(rng);

    tracing::info!(
        "Labelled {} examples ({} negative / {} positive)",
        labeled.len(),
        corpus.negative.len(),
        corpus.positive.len(),
    );
    labeled
}

fn permuted<'a, R: Rng + ?Sized>(lines: &'a [String], rng: &mut R) -> Vec<&'a str> {
    let mut order: Vec<&str> = lines.iter().map(String::as_str).collect();
    order.shuffle(rng);
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn corpus(neg: &[&str], pos: &[&str]) -> Corpus {
        Corpus {
            negative: neg.iter().map(|s| s.to_string()).collect(),
            positive: pos.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_single_line_each() {
        let c = corpus(&["bad movie\n"], &["great movie\n"]);
        let mut rng = StdRng::seed_from_u64(1);
        let labeled = label_and_shuffle(&c, &mut rng);
        assert_eq!(labeled.len(), 2);
        assert!(labeled.contains(&LabeledExample { text: "bad movie".into(), label: 1 }));
        assert!(labeled.contains(&LabeledExample { text: "great movie".into(), label: 0 }));
    }

    #[test]
    fn test_every_line_appears_once_with_its_label() {
        let neg: Vec<String> = (0..7).map(|i| format!("neg {i}\n")).collect();
        let pos: Vec<String> = (0..4).map(|i| format!("pos {i}  \n")).collect();
        let c = Corpus { negative: neg.clone(), positive: pos.clone() };
        let mut rng = StdRng::seed_from_u64(7);
        let labeled = label_and_shuffle(&c, &mut rng);

        assert_eq!(labeled.len(), 11);
        for line in &neg {
            let hits: Vec<_> = labeled.iter().filter(|e| e.text == line.trim_end()).collect();
            assert_eq!(hits.len(), 1);
            assert_eq!(hits[0].label, 1);
        }
        for line in &pos {
            let hits: Vec<_> = labeled.iter().filter(|e| e.text == line.trim_end()).collect();
            assert_eq!(hits.len(), 1);
            assert_eq!(hits[0].label, 0);
        }
    }

    #[test]
    fn test_interleave_alternates_then_drains() {
        let c = corpus(&["n1", "n2", "n3"], &["p1"]);
        let mut rng = StdRng::seed_from_u64(3);
        let labels: Vec<u8> = interleave(&c, &mut rng).iter().map(|e| e.label).collect();
        assert_eq!(labels, vec![1, 0, 1, 1]);
    }

    #[test]
    fn test_duplicate_lines_are_kept() {
        let c = corpus(&["same\n", "same\n"], &["same\n"]);
        let mut rng = StdRng::seed_from_u64(0);
        let labeled = label_and_shuffle(&c, &mut rng);
        assert_eq!(labeled.iter().filter(|e| e.label == 1).count(), 2);
        assert_eq!(labeled.iter().filter(|e| e.label == 0).count(), 1);
    }

    #[test]
    fn test_empty_source_yields_no_examples_for_that_label() {
        let c = corpus(&[], &["a\n", "b\n", "c\n"]);
        let mut rng = StdRng::seed_from_u64(5);
        let labeled = label_and_shuffle(&c, &mut rng);
        assert_eq!(labeled.len(), 3);
        assert!(labeled.iter().all(|e| e.label == 0));
    }
}
