// ============================================================
// Layer 5 — Evaluator
// ============================================================
// Runs `predict` over the whole test split (inner backend, no
// gradients) and scores classification accuracy:
//
//   accuracy = correct / total
//
// An empty test split is an error rather than an accuracy of 0.
// Every sentence gets a report line: text, predicted label name
// (via LABEL_NAMES) and the raw sentiment score.

use anyhow::{bail, Result};
use burn::prelude::*;

use crate::domain::example::{label_name, LabeledExample};
use crate::ml::inferencer::Predictor;

#[derive(Debug, Clone, PartialEq)]
pub struct SentenceReport {
    pub text:            String,
    pub predicted_label: usize,
    pub label_name:      &'static str,
    pub sentiment:       f32,
}

#[derive(Debug, Clone)]
pub struct Evaluation {
    pub correct:  usize,
    pub total:    usize,
    pub accuracy: f64,
    pub reports:  Vec<SentenceReport>,
}

impl Evaluation {
    /// Predicted class index per sentence, in report order.
    pub fn predicted_labels(&self) -> Vec<usize> {
        self.reports.iter().map(|r| r.predicted_label).collect()
    }
}

/// Fraction of predictions that match the integer labels.
pub fn accuracy(predicted: &[usize], actual: &[u8]) -> Result<(usize, f64)> {
    if predicted.len() != actual.len() {
        bail!("{} predictions for {} labels", predicted.len(), actual.len());
    }
    if actual.is_empty() {
        bail!("cannot compute accuracy over an empty test split");
    }
    let correct = predicted
        .iter()
        .zip(actual)
        .filter(|&(&p, &a)| p == a as usize)
        .count();
    Ok((correct, correct as f64 / actual.len() as f64))
}

pub fn evaluate<B: Backend>(predictor: &Predictor<'_, B>, test: &[LabeledExample]) -> Result<Evaluation> {
    let sentences: Vec<&str> = test.iter().map(|e| e.text.as_str()).collect();
    let predictions = predictor.predict(&sentences)?;

    let predicted: Vec<usize> = predictions.iter().map(|p| p.label).collect();
    let actual: Vec<u8> = test.iter().map(|e| e.label).collect();
    let (correct, acc) = accuracy(&predicted, &actual)?;

    let reports = test
        .iter()
        .zip(&predictions)
        .map(|(ex, p)| SentenceReport {
            text:            ex.text.clone(),
            predicted_label: p.label,
            label_name:      label_name(p.label),
            sentiment:       p.sentiment,
        })
        .collect();

    tracing::info!("Evaluated {} test sentences: {} correct", actual.len(), correct);
    Ok(Evaluation { correct, total: actual.len(), accuracy: acc, reports })
}

/// Console report: one block per sentence.
pub fn print_predictions(evaluation: &Evaluation) {
    println!("Predicted Labels and Sentiment Scores:");
    for r in &evaluation.reports {
        println!("Sentence: {}", r.text);
        println!("Predicted Label: {}", r.label_name);
        println!("Sentiment Score: {}", r.sentiment);
        println!();
    }
}

pub fn print_accuracy(evaluation: &Evaluation) {
    println!("Classification Accuracy: {:.2}%", evaluation.accuracy * 100.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    use crate::data::tokenize::tests::test_tokenizer;
    use crate::domain::example::Source;
    use crate::ml::model::{tests::tiny_model, MultiTaskModel};

    #[test]
    fn test_accuracy_counts_matches() {
        let (correct, acc) = accuracy(&[0, 1, 1, 0], &[0, 1, 0, 0]).unwrap();
        assert_eq!(correct, 3);
        assert!((acc - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_accuracy_bounds() {
        assert_eq!(accuracy(&[1, 1], &[1, 1]).unwrap().1, 1.0);
        assert_eq!(accuracy(&[0, 0], &[1, 1]).unwrap().1, 0.0);
    }

    #[test]
    fn test_accuracy_empty_is_error() {
        assert!(accuracy(&[], &[]).is_err());
    }

    #[test]
    fn test_accuracy_length_mismatch_is_error() {
        assert!(accuracy(&[0], &[0, 1]).is_err());
    }

    #[test]
    fn test_evaluate_reports_every_sentence() {
        let device = Default::default();
        let model: MultiTaskModel<NdArray<f32>> = tiny_model(&device);
        let tokenizer = test_tokenizer(16);
        let predictor = Predictor::new(&model, &tokenizer, device, 8);

        let test = vec![
            LabeledExample::from_line("bad movie", Source::Negative),
            LabeledExample::from_line("great movie", Source::Positive),
        ];
        let eval = evaluate(&predictor, &test).unwrap();
        assert_eq!(eval.total, 2);
        assert_eq!(eval.reports.len(), 2);
        assert!((0.0..=1.0).contains(&eval.accuracy));
        assert_eq!(eval.reports[0].text, "bad movie");
        let predicted = eval.predicted_labels();
        assert_eq!(predicted.len(), 2);
        assert!(predicted.iter().all(|&p| p < 2));
        let (correct, _) = accuracy(&predicted, &[1, 0]).unwrap();
        assert_eq!(correct, eval.correct);
        assert!(["Positive", "Negative"].contains(&eval.reports[1].label_name));
    }

    #[test]
    fn test_evaluate_empty_split_errors() {
        let device = Default::default();
        let model: MultiTaskModel<NdArray<f32>> = tiny_model(&device);
        let tokenizer = test_tokenizer(16);
        let predictor = Predictor::new(&model, &tokenizer, device, 8);
        assert!(evaluate(&predictor, &[]).is_err());
    }
}
