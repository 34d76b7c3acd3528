//! Task losses for the multi-task model.
//!
//! total = cross_entropy(logits, labels) + mse(sentiment, targets)
//!
//! The two terms are summed with equal weight. The sentiment target
//! is the class label cast to float (see `SentenceBatcher`), so the
//! regression head learns the same signal as the classifier.

use burn::nn::loss::{CrossEntropyLossConfig, MseLoss, Reduction};
use burn::prelude::*;

/// Loss components for one batch. Every field is a scalar tensor of shape `[1]`.
pub struct MultiTaskLoss<B: Backend> {
    pub classification: Tensor<B, 1>,
    pub sentiment:      Tensor<B, 1>,
    pub total:          Tensor<B, 1>,
}

/// Mean cross-entropy of `logits` [batch, classes] against integer `labels` [batch].
pub fn classification_loss<B: Backend>(logits: Tensor<B, 2>, labels: Tensor<B, 1, Int>) -> Tensor<B, 1> {
    CrossEntropyLossConfig::new()
        .init(&logits.device())
        .forward(logits, labels)
}

/// Mean squared error between predicted and target sentiment, both [batch].
pub fn sentiment_loss<B: Backend>(predicted: Tensor<B, 1>, targets: Tensor<B, 1>) -> Tensor<B, 1> {
    MseLoss::new().forward(predicted, targets, Reduction::Mean)
}

pub fn multitask_loss<B: Backend>(
    logits:    Tensor<B, 2>,
    sentiment: Tensor<B, 1>,
    labels:    Tensor<B, 1, Int>,
    targets:   Tensor<B, 1>,
) -> MultiTaskLoss<B> {
    let classification = classification_loss(logits, labels);
    let sentiment      = sentiment_loss(sentiment, targets);
    let total          = classification.clone() + sentiment.clone();
    MultiTaskLoss { classification, sentiment, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::tensor::TensorData;

    type TestBackend = NdArray<f32>;

    fn scalar(t: Tensor<TestBackend, 1>) -> f32 {
        t.into_scalar()
    }

    fn logits(device: &<TestBackend as Backend>::Device) -> Tensor<TestBackend, 2> {
        Tensor::from_data(TensorData::new(vec![2.0f32, -1.0], [1, 2]), device)
    }

    fn label(value: i64, device: &<TestBackend as Backend>::Device) -> Tensor<TestBackend, 1, Int> {
        Tensor::from_data(TensorData::new(vec![value], [1]), device)
    }

    #[test]
    fn test_cross_entropy_direction() {
        let device = Default::default();
        let correct = scalar(classification_loss(logits(&device), label(0, &device)));
        let wrong   = scalar(classification_loss(logits(&device), label(1, &device)));

        // ln(1 + e^-3) and 3 + ln(1 + e^-3)
        assert!((correct - 0.048_587).abs() < 1e-4, "{correct}");
        assert!((wrong - 3.048_587).abs() < 1e-4, "{wrong}");
        assert!(correct < wrong);
    }

    #[test]
    fn test_mse() {
        let device = Default::default();
        let pred    = Tensor::<TestBackend, 1>::from_data(TensorData::new(vec![0.5f32, 1.0], [2]), &device);
        let targets = Tensor::<TestBackend, 1>::from_data(TensorData::new(vec![1.0f32, 1.0], [2]), &device);
        let loss = scalar(sentiment_loss(pred, targets));
        assert!((loss - 0.125).abs() < 1e-6);
    }

    #[test]
    fn test_total_is_unweighted_sum() {
        let device = Default::default();
        let sentiment = Tensor::<TestBackend, 1>::from_data(TensorData::new(vec![0.0f32], [1]), &device);
        let targets   = Tensor::<TestBackend, 1>::from_data(TensorData::new(vec![1.0f32], [1]), &device);
        let loss = multitask_loss(logits(&device), sentiment, label(1, &device), targets);

        let c = scalar(loss.classification);
        let s = scalar(loss.sentiment);
        let t = scalar(loss.total);
        assert!((s - 1.0).abs() < 1e-6);
        assert!((t - (c + s)).abs() < 1e-5);
    }
}
