// ============================================================
// Layer 5 — Training Loop
// ============================================================
// One complete run under one transfer configuration:
//
//   for epoch in 1..=epochs
//     for batch in shuffled mini-batches (reshuffled every epoch)
//       forward → CE(logits, labels) + MSE(sentiment, label as f32)
//       backward
//       step every trainable group with its own AdamW + learning rate
//     report mean batch loss for the epoch
//
// Parameter groups:
//   Each of the four groups (encoder, shared projection, the two
//   heads) has its own optimizer, so groups can run at different
//   learning rates. Frozen groups are marked `no_grad` before
//   training and are never stepped.
//
//   Burn builds fresh gradients on every backward pass, so there
//   is no explicit zero-grad step.
//
// A non-finite batch loss stops the run with an error.
//
// Reference: Burn Book §5, Loshchilov & Hutter (2019) AdamW

use std::sync::Arc;

use anyhow::{bail, Result};
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    nn::Linear,
    optim::{AdamWConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use serde::{Deserialize, Serialize};

use crate::data::{batcher::SentenceBatcher, dataset::SentenceDataset};
use crate::domain::transfer::{GroupSetting, ParamGroup, TransferConfig};
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::model::{MultiTaskModel, TextEncoder};

/// Loop settings shared by every transfer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerSettings {
    pub batch_size:   usize,
    pub epochs:       usize,
    pub shuffle_seed: u64,
    pub weight_decay: f64,
}

impl Default for TrainerSettings {
    fn default() -> Self {
        Self {
            batch_size:   8,
            epochs:       3,
            shuffle_seed: 42,
            weight_decay: 0.01,
        }
    }
}

/// Train `model` under `transfer` and return it with the mean loss of each epoch.
pub fn train<B: AutodiffBackend>(
    settings: &TrainerSettings,
    transfer: TransferConfig,
    model:    MultiTaskModel<B>,
    dataset:  Arc<SentenceDataset>,
    device:   &B::Device,
    metrics:  Option<&MetricsLogger>,
) -> Result<(MultiTaskModel<B>, Vec<f64>)> {
    if dataset.sample_count() == 0 {
        bail!("cannot train '{transfer}' on an empty training set");
    }

    let mut model = model.freeze_for(transfer);
    for setting in transfer.groups() {
        tracing::info!(
            configuration = %transfer,
            group = ?setting.group,
            trainable = setting.trainable,
            lr = setting.lr,
            "Parameter group"
        );
    }

    // ── One AdamW per parameter group ─────────────────────────────────────────
    let adamw = AdamWConfig::new()
        .with_beta_1(0.9)
        .with_beta_2(0.999)
        .with_epsilon(1e-8)
        .with_weight_decay(settings.weight_decay as f32);
    let mut encoder_optim        = adamw.init::<B, TextEncoder<B>>();
    let mut projection_optim     = adamw.init::<B, Linear<B>>();
    let mut classification_optim = adamw.init::<B, Linear<B>>();
    let mut sentiment_optim      = adamw.init::<B, Linear<B>>();

    let encoder_setting        = transfer.setting(ParamGroup::Encoder);
    let projection_setting     = transfer.setting(ParamGroup::SharedProjection);
    let classification_setting = transfer.setting(ParamGroup::ClassificationHead);
    let sentiment_setting      = transfer.setting(ParamGroup::SentimentHead);

    // ── Training data loader ──────────────────────────────────────────────────
    let batcher = SentenceBatcher::<B>::new(device.clone());
    let loader  = DataLoaderBuilder::new(batcher)
        .batch_size(settings.batch_size)
        .shuffle(settings.shuffle_seed)
        .num_workers(1)
        .build(dataset);

    let mut epoch_losses = Vec::with_capacity(settings.epochs);

    for epoch in 1..=settings.epochs {
        let mut loss_sum = 0.0f64;
        let mut batches  = 0usize;

        for batch in loader.iter() {
            let loss = model.forward_loss(
                batch.input_ids,
                batch.attention_mask,
                batch.labels,
                batch.sentiment_targets,
            );

            let loss_val: f64 = loss.total.clone().into_scalar().elem::<f64>();
            if !loss_val.is_finite() {
                bail!("non-finite loss ({loss_val}) in '{transfer}' epoch {epoch}, batch {}", batches + 1);
            }
            loss_sum += loss_val;
            batches  += 1;

            tracing::debug!(
                epoch,
                batch = batches,
                classification = loss.classification.clone().into_scalar().elem::<f64>(),
                sentiment = loss.sentiment.clone().into_scalar().elem::<f64>(),
                total = loss_val,
                "Batch loss"
            );

            let mut grads = loss.total.backward();

            let MultiTaskModel { encoder, shared_projection, classification_head, sentiment_head } = model;
            model = MultiTaskModel {
                encoder: step_group(&mut encoder_optim, encoder_setting, encoder, &mut grads),
                shared_projection: step_group(&mut projection_optim, projection_setting, shared_projection, &mut grads),
                classification_head: step_group(&mut classification_optim, classification_setting, classification_head, &mut grads),
                sentiment_head: step_group(&mut sentiment_optim, sentiment_setting, sentiment_head, &mut grads),
            };
        }

        let mean_loss = loss_sum / batches.max(1) as f64;
        println!("Epoch {}/{}, Loss: {}", epoch, settings.epochs, mean_loss);
        tracing::info!(configuration = %transfer, epoch, mean_loss, "Epoch complete");

        if let Some(logger) = metrics {
            logger.log_epoch(&EpochMetrics::new(transfer, epoch, mean_loss))?;
        }
        epoch_losses.push(mean_loss);
    }

    Ok((model, epoch_losses))
}

/// Apply one optimizer step to a parameter group, or leave it untouched when frozen.
fn step_group<B, M, O>(optim: &mut O, setting: GroupSetting, module: M, grads: &mut B::Gradients) -> M
where
    B: AutodiffBackend,
    M: AutodiffModule<B>,
    O: Optimizer<M, B>,
{
    if !setting.trainable {
        return module;
    }
    let group_grads = GradientsParams::from_module(grads, &module);
    optim.step(setting.lr, module, group_grads)
}
