// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full experiment:
//
//   Step 1: Load both corpus files        (Layer 4 - data)
//   Step 2: Label, shuffle, split 80/20   (Layer 4 - data)
//   Step 3: Tokenizer                     (Layer 6 - infra)
//   Step 4: Encoder architecture          (Layer 6 - infra)
//   Step 5: Tokenise the training split   (Layer 4 - data)
//   Step 6: For every transfer configuration:
//             fresh model → train → evaluate   (Layer 5 - ml)
//   Step 7: Summary of all runs
//
// Each configuration is an independent run: nothing learned in
// one run carries into the next.
//
// Reference: Burn Book §5 (Training)

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use burn::{module::AutodiffModule, tensor::backend::AutodiffBackend};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::SentenceDataset,
    labeler::label_and_shuffle,
    loader::TextFileLoader,
    splitter::split_train_test,
    tokenize::BatchTokenizer,
};
use crate::domain::{
    example::LabeledExample,
    traits::CorpusSource,
    transfer::TransferConfig,
};
use crate::infra::{
    encoder_store::EncoderStore,
    metrics::{MetricsLogger, RunMetrics},
    tokenizer_store::TokenizerStore,
};
use crate::ml::{
    evaluator::{evaluate, print_accuracy, print_predictions},
    inferencer::Predictor,
    model::{MultiTaskConfig, TextEncoderConfig},
    trainer::{train, TrainerSettings},
};

// ─── Data Configuration ──────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Lines from this file get label 1
    pub negative_path: PathBuf,
    /// Lines from this file get label 0
    pub positive_path: PathBuf,
    pub test_fraction: f64,
    pub split_seed:    u64,
    /// Seed for the labelling shuffle; `None` draws from OS entropy
    pub labeling_seed: Option<u64>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            negative_path: PathBuf::from("negative.txt"),
            positive_path: PathBuf::from("positive.txt"),
            test_fraction: 0.2,
            split_seed:    42,
            labeling_seed: None,
        }
    }
}

// ─── Training Configuration ──────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data:                 DataConfig,
    pub trainer:              TrainerSettings,
    pub configurations:       Vec<TransferConfig>,
    pub tokenizer_path:       Option<PathBuf>,
    pub encoder_config_path:  Option<PathBuf>,
    pub encoder_weights_path: Option<PathBuf>,
    /// Default encoder architecture when no config file is given
    pub vocab_size:           usize,
    pub max_seq_len:          usize,
    pub embedding_dim:        usize,
    pub eval_batch_size:      usize,
    pub show_predictions:     bool,
    pub metrics_dir:          Option<PathBuf>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data:                 DataConfig::default(),
            trainer:              TrainerSettings::default(),
            configurations:       TransferConfig::ALL.to_vec(),
            tokenizer_path:       None,
            encoder_config_path:  None,
            encoder_weights_path: None,
            vocab_size:           30522,
            max_seq_len:          128,
            embedding_dim:        256,
            eval_batch_size:      32,
            show_predictions:     true,
            metrics_dir:          None,
        }
    }
}

/// Load the corpus, label it and split it into (train, test).
pub fn load_and_split(cfg: &DataConfig) -> Result<(Vec<LabeledExample>, Vec<LabeledExample>)> {
    let loader = TextFileLoader::new(&cfg.negative_path, &cfg.positive_path);
    let corpus = loader.load()?;

    let mut rng = match cfg.labeling_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None       => StdRng::from_entropy(),
    };
    let labeled = label_and_shuffle(&corpus, &mut rng);

    let (train, test) = split_train_test(labeled, cfg.test_fraction, cfg.split_seed)?;
    tracing::info!("Split: {} train, {} test", train.len(), test.len());
    Ok((train, test))
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

/// Everything a single run needs that is shared across runs.
struct RunContext<'a, B: AutodiffBackend> {
    config:        &'a TrainConfig,
    model_config:  MultiTaskConfig,
    encoder_store: &'a EncoderStore,
    tokenizer:     &'a BatchTokenizer,
    train_set:     Arc<SentenceDataset>,
    test_set:      &'a [LabeledExample],
    metrics:       Option<&'a MetricsLogger>,
    device:        B::Device,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Run every configured transfer configuration and return their metrics.
    pub fn execute<B: AutodiffBackend>(&self, device: B::Device) -> Result<Vec<RunMetrics>> {
        let cfg = &self.config;
        if cfg.configurations.is_empty() {
            bail!("no transfer configuration selected");
        }

        // ── Steps 1–2: corpus → labelled split ───────────────────────────────
        let (train_examples, test_examples) = load_and_split(&cfg.data)?;

        // ── Step 3: tokenizer ────────────────────────────────────────────────
        let train_texts: Vec<String> = train_examples.iter().map(|e| e.text.clone()).collect();
        let tokenizer = TokenizerStore::new(cfg.tokenizer_path.clone())
            .load_or_build(&train_texts, cfg.vocab_size)?;

        // ── Step 4: encoder architecture ─────────────────────────────────────
        let encoder_store = EncoderStore::new(
            cfg.encoder_config_path.clone(),
            cfg.encoder_weights_path.clone(),
        );
        let encoder_config = encoder_store.encoder_config(
            TextEncoderConfig::new()
                .with_vocab_size(cfg.vocab_size)
                .with_max_seq_len(cfg.max_seq_len),
        )?;

        let tokenizer = BatchTokenizer::new(tokenizer, encoder_config.max_seq_len)?;
        let max_id = tokenizer.max_token_id() as usize;
        if max_id >= encoder_config.vocab_size {
            bail!(
                "tokenizer emits id {max_id} but the encoder vocabulary has only {} entries",
                encoder_config.vocab_size
            );
        }

        // ── Step 5: tokenise the training split once ─────────────────────────
        let train_set = Arc::new(SentenceDataset::encode(&train_examples, &tokenizer)?);

        let metrics = cfg.metrics_dir.as_ref().map(MetricsLogger::new).transpose()?;

        let ctx = RunContext::<B> {
            config:        cfg,
            model_config:  MultiTaskConfig::new(encoder_config).with_embedding_dim(cfg.embedding_dim),
            encoder_store: &encoder_store,
            tokenizer:     &tokenizer,
            train_set,
            test_set:      &test_examples,
            metrics:       metrics.as_ref(),
            device,
        };

        // ── Step 6: one independent run per configuration ────────────────────
        let mut runs = Vec::with_capacity(cfg.configurations.len());
        for &transfer in &cfg.configurations {
            println!("=== {transfer} ===");
            runs.push(run_configuration(&ctx, transfer)?);
        }

        // ── Step 7: summary ──────────────────────────────────────────────────
        print_summary(&runs);
        Ok(runs)
    }
}

/// Build a fresh model, train it under `transfer`, then evaluate it.
fn run_configuration<B: AutodiffBackend>(ctx: &RunContext<'_, B>, transfer: TransferConfig) -> Result<RunMetrics> {
    tracing::info!(configuration = %transfer, "Starting run");

    let encoder = ctx.encoder_store.load_encoder::<B>(&ctx.model_config.encoder, &ctx.device)?;
    let model = ctx.model_config.init_with_encoder(encoder, &ctx.device);

    let (model, epoch_losses) = train(
        &ctx.config.trainer,
        transfer,
        model,
        Arc::clone(&ctx.train_set),
        &ctx.device,
        ctx.metrics,
    )?;

    // model.valid() → inner backend: no autodiff graph, dropout off
    let model = model.valid();
    let predictor = Predictor::new(&model, ctx.tokenizer, ctx.device.clone(), ctx.config.eval_batch_size);
    let evaluation = evaluate(&predictor, ctx.test_set)?;

    if ctx.config.show_predictions {
        print_predictions(&evaluation);
    }
    print_accuracy(&evaluation);

    let run = RunMetrics {
        configuration: transfer,
        epoch_losses,
        correct:     evaluation.correct,
        total:       evaluation.total,
        accuracy:    evaluation.accuracy,
        predictions: evaluation.predicted_labels(),
    };
    if let Some(logger) = ctx.metrics {
        logger.log_run(&run)?;
    }
    Ok(run)
}

fn print_summary(runs: &[RunMetrics]) {
    println!();
    println!("{:<22} {:>12} {:>10}", "configuration", "final loss", "accuracy");
    for run in runs {
        let loss = run.final_loss().map_or_else(|| "-".to_string(), |l| format!("{l:.4}"));
        println!("{:<22} {:>12} {:>9.2}%", run.configuration.name(), loss, run.accuracy * 100.0);
    }
}
