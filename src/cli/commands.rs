// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Two subcommands: `train` and `split`.
// Every default reproduces the original experiment, so running
// `sentence-multitask train` with no flags trains all four
// transfer configurations on negative.txt / positive.txt.
//
// Reference: Rust Book §12 (Building a CLI Program)

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::application::train_use_case::{DataConfig, TrainConfig};
use crate::domain::transfer::TransferConfig;
use crate::ml::trainer::TrainerSettings;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train and evaluate the multi-task model under each transfer configuration
    Train(TrainArgs),

    /// Label, shuffle and split the corpus, then report the partition sizes
    Split(DataArgs),
}

/// Corpus files and split settings shared by both commands.
#[derive(Args, Debug)]
pub struct DataArgs {
    /// Lines from this file are labelled 1
    #[arg(long, default_value = "negative.txt")]
    pub negative: PathBuf,

    /// Lines from this file are labelled 0
    #[arg(long, default_value = "positive.txt")]
    pub positive: PathBuf,

    /// Fraction of examples held out for testing (rounded up)
    #[arg(long, default_value_t = 0.2)]
    pub test_fraction: f64,

    /// Seed for the train/test split
    #[arg(long, default_value_t = 42)]
    pub split_seed: u64,

    /// Seed for the labelling shuffle (random when omitted)
    #[arg(long)]
    pub labeling_seed: Option<u64>,
}

impl From<DataArgs> for DataConfig {
    fn from(a: DataArgs) -> Self {
        DataConfig {
            negative_path: a.negative,
            positive_path: a.positive,
            test_fraction: a.test_fraction,
            split_seed:    a.split_seed,
            labeling_seed: a.labeling_seed,
        }
    }
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Transfer configuration to run; repeat to run several (default: all four)
    #[arg(long = "configuration")]
    pub configurations: Vec<TransferConfig>,

    /// HuggingFace tokenizer.json; a word-level tokenizer is built when omitted
    #[arg(long)]
    pub tokenizer: Option<PathBuf>,

    /// Encoder architecture JSON (burn Config format)
    #[arg(long)]
    pub encoder_config: Option<PathBuf>,

    /// Pretrained encoder weights (full-precision burn `.mpk.gz` record, without extension)
    #[arg(long)]
    pub encoder_weights: Option<PathBuf>,

    /// Mini-batch size
    #[arg(long, default_value_t = 8)]
    pub batch_size: usize,

    /// Epochs per configuration
    #[arg(long, default_value_t = 3)]
    pub epochs: usize,

    /// Seed for the per-epoch batch shuffle
    #[arg(long, default_value_t = 42)]
    pub shuffle_seed: u64,

    /// Encoder vocabulary size (ignored with --encoder-config)
    #[arg(long, default_value_t = 30522)]
    pub vocab_size: usize,

    /// Maximum tokens per sentence, [CLS] and [SEP] included (ignored with --encoder-config)
    #[arg(long, default_value_t = 128)]
    pub max_seq_len: usize,

    /// Width of the shared embedding
    #[arg(long, default_value_t = 256)]
    pub embedding_dim: usize,

    /// Skip the per-sentence prediction report
    #[arg(long)]
    pub no_predictions: bool,

    /// Append epoch losses and accuracies to CSV files in this directory
    #[arg(long)]
    pub metrics_dir: Option<PathBuf>,
}

impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        let defaults = TrainConfig::default();
        TrainConfig {
            data: a.data.into(),
            trainer: TrainerSettings {
                batch_size:   a.batch_size,
                epochs:       a.epochs,
                shuffle_seed: a.shuffle_seed,
                ..TrainerSettings::default()
            },
            configurations: if a.configurations.is_empty() {
                defaults.configurations
            } else {
                a.configurations
            },
            tokenizer_path:       a.tokenizer,
            encoder_config_path:  a.encoder_config,
            encoder_weights_path: a.encoder_weights,
            vocab_size:           a.vocab_size,
            max_seq_len:          a.max_seq_len,
            embedding_dim:        a.embedding_dim,
            eval_batch_size:      defaults.eval_batch_size,
            show_predictions:     !a.no_predictions,
            metrics_dir:          a.metrics_dir,
        }
    }
}
