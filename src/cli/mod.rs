// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and routes to a use case.
//
//   1. `train` — trains and evaluates under each transfer configuration
//   2. `split` — shows how the corpus is labelled and split
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, DataArgs, TrainArgs};

use crate::infra::backend::{default_device, TrainBackend};

#[derive(Parser, Debug)]
#[command(
    name = "sentence-multitask",
    version,
    about = "Fine-tune a shared sentence encoder with a classification head and a sentiment head."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => run_train(args),
            Commands::Split(args) => run_split(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!(
        "Training on '{}' / '{}'",
        args.data.negative.display(),
        args.data.positive.display()
    );

    let use_case = TrainUseCase::new(args.into());
    use_case.execute::<TrainBackend>(default_device())?;
    Ok(())
}

fn run_split(args: DataArgs) -> Result<()> {
    use crate::application::split_use_case::SplitUseCase;

    let summary = SplitUseCase::new(args.into()).execute()?;
    println!(
        "train: {} ({} negative / {} positive)",
        summary.train.total(), summary.train.negative, summary.train.positive
    );
    println!(
        "test:  {} ({} negative / {} positive)",
        summary.test.total(), summary.test.negative, summary.test.positive
    );
    Ok(())
}
