// ============================================================
// Layer 2 — SplitUseCase
// ============================================================
// Runs only the data pipeline (load → label → shuffle → split)
// and reports how the examples landed in each partition.
// Useful for checking corpus files before a training run.

use anyhow::Result;

use crate::application::train_use_case::{load_and_split, DataConfig};
use crate::domain::example::{LabeledExample, Source};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionCounts {
    pub negative: usize,
    pub positive: usize,
}

impl PartitionCounts {
    fn of(examples: &[LabeledExample]) -> Self {
        let negative = examples.iter().filter(|e| e.label == Source::Negative.label()).count();
        Self { negative, positive: examples.len() - negative }
    }

    pub fn total(&self) -> usize {
        self.negative + self.positive
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitSummary {
    pub train: PartitionCounts,
    pub test:  PartitionCounts,
}

pub struct SplitUseCase {
    config: DataConfig,
}

impl SplitUseCase {
    pub fn new(config: DataConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<SplitSummary> {
        let (train, test) = load_and_split(&self.config)?;
        Ok(SplitSummary {
            train: PartitionCounts::of(&train),
            test:  PartitionCounts::of(&test),
        })
    }
}
