// ============================================================
// Layer 6 — Metrics
// ============================================================
// Per-epoch and per-run results, plus an optional CSV logger.
//
// Output files (in the configured metrics directory):
//
//   metrics.csv
//     configuration,epoch,mean_loss
//     full-fine-tune,1,0.912345
//     ...
//
//   accuracy.csv
//     configuration,correct,total,accuracy
//     full-fine-tune,17,20,0.850000
//
// Rows are appended, so repeated runs accumulate in one file.
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

use crate::domain::transfer::TransferConfig;

/// Mean training loss of one epoch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub configuration: TransferConfig,
    /// Starts at 1
    pub epoch: usize,
    pub mean_loss: f64,
}

impl EpochMetrics {
    pub fn new(configuration: TransferConfig, epoch: usize, mean_loss: f64) -> Self {
        Self { configuration, epoch, mean_loss }
    }
}

/// Outcome of one complete training + evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetrics {
    pub configuration: TransferConfig,
    pub epoch_losses:  Vec<f64>,
    pub correct:       usize,
    pub total:         usize,
    /// correct / total, in [0, 1]
    pub accuracy:      f64,
    /// Predicted class index per test sentence, in test-split order
    pub predictions:   Vec<usize>,
}

impl RunMetrics {
    pub fn final_loss(&self) -> Option<f64> {
        self.epoch_losses.last().copied()
    }
}

/// Appends metrics rows to CSV files.
pub struct MetricsLogger {
    epochs_csv:   PathBuf,
    accuracy_csv: PathBuf,
}

impl MetricsLogger {
    /// Create the directory and write CSV headers for files that don't exist yet.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create metrics directory '{}'", dir.display()))?;

        let epochs_csv   = dir.join("metrics.csv");
        let accuracy_csv = dir.join("accuracy.csv");
        write_header_if_new(&epochs_csv, "configuration,epoch,mean_loss")?;
        write_header_if_new(&accuracy_csv, "configuration,correct,total,accuracy")?;

        Ok(Self { epochs_csv, accuracy_csv })
    }

    pub fn log_epoch(&self, m: &EpochMetrics) -> Result<()> {
        append_row(&self.epochs_csv, &format!("{},{},{:.6}", m.configuration, m.epoch, m.mean_loss))?;
        tracing::debug!("Logged {} epoch {} loss={:.4}", m.configuration, m.epoch, m.mean_loss);
        Ok(())
    }

    pub fn log_run(&self, m: &RunMetrics) -> Result<()> {
        append_row(
            &self.accuracy_csv,
            &format!("{},{},{},{:.6}", m.configuration, m.correct, m.total, m.accuracy),
        )
    }
}

fn write_header_if_new(path: &Path, header: &str) -> Result<()> {
    if !path.exists() {
        let mut f = fs::File::create(path)
            .with_context(|| format!("Cannot create '{}'", path.display()))?;
        writeln!(f, "{header}")?;
        tracing::debug!("Created metrics CSV: '{}'", path.display());
    }
    Ok(())
}

fn append_row(path: &Path, row: &str) -> Result<()> {
    let mut f = OpenOptions::new()
        .append(true)
        .open(path)
        .with_context(|| format!("Cannot open '{}'", path.display()))?;
    writeln!(f, "{row}")?;
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_appended_under_header() {
        let dir = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger.log_epoch(&EpochMetrics::new(TransferConfig::HeadOnly, 1, 0.5)).unwrap();
        logger.log_epoch(&EpochMetrics::new(TransferConfig::HeadOnly, 2, 0.25)).unwrap();

        let text = fs::read_to_string(dir.path().join("metrics.csv")).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec![
            "configuration,epoch,mean_loss",
            "head-only,1,0.500000",
            "head-only,2,0.250000",
        ]);
    }

    #[test]
    fn test_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        MetricsLogger::new(dir.path()).unwrap();
        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger.log_run(&RunMetrics {
            configuration: TransferConfig::LayerWise,
            epoch_losses:  vec![0.9, 0.7],
            correct:       3,
            total:         4,
            accuracy:      0.75,
            predictions:   vec![1, 0, 0, 1],
        }).unwrap();

        let text = fs::read_to_string(dir.path().join("accuracy.csv")).unwrap();
        assert_eq!(text, "configuration,correct,total,accuracy\nlayer-wise,3,4,0.750000\n");
    }

    #[test]
    fn test_final_loss() {
        let m = RunMetrics {
            configuration: TransferConfig::FullFineTune,
            epoch_losses:  vec![1.0, 0.5],
            correct:       0,
            total:         1,
            accuracy:      0.0,
            predictions:   vec![1],
        };
        assert_eq!(m.final_loss(), Some(0.5));
    }
}
