// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn model code lives here.
//
//   model.rs      — encoder + shared projection + two task heads
//   loss.rs       — cross-entropy, MSE and their unweighted sum
//   trainer.rs    — one training run under a transfer configuration
//   inferencer.rs — no-gradient `encode` / `predict`
//   evaluator.rs  — test-split accuracy and per-sentence report
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)

/// Multi-task sentence model
pub mod model;

/// Task losses
pub mod loss;

/// Training loop with per-group optimizers
pub mod trainer;

/// Inference: encode and predict
pub mod inferencer;

/// Accuracy and prediction report
pub mod evaluator;
