// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Workflow coordination only: no tensor code, no file formats.
//
//   train_use_case — full experiment over the transfer configurations
//   split_use_case — data pipeline only, reports the split
//
// Reference: Clean Architecture pattern

// The training + evaluation workflow
pub mod train_use_case;

// The labelling / split inspection workflow
pub mod split_use_case;
