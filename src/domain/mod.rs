// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits that name the core
// concepts of the system:
//
//   - a labelled sentence and its two-element name table
//   - the parameter groups of the multi-task model
//   - the transfer configurations (which groups train, and how fast)
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §6 (Enums), §10 (Traits)

// A sentence paired with the binary label of its source file
pub mod example;

// Parameter groups and the four transfer configurations
pub mod transfer;

// Core abstractions (traits) that other layers implement
pub mod traits;
