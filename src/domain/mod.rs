// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits that define the core concepts
// of the classifier: which breeds exist, what a labelled image
// on disk looks like, and how a collection of them is sourced.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO image decoding
//   - NO ML-specific code
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// The fixed ten-entry breed table
pub mod breed;

// A labelled image file on disk
pub mod sample;

// Core abstractions (traits) that other layers implement
pub mod traits;
