// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer programs against these traits rather
// than concrete loaders, so a different on-disk layout only
// needs a new implementation, not a new workflow.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use crate::domain::sample::ImageSample;

// ─── SampleSource ─────────────────────────────────────────────────────────────
/// Any component that can enumerate labelled images.
///
/// Implementations:
///   - ImageFolder → one subdirectory per class label
pub trait SampleSource {
    /// Index every available sample. Fails if the layout is malformed.
    fn load_all(&self) -> Result<Vec<ImageSample>>;
}
