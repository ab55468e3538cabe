// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by several layers:
//
//   checkpoint.rs — Saving and loading the trained model.
//                   Weights go through Burn's full-precision
//                   file recorder; the architecture config is
//                   written as JSON next to them so the model
//                   can be rebuilt before its weights are loaded.
//
//   metrics.rs    — Per-batch and per-epoch metric records and
//                   their aggregation into epoch means.
//
//   device.rs     — Which Burn backend/device to run on.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Epoch metric records and aggregation
pub mod metrics;

/// Backend / device selection
pub mod device;
