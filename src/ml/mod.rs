// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn model and training code lives here.
//
// What's in this layer:
//
//   model.rs          — The fixed convolutional network
//                       3 conv blocks (conv, ReLU, conv, ReLU,
//                       max-pool) followed by a 4-layer dense head
//
//   classification.rs — The train/evaluate contract every image
//                       classifier gets for free by providing a
//                       forward pass: training_step,
//                       validation_step, validation_epoch_end,
//                       epoch_end
//
//   trainer.rs        — The training loop
//                       Handles forward pass, loss computation,
//                       backward pass, Adam step, validation,
//                       test evaluation and the final save
//
//   inferencer.rs     — Loads a checkpoint and classifies one image
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// Convolutional dog-breed classifier
pub mod model;

/// Shared training / validation step logic
pub mod classification;

/// Epoch driver with validation, test evaluation and checkpointing
pub mod trainer;

/// Single-image prediction from a checkpoint
pub mod inferencer;
