// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// one goal: training, evaluating a saved model, or classifying
// a single image.
//
// Rules for this layer:
//   - No ML math or model code here
//   - No argument parsing here (that's Layer 1)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The training workflow
pub mod train_use_case;

// Re-evaluate a saved model on the test split
pub mod evaluate_use_case;

// Classify one image with a saved model
pub mod predict_use_case;
