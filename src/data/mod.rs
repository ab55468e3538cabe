// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer handles everything from an image directory tree
// all the way to device-ready tensor batches.
//
// The pipeline flows in this order:
//
//   data/imagewoof-160/{train,val}/<wnid>/*.JPEG
//       │
//       ▼
//   ImageFolder       → walks the tree, assigns labels by sorted dir name
//       │
//       ▼
//   split_train_val   → seeded 95% / 5% train/validation partition
//       │
//       ▼
//   ImageDataset      → implements Burn's Dataset trait,
//       │               decodes + transforms one image per get()
//       ▼
//   ImageBatcher      → stacks items into [N, 3, S, S] tensors
//       │
//       ▼
//   DataLoader        → Burn worker threads prefetch batches
//
// Each module is responsible for exactly one step.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)
//            Rust Book §13 (Iterators and Closures)

/// Indexes a class-per-directory image tree
pub mod loader;

/// Train-time augmentation and eval-time resizing
pub mod transform;

/// Implements Burn's Dataset trait for image samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Shuffles and splits data into train/validation sets
pub mod splitter;

/// On-disk image trees for unit tests
#[cfg(test)]
pub mod fixtures;
