// ============================================================
// Layer 4 — Train/Validation Splitter
// ============================================================
// Randomly partitions one source collection into two disjoint
// sets:
//   - Training set:   used to update model weights
//   - Validation set: used to measure performance on unseen data
//
// Split sizes:
//   n_train = floor(total * train_fraction)
//   n_valid = total - n_train
//
// e.g. 100 samples, train_fraction 0.95 → 95 train, 5 validation
//
// The shuffle is driven by a seeded StdRng, so the same input
// and seed always give the same partition across runs.
//
// Reference: Rust Book §8 (Vectors)
//            rand crate documentation

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `samples` with `seed` and split into (train, validation).
///
/// # Arguments
/// * `samples`        - All available samples (consumed by this function)
/// * `train_fraction` - Proportion for training, e.g. 0.95 = 95%
/// * `seed`           - RNG seed; equal seeds give equal partitions
pub fn split_train_val<T>(mut samples: Vec<T>, train_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);

    // Fisher-Yates shuffle
    samples.shuffle(&mut rng);

    let total    = samples.len();
    let split_at = ((total as f64) * train_fraction) as usize;

    // Never past the end
    let split_at = split_at.min(total);

    // split_off(n) leaves [0..n) in `samples` and returns [n..total)
    let val = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} validation (seed {})",
        samples.len(),
        val.len(),
        seed,
    );

    (samples, val)
}
