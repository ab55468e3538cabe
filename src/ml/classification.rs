// ============================================================
// Layer 5 — Image Classification Contract
// ============================================================
// Everything the training loop needs from a model, expressed
// as default methods on top of one required `forward`:
//
//   training_step        batch → mean cross-entropy (with graph)
//   validation_step      batch → loss + accuracy (plain numbers)
//   validation_epoch_end [BatchOutput] → ValidationResult
//   epoch_end            prints the epoch report line
//
// The trait is generic over the backend, so the same model type
// implements it on Autodiff<B> (training) and on B (evaluation,
// after `model.valid()`).
//
// Reference: Burn Book §5 (Training)

use burn::{nn::loss::CrossEntropyLossConfig, prelude::*};

use crate::data::batcher::ImageBatch;
use crate::infra::metrics::{BatchOutput, EpochMetrics, ValidationResult};
use crate::ml::model::ImagewoofCnn;

pub trait ImageClassification<B: Backend> {
    /// images: [batch, 3, S, S] → logits: [batch, num_classes]
    fn logits(&self, images: Tensor<B, 4>) -> Tensor<B, 2>;

    /// Loss for one training batch. Backward and the optimiser step
    /// are the caller's job.
    fn training_step(&self, batch: ImageBatch<B>) -> Tensor<B, 1> {
        let logits = self.logits(batch.images);
        cross_entropy(logits, batch.labels)
    }

    fn validation_step(&self, batch: ImageBatch<B>) -> BatchOutput {
        let samples = batch.num_samples();
        let logits  = self.logits(batch.images);
        let loss    = cross_entropy(logits.clone(), batch.labels.clone());

        BatchOutput {
            loss:     loss.into_scalar().elem::<f64>(),
            accuracy: accuracy(logits, batch.labels),
            samples,
        }
    }

    fn validation_epoch_end(&self, outputs: &[BatchOutput]) -> ValidationResult {
        ValidationResult::from_batches(outputs)
    }

    fn epoch_end(&self, metrics: &EpochMetrics) {
        println!("{}", metrics.report_line());
    }
}

impl<B: Backend> ImageClassification<B> for ImagewoofCnn<B> {
    fn logits(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        self.forward(images)
    }
}

/// Mean cross-entropy between logits [batch, classes] and labels [batch]
pub fn cross_entropy<B: Backend>(logits: Tensor<B, 2>, labels: Tensor<B, 1, Int>) -> Tensor<B, 1> {
    CrossEntropyLossConfig::new()
        .init(&logits.device())
        .forward(logits, labels)
}

/// Fraction of rows whose argmax equals the label. Empty batch → 0.0.
pub fn accuracy<B: Backend>(logits: Tensor<B, 2>, labels: Tensor<B, 1, Int>) -> f64 {
    let total = labels.dims()[0];
    if total == 0 {
        return 0.0;
    }

    // argmax(1) returns shape [batch, 1] — flatten to [batch]
    let preds = logits.argmax(1).flatten::<1>(0, 1);
    let correct: i64 = preds
        .equal(labels)
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>();

    correct as f64 / total as f64
}
