// ============================================================
// Layer 6 — Metrics
// ============================================================
// Metric records produced by the training and evaluation loops.
//
//   BatchOutput      — loss and accuracy of one evaluated batch
//   ValidationResult — a whole evaluation pass, combined
//   EpochMetrics     — one row of training history
//
// Aggregation rule: every batch counts equally. The epoch loss
// is the arithmetic mean of per-batch losses, and the epoch
// accuracy the arithmetic mean of per-batch accuracies, even
// though the last batch may be smaller than the others.
//
// History is kept in memory only and reported on the console.
//
// Reference: Rust Book §13 (Iterators)

/// Metrics from one evaluated batch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchOutput {
    /// Mean cross-entropy over the batch
    pub loss: f64,

    /// Fraction of the batch whose argmax matches the label, in [0, 1]
    pub accuracy: f64,

    /// Number of samples in the batch
    pub samples: usize,
}

/// One full evaluation pass over a split
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationResult {
    pub loss:     f64,
    pub accuracy: f64,
    /// Total samples seen during the pass
    pub samples:  usize,
}

impl ValidationResult {
    /// Combine per-batch outputs with equal weight per batch.
    /// No batches → NaN loss and zero accuracy.
    pub fn from_batches(outputs: &[BatchOutput]) -> Self {
        let losses: Vec<f64> = outputs.iter().map(|o| o.loss).collect();
        let accs:   Vec<f64> = outputs.iter().map(|o| o.accuracy).collect();

        Self {
            loss:     mean(&losses),
            accuracy: if accs.is_empty() { 0.0 } else { mean(&accs) },
            samples:  outputs.iter().map(|o| o.samples).sum(),
        }
    }
}

/// One row of training history
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Mean of the per-batch training losses
    pub train_loss: f64,

    /// Mean of the per-batch validation losses
    pub val_loss: f64,

    /// Mean of the per-batch validation accuracies
    pub val_acc: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, validation: &ValidationResult) -> Self {
        Self {
            epoch,
            train_loss,
            val_loss: validation.loss,
            val_acc:  validation.accuracy,
        }
    }

    /// The console line printed at the end of every epoch
    pub fn report_line(&self) -> String {
        format!(
            "Epoch [{}], train_loss: {:.4}, val_loss: {:.4}, val_acc: {:.4}",
            self.epoch, self.train_loss, self.val_loss, self.val_acc
        )
    }
}

/// The epoch with the highest validation accuracy
pub fn best_epoch(history: &[EpochMetrics]) -> Option<&EpochMetrics> {
    history
        .iter()
        .filter(|m| !m.val_acc.is_nan())
        .max_by(|a, b| a.val_acc.total_cmp(&b.val_acc))
}

/// Arithmetic mean; NaN for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn out(loss: f64, accuracy: f64, samples: usize) -> BatchOutput {
        BatchOutput { loss, accuracy, samples }
    }

    #[test]
    fn test_batches_are_weighted_equally() {
        // The short last batch still counts as a full batch
        let r = ValidationResult::from_batches(&[out(1.0, 1.0, 64), out(3.0, 0.0, 2)]);
        assert!((r.loss - 2.0).abs() < 1e-12);
        assert!((r.accuracy - 0.5).abs() < 1e-12);
        assert_eq!(r.samples, 66);
    }

    #[test]
    fn test_empty_pass() {
        let r = ValidationResult::from_batches(&[]);
        assert!(r.loss.is_nan());
        assert_eq!(r.accuracy, 0.0);
        assert_eq!(r.samples, 0);
    }

    #[test]
    fn test_report_line_format() {
        let v = ValidationResult { loss: 2.0, accuracy: 0.25, samples: 10 };
        let m = EpochMetrics::new(3, 1.23456, &v);
        assert_eq!(
            m.report_line(),
            "Epoch [3], train_loss: 1.2346, val_loss: 2.0000, val_acc: 0.2500"
        );
    }

    #[test]
    fn test_best_epoch_picks_highest_accuracy() {
        let v = |acc| ValidationResult { loss: 1.0, accuracy: acc, samples: 1 };
        let history = vec![
            EpochMetrics::new(1, 2.0, &v(0.1)),
            EpochMetrics::new(2, 1.5, &v(0.4)),
            EpochMetrics::new(3, 1.2, &v(0.3)),
        ];
        assert_eq!(best_epoch(&history).unwrap().epoch, 2);
        assert!(best_epoch(&[]).is_none());
    }
}
