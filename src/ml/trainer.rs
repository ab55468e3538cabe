// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Full train + validation + test loop using Burn's DataLoader
// and Adam.
//
// Key Burn points:
//   - Training runs on Autodiff<B> so `loss.backward()` works
//   - model.valid() returns the same model on the inner backend
//     B, with no autodiff graph, for every evaluation pass
//   - Validation/test batchers must therefore also use the
//     inner backend
//
// Order of work:
//   1. Evaluate the untrained model on the validation split
//   2. For each epoch: train over shuffled batches, evaluate,
//      print the epoch line, append to history
//   3. Evaluate on the test split and print the final line
//   4. Save the model
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::{ensure, Result};
use burn::{
    data::dataloader::{DataLoader, DataLoaderBuilder},
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use std::sync::Arc;

use crate::application::train_use_case::TrainConfig;
use crate::data::{
    batcher::{ImageBatch, ImageBatcher},
    dataset::ImageDataset,
};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::device::{CpuTrainBackend, DeviceKind, GpuTrainBackend};
use crate::infra::metrics::{mean, EpochMetrics, ValidationResult};
use crate::ml::classification::ImageClassification;
use crate::ml::model::ImagewoofCnn;

/// The three splits handed to the trainer
pub struct SplitDatasets {
    pub train: ImageDataset,
    pub valid: ImageDataset,
    pub test:  ImageDataset,
}

/// What a finished run produced
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub initial: ValidationResult,
    pub history: Vec<EpochMetrics>,
    pub test:    ValidationResult,
}

pub fn run_training(
    cfg:          &TrainConfig,
    datasets:     SplitDatasets,
    ckpt_manager: &CheckpointManager,
) -> Result<TrainingReport> {
    tracing::info!("Using device: {}", cfg.device);
    match cfg.device {
        DeviceKind::Gpu => {
            train_loop::<GpuTrainBackend>(cfg, datasets, ckpt_manager, Default::default())
        }
        DeviceKind::Cpu => {
            train_loop::<CpuTrainBackend>(cfg, datasets, ckpt_manager, Default::default())
        }
    }
}

fn train_loop<B: AutodiffBackend>(
    cfg:          &TrainConfig,
    datasets:     SplitDatasets,
    ckpt_manager: &CheckpointManager,
    device:       B::Device,
) -> Result<TrainingReport> {

    // ── Build model ───────────────────────────────────────────────────────────
    B::seed(cfg.seed);
    let model_cfg = cfg.model_config();
    model_cfg.validate()?;
    let model: ImagewoofCnn<B> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: {} parameters, input 3x{}x{}",
        model.num_params(),
        model_cfg.image_size,
        model_cfg.image_size,
    );

    let SplitDatasets { train, valid, test } = datasets;
    let train_len = train.sample_count();
    let valid_len = valid.sample_count();
    let test_len  = test.sample_count();

    // ── Data loaders ──────────────────────────────────────────────────────────
    let train_loader = DataLoaderBuilder::new(ImageBatcher::<B>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(cfg.num_workers)
        .build(train);

    let valid_loader = eval_loader::<B::InnerBackend>(valid, cfg.batch_size, cfg.num_workers, &device);

    // ── Baseline ──────────────────────────────────────────────────────────────
    let initial = evaluate(&model.valid(), valid_loader.as_ref());
    ensure_complete("validation", initial.samples, valid_len)?;
    tracing::info!(
        "Untrained model: val_loss={:.4}, val_acc={:.4}",
        initial.loss,
        initial.accuracy
    );

    // ── Fit ───────────────────────────────────────────────────────────────────
    let (model, history) = fit(
        cfg,
        model,
        train_loader.as_ref(),
        valid_loader.as_ref(),
        (train_len, valid_len),
    )?;

    // ── Test ──────────────────────────────────────────────────────────────────
    let test_loader = eval_loader::<B::InnerBackend>(test, cfg.batch_size, cfg.num_workers, &device);
    let test_result = evaluate(&model.valid(), test_loader.as_ref());
    ensure_complete("test", test_result.samples, test_len)?;
    println!(
        "Final results: test_loss: {:.4}, test_acc: {:.4}",
        test_result.loss, test_result.accuracy
    );

    // ── Save ──────────────────────────────────────────────────────────────────
    println!("\nSaving the model...");
    ckpt_manager.save_model(&model, &model_cfg)?;

    Ok(TrainingReport { initial, history, test: test_result })
}

/// Unshuffled loader on the inner (non-autodiff) backend
pub fn eval_loader<B: Backend>(
    dataset:     ImageDataset,
    batch_size:  usize,
    num_workers: usize,
    device:      &B::Device,
) -> Arc<dyn DataLoader<ImageBatch<B>>> {
    DataLoaderBuilder::new(ImageBatcher::<B>::new(device.clone()))
        .batch_size(batch_size)
        .num_workers(num_workers)
        .build(dataset)
}

/// Train for `cfg.epochs` epochs, evaluating on the validation loader after each.
/// `expected` holds the (train, validation) sample counts each pass must see.
pub fn fit<B: AutodiffBackend>(
    cfg:          &TrainConfig,
    mut model:    ImagewoofCnn<B>,
    train_loader: &dyn DataLoader<ImageBatch<B>>,
    valid_loader: &dyn DataLoader<ImageBatch<B::InnerBackend>>,
    expected:     (usize, usize),
) -> Result<(ImagewoofCnn<B>, Vec<EpochMetrics>)> {

    // ── Adam optimiser ────────────────────────────────────────────────────────
    // m = β1*m + (1-β1)*g        (mean)
    // v = β2*v + (1-β2)*g²       (variance)
    // θ = θ - lr * m / (√v + ε)  (update)
    let mut optim = AdamConfig::new().init::<B, ImagewoofCnn<B>>();
    let mut history = Vec::with_capacity(cfg.epochs);

    for epoch in 1..=cfg.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        let mut train_losses = Vec::new();
        let mut seen         = 0usize;

        for (step, batch) in train_loader.iter().enumerate() {
            seen += batch.num_samples();

            let loss     = model.training_step(batch);
            let loss_val = loss.clone().into_scalar().elem::<f64>();
            ensure!(
                loss_val.is_finite(),
                "Training diverged: loss is {} at epoch {}, batch {}",
                loss_val,
                epoch,
                step + 1
            );
            train_losses.push(loss_val);

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }
        ensure_complete("training", seen, expected.0)?;

        // ── Validation phase ──────────────────────────────────────────────────
        let model_valid = model.valid();
        let result      = evaluate(&model_valid, valid_loader);
        ensure_complete("validation", result.samples, expected.1)?;

        let metrics = EpochMetrics::new(epoch, mean(&train_losses), &result);
        model_valid.epoch_end(&metrics);
        history.push(metrics);
    }

    tracing::info!("Training complete after {} epochs", cfg.epochs);
    Ok((model, history))
}

/// One evaluation pass. The model is on a non-autodiff backend,
/// so no gradients are tracked.
pub fn evaluate<B: Backend, M: ImageClassification<B>>(
    model:  &M,
    loader: &dyn DataLoader<ImageBatch<B>>,
) -> ValidationResult {
    let outputs: Vec<_> = loader
        .iter()
        .map(|batch| model.validation_step(batch))
        .collect();
    model.validation_epoch_end(&outputs)
}

/// The batch iterator stops at the first sample that fails to decode,
/// so a short pass means the split could not be read in full.
fn ensure_complete(phase: &str, seen: usize, expected: usize) -> Result<()> {
    ensure!(
        seen == expected,
        "{} pass saw {} of {} samples; some images could not be decoded",
        phase,
        seen,
        expected
    );
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::build_image_tree;
    use crate::data::loader::ImageFolder;
    use crate::data::transform::ImageTransform;
    use crate::domain::traits::SampleSource;
    use crate::infra::device::CpuBackend;
    use burn::module::Param;

    fn tiny_config() -> TrainConfig {
        TrainConfig {
            epochs:        2,
            batch_size:    4,
            image_size:    32,
            base_channels: 2,
            num_workers:   1,
            device:        DeviceKind::Cpu,
            ..TrainConfig::default()
        }
    }

    fn tiny_dataset(root: &std::path::Path, transform: ImageTransform) -> ImageDataset {
        build_image_tree(root, &["a", "b"], 5, 36);
        let samples = ImageFolder::new(root).load_all().unwrap();
        ImageDataset::new(samples, transform)
    }

    #[test]
    fn test_fit_records_one_entry_per_epoch() {
        let tmp    = tempfile::tempdir().unwrap();
        let cfg    = tiny_config();
        let device = Default::default();

        let train = tiny_dataset(&tmp.path().join("train"), ImageTransform::train(32));
        let valid = tiny_dataset(&tmp.path().join("valid"), ImageTransform::eval(32));
        let lens  = (train.sample_count(), valid.sample_count());

        CpuTrainBackend::seed(cfg.seed);
        let model = cfg.model_config().init::<CpuTrainBackend>(&device);

        let train_loader = DataLoaderBuilder::new(ImageBatcher::<CpuTrainBackend>::new(device.clone()))
            .batch_size(cfg.batch_size)
            .shuffle(cfg.seed)
            .num_workers(1)
            .build(train);
        let valid_loader = eval_loader::<CpuBackend>(valid, cfg.batch_size, 1, &device);

        let (_, history) = fit(&cfg, model, train_loader.as_ref(), valid_loader.as_ref(), lens)
            .unwrap();

        assert_eq!(history.len(), 2);
        for (i, m) in history.iter().enumerate() {
            assert_eq!(m.epoch, i + 1);
            assert!(m.train_loss.is_finite());
            assert!(m.val_loss.is_finite());
            assert!((0.0..=1.0).contains(&m.val_acc));
        }
    }

    #[test]
    fn test_evaluate_covers_every_sample() {
        let tmp    = tempfile::tempdir().unwrap();
        let cfg    = tiny_config();
        let device = Default::default();

        let valid  = tiny_dataset(tmp.path(), ImageTransform::eval(32));
        let model  = cfg.model_config().init::<CpuBackend>(&device);
        let loader = eval_loader::<CpuBackend>(valid, cfg.batch_size, 1, &device);

        let result = evaluate(&model, loader.as_ref());
        // 10 samples in batches of 4 → 3 batches
        assert_eq!(result.samples, 10);
        assert!(result.loss.is_finite());
    }

    #[test]
    fn test_non_finite_loss_aborts_with_epoch_and_batch() {
        let tmp    = tempfile::tempdir().unwrap();
        let cfg    = tiny_config();
        let device = Default::default();

        let train = tiny_dataset(&tmp.path().join("train"), ImageTransform::train(32));
        let valid = tiny_dataset(&tmp.path().join("valid"), ImageTransform::eval(32));
        let lens  = (train.sample_count(), valid.sample_count());

        // NaN output bias makes every logit, and so the loss, NaN
        let mut model = cfg.model_config().init::<CpuTrainBackend>(&device);
        model.head.bias = Some(Param::from_tensor(Tensor::full([10], f32::NAN, &device)));

        let train_loader = DataLoaderBuilder::new(ImageBatcher::<CpuTrainBackend>::new(device.clone()))
            .batch_size(cfg.batch_size)
            .num_workers(1)
            .build(train);
        let valid_loader = eval_loader::<CpuBackend>(valid, cfg.batch_size, 1, &device);

        let err = fit(&cfg, model, train_loader.as_ref(), valid_loader.as_ref(), lens)
            .unwrap_err()
            .to_string();
        assert!(err.contains("Training diverged"));
        assert!(err.contains("epoch 1, batch 1"));
    }

    #[test]
    fn test_short_pass_is_an_error() {
        assert!(ensure_complete("validation", 9, 10).is_err());
        assert!(ensure_complete("validation", 10, 10).is_ok());
    }
}
