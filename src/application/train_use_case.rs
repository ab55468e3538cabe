// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Index data/…/train and data/…/val   (Layer 4 - data)
//   Step 2: Seeded train/validation split        (Layer 4 - data)
//   Step 3: Wrap splits in Burn datasets         (Layer 4 - data)
//   Step 4: Train, test, save the checkpoint     (Layer 5 - ml)
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::{ensure, Result};
use std::path::PathBuf;

use crate::data::{
    loader::ImageFolder,
    splitter::split_train_val,
    dataset::ImageDataset,
    transform::ImageTransform,
};
use crate::domain::{breed, sample::ImageSample, traits::SampleSource};
use crate::infra::{
    checkpoint::CheckpointManager,
    device::{default_num_workers, DeviceKind},
    metrics::best_epoch,
};
use crate::ml::model::ImagewoofCnnConfig;
use crate::ml::trainer::{run_training, SplitDatasets, TrainingReport};

// ─── Training Configuration ──────────────────────────────────────────────────
// Every knob of a run, threaded from the CLI into the pipeline.
// The defaults reproduce the reference Imagewoof run.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Extracted dataset root containing `train/` and `val/`
    pub data_dir:       PathBuf,
    pub checkpoint_dir: PathBuf,
    pub epochs:         usize,
    pub batch_size:     usize,
    pub lr:             f64,
    /// Share of `train/` used for training; the rest validates
    pub train_fraction: f64,
    /// Seeds weight init, the split, and the loader shuffle
    pub seed:           u64,
    pub image_size:     usize,
    pub base_channels:  usize,
    pub num_workers:    usize,
    pub device:         DeviceKind,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_dir:       PathBuf::from("data/imagewoof-160"),
            checkpoint_dir: PathBuf::from("imagewoof"),
            epochs:         15,
            batch_size:     64,
            lr:             1e-4,
            train_fraction: 0.95,
            seed:           42,
            image_size:     160,
            base_channels:  64,
            num_workers:    default_num_workers(),
            device:         DeviceKind::Gpu,
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.epochs > 0, "epochs must be at least 1");
        ensure!(self.batch_size > 0, "batch_size must be at least 1");
        ensure!(self.num_workers > 0, "num_workers must be at least 1");
        ensure!(
            self.train_fraction > 0.0 && self.train_fraction <= 1.0,
            "train_fraction must be in (0, 1], got {}",
            self.train_fraction
        );
        ensure!(self.lr > 0.0, "learning rate must be positive");
        self.model_config().validate()
    }

    pub fn model_config(&self) -> ImagewoofCnnConfig {
        ImagewoofCnnConfig::new()
            .with_num_classes(breed::NUM_CLASSES)
            .with_image_size(self.image_size)
            .with_base_channels(self.base_channels)
    }

    pub fn train_dir(&self) -> PathBuf { self.data_dir.join("train") }

    pub fn test_dir(&self) -> PathBuf { self.data_dir.join("val") }
}

/// Indexed samples for the three splits
#[derive(Debug, Clone)]
pub struct SampleSplits {
    pub train: Vec<ImageSample>,
    pub valid: Vec<ImageSample>,
    pub test:  Vec<ImageSample>,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainingReport> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Steps 1-2: Index and split ───────────────────────────────────────
        let splits = self.index_splits()?;
        println!("Number of training examples: {}", splits.train.len());
        println!("Number of validation examples: {}", splits.valid.len());

        // ── Step 3: Build Burn datasets ───────────────────────────────────────
        // Training samples are augmented; everything else is resized only
        let size     = cfg.image_size as u32;
        let datasets = SplitDatasets {
            train: ImageDataset::new(splits.train, ImageTransform::train(size)),
            valid: ImageDataset::new(splits.valid, ImageTransform::eval(size)),
            test:  ImageDataset::new(splits.test,  ImageTransform::eval(size)),
        };

        // ── Step 4: Run training loop (Layer 5) ───────────────────────────────
        // Weights and config are written together only after the test pass
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);
        let report = run_training(cfg, datasets, &ckpt_manager)?;

        if let Some(last) = report.history.last() {
            tracing::info!(
                "Validation accuracy {:.4} untrained → {:.4} after {} epochs; test accuracy {:.4}",
                report.initial.accuracy,
                last.val_acc,
                last.epoch,
                report.test.accuracy
            );
        }
        if let Some(best) = best_epoch(&report.history) {
            tracing::info!(
                "Best validation accuracy {:.4} at epoch {}",
                best.val_acc,
                best.epoch
            );
        }
        Ok(report)
    }

    /// Index `train/` and `val/` and split `train/` into train/validation.
    pub fn index_splits(&self) -> Result<SampleSplits> {
        let cfg     = &self.config;
        let classes = breed::class_dirs();

        tracing::info!("Indexing images under '{}'", cfg.data_dir.display());
        let full = ImageFolder::new(cfg.train_dir()).with_classes(&classes).load_all()?;
        let test = ImageFolder::new(cfg.test_dir()).with_classes(&classes).load_all()?;

        let (train, valid) = split_train_val(full, cfg.train_fraction, cfg.seed);
        ensure!(!train.is_empty(), "Training split is empty");

        tracing::info!(
            "Split: {} train, {} validation, {} test",
            train.len(),
            valid.len(),
            test.len()
        );
        Ok(SampleSplits { train, valid, test })
    }
}
