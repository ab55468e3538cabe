// ============================================================
// Layer 2 — Evaluate Use Case
// ============================================================
// Reloads a saved model and measures it on the held-out test
// split (`<data_dir>/val`), with the same eval transform and
// per-batch averaging used at the end of training.

use anyhow::{ensure, Result};
use burn::prelude::*;
use std::path::PathBuf;

use crate::data::{dataset::ImageDataset, loader::ImageFolder, transform::ImageTransform};
use crate::domain::{breed, traits::SampleSource};
use crate::infra::{
    checkpoint::CheckpointManager,
    device::{CpuBackend, DeviceKind, GpuBackend},
    metrics::ValidationResult,
};
use crate::ml::trainer::{eval_loader, evaluate};

#[derive(Debug, Clone)]
pub struct EvaluateConfig {
    pub data_dir:       PathBuf,
    pub checkpoint_dir: PathBuf,
    pub batch_size:     usize,
    pub num_workers:    usize,
    pub device:         DeviceKind,
}

pub struct EvaluateUseCase {
    config: EvaluateConfig,
}

impl EvaluateUseCase {
    pub fn new(config: EvaluateConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<ValidationResult> {
        let cfg = &self.config;
        ensure!(cfg.batch_size > 0, "batch_size must be at least 1");
        ensure!(cfg.num_workers > 0, "num_workers must be at least 1");

        match cfg.device {
            DeviceKind::Gpu => self.run::<GpuBackend>(Default::default()),
            DeviceKind::Cpu => self.run::<CpuBackend>(Default::default()),
        }
    }

    fn run<B: Backend>(&self, device: B::Device) -> Result<ValidationResult> {
        let cfg          = &self.config;
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);
        let model_cfg    = ckpt_manager.load_config()?;
        let model        = ckpt_manager.load_model::<B>(&device)?;

        let samples = ImageFolder::new(cfg.data_dir.join("val"))
            .with_classes(&breed::class_dirs())
            .load_all()?;
        let expected = samples.len();

        let dataset = ImageDataset::new(samples, ImageTransform::eval(model_cfg.image_size as u32));
        let loader  = eval_loader::<B>(dataset, cfg.batch_size, cfg.num_workers, &device);
        let result  = evaluate(&model, loader.as_ref());

        ensure!(
            result.samples == expected,
            "Test pass saw {} of {} samples; some images could not be decoded",
            result.samples,
            expected
        );
        tracing::info!("Evaluated {} test images", result.samples);
        Ok(result)
    }
}
