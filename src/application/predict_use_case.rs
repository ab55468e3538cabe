// ============================================================
// Layer 2 — Predict Use Case
// ============================================================
// Loads the saved model once and classifies one image file.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::infra::{
    checkpoint::CheckpointManager,
    device::{CpuBackend, DeviceKind, GpuBackend},
};
use crate::ml::inferencer::{Inferencer, Prediction};

pub struct PredictUseCase {
    checkpoint_dir: PathBuf,
    device:         DeviceKind,
}

impl PredictUseCase {
    pub fn new(checkpoint_dir: impl Into<PathBuf>, device: DeviceKind) -> Self {
        Self { checkpoint_dir: checkpoint_dir.into(), device }
    }

    pub fn predict(&self, image: &Path) -> Result<Prediction> {
        let ckpt = CheckpointManager::new(&self.checkpoint_dir);
        match self.device {
            DeviceKind::Gpu => Inferencer::<GpuBackend>::from_checkpoint(&ckpt, Default::default())?.predict(image),
            DeviceKind::Cpu => Inferencer::<CpuBackend>::from_checkpoint(&ckpt, Default::default())?.predict(image),
        }
    }
}
