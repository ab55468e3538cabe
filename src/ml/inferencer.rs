// ============================================================
// Layer 5 — Inferencer
// ============================================================
use anyhow::{anyhow, Result};
use burn::{prelude::*, tensor::activation::softmax};
use std::path::Path;

use crate::data::transform::ImageTransform;
use crate::domain::breed::breed_name;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::ImagewoofCnn;

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label:       usize,
    pub breed:       String,
    /// Softmax probability of `label`
    pub probability: f64,
}

pub struct Inferencer<B: Backend> {
    model:     ImagewoofCnn<B>,
    transform: ImageTransform,
    device:    B::Device,
}

impl<B: Backend> Inferencer<B> {
    pub fn new(model: ImagewoofCnn<B>, image_size: usize, device: B::Device) -> Self {
        Self { model, transform: ImageTransform::eval(image_size as u32), device }
    }

    pub fn from_checkpoint(ckpt_manager: &CheckpointManager, device: B::Device) -> Result<Self> {
        let cfg   = ckpt_manager.load_config()?;
        let model = ckpt_manager.load_model::<B>(&device)?;
        Ok(Self::new(model, cfg.image_size, device))
    }

    pub fn predict(&self, path: &Path) -> Result<Prediction> {
        let pixels = self.transform.load(path)?;
        let side   = self.transform.image_size as usize;

        let images = Tensor::<B, 1>::from_floats(pixels.as_slice(), &self.device)
            .reshape([1, 3, side, side]);
        let probs  = softmax(self.model.forward(images), 1)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("Cannot read model output: {:?}", e))?;

        let (label, probability) = probs
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .ok_or_else(|| anyhow!("Model produced no class scores"))?;

        let breed = breed_name(label)
            .map(str::to_string)
            .unwrap_or_else(|| format!("class {label}"));

        tracing::debug!("Predicted {} ({:.3}) for '{}'", breed, probability, path.display());
        Ok(Prediction { label, breed, probability: probability as f64 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::write_png;
    use crate::infra::device::CpuBackend;
    use crate::ml::model::ImagewoofCnnConfig;

    #[test]
    fn test_predict_returns_known_breed() {
        let tmp  = tempfile::tempdir().unwrap();
        let path = tmp.path().join("dog.png");
        write_png(&path, 40, 48, [120, 80, 40]);

        let device = Default::default();
        let model  = ImagewoofCnnConfig::new()
            .with_image_size(32)
            .with_base_channels(2)
            .init::<CpuBackend>(&device);

        let pred = Inferencer::new(model, 32, device).predict(&path).unwrap();
        assert!(pred.label < 10);
        assert_eq!(Some(pred.breed.as_str()), breed_name(pred.label));
        assert!(pred.probability > 0.0 && pred.probability <= 1.0);
    }

    #[test]
    fn test_missing_image_is_an_error() {
        let device = Default::default();
        let model  = ImagewoofCnnConfig::new()
            .with_image_size(32)
            .with_base_channels(2)
            .init::<CpuBackend>(&device);

        let inf = Inferencer::new(model, 32, device);
        assert!(inf.predict(Path::new("/definitely/not/here.png")).is_err());
    }
}
