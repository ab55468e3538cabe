// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores the trained classifier.
//
// What gets saved:
//   1. model.mpk          — every learned parameter
//   2. model_config.json  — the architecture (image size,
//                           channel width, number of classes)
//
// The config is needed because Burn records hold weights only:
// to load them, the same model must first be rebuilt from its
// config, then `load_record()` swaps the weights in.
//
// Recorder choice:
//   DefaultFileRecorder = named MessagePack at full precision.
//   Full precision matters: a half-precision recorder would make
//   the reloaded model produce slightly different outputs.
//
// Both files are written together by `save_model` once a run has
// finished, so a run that fails part way leaves the previous
// checkpoint untouched.
//
// File layout:
//   imagewoof/
//     model.mpk
//     model_config.json
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use burn::{
    prelude::*,
    record::{DefaultFileRecorder, FullPrecisionSettings, Recorder},
};
use std::{fs, path::PathBuf};

use crate::ml::model::{ImagewoofCnn, ImagewoofCnnConfig};

const MODEL_FILE:  &str = "model";
const CONFIG_FILE: &str = "model_config.json";

/// Manages saving and loading of the model checkpoint.
/// All files are stored in the configured directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Save model weights, then the config that rebuilds them.
    /// The recorder appends the `.mpk` extension itself.
    pub fn save_model<B: Backend>(
        &self,
        model:  &ImagewoofCnn<B>,
        config: &ImagewoofCnnConfig,
    ) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let path = self.dir.join(MODEL_FILE);

        DefaultFileRecorder::<FullPrecisionSettings>::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| {
                format!("Failed to save model to '{}'", path.display())
            })?;

        tracing::info!("Saved model to '{}.mpk'", path.display());
        self.save_config(config)
    }

    /// Rebuild the model from the saved config and load its weights.
    pub fn load_model<B: Backend>(&self, device: &B::Device) -> Result<ImagewoofCnn<B>> {
        let config = self.load_config()?;
        config.validate()?;

        let path  = self.dir.join(MODEL_FILE);
        let model = config.init::<B>(device);

        let record = DefaultFileRecorder::<FullPrecisionSettings>::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!("Cannot load model '{}.mpk'. Have you trained the model first?",
                    path.display())
            })?;

        tracing::info!("Loaded model from '{}.mpk'", path.display());
        Ok(model.load_record(record))
    }

    /// Save the architecture config as pretty JSON.
    fn save_config(&self, cfg: &ImagewoofCnnConfig) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| {
                format!("Cannot write config to '{}'", path.display())
            })?;

        tracing::debug!("Saved model config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<ImagewoofCnnConfig> {
        let path = self.dir.join(CONFIG_FILE);

        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read config from '{}'. \
                     Make sure you have run 'train' first.",
                    path.display()
                )
            })?;

        serde_json::from_str(&json)
            .with_context(|| format!("Malformed config '{}'", path.display()))
    }
}
