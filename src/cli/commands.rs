// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `train`, `evaluate`, `predict`
// and all their configurable flags.
//
// Every default matches the reference Imagewoof run, so plain
// `imagewoof-cnn train` needs no flags at all.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::application::evaluate_use_case::EvaluateConfig;
use crate::application::train_use_case::TrainConfig;
use crate::infra::device::{default_num_workers, DeviceKind};

/// The top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the classifier on the extracted Imagewoof dataset
    Train(TrainArgs),

    /// Measure a saved model on the test split
    Evaluate(EvaluateArgs),

    /// Classify a single image with a saved model
    Predict(PredictArgs),
}

/// Which backend to run on
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum DeviceArg {
    /// wgpu (Vulkan / Metal / DX12)
    Gpu,
    /// ndarray, pure Rust
    Cpu,
}

impl From<DeviceArg> for DeviceKind {
    fn from(d: DeviceArg) -> Self {
        match d {
            DeviceArg::Gpu => DeviceKind::Gpu,
            DeviceArg::Cpu => DeviceKind::Cpu,
        }
    }
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Extracted dataset root containing `train/` and `val/`
    #[arg(long, default_value = "data/imagewoof-160")]
    pub data_dir: PathBuf,

    /// Directory the trained model is written to (overwritten)
    #[arg(long, default_value = "imagewoof")]
    pub checkpoint_dir: PathBuf,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 15)]
    pub epochs: usize,

    /// Number of images per minibatch
    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-4)]
    pub lr: f64,

    /// Share of `train/` used for training; the rest is validation
    #[arg(long, default_value_t = 0.95)]
    pub train_fraction: f64,

    /// Seed for weight init, the train/validation split and shuffling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Side length images are cropped to (multiple of 32)
    #[arg(long, default_value_t = 160)]
    pub image_size: usize,

    /// Channels of the first convolution; later layers scale from it
    #[arg(long, default_value_t = 64)]
    pub base_channels: usize,

    /// Data loader worker threads [default: one per CPU]
    #[arg(long)]
    pub num_workers: Option<usize>,

    #[arg(long, value_enum, default_value_t = DeviceArg::Gpu)]
    pub device: DeviceArg,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_dir:       a.data_dir,
            checkpoint_dir: a.checkpoint_dir,
            epochs:         a.epochs,
            batch_size:     a.batch_size,
            lr:             a.lr,
            train_fraction: a.train_fraction,
            seed:           a.seed,
            image_size:     a.image_size,
            base_channels:  a.base_channels,
            num_workers:    a.num_workers.unwrap_or_else(default_num_workers),
            device:         a.device.into(),
        }
    }
}

/// All arguments for the `evaluate` command
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    #[arg(long, default_value = "data/imagewoof-160")]
    pub data_dir: PathBuf,

    #[arg(long, default_value = "imagewoof")]
    pub checkpoint_dir: PathBuf,

    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    #[arg(long)]
    pub num_workers: Option<usize>,

    #[arg(long, value_enum, default_value_t = DeviceArg::Gpu)]
    pub device: DeviceArg,
}

impl From<EvaluateArgs> for EvaluateConfig {
    fn from(a: EvaluateArgs) -> Self {
        EvaluateConfig {
            data_dir:       a.data_dir,
            checkpoint_dir: a.checkpoint_dir,
            batch_size:     a.batch_size,
            num_workers:    a.num_workers.unwrap_or_else(default_num_workers),
            device:         a.device.into(),
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Image file to classify
    #[arg(long)]
    pub image: PathBuf,

    #[arg(long, default_value = "imagewoof")]
    pub checkpoint_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = DeviceArg::Gpu)]
    pub device: DeviceArg,
}
