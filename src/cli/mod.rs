// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap and delegates all work to Layer 2 (application).
//
// Three commands are supported:
//   1. `train`    — trains the classifier and saves it
//   2. `evaluate` — reloads the model and scores the test split
//   3. `predict`  — reloads the model and names one image's breed
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EvaluateArgs, PredictArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "imagewoof-cnn",
    version,
    about = "Train a convolutional dog-breed classifier on Imagewoof, then use it."
)]
pub struct Cli {
    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)    => Self::run_train(args),
            Commands::Evaluate(args) => Self::run_evaluate(args),
            Commands::Predict(args)  => Self::run_predict(args),
        }
    }

    fn run_train(args: TrainArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        tracing::info!("Starting training on images in: {}", args.data_dir.display());
        TrainUseCase::new(args.into()).execute()?;
        Ok(())
    }

    fn run_evaluate(args: EvaluateArgs) -> Result<()> {
        use crate::application::evaluate_use_case::EvaluateUseCase;

        let result = EvaluateUseCase::new(args.into()).execute()?;
        println!(
            "Test results: test_loss: {:.4}, test_acc: {:.4}",
            result.loss, result.accuracy
        );
        Ok(())
    }

    fn run_predict(args: PredictArgs) -> Result<()> {
        use crate::application::predict_use_case::PredictUseCase;

        let use_case   = PredictUseCase::new(args.checkpoint_dir, args.device.into());
        let prediction = use_case.predict(&args.image)?;
        println!(
            "{}: {} (class {}, {:.1}%)",
            args.image.display(),
            prediction.breed,
            prediction.label,
            prediction.probability * 100.0
        );
        Ok(())
    }
}
