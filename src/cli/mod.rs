// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, built on `clap`.
// All business logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `train` — fine-tunes the classifier, then evaluates the
//                best checkpoint on the test split
//   2. `eval`  — re-evaluates a saved best checkpoint
//
// Reference: Rust Book §12 (CLI programs)

// Declare the commands submodule
pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, TrainArgs, EvalArgs};

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "sentence-classifier",
    version = "0.1.0",
    about = "Fine-tune a pretrained transformer encoder for sentence classification."
)]
pub struct Cli {
    /// The subcommand to run (train or eval)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    /// This keeps the CLI layer thin — it only routes, never computes.
    pub fn run(self) -> Result<()> {
        match &self.command {
            Commands::Train(args) => self.run_train(args.clone()),
            Commands::Eval(args)  => self.run_eval(args.clone()),
        }
    }

    /// Handles the `train` subcommand.
    /// Converts CLI args into a TrainConfig and hands off to Layer 2.
    fn run_train(&self, args: TrainArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        tracing::info!("Starting fine-tuning run from bundle '{}'", args.plm_dir);

        let use_case = TrainUseCase::new(args.into());
        let outcome  = use_case.execute()?;

        println!(
            "Run complete. best val_acc={:.4}, test_acc={:.4}",
            outcome.best_val_acc, outcome.test_acc
        );
        Ok(())
    }

    /// Handles the `eval` subcommand.
    /// Restores the best checkpoint and prints the test report.
    fn run_eval(&self, args: EvalArgs) -> Result<()> {
        use crate::application::eval_use_case::EvalUseCase;

        let use_case = EvalUseCase::new(args.checkpoint_dir);
        let outcome  = use_case.execute()?;

        println!("\nTest Accuracy = {:.4}\n", outcome.test_acc);
        println!("{}", outcome.report);
        Ok(())
    }
}
