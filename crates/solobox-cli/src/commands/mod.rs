//! CLI command definitions and dispatch.

pub mod run;

use clap::{Parser, Subcommand};

/// solobox — single-shot container launcher.
#[derive(Parser, Debug)]
#[command(name = "sbx", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Pull an image, run one command inside it, and exit with its status.
    Run(run::RunArgs),
}

/// Dispatches the parsed CLI command and returns the process exit code.
#[must_use]
pub fn execute(cli: Cli) -> i32 {
    match cli.command {
        Command::Run(args) => run::execute(&args),
    }
}
