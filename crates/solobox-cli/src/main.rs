//! # sbx — solobox CLI
//!
//! Single-shot container launcher: pulls an image, isolates a root
//! filesystem and PID namespace, runs one command, and exits with the
//! command's own status.

mod commands;

use clap::Parser;

use crate::commands::Cli;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    std::process::exit(commands::execute(cli));
}
