//! `sbx run` — pull, isolate, execute, and propagate the exit status.

use std::path::PathBuf;

use clap::Args;

use solobox_common::config::LaunchConfig;
use solobox_common::constants::GENERIC_FAILURE_CODE;
use solobox_common::types::ImageReference;
use solobox_core::isolation;
use solobox_runtime::lifecycle::{Orchestrator, Outcome};

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Image to pull, e.g. `alpine` or `library/alpine:3.19`.
    pub image: String,

    /// Absolute path of the command to run inside the container.
    pub command: PathBuf,

    /// Arguments passed through verbatim to the command.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Scratch directory for the ephemeral root filesystem.
    #[arg(long, env = "SOLOBOX_SCRATCH_DIR")]
    pub scratch_dir: Option<PathBuf>,

    /// Registry base URL override.
    #[arg(long, env = "SOLOBOX_REGISTRY_URL")]
    pub registry_url: Option<String>,

    /// Auth service token URL override.
    #[arg(long, env = "SOLOBOX_AUTH_URL")]
    pub auth_url: Option<String>,
}

/// Executes the `run` command and returns the process exit code:
/// the child's own status when it ran, the generic failure code for
/// any failure before the child ran.
#[must_use]
pub fn execute(args: &RunArgs) -> i32 {
    let image = match ImageReference::parse(&args.image) {
        Ok(image) => image,
        Err(err) => {
            eprintln!("sbx: [{}] {err}", err.category());
            return GENERIC_FAILURE_CODE;
        }
    };

    let mut config = LaunchConfig::default();
    if let Some(dir) = &args.scratch_dir {
        config.scratch_dir.clone_from(dir);
    }
    if let Some(url) = &args.registry_url {
        config.registry_url.clone_from(url);
    }
    if let Some(url) = &args.auth_url {
        config.auth_url.clone_from(url);
    }

    tracing::info!(%image, command = %args.command.display(), "starting run");

    let mut orchestrator = Orchestrator::new(&config, isolation::native_provider());
    let outcome = orchestrator.launch(&image, &args.command, &args.args);

    if let Outcome::Failed(err) = &outcome {
        eprintln!("sbx: [{}] {err}", err.category());
    }
    outcome.exit_code()
}
