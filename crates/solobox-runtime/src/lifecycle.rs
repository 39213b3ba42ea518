//! Launcher lifecycle orchestration.
//!
//! A strictly linear state machine:
//!
//! ```text
//! Init → Authenticated → ManifestFetched → WorkspacePrepared
//!      → Isolated → Executed → Restored → Terminated
//! ```
//!
//! Any failure at any stage jumps straight to `Restored` — the host root
//! is restored exactly once on every exit path — and then `Terminated`
//! with a mapped exit code.

use std::fmt;
use std::path::Path;

use solobox_common::config::LaunchConfig;
use solobox_common::constants::GENERIC_FAILURE_CODE;
use solobox_common::error::{LaunchError, Result};
use solobox_common::types::ImageReference;
use solobox_core::isolation::IsolationProvider;
use solobox_image::prepare::{FilesystemPreparer, Workspace};
use solobox_image::registry::RegistryClient;

use crate::executor::{self, ChildResult};

/// Stages of a launcher run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nothing has happened yet.
    Init,
    /// Pull token acquired.
    Authenticated,
    /// Manifest fetched and decoded.
    ManifestFetched,
    /// All layers extracted and the command staged.
    WorkspacePrepared,
    /// Root changed and PID namespace created.
    Isolated,
    /// Target command ran to termination.
    Executed,
    /// Host root restored.
    Restored,
    /// Terminal state; the exit code is decided.
    Terminated,
}

impl Stage {
    /// Position in the linear order, for transition checking.
    const fn rank(self) -> u8 {
        match self {
            Self::Init => 0,
            Self::Authenticated => 1,
            Self::ManifestFetched => 2,
            Self::WorkspacePrepared => 3,
            Self::Isolated => 4,
            Self::Executed => 5,
            Self::Restored => 6,
            Self::Terminated => 7,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::Authenticated => "authenticated",
            Self::ManifestFetched => "manifest-fetched",
            Self::WorkspacePrepared => "workspace-prepared",
            Self::Isolated => "isolated",
            Self::Executed => "executed",
            Self::Restored => "restored",
            Self::Terminated => "terminated",
        };
        write!(f, "{name}")
    }
}

/// Final outcome of a run, reconciled once at the orchestrator boundary.
#[derive(Debug)]
pub enum Outcome {
    /// The child ran to termination with the given status.
    ChildExited(i32),
    /// A pre-execution stage (or restoration) failed.
    Failed(LaunchError),
}

impl Outcome {
    /// Maps the outcome to a process exit code.
    ///
    /// A child status greater than zero passes through exactly; a zero
    /// status exits zero; any launcher failure exits with the fixed
    /// generic failure code.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::ChildExited(status) if *status > 0 => *status,
            Self::ChildExited(_) => 0,
            Self::Failed(_) => GENERIC_FAILURE_CODE,
        }
    }
}

/// Sequences one launcher run from image pull to exit-code mapping.
pub struct Orchestrator<P: IsolationProvider> {
    registry: RegistryClient,
    preparer: FilesystemPreparer,
    provider: P,
    stage: Stage,
}

impl<P: IsolationProvider> Orchestrator<P> {
    /// Creates an orchestrator from the run configuration and an
    /// isolation provider.
    #[must_use]
    pub fn new(config: &LaunchConfig, provider: P) -> Self {
        Self {
            registry: RegistryClient::new(config),
            preparer: FilesystemPreparer::new(config),
            provider,
            stage: Stage::Init,
        }
    }

    /// Returns the current stage.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Returns the isolation provider.
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Runs the full pipeline for one image and command.
    ///
    /// Root restoration is unconditional: it is attempted exactly once
    /// whether the pipeline succeeded, failed at any stage, or the child
    /// reported a non-zero status. The workspace is released only after
    /// the host view of the filesystem is back.
    pub fn launch(&mut self, image: &ImageReference, command: &Path, args: &[String]) -> Outcome {
        let mut workspace = None;

        let run = self.pipeline(image, command, args, &mut workspace);
        let stage_reached = self.stage;
        let restore = self.provider.restore_root();
        self.stage = Stage::Restored;

        // Best-effort removal, now resolvable on the host again.
        drop(workspace);

        let outcome = match run {
            Ok(result) => match restore {
                Ok(()) => Outcome::ChildExited(result.status),
                Err(restore_err) => Outcome::Failed(restore_err),
            },
            Err(run_err) => {
                if let Err(restore_err) = restore {
                    tracing::error!(error = %restore_err, "root restoration also failed");
                }
                tracing::error!(
                    category = run_err.category(),
                    error = %run_err,
                    stage = %stage_reached,
                    "run failed"
                );
                Outcome::Failed(run_err)
            }
        };

        self.stage = Stage::Terminated;
        outcome
    }

    /// The sequential happy path; the first error aborts it.
    fn pipeline(
        &mut self,
        image: &ImageReference,
        command: &Path,
        args: &[String],
        workspace_slot: &mut Option<Workspace>,
    ) -> Result<ChildResult> {
        let token = self.registry.authenticate(image)?;
        self.advance(Stage::Authenticated);

        let manifest = self.registry.fetch_manifest(&token, image)?;
        self.advance(Stage::ManifestFetched);

        let workspace = self.preparer.create_workspace()?;
        for layer in &manifest.layers {
            let bytes = self.registry.fetch_layer(&token, image, layer)?;
            self.preparer.apply_layer(&workspace, layer, &bytes)?;
        }
        self.preparer.stage_command(&workspace, command)?;
        let root = workspace.root().to_path_buf();
        *workspace_slot = Some(workspace);
        self.advance(Stage::WorkspacePrepared);

        // Filesystem isolation strictly precedes process-tree isolation,
        // and both precede the spawn, so the command path resolves
        // against the new root.
        self.provider.isolate_filesystem(&root)?;
        self.provider.isolate_process_tree()?;
        self.advance(Stage::Isolated);

        let result = executor::run(command, args)?;
        self.advance(Stage::Executed);

        executor::relay(&result);
        Ok(result)
    }

    /// Moves to the next stage; transitions must follow the linear order.
    fn advance(&mut self, next: Stage) {
        debug_assert!(
            next.rank() == self.stage.rank() + 1,
            "non-linear stage transition: {} -> {next}",
            self.stage
        );
        tracing::debug!(from = %self.stage, to = %next, "stage transition");
        self.stage = next;
    }
}
