//! Workspace allocation and ordered layer extraction.
//!
//! The workspace is a uniquely named directory under the configured
//! scratch root. It is owned by exactly one run, becomes the child's
//! filesystem root at isolation time, and is removed best-effort when
//! dropped after the host root has been restored.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use solobox_common::config::LaunchConfig;
use solobox_common::constants::WORKSPACE_PREFIX;
use solobox_common::error::{LaunchError, Result};
use solobox_common::types::RunId;

use crate::manifest::LayerDescriptor;

/// The ephemeral directory that becomes the isolated root filesystem.
#[derive(Debug)]
pub struct Workspace {
    id: RunId,
    dir: tempfile::TempDir,
}

impl Workspace {
    /// Returns the workspace root path.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Returns the run identifier this workspace belongs to.
    #[must_use]
    pub fn id(&self) -> &RunId {
        &self.id
    }
}

/// Allocates workspaces and materializes image layers into them.
#[derive(Debug)]
pub struct FilesystemPreparer {
    scratch_dir: PathBuf,
}

impl FilesystemPreparer {
    /// Creates a preparer rooted at the configured scratch directory.
    #[must_use]
    pub fn new(config: &LaunchConfig) -> Self {
        Self {
            scratch_dir: config.scratch_dir.clone(),
        }
    }

    /// Allocates a fresh, empty, uniquely named workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn create_workspace(&self) -> Result<Workspace> {
        let id = RunId::generate();
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(&self.scratch_dir)
            .map_err(|e| LaunchError::Io {
                path: self.scratch_dir.clone(),
                source: e,
            })?;
        tracing::info!(run = %id, workspace = %dir.path().display(), "workspace created");
        Ok(Workspace { id, dir })
    }

    /// Extracts one layer archive into the workspace root, overwriting
    /// any paths already present from earlier layers.
    ///
    /// Gzip-compressed layers are detected by their magic bytes, so both
    /// `…diff.tar` and `…diff.tar.gzip` media types extract correctly.
    ///
    /// # Errors
    ///
    /// Returns an extraction error if the archive is corrupt or an entry
    /// cannot be written. No partial layer state is a defined success.
    pub fn apply_layer(
        &self,
        workspace: &Workspace,
        layer: &LayerDescriptor,
        bytes: &[u8],
    ) -> Result<()> {
        tracing::debug!(
            digest = %layer.digest,
            target = %workspace.root().display(),
            "extracting layer"
        );

        let unpack = if is_gzip(bytes) {
            let decoder = flate2::read::GzDecoder::new(Cursor::new(bytes));
            tar::Archive::new(decoder).unpack(workspace.root())
        } else {
            tar::Archive::new(Cursor::new(bytes)).unpack(workspace.root())
        };
        unpack.map_err(|e| LaunchError::Extraction {
            digest: layer.digest.clone(),
            message: e.to_string(),
        })?;

        tracing::info!(digest = %layer.digest, "layer extracted");
        Ok(())
    }

    /// Copies the target command binary into the workspace at the same
    /// path, so it resolves after the root change.
    ///
    /// A binary already shipped by a layer is simply overwritten with an
    /// identical file.
    ///
    /// # Errors
    ///
    /// Returns an error if the binary cannot be read or copied.
    pub fn stage_command(&self, workspace: &Workspace, command: &Path) -> Result<()> {
        let relative = command.strip_prefix("/").unwrap_or(command);
        let dest = workspace.root().join(relative);

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| LaunchError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let _ = std::fs::copy(command, &dest).map_err(|e| LaunchError::Io {
            path: command.to_path_buf(),
            source: e,
        })?;

        tracing::debug!(command = %command.display(), staged = %dest.display(), "command staged");
        Ok(())
    }
}

/// Checks for the gzip magic bytes.
fn is_gzip(bytes: &[u8]) -> bool {
    bytes.starts_with(&[0x1f, 0x8b])
}
