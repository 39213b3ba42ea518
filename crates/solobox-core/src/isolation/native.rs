//! Native isolation provider.
//!
//! On Linux this is `chroot(2)` + `chdir(2)` for the filesystem and
//! `unshare(CLONE_NEWPID)` for the process tree. A handle on the host
//! root is saved before the root change; the restore counter-operation
//! is `fchdir(2)` into that handle followed by `chroot(".")`.

use std::path::{Path, PathBuf};

use solobox_common::error::Result;

use super::IsolationProvider;

/// Platform isolation provider backed by direct syscalls.
#[derive(Debug, Default)]
pub struct NativeIsolation {
    /// Open handle on the host `/`, captured before the root change.
    /// `Some` exactly while the process is isolated.
    host_root: Option<std::fs::File>,
    /// Host working directory at isolation time.
    host_cwd: Option<PathBuf>,
}

impl NativeIsolation {
    /// Creates a provider with no isolation in effect.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(target_os = "linux")]
impl IsolationProvider for NativeIsolation {
    fn isolate_filesystem(&mut self, workspace: &Path) -> Result<()> {
        use solobox_common::error::LaunchError;

        let host_root = std::fs::File::open("/").map_err(|e| LaunchError::Isolation {
            message: format!("cannot open host root: {e}"),
        })?;
        let host_cwd = std::env::current_dir().map_err(|e| LaunchError::Isolation {
            message: format!("cannot read working directory: {e}"),
        })?;

        nix::unistd::chroot(workspace).map_err(|e| LaunchError::Isolation {
            message: format!("chroot to {} failed: {e}", workspace.display()),
        })?;
        nix::unistd::chdir("/").map_err(|e| LaunchError::Isolation {
            message: format!("chdir to new root failed: {e}"),
        })?;

        self.host_root = Some(host_root);
        self.host_cwd = Some(host_cwd);
        tracing::info!(workspace = %workspace.display(), "filesystem root changed");
        Ok(())
    }

    fn isolate_process_tree(&mut self) -> Result<()> {
        use nix::sched::{CloneFlags, unshare};
        use solobox_common::error::LaunchError;

        // The first child forked after this call has PID 1 in the new
        // namespace; the calling process keeps its own PID.
        unshare(CloneFlags::CLONE_NEWPID).map_err(|e| LaunchError::Isolation {
            message: format!("PID namespace creation failed: {e}"),
        })?;
        tracing::info!("PID namespace created");
        Ok(())
    }

    fn restore_root(&mut self) -> Result<()> {
        use solobox_common::error::LaunchError;

        // Taking the handle makes restoration structurally once-only.
        let Some(host_root) = self.host_root.take() else {
            return Ok(());
        };

        nix::unistd::fchdir(&host_root).map_err(|e| LaunchError::Isolation {
            message: format!("fchdir to host root failed: {e}"),
        })?;
        nix::unistd::chroot(".").map_err(|e| LaunchError::Isolation {
            message: format!("chroot back to host root failed: {e}"),
        })?;

        // The saved working directory may be gone; fall back to `/`.
        if let Some(cwd) = self.host_cwd.take() {
            if nix::unistd::chdir(&cwd).is_err() {
                nix::unistd::chdir("/").map_err(|e| LaunchError::Isolation {
                    message: format!("chdir after restore failed: {e}"),
                })?;
            }
        }

        tracing::info!("host root restored");
        Ok(())
    }
}

/// Stub for non-Linux platforms.
///
/// Every operation fails — root-change and PID-namespace isolation
/// require the Linux kernel.
#[cfg(not(target_os = "linux"))]
impl IsolationProvider for NativeIsolation {
    fn isolate_filesystem(&mut self, _workspace: &Path) -> Result<()> {
        Err(solobox_common::error::LaunchError::Isolation {
            message: "Linux required for filesystem isolation".into(),
        })
    }

    fn isolate_process_tree(&mut self) -> Result<()> {
        Err(solobox_common::error::LaunchError::Isolation {
            message: "Linux required for PID namespace isolation".into(),
        })
    }

    fn restore_root(&mut self) -> Result<()> {
        Ok(())
    }
}
