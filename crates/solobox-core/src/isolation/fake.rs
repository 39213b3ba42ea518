//! Recording isolation provider for tests.

use std::path::{Path, PathBuf};

use solobox_common::error::{LaunchError, Result};

use super::IsolationProvider;

/// Test double that records isolation calls instead of performing them.
///
/// Failure toggles let tests inject an OS rejection at either step.
#[derive(Debug, Default)]
pub struct FakeIsolation {
    /// Workspace passed to `isolate_filesystem`, if it ran.
    pub isolated_path: Option<PathBuf>,
    /// Whether `isolate_process_tree` ran.
    pub pid_namespaced: bool,
    /// Number of `restore_root` calls.
    pub restore_calls: u32,
    /// Makes `isolate_filesystem` fail.
    pub fail_filesystem: bool,
    /// Makes `isolate_process_tree` fail.
    pub fail_process_tree: bool,
}

impl FakeIsolation {
    /// Creates a fake provider that succeeds at every step.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IsolationProvider for FakeIsolation {
    fn isolate_filesystem(&mut self, workspace: &Path) -> Result<()> {
        if self.fail_filesystem {
            return Err(LaunchError::Isolation {
                message: "injected filesystem isolation failure".into(),
            });
        }
        self.isolated_path = Some(workspace.to_path_buf());
        Ok(())
    }

    fn isolate_process_tree(&mut self) -> Result<()> {
        if self.fail_process_tree {
            return Err(LaunchError::Isolation {
                message: "injected PID namespace failure".into(),
            });
        }
        self.pid_namespaced = true;
        Ok(())
    }

    fn restore_root(&mut self) -> Result<()> {
        self.restore_calls += 1;
        Ok(())
    }
}
