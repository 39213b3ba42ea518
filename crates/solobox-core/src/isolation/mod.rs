//! Isolation capability boundary.
//!
//! All platform-specific syscall interaction lives behind the narrow
//! [`IsolationProvider`] trait, one implementation per target platform,
//! so higher layers can be tested with a fake provider.

pub mod fake;
pub mod native;

use std::path::Path;

use solobox_common::error::Result;

/// Capability interface for filesystem-root and process-tree isolation.
///
/// Required call order: [`isolate_filesystem`](Self::isolate_filesystem)
/// strictly before [`isolate_process_tree`](Self::isolate_process_tree),
/// both before spawning the target command, and
/// [`restore_root`](Self::restore_root) exactly once on every exit path.
pub trait IsolationProvider {
    /// Changes the process root to `workspace` and the working directory
    /// to the new `/`. Irreversible from within the process except via
    /// [`restore_root`](Self::restore_root).
    ///
    /// # Errors
    ///
    /// Returns an isolation error if the OS rejects either operation,
    /// commonly for insufficient privilege.
    fn isolate_filesystem(&mut self, workspace: &Path) -> Result<()>;

    /// Requests a new PID namespace for subsequently spawned processes;
    /// the next spawned child becomes PID 1 within it. The calling
    /// process's own PID is unaffected.
    ///
    /// # Errors
    ///
    /// Returns an isolation error if the OS rejects the request
    /// (unsupported platform, missing privilege, already namespaced).
    fn isolate_process_tree(&mut self) -> Result<()>;

    /// Restores the host root and working directory saved before
    /// isolation. A no-op `Ok` when filesystem isolation never ran.
    ///
    /// # Errors
    ///
    /// Returns an isolation error if the saved root cannot be re-entered.
    fn restore_root(&mut self) -> Result<()>;
}

/// Returns the isolation provider for the current platform.
#[must_use]
pub fn native_provider() -> native::NativeIsolation {
    native::NativeIsolation::new()
}
