//! Unified error types for the solobox workspace.
//!
//! The launcher treats error kinds as a closed set: each pipeline stage
//! produces exactly one variant, nothing is retried or recovered locally,
//! and the orchestrator reconciles them once into a process exit code.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The registry auth service refused or returned a malformed token.
    #[error("auth error: {message}")]
    Auth {
        /// Description of the auth failure.
        message: String,
    },

    /// The manifest could not be fetched or decoded.
    #[error("manifest error: {message}")]
    Manifest {
        /// Description of the manifest failure.
        message: String,
    },

    /// A layer blob could not be fetched, or failed digest verification.
    #[error("layer fetch error for {digest}: {message}")]
    LayerFetch {
        /// Digest of the layer that failed.
        digest: String,
        /// Description of the fetch failure.
        message: String,
    },

    /// A layer archive could not be extracted into the workspace.
    #[error("extraction error for {digest}: {message}")]
    Extraction {
        /// Digest of the layer that failed to extract.
        digest: String,
        /// Description of the extraction failure.
        message: String,
    },

    /// Filesystem-root or PID-namespace isolation was rejected by the OS.
    #[error("isolation error: {message}")]
    Isolation {
        /// Description of the isolation failure.
        message: String,
    },

    /// The target command could not be started at all.
    ///
    /// Distinct from a child that starts and exits non-zero, which is a
    /// successful run carrying a non-zero status.
    #[error("spawn error for {command}: {source}")]
    Spawn {
        /// Command path that failed to start.
        command: String,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// A host filesystem operation failed outside layer extraction.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Catch-all for failures with no dedicated category.
    #[error("unexpected error: {message}")]
    Unexpected {
        /// Description of the failure.
        message: String,
    },
}

impl LaunchError {
    /// Returns the stage category this error belongs to, for log prefixes.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Auth { .. } => "auth",
            Self::Manifest { .. } => "manifest",
            Self::LayerFetch { .. } => "layer-fetch",
            Self::Extraction { .. } => "extraction",
            Self::Isolation { .. } => "isolation",
            Self::Spawn { .. } => "spawn",
            Self::Io { .. } => "io",
            Self::Unexpected { .. } => "unexpected",
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, LaunchError>;
