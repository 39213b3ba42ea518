//! Launcher configuration model.
//!
//! Every component takes a `LaunchConfig` at construction instead of
//! reading ambient globals, so tests can point the registry endpoints
//! and scratch directory anywhere they like.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for a single launcher run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// Base URL of the registry API (`/v2/...` is appended).
    pub registry_url: String,
    /// Token endpoint of the auth service.
    pub auth_url: String,
    /// Service name presented in the token request.
    pub auth_service: String,
    /// Accept header value for manifest requests.
    pub manifest_accept: String,
    /// Directory under which per-run workspaces are allocated.
    pub scratch_dir: PathBuf,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            registry_url: crate::constants::REGISTRY_URL.into(),
            auth_url: crate::constants::AUTH_URL.into(),
            auth_service: crate::constants::AUTH_SERVICE.into(),
            manifest_accept: crate::constants::MANIFEST_ACCEPT_HEADER.into(),
            scratch_dir: PathBuf::from(crate::constants::DEFAULT_SCRATCH_DIR),
        }
    }
}
