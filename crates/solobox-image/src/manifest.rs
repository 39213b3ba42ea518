//! Schema-2 image manifest data model.
//!
//! The manifest lists an image's layers in application order: each layer
//! overlays the previous one, so the last layer wins on path conflicts.

use serde::Deserialize;

/// A registry image manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Manifest schema version (2 for the supported format).
    pub schema_version: u32,
    /// Media type of the manifest document itself.
    #[serde(default)]
    pub media_type: Option<String>,
    /// Ordered list of layers, bottom to top.
    pub layers: Vec<LayerDescriptor>,
}

/// One entry in the manifest's `layers` array.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDescriptor {
    /// Media type of the blob (plain or gzipped tar).
    pub media_type: String,
    /// Blob size in bytes.
    pub size: u64,
    /// Content digest, e.g. `sha256:<64 hex chars>`.
    pub digest: String,
}
