//! Registry client: auth-token, manifest, and layer blob fetches.
//!
//! All requests are blocking, single-attempt, and unauthenticated beyond
//! the pull-scoped bearer token acquired at the start of the run. Any
//! transport or HTTP-status failure surfaces immediately to the caller.

use serde::Deserialize;

use solobox_common::config::LaunchConfig;
use solobox_common::error::{LaunchError, Result};
use solobox_common::types::{AuthToken, ImageReference};

use crate::manifest::{LayerDescriptor, Manifest};

/// Body of a successful token response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

/// Blocking HTTP client for one image-pull operation.
pub struct RegistryClient {
    http: reqwest::blocking::Client,
    registry_url: String,
    auth_url: String,
    auth_service: String,
    manifest_accept: String,
}

impl RegistryClient {
    /// Creates a client bound to the configured registry endpoints.
    #[must_use]
    pub fn new(config: &LaunchConfig) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            registry_url: config.registry_url.clone(),
            auth_url: config.auth_url.clone(),
            auth_service: config.auth_service.clone(),
            manifest_accept: config.manifest_accept.clone(),
        }
    }

    /// Requests a pull-scoped bearer token for the image repository.
    ///
    /// # Errors
    ///
    /// Returns an auth error on transport failure, a non-2xx response,
    /// or a malformed token payload.
    pub fn authenticate(&self, image: &ImageReference) -> Result<AuthToken> {
        let url = self.token_url(image);
        tracing::debug!(%image, "requesting pull token");

        let response = self.http.get(&url).send().map_err(|e| LaunchError::Auth {
            message: format!("token request failed: {e}"),
        })?;
        if !response.status().is_success() {
            return Err(LaunchError::Auth {
                message: format!("HTTP {} from auth service", response.status()),
            });
        }

        let payload: TokenResponse = response.json().map_err(|e| LaunchError::Auth {
            message: format!("malformed token payload: {e}"),
        })?;
        tracing::debug!(%image, "pull token acquired");
        Ok(AuthToken::new(payload.token))
    }

    /// Fetches the image manifest for the reference's tag.
    ///
    /// # Errors
    ///
    /// Returns a manifest error on transport failure, a non-2xx response,
    /// or an undecodable body.
    pub fn fetch_manifest(&self, token: &AuthToken, image: &ImageReference) -> Result<Manifest> {
        let url = self.manifest_url(image);
        tracing::debug!(%image, tag = image.tag(), "fetching manifest");

        let response = self
            .http
            .get(&url)
            .bearer_auth(token.as_str())
            .header(reqwest::header::ACCEPT, &self.manifest_accept)
            .send()
            .map_err(|e| LaunchError::Manifest {
                message: format!("manifest request failed: {e}"),
            })?;
        if !response.status().is_success() {
            return Err(LaunchError::Manifest {
                message: format!("HTTP {} for {url}", response.status()),
            });
        }

        let manifest: Manifest = response.json().map_err(|e| LaunchError::Manifest {
            message: format!("undecodable manifest body: {e}"),
        })?;
        tracing::info!(%image, layers = manifest.layers.len(), "manifest fetched");
        Ok(manifest)
    }

    /// Fetches one layer blob by digest and verifies its content hash.
    ///
    /// # Errors
    ///
    /// Returns a layer-fetch error on transport failure, a non-2xx
    /// response, or a digest mismatch.
    pub fn fetch_layer(
        &self,
        token: &AuthToken,
        image: &ImageReference,
        layer: &LayerDescriptor,
    ) -> Result<Vec<u8>> {
        let url = self.blob_url(image, &layer.digest);
        tracing::debug!(%image, digest = %layer.digest, size = layer.size, "fetching layer");

        let response = self
            .http
            .get(&url)
            .bearer_auth(token.as_str())
            .send()
            .map_err(|e| LaunchError::LayerFetch {
                digest: layer.digest.clone(),
                message: format!("blob request failed: {e}"),
            })?;
        if !response.status().is_success() {
            return Err(LaunchError::LayerFetch {
                digest: layer.digest.clone(),
                message: format!("HTTP {} for {url}", response.status()),
            });
        }

        let bytes = response.bytes().map_err(|e| LaunchError::LayerFetch {
            digest: layer.digest.clone(),
            message: format!("failed to read blob body: {e}"),
        })?;

        crate::digest::verify(&layer.digest, &bytes)?;
        tracing::info!(digest = %layer.digest, bytes = bytes.len(), "layer fetched");
        Ok(bytes.to_vec())
    }

    fn token_url(&self, image: &ImageReference) -> String {
        format!(
            "{}?service={}&scope=repository:{}:pull",
            self.auth_url,
            self.auth_service,
            image.repository_path()
        )
    }

    fn manifest_url(&self, image: &ImageReference) -> String {
        format!(
            "{}/v2/{}/manifests/{}",
            self.registry_url,
            image.repository_path(),
            image.tag()
        )
    }

    fn blob_url(&self, image: &ImageReference, digest: &str) -> String {
        format!(
            "{}/v2/{}/blobs/{digest}",
            self.registry_url,
            image.repository_path()
        )
    }
}
