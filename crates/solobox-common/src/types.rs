//! Domain primitive types used across the solobox workspace.

use std::fmt;

use crate::error::{LaunchError, Result};

/// A parsed container image reference: namespace, repository, and tag.
///
/// Parsed once from user input and immutable afterward. Bare names get
/// the `library/` namespace; a missing tag defaults to `latest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    namespace: String,
    repository: String,
    tag: String,
}

impl ImageReference {
    /// Parses an image reference like `alpine`, `alpine:3.19`, or
    /// `library/alpine:latest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or has an empty component.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(LaunchError::Unexpected {
                message: "empty image reference".into(),
            });
        }

        let (name, tag) = match input.rsplit_once(':') {
            Some((name, tag)) => (name, tag),
            None => (input, crate::constants::DEFAULT_TAG),
        };
        let (namespace, repository) = match name.split_once('/') {
            Some((ns, repo)) => (ns, repo),
            None => (crate::constants::DEFAULT_NAMESPACE, name),
        };

        if namespace.is_empty() || repository.is_empty() || tag.is_empty() {
            return Err(LaunchError::Unexpected {
                message: format!("malformed image reference: {input}"),
            });
        }

        Ok(Self {
            namespace: namespace.into(),
            repository: repository.into(),
            tag: tag.into(),
        })
    }

    /// Returns the `namespace/repository` path used in registry URLs.
    #[must_use]
    pub fn repository_path(&self) -> String {
        format!("{}/{}", self.namespace, self.repository)
    }

    /// Returns the tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.namespace, self.repository, self.tag)
    }
}

/// An opaque pull-scoped bearer token.
///
/// Lives for one run, is never persisted, and is never refreshed.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wraps the raw token string returned by the auth service.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token for the `Authorization` header.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keeps the credential out of debug logs.
impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthToken(***)")
    }
}

/// Unique identifier for a single launcher run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunId(String);

impl RunId {
    /// Generates a random run ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
