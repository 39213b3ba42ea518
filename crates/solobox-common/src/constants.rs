//! Registry endpoints and launcher-wide default values.

/// Base URL of the Docker Hub registry API.
pub const REGISTRY_URL: &str = "https://registry.hub.docker.com";

/// Token endpoint of the Docker Hub auth service.
pub const AUTH_URL: &str = "https://auth.docker.io/token";

/// Service name presented when requesting a pull token.
pub const AUTH_SERVICE: &str = "registry.docker.io";

/// Accept header requesting a schema-2 image manifest.
pub const MANIFEST_ACCEPT_HEADER: &str = "application/vnd.docker.distribution.manifest.v2+json";

/// Namespace implied for bare image names ("alpine" → "library/alpine").
pub const DEFAULT_NAMESPACE: &str = "library";

/// Tag used when the image reference does not name one.
pub const DEFAULT_TAG: &str = "latest";

/// Scratch root under which per-run workspaces are allocated.
pub const DEFAULT_SCRATCH_DIR: &str = "/tmp";

/// Prefix for workspace directory names.
pub const WORKSPACE_PREFIX: &str = "solobox-";

/// Process exit code for any failure before the target command ran.
pub const GENERIC_FAILURE_CODE: i32 = 1;

/// SHA-256 digest length in hex characters.
pub const SHA256_HEX_LENGTH: usize = 64;

/// Application name used in CLI output.
pub const APP_NAME: &str = "solobox";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "sbx";
