//! SHA-256 content verification for downloaded layers.

use sha2::{Digest, Sha256};

use solobox_common::constants::SHA256_HEX_LENGTH;
use solobox_common::error::{LaunchError, Result};

/// Computes the hex-encoded SHA-256 hash of a byte buffer.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Verifies that `bytes` hash to the manifest digest `expected`
/// (`sha256:<hex>` form).
///
/// # Errors
///
/// Returns a layer-fetch error if the digest algorithm is unsupported or
/// the computed hash does not match.
pub fn verify(expected: &str, bytes: &[u8]) -> Result<()> {
    let Some(expected_hex) = expected.strip_prefix("sha256:") else {
        return Err(LaunchError::LayerFetch {
            digest: expected.to_string(),
            message: "unsupported digest algorithm".into(),
        });
    };
    if expected_hex.len() != SHA256_HEX_LENGTH {
        return Err(LaunchError::LayerFetch {
            digest: expected.to_string(),
            message: "malformed sha256 digest".into(),
        });
    }

    let actual = sha256_hex(bytes);
    if actual != expected_hex {
        return Err(LaunchError::LayerFetch {
            digest: expected.to_string(),
            message: format!("digest mismatch: got sha256:{actual}"),
        });
    }
    Ok(())
}
