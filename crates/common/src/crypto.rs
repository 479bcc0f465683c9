//! Cryptographic utilities shared across Canvasforge crates
//!
//! Provider access tokens are secrets. Log lines and API payloads carry a
//! short SHA-256 fingerprint instead of the token itself.

use sha2::{Digest, Sha256};

/// Length of the hex fingerprint exposed in logs and status payloads
const FINGERPRINT_LEN: usize = 8;

/// Compute a short, non-reversible fingerprint of an access token.
///
/// Stable for the same token, so repeated log lines can be correlated
/// without ever writing the token itself.
pub fn token_fingerprint(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)[..FINGERPRINT_LEN].to_string()
}
