//! API key generation and SHA-256 hashing.
//!
//! Only the digest of a key is persisted. The plaintext is handed to the
//! caller once, at issue time.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Prefix carried by every issued key, so keys are recognizable in configs.
pub const API_KEY_PREFIX: &str = "pw_";

/// Generate a fresh plaintext API key.
///
/// Two v4 UUIDs give 244 random bits, rendered as 64 lowercase hex chars.
pub fn generate_api_key() -> String {
    format!(
        "{API_KEY_PREFIX}{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    )
}

/// Lowercase hex SHA-256 digest of an API key.
pub fn hash_api_key(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    format!("{:x}", digest)
}
