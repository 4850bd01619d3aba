use sha2::{Digest, Sha256};

/// Compute the SHA-256 hex digest of a stored blob
pub fn compute_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}
