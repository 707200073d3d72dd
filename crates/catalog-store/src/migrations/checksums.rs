//! Checksum computation for migrations
//!
//! SHA256 over the migration SQL, so a changed mapping is detected

use sha2::{Digest, Sha256};

/// Compute SHA256 checksum of a string
pub fn compute_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_checksum() {
        let checksum = compute_checksum("CREATE TABLE t (id INTEGER)");
        assert_eq!(checksum.len(), 64); // SHA256 is 64 hex chars
    }

    #[test]
    fn test_checksum_changes_with_content() {
        assert_eq!(compute_checksum("a"), compute_checksum("a"));
        assert_ne!(compute_checksum("a"), compute_checksum("b"));
    }
}
