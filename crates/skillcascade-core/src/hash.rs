//! ContentHasher trait for fingerprinting engine inputs.
//!
//! Defined in skillcascade-core so the health cache can key entries without
//! coupling to a specific hashing algorithm. The `Sha256ContentHasher`
//! adapter lives in skillcascade-infra.

/// Abstraction over content hashing.
pub trait ContentHasher: Send + Sync {
    /// Compute a hex-encoded hash of the given content.
    fn compute_hash(&self, content: &str) -> String;
}
