//! Credential verification seam.
//!
//! Password hashing is an external collaborator concern; the backend only
//! ever sees opaque hash strings. Deployments plug in a real KDF-backed
//! verifier here.

pub trait CredentialVerifier {
    /// Check a presented secret against the stored opaque hash.
    fn verify(&self, presented: &str, stored_hash: &str) -> bool;
}

/// Byte-equality verifier for tests and local development, where the
/// "hash" is the secret itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpaqueVerifier;

impl CredentialVerifier for OpaqueVerifier {
    fn verify(&self, presented: &str, stored_hash: &str) -> bool {
        presented == stored_hash
    }
}
