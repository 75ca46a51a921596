//! Password hashing port.
//!
//! Hashing algorithms live outside this crate; tables only store the hash and
//! ask the hasher whether a plaintext matches it.

/// Hashes and verifies table passwords.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password for storage.
    fn hash(&self, plaintext: &str) -> String;

    /// Return true if `plaintext` matches a stored `hash`.
    fn verify(&self, hash: &str, plaintext: &str) -> bool;
}
