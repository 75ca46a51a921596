//! Reversible password "hashing" for tests.

use crate::port::outbound::password::PasswordHasher;

const PREFIX: &str = "fake$";

/// Stores `fake$<plaintext>`. Never use outside tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct FakePasswordHasher;

impl PasswordHasher for FakePasswordHasher {
    fn hash(&self, plaintext: &str) -> String {
        format!("{PREFIX}{plaintext}")
    }

    fn verify(&self, hash: &str, plaintext: &str) -> bool {
        hash.strip_prefix(PREFIX) == Some(plaintext)
    }
}
