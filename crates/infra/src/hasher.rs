//! SHA-256 credential hashing.

use gatehouse_core::DomainResult;
use gatehouse_identity::{CredentialHasher, PasswordHash, PlainPassword};
use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 over `pepper | plaintext`.
///
/// Deterministic so stored hashes can be compared directly by the user
/// repository.
#[derive(Clone)]
pub struct Sha256CredentialHasher {
    pepper: String,
}

impl Sha256CredentialHasher {
    pub fn new(pepper: impl Into<String>) -> Self {
        Self {
            pepper: pepper.into(),
        }
    }
}

impl core::fmt::Debug for Sha256CredentialHasher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Sha256CredentialHasher")
            .field("pepper", &"[REDACTED]")
            .finish()
    }
}

impl CredentialHasher for Sha256CredentialHasher {
    fn hash(&self, plaintext: &PlainPassword) -> DomainResult<PasswordHash> {
        let mut hasher = Sha256::new();
        hasher.update(self.pepper.as_bytes());
        hasher.update(b"|");
        hasher.update(plaintext.as_str().as_bytes());
        Ok(PasswordHash::new(hex::encode(hasher.finalize())))
    }
}
