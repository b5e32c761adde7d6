//! Authentication
//!
//! Password digests and the user record stored in every database.
//!
//! Passwords are reduced to a plain SHA-256 digest: no salt and no key
//! stretching. Only the digest is ever kept in memory past the call that
//! received the password, and only the digest is persisted.

use sha2::{Digest, Sha256};

/// Username seeded into every fresh session
pub const DEFAULT_BOOTSTRAP_USER: &str = "root";

/// Password of the seeded user
pub const DEFAULT_BOOTSTRAP_PASSWORD: &str = "1111";

/// Length of a password digest in bytes
pub const HASH_LEN: usize = 32;

/// A 256-bit password digest
pub type PasswordHash = [u8; HASH_LEN];

/// Hash a password into its stored digest
pub fn hash_password(password: &str) -> PasswordHash {
    Sha256::digest(password.as_bytes()).into()
}

/// A user known to a database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    name: String,
    password_hash: PasswordHash,
}

impl User {
    /// Create a user from a plaintext password
    pub fn new(name: impl Into<String>, password: &str) -> Self {
        Self::with_hash(name, hash_password(password))
    }

    /// Create a user from an already computed digest (used when decoding)
    pub fn with_hash(name: impl Into<String>, password_hash: PasswordHash) -> Self {
        Self {
            name: name.into(),
            password_hash,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Replace the stored digest with the digest of `password`
    pub fn set_password(&mut self, password: &str) {
        self.password_hash = hash_password(password);
    }

    /// Recompute the digest of `password` and compare it to the stored one
    pub fn verify(&self, password: &str) -> bool {
        hash_password(password) == self.password_hash
    }
}
