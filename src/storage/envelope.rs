//! Encryption envelope
//!
//! Wraps an encoded database as `nonce (12) || ciphertext || tag (16)`
//! using ChaCha20-Poly1305 with a fresh random nonce per seal.

use std::fmt;

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CellarError, Result};

/// Key length in bytes
pub const KEY_LEN: usize = 32;

/// Nonce length in bytes
pub const NONCE_LEN: usize = 12;

/// Authentication tag length in bytes
pub const TAG_LEN: usize = 16;

/// Smallest byte string that can be a valid envelope
pub const MIN_ENVELOPE_LEN: usize = NONCE_LEN + TAG_LEN;

/// A 256-bit encryption key, wiped from memory on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey([u8; KEY_LEN]);

impl EncryptionKey {
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse a key from exactly 64 hexadecimal characters
    pub fn from_hex(hex_key: &str) -> Result<Self> {
        if hex_key.len() != KEY_LEN * 2 {
            return Err(CellarError::protocol(format!(
                "invalid key: expected {} hex characters, got {}",
                KEY_LEN * 2,
                hex_key.len()
            )));
        }
        let mut bytes = [0u8; KEY_LEN];
        hex::decode_to_slice(hex_key, &mut bytes)
            .map_err(|e| CellarError::protocol(format!("invalid key: {}", e)))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey(..)")
    }
}

/// Encrypt `plaintext` into a fresh envelope
pub fn seal(plaintext: &[u8], key: &EncryptionKey) -> Result<Vec<u8>> {
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));

    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| CellarError::Encryption(e.to_string()))?;

    let mut envelope = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    envelope.extend_from_slice(&nonce);
    envelope.extend_from_slice(&ciphertext);
    Ok(envelope)
}

/// Verify and decrypt an envelope
///
/// Short input, a wrong key and any tampering all surface as
/// `InvalidDatabaseFormat`; nothing is returned unless the tag verifies.
pub fn open(envelope: &[u8], key: &EncryptionKey) -> Result<Vec<u8>> {
    if envelope.len() < MIN_ENVELOPE_LEN {
        return Err(CellarError::InvalidDatabaseFormat);
    }

    let (nonce, ciphertext) = envelope.split_at(NONCE_LEN);
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CellarError::InvalidDatabaseFormat)
}
