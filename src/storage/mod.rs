//! Storage Module
//!
//! Persistence of a whole database as one encrypted file.
//!
//! ## File Format (V2 - Encrypted)
//! ```text
//! ┌───────────┬──────────────────────────────────┬──────────┐
//! │ Nonce (12)│   ChaCha20 ciphertext            │ Tag (16) │
//! └───────────┴──────────────────────────────────┴──────────┘
//! ```
//!
//! ### Plaintext (little-endian, lengths/counts u32)
//! ```text
//! Magic "CLR2" (4)
//! UserCount  { NameLen Name  Hash(32) }*
//! TableCount { IdLen Id  RowCount { IdLen Id  ColCount { ValCount { Tag(1) Payload }* }* }* }*
//! ```
//!
//! ### Value Tags
//! - 0: string  - u32 length + UTF-8 bytes
//! - 1: int     - i64
//! - 2: float   - f64 bit pattern
//! - 3: boolean - one byte, 0 or 1
//!
//! The V1 format ("CLR1") was unencrypted plaintext and is rejected.

mod codec;
mod envelope;
mod file;

pub use codec::{decode_database, encode_database};
pub use envelope::{open, seal, EncryptionKey, KEY_LEN, MIN_ENVELOPE_LEN, NONCE_LEN, TAG_LEN};
pub use file::{load, save};

/// Magic tag of the current (encrypted) format
pub const FORMAT_MAGIC: [u8; 4] = *b"CLR2";

/// Magic tag of the retired plaintext format
pub const LEGACY_PLAINTEXT_MAGIC: [u8; 4] = *b"CLR1";
