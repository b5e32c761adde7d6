//! Database files
//!
//! Whole-database save and load through the encryption envelope.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{CellarError, Result};
use crate::model::Database;

use super::codec::{decode_database, encode_database};
use super::envelope::{open, seal, EncryptionKey};
use super::LEGACY_PLAINTEXT_MAGIC;

/// Encrypt and write a database to `path`
///
/// The envelope is written and fsynced to a uniquely named temporary file in
/// the same directory, then renamed into place, so `path` only ever holds a
/// complete file. Concurrent saves to one path never share a temporary file;
/// the last rename wins.
pub fn save(db: &Database, path: &Path, key: &EncryptionKey) -> Result<()> {
    let plaintext = encode_database(db)?;
    let envelope = seal(&plaintext, key)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // Deleted on drop unless persisted
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&envelope)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| CellarError::Io(e.error))?;

    tracing::info!(
        "Saved database to {} ({} tables, {} users, {} bytes)",
        path.display(),
        db.tables().len(),
        db.users().len(),
        envelope.len()
    );
    Ok(())
}

/// Read, verify, decrypt and decode a database from `path`
pub fn load(path: &Path, key: &EncryptionKey) -> Result<Database> {
    let data = fs::read(path)?;

    let plaintext = match open(&data, key) {
        Ok(plaintext) => plaintext,
        Err(e) => {
            if data.starts_with(&LEGACY_PLAINTEXT_MAGIC) {
                tracing::warn!(
                    "{} looks like a legacy unencrypted database, refusing to load",
                    path.display()
                );
            } else {
                tracing::warn!("Failed to decrypt {}: {}", path.display(), e);
            }
            return Err(CellarError::InvalidDatabaseFormat);
        }
    };

    let db = decode_database(&plaintext)?;
    tracing::info!(
        "Loaded database from {} ({} tables, {} users)",
        path.display(),
        db.tables().len(),
        db.users().len()
    );
    Ok(db)
}
