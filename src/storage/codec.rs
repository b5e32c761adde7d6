//! Database codec
//!
//! Deterministic length-prefixed binary encoding of a whole database.
//! All integers are little-endian; lengths and counts are u32.

use std::collections::HashSet;

use bytes::{Buf, BufMut, BytesMut};

use crate::auth::{PasswordHash, User, HASH_LEN};
use crate::error::{CellarError, Result};
use crate::model::{Column, Database, Row, Table, Value, ValueKind};

use super::{FORMAT_MAGIC, LEGACY_PLAINTEXT_MAGIC};

// =============================================================================
// Encoding
// =============================================================================

/// Encode a database to its plaintext byte form
pub fn encode_database(db: &Database) -> Result<Vec<u8>> {
    let mut buf = BytesMut::with_capacity(256);
    buf.put_slice(&FORMAT_MAGIC);

    put_count(&mut buf, db.users().len())?;
    for user in db.users() {
        put_str(&mut buf, user.name())?;
        buf.put_slice(user.password_hash());
    }

    put_count(&mut buf, db.tables().len())?;
    for table in db.tables() {
        put_str(&mut buf, table.id())?;
        put_count(&mut buf, table.rows().len())?;
        for row in table.rows() {
            put_str(&mut buf, row.id())?;
            put_count(&mut buf, row.columns().len())?;
            for column in row.columns() {
                put_count(&mut buf, column.len())?;
                for value in column.values() {
                    put_value(&mut buf, value)?;
                }
            }
        }
    }

    Ok(buf.to_vec())
}

fn put_count(buf: &mut BytesMut, count: usize) -> Result<()> {
    let count = u32::try_from(count).map_err(|_| {
        CellarError::Serialization(format!("length {} does not fit in u32", count))
    })?;
    buf.put_u32_le(count);
    Ok(())
}

fn put_str(buf: &mut BytesMut, s: &str) -> Result<()> {
    put_count(buf, s.len())?;
    buf.put_slice(s.as_bytes());
    Ok(())
}

fn put_value(buf: &mut BytesMut, value: &Value) -> Result<()> {
    buf.put_u8(value.kind() as u8);
    match value {
        Value::String(s) => put_str(buf, s)?,
        Value::Int(i) => buf.put_i64_le(*i),
        Value::Float(f) => buf.put_f64_le(*f),
        Value::Boolean(b) => buf.put_u8(u8::from(*b)),
    }
    Ok(())
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode a database from its plaintext byte form
///
/// Any truncation, trailing bytes, bad UTF-8, duplicate identifier or wrong
/// magic is `InvalidDatabaseFormat`; an unknown value tag is `InvalidTypeTag`.
pub fn decode_database(bytes: &[u8]) -> Result<Database> {
    let mut buf = bytes;

    ensure(buf, 4)?;
    let mut magic = [0u8; 4];
    buf.copy_to_slice(&mut magic);
    if magic == LEGACY_PLAINTEXT_MAGIC {
        tracing::warn!("Refusing legacy plaintext database format");
        return Err(CellarError::InvalidDatabaseFormat);
    }
    if magic != FORMAT_MAGIC {
        return Err(CellarError::InvalidDatabaseFormat);
    }

    let user_count = get_count(&mut buf)?;
    let mut users = Vec::with_capacity(user_count.min(buf.remaining()));
    let mut seen = HashSet::new();
    for _ in 0..user_count {
        let name = get_string(&mut buf)?;
        ensure(buf, HASH_LEN)?;
        let mut hash: PasswordHash = [0u8; HASH_LEN];
        buf.copy_to_slice(&mut hash);
        if !seen.insert(name.clone()) {
            return Err(CellarError::InvalidDatabaseFormat);
        }
        users.push(User::with_hash(name, hash));
    }

    let table_count = get_count(&mut buf)?;
    let mut tables = Vec::with_capacity(table_count.min(buf.remaining()));
    let mut seen = HashSet::new();
    for _ in 0..table_count {
        let table = get_table(&mut buf)?;
        if !seen.insert(table.id().to_string()) {
            return Err(CellarError::InvalidDatabaseFormat);
        }
        tables.push(table);
    }

    if buf.has_remaining() {
        return Err(CellarError::InvalidDatabaseFormat);
    }

    Ok(Database::from_parts(users, tables))
}

fn get_table(buf: &mut &[u8]) -> Result<Table> {
    let mut table = Table::new(get_string(buf)?);
    let row_count = get_count(buf)?;
    let mut seen = HashSet::new();
    for _ in 0..row_count {
        let mut row = Row::new(get_string(buf)?);
        if !seen.insert(row.id().to_string()) {
            return Err(CellarError::InvalidDatabaseFormat);
        }

        let column_count = get_count(buf)?;
        for _ in 0..column_count {
            let value_count = get_count(buf)?;
            let mut values = Vec::with_capacity(value_count.min(buf.remaining()));
            for _ in 0..value_count {
                values.push(get_value(buf)?);
            }
            row.columns_mut().push(Column::new(values));
        }
        table.rows_mut().push(row);
    }
    Ok(table)
}

fn get_value(buf: &mut &[u8]) -> Result<Value> {
    ensure(buf, 1)?;
    let kind = ValueKind::try_from(buf.get_u8())?;
    let value = match kind {
        ValueKind::String => Value::String(get_string(buf)?),
        ValueKind::Int => {
            ensure(buf, 8)?;
            Value::Int(buf.get_i64_le())
        }
        ValueKind::Float => {
            ensure(buf, 8)?;
            Value::Float(buf.get_f64_le())
        }
        ValueKind::Boolean => {
            ensure(buf, 1)?;
            match buf.get_u8() {
                0 => Value::Boolean(false),
                1 => Value::Boolean(true),
                _ => return Err(CellarError::InvalidDatabaseFormat),
            }
        }
    };
    Ok(value)
}

fn get_count(buf: &mut &[u8]) -> Result<usize> {
    ensure(buf, 4)?;
    Ok(buf.get_u32_le() as usize)
}

fn get_string(buf: &mut &[u8]) -> Result<String> {
    let len = get_count(buf)?;
    ensure(buf, len)?;
    let s = std::str::from_utf8(&buf[..len])
        .map_err(|_| CellarError::InvalidDatabaseFormat)?
        .to_string();
    buf.advance(len);
    Ok(s)
}

/// Fail with InvalidDatabaseFormat unless `n` more bytes are available
fn ensure(buf: &[u8], n: usize) -> Result<()> {
    if buf.len() < n {
        return Err(CellarError::InvalidDatabaseFormat);
    }
    Ok(())
}
