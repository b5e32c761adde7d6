//! Codec Tests
//!
//! Tests for the plaintext database encoding.

use cellar::error::CellarError;
use cellar::model::{Database, Value};
use cellar::storage::{decode_database, encode_database, FORMAT_MAGIC, LEGACY_PLAINTEXT_MAGIC};

// =============================================================================
// Helper Functions
// =============================================================================

fn sample_db() -> Database {
    let mut db = Database::with_user("root", "1111");
    db.add_user("alice", "pw").unwrap();

    db.create_table("people").unwrap();
    db.add_row("people", "p1").unwrap();
    db.add_column("people", "p1", vec![Value::from("Ada"), Value::Int(36)])
        .unwrap();
    db.add_column("people", "p1", vec![Value::Float(-2.25), Value::Boolean(false)])
        .unwrap();
    db.add_row("people", "p2").unwrap();

    db.create_table("empty").unwrap();
    db
}

fn encode_minimal(tag: u8, payload: &[u8]) -> Vec<u8> {
    // one table "t", one row "r", one column holding one value
    let mut bytes = FORMAT_MAGIC.to_vec();
    bytes.extend_from_slice(&0u32.to_le_bytes()); // users
    bytes.extend_from_slice(&1u32.to_le_bytes()); // tables
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(b"t");
    bytes.extend_from_slice(&1u32.to_le_bytes()); // rows
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(b"r");
    bytes.extend_from_slice(&1u32.to_le_bytes()); // columns
    bytes.extend_from_slice(&1u32.to_le_bytes()); // values
    bytes.push(tag);
    bytes.extend_from_slice(payload);
    bytes
}

// =============================================================================
// Layout Tests
// =============================================================================

#[test]
fn test_empty_database_layout() {
    let bytes = encode_database(&Database::new()).unwrap();

    let mut expected = FORMAT_MAGIC.to_vec();
    expected.extend_from_slice(&0u32.to_le_bytes());
    expected.extend_from_slice(&0u32.to_le_bytes());
    assert_eq!(bytes, expected);
}

#[test]
fn test_user_layout() {
    let db = Database::with_user("root", "1111");
    let bytes = encode_database(&db).unwrap();

    assert_eq!(&bytes[0..4], &FORMAT_MAGIC);
    assert_eq!(&bytes[4..8], &1u32.to_le_bytes());
    assert_eq!(&bytes[8..12], &4u32.to_le_bytes());
    assert_eq!(&bytes[12..16], b"root");
    assert_eq!(&bytes[16..48], &cellar::auth::hash_password("1111"));
    assert_eq!(&bytes[48..52], &0u32.to_le_bytes());
    assert_eq!(bytes.len(), 52);
}

#[test]
fn test_value_tags() {
    let cases = [
        (Value::from("hi"), {
            let mut p = vec![0u8];
            p.extend_from_slice(&2u32.to_le_bytes());
            p.extend_from_slice(b"hi");
            p
        }),
        (Value::Int(-1), {
            let mut p = vec![1u8];
            p.extend_from_slice(&(-1i64).to_le_bytes());
            p
        }),
        (Value::Float(1.5), {
            let mut p = vec![2u8];
            p.extend_from_slice(&1.5f64.to_bits().to_le_bytes());
            p
        }),
        (Value::Boolean(true), vec![3u8, 1]),
    ];

    for (value, tagged) in cases {
        let mut db = Database::new();
        db.create_table("t").unwrap();
        db.add_row("t", "r").unwrap();
        db.add_column("t", "r", vec![value]).unwrap();

        let bytes = encode_database(&db).unwrap();
        assert_eq!(bytes, encode_minimal(tagged[0], &tagged[1..]));
    }
}

#[test]
fn test_encoding_is_deterministic() {
    let db = sample_db();
    assert_eq!(encode_database(&db).unwrap(), encode_database(&db).unwrap());
}

// =============================================================================
// Decode Tests
// =============================================================================

#[test]
fn test_decode_reproduces_database() {
    let db = sample_db();
    let decoded = decode_database(&encode_database(&db).unwrap()).unwrap();

    assert_eq!(decoded, db);
    assert_eq!(decoded.format(), &FORMAT_MAGIC);
    assert_eq!(decoded.list_tables(), vec!["people", "empty"]);
    assert_eq!(decoded.list_rows("people").unwrap(), vec!["p1", "p2"]);
    assert!(decoded.verify_user("alice", "pw").unwrap());
}

#[test]
fn test_decode_unknown_type_tag() {
    let bytes = encode_minimal(4, &[0u8; 8]);
    assert!(matches!(
        decode_database(&bytes),
        Err(CellarError::InvalidTypeTag(4))
    ));
}

#[test]
fn test_decode_rejects_wrong_magic() {
    let mut bytes = encode_database(&sample_db()).unwrap();
    bytes[..4].copy_from_slice(b"NOPE");
    assert!(matches!(
        decode_database(&bytes),
        Err(CellarError::InvalidDatabaseFormat)
    ));

    bytes[..4].copy_from_slice(&LEGACY_PLAINTEXT_MAGIC);
    assert!(matches!(
        decode_database(&bytes),
        Err(CellarError::InvalidDatabaseFormat)
    ));
}

#[test]
fn test_decode_rejects_every_truncation() {
    let bytes = encode_database(&sample_db()).unwrap();

    for len in 0..bytes.len() {
        let result = decode_database(&bytes[..len]);
        assert!(
            matches!(result, Err(CellarError::InvalidDatabaseFormat)),
            "truncation at {} was accepted",
            len
        );
    }
}

#[test]
fn test_decode_rejects_trailing_bytes() {
    let mut bytes = encode_database(&sample_db()).unwrap();
    bytes.push(0);
    assert!(matches!(
        decode_database(&bytes),
        Err(CellarError::InvalidDatabaseFormat)
    ));
}

#[test]
fn test_decode_rejects_bad_boolean_and_utf8() {
    assert!(matches!(
        decode_database(&encode_minimal(3, &[2])),
        Err(CellarError::InvalidDatabaseFormat)
    ));

    let mut payload = 2u32.to_le_bytes().to_vec();
    payload.extend_from_slice(&[0xff, 0xfe]);
    assert!(matches!(
        decode_database(&encode_minimal(0, &payload)),
        Err(CellarError::InvalidDatabaseFormat)
    ));
}

#[test]
fn test_decode_rejects_duplicate_tables() {
    let mut bytes = FORMAT_MAGIC.to_vec();
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&2u32.to_le_bytes());
    for _ in 0..2 {
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(b"t");
        bytes.extend_from_slice(&0u32.to_le_bytes());
    }
    assert!(matches!(
        decode_database(&bytes),
        Err(CellarError::InvalidDatabaseFormat)
    ));
}
