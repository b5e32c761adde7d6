//! Tests for Database
//!
//! These tests verify:
//! - Table, row and column CRUD
//! - Existence and shape errors
//! - Failed calls leave state untouched
//! - Ordering after deletes
//! - User lifecycle and password verification

use cellar::error::CellarError;
use cellar::model::{Column, Database, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_db_with_row() -> Database {
    let mut db = Database::new();
    db.create_table("t").unwrap();
    db.add_row("t", "r1").unwrap();
    db
}

fn column_values(db: &Database, table: &str, row: &str) -> Vec<Vec<Value>> {
    db.get_row(table, row)
        .unwrap()
        .columns()
        .iter()
        .map(|c| c.values().to_vec())
        .collect()
}

// =============================================================================
// Table Tests
// =============================================================================

#[test]
fn test_create_and_list_tables() {
    let mut db = Database::new();
    db.create_table("b").unwrap();
    db.create_table("a").unwrap();
    db.create_table("c").unwrap();

    assert_eq!(db.list_tables(), vec!["b", "a", "c"]);
}

#[test]
fn test_create_duplicate_table() {
    let mut db = Database::new();
    db.create_table("t").unwrap();

    assert!(matches!(
        db.create_table("t"),
        Err(CellarError::TableAlreadyExists)
    ));
    assert_eq!(db.list_tables(), vec!["t"]);
}

#[test]
fn test_table_ids_are_case_sensitive() {
    let mut db = Database::new();
    db.create_table("t").unwrap();
    db.create_table("T").unwrap();

    assert_eq!(db.list_tables(), vec!["t", "T"]);
}

#[test]
fn test_delete_table_then_recreate() {
    let mut db = setup_db_with_row();
    db.add_column("t", "r1", vec![Value::Int(1)]).unwrap();

    db.delete_table("t").unwrap();
    assert!(db.list_tables().is_empty());
    assert!(db.table("t").is_none());

    // No ghost rows survive the delete
    db.create_table("t").unwrap();
    assert!(db.list_rows("t").unwrap().is_empty());
}

#[test]
fn test_delete_missing_table() {
    let mut db = Database::new();
    assert!(matches!(
        db.delete_table("nope"),
        Err(CellarError::TableNotFound)
    ));
}

#[test]
fn test_delete_table_preserves_order_of_others() {
    let mut db = Database::new();
    for id in ["a", "b", "c", "d"] {
        db.create_table(id).unwrap();
    }
    db.delete_table("b").unwrap();

    assert_eq!(db.list_tables(), vec!["a", "c", "d"]);
}

// =============================================================================
// Row Tests
// =============================================================================

#[test]
fn test_add_row_errors() {
    let mut db = setup_db_with_row();

    assert!(matches!(
        db.add_row("missing", "r"),
        Err(CellarError::TableNotFound)
    ));
    assert!(matches!(
        db.add_row("t", "r1"),
        Err(CellarError::RowAlreadyExists)
    ));
    assert_eq!(db.list_rows("t").unwrap(), vec!["r1"]);
}

#[test]
fn test_list_rows() {
    let mut db = setup_db_with_row();
    db.add_row("t", "r2").unwrap();
    db.add_row("t", "r0").unwrap();

    assert_eq!(db.list_rows("t").unwrap(), vec!["r1", "r2", "r0"]);
    assert!(matches!(
        db.list_rows("missing"),
        Err(CellarError::TableNotFound)
    ));
}

#[test]
fn test_delete_row() {
    let mut db = setup_db_with_row();
    db.add_row("t", "r2").unwrap();

    db.delete_row("t", "r1").unwrap();
    assert_eq!(db.list_rows("t").unwrap(), vec!["r2"]);
    assert!(db.get_row("t", "r1").is_none());

    assert!(matches!(
        db.delete_row("t", "r1"),
        Err(CellarError::RowNotFound)
    ));
    assert!(matches!(
        db.delete_row("x", "r2"),
        Err(CellarError::TableNotFound)
    ));
}

#[test]
fn test_get_row_absent_is_none() {
    let db = setup_db_with_row();
    assert!(db.get_row("t", "nope").is_none());
    assert!(db.get_row("nope", "r1").is_none());
}

// =============================================================================
// Column Tests
// =============================================================================

#[test]
fn test_add_column() {
    let mut db = setup_db_with_row();
    db.add_column("t", "r1", vec![Value::Int(10)]).unwrap();
    db.add_column("t", "r1", vec![Value::from("Hello"), Value::Boolean(true)])
        .unwrap();

    assert_eq!(
        column_values(&db, "t", "r1"),
        vec![
            vec![Value::Int(10)],
            vec![Value::String("Hello".into()), Value::Boolean(true)],
        ]
    );
}

#[test]
fn test_add_column_errors() {
    let mut db = setup_db_with_row();
    assert!(matches!(
        db.add_column("x", "r1", vec![Value::Int(1)]),
        Err(CellarError::TableNotFound)
    ));
    assert!(matches!(
        db.add_column("t", "x", vec![Value::Int(1)]),
        Err(CellarError::RowNotFound)
    ));
}

#[test]
fn test_add_columns_appends_in_order() {
    let mut db = setup_db_with_row();
    db.add_columns("t", "r1", vec![vec![Value::Int(10)], vec![Value::from("Hello")]])
        .unwrap();

    assert_eq!(
        column_values(&db, "t", "r1"),
        vec![vec![Value::Int(10)], vec![Value::String("Hello".into())]]
    );
    assert!(matches!(
        db.add_columns("t", "nope", vec![vec![Value::Int(1)]]),
        Err(CellarError::RowNotFound)
    ));
}

#[test]
fn test_update_column() {
    let mut db = setup_db_with_row();
    db.add_column("t", "r1", vec![Value::Int(1), Value::Int(2)]).unwrap();

    db.update_column("t", "r1", 0, vec![Value::Float(1.5), Value::from("x")])
        .unwrap();

    assert_eq!(
        column_values(&db, "t", "r1"),
        vec![vec![Value::Float(1.5), Value::String("x".into())]]
    );
}

#[test]
fn test_update_column_wrong_count_leaves_column_unchanged() {
    let mut db = setup_db_with_row();
    db.add_column("t", "r1", vec![Value::Int(1), Value::Int(2)]).unwrap();
    let before = column_values(&db, "t", "r1");

    assert!(matches!(
        db.update_column("t", "r1", 0, vec![Value::Int(9)]),
        Err(CellarError::InvalidValueCount)
    ));
    assert!(matches!(
        db.update_column("t", "r1", 0, vec![Value::Int(9); 3]),
        Err(CellarError::InvalidValueCount)
    ));

    assert_eq!(column_values(&db, "t", "r1"), before);
}

#[test]
fn test_update_column_bad_index() {
    let mut db = setup_db_with_row();
    db.add_column("t", "r1", vec![Value::Int(1)]).unwrap();

    assert!(matches!(
        db.update_column("t", "r1", 1, vec![Value::Int(2)]),
        Err(CellarError::InvalidColumnIndex)
    ));
    assert!(matches!(
        db.update_column("t", "nope", 0, vec![Value::Int(2)]),
        Err(CellarError::RowNotFound)
    ));
}

#[test]
fn test_delete_column_shifts_later_columns() {
    let mut db = setup_db_with_row();
    for i in 0..3 {
        db.add_column("t", "r1", vec![Value::Int(i)]).unwrap();
    }

    db.delete_column("t", "r1", 1).unwrap();

    assert_eq!(
        column_values(&db, "t", "r1"),
        vec![vec![Value::Int(0)], vec![Value::Int(2)]]
    );
}

#[test]
fn test_delete_column_out_of_range_leaves_row_unchanged() {
    let mut db = setup_db_with_row();
    db.add_column("t", "r1", vec![Value::Int(10)]).unwrap();
    db.add_column("t", "r1", vec![Value::from("Hello")]).unwrap();
    let before = column_values(&db, "t", "r1");

    assert!(matches!(
        db.delete_column("t", "r1", 5),
        Err(CellarError::InvalidColumnIndex)
    ));
    assert_eq!(column_values(&db, "t", "r1"), before);
}

#[test]
fn test_get_columns_uses_first_row() {
    let mut db = Database::new();
    db.create_table("t").unwrap();
    assert_eq!(db.get_columns("t"), Some(&[] as &[Column]));
    assert_eq!(db.get_columns("missing"), None);

    db.add_row("t", "first").unwrap();
    db.add_row("t", "second").unwrap();
    db.add_column("t", "second", vec![Value::Int(2)]).unwrap();
    db.add_column("t", "first", vec![Value::Int(1)]).unwrap();

    let columns = db.get_columns("t").unwrap();
    assert_eq!(columns.len(), 1);
    assert_eq!(columns[0].values(), &[Value::Int(1)]);
}

// =============================================================================
// User Tests
// =============================================================================

#[test]
fn test_user_lifecycle() {
    let mut db = Database::with_user("root", "1111");
    db.add_user("alice", "pw").unwrap();

    assert_eq!(db.list_users(), vec!["root", "alice"]);
    assert!(db.verify_user("alice", "pw").unwrap());
    assert!(!db.verify_user("alice", "wrong").unwrap());

    db.update_user_password("alice", "new").unwrap();
    assert!(db.verify_user("alice", "new").unwrap());
    assert!(!db.verify_user("alice", "pw").unwrap());

    db.remove_user("alice").unwrap();
    assert_eq!(db.list_users(), vec!["root"]);
}

#[test]
fn test_user_errors() {
    let mut db = Database::with_user("root", "1111");

    assert!(matches!(
        db.add_user("root", "x"),
        Err(CellarError::UserAlreadyExists)
    ));
    assert!(matches!(
        db.remove_user("ghost"),
        Err(CellarError::UserNotFound)
    ));
    assert!(matches!(
        db.update_user_password("ghost", "x"),
        Err(CellarError::UserNotFound)
    ));
    assert!(matches!(
        db.verify_user("ghost", "x"),
        Err(CellarError::UserNotFound)
    ));
}

#[test]
fn test_password_is_not_stored_in_plaintext() {
    let db = Database::with_user("root", "1111");
    let user = db.user("root").unwrap();

    assert_eq!(user.password_hash(), &cellar::auth::hash_password("1111"));
    assert_ne!(&user.password_hash()[..4], b"1111");
}
