//! Database
//!
//! The in-memory store: users plus tables, and every CRUD operation on them.
//!
//! ## Atomicity
//! Every mutating call checks all of its preconditions before touching any
//! state, so a failed call leaves the database exactly as it was.

use std::path::Path;

use crate::auth::User;
use crate::error::{CellarError, Result};
use crate::storage::{self, EncryptionKey, FORMAT_MAGIC};

use super::{Column, Row, Table, Value};

/// Users and tables, the unit of persistence and of authentication scope
#[derive(Debug, Clone, PartialEq)]
pub struct Database {
    /// Format tag this database was created with or loaded from
    format: [u8; 4],

    /// Users, in insertion order
    users: Vec<User>,

    /// Tables, in insertion order
    tables: Vec<Table>,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    /// Create an empty database
    pub fn new() -> Self {
        Self {
            format: FORMAT_MAGIC,
            users: Vec::new(),
            tables: Vec::new(),
        }
    }

    /// Assemble a database from decoded parts (uniqueness already checked)
    pub(crate) fn from_parts(users: Vec<User>, tables: Vec<Table>) -> Self {
        Self {
            format: FORMAT_MAGIC,
            users,
            tables,
        }
    }

    /// Create a database holding a single user
    pub fn with_user(name: &str, password: &str) -> Self {
        let mut db = Self::new();
        db.users.push(User::new(name, password));
        db
    }

    /// Load a database from an encrypted file
    pub fn load(path: &Path, key: &EncryptionKey) -> Result<Self> {
        storage::load(path, key)
    }

    /// Save this database to an encrypted file
    pub fn save(&self, path: &Path, key: &EncryptionKey) -> Result<()> {
        storage::save(self, path, key)
    }

    // =========================================================================
    // Tables
    // =========================================================================

    /// Append a new empty table
    pub fn create_table(&mut self, id: &str) -> Result<()> {
        if self.table(id).is_some() {
            return Err(CellarError::TableAlreadyExists);
        }
        self.tables.push(Table::new(id));
        Ok(())
    }

    /// Remove a table and everything in it
    pub fn delete_table(&mut self, id: &str) -> Result<()> {
        let pos = self
            .tables
            .iter()
            .position(|t| t.id() == id)
            .ok_or(CellarError::TableNotFound)?;
        self.tables.remove(pos);
        Ok(())
    }

    /// Find a table by exact id
    pub fn table(&self, id: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.id() == id)
    }

    fn table_mut(&mut self, id: &str) -> Result<&mut Table> {
        self.tables
            .iter_mut()
            .find(|t| t.id() == id)
            .ok_or(CellarError::TableNotFound)
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Table ids in storage order
    pub fn list_tables(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.id()).collect()
    }

    // =========================================================================
    // Rows
    // =========================================================================

    /// Append a new empty row to a table
    pub fn add_row(&mut self, table: &str, id: &str) -> Result<()> {
        let table = self.table_mut(table)?;
        if table.row(id).is_some() {
            return Err(CellarError::RowAlreadyExists);
        }
        table.rows_mut().push(Row::new(id));
        Ok(())
    }

    /// Remove a row and its columns
    pub fn delete_row(&mut self, table: &str, id: &str) -> Result<()> {
        let table = self.table_mut(table)?;
        let pos = table.row_position(id).ok_or(CellarError::RowNotFound)?;
        table.rows_mut().remove(pos);
        Ok(())
    }

    /// Look up a row; `None` if either the table or the row is absent
    pub fn get_row(&self, table: &str, id: &str) -> Option<&Row> {
        self.table(table)?.row(id)
    }

    /// Row ids of a table in storage order
    pub fn list_rows(&self, table: &str) -> Result<Vec<&str>> {
        let table = self.table(table).ok_or(CellarError::TableNotFound)?;
        Ok(table.rows().iter().map(|r| r.id()).collect())
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// Append a column built from `values`
    pub fn add_column(&mut self, table: &str, row: &str, values: Vec<Value>) -> Result<()> {
        let row = self.row_mut(table, row)?;
        row.columns_mut().push(Column::new(values));
        Ok(())
    }

    /// Append several columns in order, all or nothing
    pub fn add_columns(&mut self, table: &str, row: &str, columns: Vec<Vec<Value>>) -> Result<()> {
        let row = self.row_mut(table, row)?;
        row.columns_mut()
            .extend(columns.into_iter().map(Column::new));
        Ok(())
    }

    /// Replace the values of an existing column
    ///
    /// The new list must have exactly as many values as the old one.
    pub fn update_column(
        &mut self,
        table: &str,
        row: &str,
        index: usize,
        values: Vec<Value>,
    ) -> Result<()> {
        let row = self.row_mut(table, row)?;
        let column = row
            .columns_mut()
            .get_mut(index)
            .ok_or(CellarError::InvalidColumnIndex)?;
        if column.len() != values.len() {
            return Err(CellarError::InvalidValueCount);
        }
        column.replace(values);
        Ok(())
    }

    /// Remove a column; later columns shift down by one
    pub fn delete_column(&mut self, table: &str, row: &str, index: usize) -> Result<()> {
        let row = self.row_mut(table, row)?;
        if index >= row.columns().len() {
            return Err(CellarError::InvalidColumnIndex);
        }
        row.columns_mut().remove(index);
        Ok(())
    }

    /// Columns of the table's first row
    ///
    /// `None` if the table does not exist, empty if it has no rows.
    pub fn get_columns(&self, table: &str) -> Option<&[Column]> {
        let table = self.table(table)?;
        Some(table.rows().first().map(|r| r.columns()).unwrap_or(&[]))
    }

    fn row_mut(&mut self, table: &str, row: &str) -> Result<&mut Row> {
        self.table_mut(table)?
            .row_mut(row)
            .ok_or(CellarError::RowNotFound)
    }

    // =========================================================================
    // Users
    // =========================================================================

    pub fn add_user(&mut self, name: &str, password: &str) -> Result<()> {
        if self.user(name).is_some() {
            return Err(CellarError::UserAlreadyExists);
        }
        self.users.push(User::new(name, password));
        Ok(())
    }

    pub fn remove_user(&mut self, name: &str) -> Result<()> {
        let pos = self
            .users
            .iter()
            .position(|u| u.name() == name)
            .ok_or(CellarError::UserNotFound)?;
        self.users.remove(pos);
        Ok(())
    }

    pub fn update_user_password(&mut self, name: &str, password: &str) -> Result<()> {
        let user = self
            .users
            .iter_mut()
            .find(|u| u.name() == name)
            .ok_or(CellarError::UserNotFound)?;
        user.set_password(password);
        Ok(())
    }

    /// Check a password against the stored digest
    ///
    /// `Err(UserNotFound)` for an unknown user, otherwise whether it matched.
    pub fn verify_user(&self, name: &str, password: &str) -> Result<bool> {
        let user = self.user(name).ok_or(CellarError::UserNotFound)?;
        Ok(user.verify(password))
    }

    pub fn user(&self, name: &str) -> Option<&User> {
        self.users.iter().find(|u| u.name() == name)
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Usernames in storage order
    pub fn list_users(&self) -> Vec<&str> {
        self.users.iter().map(|u| u.name()).collect()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The 4-byte format tag
    pub fn format(&self) -> &[u8; 4] {
        &self.format
    }
}
