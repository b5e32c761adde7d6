//! Table, Row and Column containers
//!
//! Plain ordered containers. Uniqueness and shape rules are enforced by
//! `Database`, which is the only thing that mutates them.

use serde::Serialize;

use super::Value;

/// An ordered group of values attached to a row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Column {
    values: Vec<Value>,
}

impl Column {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Swap in a same-sized value list (caller checks the length)
    pub(crate) fn replace(&mut self, values: Vec<Value>) {
        self.values = values;
    }
}

/// A named, ordered sequence of columns
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    id: String,
    columns: Vec<Column>,
}

impl Row {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            columns: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub(crate) fn columns_mut(&mut self) -> &mut Vec<Column> {
        &mut self.columns
    }
}

/// A named, ordered sequence of rows
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    id: String,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rows: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Find a row by exact id
    pub fn row(&self, id: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.id == id)
    }

    pub(crate) fn row_mut(&mut self, id: &str) -> Option<&mut Row> {
        self.rows.iter_mut().find(|r| r.id == id)
    }

    pub(crate) fn row_position(&self, id: &str) -> Option<usize> {
        self.rows.iter().position(|r| r.id == id)
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Vec<Row> {
        &mut self.rows
    }
}
