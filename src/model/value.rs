//! Value definitions
//!
//! The tagged scalar stored in every cell.

use std::fmt;

use serde::Serialize;

use crate::error::CellarError;

/// On-disk type tags
///
/// Tags are part of the file format: new kinds must take unused tags and
/// never renumber these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ValueKind {
    String = 0,
    Int = 1,
    Float = 2,
    Boolean = 3,
}

impl TryFrom<u8> for ValueKind {
    type Error = CellarError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(ValueKind::String),
            1 => Ok(ValueKind::Int),
            2 => Ok(ValueKind::Float),
            3 => Ok(ValueKind::Boolean),
            other => Err(CellarError::InvalidTypeTag(other)),
        }
    }
}

/// A single typed scalar
///
/// Serializes to the bare JSON scalar (`10`, `1.5`, `"Hello"`, `true`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Int(i64),
    Float(f64),
    Boolean(bool),
}

impl Value {
    /// Get the value's kind
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::String(_) => ValueKind::String,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Boolean(_) => ValueKind::Boolean,
        }
    }

    /// Auto-type a textual literal
    ///
    /// Tries, in order: signed 64-bit integer, finite 64-bit float, `true` /
    /// `false`, and finally falls back to a string. Surrounding spaces and
    /// tabs are trimmed first.
    pub fn from_literal(literal: &str) -> Self {
        let literal = literal.trim_matches(|c| c == ' ' || c == '\t');

        if let Ok(i) = literal.parse::<i64>() {
            return Value::Int(i);
        }
        // nan/inf would not survive as JSON, keep them as text
        if let Ok(f) = literal.parse::<f64>() {
            if f.is_finite() {
                return Value::Float(f);
            }
        }
        match literal {
            "true" => Value::Boolean(true),
            "false" => Value::Boolean(false),
            _ => Value::String(literal.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}
