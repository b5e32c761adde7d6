//! Response definitions
//!
//! Every command gets exactly one response line.

use std::fmt;

use serde::Serialize;

use crate::error::{CellarError, Result};

/// A response to send to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// `OK: <message>`
    Ok(String),

    /// `DATA: <label> <json>`
    Data { label: &'static str, json: String },

    /// `ERROR: <message>`
    Error(String),
}

impl Response {
    /// Create an OK response
    pub fn ok(message: impl Into<String>) -> Self {
        Response::Ok(message.into())
    }

    /// Create a DATA response by serializing `payload` to JSON
    pub fn data<T: Serialize + ?Sized>(label: &'static str, payload: &T) -> Result<Self> {
        let json = serde_json::to_string(payload)
            .map_err(|e| CellarError::Serialization(e.to_string()))?;
        Ok(Response::Data { label, json })
    }

    /// Create an ERROR response from an error
    pub fn error(err: &CellarError) -> Self {
        Response::Error(err.to_string())
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Ok(message) => write!(f, "OK: {}", message),
            Response::Data { label, json } => write!(f, "DATA: {} {}", label, json),
            Response::Error(message) => write!(f, "ERROR: {}", message),
        }
    }
}
