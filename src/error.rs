//! Error types for Cellar
//!
//! Provides a unified error type for all operations. The `Display` text of
//! each variant is exactly what follows `ERROR: ` on the wire.

use thiserror::Error;

/// Result type alias using CellarError
pub type Result<T> = std::result::Result<T, CellarError>;

/// Unified error type for Cellar operations
#[derive(Debug, Error)]
pub enum CellarError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Persistence Format Errors
    // -------------------------------------------------------------------------
    #[error("invalid database format")]
    InvalidDatabaseFormat,

    #[error("invalid type tag: {0}")]
    InvalidTypeTag(u8),

    #[error("encryption failed: {0}")]
    Encryption(String),

    // -------------------------------------------------------------------------
    // Existence Errors
    // -------------------------------------------------------------------------
    #[error("table already exists")]
    TableAlreadyExists,

    #[error("table not found")]
    TableNotFound,

    #[error("row already exists")]
    RowAlreadyExists,

    #[error("row not found")]
    RowNotFound,

    #[error("user already exists")]
    UserAlreadyExists,

    #[error("user not found")]
    UserNotFound,

    // -------------------------------------------------------------------------
    // Shape Errors
    // -------------------------------------------------------------------------
    #[error("invalid column index")]
    InvalidColumnIndex,

    #[error("invalid value count")]
    InvalidValueCount,

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Protocol / Session Errors
    // -------------------------------------------------------------------------
    #[error("{0}")]
    Protocol(String),

    #[error("must authenticate first")]
    NotAuthenticated,

    #[error("authentication failed")]
    AuthenticationFailed,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("configuration error: {0}")]
    Config(String),
}

impl CellarError {
    /// Shorthand for a protocol-shape error
    pub fn protocol(message: impl Into<String>) -> Self {
        CellarError::Protocol(message.into())
    }
}
