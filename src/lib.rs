//! # Cellar
//!
//! A minimal embedded table store with:
//! - An in-memory Database → Table → Row → Column → Value model
//! - Encrypted, authenticated whole-database snapshots
//! - Per-database users with password digests
//! - A line-oriented TCP protocol, one isolated session per connection
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │             (one thread per connection)                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ lines
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Session (Dispatcher)                         │
//! │        parse → auth gate → execute → OK/DATA/ERROR           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Database   │ ───────► │   Storage   │
//!   │ (in memory) │ SAVE/LOAD│ (encrypted) │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod auth;
pub mod model;
pub mod storage;
pub mod protocol;
pub mod session;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CellarError, Result};
pub use config::Config;
pub use model::{Column, Database, Row, Table, Value};
pub use session::Session;
pub use storage::EncryptionKey;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of Cellar
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
