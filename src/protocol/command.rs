//! Command definitions
//!
//! Represents parsed client commands.

use std::path::PathBuf;

use crate::model::Value;
use crate::storage::EncryptionKey;

/// A parsed command
#[derive(Debug, Clone)]
pub enum Command {
    /// Authenticate against the session's current user set
    Auth { user: String, password: String },

    /// Replace the session's database with one loaded from disk
    Load { path: PathBuf, key: EncryptionKey },

    /// Write the session's database to disk
    Save { path: PathBuf, key: EncryptionKey },

    CreateTable { table: String },

    AddRow { table: String, row: String },

    AddColumn {
        table: String,
        row: String,
        values: Vec<Value>,
    },

    GetTable { table: String },

    GetRow { table: String, row: String },

    UpdateColumn {
        table: String,
        row: String,
        index: usize,
        values: Vec<Value>,
    },

    DeleteTable { table: String },

    DeleteRow { table: String, row: String },

    DeleteColumn {
        table: String,
        row: String,
        index: usize,
    },

    ListTables,

    ListRows { table: String },

    ListUsers,

    UserAdd { user: String, password: String },

    UserRemove { user: String },

    UserUpdate { user: String, password: String },

    /// End the session
    Quit,

    Help,
}

impl Command {
    /// Command name for logging (never includes arguments)
    pub fn name(&self) -> &'static str {
        match self {
            Command::Auth { .. } => "AUTH",
            Command::Load { .. } => "LOAD",
            Command::Save { .. } => "SAVE",
            Command::CreateTable { .. } => "CREATE TABLE",
            Command::AddRow { .. } => "ADD ROW",
            Command::AddColumn { .. } => "ADD COLUMN",
            Command::GetTable { .. } => "GET TABLE",
            Command::GetRow { .. } => "GET ROW",
            Command::UpdateColumn { .. } => "UPDATE COLUMN",
            Command::DeleteTable { .. } => "DELETE TABLE",
            Command::DeleteRow { .. } => "DELETE ROW",
            Command::DeleteColumn { .. } => "DELETE COLUMN",
            Command::ListTables => "LIST TABLES",
            Command::ListRows { .. } => "LIST ROWS",
            Command::ListUsers => "LIST USERS",
            Command::UserAdd { .. } => "USER ADD",
            Command::UserRemove { .. } => "USER REMOVE",
            Command::UserUpdate { .. } => "USER UPDATE",
            Command::Quit => "QUIT",
            Command::Help => "HELP",
        }
    }

    /// Whether the command may run before authentication
    pub fn allowed_unauthenticated(&self) -> bool {
        matches!(
            self,
            Command::Auth { .. } | Command::Load { .. } | Command::Quit
        )
    }
}
