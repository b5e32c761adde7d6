//! Session Module
//!
//! The per-connection command dispatcher.
//!
//! ## State Machine
//! ```text
//!                 AUTH ok
//!   ┌─────────────────┐ ─────────────► ┌───────────────┐
//!   │ Unauthenticated │                │ Authenticated │
//!   └─────────────────┘ ◄───────────── └───────────────┘
//!      ▲    │ AUTH fail     LOAD ok / AUTH fail
//!      └────┘ LOAD ok
//! ```
//! Only AUTH, LOAD and QUIT are accepted while unauthenticated. QUIT closes
//! the session from either state.
//!
//! ## Isolation
//! A session owns its `Database` by value. Every session starts from a fresh
//! database holding only the bootstrap user, so concurrent sessions never see
//! each other's unsaved writes; shared state only travels through SAVE/LOAD.

use std::path::Path;

use crate::config::Config;
use crate::error::{CellarError, Result};
use crate::model::Database;
use crate::protocol::{parse_command, Command, Response, HELP_TEXT};
use crate::storage::EncryptionKey;

/// Authentication state of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated { user: String },
}

/// One client's dispatcher: its database, auth state and liveness
pub struct Session {
    database: Database,
    state: SessionState,
    closed: bool,
}

impl Session {
    /// Create a session seeded with the configured bootstrap user
    pub fn new(config: &Config) -> Self {
        Self::with_database(Database::with_user(
            &config.bootstrap_user,
            &config.bootstrap_password,
        ))
    }

    /// Create an unauthenticated session over an existing database
    pub fn with_database(database: Database) -> Self {
        Self {
            database,
            state: SessionState::Unauthenticated,
            closed: false,
        }
    }

    /// Parse and execute one line
    ///
    /// Returns `None` for a blank line; otherwise exactly one response.
    pub fn handle_line(&mut self, line: &str) -> Option<Response> {
        match parse_command(line) {
            Ok(None) => None,
            Ok(Some(command)) => Some(self.execute(command)),
            Err(e) => {
                tracing::debug!("Rejected malformed command: {}", e);
                Some(Response::error(&e))
            }
        }
    }

    /// Execute a parsed command
    ///
    /// Every failure becomes an `ERROR` response; nothing here ends the
    /// session except QUIT.
    pub fn execute(&mut self, command: Command) -> Response {
        tracing::trace!("Executing {}", command.name());

        if !command.allowed_unauthenticated() && !self.is_authenticated() {
            return Response::error(&CellarError::NotAuthenticated);
        }

        match self.dispatch(command) {
            Ok(response) => response,
            Err(e) => Response::error(&e),
        }
    }

    fn dispatch(&mut self, command: Command) -> Result<Response> {
        let db = &mut self.database;

        let response = match command {
            Command::Auth { user, password } => return self.authenticate(&user, &password),
            Command::Load { path, key } => return self.load(&path, &key),
            Command::Quit => {
                self.closed = true;
                Response::ok("goodbye")
            }
            Command::Help => Response::ok(HELP_TEXT),

            Command::Save { path, key } => {
                db.save(&path, &key)?;
                Response::ok("database saved")
            }

            Command::CreateTable { table } => {
                db.create_table(&table)?;
                Response::ok("table created")
            }
            Command::AddRow { table, row } => {
                db.add_row(&table, &row)?;
                Response::ok("row added")
            }
            Command::AddColumn { table, row, values } => {
                // Each listed value becomes its own single-value column
                let columns = values.into_iter().map(|v| vec![v]).collect();
                db.add_columns(&table, &row, columns)?;
                Response::ok("column added")
            }
            Command::UpdateColumn {
                table,
                row,
                index,
                values,
            } => {
                db.update_column(&table, &row, index, values)?;
                Response::ok("column updated")
            }

            Command::GetTable { table } => {
                let columns = db.get_columns(&table).ok_or(CellarError::TableNotFound)?;
                Response::data("table", columns)?
            }
            Command::GetRow { table, row } => match db.get_row(&table, &row) {
                Some(found) => Response::data("row", found.columns())?,
                None if db.table(&table).is_none() => return Err(CellarError::TableNotFound),
                None => return Err(CellarError::RowNotFound),
            },

            Command::DeleteTable { table } => {
                db.delete_table(&table)?;
                Response::ok("table deleted")
            }
            Command::DeleteRow { table, row } => {
                db.delete_row(&table, &row)?;
                Response::ok("row deleted")
            }
            Command::DeleteColumn { table, row, index } => {
                db.delete_column(&table, &row, index)?;
                Response::ok("column deleted")
            }

            Command::ListTables => Response::data("tables", &db.list_tables())?,
            Command::ListRows { table } => Response::data("rows", &db.list_rows(&table)?)?,
            Command::ListUsers => Response::data("users", &db.list_users())?,

            Command::UserAdd { user, password } => {
                db.add_user(&user, &password)?;
                Response::ok("user added")
            }
            Command::UserRemove { user } => {
                db.remove_user(&user)?;
                Response::ok("user removed")
            }
            Command::UserUpdate { user, password } => {
                db.update_user_password(&user, &password)?;
                Response::ok("user updated")
            }
        };

        Ok(response)
    }

    fn authenticate(&mut self, user: &str, password: &str) -> Result<Response> {
        let verified = match self.database.verify_user(user, password) {
            Ok(verified) => verified,
            Err(CellarError::UserNotFound) => false,
            Err(e) => return Err(e),
        };

        if !verified {
            tracing::warn!("Authentication failed for user {:?}", user);
            self.state = SessionState::Unauthenticated;
            return Err(CellarError::AuthenticationFailed);
        }

        tracing::debug!("User {:?} authenticated", user);
        self.state = SessionState::Authenticated {
            user: user.to_string(),
        };
        Ok(Response::ok("authenticated"))
    }

    fn load(&mut self, path: &Path, key: &EncryptionKey) -> Result<Response> {
        // On failure the current database and state are left untouched
        let loaded = Database::load(path, key)?;
        self.database = loaded;
        self.state = SessionState::Unauthenticated;
        Ok(Response::ok("database loaded"))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated { .. })
    }

    /// Whether QUIT has been received
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn database(&self) -> &Database {
        &self.database
    }
}
