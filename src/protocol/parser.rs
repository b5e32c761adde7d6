//! Command parser
//!
//! Turns one text line into a `Command`. Keywords are case-sensitive and
//! space-separated; a `values=` list runs to the end of the line.
//!
//! Nothing here touches a database: every shape error (missing or extra
//! tokens, bad index, bad key) is reported before dispatch.

use std::path::PathBuf;

use crate::error::{CellarError, Result};
use crate::model::Value;
use crate::storage::EncryptionKey;

use super::Command;

const VALUES_PREFIX: &str = "values=";

/// Grammar summary returned by HELP
pub const HELP_TEXT: &str = "commands: \
AUTH <user> <password> | \
LOAD <path> <hex-key> | \
SAVE <path> <hex-key> | \
CREATE TABLE <table> | \
ADD ROW <table> <row> | \
ADD COLUMN <table> <row> values=<v1,v2,...> | \
GET TABLE <table> | \
GET ROW <table> <row> | \
UPDATE COLUMN <table> <row> <index> values=<v1,v2,...> | \
DELETE TABLE <table> | \
DELETE ROW <table> <row> | \
DELETE COLUMN <table> <row> <index> | \
LIST TABLES | LIST ROWS <table> | LIST USERS | \
USER ADD <user> <password> | USER REMOVE <user> | USER UPDATE <user> <password> | \
QUIT | HELP";

/// Parse a command line
///
/// Returns `Ok(None)` for a blank line.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let mut tokens = Tokens::new(line);

    let keyword = match tokens.next() {
        Some(k) => k,
        None => return Ok(None),
    };

    let command = match keyword {
        "AUTH" => {
            const USAGE: &str = "AUTH <user> <password>";
            let user = tokens.required(USAGE)?;
            let password = tokens.required(USAGE)?;
            tokens.finish(USAGE)?;
            Command::Auth { user, password }
        }
        "LOAD" | "SAVE" => {
            let usage = if keyword == "LOAD" {
                "LOAD <path> <hex-key>"
            } else {
                "SAVE <path> <hex-key>"
            };
            let path = PathBuf::from(tokens.required(usage)?);
            let key = EncryptionKey::from_hex(&tokens.required(usage)?)?;
            tokens.finish(usage)?;
            if keyword == "LOAD" {
                Command::Load { path, key }
            } else {
                Command::Save { path, key }
            }
        }
        "CREATE" => match tokens.next() {
            Some("TABLE") => {
                const USAGE: &str = "CREATE TABLE <table>";
                let table = tokens.required(USAGE)?;
                tokens.finish(USAGE)?;
                Command::CreateTable { table }
            }
            _ => return Err(usage("CREATE TABLE <table>")),
        },
        "ADD" => match tokens.next() {
            Some("ROW") => {
                const USAGE: &str = "ADD ROW <table> <row>";
                let table = tokens.required(USAGE)?;
                let row = tokens.required(USAGE)?;
                tokens.finish(USAGE)?;
                Command::AddRow { table, row }
            }
            Some("COLUMN") => {
                const USAGE: &str = "ADD COLUMN <table> <row> values=<v1,v2,...>";
                let table = tokens.required(USAGE)?;
                let row = tokens.required(USAGE)?;
                let values = tokens.values(USAGE)?;
                Command::AddColumn { table, row, values }
            }
            _ => return Err(usage("ADD ROW|COLUMN ...")),
        },
        "GET" => match tokens.next() {
            Some("TABLE") => {
                const USAGE: &str = "GET TABLE <table>";
                let table = tokens.required(USAGE)?;
                tokens.finish(USAGE)?;
                Command::GetTable { table }
            }
            Some("ROW") => {
                const USAGE: &str = "GET ROW <table> <row>";
                let table = tokens.required(USAGE)?;
                let row = tokens.required(USAGE)?;
                tokens.finish(USAGE)?;
                Command::GetRow { table, row }
            }
            _ => return Err(usage("GET TABLE|ROW ...")),
        },
        "UPDATE" => match tokens.next() {
            Some("COLUMN") => {
                const USAGE: &str = "UPDATE COLUMN <table> <row> <index> values=<v1,v2,...>";
                let table = tokens.required(USAGE)?;
                let row = tokens.required(USAGE)?;
                let index = parse_index(&tokens.required(USAGE)?)?;
                let values = tokens.values(USAGE)?;
                Command::UpdateColumn {
                    table,
                    row,
                    index,
                    values,
                }
            }
            _ => return Err(usage("UPDATE COLUMN <table> <row> <index> values=<v1,v2,...>")),
        },
        "DELETE" => match tokens.next() {
            Some("TABLE") => {
                const USAGE: &str = "DELETE TABLE <table>";
                let table = tokens.required(USAGE)?;
                tokens.finish(USAGE)?;
                Command::DeleteTable { table }
            }
            Some("ROW") => {
                const USAGE: &str = "DELETE ROW <table> <row>";
                let table = tokens.required(USAGE)?;
                let row = tokens.required(USAGE)?;
                tokens.finish(USAGE)?;
                Command::DeleteRow { table, row }
            }
            Some("COLUMN") => {
                const USAGE: &str = "DELETE COLUMN <table> <row> <index>";
                let table = tokens.required(USAGE)?;
                let row = tokens.required(USAGE)?;
                let index = parse_index(&tokens.required(USAGE)?)?;
                tokens.finish(USAGE)?;
                Command::DeleteColumn { table, row, index }
            }
            _ => return Err(usage("DELETE TABLE|ROW|COLUMN ...")),
        },
        "LIST" => {
            let command = match tokens.next() {
                Some("TABLES") => Command::ListTables,
                Some("USERS") => Command::ListUsers,
                Some("ROWS") => Command::ListRows {
                    table: tokens.required("LIST ROWS <table>")?,
                },
                _ => return Err(usage("LIST TABLES | LIST ROWS <table> | LIST USERS")),
            };
            tokens.finish("LIST TABLES | LIST ROWS <table> | LIST USERS")?;
            command
        }
        "USER" => match tokens.next() {
            Some("ADD") => {
                const USAGE: &str = "USER ADD <user> <password>";
                let user = tokens.required(USAGE)?;
                let password = tokens.required(USAGE)?;
                tokens.finish(USAGE)?;
                Command::UserAdd { user, password }
            }
            Some("REMOVE") => {
                const USAGE: &str = "USER REMOVE <user>";
                let user = tokens.required(USAGE)?;
                tokens.finish(USAGE)?;
                Command::UserRemove { user }
            }
            Some("UPDATE") => {
                const USAGE: &str = "USER UPDATE <user> <password>";
                let user = tokens.required(USAGE)?;
                let password = tokens.required(USAGE)?;
                tokens.finish(USAGE)?;
                Command::UserUpdate { user, password }
            }
            _ => return Err(usage("USER ADD|REMOVE|UPDATE <user> [<password>]")),
        },
        "QUIT" => {
            tokens.finish("QUIT")?;
            Command::Quit
        }
        "HELP" => {
            tokens.finish("HELP")?;
            Command::Help
        }
        other => {
            return Err(CellarError::protocol(format!("unknown command: {}", other)));
        }
    };

    Ok(Some(command))
}

/// Split a `values=` payload into auto-typed values
pub fn parse_values(list: &str) -> Vec<Value> {
    list.split(',').map(Value::from_literal).collect()
}

fn parse_index(token: &str) -> Result<usize> {
    token
        .parse::<usize>()
        .map_err(|_| CellarError::protocol(format!("invalid column index: {}", token)))
}

fn usage(usage: &str) -> CellarError {
    CellarError::protocol(format!("usage: {}", usage))
}

/// Whitespace tokenizer that can hand back the unconsumed tail of the line
struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Tokens<'a> {
    fn new(line: &'a str) -> Self {
        Self { rest: line }
    }

    fn next(&mut self) -> Option<&'a str> {
        let trimmed = self.rest.trim_start();
        if trimmed.is_empty() {
            self.rest = trimmed;
            return None;
        }
        let end = trimmed
            .find(char::is_whitespace)
            .unwrap_or(trimmed.len());
        let (token, rest) = trimmed.split_at(end);
        self.rest = rest;
        Some(token)
    }

    fn required(&mut self, usage_text: &str) -> Result<String> {
        self.next()
            .map(str::to_string)
            .ok_or_else(|| usage(usage_text))
    }

    /// Reject trailing tokens
    fn finish(&mut self, usage_text: &str) -> Result<()> {
        match self.next() {
            None => Ok(()),
            Some(_) => Err(usage(usage_text)),
        }
    }

    /// Consume the rest of the line as a `values=` list
    fn values(&mut self, usage_text: &str) -> Result<Vec<Value>> {
        let list = self
            .rest
            .trim()
            .strip_prefix(VALUES_PREFIX)
            .ok_or_else(|| usage(usage_text))?;
        self.rest = "";
        if list.trim().is_empty() {
            return Err(CellarError::protocol("missing values"));
        }
        Ok(parse_values(list))
    }
}
