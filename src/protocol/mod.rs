//! Protocol Module
//!
//! Defines the line-oriented text protocol for client-server communication.
//!
//! ## Request Format
//! One command per line, space-separated, case-sensitive keywords:
//! ```text
//! AUTH <user> <password>
//! LOAD <path> <64-hex-char key>
//! CREATE TABLE <table>
//! ADD ROW <table> <row>
//! ADD COLUMN <table> <row> values=<v1,v2,...>
//! GET TABLE <table>
//! GET ROW <table> <row>
//! UPDATE COLUMN <table> <row> <index> values=<v1,v2,...>
//! DELETE TABLE|ROW <table> [<row>]
//! DELETE COLUMN <table> <row> <index>
//! LIST TABLES | LIST ROWS <table> | LIST USERS
//! USER ADD|REMOVE|UPDATE <user> [<password>]
//! SAVE <path> <64-hex-char key>
//! QUIT
//! HELP
//! ```
//!
//! ## Response Format
//! - `OK: <message>`
//! - `DATA: <label> <json>`
//! - `ERROR: <message>`

mod command;
mod parser;
mod response;
mod codec;

pub use command::Command;
pub use parser::{parse_command, parse_values, HELP_TEXT};
pub use response::Response;
pub use codec::{read_line, read_response, write_request, write_response};
