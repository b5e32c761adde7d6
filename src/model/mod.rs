//! Data Model Module
//!
//! In-memory hierarchy: Database → Table → Row → Column → Value.
//!
//! ## Ordering
//! Every container keeps insertion order. Deletes are ordered removals, so
//! the indices of later siblings shift down by one. Identifiers are matched
//! exactly (case-sensitive, no wildcards).

mod value;
mod table;
mod database;

pub use value::{Value, ValueKind};
pub use table::{Column, Row, Table};
pub use database::Database;
