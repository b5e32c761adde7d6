//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor loop
//! - One thread per connection, each with its own `Session`
//! - Threads tracked and joined on shutdown

mod server;
mod connection;

pub use server::{Server, ShutdownHandle};
pub use connection::Connection;
