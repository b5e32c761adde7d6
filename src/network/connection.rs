//! Connection Handler
//!
//! Handles individual client connections.

use std::io::{BufReader, BufWriter, ErrorKind};
use std::net::TcpStream;

use crate::config::Config;
use crate::error::{CellarError, Result};
use crate::protocol::{read_line, write_response, Response};
use crate::session::Session;

/// Handles a single client connection
///
/// Everything a connection allocates (its session database and line buffer)
/// is owned here and released together when the connection is dropped.
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// This client's dispatcher and database
    session: Session,

    /// Reused scratch buffer for incoming lines
    line_buf: Vec<u8>,

    /// Longest accepted line
    max_line_length: usize,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler with a fresh session
    pub fn new(stream: TcpStream, config: &Config) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            session: Session::new(config),
            line_buf: Vec::with_capacity(config.max_line_length.min(64 * 1024)),
            max_line_length: config.max_line_length,
            peer_addr,
        })
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Returns when the client sends QUIT, disconnects, or a read fails.
    /// Data-level errors never end the loop, and neither do write failures.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        loop {
            let line = match read_line(&mut self.reader, &mut self.line_buf, self.max_line_length) {
                Ok(Some(line)) => line,
                Ok(None) => {
                    tracing::debug!("Client {} disconnected", self.peer_addr);
                    return Ok(());
                }
                Err(CellarError::Io(ref e))
                    if matches!(
                        e.kind(),
                        ErrorKind::ConnectionReset
                            | ErrorKind::ConnectionAborted
                            | ErrorKind::NotConnected
                    ) =>
                {
                    tracing::debug!("Connection to {} closed: {}", self.peer_addr, e);
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                    let _ = write_response(&mut self.writer, &Response::error(&e));
                    return Err(e);
                }
            };

            let response = match std::str::from_utf8(line) {
                Ok(text) => self.session.handle_line(text),
                Err(_) => Some(Response::error(&CellarError::protocol(
                    "command is not valid UTF-8",
                ))),
            };

            if let Some(response) = response {
                if let Err(e) = write_response(&mut self.writer, &response) {
                    tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
                }
            }

            if self.session.is_closed() {
                tracing::debug!("Client {} quit", self.peer_addr);
                return Ok(());
            }
        }
    }
}
