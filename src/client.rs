//! Client
//!
//! Blocking line client for a Cellar server.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};

use crate::error::{CellarError, Result};
use crate::protocol::{read_response, write_request};

/// A connected client
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    /// Connect to a server
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        let read_stream = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
        })
    }

    /// Send one command line and wait for its response line
    ///
    /// Blank lines get no response from the server, so they are refused here.
    pub fn send(&mut self, line: &str) -> Result<String> {
        if line.trim().is_empty() {
            return Err(CellarError::protocol("empty command"));
        }
        if line.contains('\n') {
            return Err(CellarError::protocol("command must be a single line"));
        }
        write_request(&mut self.writer, line)?;
        read_response(&mut self.reader)
    }
}
