//! Line codec
//!
//! Stream helpers for the newline-delimited text protocol.
//!
//! ## Wire Format
//! ```text
//! request:   <COMMAND> <args...>\n
//! response:  OK: <message>\n
//!            DATA: <label> <json>\n
//!            ERROR: <message>\n
//! ```
//! A trailing `\r` before the newline is tolerated in both directions.

use std::io::{self, BufRead, Read, Write};

use crate::error::Result;

use super::Response;

/// Read one line into `buf`, without its line terminator
///
/// Returns `Ok(None)` at end of stream. `max_len` bounds the line content;
/// neither `\n` nor `\r\n` counts against it. A longer line is an
/// `InvalidData` I/O error and the rest of it is left unread. A final line
/// without a newline is returned as-is.
pub fn read_line<'a, R: BufRead>(
    reader: &mut R,
    buf: &'a mut Vec<u8>,
    max_len: usize,
) -> Result<Option<&'a [u8]>> {
    buf.clear();

    // Room for the content plus a two-byte terminator
    let limit = (max_len as u64).saturating_add(2);
    let read = reader.by_ref().take(limit).read_until(b'\n', buf)?;
    if read == 0 {
        return Ok(None);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    if buf.len() > max_len {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("line exceeds {} bytes", max_len),
        )
        .into());
    }

    Ok(Some(buf.as_slice()))
}

/// Write a response line and flush
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    writeln!(writer, "{}", response)?;
    writer.flush()?;
    Ok(())
}

/// Write a request line and flush
pub fn write_request<W: Write>(writer: &mut W, line: &str) -> Result<()> {
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Read a single response line (client side)
///
/// End of stream before any byte is `UnexpectedEof`.
pub fn read_response<R: BufRead>(reader: &mut R) -> Result<String> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(
            io::Error::new(io::ErrorKind::UnexpectedEof, "server closed the connection").into(),
        );
    }
    let trimmed = line.trim_end_matches(&['\r', '\n'][..]).len();
    line.truncate(trimmed);
    Ok(line)
}
