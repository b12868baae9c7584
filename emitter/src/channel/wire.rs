use std::io::{self, ErrorKind, Write};

use bytes::BytesMut;
use http::StatusCode;

use crate::http::LINE_DELIMITER;

use super::{ConnectionStatus, OutputChannel};

/// [`OutputChannel`] over a plain byte writer such as a socket or stdout.
///
/// Header lines are buffered until the first body write (or [`finish`]),
/// then the status line, the headers and the blank line go out in a single
/// write. Write failures that mean the peer is gone flip the connection
/// status instead of surfacing as errors, and every write after that is
/// dropped.
///
/// Dropping the channel sends nothing that is still buffered: a response
/// without body bytes (a 204, a 304, an empty body) only reaches the writer
/// through [`finish`] or [`send_headers`].
///
/// [`finish`]: WireChannel::finish
/// [`send_headers`]: WireChannel::send_headers
#[derive(Debug)]
pub struct WireChannel<W> {
    writer: W,
    status_line: Option<String>,
    status: Option<StatusCode>,
    /// `(name, line)` pairs in the order they go on the wire.
    fields: Vec<(String, String)>,
    headers_sent: bool,
    connection: ConnectionStatus,
}

impl<W: Write> WireChannel<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            status_line: None,
            status: None,
            fields: Vec::new(),
            headers_sent: false,
            connection: ConnectionStatus::Normal,
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Writes the response head now, if it has not been written yet.
    pub fn send_headers(&mut self) -> io::Result<()> {
        if self.headers_sent {
            return Ok(());
        }
        self.headers_sent = true;

        let mut dst = BytesMut::with_capacity(256);
        match &self.status_line {
            Some(line) => dst.extend_from_slice(line.as_bytes()),
            None => {
                let status = self.status.unwrap_or(StatusCode::OK);
                let line = format!(
                    "HTTP/1.1 {} {}",
                    status.as_str(),
                    status.canonical_reason().unwrap_or_default()
                );
                dst.extend_from_slice(line.as_bytes());
            }
        }
        dst.extend_from_slice(LINE_DELIMITER);

        for (_, line) in &self.fields {
            dst.extend_from_slice(line.as_bytes());
            dst.extend_from_slice(LINE_DELIMITER);
        }
        dst.extend_from_slice(LINE_DELIMITER);

        self.deliver(&dst)
    }

    /// Sends the head if nothing was written yet, flushes and hands the
    /// writer back.
    pub fn finish(mut self) -> io::Result<W> {
        self.send_headers()?;

        if self.connection.is_normal() {
            if let Err(err) = self.writer.flush() {
                self.absorb(err)?;
            }
        }

        Ok(self.writer)
    }

    fn deliver(&mut self, data: &[u8]) -> io::Result<()> {
        if !self.connection.is_normal() {
            return Ok(());
        }

        match self.writer.write_all(data) {
            Ok(()) => Ok(()),
            Err(err) => self.absorb(err),
        }
    }

    /// Turns disconnect-like errors into a connection status change.
    fn absorb(&mut self, err: io::Error) -> io::Result<()> {
        let status = match err.kind() {
            ErrorKind::BrokenPipe
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::NotConnected
            | ErrorKind::WriteZero
            | ErrorKind::UnexpectedEof => ConnectionStatus::Aborted,
            ErrorKind::TimedOut | ErrorKind::WouldBlock => ConnectionStatus::TimedOut,
            _ => return Err(err),
        };

        tracing::debug!(%err, ?status, "peer stopped accepting data");
        self.connection = status;
        Ok(())
    }
}

impl<W: Write> OutputChannel for WireChannel<W> {
    fn headers_sent(&self) -> bool {
        self.headers_sent
    }

    fn header(&mut self, line: &str, replace: bool, status: Option<StatusCode>) -> io::Result<()> {
        if self.headers_sent {
            return Err(io::Error::new(ErrorKind::Other, "headers already sent"));
        }

        if memchr::memchr2(b'\r', b'\n', line.as_bytes()).is_some() {
            return Err(invalid_line("header line must not contain CR or LF"));
        }

        if let Some(status) = status {
            self.status = Some(status);
        }

        if line.starts_with("HTTP/") {
            self.status_line = Some(line.to_string());
            return Ok(());
        }

        let Some(colon) = memchr::memchr(b':', line.as_bytes()) else {
            return Err(invalid_line("header line is missing a colon"));
        };

        let name = line[..colon].trim();
        if name.is_empty() {
            return Err(invalid_line("header line has an empty name"));
        }

        if replace {
            self.fields.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
        }
        self.fields.push((name.to_string(), line.to_string()));

        Ok(())
    }

    fn write_body(&mut self, data: &[u8]) -> io::Result<()> {
        self.send_headers()?;
        self.deliver(data)
    }

    fn connection_status(&self) -> ConnectionStatus {
        self.connection
    }
}

fn invalid_line(msg: &'static str) -> io::Error {
    io::Error::new(ErrorKind::InvalidInput, msg)
}
