//! TCP Client
//!
//! Blocking line client used by the CLI and by tests.

use std::io::{ErrorKind, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::error::{KvError, Result};
use crate::protocol::{Response, MAX_LINE, READ_CHUNK_SIZE};

/// Outcome of a single request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Text received up to and including the first newline, right-trimmed
    Response(String),

    /// No complete line within the reply timeout; the connection stays open
    Timeout,

    /// The server closed the connection
    Closed,
}

/// Client connection to a LineKV server
pub struct Client {
    stream: TcpStream,
}

impl Client {
    /// How long to wait for the greeting
    pub const BANNER_TIMEOUT: Duration = Duration::from_secs(1);

    /// How long to wait for each response
    pub const REPLY_TIMEOUT: Duration = Duration::from_secs(3);

    /// Connect to a server
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        Ok(Self { stream })
    }

    /// Read the greeting, if one arrives within `BANNER_TIMEOUT`
    pub fn read_banner(&mut self) -> Result<Option<String>> {
        self.stream.set_read_timeout(Some(Self::BANNER_TIMEOUT))?;

        let mut buf = vec![0u8; MAX_LINE];
        let result = self.stream.read(&mut buf);
        self.stream.set_read_timeout(None)?;

        match result {
            Ok(0) => Ok(None),
            Ok(n) => Ok(Some(
                String::from_utf8_lossy(&buf[..n]).trim_end().to_string(),
            )),
            Err(e) if is_timeout(e.kind()) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Send `line` (newline appended) and wait for one response line
    pub fn request(&mut self, line: &str) -> Result<Reply> {
        let mut message = String::with_capacity(line.len() + 1);
        message.push_str(line);
        message.push('\n');

        match self.stream.write_all(message.as_bytes()) {
            Ok(()) => {}
            Err(e) if is_closed(e.kind()) => return Ok(Reply::Closed),
            Err(e) => return Err(e.into()),
        }

        self.stream.set_read_timeout(Some(Self::REPLY_TIMEOUT))?;
        let reply = self.read_reply();
        self.stream.set_read_timeout(None)?;
        reply
    }

    /// Send `line` and parse the response
    ///
    /// Timeouts and closed connections are reported as protocol errors.
    pub fn call(&mut self, line: &str) -> Result<Response> {
        match self.request(line)? {
            Reply::Response(text) => Response::parse(&text),
            Reply::Timeout => Err(KvError::Protocol(
                "timed out waiting for response".to_string(),
            )),
            Reply::Closed => Err(KvError::Protocol(
                "connection closed by server".to_string(),
            )),
        }
    }

    fn read_reply(&mut self) -> Result<Reply> {
        let mut data = Vec::new();
        let mut chunk = [0u8; READ_CHUNK_SIZE];

        loop {
            match self.stream.read(&mut chunk) {
                Ok(0) => return Ok(Reply::Closed),
                Ok(n) => {
                    data.extend_from_slice(&chunk[..n]);
                    if data.contains(&b'\n') {
                        break;
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if is_timeout(e.kind()) => return Ok(Reply::Timeout),
                Err(e) if is_closed(e.kind()) => return Ok(Reply::Closed),
                Err(e) => return Err(e.into()),
            }
        }

        let text = String::from_utf8_lossy(&data).trim_end().to_string();
        Ok(Reply::Response(text))
    }
}

/// Read timeouts surface as WouldBlock on Unix and TimedOut on Windows
fn is_timeout(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::WouldBlock | ErrorKind::TimedOut)
}

fn is_closed(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::BrokenPipe | ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted
    )
}
