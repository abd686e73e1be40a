//! Connection Handler
//!
//! Handles individual client connections.

use std::io::{BufWriter, ErrorKind, Read};
use std::net::TcpStream;
use std::sync::Arc;

use bytes::BytesMut;

use crate::engine::Engine;
use crate::error::{KvError, Result};
use crate::protocol::{next_line, write_response, Response, READ_CHUNK_SIZE};

/// Handles a single client connection
pub struct Connection {
    /// TCP stream read side (reads are chunked, no extra buffering)
    reader: TcpStream,

    /// TCP stream writer (buffered, flushed after every response)
    writer: BufWriter<TcpStream>,

    /// Bytes received but not yet split into lines
    buffer: BytesMut,

    /// Reference to the engine
    engine: Arc<Engine>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    pub fn new(stream: TcpStream, engine: Arc<Engine>) -> Result<Self> {
        // Get peer address for logging before we split the stream
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm: every response is a small line
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: read_stream,
            writer: BufWriter::new(write_stream),
            buffer: BytesMut::with_capacity(READ_CHUNK_SIZE),
            engine,
            peer_addr,
        })
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Sends the greeting, then reads lines and answers each one.
    /// Returns when the client disconnects, sends QUIT/EXIT, or an error occurs.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        match self.serve() {
            Err(KvError::Io(ref e)) if is_disconnect(e.kind()) => {
                tracing::debug!("Client {} went away: {}", self.peer_addr, e);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Connection error with {}: {}", self.peer_addr, e);
                Err(e)
            }
            Ok(()) => {
                tracing::debug!("Client {} disconnected", self.peer_addr);
                Ok(())
            }
        }
    }

    /// Answer with `response` and close without reading anything
    pub fn refuse(mut self, response: Response) -> Result<()> {
        tracing::debug!("Refusing {}: {}", self.peer_addr, response);
        self.send_response(&response)
    }

    fn serve(&mut self) -> Result<()> {
        self.send_response(&Response::Ready)?;

        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            let n = match self.reader.read(&mut chunk) {
                Ok(0) => return Ok(()),
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            self.buffer.extend_from_slice(&chunk[..n]);

            while let Some(line) = next_line(&mut self.buffer) {
                let response = self.engine.dispatch(&line);
                self.send_response(&response)?;

                if response.closes_connection() {
                    return Ok(());
                }
            }
        }
    }

    /// Send a response to the client
    fn send_response(&mut self, response: &Response) -> Result<()> {
        write_response(&mut self.writer, response)?;
        tracing::debug!("[{}] -> {}", self.peer_addr, response);
        Ok(())
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

/// Socket errors that just mean the peer is gone
fn is_disconnect(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
            | ErrorKind::UnexpectedEof
    )
}
