//! Protocol codec
//!
//! Line framing for the wire protocol.
//!
//! ## Framing
//! ```text
//! buffer:  S E T ␠ a ␠ 1 \r \n G E T ␠ a \n ...
//!          └──── line ───┘ └─┘ └─ line ┘ └┘
//!                      terminator     terminator
//! ```
//! The earliest `\n` or `\r` ends a line. If that byte and the next one form
//! `\r\n` or `\n\r`, both are consumed; otherwise just the one byte.

use std::io::Write;

use bytes::{Buf, BytesMut};

use crate::error::Result;
use super::Response;

/// Bytes requested from the socket per read
pub const READ_CHUNK_SIZE: usize = 4096;

/// Soft ceiling on line length (64 KiB). Advisory only: the server does not
/// reject longer lines.
pub const MAX_LINE: usize = 64 * 1024;

/// Position of the earliest line delimiter (`\n` or `\r`)
pub fn find_delimiter(buf: &[u8]) -> Option<usize> {
    buf.iter().position(|&b| b == b'\n' || b == b'\r')
}

/// Split the next raw line off the front of `buf`
///
/// Returns `None` when no delimiter has arrived yet; `buf` is left untouched
/// so the caller can append more bytes. The terminator is consumed but not
/// returned.
pub fn split_frame(buf: &mut BytesMut) -> Option<BytesMut> {
    let pos = find_delimiter(buf)?;
    let line = buf.split_to(pos);

    let width = match (buf.first(), buf.get(1)) {
        (Some(b'\r'), Some(b'\n')) | (Some(b'\n'), Some(b'\r')) => 2,
        _ => 1,
    };
    buf.advance(width);

    Some(line)
}

/// Extract the next non-empty command line from `buf`
///
/// Lines are decoded as UTF-8 (invalid sequences replaced) and trimmed.
/// Blank lines are consumed and skipped.
pub fn next_line(buf: &mut BytesMut) -> Option<String> {
    while let Some(frame) = split_frame(buf) {
        let text = String::from_utf8_lossy(&frame);
        let text = text.trim();
        if !text.is_empty() {
            return Some(text.to_string());
        }
    }
    None
}

/// Write a response line to a stream and flush it
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    writer.write_all(&response.encode())?;
    writer.flush()?;
    Ok(())
}
