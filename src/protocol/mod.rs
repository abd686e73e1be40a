//! Protocol Module
//!
//! Defines the line-oriented wire protocol for client-server communication.
//!
//! ## Requests
//! One command per line. A line ends at `\n`, `\r`, `\r\n` or `\n\r`, all
//! treated the same. Blank lines are ignored.
//! ```text
//! SET <key> <value...>     value may contain spaces
//! GET <key>
//! DEL <key>
//! KEYS
//! QUIT | EXIT
//! ```
//!
//! ## Responses
//! Exactly one `\n`-terminated line per request:
//! ```text
//! OK | NIL | VALUE <payload> | BYE | ERR <message>
//! ```
//! The server greets every new connection with `OK KV-STORE READY`.

mod command;
mod response;
mod codec;

pub use command::{Command, CommandType};
pub use response::Response;
pub use codec::{
    find_delimiter, next_line, split_frame, write_response, MAX_LINE, READ_CHUNK_SIZE,
};
