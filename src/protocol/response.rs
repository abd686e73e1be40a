//! Response definitions
//!
//! Represents response lines sent to clients.

use std::fmt;

use crate::error::{KvError, Result};

/// A response line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Greeting sent once when a connection opens
    Ready,

    /// Mutation applied
    Ok,

    /// Key absent
    Nil,

    /// Value or key listing payload
    Value(String),

    /// Session ends after this line
    Bye,

    /// Error with message
    Error(String),
}

impl Response {
    const GREETING: &'static str = "OK KV-STORE READY";

    /// Reply to an unknown verb or a wrong argument count
    pub fn bad_args() -> Self {
        Response::Error("unknown command or bad args".to_string())
    }

    /// Reply to a command whose execution failed
    pub fn server_error(err: &KvError) -> Self {
        Response::Error(format!("server error: {}", err.kind()))
    }

    /// Refusal sent when the connection limit is reached
    pub fn busy() -> Self {
        Response::Error("server busy".to_string())
    }

    /// Whether the connection closes after this response is flushed
    pub fn closes_connection(&self) -> bool {
        matches!(self, Response::Bye)
    }

    /// Encode as a `\n`-terminated line
    pub fn encode(&self) -> Vec<u8> {
        let mut line = self.to_string();
        if !line.ends_with('\n') {
            line.push('\n');
        }
        line.into_bytes()
    }

    /// Parse a received line (terminator optional)
    pub fn parse(line: &str) -> Result<Response> {
        let line = line.trim_end_matches(&['\r', '\n'][..]);

        let response = match line {
            Self::GREETING => Response::Ready,
            "OK" => Response::Ok,
            "NIL" => Response::Nil,
            "BYE" => Response::Bye,
            // "VALUE " with an empty payload may arrive right-trimmed
            "VALUE" => Response::Value(String::new()),
            _ => {
                if let Some(payload) = line.strip_prefix("VALUE ") {
                    Response::Value(payload.to_string())
                } else if let Some(message) = line.strip_prefix("ERR ") {
                    Response::Error(message.to_string())
                } else {
                    return Err(KvError::Protocol(format!(
                        "Unrecognized response line: {:?}",
                        line
                    )));
                }
            }
        };

        Ok(response)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Ready => f.write_str(Self::GREETING),
            Response::Ok => f.write_str("OK"),
            Response::Nil => f.write_str("NIL"),
            Response::Value(payload) => write!(f, "VALUE {}", payload),
            Response::Bye => f.write_str("BYE"),
            Response::Error(message) => write!(f, "ERR {}", message),
        }
    }
}
