//! Command definitions
//!
//! Represents commands from clients.

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Set,
    Get,
    Del,
    Keys,
    Quit,
    Invalid,
}

impl CommandType {
    /// Verb as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Set => "SET",
            CommandType::Get => "GET",
            CommandType::Del => "DEL",
            CommandType::Keys => "KEYS",
            CommandType::Quit => "QUIT",
            CommandType::Invalid => "INVALID",
        }
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Insert or overwrite a key
    Set { key: String, value: String },

    /// Get a value by key
    Get { key: String },

    /// Delete a key
    Del { key: String },

    /// List all keys
    Keys,

    /// End the session (QUIT or EXIT)
    Quit,

    /// Unknown verb, or a known verb with the wrong number of arguments
    Invalid,
}

impl Command {
    /// Parse a trimmed, non-empty line
    ///
    /// The line is split on single spaces into at most three segments, so a
    /// SET value keeps any spaces it contains. Only the segment count is
    /// validated; segments may be empty (`"SET  v"` sets the empty key).
    pub fn parse(line: &str) -> Command {
        let parts: Vec<&str> = line.splitn(3, ' ').collect();
        let verb = parts[0].to_uppercase();

        match (verb.as_str(), parts.as_slice()) {
            ("SET", [_, key, value]) => Command::Set {
                key: key.to_string(),
                value: value.to_string(),
            },
            ("GET", [_, key]) => Command::Get {
                key: key.to_string(),
            },
            ("DEL", [_, key]) => Command::Del {
                key: key.to_string(),
            },
            ("KEYS", _) => Command::Keys,
            ("QUIT" | "EXIT", _) => Command::Quit,
            _ => Command::Invalid,
        }
    }

    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Set { .. } => CommandType::Set,
            Command::Get { .. } => CommandType::Get,
            Command::Del { .. } => CommandType::Del,
            Command::Keys => CommandType::Keys,
            Command::Quit => CommandType::Quit,
            Command::Invalid => CommandType::Invalid,
        }
    }

    /// Whether executing this command may rewrite the snapshot
    pub fn is_mutating(&self) -> bool {
        matches!(self, Command::Set { .. } | Command::Del { .. })
    }
}
