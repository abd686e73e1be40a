//! Engine Module
//!
//! The command dispatcher that coordinates the store and its snapshot.
//!
//! ## Responsibilities
//! - Create the data directory and load the snapshot on startup
//! - Parse lines into commands and execute them against the store
//! - Turn execution failures into `ERR server error: <kind>` responses

use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::persistence::{LoadOutcome, Snapshot};
use crate::protocol::{Command, Response};
use crate::store::Store;

/// The main engine shared by every connection
///
/// ## Concurrency Model
///
/// All state lives in the `Store`, which serializes access with a single
/// reentrant lock:
/// - **Reads** (GET/KEYS): lock held for the map read only
/// - **Writes** (SET/DEL): lock held for the mutation *and* the snapshot
///   rewrite, so `OK` is only sent once the change is on disk
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// The key-value store and its snapshot
    store: Store,

    /// What startup found on disk
    load_outcome: LoadOutcome,
}

impl Engine {
    /// Open an engine with the given config
    ///
    /// On startup:
    /// 1. Create the data directory if missing
    /// 2. Load the snapshot (missing or corrupt gives an empty store)
    pub fn open(config: Config) -> Result<Self> {
        // Step 1: Create data directory if it doesn't exist
        fs::create_dir_all(&config.data_dir)?;

        // Step 2: Load snapshot. A corrupt file is dropped without a report.
        let snapshot = Snapshot::new(config.snapshot_path());
        let (store, load_outcome) = Store::open(snapshot);

        if let LoadOutcome::Loaded { keys } = load_outcome {
            tracing::debug!("Loaded {} keys from {}", keys, config.snapshot_path().display());
        }

        Ok(Self {
            config,
            store,
            load_outcome,
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().data_dir(path).build();
        Self::open(config)
    }

    /// Parse and execute one trimmed line
    ///
    /// Never fails: execution errors become `ERR server error: <kind>`.
    pub fn dispatch(&self, line: &str) -> Response {
        let command = Command::parse(line);
        if command.is_mutating() {
            tracing::trace!("Dispatching {} (rewrites snapshot)", command.command_type().as_str());
        } else {
            tracing::trace!("Dispatching {}: {:?}", command.command_type().as_str(), command);
        }

        match self.execute(command) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Command failed: {:?} ({})", line, e);
                Response::server_error(&e)
            }
        }
    }

    /// Execute a command
    ///
    /// Routes commands to the store
    pub fn execute(&self, command: Command) -> Result<Response> {
        let response = match command {
            Command::Set { key, value } => {
                self.store.set(key, value)?;
                Response::Ok
            }
            Command::Get { key } => match self.store.get(&key) {
                Some(value) => Response::Value(value),
                None => Response::Nil,
            },
            Command::Del { key } => {
                if self.store.delete(&key)? {
                    Response::Ok
                } else {
                    Response::Nil
                }
            }
            Command::Keys => Response::Value(self.store.keys().join(" ")),
            Command::Quit => Response::Bye,
            Command::Invalid => Response::bad_args(),
        };

        Ok(response)
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Get the snapshot file path
    pub fn snapshot_path(&self) -> &Path {
        self.store.snapshot().path()
    }

    /// Get the store
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// What the snapshot load found at startup
    pub fn load_outcome(&self) -> LoadOutcome {
        self.load_outcome
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
