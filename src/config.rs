//! Configuration for LineKV
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for a LineKV server
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory holding the snapshot file
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── db.json          (current snapshot)
    ///     └── db.json.tmp      (in-flight snapshot, renamed over db.json)
    pub data_dir: PathBuf,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Host or IP to bind
    pub host: String,

    /// TCP port to bind
    pub port: u16,

    /// Max concurrent client connections (`None` = unbounded)
    pub max_connections: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("/data"),
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_connections: None,
        }
    }
}

impl Config {
    /// File name of the snapshot inside `data_dir`
    pub const SNAPSHOT_FILENAME: &'static str = "db.json";

    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// `host:port` string suitable for `TcpListener::bind`
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Full path of the snapshot file
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(Self::SNAPSHOT_FILENAME)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the bind host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the bind port (0 picks an ephemeral port)
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Cap concurrent connections; connections over the cap are refused
    pub fn max_connections(mut self, count: Option<usize>) -> Self {
        self.config.max_connections = count;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
