//! # LineKV
//!
//! A small network key-value store with:
//! - A line-oriented text protocol over TCP
//! - One thread per connection, one reentrant lock for the store
//! - Write-before-acknowledge durability via atomic JSON snapshots
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │              (one thread per connection)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  lines (\n, \r, \r\n, \n\r)
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Engine (dispatcher)                          │
//! │          SET / GET / DEL / KEYS / QUIT / EXIT                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────▼────────────┐
//!          │          Store          │
//!          │    (ReentrantMutex)     │
//!          └────────────┬────────────┘
//!                       │  every mutation, lock held
//!                       ▼
//!          ┌─────────────────────────┐
//!          │     Snapshot (JSON)     │
//!          │  tmp → fsync → rename   │
//!          └─────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod persistence;
pub mod store;
pub mod network;
pub mod protocol;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KvError, Result};
pub use config::Config;
pub use engine::Engine;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of LineKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
