//! Store Module
//!
//! Authoritative in-memory key-value mapping.
//!
//! ## Responsibilities
//! - String keys to string values, no ordering
//! - One reentrant lock shared by every connection
//! - Mutations persist the snapshot before the lock is released
//!
//! ## Locking
//! ```text
//! GET / KEYS   lock ── read map ── unlock
//! SET / DEL    lock ── mutate ── save snapshot (fsync + rename) ── unlock
//! ```
//! Mutations are therefore totally ordered, and a mutation is durable before
//! any later reader can acquire the lock.

mod table;

pub use table::Store;
