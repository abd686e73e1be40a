//! TCP Server
//!
//! Accepts connections and hands each one to its own thread.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use crate::config::Config;
use crate::engine::Engine;
use crate::error::{KvError, Result};
use crate::protocol::Response;

use super::Connection;

/// TCP server for LineKV
///
/// Connections are unbounded unless `Config::max_connections` is set. No
/// read timeout is applied, so an idle client keeps its thread alive for as
/// long as it stays connected.
pub struct Server {
    config: Config,
    engine: Arc<Engine>,
    listener: TcpListener,
    shutdown: Arc<AtomicBool>,
    active: Arc<AtomicUsize>,
}

impl Server {
    /// Bind the configured address
    pub fn bind(config: Config, engine: Arc<Engine>) -> Result<Self> {
        if config.max_connections == Some(0) {
            return Err(KvError::Config(
                "max_connections must be at least 1".to_string(),
            ));
        }

        let listener = TcpListener::bind(config.listen_addr())?;
        tracing::info!("KV server listening on {}", listener.local_addr()?);

        Ok(Self {
            config,
            engine,
            listener,
            shutdown: Arc::new(AtomicBool::new(false)),
            active: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Address actually bound (resolves port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle that stops the accept loop from another thread
    pub fn shutdown_handle(&self) -> Result<ShutdownHandle> {
        let mut wake_addr = self.local_addr()?;
        if wake_addr.ip().is_unspecified() {
            let loopback = match wake_addr.ip() {
                IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
                IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::LOCALHOST),
            };
            wake_addr.set_ip(loopback);
        }

        Ok(ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
            wake_addr,
        })
    }

    /// Accept connections until shut down (blocking)
    pub fn run(&self) -> Result<()> {
        for stream in self.listener.incoming() {
            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }

            match stream {
                Ok(stream) => self.spawn_connection(stream),
                Err(e) => tracing::warn!("Accept failed: {}", e),
            }
        }

        tracing::info!("Accept loop stopped");
        Ok(())
    }

    fn spawn_connection(&self, stream: TcpStream) {
        let slot = ConnectionSlot::acquire(&self.active);
        let over_limit = matches!(self.config.max_connections, Some(max) if slot.position > max);
        let engine = Arc::clone(&self.engine);

        let spawned = thread::Builder::new()
            .name("linekv-conn".to_string())
            .spawn(move || {
                let _slot = slot;

                let connection = match Connection::new(stream, engine) {
                    Ok(connection) => connection,
                    Err(e) => {
                        tracing::warn!("Failed to set up connection: {}", e);
                        return;
                    }
                };

                let result = if over_limit {
                    connection.refuse(Response::busy())
                } else {
                    let mut connection = connection;
                    connection.handle()
                };

                if let Err(e) = result {
                    tracing::debug!("Connection ended with error: {}", e);
                }
            });

        if let Err(e) = spawned {
            tracing::warn!("Failed to spawn connection thread: {}", e);
        }
    }
}

/// Stops a running `Server::run` loop
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
    wake_addr: SocketAddr,
}

impl ShutdownHandle {
    /// Stop accepting new connections
    ///
    /// Connections already being served run to completion.
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
        // Unblock the pending accept
        let _ = TcpStream::connect(self.wake_addr);
    }
}

/// Counts a live connection; released on drop
struct ConnectionSlot {
    active: Arc<AtomicUsize>,
    position: usize,
}

impl ConnectionSlot {
    fn acquire(active: &Arc<AtomicUsize>) -> Self {
        let position = active.fetch_add(1, Ordering::SeqCst) + 1;
        Self {
            active: Arc::clone(active),
            position,
        }
    }
}

impl Drop for ConnectionSlot {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}
