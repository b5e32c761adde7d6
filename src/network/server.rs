//! TCP Server
//!
//! Accepts connections and runs each one on its own thread.

use std::io::ErrorKind;
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::config::Config;
use crate::error::{CellarError, Result};

use super::Connection;

/// Cloneable handle that asks a running server to stop
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Request shutdown
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// The underlying flag, for signal handler registration
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

/// A running connection thread
struct Worker {
    handle: JoinHandle<()>,

    /// Second handle on the client socket, used to unblock the worker
    stream: TcpStream,

    peer_addr: SocketAddr,
}

/// TCP server for Cellar
///
/// ## Threading
/// - One accept loop on the caller's thread, polling a non-blocking listener
///   so it can notice shutdown.
/// - One thread per accepted connection. There is no pool and no cap: a
///   stalled client holds its thread until it disconnects or the server stops.
pub struct Server {
    config: Config,
    listener: Option<TcpListener>,
    shutdown: ShutdownHandle,
    workers: Vec<Worker>,
    next_connection_id: u64,
}

impl Server {
    /// Create a new server with the given config
    pub fn new(config: Config) -> Self {
        Self {
            config,
            listener: None,
            shutdown: ShutdownHandle::default(),
            workers: Vec::new(),
            next_connection_id: 1,
        }
    }

    /// Bind the listening socket and return the bound address
    pub fn bind(&mut self) -> Result<SocketAddr> {
        self.config.validate()?;
        let listener = TcpListener::bind(&self.config.listen_addr)?;
        let addr = listener.local_addr()?;
        self.listener = Some(listener);
        Ok(addr)
    }

    /// Handle for stopping the server from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Start the server (blocking until shutdown)
    ///
    /// Binds first if `bind` has not been called. On shutdown every live client
    /// socket is closed and every connection thread is joined.
    pub fn run(&mut self) -> Result<()> {
        if self.listener.is_none() {
            self.bind()?;
        }
        let listener = self
            .listener
            .take()
            .ok_or_else(|| CellarError::Config("listener not bound".to_string()))?;
        listener.set_nonblocking(true)?;

        tracing::info!("Listening on {}", listener.local_addr()?);

        while !self.shutdown.is_shutdown() {
            match listener.accept() {
                Ok((stream, peer_addr)) => {
                    if let Err(e) = self.spawn_worker(stream, peer_addr) {
                        tracing::warn!("Failed to start connection for {}: {}", peer_addr, e);
                    }
                }
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                    self.reap_finished();
                    thread::sleep(self.config.accept_poll_interval());
                }
                Err(ref e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                    thread::sleep(self.config.accept_poll_interval());
                }
            }
        }

        drop(listener);
        self.stop_workers();
        Ok(())
    }

    fn spawn_worker(&mut self, stream: TcpStream, peer_addr: SocketAddr) -> Result<()> {
        // Accepted sockets inherit non-blocking mode on some platforms
        stream.set_nonblocking(false)?;
        let control = stream.try_clone()?;

        let id = self.next_connection_id;
        self.next_connection_id += 1;

        let config = self.config.clone();
        let handle = thread::Builder::new()
            .name(format!("cellar-conn-{}", id))
            .spawn(move || match Connection::new(stream, &config) {
                Ok(mut connection) => {
                    if let Err(e) = connection.handle() {
                        tracing::warn!("Connection {} ended with error: {}", peer_addr, e);
                    }
                }
                Err(e) => tracing::warn!("Failed to set up connection {}: {}", peer_addr, e),
            })?;

        tracing::debug!("Accepted connection {} from {}", id, peer_addr);
        self.workers.push(Worker {
            handle,
            stream: control,
            peer_addr,
        });
        Ok(())
    }

    /// Join threads whose connections have already ended
    fn reap_finished(&mut self) {
        let (finished, running): (Vec<Worker>, Vec<Worker>) = self
            .workers
            .drain(..)
            .partition(|w| w.handle.is_finished());
        self.workers = running;

        for worker in finished {
            if worker.handle.join().is_err() {
                tracing::error!("Connection thread for {} panicked", worker.peer_addr);
            }
        }
    }

    /// Close every client socket and join every connection thread
    fn stop_workers(&mut self) {
        tracing::info!("Stopping {} connection(s)", self.workers.len());

        for worker in &self.workers {
            // Unblocks the worker's pending read with end-of-stream
            let _ = worker.stream.shutdown(Shutdown::Both);
        }
        for worker in self.workers.drain(..) {
            if worker.handle.join().is_err() {
                tracing::error!("Connection thread for {} panicked", worker.peer_addr);
            }
        }
    }
}
