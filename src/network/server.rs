//! TCP Server
//!
//! Accepts connections and runs one session at a time against a shared
//! handler, the way a single serial port would.

use std::io;
use std::net::{SocketAddr, TcpListener};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::commands::{default_table, McCommand};
use crate::config::Config;
use crate::error::{CmdlinkError, Result};
use crate::protocol::CommandHandler;

use super::Connection;

/// Pause between accept polls while idle
const ACCEPT_POLL: Duration = Duration::from_millis(50);

/// TCP front end for a command handler
pub struct Server {
    config: Config,
    listener: Option<TcpListener>,
    shutdown: Arc<AtomicBool>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            listener: None,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Bind the listen address; returns the bound address
    ///
    /// Called by [`Server::run`] when needed. Binding first lets callers
    /// learn the port when listening on port 0.
    pub fn bind(&mut self) -> Result<SocketAddr> {
        if let Some(listener) = &self.listener {
            return Ok(listener.local_addr()?);
        }

        let listener = TcpListener::bind(&self.config.listen_addr)?;
        listener.set_nonblocking(true)?;
        let addr = listener.local_addr()?;
        tracing::info!("Listening on {}", addr);

        self.listener = Some(listener);
        Ok(addr)
    }

    /// Flag that stops the accept loop when set
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Signal the server to stop after the current session
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Accept and serve sessions until shut down (blocking)
    pub fn run<H>(&mut self, handler: &mut H) -> Result<()>
    where
        H: CommandHandler<Command = McCommand>,
    {
        self.bind()?;
        let listener = self
            .listener
            .as_ref()
            .ok_or_else(|| CmdlinkError::Config("listener not bound".to_string()))?;

        while !self.shutdown.load(Ordering::Relaxed) {
            let (stream, addr) = match listener.accept() {
                Ok(accepted) => accepted,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL);
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                    continue;
                }
            };

            tracing::info!("Accepted connection from {}", addr);
            stream.set_nonblocking(false)?;

            let mut connection = Connection::new(stream)?;
            connection.set_timeouts(self.config.read_timeout_ms, self.config.write_timeout_ms)?;
            if let Err(e) = connection.handle(&self.config, default_table(), &mut *handler) {
                tracing::warn!("Session from {} aborted: {}", addr, e);
            }
        }

        tracing::info!("Server stopped");
        Ok(())
    }
}
