//! Connection Handler
//!
//! Runs one protocol session over a TCP stream.

use std::io::{self, BufReader, BufWriter};
use std::net::TcpStream;
use std::time::Duration;

use crate::config::Config;
use crate::error::{CmdlinkError, Result};
use crate::protocol::{CommandHandler, CommandTable, Interpreter};

/// A single peer session
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer; the interpreter flushes after every reply
    writer: BufWriter<TcpStream>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    pub fn new(stream: TcpStream) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Replies are small and latency bound
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
            peer_addr,
        })
    }

    /// Configure connection timeouts; zero leaves a direction blocking
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        if read_ms > 0 {
            self.reader
                .get_ref()
                .set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            self.writer
                .get_ref()
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }
        Ok(())
    }

    /// Run a session until the peer goes away
    ///
    /// Writes the greeting, then interprets every byte the peer sends.
    /// Disconnects and read timeouts end the session cleanly.
    pub fn handle<H: CommandHandler>(
        self,
        config: &Config,
        table: CommandTable<H::Command>,
        handler: H,
    ) -> Result<()> {
        let Connection {
            reader,
            writer,
            peer_addr,
        } = self;

        let mut interpreter = Interpreter::new(config, table, handler, writer)?;
        tracing::debug!("Session started for {}", peer_addr);

        let outcome = interpreter
            .start()
            .and_then(|()| interpreter.run(reader));

        match outcome {
            Ok(()) => {
                tracing::debug!("Client {} disconnected", peer_addr);
                Ok(())
            }
            Err(CmdlinkError::Io(ref e)) if is_disconnect(e) => {
                tracing::debug!("Session with {} ended: {}", peer_addr, e);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Session with {} failed: {}", peer_addr, e);
                Err(e)
            }
        }
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

fn is_disconnect(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::UnexpectedEof
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
            // Read timeout (Windows reports TimedOut instead of WouldBlock)
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::TimedOut
    )
}
