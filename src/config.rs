//! Configuration for cmdlink
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{CmdlinkError, Result};

/// Main configuration for a cmdlink session
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Protocol Limits
    // -------------------------------------------------------------------------
    /// Line buffer capacity in bytes, terminator included
    pub max_line_length: usize,

    /// Payload buffer capacity in bytes
    pub max_payload_length: usize,

    /// Maximum number of comma separated arguments on one line
    pub max_arguments: usize,

    /// First line written when a session starts
    pub greeting: String,

    // -------------------------------------------------------------------------
    // Device Configuration
    // -------------------------------------------------------------------------
    /// Root directory for simulated device images
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── winc_flash.img   (SPI flash image)
    ///     └── ecc.bin          (crypto element state)
    pub data_dir: PathBuf,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Connection read timeout (milliseconds, 0 disables)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 disables)
    pub write_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_line_length: 128,
            max_payload_length: 1024,
            max_arguments: 15,
            greeting: "Welcome to the avr-iot command handler!\r\n".to_string(),
            data_dir: PathBuf::from("./cmdlink_data"),
            listen_addr: "127.0.0.1:7878".to_string(),
            read_timeout_ms: 0,
            write_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the protocol limits can hold at least one command
    pub fn validate(&self) -> Result<()> {
        if self.max_line_length < 2 {
            return Err(CmdlinkError::Config(format!(
                "max_line_length must be at least 2, got {}",
                self.max_line_length
            )));
        }
        if self.max_payload_length == 0 {
            return Err(CmdlinkError::Config(
                "max_payload_length must be non-zero".to_string(),
            ));
        }
        if self.max_arguments == 0 {
            return Err(CmdlinkError::Config(
                "max_arguments must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the line buffer capacity (terminator included)
    pub fn max_line_length(mut self, len: usize) -> Self {
        self.config.max_line_length = len;
        self
    }

    /// Set the payload buffer capacity
    pub fn max_payload_length(mut self, len: usize) -> Self {
        self.config.max_payload_length = len;
        self
    }

    /// Set the argument count limit
    pub fn max_arguments(mut self, count: usize) -> Self {
        self.config.max_arguments = count;
        self
    }

    /// Set the greeting line
    pub fn greeting(mut self, greeting: impl Into<String>) -> Self {
        self.config.greeting = greeting.into();
        self
    }

    /// Set the data directory (root for simulated device images)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
