//! # cmdlink
//!
//! Byte-stream command/response interpreter for device provisioning:
//! - Line-oriented ASCII commands (`MC+PING=HELLO`) with up to 15 arguments
//! - Binary blobs announced by a length argument and collected after a `>`
//!   prompt
//! - One status line per command (`OK` or `ERROR: 0x<code>`)
//! - Simulated board, crypto element and WINC flash behind the handlers
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              Transport (TCP session / stdio)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ bytes
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Interpreter                             │
//! │   normalize → line buffer → table lookup → tokenize → blob   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Invocation + Payload
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Device (commands)                          │
//! └──────────┬──────────────────┬──────────────────┬────────────┘
//!            ▼                  ▼                  ▼
//!     ┌─────────────┐   ┌──────────────┐   ┌─────────────┐
//!     │    Board    │   │ CryptoElement│   │    WINC     │
//!     │ (LEDs/reset)│   │ (slots/OTP)  │   │   (flash)   │
//!     └─────────────┘   └──────────────┘   └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod commands;
pub mod device;
pub mod hex;
pub mod network;
pub mod protocol;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CmdlinkError, Result};
pub use config::Config;
pub use commands::{default_table, Device, McCommand, SimulatedDevice};
pub use protocol::{CommandHandler, Interpreter, Status};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of cmdlink
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
