//! Status codes and the status reporter
//!
//! A status is a 16-bit value. Zero is success. Local protocol failures use
//! small codes (see the associated constants); failures raised by an
//! external collaborator are composite: the upper byte names the
//! [`StatusSource`] and the lower byte keeps the collaborator's own code.

use std::fmt;
use std::io::{self, Write};

use thiserror::Error;

/// Line written for a successful command
pub const OK_LINE: &[u8] = b"OK\r\n";

/// Prefix of every failure line
pub const ERROR_PREFIX: &str = "ERROR: 0x";

/// Subsystem that produced a status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StatusSource {
    /// The command handler framework itself
    CommandHandler = 0x00,
    /// Crypto authentication element
    CryptoAuth = 0x01,
    /// WINC network controller and its SPI flash
    Winc = 0x02,
}

impl StatusSource {
    fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(StatusSource::CommandHandler),
            0x01 => Some(StatusSource::CryptoAuth),
            0x02 => Some(StatusSource::Winc),
            _ => None,
        }
    }
}

/// 16-bit wire status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status(u16);

impl Status {
    pub const OK: Status = Status(0);
    pub const BAD_COMMAND: Status = Status(1);
    pub const BUFFER_OVERRUN: Status = Status(2);
    pub const BAD_ARGUMENT_COUNT: Status = Status(3);
    pub const BAD_BLOB: Status = Status(4);
    pub const BAD_ARGUMENT_VALUE: Status = Status(5);

    /// Wrap a raw 16-bit code
    pub const fn from_code(code: u16) -> Self {
        Status(code)
    }

    /// Combine a subsystem and its native 8-bit code
    ///
    /// A native code of zero means success for every subsystem and maps to
    /// [`Status::OK`] regardless of the source.
    pub const fn composite(source: StatusSource, native: u8) -> Self {
        if native == 0 {
            Status::OK
        } else {
            Status(((source as u16) << 8) | native as u16)
        }
    }

    pub const fn code(self) -> u16 {
        self.0
    }

    pub const fn is_ok(self) -> bool {
        self.0 == 0
    }

    /// Subsystem encoded in the upper byte, if it is a known one
    pub fn source(self) -> Option<StatusSource> {
        StatusSource::from_byte((self.0 >> 8) as u8)
    }

    /// Native code in the lower byte
    pub fn native(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Parse a reply line (`OK` or `ERROR: 0x..`), terminator optional
    pub fn parse_line(line: &str) -> Option<Status> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line == "OK" {
            return Some(Status::OK);
        }
        let digits = line.strip_prefix(ERROR_PREFIX)?;
        // A zero code on an ERROR line is malformed, never success
        u16::from_str_radix(digits, 16)
            .ok()
            .filter(|&code| code != 0)
            .map(Status)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status 0x{:X}", self.0)
    }
}

/// Write the status line for `status` to the sink
pub fn write_status<W: Write>(writer: &mut W, status: Status) -> io::Result<()> {
    if status.is_ok() {
        writer.write_all(OK_LINE)
    } else {
        write!(writer, "{}{:X}\r\n", ERROR_PREFIX, status.code())
    }
}

// =============================================================================
// Handler Errors
// =============================================================================

/// Failure returned by a command handler
///
/// Argument problems are detected by the handler itself; collaborator
/// failures carry the collaborator's native code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HandlerError {
    #[error("wrong number of arguments")]
    BadArgumentCount,

    #[error("invalid argument value")]
    BadArgumentValue,

    #[error("crypto element error 0x{0:02X}")]
    CryptoAuth(u8),

    #[error("WINC error 0x{0:02X}")]
    Winc(u8),
}

impl From<HandlerError> for Status {
    fn from(err: HandlerError) -> Self {
        match err {
            HandlerError::BadArgumentCount => Status::BAD_ARGUMENT_COUNT,
            HandlerError::BadArgumentValue => Status::BAD_ARGUMENT_VALUE,
            HandlerError::CryptoAuth(code) => Status::composite(StatusSource::CryptoAuth, code),
            HandlerError::Winc(code) => Status::composite(StatusSource::Winc, code),
        }
    }
}

/// Result type for command handlers
pub type HandlerResult = std::result::Result<(), HandlerError>;
