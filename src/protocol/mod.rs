//! Protocol Module
//!
//! Line-oriented command protocol spoken over a serial byte stream.
//!
//! ## Request Format
//! ```text
//! TOKEN[=ARG1[,ARG2[,...]]]\r\n
//! ```
//! Tokens and arguments are case-insensitive; both are normalized to
//! uppercase before use. A command that expects a blob takes the blob length
//! as its last argument:
//! ```text
//! host:   MC+BLOBTEST=4\r\n
//! device: >
//! host:   ABCD\r\n
//! device: \r\nABCD\r\nOK\r\n
//! ```
//!
//! ## Response Format
//! ```text
//! [data\r\n]OK\r\n
//! ERROR: 0x<HEX>\r\n
//! ```
//!
//! ### Status Codes
//! - 0x00: OK
//! - 0x01: BAD_COMMAND
//! - 0x02: BUFFER_OVERRUN
//! - 0x03: BAD_ARGUMENT_COUNT
//! - 0x04: BAD_BLOB
//! - 0x05: BAD_ARGUMENT_VALUE
//! - 0x01xx: crypto element error xx
//! - 0x02xx: WINC error xx

mod buffer;
mod interpreter;
mod normalize;
mod number;
mod status;
mod table;
mod tokenizer;

pub use buffer::{LineBuffer, Payload};
pub use interpreter::{CommandHandler, Interpreter, Invocation, ParserState, PROMPT, READY_LINE};
pub use normalize::{is_newline, match_string, normalize, SENTINEL};
pub use number::{parse_arg_u16, parse_arg_u32, parse_c_integer};
pub use status::{write_status, HandlerError, HandlerResult, Status, StatusSource, ERROR_PREFIX, OK_LINE};
pub use table::{CommandDescriptor, CommandTable, TokenMatch};
pub use tokenizer::{tokenize, Arguments};
