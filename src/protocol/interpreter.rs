//! Protocol interpreter
//!
//! Byte-at-a-time state machine driving line accumulation, command matching,
//! argument tokenizing, blob collection, handler dispatch and response
//! emission.
//!
//! ## States
//! ```text
//!            ┌──────────────── terminator ───────────────┐
//!            ▼                                           │
//!   ┌──────────────┐  line closed, payload cmd   ┌──────────────┐
//!   │ Reset/Ready  │ ──────────────────────────▶ │     Data     │
//!   └──────────────┘                             └──────────────┘
//!        │   ▲                                          │
//!  overrun   │ terminator              byte past length │
//!        ▼   │                                          ▼
//!   ┌──────────────┐ ◀──────────────────────────────────┘
//!   │    Error     │
//!   └──────────────┘
//! ```
//!
//! `Reset` is not a resting state: the next byte clears the line and is then
//! processed by `Ready` in the same step, so recovery never drops the first
//! byte of the following command.

use std::fmt;
use std::io::{Read, Write};
use std::ops::Range;

use crate::config::Config;
use crate::error::Result;

use super::buffer::{LineBuffer, Payload};
use super::normalize::is_newline;
use super::number::parse_c_integer;
use super::status::{write_status, HandlerResult, Status};
use super::table::{CommandDescriptor, CommandTable};
use super::tokenizer::{tokenize, Arguments};

/// Prompt written when the interpreter is ready for a blob
pub const PROMPT: &[u8] = b">";

/// Marker written after the greeting once input is accepted
pub const READY_LINE: &[u8] = b"READY\r\n";

const LINE_END: &[u8] = b"\r\n";

/// Parser control state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Re-synchronize the line buffer, then behave as `Ready`
    Reset,
    /// Accumulating a command line
    Ready,
    /// Collecting a blob for the active command
    Data,
    /// Discarding input until the next terminator
    Error,
}

// =============================================================================
// Handler Interface
// =============================================================================

/// Everything a handler gets to know about the command being run
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a, C> {
    pub command: C,
    pub token: &'static str,
    pub args: Arguments<'a>,
    pub table: &'a CommandTable<C>,
}

/// Executes matched commands
///
/// The handler reads any blob from `payload` and leaves its response data
/// there. Data is only sent to the peer when the handler succeeds.
pub trait CommandHandler {
    type Command: Copy + fmt::Debug;

    fn execute(
        &mut self,
        invocation: Invocation<'_, Self::Command>,
        payload: &mut Payload,
    ) -> HandlerResult;

    /// Identification block written after the greeting
    fn identify(&mut self, _payload: &mut Payload) -> HandlerResult {
        Ok(())
    }
}

impl<H: CommandHandler + ?Sized> CommandHandler for &mut H {
    type Command = H::Command;

    fn execute(
        &mut self,
        invocation: Invocation<'_, Self::Command>,
        payload: &mut Payload,
    ) -> HandlerResult {
        (**self).execute(invocation, payload)
    }

    fn identify(&mut self, payload: &mut Payload) -> HandlerResult {
        (**self).identify(payload)
    }
}

// =============================================================================
// Interpreter
// =============================================================================

/// One protocol session: parser state, buffers, handler and output sink
pub struct Interpreter<H: CommandHandler, W> {
    table: CommandTable<H::Command>,
    handler: H,
    sink: W,

    state: ParserState,
    line: LineBuffer,
    spans: Vec<Range<usize>>,
    payload: Payload,
    expected_len: usize,
    active: Option<CommandDescriptor<H::Command>>,

    max_arguments: usize,
    greeting: String,
}

impl<H: CommandHandler, W: Write> Interpreter<H, W> {
    /// Create an interpreter in the `Ready` state
    ///
    /// Fails with [`CmdlinkError::Config`](crate::error::CmdlinkError::Config) when `config` does not validate;
    /// a zero-length line buffer would report every byte as an overrun.
    pub fn new(
        config: &Config,
        table: CommandTable<H::Command>,
        handler: H,
        sink: W,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            table,
            handler,
            sink,
            state: ParserState::Ready,
            line: LineBuffer::with_capacity(config.max_line_length),
            spans: Vec::with_capacity(config.max_arguments),
            payload: Payload::with_capacity(config.max_payload_length),
            expected_len: 0,
            active: None,
            max_arguments: config.max_arguments,
            greeting: config.greeting.clone(),
        })
    }

    /// Write the greeting, identification block and `READY` marker
    ///
    /// Everything is flushed before returning; the host treats `READY` as
    /// the end of boot.
    pub fn start(&mut self) -> Result<()> {
        self.state = ParserState::Ready;
        self.line.clear();
        self.sink.write_all(self.greeting.as_bytes())?;

        self.payload.clear();
        match self.handler.identify(&mut self.payload) {
            Ok(()) => self.sink.write_all(self.payload.as_slice())?,
            Err(e) => tracing::warn!("Identification failed: {}", e),
        }
        self.payload.clear();

        self.sink.write_all(READY_LINE)?;
        self.sink.flush()?;
        Ok(())
    }

    /// Feed every byte from `reader` until end of stream
    pub fn run<R: Read>(&mut self, reader: R) -> Result<()> {
        for byte in reader.bytes() {
            self.feed(byte?)?;
        }
        Ok(())
    }

    /// Feed a slice of bytes
    pub fn feed_all(&mut self, input: &[u8]) -> Result<()> {
        input.iter().try_for_each(|&byte| self.feed(byte))
    }

    /// Process one input byte to completion
    ///
    /// Only a failing output sink produces an error; protocol problems are
    /// reported to the peer and the session carries on.
    pub fn feed(&mut self, input: u8) -> Result<()> {
        match self.state {
            ParserState::Reset => {
                self.resync();
                self.on_ready(input)
            }
            ParserState::Ready => self.on_ready(input),
            ParserState::Data => self.on_data(input),
            ParserState::Error => {
                if is_newline(input) {
                    self.state = ParserState::Reset;
                }
                Ok(())
            }
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    pub fn table(&self) -> &CommandTable<H::Command> {
        &self.table
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    pub fn into_parts(self) -> (H, W) {
        (self.handler, self.sink)
    }

    // -------------------------------------------------------------------------
    // State handlers
    // -------------------------------------------------------------------------

    fn resync(&mut self) {
        self.line.clear();
        self.state = ParserState::Ready;
    }

    fn on_ready(&mut self, input: u8) -> Result<()> {
        if is_newline(input) && self.line.is_empty() {
            return Ok(());
        }

        if !self.line.push(input) {
            tracing::debug!("Line overrun at {} bytes", self.line.capacity());
            self.line.clear();
            self.state = if is_newline(input) {
                ParserState::Ready
            } else {
                ParserState::Error
            };
            return self.emit_status(Status::BUFFER_OVERRUN);
        }

        if is_newline(input) {
            return self.close_line();
        }
        Ok(())
    }

    fn close_line(&mut self) -> Result<()> {
        let descriptor = match self.parse_command() {
            Ok(descriptor) => descriptor,
            Err(status) => {
                tracing::trace!("Rejected line: {}", String::from_utf8_lossy(self.line.as_slice()));
                self.state = ParserState::Reset;
                return self.emit_status(status);
            }
        };

        self.payload.clear();
        if descriptor.expects_payload {
            return self.begin_payload();
        }

        let status = self.invoke(descriptor);
        self.state = ParserState::Reset;
        self.emit_response(status)
    }

    fn parse_command(&mut self) -> std::result::Result<CommandDescriptor<H::Command>, Status> {
        self.spans.clear();
        self.active = None;

        let found = self
            .table
            .lookup(self.line.as_slice())
            .ok_or(Status::BAD_COMMAND)?;

        let eq = found.remainder;
        let line = self.line.as_mut_slice();
        let has_arguments =
            line[eq] == b'=' && line.get(eq + 1).is_some_and(|&c| !is_newline(c));
        if has_arguments {
            tokenize(line, eq + 1, self.max_arguments, &mut self.spans)?;
        }

        self.active = Some(found.descriptor);
        Ok(found.descriptor)
    }

    fn begin_payload(&mut self) -> Result<()> {
        let declared = Arguments::new(self.line.as_slice(), &self.spans)
            .last()
            .map(parse_c_integer);

        let capacity = self.payload.capacity();
        match declared {
            None => {
                self.state = ParserState::Reset;
                self.emit_status(Status::BAD_COMMAND)
            }
            Some(Some(len)) if len > capacity as u64 => {
                tracing::debug!("Declared blob of {} bytes exceeds {}", len, capacity);
                self.expected_len = capacity;
                self.state = ParserState::Reset;
                self.emit_status(Status::BAD_BLOB)
            }
            Some(None) | Some(Some(0)) => {
                self.state = ParserState::Reset;
                self.emit_status(Status::BAD_BLOB)
            }
            Some(Some(len)) => {
                self.expected_len = len as usize;
                self.state = ParserState::Data;
                self.sink.write_all(PROMPT)?;
                self.sink.flush()?;
                Ok(())
            }
        }
    }

    fn on_data(&mut self, input: u8) -> Result<()> {
        // The command line may have ended with \r\n
        if self.payload.is_empty() && is_newline(input) {
            return Ok(());
        }

        if self.payload.len() < self.expected_len {
            self.payload.push(input);
            return Ok(());
        }

        if !is_newline(input) {
            tracing::debug!("Blob longer than declared {} bytes", self.expected_len);
            self.payload.clear();
            self.state = ParserState::Error;
            return self.emit_status(Status::BAD_BLOB);
        }

        self.sink.write_all(LINE_END)?;
        let status = match self.active {
            Some(descriptor) => self.invoke(descriptor),
            None => Status::BAD_COMMAND,
        };
        self.state = ParserState::Reset;
        self.emit_response(status)
    }

    fn invoke(&mut self, descriptor: CommandDescriptor<H::Command>) -> Status {
        let invocation = Invocation {
            command: descriptor.command,
            token: descriptor.token,
            args: Arguments::new(self.line.as_slice(), &self.spans),
            table: &self.table,
        };
        tracing::trace!(
            "Dispatching {} with {} argument(s), {} payload byte(s)",
            descriptor.token,
            invocation.args.len(),
            self.payload.len()
        );

        match self.handler.execute(invocation, &mut self.payload) {
            Ok(()) => Status::OK,
            Err(e) => {
                tracing::debug!("{} failed: {}", descriptor.token, e);
                Status::from(e)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Output
    // -------------------------------------------------------------------------

    fn emit_response(&mut self, status: Status) -> Result<()> {
        if status.is_ok() && !self.payload.is_empty() {
            self.sink.write_all(self.payload.as_slice())?;
            self.sink.write_all(LINE_END)?;
        }
        self.payload.clear();
        self.emit_status(status)
    }

    fn emit_status(&mut self, status: Status) -> Result<()> {
        write_status(&mut self.sink, status)?;
        self.sink.flush()?;
        Ok(())
    }
}
