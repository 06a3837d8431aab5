//! Host-side client
//!
//! Speaks the command protocol to a device over TCP: waits for `READY`,
//! sends command lines and blobs, and splits replies into data and status.

use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::commands::{default_table, McCommand};
use crate::error::{CmdlinkError, Result};
use crate::protocol::{Status, PROMPT, READY_LINE};

/// Blocking protocol client
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
    banner: String,
}

impl Client {
    /// Connect and wait for the device to report `READY`
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        let read_stream = stream.try_clone()?;

        let mut client = Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
            banner: String::new(),
        };
        client.wait_ready()?;
        Ok(client)
    }

    /// Fail reads that take longer than `timeout`
    pub fn set_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        self.reader.get_ref().set_read_timeout(timeout)?;
        Ok(())
    }

    /// Everything the device printed before `READY`
    pub fn banner(&self) -> &str {
        &self.banner
    }

    /// Send a command that takes no blob; returns the response data
    pub fn command(&mut self, line: &str) -> Result<String> {
        self.send_line(line.as_bytes())?;
        self.read_reply()
    }

    /// Send a command followed by its blob; returns the response data
    ///
    /// The blob is only sent once the device shows its prompt. A command the
    /// device rejects up front reports its status instead. A `MC+BLOBTEST`
    /// echo is read by length, so it may look like a status line.
    pub fn command_with_blob(&mut self, line: &str, blob: &[u8]) -> Result<String> {
        if !self.send_blob(line.as_bytes(), blob)? {
            return Ok(String::new());
        }

        if echoes_blob(line) {
            let echo = self.read_echo(blob.len())?;
            return Ok(String::from_utf8_lossy(&echo).into_owned());
        }

        let mut data = self.read_reply()?;
        // The device ends the blob line before answering
        if data.starts_with("\r\n") {
            data.drain(..2);
        }
        Ok(data)
    }

    /// Round-trip `blob` through `MC+BLOBTEST`; returns the bytes echoed
    pub fn echo(&mut self, blob: &[u8]) -> Result<Vec<u8>> {
        let line = format!("MC+BLOBTEST={}", blob.len());
        if !self.send_blob(line.as_bytes(), blob)? {
            return Ok(Vec::new());
        }
        self.read_echo(blob.len())
    }

    // =========================================================================
    // Wire helpers
    // =========================================================================

    fn wait_ready(&mut self) -> Result<()> {
        loop {
            let line = self.read_line()?;
            if line.as_bytes() == READY_LINE {
                return Ok(());
            }
            self.banner.push_str(&line);
        }
    }

    fn send_line(&mut self, line: &[u8]) -> Result<()> {
        self.writer.write_all(line)?;
        self.writer.write_all(b"\r\n")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Send `line`, wait for the prompt, then send `blob`
    ///
    /// Returns false when the device answered OK without prompting.
    fn send_blob(&mut self, line: &[u8], blob: &[u8]) -> Result<bool> {
        self.send_line(line)?;

        let mut first = [0u8; 1];
        self.reader.read_exact(&mut first)?;
        if &first[..] != PROMPT {
            let mut reply = vec![first[0]];
            self.reader.read_until(b'\n', &mut reply)?;
            let reply = String::from_utf8_lossy(&reply);
            return match Status::parse_line(&reply) {
                Some(status) if status.is_ok() => Ok(false),
                Some(status) => Err(CmdlinkError::Device(status)),
                None => Err(CmdlinkError::Protocol(format!(
                    "Expected prompt, got {:?}",
                    reply
                ))),
            };
        }

        self.send_line(blob)?;
        Ok(true)
    }

    /// Lines are decoded lossily; only blob echoes carry arbitrary bytes
    fn read_line(&mut self) -> Result<String> {
        let mut line = Vec::new();
        if self.reader.read_until(b'\n', &mut line)? == 0 {
            return Err(CmdlinkError::Protocol(
                "Connection closed by device".to_string(),
            ));
        }
        Ok(String::from_utf8_lossy(&line).into_owned())
    }

    /// Collect lines up to the status line
    fn read_reply(&mut self) -> Result<String> {
        let mut data = String::new();
        loop {
            let line = self.read_line()?;
            match Status::parse_line(&line) {
                Some(status) if status.is_ok() => break,
                Some(status) => return Err(CmdlinkError::Device(status)),
                None => data.push_str(&line),
            }
        }

        // Drop the line end the device adds after the data
        if data.ends_with("\r\n") {
            data.truncate(data.len() - 2);
        }
        Ok(data)
    }

    /// Read a blob echo of exactly `len` bytes and the status after it
    fn read_echo(&mut self, len: usize) -> Result<Vec<u8>> {
        // A rejected blob gets its status without the leading line end
        let line = self.read_line()?;
        if line != "\r\n" {
            return Err(status_error(&line));
        }

        let mut echo = vec![0u8; len];
        self.reader.read_exact(&mut echo)?;

        let line = self.read_line()?;
        if line != "\r\n" {
            return Err(CmdlinkError::Protocol(format!(
                "Expected end of echo, got {:?}",
                line
            )));
        }

        let line = self.read_line()?;
        match Status::parse_line(&line) {
            Some(status) if status.is_ok() => Ok(echo),
            _ => Err(status_error(&line)),
        }
    }
}

/// True when `line` names the command whose response is its own blob
fn echoes_blob(line: &str) -> bool {
    let mut terminated = line.as_bytes().to_vec();
    terminated.push(b'\r');
    default_table()
        .lookup(&terminated)
        .map_or(false, |found| found.descriptor.command == McCommand::BlobTest)
}

/// Error for a line that should have been a failing status
fn status_error(line: &str) -> CmdlinkError {
    match Status::parse_line(line) {
        Some(status) if !status.is_ok() => CmdlinkError::Device(status),
        _ => CmdlinkError::Protocol(format!("Expected status, got {:?}", line)),
    }
}
