//! Line and payload buffers
//!
//! Both buffers have a fixed capacity chosen at construction and never grow
//! past it. The payload buffer doubles as the response buffer: a handler
//! reads the blob from it and overwrites it with the data to send back.

use std::fmt;

use bytes::BytesMut;

// =============================================================================
// Line Buffer
// =============================================================================

/// Accumulates one input line, terminator included
#[derive(Debug)]
pub struct LineBuffer {
    buf: Vec<u8>,
    capacity: usize,
}

impl LineBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a byte; returns false when the buffer is already full
    pub fn push(&mut self, byte: u8) -> bool {
        if self.is_full() {
            return false;
        }
        self.buf.push(byte);
        true
    }

    pub fn is_full(&self) -> bool {
        self.buf.len() >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.buf
    }
}

// =============================================================================
// Payload Buffer
// =============================================================================

/// Blob received with a command, and the response produced by its handler
#[derive(Debug)]
pub struct Payload {
    buf: BytesMut,
    capacity: usize,
}

impl Payload {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            capacity,
        }
    }

    /// Append one byte of incoming blob; returns false when full
    pub fn push(&mut self, byte: u8) -> bool {
        if self.buf.len() >= self.capacity {
            return false;
        }
        self.buf.extend_from_slice(&[byte]);
        true
    }

    /// Replace the contents, truncating to capacity
    ///
    /// Returns the number of bytes kept.
    pub fn set(&mut self, data: &[u8]) -> usize {
        let kept = data.len().min(self.capacity);
        self.buf.clear();
        self.buf.extend_from_slice(&data[..kept]);
        kept
    }

    /// Append to the contents, truncating to capacity
    pub fn extend(&mut self, data: &[u8]) -> usize {
        let kept = data.len().min(self.remaining());
        self.buf.extend_from_slice(&data[..kept]);
        kept
    }

    /// Replace the contents with formatted text, truncating to capacity
    pub fn format(&mut self, args: fmt::Arguments<'_>) {
        self.buf.clear();
        // write_str never fails
        let _ = fmt::Write::write_fmt(self, args);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.buf.len()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }
}

/// Formatted output truncates at capacity the way `snprintf` does
impl fmt::Write for Payload {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.extend(s.as_bytes());
        Ok(())
    }
}
