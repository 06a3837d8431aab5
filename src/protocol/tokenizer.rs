//! Argument tokenizer
//!
//! Splits the text after `=` into comma separated arguments without copying.
//! The scan normalizes the line in place and overwrites every delimiter with
//! `\0`; the arguments themselves are recorded as spans into the line and
//! handed to handlers as borrowed slices through [`Arguments`].

use std::ops::Range;

use super::normalize::{is_newline, normalize};
use super::status::Status;

/// Tokenize `line[start..]` into `spans`
///
/// Succeeds when a terminator closes a non-empty final argument. A `\0`
/// inside an argument truncates it there, so no span ever contains one. An
/// empty argument, more than `max_args` arguments, or running off the end of the
/// line without a terminator yields [`Status::BAD_COMMAND`].
pub fn tokenize(
    line: &mut [u8],
    start: usize,
    max_args: usize,
    spans: &mut Vec<Range<usize>>,
) -> Result<(), Status> {
    spans.clear();
    let mut arg_start = start;
    // An embedded \0 ends the argument text, as in a C string
    let mut arg_end = None;

    for i in start..line.len() {
        if spans.len() >= max_args {
            break;
        }

        let c = normalize(line[i]);
        line[i] = c;

        if c == b'\0' && arg_end.is_none() {
            arg_end = Some(i);
        }

        if is_newline(c) || c == b',' {
            let end = arg_end.take().unwrap_or(i);
            if end == arg_start {
                spans.clear();
                return Err(Status::BAD_COMMAND);
            }
            line[i] = b'\0';
            spans.push(arg_start..end);
            if is_newline(c) {
                return Ok(());
            }
            arg_start = i + 1;
        }
    }

    spans.clear();
    Err(Status::BAD_COMMAND)
}

// =============================================================================
// Arguments
// =============================================================================

/// Borrowed view of the arguments of the current command
#[derive(Debug, Clone, Copy)]
pub struct Arguments<'a> {
    line: &'a [u8],
    spans: &'a [Range<usize>],
}

impl<'a> Arguments<'a> {
    pub fn new(line: &'a [u8], spans: &'a [Range<usize>]) -> Self {
        Self { line, spans }
    }

    /// Empty argument list
    pub fn empty() -> Arguments<'static> {
        Arguments {
            line: &[],
            spans: &[],
        }
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Argument `index` as raw (normalized) bytes
    pub fn get(&self, index: usize) -> Option<&'a [u8]> {
        self.spans.get(index).map(|span| &self.line[span.clone()])
    }

    /// Argument `index` as text
    ///
    /// Normalization leaves only printable ASCII, so this only fails for an
    /// out of range index.
    pub fn get_str(&self, index: usize) -> Option<&'a str> {
        self.get(index).and_then(|arg| std::str::from_utf8(arg).ok())
    }

    /// Last argument, which carries the blob length for payload commands
    pub fn last(&self) -> Option<&'a [u8]> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a [u8]> {
        let (line, spans) = (self.line, self.spans);
        spans.iter().map(move |span| &line[span.clone()])
    }
}
