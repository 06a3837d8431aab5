//! Command table
//!
//! Ordered list of command descriptors, looked up by linear scan. The first
//! descriptor whose token matches wins, so ordering can be used to resolve
//! tokens that share a prefix.

use super::normalize::{is_newline, normalize};

/// One entry of the command table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDescriptor<C> {
    /// Uppercase ASCII token, e.g. `MC+PING`
    pub token: &'static str,

    /// Command identity handed to the dispatcher on a match
    pub command: C,

    /// Whether a binary blob follows the command line
    pub expects_payload: bool,
}

impl<C> CommandDescriptor<C> {
    pub const fn new(token: &'static str, command: C, expects_payload: bool) -> Self {
        Self {
            token,
            command,
            expects_payload,
        }
    }
}

/// Result of matching a closed line against the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenMatch<C> {
    pub descriptor: CommandDescriptor<C>,

    /// Offset of the byte right after the token (`=` or a terminator)
    pub remainder: usize,
}

/// Immutable, ordered command table
#[derive(Debug, Clone)]
pub struct CommandTable<C> {
    descriptors: Vec<CommandDescriptor<C>>,
}

impl<C: Copy> CommandTable<C> {
    pub fn new(descriptors: Vec<CommandDescriptor<C>>) -> Self {
        Self { descriptors }
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDescriptor<C>> {
        self.descriptors.iter()
    }

    /// Find the first descriptor whose token starts `line`
    ///
    /// Token characters are compared against the normalized input, and the
    /// byte following the token must be `=` or a line terminator.
    pub fn lookup(&self, line: &[u8]) -> Option<TokenMatch<C>> {
        self.descriptors.iter().find_map(|descriptor| {
            match_token(descriptor.token, line).map(|remainder| TokenMatch {
                descriptor: *descriptor,
                remainder,
            })
        })
    }
}

fn match_token(token: &str, line: &[u8]) -> Option<usize> {
    let token = token.as_bytes();
    if line.len() <= token.len() {
        return None;
    }
    let prefix_matches = token
        .iter()
        .zip(line.iter())
        .all(|(&t, &c)| t == normalize(c));
    if !prefix_matches {
        return None;
    }

    let next = line[token.len()];
    (next == b'=' || is_newline(next)).then_some(token.len())
}
