//! Character normalization
//!
//! Every byte the interpreter inspects goes through [`normalize`] first, so
//! matching and tokenizing share one set of canonicalization rules.

/// Replacement for bytes that are neither printable ASCII nor line control
pub const SENTINEL: u8 = b'#';

/// Map an input byte to its canonical form
///
/// - `\0`, `\r` and `\n` pass through
/// - lowercase `a`..=`z` become uppercase
/// - every other printable ASCII byte passes through
/// - anything else becomes [`SENTINEL`]
pub fn normalize(input: u8) -> u8 {
    match input {
        b'\0' | b'\r' | b'\n' => input,
        b'a'..=b'z' => input.to_ascii_uppercase(),
        b' '..=b'~' => input,
        _ => SENTINEL,
    }
}

/// True for the two line terminators
pub fn is_newline(c: u8) -> bool {
    c == b'\r' || c == b'\n'
}

/// Compare an argument against a keyword after normalization
///
/// The whole argument must match; `"ON"` matches `on` but not `ONE`.
pub fn match_string(keyword: &str, arg: &[u8]) -> bool {
    keyword.len() == arg.len()
        && keyword
            .bytes()
            .zip(arg.iter())
            .all(|(k, &a)| k == normalize(a))
}
