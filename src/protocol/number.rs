//! C-style unsigned integer arguments
//!
//! Numbers on the wire follow `strtoul(.., 0)`: a `0x` prefix selects hex,
//! a leading `0` selects octal, anything else is decimal. Unlike `strtoul`
//! the whole argument must be consumed and overflow is rejected.

/// Parse a complete C-style unsigned integer
pub fn parse_c_integer(arg: &[u8]) -> Option<u64> {
    let (digits, radix) = match arg {
        [b'0', b'x' | b'X', rest @ ..] => (rest, 16),
        [b'0', rest @ ..] if !rest.is_empty() => (rest, 8),
        _ => (arg, 10),
    };
    if digits.is_empty() {
        return None;
    }

    digits.iter().try_fold(0u64, |acc, &c| {
        let digit = (c as char).to_digit(radix)?;
        acc.checked_mul(radix as u64)?.checked_add(digit as u64)
    })
}

/// Parse an argument that must fit in 16 bits
pub fn parse_arg_u16(arg: &[u8]) -> Option<u16> {
    parse_c_integer(arg).and_then(|v| u16::try_from(v).ok())
}

/// Parse an argument that must fit in 32 bits
pub fn parse_arg_u32(arg: &[u8]) -> Option<u32> {
    parse_c_integer(arg).and_then(|v| u32::try_from(v).ok())
}
