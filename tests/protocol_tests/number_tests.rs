//! Tests for C-style integer arguments

use cmdlink::protocol::{parse_arg_u16, parse_arg_u32, parse_c_integer};

#[test]
fn test_decimal() {
    assert_eq!(parse_c_integer(b"0"), Some(0));
    assert_eq!(parse_c_integer(b"42"), Some(42));
    assert_eq!(parse_c_integer(b"1024"), Some(1024));
}

#[test]
fn test_hex_prefix() {
    assert_eq!(parse_c_integer(b"0x10"), Some(16));
    assert_eq!(parse_c_integer(b"0XfF"), Some(255));
    assert_eq!(parse_c_integer(b"0x"), None);
}

#[test]
fn test_leading_zero_is_octal() {
    assert_eq!(parse_c_integer(b"010"), Some(8));
    assert_eq!(parse_c_integer(b"08"), None);
}

#[test]
fn test_trailing_garbage_rejected() {
    assert_eq!(parse_c_integer(b"12AB"), None);
    assert_eq!(parse_c_integer(b"-1"), None);
    assert_eq!(parse_c_integer(b""), None);
    assert_eq!(parse_c_integer(b" 1"), None);
}

#[test]
fn test_range_checks() {
    assert_eq!(parse_arg_u16(b"65535"), Some(u16::MAX));
    assert_eq!(parse_arg_u16(b"65536"), None);
    assert_eq!(parse_arg_u32(b"0xFFFFFFFF"), Some(u32::MAX));
    assert_eq!(parse_arg_u32(b"0x100000000"), None);
    assert_eq!(parse_c_integer(b"99999999999999999999999"), None);
}
