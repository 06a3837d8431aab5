//! Tests for character normalization and keyword matching

use cmdlink::protocol::{is_newline, match_string, normalize, SENTINEL};

#[test]
fn test_lowercase_is_uppercased() {
    for c in b'a'..=b'z' {
        assert_eq!(normalize(c), c.to_ascii_uppercase());
    }
}

#[test]
fn test_printable_passes_through() {
    for c in b' '..=b'~' {
        if !c.is_ascii_lowercase() {
            assert_eq!(normalize(c), c);
        }
    }
}

#[test]
fn test_line_control_passes_through() {
    assert_eq!(normalize(b'\0'), b'\0');
    assert_eq!(normalize(b'\r'), b'\r');
    assert_eq!(normalize(b'\n'), b'\n');
}

#[test]
fn test_other_bytes_become_sentinel() {
    for c in [0x01u8, 0x07, b'\t', 0x1B, 0x7F, 0x80, 0xC3, 0xFF] {
        assert_eq!(normalize(c), SENTINEL, "byte 0x{:02X}", c);
    }
}

#[test]
fn test_is_newline() {
    assert!(is_newline(b'\r'));
    assert!(is_newline(b'\n'));
    assert!(!is_newline(b'\0'));
    assert!(!is_newline(b' '));
}

#[test]
fn test_match_string_is_case_insensitive() {
    assert!(match_string("ON", b"on"));
    assert!(match_string("ON", b"oN"));
    assert!(match_string("FIRMWARE", b"FirmWare"));
}

#[test]
fn test_match_string_requires_whole_argument() {
    assert!(!match_string("ON", b"ONE"));
    assert!(!match_string("ON", b"O"));
    assert!(!match_string("ON", b""));
}
