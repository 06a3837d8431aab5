//! Tests for the hex codec

use cmdlink::hex;

#[test]
fn test_encode_is_uppercase() {
    assert_eq!(hex::encode(&[0x00, 0xAB, 0x7F]), b"00AB7F");
    assert!(hex::encode(&[]).is_empty());
}

#[test]
fn test_decode_either_case() {
    assert_eq!(hex::decode(b"DEADbeef"), vec![0xDE, 0xAD, 0xBE, 0xEF]);
}

#[test]
fn test_decode_is_lenient() {
    // Invalid digits decode as zero
    assert_eq!(hex::decode(b"G1"), vec![0x01]);
    // Odd length pads the last nibble
    assert_eq!(hex::decode(b"ABC"), vec![0xAB, 0xC0]);
    // Too short to hold a byte
    assert!(hex::decode(b"A").is_empty());
}

#[test]
fn test_nibbles() {
    assert_eq!(hex::nibble_to_hex(0x0A), b'A');
    assert_eq!(hex::nibble_to_hex(0x1F), b'F');
    assert_eq!(hex::hex_to_nibble(b'f'), 0x0F);
    assert_eq!(hex::hex_to_nibble(b'z'), 0);
}

#[test]
fn test_encode_u16() {
    assert_eq!(&hex::encode_u16(0x1F9), b"01F9");
    assert_eq!(&hex::encode_u16(0xFFFF), b"FFFF");
}
