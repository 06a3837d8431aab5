//! Hex codec
//!
//! Conversions between binary data and ASCII hex used by the command
//! handlers. Decoding is lenient: a character that is not a hex digit decodes
//! as zero, and an odd-length input pads the final nibble with zero.

/// ASCII hex digit to its value; anything else is 0
pub fn hex_to_nibble(hex: u8) -> u8 {
    match hex {
        b'0'..=b'9' => hex - b'0',
        b'A'..=b'F' => hex - b'A' + 10,
        b'a'..=b'f' => hex - b'a' + 10,
        _ => 0,
    }
}

/// Low nibble to an uppercase ASCII hex digit
pub fn nibble_to_hex(nibble: u8) -> u8 {
    let nibble = nibble & 0x0F;
    if nibble <= 9 {
        b'0' + nibble
    } else {
        b'A' + nibble - 10
    }
}

/// Decode ASCII hex into binary
///
/// Inputs shorter than two characters decode to nothing.
pub fn decode(source: &[u8]) -> Vec<u8> {
    if source.len() < 2 {
        return Vec::new();
    }
    source
        .chunks(2)
        .map(|pair| {
            let high = hex_to_nibble(pair[0]) << 4;
            let low = pair.get(1).copied().map_or(0, hex_to_nibble);
            high | low
        })
        .collect()
}

/// Encode binary data as uppercase ASCII hex
pub fn encode(source: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(source.len() * 2);
    for &byte in source {
        out.push(nibble_to_hex(byte >> 4));
        out.push(nibble_to_hex(byte));
    }
    out
}

/// Encode a 16-bit value as four hex digits, most significant first
pub fn encode_u16(num: u16) -> [u8; 4] {
    [
        nibble_to_hex((num >> 12) as u8),
        nibble_to_hex((num >> 8) as u8),
        nibble_to_hex((num >> 4) as u8),
        nibble_to_hex(num as u8),
    ]
}
