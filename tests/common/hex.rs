//! Hex string helpers for wire vectors.

/// Convert a hex string (whitespace allowed) to bytes.
pub fn hex_to_bytes(hex: &str) -> Vec<u8> {
    let cleaned: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
    assert!(cleaned.len() % 2 == 0, "odd hex string length");
    cleaned
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            let hi = (pair[0] as char).to_digit(16).expect("invalid hex digit");
            let lo = (pair[1] as char).to_digit(16).expect("invalid hex digit");
            (hi * 16 + lo) as u8
        })
        .collect()
}

/// Convert bytes to a lowercase hex string.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
