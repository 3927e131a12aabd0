//! Common test fixtures and wire vectors.

use super::hex::hex_to_bytes;

/// BindResponse(success) for message id 1:
/// SEQUENCE { INTEGER 1, [APPLICATION 1] { ENUMERATED 0, OCTET STRING "",
/// OCTET STRING "" } }
pub const BIND_RESPONSE_HEX: &str = "300c02010161070a010004000400";

pub fn bind_response() -> Vec<u8> {
    hex_to_bytes(BIND_RESPONSE_HEX)
}

/// Long-form length vectors from captured traffic: (hex, length, byte count).
pub const LENGTH_VECTORS: &[(&str, u32, usize)] = &[
    ("8400000159", 345, 5),
    ("840000014f", 335, 5),
    ("840000012b", 299, 5),
];

/// Encode vectors: (length, hex).
pub const ENCODE_VECTORS: &[(u32, &str)] = &[(1, "01"), (127, "7f"), (128, "8400000080")];
