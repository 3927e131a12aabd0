#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

use ldap_frame::ber::{decode_length, encode_length, read_length};

fuzz_target!(|data: &[u8]| {
    // Buffer and stream paths must agree whenever both succeed
    let buffered = decode_length(data, 0);
    let streamed = read_length(&mut Cursor::new(data));
    if let (Ok(a), Ok(b)) = (&buffered, &streamed) {
        assert_eq!(a, b);
    }

    // Decode at arbitrary offsets must never panic
    for offset in 0..data.len().min(8) {
        let _ = decode_length(data, offset);
    }

    // Whatever decodes successfully must re-encode to something that decodes
    // back to the same length
    if let Ok((length, _)) = buffered {
        let encoded = encode_length(length);
        assert_eq!(decode_length(&encoded, 0).unwrap().0, length);
    }
});
