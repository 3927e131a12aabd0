#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

use bytes::Bytes;
use ldap_frame::attribute::parse_attributes;
use ldap_frame::{FrameOutcome, Packet, read_packet};

fuzz_target!(|data: &[u8]| {
    // Buffer entry point: errors are fine, panics are not
    let _ = Packet::parse(Bytes::copy_from_slice(data));

    // Attribute parser over the raw window
    let bytes = Bytes::copy_from_slice(data);
    let _ = parse_attributes(&bytes, 0, bytes.len());

    // Stream framer: must always resolve to one of the three outcomes
    match read_packet(&mut Cursor::new(data)) {
        FrameOutcome::Packet(packet) => {
            // A framed packet must re-serialize without panicking
            let _ = packet.to_bytes();
            let _ = packet.message_id();
        }
        FrameOutcome::EndOfStream => assert!(data.is_empty()),
        FrameOutcome::Failed(_) => {}
    }
});
