//! Fuzzes the SIYI frame decoder.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_frame_decode
#![no_main]
use libfuzzer_sys::fuzz_target;
use ptzkit_siyi_protocol::decode;

fuzz_target!(|data: &[u8]| {
    // Must never panic on arbitrary bytes. Rejected datagrams are expected.
    if let Some(frame) = decode(data) {
        // Anything that decodes must re-encode to the same bytes.
        if let Ok(bytes) = frame.to_bytes() {
            assert_eq!(decode(&bytes), Some(frame));
        }
    }
});
