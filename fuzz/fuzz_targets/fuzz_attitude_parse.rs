//! Fuzzes the attitude payload parser.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_attitude_parse
#![no_main]
use libfuzzer_sys::fuzz_target;
use ptzkit_siyi_protocol::parse_attitude;

fuzz_target!(|data: &[u8]| {
    // Must never panic on arbitrary bytes.
    let _ = parse_attitude(data);
});
