//! SIYI gimbal SDK protocol implementation for A8 Mini class gimbals.
//!
//! This crate is intentionally I/O-free. It provides pure functions and types
//! that can be tested and fuzzed without a gimbal or a network.
//!
//! # Key Features
//! - Frame encoding with CRC-16/XMODEM checksums
//! - Silent-reject frame decoding for foreign or corrupted datagrams
//! - Attitude query and angle set command builders
//! - Angle limit clamping and 0.1° fixed-point conversion

#![deny(static_mut_refs)]

pub mod angles;
pub mod command;
pub mod crc;
pub mod error;
pub mod frame;

pub use angles::{
    AngleLimits, Attitude, DEFAULT_PITCH_MAX, DEFAULT_PITCH_MIN, DEFAULT_YAW_MAX,
    DEFAULT_YAW_MIN, deci_to_degrees, degrees_to_deci,
};
pub use command::{
    ATTITUDE_PAYLOAD_LEN, GimbalCommand, SET_ANGLES_PAYLOAD_LEN, build_attitude_request,
    build_set_angles, parse_attitude,
};
pub use crc::crc16_xmodem;
pub use error::{ProtocolError, ProtocolResult};
pub use frame::{
    CONTROL_ACK_REQUESTED, Frame, FRAME_OVERHEAD, HEADER_LEN, MAX_PAYLOAD_LEN, PREAMBLE, decode,
    encode,
};
