//! SIYI frame encoding and decoding.
//!
//! Every frame has the following little-endian layout:
//! - Bytes 0-1: Preamble (`0x55 0x66`)
//! - Byte 2: Control (bit 0 = acknowledgement requested)
//! - Bytes 3-4: Payload length
//! - Bytes 5-6: Sequence number
//! - Byte 7: Command ID
//! - Bytes 8..8+len: Payload
//! - Bytes 8+len..10+len: CRC-16/XMODEM over bytes `[0, 8+len)`

use tracing::trace;

use crate::crc::crc16_xmodem;
use crate::error::{ProtocolError, ProtocolResult};

pub const PREAMBLE: [u8; 2] = [0x55, 0x66];

/// Control bit asking the gimbal to acknowledge the frame.
pub const CONTROL_ACK_REQUESTED: u8 = 0x01;

/// Preamble, control, length, sequence and command id.
pub const HEADER_LEN: usize = 8;

/// Header plus checksum: the size of a frame with an empty payload.
pub const FRAME_OVERHEAD: usize = HEADER_LEN + 2;

pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize;

/// A checksum-validated frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub control: u8,
    pub sequence: u16,
    pub command_id: u8,
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn new(command_id: u8, sequence: u16) -> Self {
        Self {
            control: 0,
            sequence,
            command_id,
            payload: Vec::new(),
        }
    }

    pub fn with_payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = payload.into();
        self
    }

    pub fn with_ack_requested(mut self, ack_requested: bool) -> Self {
        if ack_requested {
            self.control |= CONTROL_ACK_REQUESTED;
        } else {
            self.control &= !CONTROL_ACK_REQUESTED;
        }
        self
    }

    pub fn ack_requested(&self) -> bool {
        self.control & CONTROL_ACK_REQUESTED != 0
    }

    /// Serialise this frame, keeping any control bits beyond bit 0.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::PayloadTooLarge`] if the payload does not fit
    /// the 16-bit length field.
    pub fn to_bytes(&self) -> ProtocolResult<Vec<u8>> {
        encode_with_control(self.command_id, &self.payload, self.sequence, self.control)
    }
}

/// Build a complete frame.
///
/// # Errors
///
/// Returns [`ProtocolError::PayloadTooLarge`] if `payload` is longer than
/// [`MAX_PAYLOAD_LEN`]. Nothing is encoded in that case.
pub fn encode(
    command_id: u8,
    payload: &[u8],
    sequence: u16,
    ack_requested: bool,
) -> ProtocolResult<Vec<u8>> {
    let control = if ack_requested {
        CONTROL_ACK_REQUESTED
    } else {
        0
    };
    encode_with_control(command_id, payload, sequence, control)
}

fn encode_with_control(
    command_id: u8,
    payload: &[u8],
    sequence: u16,
    control: u8,
) -> ProtocolResult<Vec<u8>> {
    let Ok(len) = u16::try_from(payload.len()) else {
        return Err(ProtocolError::PayloadTooLarge {
            len: payload.len(),
            max: MAX_PAYLOAD_LEN,
        });
    };

    let mut out = Vec::with_capacity(FRAME_OVERHEAD + payload.len());
    out.extend_from_slice(&PREAMBLE);
    out.push(control);
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(&sequence.to_le_bytes());
    out.push(command_id);
    out.extend_from_slice(payload);

    let crc = crc16_xmodem(&out);
    out.extend_from_slice(&crc.to_le_bytes());
    Ok(out)
}

/// Decode and validate a frame.
///
/// Returns `None` for anything that is not a well-formed frame: too short,
/// wrong preamble, declared length past the end of the buffer, or checksum
/// mismatch. Bytes after the checksum are ignored.
pub fn decode(bytes: &[u8]) -> Option<Frame> {
    let Some((header, rest)) = bytes.split_at_checked(HEADER_LEN) else {
        trace!(len = bytes.len(), "discarding short datagram");
        return None;
    };
    let header: &[u8; HEADER_LEN] = header.try_into().ok()?;
    let [p0, p1, control, l0, l1, s0, s1, command_id] = *header;

    if [p0, p1] != PREAMBLE {
        trace!(preamble = ?[p0, p1], "discarding datagram with foreign preamble");
        return None;
    }

    let len = usize::from(u16::from_le_bytes([l0, l1]));
    let Some((payload, tail)) = rest.split_at_checked(len) else {
        trace!(declared = len, available = rest.len(), "discarding truncated frame");
        return None;
    };
    let Some(&[c0, c1]) = tail.get(..2) else {
        trace!(declared = len, "discarding frame without checksum");
        return None;
    };

    let received = u16::from_le_bytes([c0, c1]);
    let computed = crc16_xmodem(bytes.get(..HEADER_LEN + len)?);
    if received != computed {
        trace!(received, computed, "discarding frame with bad checksum");
        return None;
    }

    Some(Frame {
        control,
        sequence: u16::from_le_bytes([s0, s1]),
        command_id,
        payload: payload.to_vec(),
    })
}
