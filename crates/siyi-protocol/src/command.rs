//! Attitude query and angle set commands.
//!
//! - `GetAttitude` (0x0D): empty request payload; the response payload starts
//!   with yaw, pitch and roll as i16 in 0.1° units, followed by the three
//!   angular velocities.
//! - `SetAngles` (0x0E): payload is yaw and pitch as i16 in 0.1° units. The
//!   gimbal is not asked to acknowledge it.

use crate::angles::Attitude;
use crate::error::ProtocolResult;
use crate::frame::encode;

/// Minimum attitude response payload: six i16 fields.
pub const ATTITUDE_PAYLOAD_LEN: usize = 12;

pub const SET_ANGLES_PAYLOAD_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GimbalCommand {
    GetAttitude,
    SetAngles,
}

impl GimbalCommand {
    pub fn from_u8(val: u8) -> Option<Self> {
        match val {
            0x0D => Some(Self::GetAttitude),
            0x0E => Some(Self::SetAngles),
            _ => None,
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            Self::GetAttitude => 0x0D,
            Self::SetAngles => 0x0E,
        }
    }

    /// Whether frames of this command ask the gimbal for a reply.
    pub fn requests_ack(self) -> bool {
        matches!(self, Self::GetAttitude)
    }
}

/// # Errors
///
/// Never fails in practice; the payload is empty.
pub fn build_attitude_request(seq: u16) -> ProtocolResult<Vec<u8>> {
    let cmd = GimbalCommand::GetAttitude;
    encode(cmd.to_u8(), &[], seq, cmd.requests_ack())
}

/// Build a set-angles frame from already clamped 0.1° values.
///
/// # Errors
///
/// Never fails in practice; the payload is four bytes.
pub fn build_set_angles(yaw_deci: i16, pitch_deci: i16, seq: u16) -> ProtocolResult<Vec<u8>> {
    let mut payload = [0u8; SET_ANGLES_PAYLOAD_LEN];
    let (yaw, pitch) = payload.split_at_mut(2);
    yaw.copy_from_slice(&yaw_deci.to_le_bytes());
    pitch.copy_from_slice(&pitch_deci.to_le_bytes());

    let cmd = GimbalCommand::SetAngles;
    encode(cmd.to_u8(), &payload, seq, cmd.requests_ack())
}

/// Read yaw, pitch and roll from an attitude response payload.
///
/// Returns `None` when fewer than [`ATTITUDE_PAYLOAD_LEN`] bytes are present.
pub fn parse_attitude(payload: &[u8]) -> Option<Attitude> {
    let fields: &[u8; ATTITUDE_PAYLOAD_LEN] = payload.get(..ATTITUDE_PAYLOAD_LEN)?.try_into().ok()?;
    let [y0, y1, p0, p1, r0, r1, ..] = *fields;
    Some(Attitude::from_deci(
        i16::from_le_bytes([y0, y1]),
        i16::from_le_bytes([p0, p1]),
        i16::from_le_bytes([r0, r1]),
    ))
}
