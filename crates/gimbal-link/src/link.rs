//! Request/response exchange with the gimbal.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::{Duration, Instant};

use ptzkit_siyi_protocol::{
    ATTITUDE_PAYLOAD_LEN, AngleLimits, Attitude, GimbalCommand, ProtocolResult,
    build_attitude_request, build_set_angles, decode, degrees_to_deci, parse_attitude,
};
use tracing::{debug, trace, warn};

use crate::error::{LinkError, LinkResult};
use crate::transport::{DatagramTransport, TransportFactory, UdpConnector, is_timeout};

/// Factory address of the A8 Mini on its camera network.
pub const DEFAULT_ENDPOINT: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(192, 168, 144, 25)), 37260);

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(350);

/// Large enough for any reply the gimbal sends.
pub const RECV_BUFFER_LEN: usize = 2048;

#[derive(Debug, Clone, PartialEq)]
pub struct LinkConfig {
    pub endpoint: SocketAddr,
    /// Socket receive timeout and attitude reply deadline.
    pub timeout: Duration,
    pub limits: AngleLimits,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT,
            timeout: DEFAULT_TIMEOUT,
            limits: AngleLimits::default(),
        }
    }
}

/// Link to one physical gimbal.
///
/// The link owns its transport and the outbound sequence counter. Operations
/// invoked while disconnected connect first. Dropping the link disconnects it.
pub struct GimbalLink<F: TransportFactory = UdpConnector> {
    factory: F,
    transport: Option<F::Transport>,
    timeout: Duration,
    limits: AngleLimits,
    sequence: u16,
}

impl GimbalLink<UdpConnector> {
    /// Create a UDP link. No socket is opened until the first operation or
    /// an explicit [`connect`](Self::connect).
    pub fn new(config: LinkConfig) -> Self {
        let connector = UdpConnector::new(config.endpoint, config.timeout);
        Self::with_factory(connector, config.timeout, config.limits)
    }
}

impl<F: TransportFactory> GimbalLink<F> {
    pub fn with_factory(factory: F, timeout: Duration, limits: AngleLimits) -> Self {
        Self {
            factory,
            transport: None,
            timeout,
            limits,
            sequence: 0,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// Sequence number the next outbound frame will carry.
    pub fn next_sequence(&self) -> u16 {
        self.sequence
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn limits(&self) -> &AngleLimits {
        &self.limits
    }

    /// Open the transport. Does nothing when already connected.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Io`] if the socket cannot be opened.
    pub fn connect(&mut self) -> LinkResult<()> {
        if self.transport.is_none() {
            let transport = self.open_transport()?;
            self.transport = Some(transport);
        }
        Ok(())
    }

    /// Close the transport. Does nothing when already disconnected.
    ///
    /// The link is disconnected afterwards even if closing failed.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Io`] if the transport reported an error on close.
    pub fn disconnect(&mut self) -> LinkResult<()> {
        let Some(transport) = self.transport.take() else {
            return Ok(());
        };
        let result = transport.close();
        debug!(ok = result.is_ok(), "gimbal link disconnected");
        result.map_err(LinkError::from)
    }

    /// Ask the gimbal for its current attitude.
    ///
    /// Sends one request and waits until the configured timeout for a valid
    /// attitude reply. Datagrams that fail to decode, carry another command
    /// id, or have a short payload are skipped.
    ///
    /// Returns `Ok(None)` when no reply arrives in time or receiving fails.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::Io`] if connecting or sending fails.
    pub fn request_attitude(&mut self) -> LinkResult<Option<Attitude>> {
        let mut transport = self.take_transport()?;
        let outcome = self.exchange_attitude(&mut transport);
        self.transport = Some(transport);
        outcome
    }

    /// Point the gimbal at `(yaw, pitch)` degrees.
    ///
    /// Angles are clamped to the configured limits and sent once; no reply is
    /// requested. Use [`request_attitude`](Self::request_attitude) to confirm.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::InvalidAngle`] for non-finite input, or
    /// [`LinkError::Io`] if connecting or sending fails.
    pub fn set_pan_tilt(&mut self, yaw: f32, pitch: f32) -> LinkResult<()> {
        if !yaw.is_finite() || !pitch.is_finite() {
            return Err(LinkError::InvalidAngle { yaw, pitch });
        }
        let (yaw_deg, pitch_deg) = self.limits.clamp(yaw, pitch);
        let (yaw_deci, pitch_deci) = (degrees_to_deci(yaw_deg), degrees_to_deci(pitch_deg));
        debug!(yaw, pitch, yaw_deci, pitch_deci, "angle command");

        let mut transport = self.take_transport()?;
        let outcome = self.send_frame(&mut transport, GimbalCommand::SetAngles, |seq| {
            build_set_angles(yaw_deci, pitch_deci, seq)
        });
        self.transport = Some(transport);
        outcome
    }

    /// Return the gimbal to yaw 0°, pitch 0°.
    ///
    /// # Errors
    ///
    /// See [`set_pan_tilt`](Self::set_pan_tilt).
    pub fn center(&mut self) -> LinkResult<()> {
        self.set_pan_tilt(0.0, 0.0)
    }

    fn exchange_attitude(&mut self, transport: &mut F::Transport) -> LinkResult<Option<Attitude>> {
        self.send_frame(transport, GimbalCommand::GetAttitude, build_attitude_request)?;

        let expected = GimbalCommand::GetAttitude.to_u8();
        let deadline = Instant::now() + self.timeout;
        let mut buf = [0u8; RECV_BUFFER_LEN];

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                debug!(timeout = ?self.timeout, "no attitude reply before deadline");
                return Ok(None);
            }

            let len = match transport.recv_timeout(&mut buf, remaining) {
                Ok(len) => len,
                Err(error) if is_timeout(&error) => {
                    debug!(timeout = ?self.timeout, "attitude request timed out");
                    return Ok(None);
                }
                Err(error) => {
                    debug!(%error, "attitude receive failed");
                    return Ok(None);
                }
            };

            let Some(frame) = buf.get(..len).and_then(decode) else {
                trace!(len, "skipping undecodable datagram");
                continue;
            };
            if frame.command_id != expected {
                trace!(command_id = frame.command_id, "skipping reply for another command");
                continue;
            }
            if frame.payload.len() < ATTITUDE_PAYLOAD_LEN {
                trace!(len = frame.payload.len(), "skipping short attitude payload");
                continue;
            }
            if let Some(attitude) = parse_attitude(&frame.payload) {
                trace!(sequence = frame.sequence, ?attitude, "attitude reply");
                return Ok(Some(attitude));
            }
        }
    }

    fn send_frame(
        &mut self,
        transport: &mut F::Transport,
        command: GimbalCommand,
        build: impl FnOnce(u16) -> ProtocolResult<Vec<u8>>,
    ) -> LinkResult<()> {
        let sequence = self.sequence;
        self.sequence = sequence.wrapping_add(1);
        let packet = build(sequence)?;
        let sent = transport.send(&packet)?;
        debug!(?command, sequence, len = sent, "sent gimbal frame");
        Ok(())
    }

    fn take_transport(&mut self) -> LinkResult<F::Transport> {
        match self.transport.take() {
            Some(transport) => Ok(transport),
            None => {
                warn!("gimbal link not connected, connecting now");
                self.open_transport()
            }
        }
    }

    fn open_transport(&mut self) -> LinkResult<F::Transport> {
        let transport = self.factory.open()?;
        self.sequence = 0;
        debug!("gimbal link connected");
        Ok(transport)
    }
}

impl<F: TransportFactory> Drop for GimbalLink<F> {
    fn drop(&mut self) {
        if let Err(error) = self.disconnect() {
            warn!(%error, "failed to close gimbal link on drop");
        }
    }
}

impl<F: TransportFactory> std::fmt::Debug for GimbalLink<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GimbalLink")
            .field("connected", &self.is_connected())
            .field("timeout", &self.timeout)
            .field("limits", &self.limits)
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LinkConfig::default();
        assert_eq!(config.endpoint.to_string(), "192.168.144.25:37260");
        assert_eq!(config.timeout, Duration::from_millis(350));
        assert_eq!(config.limits, AngleLimits::default());
    }

    #[test]
    fn test_new_link_is_idle() {
        let link = GimbalLink::new(LinkConfig::default());
        assert!(!link.is_connected());
        assert_eq!(link.next_sequence(), 0);
        assert_eq!(link.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_disconnect_when_idle_is_noop() -> Result<(), LinkError> {
        let mut link = GimbalLink::new(LinkConfig::default());
        link.disconnect()?;
        assert!(!link.is_connected());
        Ok(())
    }
}
