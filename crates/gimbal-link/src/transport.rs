//! Datagram transports.
//!
//! [`TransportFactory`] is the seam between the link and the network: the
//! link asks its factory for a fresh transport on every (re)connect. The
//! production implementation is a UDP socket; tests substitute a scripted
//! transport.

use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};
use std::time::Duration;

use tracing::debug;

/// One open datagram endpoint talking to a single peer.
pub trait DatagramTransport: Send {
    /// Send one datagram to the peer.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the datagram could not be sent.
    fn send(&mut self, datagram: &[u8]) -> io::Result<usize>;

    /// Receive one datagram, waiting at most `timeout`.
    ///
    /// # Errors
    ///
    /// A timeout is reported as an error for which [`is_timeout`] is true.
    fn recv_timeout(&mut self, buf: &mut [u8], timeout: Duration) -> io::Result<usize>;

    /// Release the endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint reports a failure while closing.
    fn close(self) -> io::Result<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// Opens transports for a link.
pub trait TransportFactory: Send {
    type Transport: DatagramTransport;

    /// # Errors
    ///
    /// Returns an error if the endpoint cannot be opened.
    fn open(&mut self) -> io::Result<Self::Transport>;
}

/// Whether an I/O error is a receive timeout rather than a failure.
pub fn is_timeout(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}

/// Opens UDP sockets bound to an ephemeral local port.
#[derive(Debug, Clone)]
pub struct UdpConnector {
    endpoint: SocketAddr,
    bind_addr: SocketAddr,
    read_timeout: Duration,
}

impl UdpConnector {
    pub fn new(endpoint: SocketAddr, read_timeout: Duration) -> Self {
        Self {
            endpoint,
            bind_addr: SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0)),
            read_timeout,
        }
    }

    /// Bind to a specific local address instead of `0.0.0.0:0`.
    pub fn with_bind_addr(mut self, bind_addr: SocketAddr) -> Self {
        self.bind_addr = bind_addr;
        self
    }
}

impl TransportFactory for UdpConnector {
    type Transport = UdpTransport;

    fn open(&mut self) -> io::Result<UdpTransport> {
        let socket = UdpSocket::bind(self.bind_addr)?;
        socket.set_read_timeout(Some(non_zero(self.read_timeout)))?;
        debug!(
            local = %socket.local_addr()?,
            endpoint = %self.endpoint,
            "opened gimbal UDP socket"
        );
        Ok(UdpTransport {
            socket,
            endpoint: self.endpoint,
        })
    }
}

/// Unconnected UDP socket sending to a fixed endpoint.
///
/// Replies are accepted from any source, like the gimbal SDK examples.
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    endpoint: SocketAddr,
}

impl UdpTransport {
    /// # Errors
    ///
    /// Returns an error if the socket has no local address.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

impl DatagramTransport for UdpTransport {
    fn send(&mut self, datagram: &[u8]) -> io::Result<usize> {
        self.socket.send_to(datagram, self.endpoint)
    }

    fn recv_timeout(&mut self, buf: &mut [u8], timeout: Duration) -> io::Result<usize> {
        if timeout.is_zero() {
            return Err(io::Error::from(io::ErrorKind::TimedOut));
        }
        self.socket.set_read_timeout(Some(timeout))?;
        let (len, source) = self.socket.recv_from(buf)?;
        tracing::trace!(len, %source, "received datagram");
        Ok(len)
    }
}

// `set_read_timeout` rejects a zero duration.
fn non_zero(timeout: Duration) -> Duration {
    timeout.max(Duration::from_millis(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn loopback() -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 0))
    }

    #[test]
    fn test_is_timeout() {
        assert!(is_timeout(&io::Error::from(io::ErrorKind::WouldBlock)));
        assert!(is_timeout(&io::Error::from(io::ErrorKind::TimedOut)));
        assert!(!is_timeout(&io::Error::from(io::ErrorKind::ConnectionRefused)));
    }

    #[test]
    fn test_udp_send_and_receive_on_loopback() -> TestResult {
        let peer = UdpSocket::bind(loopback())?;
        let mut connector = UdpConnector::new(peer.local_addr()?, Duration::from_millis(200))
            .with_bind_addr(loopback());
        let mut transport = connector.open()?;

        transport.send(&[1, 2, 3])?;
        let mut buf = [0u8; 16];
        let (len, from) = peer.recv_from(&mut buf)?;
        assert_eq!(&buf[..len], &[1, 2, 3]);

        peer.send_to(&[9, 8], from)?;
        let len = transport.recv_timeout(&mut buf, Duration::from_millis(500))?;
        assert_eq!(&buf[..len], &[9, 8]);
        transport.close()?;
        Ok(())
    }

    #[test]
    fn test_udp_recv_times_out() -> TestResult {
        let peer = UdpSocket::bind(loopback())?;
        let mut connector = UdpConnector::new(peer.local_addr()?, Duration::from_millis(20))
            .with_bind_addr(loopback());
        let mut transport = connector.open()?;
        let mut buf = [0u8; 16];

        let err = transport
            .recv_timeout(&mut buf, Duration::from_millis(20))
            .err()
            .ok_or("expected a timeout")?;
        assert!(is_timeout(&err));

        let err = transport
            .recv_timeout(&mut buf, Duration::ZERO)
            .err()
            .ok_or("expected an immediate timeout")?;
        assert!(is_timeout(&err));
        Ok(())
    }

    #[test]
    fn test_non_zero() {
        assert_eq!(non_zero(Duration::ZERO), Duration::from_millis(1));
        assert_eq!(non_zero(Duration::from_secs(1)), Duration::from_secs(1));
    }
}
