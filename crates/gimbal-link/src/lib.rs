//! UDP link to a SIYI gimbal.
//!
//! A [`GimbalLink`] owns one datagram transport and the outbound sequence
//! counter. Requests are strictly serialised: every operation takes
//! `&mut self`, and [`SharedGimbalLink`] adds a mutex for callers that need to
//! share one link across threads.
//!
//! Nothing here retries. Angle commands are fire-and-forget, and an attitude
//! request is one send followed by a deadline-bounded wait for the reply.

#![deny(static_mut_refs)]

pub mod error;
pub mod link;
pub mod shared;
pub mod transport;

pub use error::{LinkError, LinkResult};
pub use link::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT, GimbalLink, LinkConfig, RECV_BUFFER_LEN};
pub use ptzkit_siyi_protocol::{AngleLimits, Attitude};
pub use shared::SharedGimbalLink;
pub use transport::{DatagramTransport, TransportFactory, UdpConnector, UdpTransport, is_timeout};
