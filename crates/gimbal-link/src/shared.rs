//! Thread-safe handle to a single gimbal link.

use std::sync::Arc;

use parking_lot::Mutex;
use ptzkit_siyi_protocol::Attitude;

use crate::error::LinkResult;
use crate::link::GimbalLink;
use crate::transport::{TransportFactory, UdpConnector};

/// Cloneable handle serialising every operation on one [`GimbalLink`].
///
/// The lock is held for the whole operation, so an attitude request blocks
/// other callers until its reply or deadline. At most one request is ever in
/// flight on the wire.
pub struct SharedGimbalLink<F: TransportFactory = UdpConnector> {
    inner: Arc<Mutex<GimbalLink<F>>>,
}

impl<F: TransportFactory> SharedGimbalLink<F> {
    pub fn new(link: GimbalLink<F>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(link)),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.inner.lock().is_connected()
    }

    /// # Errors
    ///
    /// See [`GimbalLink::connect`].
    pub fn connect(&self) -> LinkResult<()> {
        self.inner.lock().connect()
    }

    /// # Errors
    ///
    /// See [`GimbalLink::disconnect`].
    pub fn disconnect(&self) -> LinkResult<()> {
        self.inner.lock().disconnect()
    }

    /// # Errors
    ///
    /// See [`GimbalLink::request_attitude`].
    pub fn request_attitude(&self) -> LinkResult<Option<Attitude>> {
        self.inner.lock().request_attitude()
    }

    /// # Errors
    ///
    /// See [`GimbalLink::set_pan_tilt`].
    pub fn set_pan_tilt(&self, yaw: f32, pitch: f32) -> LinkResult<()> {
        self.inner.lock().set_pan_tilt(yaw, pitch)
    }

    /// # Errors
    ///
    /// See [`GimbalLink::center`].
    pub fn center(&self) -> LinkResult<()> {
        self.inner.lock().center()
    }

    /// Run `f` with exclusive access to the link.
    pub fn with_link<R>(&self, f: impl FnOnce(&mut GimbalLink<F>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl<F: TransportFactory> Clone for SharedGimbalLink<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F: TransportFactory> From<GimbalLink<F>> for SharedGimbalLink<F> {
    fn from(link: GimbalLink<F>) -> Self {
        Self::new(link)
    }
}
