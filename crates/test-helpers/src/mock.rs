//! Scripted gimbal transport.
//!
//! A [`MockGimbal`] records every datagram a link sends and answers receive
//! calls from a queue of [`MockReply`] values. An empty queue behaves like a
//! silent gimbal: every receive times out immediately.

use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use ptzkit_gimbal_link::{DatagramTransport, TransportFactory};
use ptzkit_siyi_protocol::{Frame, GimbalCommand, decode, encode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    Datagram(Vec<u8>),
    Timeout,
    Error(io::ErrorKind),
}

#[derive(Debug, Default)]
struct MockState {
    sent: Vec<Vec<u8>>,
    replies: VecDeque<MockReply>,
    opens: usize,
    closes: usize,
    recv_calls: usize,
    fail_open: bool,
    fail_send: bool,
    fail_close: bool,
}

/// Shared handle to the scripted gimbal; clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct MockGimbal {
    state: Arc<Mutex<MockState>>,
}

impl MockGimbal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connector(&self) -> MockConnector {
        MockConnector {
            state: Arc::clone(&self.state),
        }
    }

    pub fn queue(&self, reply: MockReply) -> &Self {
        self.state.lock().replies.push_back(reply);
        self
    }

    pub fn queue_datagram(&self, datagram: impl Into<Vec<u8>>) -> &Self {
        self.queue(MockReply::Datagram(datagram.into()))
    }

    pub fn set_fail_open(&self, fail: bool) {
        self.state.lock().fail_open = fail;
    }

    pub fn set_fail_send(&self, fail: bool) {
        self.state.lock().fail_send = fail;
    }

    pub fn set_fail_close(&self, fail: bool) {
        self.state.lock().fail_close = fail;
    }

    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.state.lock().sent.clone()
    }

    /// Sent datagrams that decode as frames, in send order.
    pub fn sent_frames(&self) -> Vec<Frame> {
        self.state
            .lock()
            .sent
            .iter()
            .filter_map(|bytes| decode(bytes))
            .collect()
    }

    pub fn last_frame(&self) -> Option<Frame> {
        self.sent_frames().pop()
    }

    pub fn opens(&self) -> usize {
        self.state.lock().opens
    }

    pub fn closes(&self) -> usize {
        self.state.lock().closes
    }

    pub fn recv_calls(&self) -> usize {
        self.state.lock().recv_calls
    }

    pub fn pending_replies(&self) -> usize {
        self.state.lock().replies.len()
    }
}

/// Build an attitude reply frame from 0.1° values.
///
/// The angular velocity fields are zero.
///
/// # Panics
///
/// Never panics; the payload is twelve bytes.
pub fn attitude_reply(sequence: u16, yaw: i16, pitch: i16, roll: i16) -> Vec<u8> {
    let mut payload = Vec::with_capacity(12);
    for value in [yaw, pitch, roll, 0, 0, 0] {
        payload.extend_from_slice(&value.to_le_bytes());
    }
    match encode(GimbalCommand::GetAttitude.to_u8(), &payload, sequence, false) {
        Ok(bytes) => bytes,
        Err(e) => panic!("attitude_reply: {e}"),
    }
}

#[derive(Debug, Clone)]
pub struct MockConnector {
    state: Arc<Mutex<MockState>>,
}

impl TransportFactory for MockConnector {
    type Transport = MockTransport;

    fn open(&mut self) -> io::Result<MockTransport> {
        let mut state = self.state.lock();
        if state.fail_open {
            return Err(io::Error::new(io::ErrorKind::AddrInUse, "mock open failure"));
        }
        state.opens += 1;
        Ok(MockTransport {
            state: Arc::clone(&self.state),
        })
    }
}

#[derive(Debug)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl DatagramTransport for MockTransport {
    fn send(&mut self, datagram: &[u8]) -> io::Result<usize> {
        let mut state = self.state.lock();
        if state.fail_send {
            return Err(io::Error::new(io::ErrorKind::NetworkUnreachable, "mock send failure"));
        }
        state.sent.push(datagram.to_vec());
        Ok(datagram.len())
    }

    fn recv_timeout(&mut self, buf: &mut [u8], _timeout: Duration) -> io::Result<usize> {
        let mut state = self.state.lock();
        state.recv_calls += 1;
        match state.replies.pop_front() {
            Some(MockReply::Datagram(bytes)) => {
                let len = bytes.len().min(buf.len());
                buf[..len].copy_from_slice(&bytes[..len]);
                Ok(len)
            }
            Some(MockReply::Error(kind)) => Err(io::Error::from(kind)),
            Some(MockReply::Timeout) | None => Err(io::Error::from(io::ErrorKind::TimedOut)),
        }
    }

    fn close(self) -> io::Result<()> {
        let mut state = self.state.lock();
        state.closes += 1;
        if state.fail_close {
            return Err(io::Error::other("mock close failure"));
        }
        Ok(())
    }
}
