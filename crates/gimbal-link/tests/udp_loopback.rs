//! End-to-end exchanges with a fake gimbal on the loopback interface.

use std::net::{SocketAddr, UdpSocket};
use std::thread;
use std::time::{Duration, Instant};

use ptzkit_gimbal_link::{AngleLimits, GimbalLink, UdpConnector};
use ptzkit_siyi_protocol::{GimbalCommand, decode};
use ptzkit_test_helpers::{TestResult, attitude_reply};

const LOOPBACK: &str = "127.0.0.1:0";

fn link_to(endpoint: SocketAddr, timeout: Duration) -> TestResult<GimbalLink> {
    let bind: SocketAddr = LOOPBACK.parse()?;
    let connector = UdpConnector::new(endpoint, timeout).with_bind_addr(bind);
    Ok(GimbalLink::with_factory(
        connector,
        timeout,
        AngleLimits::default(),
    ))
}

#[test]
fn attitude_round_trip_over_udp() -> TestResult {
    let gimbal = UdpSocket::bind(LOOPBACK)?;
    gimbal.set_read_timeout(Some(Duration::from_secs(2)))?;
    let endpoint = gimbal.local_addr()?;

    let responder = thread::spawn(move || -> std::io::Result<Option<u16>> {
        let mut buf = [0u8; 64];
        let (len, from) = gimbal.recv_from(&mut buf)?;
        let Some(request) = decode(&buf[..len]) else {
            return Ok(None);
        };
        // Noise first, then the real reply.
        gimbal.send_to(&[0x55, 0x66, 0x00], from)?;
        gimbal.send_to(&attitude_reply(request.sequence, -900, 150, -3), from)?;
        Ok(Some(u16::from(request.command_id)))
    });

    let mut link = link_to(endpoint, Duration::from_secs(1))?;
    let attitude = link.request_attitude()?.ok_or("no attitude reply")?;
    assert!((attitude.yaw_deg + 90.0).abs() < 1e-4);
    assert!((attitude.pitch_deg - 15.0).abs() < 1e-4);
    assert!((attitude.roll_deg + 0.3).abs() < 1e-4);

    let command = responder.join().map_err(|_| "responder panicked")??;
    assert_eq!(command, Some(u16::from(GimbalCommand::GetAttitude.to_u8())));
    Ok(())
}

#[test]
fn silent_gimbal_times_out_near_deadline() -> TestResult {
    let gimbal = UdpSocket::bind(LOOPBACK)?;
    let timeout = Duration::from_millis(150);
    let mut link = link_to(gimbal.local_addr()?, timeout)?;

    let started = Instant::now();
    let attitude = link.request_attitude()?;
    let elapsed = started.elapsed();

    assert_eq!(attitude, None);
    assert!(elapsed >= Duration::from_millis(100), "returned too early: {elapsed:?}");
    assert!(elapsed < Duration::from_secs(2), "overran the deadline: {elapsed:?}");

    let mut buf = [0u8; 64];
    gimbal.set_read_timeout(Some(Duration::from_secs(1)))?;
    let (len, _) = gimbal.recv_from(&mut buf)?;
    let request = decode(&buf[..len]).ok_or("request did not decode")?;
    assert!(request.ack_requested());
    Ok(())
}

#[test]
fn angle_command_reaches_gimbal() -> TestResult {
    let gimbal = UdpSocket::bind(LOOPBACK)?;
    gimbal.set_read_timeout(Some(Duration::from_secs(1)))?;
    let mut link = link_to(gimbal.local_addr()?, Duration::from_millis(200))?;

    link.set_pan_tilt(45.5, -30.0)?;

    let mut buf = [0u8; 64];
    let (len, _) = gimbal.recv_from(&mut buf)?;
    let frame = decode(&buf[..len]).ok_or("command did not decode")?;
    assert_eq!(frame.command_id, GimbalCommand::SetAngles.to_u8());
    assert_eq!(frame.payload, vec![0xC7, 0x01, 0xD4, 0xFE]);
    Ok(())
}
