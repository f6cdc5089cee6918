//! CRC-16/XMODEM checksum used by every SIYI frame.

const POLY: u16 = 0x1021;

/// CRC-16/XMODEM: polynomial 0x1021, initial value 0x0000, MSB first, no
/// reflection and no final XOR.
pub fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0x0000;
    for &byte in data {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ POLY;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_value() {
        assert_eq!(crc16_xmodem(b"123456789"), 0x31C3);
    }

    #[test]
    fn test_empty_input_is_zero() {
        assert_eq!(crc16_xmodem(&[]), 0x0000);
    }

    #[test]
    fn test_attitude_request_header() {
        // Header of the SDK's documented "request gimbal attitude" example.
        let header = [0x55, 0x66, 0x01, 0x00, 0x00, 0x00, 0x00, 0x0D];
        assert_eq!(crc16_xmodem(&header), 0x05E8);
    }
}
