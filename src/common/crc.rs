// src/common/crc.rs

use super::types::Transport;
use core::fmt;
use crc::{Algorithm, Crc};

/// Standard TF-series UART frame header.
pub const TF_FRAME_HEADER: [u8; 2] = [0x59, 0x59];

/// Integrity check run on a raw frame before it is decoded.
///
/// The driver accepts any bytes at the configured offsets unless a validator is
/// installed in the driver configuration.
pub trait FrameValidator {
    /// Returns `Ok(())` if `frame`, received over `transport`, may be decoded.
    fn validate(&self, transport: Transport, frame: &[u8]) -> Result<(), FrameError>;
}

/// Why a [`FrameValidator`] rejected a frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Frame is too short to carry a header and a check byte.
    TooShort { len: usize },
    /// Leading bytes are not the expected header.
    BadHeader { found: [u8; 2] },
    /// Received check byte does not match the calculated one.
    ChecksumMismatch { expected: u8, calculated: u8 },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::TooShort { len } => write!(f, "frame of {} bytes too short to check", len),
            FrameError::BadHeader { found } => {
                write!(f, "bad header {:#04x} {:#04x}", found[0], found[1])
            }
            FrameError::ChecksumMismatch { expected, calculated } => write!(
                f,
                "checksum mismatch: expected {:#04x}, calculated {:#04x}",
                expected, calculated
            ),
        }
    }
}

impl core::error::Error for FrameError {}

/// Low byte of the sum of all bytes, as used by TF-series UART frames.
#[inline]
pub fn sum8(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

/// Two header bytes followed by payload, closed by an 8-bit additive checksum.
///
/// This is the framing TF-series sensors use on UART. CAN payloads carry no
/// header, so frames from the CAN transports pass unchecked.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct HeaderChecksum {
    pub header: [u8; 2],
}

impl HeaderChecksum {
    pub const fn new(header: [u8; 2]) -> Self {
        HeaderChecksum { header }
    }
}

impl Default for HeaderChecksum {
    fn default() -> Self {
        Self::new(TF_FRAME_HEADER)
    }
}

impl FrameValidator for HeaderChecksum {
    fn validate(&self, transport: Transport, frame: &[u8]) -> Result<(), FrameError> {
        if transport != Transport::Uart {
            return Ok(());
        }
        if frame.len() < 3 {
            return Err(FrameError::TooShort { len: frame.len() });
        }
        let found = [frame[0], frame[1]];
        if found != self.header {
            return Err(FrameError::BadHeader { found });
        }
        let (body, check) = frame.split_at(frame.len() - 1);
        let calculated = sum8(body);
        if calculated != check[0] {
            return Err(FrameError::ChecksumMismatch {
                expected: check[0],
                calculated,
            });
        }
        Ok(())
    }
}

/// CRC-8 over every byte but the last, which carries the CRC.
///
/// Applies to frames from all transports.
pub struct Crc8Check {
    crc: Crc<u8>,
}

impl Crc8Check {
    pub const fn new(algorithm: &'static Algorithm<u8>) -> Self {
        Crc8Check {
            crc: Crc::<u8>::new(algorithm),
        }
    }

    #[inline]
    pub fn checksum(&self, data: &[u8]) -> u8 {
        self.crc.checksum(data)
    }
}

impl FrameValidator for Crc8Check {
    fn validate(&self, _transport: Transport, frame: &[u8]) -> Result<(), FrameError> {
        if frame.len() < 2 {
            return Err(FrameError::TooShort { len: frame.len() });
        }
        let (body, check) = frame.split_at(frame.len() - 1);
        let calculated = self.checksum(body);
        if calculated != check[0] {
            return Err(FrameError::ChecksumMismatch {
                expected: check[0],
                calculated,
            });
        }
        Ok(())
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;
    use heapless::String;

    // 0x59 0x59, distance 1000, signal 100, two reserved bytes, checksum
    const GOOD_FRAME: [u8; 9] = [0x59, 0x59, 0x03, 0xE8, 0x00, 0x64, 0x00, 0x00, 0x01];

    #[test]
    fn test_sum8_wraps() {
        assert_eq!(sum8(&[]), 0);
        assert_eq!(sum8(&[0xFF, 0x02]), 0x01);
        assert_eq!(sum8(&GOOD_FRAME[..8]), 0x01);
    }

    #[test]
    fn test_header_checksum_accepts_good_frame() {
        let v = HeaderChecksum::default();
        assert_eq!(v.validate(Transport::Uart, &GOOD_FRAME), Ok(()));
    }

    #[test]
    fn test_header_checksum_rejects_bad_header() {
        let v = HeaderChecksum::default();
        let mut frame = GOOD_FRAME;
        frame[1] = 0x58;
        assert_eq!(
            v.validate(Transport::Uart, &frame),
            Err(FrameError::BadHeader { found: [0x59, 0x58] })
        );
    }

    #[test]
    fn test_header_checksum_rejects_bad_checksum() {
        let v = HeaderChecksum::default();
        let mut frame = GOOD_FRAME;
        frame[3] = 0xE9;
        assert_eq!(
            v.validate(Transport::Uart, &frame),
            Err(FrameError::ChecksumMismatch { expected: 0x01, calculated: 0x02 })
        );
    }

    #[test]
    fn test_header_checksum_ignores_can() {
        let v = HeaderChecksum::default();
        assert_eq!(v.validate(Transport::Can, &[0x00, 0x0A]), Ok(()));
        assert_eq!(v.validate(Transport::FdCan, &[]), Ok(()));
        assert_eq!(
            v.validate(Transport::Uart, &[0x59, 0x59]),
            Err(FrameError::TooShort { len: 2 })
        );
    }

    #[test]
    fn test_crc8_check() {
        // CRC-8/SMBUS check value for "123456789" is 0xF4
        let v = Crc8Check::new(&crc::CRC_8_SMBUS);
        let mut frame = [0u8; 10];
        frame[..9].copy_from_slice(b"123456789");
        frame[9] = 0xF4;
        assert_eq!(v.validate(Transport::FdCan, &frame), Ok(()));

        frame[9] = 0xF5;
        assert!(matches!(
            v.validate(Transport::Can, &frame),
            Err(FrameError::ChecksumMismatch { expected: 0xF5, calculated: 0xF4 })
        ));
        assert_eq!(v.validate(Transport::Uart, &[0x01]), Err(FrameError::TooShort { len: 1 }));
    }

    #[test]
    fn test_display() {
        let mut s: String<64> = String::new();
        write!(s, "{}", FrameError::ChecksumMismatch { expected: 1, calculated: 2 }).unwrap();
        assert_eq!(s.as_str(), "checksum mismatch: expected 0x01, calculated 0x02");
    }
}
