// src/common/model.rs

use super::types::{Transport, UART_MAX_FRAME_LEN};
use core::fmt;

/// Highest value an 11-bit standard identifier can take.
pub const STANDARD_ID_MAX: u16 = 0x7FF;

/// Wire parameters of one TF-series sensor variant.
///
/// Fields are public so applications can keep their model tables in `static`s.
/// The descriptor is only ever read by the driver.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ModelDescriptor {
    /// Name of the model, for diagnostics only.
    pub name: &'static str,
    pub uart_baud: u32,
    /// Number of bytes per UART frame.
    pub uart_frame_length: u8,
    /// CAN nominal bit rate.
    pub can_baud: u32,
    /// Standard identifier the sensor publishes measurements on.
    pub can_id_rx: u16,
    /// Standard identifier the sensor accepts commands on.
    pub can_id_tx: u16,
    /// Byte offset of the big-endian distance field.
    pub offset_distance: u8,
    /// Byte offset of the big-endian signal strength field.
    pub offset_signal: u8,
    /// Multiplier turning the raw distance into meters.
    pub distance_scale: f32,
    pub signal_scale: f32,
}

impl ModelDescriptor {
    /// Frame length the decoder may rely on for `transport`.
    pub const fn frame_length_for(&self, transport: Transport) -> usize {
        match transport {
            Transport::Uart => self.uart_frame_length as usize,
            Transport::Can | Transport::FdCan => transport.max_frame_len(),
        }
    }

    /// Checks that this descriptor can be used over `transport`.
    ///
    /// A descriptor that is fine for CAN-FD may still place its fields past the
    /// 8 byte classic CAN payload, so the check is per transport.
    pub fn validate_for(&self, transport: Transport) -> Result<(), ModelError> {
        match transport {
            Transport::Uart => {
                if self.uart_baud == 0 {
                    return Err(ModelError::ZeroBaud(transport));
                }
                let len = self.uart_frame_length as usize;
                if len == 0 || len > UART_MAX_FRAME_LEN {
                    return Err(ModelError::FrameLength {
                        length: len,
                        max: UART_MAX_FRAME_LEN,
                    });
                }
            }
            Transport::Can | Transport::FdCan => {
                if self.can_baud == 0 {
                    return Err(ModelError::ZeroBaud(transport));
                }
                for id in [self.can_id_rx, self.can_id_tx] {
                    if id > STANDARD_ID_MAX {
                        return Err(ModelError::IdentifierOutOfRange(id));
                    }
                }
            }
        }

        let frame_len = self.frame_length_for(transport);
        for (field, offset) in [
            (Field::Distance, self.offset_distance),
            (Field::Signal, self.offset_signal),
        ] {
            if offset as usize + 1 >= frame_len {
                return Err(ModelError::OffsetOutOfFrame {
                    field,
                    offset,
                    frame_len,
                });
            }
        }

        if !self.distance_scale.is_finite() || !self.signal_scale.is_finite() {
            return Err(ModelError::NonFiniteScale);
        }

        Ok(())
    }
}

/// Which of the two decoded fields an error refers to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    Distance,
    Signal,
}

/// Reasons a [`ModelDescriptor`] is rejected for a transport.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModelError {
    /// A two-byte field would run past the end of the frame.
    OffsetOutOfFrame {
        field: Field,
        offset: u8,
        frame_len: usize,
    },
    /// UART frame length is zero or larger than the UART maximum.
    FrameLength { length: usize, max: usize },
    /// Identifier does not fit in 11 bits.
    IdentifierOutOfRange(u16),
    /// Baud rate for the transport is zero.
    ZeroBaud(Transport),
    NonFiniteScale,
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ModelError::*;
        match self {
            OffsetOutOfFrame { field, offset, frame_len } => write!(
                f,
                "{:?} field at offset {} does not fit a {} byte frame",
                field, offset, frame_len
            ),
            FrameLength { length, max } => {
                write!(f, "UART frame length {} outside 1..={}", length, max)
            }
            IdentifierOutOfRange(id) => write!(f, "CAN identifier {:#x} exceeds 11 bits", id),
            ZeroBaud(transport) => write!(f, "{} baud rate is zero", transport),
            NonFiniteScale => write!(f, "Scale factor is not finite"),
        }
    }
}

impl core::error::Error for ModelError {}
