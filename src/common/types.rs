// src/common/types.rs

use core::fmt;

/// Largest UART frame any supported model emits.
pub const UART_MAX_FRAME_LEN: usize = 32;
/// Classic CAN data field.
pub const CAN_MAX_FRAME_LEN: usize = 8;
/// CAN-FD data field.
pub const FDCAN_MAX_FRAME_LEN: usize = 64;
/// Size of the scratch buffer shared by all transports.
pub const MAX_FRAME_LEN: usize = FDCAN_MAX_FRAME_LEN;

/// The physical link a sensor handle is talking over.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transport {
    /// Asynchronous serial, 8N1, receive only.
    Uart,
    /// Classic CAN, up to 8 data bytes per frame.
    Can,
    /// CAN-FD, up to 64 data bytes per frame.
    FdCan,
}

impl Transport {
    /// Upper bound on the frame size this transport can deliver.
    ///
    /// For UART the model's own frame length applies on top of this bound.
    #[inline]
    pub const fn max_frame_len(self) -> usize {
        match self {
            Transport::Uart => UART_MAX_FRAME_LEN,
            Transport::Can => CAN_MAX_FRAME_LEN,
            Transport::FdCan => FDCAN_MAX_FRAME_LEN,
        }
    }

    #[inline]
    pub const fn is_can_family(self) -> bool {
        matches!(self, Transport::Can | Transport::FdCan)
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Uart => write!(f, "UART"),
            Transport::Can => write!(f, "CAN"),
            Transport::FdCan => write!(f, "CAN-FD"),
        }
    }
}
