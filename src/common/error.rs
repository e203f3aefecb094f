// src/common/error.rs

use super::crc::FrameError;
use super::model::ModelError;

#[derive(Debug, thiserror::Error)]
pub enum TfLidarError<E = ()>
where
    E: core::fmt::Debug, // Debug for the generic peripheral error
{
    /// Peripheral rejected its configuration, or failed to start.
    #[error("Peripheral configuration failed: {0:?}")]
    PeripheralConfig(E),

    /// Acceptance filter could not be installed.
    #[error("Filter configuration failed: {0:?}")]
    FilterConfig(E),

    /// No complete UART frame within the receive timeout.
    #[error("Receive timed out")]
    Timeout,

    /// CAN receive queue is empty. Poll again later.
    #[error("No frame pending")]
    NoFrame,

    /// Peripheral reported an error while receiving.
    #[error("Receive error: {0:?}")]
    Receive(E),

    /// Classic CAN frame from an unexpected identifier. The frame is dropped.
    #[error("Identifier mismatch: expected {expected:#05x}, received {received:#x}")]
    IdentifierMismatch { expected: u16, received: u32 },

    /// `read` or `switch_to_*` on a handle that was never bound.
    #[error("Sensor handle is not bound to a transport")]
    Unbound,

    /// Model descriptor does not fit the requested transport.
    #[error("Invalid model descriptor: {0}")]
    InvalidModel(#[from] ModelError),

    /// Received payload is too short to hold both fields.
    #[error("Frame too short: needed {needed}, got {got}")]
    ShortFrame { needed: usize, got: usize },

    /// Configured frame validator rejected the frame.
    #[error("Invalid frame: {0}")]
    InvalidFrame(#[from] FrameError),
}

impl<E: core::fmt::Debug> TfLidarError<E> {
    /// Converts the peripheral error, keeping every other variant as is.
    pub fn map_io<E2, F>(self, f: F) -> TfLidarError<E2>
    where
        E2: core::fmt::Debug,
        F: FnOnce(E) -> E2,
    {
        use TfLidarError::*;
        match self {
            PeripheralConfig(e) => PeripheralConfig(f(e)),
            FilterConfig(e) => FilterConfig(f(e)),
            Receive(e) => Receive(f(e)),
            Timeout => Timeout,
            NoFrame => NoFrame,
            IdentifierMismatch { expected, received } => IdentifierMismatch { expected, received },
            Unbound => Unbound,
            InvalidModel(m) => InvalidModel(m),
            ShortFrame { needed, got } => ShortFrame { needed, got },
            InvalidFrame(v) => InvalidFrame(v),
        }
    }

    /// True for failures of a `read` that leave the handle ready for the next poll.
    pub fn is_receive_failure(&self) -> bool {
        matches!(
            self,
            TfLidarError::Timeout
                | TfLidarError::NoFrame
                | TfLidarError::Receive(_)
                | TfLidarError::IdentifierMismatch { .. }
                | TfLidarError::ShortFrame { .. }
                | TfLidarError::InvalidFrame(_)
        )
    }

    /// True for failures raised while binding a transport.
    pub fn is_config_failure(&self) -> bool {
        matches!(
            self,
            TfLidarError::PeripheralConfig(_)
                | TfLidarError::FilterConfig(_)
                | TfLidarError::InvalidModel(_)
        )
    }
}

/// Which bus a peripheral error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BusError<SE, CE, FE>
where
    SE: core::fmt::Debug,
    CE: core::fmt::Debug,
    FE: core::fmt::Debug,
{
    #[error("serial: {0:?}")]
    Serial(SE),
    #[error("CAN: {0:?}")]
    Can(CE),
    #[error("CAN-FD: {0:?}")]
    FdCan(FE),
}
