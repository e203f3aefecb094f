// src/common/hal_traits.rs

use super::frame::{CanFilter, FdCanFilter, RxFifo, SerialConfig};
use core::convert::Infallible;
use core::fmt::Debug;
use core::ops::{Add, Sub};
use core::time::Duration;
use embedded_can::{Frame, Id};

/// Point in time as seen by a [`LidarTimer`].
pub trait LidarInstant:
    Copy + PartialOrd + Add<Duration, Output = Self> + Sub<Self, Output = Duration>
{
}

impl<T> LidarInstant for T where
    T: Copy + PartialOrd + Add<Duration, Output = T> + Sub<T, Output = Duration>
{
}

/// Clock and delay source used to bound blocking serial receives.
pub trait LidarTimer {
    type Instant: LidarInstant;

    fn now(&self) -> Self::Instant;

    /// Delay for at least the specified number of microseconds.
    fn delay_us(&mut self, us: u32);
}

/// Serial connection a sensor is wired to.
pub trait LidarSerial: LidarTimer {
    /// Associated error type for peripheral errors.
    type Error: Debug;

    /// Applies line settings to the peripheral.
    fn configure(&mut self, config: &SerialConfig) -> Result<(), Self::Error>;

    /// Attempts to read a single byte.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` if no byte is available yet.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;
}

/// Classic CAN controller connection.
pub trait LidarCan {
    type Error: Debug;
    /// Received frame type; payload is at most 8 bytes.
    type Frame: Frame;

    /// Initializes the controller. Bit timing is the controller's business.
    fn configure(&mut self) -> Result<(), Self::Error>;

    fn install_filter(&mut self, filter: &CanFilter) -> Result<(), Self::Error>;

    fn start(&mut self) -> Result<(), Self::Error>;

    /// Enables the "message pending" interrupt for `fifo`.
    fn enable_rx_notification(&mut self, fifo: RxFifo) -> Result<(), Self::Error>;

    /// Pops the oldest frame from `fifo`, or `WouldBlock` if it is empty.
    fn pending_frame(&mut self, fifo: RxFifo) -> nb::Result<Self::Frame, Self::Error>;
}

/// CAN-FD controller connection.
pub trait LidarFdCan {
    type Error: Debug;
    /// Received frame type; payload is at most 64 bytes.
    type Frame: Frame;

    fn configure(&mut self) -> Result<(), Self::Error>;

    fn install_filter(&mut self, filter: &FdCanFilter) -> Result<(), Self::Error>;

    fn start(&mut self) -> Result<(), Self::Error>;

    /// Enables the "new message" interrupt for `fifo`.
    fn enable_rx_notification(&mut self, fifo: RxFifo) -> Result<(), Self::Error>;

    fn pending_frame(&mut self, fifo: RxFifo) -> nb::Result<Self::Frame, Self::Error>;
}

/// Stand-in for a transport an application never wires up.
///
/// It has no values, so a handle can never be bound to it.
#[derive(Debug)]
pub enum NoTransport {}

/// Frame type of [`NoTransport`]. Cannot be constructed.
#[derive(Debug)]
pub enum NoFrame {}

impl Frame for NoFrame {
    fn new(_id: impl Into<Id>, _data: &[u8]) -> Option<Self> {
        None
    }

    fn new_remote(_id: impl Into<Id>, _dlc: usize) -> Option<Self> {
        None
    }

    fn is_extended(&self) -> bool {
        match *self {}
    }

    fn is_remote_frame(&self) -> bool {
        match *self {}
    }

    fn id(&self) -> Id {
        match *self {}
    }

    fn dlc(&self) -> usize {
        match *self {}
    }

    fn data(&self) -> &[u8] {
        match *self {}
    }
}

impl LidarTimer for NoTransport {
    type Instant = Duration;

    fn now(&self) -> Duration {
        match *self {}
    }

    fn delay_us(&mut self, _us: u32) {
        match *self {}
    }
}

impl LidarSerial for NoTransport {
    type Error = Infallible;

    fn configure(&mut self, _config: &SerialConfig) -> Result<(), Infallible> {
        match *self {}
    }

    fn read_byte(&mut self) -> nb::Result<u8, Infallible> {
        match *self {}
    }
}

impl LidarCan for NoTransport {
    type Error = Infallible;
    type Frame = NoFrame;

    fn configure(&mut self) -> Result<(), Infallible> {
        match *self {}
    }

    fn install_filter(&mut self, _filter: &CanFilter) -> Result<(), Infallible> {
        match *self {}
    }

    fn start(&mut self) -> Result<(), Infallible> {
        match *self {}
    }

    fn enable_rx_notification(&mut self, _fifo: RxFifo) -> Result<(), Infallible> {
        match *self {}
    }

    fn pending_frame(&mut self, _fifo: RxFifo) -> nb::Result<NoFrame, Infallible> {
        match *self {}
    }
}

impl LidarFdCan for NoTransport {
    type Error = Infallible;
    type Frame = NoFrame;

    fn configure(&mut self) -> Result<(), Infallible> {
        match *self {}
    }

    fn install_filter(&mut self, _filter: &FdCanFilter) -> Result<(), Infallible> {
        match *self {}
    }

    fn start(&mut self) -> Result<(), Infallible> {
        match *self {}
    }

    fn enable_rx_notification(&mut self, _fifo: RxFifo) -> Result<(), Infallible> {
        match *self {}
    }

    fn pending_frame(&mut self, _fifo: RxFifo) -> nb::Result<NoFrame, Infallible> {
        match *self {}
    }
}

/// Bundles an `embedded-io` UART with the ability to change line settings.
///
/// Implement this for a HAL's UART peripheral, then wrap it in
/// [`NativeUart`](crate::driver::native::NativeUart) to get a [`LidarSerial`].
#[cfg(feature = "impl-native")]
pub trait NativeSerialConfig: embedded_io::Read + embedded_io::ReadReady {
    /// Changes the serial configuration using native hardware capabilities.
    fn native_configure(&mut self, config: &SerialConfig) -> Result<(), Self::Error>;
}
