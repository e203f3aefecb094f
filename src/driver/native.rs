// src/driver/native.rs

use crate::common::{
    frame::SerialConfig,
    hal_traits::{LidarSerial, LidarTimer, NativeSerialConfig},
};
use core::time::Duration;
use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady};

/// [`LidarSerial`] over an `embedded-io` UART and an `embedded-hal` delay.
///
/// There is no clock in either trait, so time is counted from the delays the
/// adapter issues itself. Time spent inside `read` is not accounted for, which
/// makes receive timeouts a little longer than configured, never shorter.
pub struct NativeUart<U, D> {
    uart: U,
    delay: D,
    elapsed: Duration,
}

impl<U, D> NativeUart<U, D>
where
    U: NativeSerialConfig,
    D: DelayNs,
{
    pub fn new(uart: U, delay: D) -> Self {
        NativeUart {
            uart,
            delay,
            elapsed: Duration::ZERO,
        }
    }

    pub fn inner(&mut self) -> &mut U {
        &mut self.uart
    }

    pub fn into_parts(self) -> (U, D) {
        (self.uart, self.delay)
    }
}

impl<U, D> LidarTimer for NativeUart<U, D>
where
    U: NativeSerialConfig,
    D: DelayNs,
{
    type Instant = Duration;

    fn now(&self) -> Duration {
        self.elapsed
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
        self.elapsed += Duration::from_micros(us as u64);
    }
}

impl<U, D> LidarSerial for NativeUart<U, D>
where
    U: NativeSerialConfig,
    D: DelayNs,
{
    type Error = U::Error;

    fn configure(&mut self, config: &SerialConfig) -> Result<(), Self::Error> {
        self.uart.native_configure(config)
    }

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        if !self.uart.read_ready().map_err(nb::Error::Other)? {
            return Err(nb::Error::WouldBlock);
        }
        let mut byte = [0u8; 1];
        match self.uart.read(&mut byte) {
            Ok(0) => Err(nb::Error::WouldBlock),
            Ok(_) => Ok(byte[0]),
            Err(e) => Err(nb::Error::Other(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::TfLidarError;
    use crate::common::frame::RawFrame;
    use crate::common::model::tests::TEST_MODEL;
    use crate::driver::uart;
    use embedded_io::{ErrorKind, ErrorType, Read, ReadReady};

    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    struct MockUartError;

    impl embedded_io::Error for MockUartError {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    struct MockUart {
        data: &'static [u8],
        pos: usize,
        baud: Option<u32>,
    }

    impl ErrorType for MockUart {
        type Error = MockUartError;
    }

    impl Read for MockUart {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, MockUartError> {
            let n = buf.len().min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    impl ReadReady for MockUart {
        fn read_ready(&mut self) -> Result<bool, MockUartError> {
            Ok(self.pos < self.data.len())
        }
    }

    impl NativeSerialConfig for MockUart {
        fn native_configure(&mut self, config: &SerialConfig) -> Result<(), MockUartError> {
            self.baud = Some(config.baud);
            Ok(())
        }
    }

    struct MockDelay {
        total_ns: u64,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += ns as u64;
        }
    }

    fn adapter(data: &'static [u8]) -> NativeUart<MockUart, MockDelay> {
        NativeUart::new(
            MockUart { data, pos: 0, baud: None },
            MockDelay { total_ns: 0 },
        )
    }

    #[test]
    fn test_configure_and_receive() {
        let mut serial = adapter(&[0x59, 0x59, 0x03, 0xE8, 0x00, 0x64, 0x00, 0x00, 0x01]);
        uart::init(&mut serial, &TEST_MODEL).unwrap();
        assert_eq!(serial.inner().baud, Some(115_200));

        let mut rx = RawFrame::new();
        uart::receive_frame(&mut serial, &TEST_MODEL, Duration::from_millis(100), 100, &mut rx)
            .unwrap();
        assert_eq!(rx.len(), 9);
        assert_eq!(serial.now(), Duration::ZERO);
    }

    #[test]
    fn test_timeout_counts_delays() {
        let mut serial = adapter(&[0x59, 0x59]);
        let mut rx = RawFrame::new();
        let result =
            uart::receive_frame(&mut serial, &TEST_MODEL, Duration::from_millis(5), 100, &mut rx);
        assert!(matches!(result, Err(TfLidarError::Timeout)));
        assert_eq!(serial.now(), Duration::from_millis(5));
        let (_, delay) = serial.into_parts();
        assert_eq!(delay.total_ns, 5_000_000);
    }
}
