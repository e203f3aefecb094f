// src/common/timing.rs

use core::time::Duration;

/// Upper bound for receiving one complete UART frame.
pub const UART_RECEIVE_TIMEOUT: Duration = Duration::from_millis(100);

/// Back-off between two serial polls that returned `WouldBlock`.
pub const SERIAL_POLL_INTERVAL_US: u32 = 100;

/// Bits on the wire per 8N1 character (start + 8 data + stop).
pub const BITS_PER_8N1_CHAR: u32 = 10;

/// Nominal time to clock `len` 8N1 characters at `baud`.
///
/// Returns `Duration::ZERO` for a zero baud rate rather than dividing by zero.
pub const fn uart_airtime(baud: u32, len: usize) -> Duration {
    if baud == 0 {
        return Duration::ZERO;
    }
    let bits = BITS_PER_8N1_CHAR as u64 * len as u64;
    Duration::from_micros(bits * 1_000_000 / baud as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uart_airtime() {
        // 9 bytes at 115200 is 90 bits, ~781 us
        assert_eq!(uart_airtime(115_200, 9), Duration::from_micros(781));
        assert!(uart_airtime(115_200, 9) < UART_RECEIVE_TIMEOUT);
        assert_eq!(uart_airtime(0, 9), Duration::ZERO);
    }
}
