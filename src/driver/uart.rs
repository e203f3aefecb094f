// src/driver/uart.rs

use crate::common::{
    error::TfLidarError,
    frame::{RawFrame, SerialConfig},
    hal_traits::LidarSerial,
    model::ModelDescriptor,
    timing,
};
use core::time::Duration;

/// Configures `serial` for the model: model baud, 8N1, receiver only.
pub fn init<S: LidarSerial>(serial: &mut S, model: &ModelDescriptor) -> Result<(), TfLidarError<S::Error>> {
    let config = SerialConfig::receive_8n1(model.uart_baud);

    let airtime = timing::uart_airtime(model.uart_baud, model.uart_frame_length as usize);
    debug!(
        "uart: {} baud, {} byte frames, {} us on the wire",
        model.uart_baud,
        model.uart_frame_length,
        airtime.as_micros() as u32
    );

    serial.configure(&config).map_err(|e| {
        warn!("uart: peripheral configuration failed");
        TfLidarError::PeripheralConfig(e)
    })
}

/// Receives exactly `uart_frame_length` bytes into `rx` within `timeout`.
///
/// On error `rx` holds whatever arrived before the failure.
pub fn receive_frame<S: LidarSerial>(
    serial: &mut S,
    model: &ModelDescriptor,
    timeout: Duration,
    poll_interval_us: u32,
    rx: &mut RawFrame,
) -> Result<(), TfLidarError<S::Error>> {
    let frame_len = model.uart_frame_length as usize;
    rx.clear();
    if frame_len > rx.capacity() {
        return Err(TfLidarError::ShortFrame {
            needed: frame_len,
            got: rx.capacity(),
        });
    }

    let deadline = serial.now() + timeout;
    while rx.len() < frame_len {
        match serial.read_byte() {
            Ok(byte) => rx.push(byte),
            Err(nb::Error::WouldBlock) => {
                if serial.now() >= deadline {
                    trace!("uart: timeout after {} of {} bytes", rx.len(), frame_len);
                    return Err(TfLidarError::Timeout);
                }
                serial.delay_us(poll_interval_us);
            }
            Err(nb::Error::Other(e)) => return Err(TfLidarError::Receive(e)),
        }
    }
    Ok(())
}
