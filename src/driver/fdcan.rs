// src/driver/fdcan.rs

use crate::common::{
    error::TfLidarError,
    frame::{FdCanFilter, RawFrame, RxFifo},
    hal_traits::LidarFdCan,
    types::FDCAN_MAX_FRAME_LEN,
};
use embedded_can::Frame;

pub const RX_FIFO: RxFifo = RxFifo::Fifo0;

/// Configures the controller, installs a standard-id mask filter for
/// `acceptance_id` routed to FIFO0, starts it and enables the new-message
/// notification.
pub fn init<F: LidarFdCan>(fdcan: &mut F, acceptance_id: u16) -> Result<(), TfLidarError<F::Error>> {
    fdcan.configure().map_err(|e| {
        warn!("fdcan: controller configuration failed");
        TfLidarError::PeripheralConfig(e)
    })?;

    let filter = FdCanFilter::exact_standard(acceptance_id, RX_FIFO);
    fdcan.install_filter(&filter).map_err(|e| {
        warn!("fdcan: filter for id {} rejected", acceptance_id);
        TfLidarError::FilterConfig(e)
    })?;

    fdcan.start().map_err(TfLidarError::PeripheralConfig)?;
    fdcan
        .enable_rx_notification(RX_FIFO)
        .map_err(TfLidarError::PeripheralConfig)?;
    Ok(())
}

/// Takes one frame off the receive queue and copies its payload into `rx`.
///
/// The hardware filter already restricts the identifier, so it is not checked here.
pub fn receive_frame<F: LidarFdCan>(fdcan: &mut F, rx: &mut RawFrame) -> Result<(), TfLidarError<F::Error>> {
    let frame = match fdcan.pending_frame(RX_FIFO) {
        Ok(frame) => frame,
        Err(nb::Error::WouldBlock) => return Err(TfLidarError::NoFrame),
        Err(nb::Error::Other(e)) => return Err(TfLidarError::Receive(e)),
    };

    let data = frame.data();
    let len = data.len().min(FDCAN_MAX_FRAME_LEN);
    rx.clear();
    rx.try_extend_from_slice(&data[..len])
        .map_err(|_| TfLidarError::ShortFrame {
            needed: len,
            got: rx.capacity(),
        })?;
    Ok(())
}
