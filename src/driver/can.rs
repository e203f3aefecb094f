// src/driver/can.rs

use crate::common::{
    error::TfLidarError,
    frame::{CanFilter, RawFrame, RxFifo},
    hal_traits::LidarCan,
    model::ModelDescriptor,
    types::CAN_MAX_FRAME_LEN,
};
use embedded_can::{Frame, Id};

/// Queue the sensor's frames are routed into and read from.
pub const RX_FIFO: RxFifo = RxFifo::Fifo0;

/// Raw value of a CAN identifier, standard or extended.
#[inline]
pub(crate) fn raw_id(id: Id) -> u32 {
    match id {
        Id::Standard(sid) => u32::from(sid.as_raw()),
        Id::Extended(eid) => eid.as_raw(),
    }
}

/// Configures the controller, installs an exact-match filter for `acceptance_id`,
/// starts it and enables the receive-pending notification.
pub fn init<C: LidarCan>(can: &mut C, acceptance_id: u16) -> Result<(), TfLidarError<C::Error>> {
    can.configure().map_err(|e| {
        warn!("can: controller configuration failed");
        TfLidarError::PeripheralConfig(e)
    })?;

    let filter = CanFilter::exact_standard(acceptance_id, RX_FIFO);
    can.install_filter(&filter).map_err(|e| {
        warn!("can: filter for id {} rejected", acceptance_id);
        TfLidarError::FilterConfig(e)
    })?;
    debug!(
        "can: filter bank {} id {} mask {}",
        filter.bank,
        filter.id_high_register(),
        filter.mask_high_register()
    );

    can.start().map_err(TfLidarError::PeripheralConfig)?;
    can.enable_rx_notification(RX_FIFO)
        .map_err(TfLidarError::PeripheralConfig)?;
    Ok(())
}

/// Takes one frame off the receive queue and copies its payload into `rx`.
///
/// Frames from any identifier other than `can_id_rx` are dropped with
/// `IdentifierMismatch`; the caller polls again.
pub fn receive_frame<C: LidarCan>(
    can: &mut C,
    model: &ModelDescriptor,
    rx: &mut RawFrame,
) -> Result<(), TfLidarError<C::Error>> {
    let frame = match can.pending_frame(RX_FIFO) {
        Ok(frame) => frame,
        Err(nb::Error::WouldBlock) => return Err(TfLidarError::NoFrame),
        Err(nb::Error::Other(e)) => return Err(TfLidarError::Receive(e)),
    };

    let id = frame.id();
    let is_expected = matches!(id, Id::Standard(sid) if sid.as_raw() == model.can_id_rx);
    if !is_expected {
        let received = raw_id(id);
        trace!("can: dropped frame from id {}", received);
        return Err(TfLidarError::IdentifierMismatch {
            expected: model.can_id_rx,
            received,
        });
    }

    let data = frame.data();
    let len = data.len().min(CAN_MAX_FRAME_LEN);
    rx.clear();
    // capacity is 64, len is at most 8
    rx.try_extend_from_slice(&data[..len]).map_err(|_| TfLidarError::ShortFrame {
        needed: len,
        got: rx.capacity(),
    })?;
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::common::model::tests::TEST_MODEL;
    use embedded_can::{ExtendedId, StandardId};

    /// Minimal frame type for mocks, up to 64 data bytes.
    #[derive(Debug, Clone, PartialEq)]
    pub(crate) struct MockFrame {
        id: Id,
        data: [u8; 64],
        len: usize,
    }

    impl Frame for MockFrame {
        fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
            if data.len() > 64 {
                return None;
            }
            let mut buf = [0u8; 64];
            buf[..data.len()].copy_from_slice(data);
            Some(MockFrame {
                id: id.into(),
                data: buf,
                len: data.len(),
            })
        }

        fn new_remote(_id: impl Into<Id>, _dlc: usize) -> Option<Self> {
            None
        }

        fn is_extended(&self) -> bool {
            matches!(self.id, Id::Extended(_))
        }

        fn is_remote_frame(&self) -> bool {
            false
        }

        fn id(&self) -> Id {
            self.id
        }

        fn dlc(&self) -> usize {
            self.len
        }

        fn data(&self) -> &[u8] {
            &self.data[..self.len]
        }
    }

    pub(crate) fn std_frame(id: u16, data: &[u8]) -> MockFrame {
        MockFrame::new(StandardId::new(id).unwrap(), data).unwrap()
    }

    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub(crate) enum MockCanError {
        Config,
        Filter,
        Bus,
    }

    /// CAN controller with a software receive queue and a call log.
    pub(crate) struct MockCan {
        pub configured: bool,
        pub started: bool,
        pub notification: Option<RxFifo>,
        pub filter: Option<CanFilter>,
        pub fail: Option<MockCanError>,
        pub queue: [Option<MockFrame>; 4],
        pub pending_calls: u32,
    }

    impl MockCan {
        pub fn new() -> Self {
            MockCan {
                configured: false,
                started: false,
                notification: None,
                filter: None,
                fail: None,
                queue: [None, None, None, None],
                pending_calls: 0,
            }
        }

        pub fn push(&mut self, frame: MockFrame) {
            let slot = self.queue.iter_mut().find(|f| f.is_none()).unwrap();
            *slot = Some(frame);
        }
    }

    impl LidarCan for MockCan {
        type Error = MockCanError;
        type Frame = MockFrame;

        fn configure(&mut self) -> Result<(), MockCanError> {
            if self.fail == Some(MockCanError::Config) {
                return Err(MockCanError::Config);
            }
            self.configured = true;
            Ok(())
        }

        fn install_filter(&mut self, filter: &CanFilter) -> Result<(), MockCanError> {
            if self.fail == Some(MockCanError::Filter) {
                return Err(MockCanError::Filter);
            }
            self.filter = Some(*filter);
            Ok(())
        }

        fn start(&mut self) -> Result<(), MockCanError> {
            self.started = true;
            Ok(())
        }

        fn enable_rx_notification(&mut self, fifo: RxFifo) -> Result<(), MockCanError> {
            self.notification = Some(fifo);
            Ok(())
        }

        fn pending_frame(&mut self, _fifo: RxFifo) -> nb::Result<MockFrame, MockCanError> {
            self.pending_calls += 1;
            if self.fail == Some(MockCanError::Bus) {
                return Err(nb::Error::Other(MockCanError::Bus));
            }
            match self.queue[0].take() {
                Some(frame) => {
                    self.queue.rotate_left(1);
                    Ok(frame)
                }
                None => Err(nb::Error::WouldBlock),
            }
        }
    }

    #[test]
    fn test_init_sequence() {
        let mut can = MockCan::new();
        assert!(init(&mut can, TEST_MODEL.can_id_tx).is_ok());
        assert!(can.configured);
        assert!(can.started);
        assert_eq!(can.notification, Some(RxFifo::Fifo0));
        let filter = can.filter.unwrap();
        assert_eq!(filter.id, 0x004);
        assert_eq!(filter.mask_high_register(), 0xFFE0);
    }

    #[test]
    fn test_init_config_failure_stops_early() {
        let mut can = MockCan::new();
        can.fail = Some(MockCanError::Config);
        let result = init(&mut can, 0x004);
        assert!(matches!(result, Err(TfLidarError::PeripheralConfig(MockCanError::Config))));
        assert!(can.filter.is_none());
        assert!(!can.started);
    }

    #[test]
    fn test_init_filter_failure() {
        let mut can = MockCan::new();
        can.fail = Some(MockCanError::Filter);
        let result = init(&mut can, 0x004);
        assert!(matches!(result, Err(TfLidarError::FilterConfig(MockCanError::Filter))));
        assert!(can.configured);
        assert!(!can.started);
    }

    #[test]
    fn test_receive_matching_frame() {
        let mut can = MockCan::new();
        can.push(std_frame(0x003, &[0x00, 0x00, 0x00, 0x0A, 0x00, 0x20]));
        let mut rx = RawFrame::new();
        assert!(receive_frame(&mut can, &TEST_MODEL, &mut rx).is_ok());
        assert_eq!(rx.as_slice(), &[0x00, 0x00, 0x00, 0x0A, 0x00, 0x20]);
    }

    #[test]
    fn test_receive_mismatched_standard_id() {
        let mut can = MockCan::new();
        can.push(std_frame(0x004, &[0; 8]));
        can.push(std_frame(0x003, &[0; 8]));
        let mut rx = RawFrame::new();
        let result = receive_frame(&mut can, &TEST_MODEL, &mut rx);
        assert!(matches!(
            result,
            Err(TfLidarError::IdentifierMismatch { expected: 0x003, received: 0x004 })
        ));
        // no retry inside the call: the good frame is still queued
        assert_eq!(can.pending_calls, 1);
        assert!(can.queue[0].is_some());
    }

    #[test]
    fn test_receive_extended_id_with_same_value_is_rejected() {
        let mut can = MockCan::new();
        let frame = MockFrame::new(ExtendedId::new(0x003).unwrap(), &[0; 8]).unwrap();
        can.push(frame);
        let mut rx = RawFrame::new();
        let result = receive_frame(&mut can, &TEST_MODEL, &mut rx);
        assert!(matches!(result, Err(TfLidarError::IdentifierMismatch { received: 0x003, .. })));
    }

    #[test]
    fn test_receive_empty_queue_and_bus_error() {
        let mut can = MockCan::new();
        let mut rx = RawFrame::new();
        assert!(matches!(
            receive_frame(&mut can, &TEST_MODEL, &mut rx),
            Err(TfLidarError::NoFrame)
        ));
        can.fail = Some(MockCanError::Bus);
        assert!(matches!(
            receive_frame(&mut can, &TEST_MODEL, &mut rx),
            Err(TfLidarError::Receive(MockCanError::Bus))
        ));
    }
}
