// src/driver/config.rs

use crate::common::crc::FrameValidator;
use crate::common::timing;
use core::fmt;
use core::time::Duration;

/// What happens to the handle when a transport fails to initialize.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BindPolicy {
    /// The new binding is committed before the peripheral is configured, so a
    /// failed init still leaves the handle bound to the new transport.
    #[default]
    Eager,
    /// The new binding is committed only once configuration succeeded.
    /// On failure the previous binding stays active.
    OnSuccess,
}

/// Identifier programmed into the CAN and CAN-FD acceptance filters.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AcceptanceId {
    /// `can_id_tx`, the sensor's command identifier. Existing firmware filters on this.
    #[default]
    CommandId,
    /// `can_id_rx`, the identifier measurements arrive on.
    DataId,
}

/// Tunables for a [`TfLidar`](super::TfLidar) handle.
#[derive(Clone, Copy)]
pub struct DriverConfig<'a> {
    pub uart_timeout: Duration,
    pub poll_interval_us: u32,
    pub bind_policy: BindPolicy,
    pub acceptance_id: AcceptanceId,
    pub validator: Option<&'a dyn FrameValidator>,
}

impl<'a> DriverConfig<'a> {
    pub const fn new() -> Self {
        DriverConfig {
            uart_timeout: timing::UART_RECEIVE_TIMEOUT,
            poll_interval_us: timing::SERIAL_POLL_INTERVAL_US,
            bind_policy: BindPolicy::Eager,
            acceptance_id: AcceptanceId::CommandId,
            validator: None,
        }
    }

    pub const fn uart_timeout(mut self, timeout: Duration) -> Self {
        self.uart_timeout = timeout;
        self
    }

    pub const fn poll_interval_us(mut self, us: u32) -> Self {
        self.poll_interval_us = us;
        self
    }

    pub const fn bind_policy(mut self, policy: BindPolicy) -> Self {
        self.bind_policy = policy;
        self
    }

    pub const fn acceptance_id(mut self, id: AcceptanceId) -> Self {
        self.acceptance_id = id;
        self
    }

    /// Runs `validator` on every received frame before decoding it.
    pub const fn validator(mut self, validator: &'a dyn FrameValidator) -> Self {
        self.validator = Some(validator);
        self
    }
}

impl Default for DriverConfig<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DriverConfig<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverConfig")
            .field("uart_timeout", &self.uart_timeout)
            .field("poll_interval_us", &self.poll_interval_us)
            .field("bind_policy", &self.bind_policy)
            .field("acceptance_id", &self.acceptance_id)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}
