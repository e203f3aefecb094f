// src/driver/mod.rs

pub mod can;
pub mod config;
pub mod fdcan;
#[cfg(feature = "impl-native")]
pub mod native;
pub mod uart;

pub use config::{AcceptanceId, BindPolicy, DriverConfig};

use crate::common::{
    decode::{decode_reading, Reading},
    error::{BusError, TfLidarError},
    frame::RawFrame,
    hal_traits::{LidarCan, LidarFdCan, LidarSerial, NoTransport},
    model::ModelDescriptor,
    types::Transport,
};
use core::mem;

/// Error returned by [`TfLidar`] operations, tagged with the bus that failed.
pub type HandleError<S, C, F> = TfLidarError<
    BusError<<S as LidarSerial>::Error, <C as LidarCan>::Error, <F as LidarFdCan>::Error>,
>;

/// The transport a handle is bound to, together with its borrowed connection.
#[derive(Debug)]
pub enum Binding<'a, S, C, F> {
    Unbound,
    Uart(&'a mut S),
    Can(&'a mut C),
    FdCan(&'a mut F),
}

impl<S, C, F> Binding<'_, S, C, F> {
    pub fn transport(&self) -> Option<Transport> {
        match self {
            Binding::Unbound => None,
            Binding::Uart(_) => Some(Transport::Uart),
            Binding::Can(_) => Some(Transport::Can),
            Binding::FdCan(_) => Some(Transport::FdCan),
        }
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        !matches!(self, Binding::Unbound)
    }
}

impl<S, C, F> Default for Binding<'_, S, C, F> {
    fn default() -> Self {
        Binding::Unbound
    }
}

/// Handle for one TF-series sensor.
///
/// A handle is bound to at most one transport at a time. Connections are
/// borrowed for `'a`; the handle never owns, closes or resets them. Transports
/// an application does not use can be left as [`NoTransport`].
///
/// ```ignore
/// let mut lidar: TfLidar<'_, MyUart> = TfLidar::new();
/// lidar.init_uart(&TF_LUNA, &mut uart)?;
/// let reading = lidar.read()?;
/// ```
#[derive(Debug)]
pub struct TfLidar<'a, S = NoTransport, C = NoTransport, F = NoTransport>
where
    S: LidarSerial,
    C: LidarCan,
    F: LidarFdCan,
{
    model: Option<&'a ModelDescriptor>,
    binding: Binding<'a, S, C, F>,
    config: DriverConfig<'a>,
    rx: RawFrame,
}

impl<'a, S, C, F> TfLidar<'a, S, C, F>
where
    S: LidarSerial,
    C: LidarCan,
    F: LidarFdCan,
{
    pub fn new() -> Self {
        Self::with_config(DriverConfig::new())
    }

    pub fn with_config(config: DriverConfig<'a>) -> Self {
        TfLidar {
            model: None,
            binding: Binding::Unbound,
            config,
            rx: RawFrame::new(),
        }
    }

    // --- Binding ---

    /// Binds the handle to a serial connection and configures it for `model`.
    pub fn init_uart(
        &mut self,
        model: &'a ModelDescriptor,
        serial: &'a mut S,
    ) -> Result<(), HandleError<S, C, F>> {
        self.bind(model, Binding::Uart(serial))
    }

    /// Binds the handle to a classic CAN controller and configures it for `model`.
    pub fn init_can(
        &mut self,
        model: &'a ModelDescriptor,
        can: &'a mut C,
    ) -> Result<(), HandleError<S, C, F>> {
        self.bind(model, Binding::Can(can))
    }

    /// Binds the handle to a CAN-FD controller and configures it for `model`.
    pub fn init_fdcan(
        &mut self,
        model: &'a ModelDescriptor,
        fdcan: &'a mut F,
    ) -> Result<(), HandleError<S, C, F>> {
        self.bind(model, Binding::FdCan(fdcan))
    }

    /// Re-binds to `serial` using the current model. A full re-initialization.
    ///
    /// Nothing is done to the previous connection; the caller must make sure
    /// it no longer drives the sensor.
    pub fn switch_to_uart(&mut self, serial: &'a mut S) -> Result<(), HandleError<S, C, F>> {
        let model = self.model.ok_or(TfLidarError::Unbound)?;
        self.init_uart(model, serial)
    }

    pub fn switch_to_can(&mut self, can: &'a mut C) -> Result<(), HandleError<S, C, F>> {
        let model = self.model.ok_or(TfLidarError::Unbound)?;
        self.init_can(model, can)
    }

    pub fn switch_to_fdcan(&mut self, fdcan: &'a mut F) -> Result<(), HandleError<S, C, F>> {
        let model = self.model.ok_or(TfLidarError::Unbound)?;
        self.init_fdcan(model, fdcan)
    }

    /// Drops the current binding and hands the borrowed connection back.
    ///
    /// The model is kept, so a later `switch_to_*` still works.
    pub fn unbind(&mut self) -> Binding<'a, S, C, F> {
        self.rx.clear();
        mem::take(&mut self.binding)
    }

    fn bind(
        &mut self,
        model: &'a ModelDescriptor,
        mut binding: Binding<'a, S, C, F>,
    ) -> Result<(), HandleError<S, C, F>> {
        let transport = binding.transport().ok_or(TfLidarError::Unbound)?;
        model.validate_for(transport).map_err(|e| {
            warn!("bind: {} rejected for {}", model.name, transport);
            TfLidarError::InvalidModel(e)
        })?;
        debug!("bind: {} over {}", model.name, transport);

        match self.config.bind_policy {
            BindPolicy::Eager => {
                self.model = Some(model);
                self.binding = binding;
                self.rx.clear();
                Self::init_binding(&mut self.binding, model, &self.config)
            }
            BindPolicy::OnSuccess => {
                Self::init_binding(&mut binding, model, &self.config)?;
                self.model = Some(model);
                self.binding = binding;
                self.rx.clear();
                Ok(())
            }
        }
    }

    fn init_binding(
        binding: &mut Binding<'a, S, C, F>,
        model: &ModelDescriptor,
        config: &DriverConfig<'a>,
    ) -> Result<(), HandleError<S, C, F>> {
        let acceptance_id = match config.acceptance_id {
            AcceptanceId::CommandId => model.can_id_tx,
            AcceptanceId::DataId => model.can_id_rx,
        };
        match binding {
            Binding::Unbound => Err(TfLidarError::Unbound),
            Binding::Uart(serial) => {
                uart::init(&mut **serial, model).map_err(|e| e.map_io(BusError::Serial))
            }
            Binding::Can(can) => {
                can::init(&mut **can, acceptance_id).map_err(|e| e.map_io(BusError::Can))
            }
            Binding::FdCan(fdcan) => {
                fdcan::init(&mut **fdcan, acceptance_id).map_err(|e| e.map_io(BusError::FdCan))
            }
        }
    }

    // --- Reading ---

    /// Reads one measurement over the active transport.
    ///
    /// UART blocks up to the configured timeout. CAN and CAN-FD return
    /// `NoFrame` straight away when nothing is queued. No call retries.
    pub fn read(&mut self) -> Result<Reading, HandleError<S, C, F>> {
        let model = match self.model {
            Some(model) if self.binding.is_bound() => model,
            _ => return Err(TfLidarError::Unbound),
        };

        let transport = match &mut self.binding {
            Binding::Unbound => return Err(TfLidarError::Unbound),
            Binding::Uart(serial) => {
                uart::receive_frame(
                    &mut **serial,
                    model,
                    self.config.uart_timeout,
                    self.config.poll_interval_us,
                    &mut self.rx,
                )
                .map_err(|e| e.map_io(BusError::Serial))?;
                Transport::Uart
            }
            Binding::Can(can) => {
                can::receive_frame(&mut **can, model, &mut self.rx)
                    .map_err(|e| e.map_io(BusError::Can))?;
                Transport::Can
            }
            Binding::FdCan(fdcan) => {
                fdcan::receive_frame(&mut **fdcan, &mut self.rx)
                    .map_err(|e| e.map_io(BusError::FdCan))?;
                Transport::FdCan
            }
        };

        if let Some(validator) = self.config.validator {
            validator.validate(transport, &self.rx).map_err(|e| {
                trace!("read: {} frame rejected by validator", transport);
                TfLidarError::InvalidFrame(e)
            })?;
        }

        decode_reading(&self.rx, model)
    }

    /// Boolean form of [`read`](Self::read). Outputs are written only on success.
    pub fn read_into(&mut self, distance_m: &mut f32, signal: &mut f32) -> bool {
        match self.read() {
            Ok(reading) => {
                *distance_m = reading.distance_m;
                *signal = reading.signal;
                true
            }
            Err(_) => false,
        }
    }

    // --- Accessors ---

    pub fn transport(&self) -> Option<Transport> {
        self.binding.transport()
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_bound()
    }

    pub fn model(&self) -> Option<&'a ModelDescriptor> {
        self.model
    }

    pub fn config(&self) -> &DriverConfig<'a> {
        &self.config
    }

    /// Bytes of the most recently received frame, valid or not.
    pub fn last_frame(&self) -> &[u8] {
        &self.rx
    }
}

impl<S, C, F> Default for TfLidar<'_, S, C, F>
where
    S: LidarSerial,
    C: LidarCan,
    F: LidarFdCan,
{
    fn default() -> Self {
        Self::new()
    }
}
