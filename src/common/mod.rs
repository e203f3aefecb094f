// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod crc;
pub mod decode;
pub mod error;
pub mod frame;
pub mod hal_traits;
pub mod model;
pub mod timing;
pub mod types;

// --- Re-export key types/traits/functions for easier access ---

// From crc.rs
pub use self::crc::{sum8, Crc8Check, FrameError, FrameValidator, HeaderChecksum, TF_FRAME_HEADER};

// From decode.rs
pub use decode::{be_u16_at, decode_reading, Reading};

// From error.rs
pub use error::{BusError, TfLidarError};

// From frame.rs
pub use frame::{
    CanFilter, DataBits, FdCanFilter, FdFilterType, FilterMode, FilterScale, Parity, RawFrame,
    RxFifo, SerialConfig, SerialMode, StopBits,
};

// From hal_traits.rs
pub use hal_traits::{LidarCan, LidarFdCan, LidarInstant, LidarSerial, LidarTimer, NoFrame, NoTransport};

#[cfg(feature = "impl-native")]
pub use hal_traits::NativeSerialConfig;

// From model.rs
pub use model::{Field, ModelDescriptor, ModelError, STANDARD_ID_MAX};

// From types.rs
pub use types::{Transport, CAN_MAX_FRAME_LEN, FDCAN_MAX_FRAME_LEN, MAX_FRAME_LEN, UART_MAX_FRAME_LEN};

// timing constants stay under common::timing::*
