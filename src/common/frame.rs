// src/common/frame.rs

use super::model::STANDARD_ID_MAX;
use super::types::MAX_FRAME_LEN;
use arrayvec::ArrayVec;

/// Received bytes of the most recent frame. Only `len()` bytes are meaningful.
pub type RawFrame = ArrayVec<u8, MAX_FRAME_LEN>;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
    Nine,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Direction(s) the serial peripheral is enabled for.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialMode {
    ReceiveOnly,
    TransmitOnly,
    Duplex,
}

/// Line settings handed to [`LidarSerial::configure`](super::hal_traits::LidarSerial::configure).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialConfig {
    pub baud: u32,
    pub data_bits: DataBits,
    pub stop_bits: StopBits,
    pub parity: Parity,
    pub mode: SerialMode,
}

impl SerialConfig {
    /// 8 data bits, no parity, 1 stop bit, receiver only. All TF-series sensors use this.
    pub const fn receive_8n1(baud: u32) -> Self {
        SerialConfig {
            baud,
            data_bits: DataBits::Eight,
            stop_bits: StopBits::One,
            parity: Parity::None,
            mode: SerialMode::ReceiveOnly,
        }
    }
}

/// Hardware receive queue a filter routes into and frames are read from.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxFifo {
    Fifo0,
    Fifo1,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FilterMode {
    /// Accept when `(id & mask) == (filter_id & mask)`.
    IdMask,
    /// Accept only the listed identifiers.
    IdList,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FilterScale {
    Single32,
    Dual16,
}

/// Acceptance filter for a classic CAN controller (bxCAN style filter banks).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CanFilter {
    pub bank: u8,
    pub fifo: RxFifo,
    pub mode: FilterMode,
    pub scale: FilterScale,
    /// 11-bit standard identifier to match.
    pub id: u16,
    /// 11-bit mask, ones are compared.
    pub mask: u16,
}

impl CanFilter {
    /// Single 32-bit ID/mask filter in bank 0 matching `id` exactly.
    pub const fn exact_standard(id: u16, fifo: RxFifo) -> Self {
        CanFilter {
            bank: 0,
            fifo,
            mode: FilterMode::IdMask,
            scale: FilterScale::Single32,
            id: id & STANDARD_ID_MAX,
            mask: STANDARD_ID_MAX,
        }
    }

    /// High half of the filter ID register, with the standard id in bits 15..5.
    #[inline]
    pub const fn id_high_register(&self) -> u16 {
        (self.id & STANDARD_ID_MAX) << 5
    }

    /// High half of the filter mask register.
    #[inline]
    pub const fn mask_high_register(&self) -> u16 {
        (self.mask & STANDARD_ID_MAX) << 5
    }

    /// Software model of what the hardware filter lets through.
    pub const fn accepts(&self, id: u16) -> bool {
        match self.mode {
            FilterMode::IdMask => (id & self.mask) == (self.id & self.mask),
            FilterMode::IdList => id == self.id || id == self.mask,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FdFilterType {
    /// `id1` is the identifier, `id2` the mask.
    Mask,
    /// Accept `id1..=id2`.
    Range,
    /// Accept `id1` or `id2`.
    Dual,
}

/// Standard-id filter element for a CAN-FD controller (M_CAN style).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FdCanFilter {
    pub index: u8,
    pub kind: FdFilterType,
    pub target: RxFifo,
    pub id1: u16,
    pub id2: u16,
}

impl FdCanFilter {
    pub const fn exact_standard(id: u16, target: RxFifo) -> Self {
        FdCanFilter {
            index: 0,
            kind: FdFilterType::Mask,
            target,
            id1: id & STANDARD_ID_MAX,
            id2: STANDARD_ID_MAX,
        }
    }

    pub const fn accepts(&self, id: u16) -> bool {
        match self.kind {
            FdFilterType::Mask => (id & self.id2) == (self.id1 & self.id2),
            FdFilterType::Range => id >= self.id1 && id <= self.id2,
            FdFilterType::Dual => id == self.id1 || id == self.id2,
        }
    }
}
