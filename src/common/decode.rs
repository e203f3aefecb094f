// src/common/decode.rs

use super::error::TfLidarError;
use super::model::ModelDescriptor;

/// One decoded measurement.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// Distance in meters.
    pub distance_m: f32,
    /// Signal strength, in the sensor's own units.
    pub signal: f32,
}

/// Reads a big-endian `u16` starting at `offset`, or `None` if it does not fit.
#[inline]
pub fn be_u16_at(frame: &[u8], offset: usize) -> Option<u16> {
    let bytes = frame.get(offset..offset.checked_add(2)?)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

/// Extracts distance and signal from a raw frame and applies the model's scale.
///
/// Shared by every transport. Performs no framing or checksum checks.
pub fn decode_reading<E: core::fmt::Debug>(
    frame: &[u8],
    model: &ModelDescriptor,
) -> Result<Reading, TfLidarError<E>> {
    let needed = model.offset_distance.max(model.offset_signal) as usize + 2;
    let short = || TfLidarError::ShortFrame {
        needed,
        got: frame.len(),
    };

    let raw_distance = be_u16_at(frame, model.offset_distance as usize).ok_or_else(short)?;
    let raw_signal = be_u16_at(frame, model.offset_signal as usize).ok_or_else(short)?;

    Ok(Reading {
        distance_m: f32::from(raw_distance) * model.distance_scale,
        signal: f32::from(raw_signal) * model.signal_scale,
    })
}
