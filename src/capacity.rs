//! How many payload bytes a carrier can hold.

use serde::Serialize;

use crate::carrier::Carrier;
use crate::error::StegoError;
use crate::format::HEADER_LEN;

/// Largest payload, in bytes, that fits `carrier` after the frame header.
///
/// `None` if the carrier cannot hold the header itself.
pub fn max_payload_bytes<C: Carrier + ?Sized>(carrier: &C) -> Option<usize> {
    (carrier.total_channels() / 8).checked_sub(HEADER_LEN)
}

/// Checks that a payload of `requested` bytes fits and returns the capacity.
///
/// # Errors
///
/// [`StegoError::CarrierTooSmall`] if even the header does not fit,
/// [`StegoError::Capacity`] if the payload is too long.
pub fn check<C: Carrier + ?Sized>(carrier: &C, requested: usize) -> Result<usize, StegoError> {
    let available = max_payload_bytes(carrier).ok_or(StegoError::CarrierTooSmall {
        channels: carrier.total_channels(),
        header: HEADER_LEN,
    })?;

    if requested > available {
        return Err(StegoError::Capacity {
            requested,
            available,
        });
    }
    Ok(available)
}

/// Summary of a carrier's geometry and capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarrierInfo {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub total_bits: usize,
    pub max_payload_bytes: usize,
}

impl CarrierInfo {
    pub fn of<C: Carrier + ?Sized>(carrier: &C) -> Self {
        Self {
            width: carrier.width(),
            height: carrier.height(),
            channels: carrier.channels(),
            total_bits: carrier.total_channels(),
            max_payload_bytes: max_payload_bytes(carrier).unwrap_or(0),
        }
    }
}

impl std::fmt::Display for CarrierInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Dimensions      : {}x{}", self.width, self.height)?;
        writeln!(f, "Channels        : {}", self.channels)?;
        writeln!(f, "Usable bits     : {}", self.total_bits)?;
        write!(f, "Max message     : {} bytes", self.max_payload_bytes)
    }
}
