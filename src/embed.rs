use tracing::debug;

use crate::bitplane::{self, bits_msb_first};
use crate::capacity;
use crate::carrier::Carrier;
use crate::crypto::KeyStream;
use crate::format;

/// What [`embed`] wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedReport {
    pub payload_bytes: usize,
    pub bits_written: usize,
    pub capacity: usize,
}

/// Hides `payload` in the least significant bits of `carrier`.
///
/// The frame is written from the first bit position onwards; positions past
/// its last bit are left untouched. Capacity is checked before any channel is
/// modified, so on error the carrier is unchanged.
///
/// # Errors
///
/// Returns an error if the payload is empty or does not fit the carrier.
pub fn embed<C: Carrier + ?Sized>(
    carrier: &mut C,
    payload: &[u8],
    password: &[u8],
) -> Result<EmbedReport, crate::StegoError> {
    let capacity = capacity::check(&*carrier, payload.len())?;

    let keystream = KeyStream::derive(password);
    let frame = format::encode(payload, &keystream)?;

    let mut bits_written = 0;
    for (pos, bit) in bitplane::positions(&*carrier).zip(bits_msb_first(&frame)) {
        bitplane::write_bit(carrier, pos, bit);
        bits_written += 1;
    }

    debug!(
        payload_bytes = payload.len(),
        bits_written, capacity, "embedded frame"
    );

    Ok(EmbedReport {
        payload_bytes: payload.len(),
        bits_written,
        capacity,
    })
}
