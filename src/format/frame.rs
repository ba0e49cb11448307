use super::{HEADER_BITS, HEADER_LEN, LEN_LEN, MAGIC, MAGIC_LEN};
use crate::bitplane::BitBuffer;
use crate::crypto::KeyStream;
use crate::error::StegoError;

/// A frame located in a bit stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    offset: usize,
    ciphertext: Vec<u8>,
}

impl Frame {
    /// Bit offset at which the frame's magic starts.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Total frame size in bits, header included.
    pub fn bit_len(&self) -> usize {
        (HEADER_LEN + self.ciphertext.len()) * 8
    }

    pub fn decrypt(&self, keystream: &KeyStream) -> Vec<u8> {
        let mut plaintext = self.ciphertext.clone();
        keystream.apply(&mut plaintext);
        plaintext
    }
}

/// Result of trying to read a frame at one bit offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// No frame starts here; try the next offset.
    NoMatch,
    /// The header is plausible but the buffer must hold `frame_bits` bits
    /// from the offset before the frame can be read.
    NeedMore { frame_bits: usize },
    Frame(Frame),
}

/// Builds the frame bytes for `payload`.
///
/// # Errors
///
/// Returns an error if the payload is empty or longer than `u32::MAX` bytes.
pub fn encode(payload: &[u8], keystream: &KeyStream) -> Result<Vec<u8>, StegoError> {
    if payload.is_empty() {
        return Err(StegoError::EmptyPayload);
    }
    let len = u32::try_from(payload.len()).map_err(|_| StegoError::PayloadTooLarge(payload.len()))?;

    let mut buf = Vec::with_capacity(HEADER_LEN + payload.len());
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&len.to_be_bytes());

    let body = buf.len();
    buf.extend_from_slice(payload);
    keystream.apply(&mut buf[body..]);

    Ok(buf)
}

/// Tries to read a frame starting at bit `offset` of `bits`.
///
/// `total_bits` is the size of the whole bit plane, which bounds the length a
/// genuine header can claim: the ciphertext has to fit into what remains after
/// `offset` and the header.
pub fn try_parse_at(bits: &BitBuffer, offset: usize, total_bits: usize) -> ParseOutcome {
    // Compare the magic byte by byte; most offsets fail on the first one.
    for (i, expected) in MAGIC.iter().enumerate() {
        match bits.byte_at(offset + i * 8) {
            Some(byte) if byte == *expected => {}
            Some(_) => return ParseOutcome::NoMatch,
            None => {
                return ParseOutcome::NeedMore {
                    frame_bits: HEADER_BITS,
                };
            }
        }
    }

    let Some(len_bytes) = bits.bytes_at(offset + MAGIC_LEN * 8, LEN_LEN) else {
        return ParseOutcome::NeedMore {
            frame_bits: HEADER_BITS,
        };
    };
    let len = u32::from_be_bytes([len_bytes[0], len_bytes[1], len_bytes[2], len_bytes[3]]) as usize;

    let max_len = (total_bits.saturating_sub(offset) / 8).saturating_sub(HEADER_LEN);
    if len == 0 || len > max_len {
        return ParseOutcome::NoMatch;
    }

    let frame_bits = HEADER_BITS + len * 8;
    if bits.len() < offset + frame_bits {
        return ParseOutcome::NeedMore { frame_bits };
    }

    match bits.bytes_at(offset + HEADER_BITS, len) {
        Some(ciphertext) => ParseOutcome::Frame(Frame { offset, ciphertext }),
        None => ParseOutcome::NeedMore { frame_bits },
    }
}
