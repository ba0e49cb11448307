//! Frame format of the hidden payload.
//!
//! Frame layout, stored MSB first in the carrier's bit plane:
//! ```text
//! MAGIC "STEGO" (5) | LENGTH (4, big-endian u32) | CIPHERTEXT (LENGTH)
//! ```
//!
//! The ciphertext is the payload XORed with the password keystream.

pub mod frame;

pub use frame::{Frame, ParseOutcome, encode, try_parse_at};

/// Magic bytes opening every frame.
pub const MAGIC: &[u8; MAGIC_LEN] = b"STEGO";
/// Length of magic bytes.
pub const MAGIC_LEN: usize = 5;
/// Length of the payload length field.
pub const LEN_LEN: usize = 4;
/// Bytes in front of the ciphertext.
pub const HEADER_LEN: usize = MAGIC_LEN + LEN_LEN;
/// Bits in front of the ciphertext.
pub const HEADER_BITS: usize = HEADER_LEN * 8;
