//! Password-derived keystream used to mask the hidden payload.
//!
//! The cipher is a plain repeating XOR over a SHA-256 digest. It keeps a
//! casual reader out of the bits, nothing more.

pub mod keystream;

pub use keystream::KeyStream;

/// Length of the derived key (SHA-256 digest, 32 bytes).
pub const KEY_LEN: usize = 32;
