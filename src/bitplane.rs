//! The least-significant-bit plane of a carrier.
//!
//! Bits are visited row by row, then column by column, then channel by
//! channel. Embedding and extraction must use this exact order.

use crate::carrier::Carrier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitPosition {
    pub row: usize,
    pub col: usize,
    pub channel: usize,
}

/// Iterator over every bit position of a carrier, in embedding order.
#[derive(Debug, Clone)]
pub struct Positions {
    height: usize,
    width: usize,
    channels: usize,
    next: usize,
}

impl Iterator for Positions {
    type Item = BitPosition;

    fn next(&mut self) -> Option<BitPosition> {
        let total = self.height * self.width * self.channels;
        if self.next >= total {
            return None;
        }

        let i = self.next;
        self.next += 1;

        let channel = i % self.channels;
        let pixel = i / self.channels;
        Some(BitPosition {
            row: pixel / self.width,
            col: pixel % self.width,
            channel,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.height * self.width * self.channels).saturating_sub(self.next);
        (left, Some(left))
    }
}

impl ExactSizeIterator for Positions {}

pub fn positions<C: Carrier + ?Sized>(carrier: &C) -> Positions {
    Positions {
        height: carrier.height(),
        width: carrier.width(),
        channels: carrier.channels(),
        next: 0,
    }
}

pub fn read_bit<C: Carrier + ?Sized>(carrier: &C, pos: BitPosition) -> u8 {
    carrier.get(pos.row, pos.col, pos.channel) & 1
}

/// Replaces the least significant bit at `pos`; the other seven bits are kept.
pub fn write_bit<C: Carrier + ?Sized>(carrier: &mut C, pos: BitPosition, bit: u8) {
    let value = carrier.get(pos.row, pos.col, pos.channel);
    carrier.set(pos.row, pos.col, pos.channel, (value & 0xFE) | (bit & 1));
}

/// Bits of `bytes`, most significant bit of each byte first.
pub fn bits_msb_first(bytes: &[u8]) -> impl Iterator<Item = u8> + '_ {
    bytes
        .iter()
        .flat_map(|byte| (0..8).rev().map(move |shift| (byte >> shift) & 1))
}

/// Bits read so far from a carrier, kept from position 0 onwards.
#[derive(Debug, Default, Clone)]
pub struct BitBuffer {
    bits: Vec<u8>,
}

impl BitBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bits: Vec::with_capacity(bits),
        }
    }

    pub fn push(&mut self, bit: u8) {
        self.bits.push(bit & 1);
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// The byte formed by the 8 bits starting at `bit_offset`, MSB first.
    /// `None` if fewer than 8 bits are available there.
    pub fn byte_at(&self, bit_offset: usize) -> Option<u8> {
        let bits = self.bits.get(bit_offset..bit_offset.checked_add(8)?)?;
        Some(bits.iter().fold(0u8, |acc, bit| (acc << 1) | bit))
    }

    /// `count` consecutive bytes starting at `bit_offset`.
    pub fn bytes_at(&self, bit_offset: usize, count: usize) -> Option<Vec<u8>> {
        (0..count).map(|i| self.byte_at(bit_offset + i * 8)).collect()
    }
}

impl FromIterator<u8> for BitBuffer {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut buf = BitBuffer::new();
        for bit in iter {
            buf.push(bit);
        }
        buf
    }
}
