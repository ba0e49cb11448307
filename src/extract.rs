//! Recovering a frame from a carrier's bit plane.
//!
//! The decoder gets no offset or length from outside the image. It reads the
//! bit plane one bit at a time and tries every bit offset, lowest first, as a
//! frame start. A failed match moves the candidate forward by one bit; bits
//! already read are kept, so no position is read twice.

use tracing::debug;

use crate::bitplane::{self, BitBuffer, Positions};
use crate::carrier::Carrier;
use crate::crypto::KeyStream;
use crate::format::{self, Frame, HEADER_BITS, ParseOutcome};

/// States of the resynchronizing scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Reading bits until `until` bits are buffered.
    Accumulating { until: usize },
    /// Enough bits are buffered to check the current candidate.
    Validating,
    Found,
    /// The bit plane ran out without a frame.
    Exhausted,
}

/// Step-wise frame search over one carrier.
pub struct Scanner<'a, C: Carrier + ?Sized> {
    carrier: &'a C,
    positions: Positions,
    bits: BitBuffer,
    total_bits: usize,
    candidate: usize,
    state: ScanState,
    frame: Option<Frame>,
}

impl<'a, C: Carrier + ?Sized> Scanner<'a, C> {
    pub fn new(carrier: &'a C) -> Self {
        let total_bits = carrier.total_channels();
        Self {
            carrier,
            positions: bitplane::positions(carrier),
            bits: BitBuffer::with_capacity(total_bits),
            total_bits,
            candidate: 0,
            state: ScanState::Accumulating { until: HEADER_BITS },
            frame: None,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Bit offset currently tried as a frame start.
    pub fn candidate(&self) -> usize {
        self.candidate
    }

    pub fn bits_read(&self) -> usize {
        self.bits.len()
    }

    /// Performs one transition and returns the new state.
    ///
    /// `Found` and `Exhausted` are terminal.
    pub fn step(&mut self) -> ScanState {
        self.state = match self.state {
            ScanState::Accumulating { until } if self.bits.len() >= until => ScanState::Validating,
            ScanState::Accumulating { until } => match self.positions.next() {
                Some(pos) => {
                    self.bits.push(bitplane::read_bit(self.carrier, pos));
                    ScanState::Accumulating { until }
                }
                None => ScanState::Exhausted,
            },
            ScanState::Validating => {
                match format::try_parse_at(&self.bits, self.candidate, self.total_bits) {
                    ParseOutcome::NoMatch => {
                        self.candidate += 1;
                        ScanState::Accumulating {
                            until: self.candidate + HEADER_BITS,
                        }
                    }
                    ParseOutcome::NeedMore { frame_bits } => ScanState::Accumulating {
                        until: self.candidate + frame_bits,
                    },
                    ParseOutcome::Frame(frame) => {
                        self.frame = Some(frame);
                        ScanState::Found
                    }
                }
            }
            terminal @ (ScanState::Found | ScanState::Exhausted) => terminal,
        };
        self.state
    }

    /// Runs the scan to a terminal state.
    pub fn run(mut self) -> Option<Frame> {
        loop {
            match self.step() {
                ScanState::Found => {
                    debug!(
                        offset = self.candidate,
                        bits_read = self.bits.len(),
                        "found frame"
                    );
                    return self.frame.take();
                }
                ScanState::Exhausted => {
                    debug!(
                        candidates = self.candidate + 1,
                        bits_read = self.bits.len(),
                        "no frame in carrier"
                    );
                    return None;
                }
                ScanState::Accumulating { .. } | ScanState::Validating => {}
            }
        }
    }
}

/// Outcome of [`extract`]. None of these is a failure of the scan itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Message(String),
    /// A frame was found but its plaintext is not readable text: invalid
    /// UTF-8, or control characters other than tab and line breaks. `lossy`
    /// holds it with invalid sequences replaced.
    LikelyWrongPassword { lossy: String },
    NotFound,
}

impl Extraction {
    pub fn message(&self) -> Option<&str> {
        match self {
            Extraction::Message(m) => Some(m),
            _ => None,
        }
    }
}

/// Scans `carrier` for the first frame.
pub fn extract_frame<C: Carrier + ?Sized>(carrier: &C) -> Option<Frame> {
    Scanner::new(carrier).run()
}

/// Scans `carrier` and returns the decrypted payload bytes.
pub fn extract_bytes<C: Carrier + ?Sized>(carrier: &C, password: &[u8]) -> Option<Vec<u8>> {
    let frame = extract_frame(carrier)?;
    Some(frame.decrypt(&KeyStream::derive(password)))
}

/// Text a user could have typed: no control characters except `\t`, `\n`, `\r`.
fn is_readable(text: &str) -> bool {
    text.chars()
        .all(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
}

/// Scans `carrier` and decodes the payload as text.
pub fn extract<C: Carrier + ?Sized>(carrier: &C, password: &[u8]) -> Extraction {
    let Some(plaintext) = extract_bytes(carrier, password) else {
        return Extraction::NotFound;
    };

    match String::from_utf8(plaintext) {
        Ok(message) if is_readable(&message) => Extraction::Message(message),
        Ok(garbled) => {
            debug!("payload contains control characters");
            Extraction::LikelyWrongPassword { lossy: garbled }
        }
        Err(e) => {
            debug!(valid_up_to = e.utf8_error().valid_up_to(), "payload is not UTF-8");
            Extraction::LikelyWrongPassword {
                lossy: String::from_utf8_lossy(e.as_bytes()).into_owned(),
            }
        }
    }
}
