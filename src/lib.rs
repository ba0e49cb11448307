//! Hide password-protected text in the least significant bits of an image.
//!
//! A message is XORed with a keystream derived from the password, wrapped in
//! a self-describing frame (`STEGO`, big-endian length, ciphertext) and
//! written one bit per channel value, starting at the first pixel. Decoding
//! scans the bit plane for a frame without any outside offset or length.
//!
//! Only lossless image formats keep the message intact.

pub mod bitplane;
pub mod capacity;
pub mod carrier;
pub mod crypto;
mod embed;
mod error;
mod extract;
pub mod format;
mod storage;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

pub use crate::capacity::{CarrierInfo, max_payload_bytes};
pub use crate::carrier::{Carrier, ImageCarrier, PixelGrid};
pub use crate::crypto::KeyStream;
pub use crate::embed::{EmbedReport, embed};
pub use crate::error::StegoError;
pub use crate::extract::{
    Extraction, ScanState, Scanner, extract, extract_bytes, extract_frame,
};
pub use crate::storage::Storage;

/// Default output path of the `encode` command.
pub const DEFAULT_OUTPUT: &str = "encoded_image.png";

/// Hides `message` in the image at `input` and writes the result to `output`.
///
/// Nothing is written if the message does not fit.
pub fn encode_file(
    input: &Path,
    output: &Path,
    message: &str,
    password: &str,
) -> Result<EmbedReport> {
    let mut carrier = ImageCarrier::load(input)?;
    let report = embed(&mut carrier, message.as_bytes(), password.as_bytes())?;

    let bytes = carrier.encode_for(output)?;
    let storage = Storage::new(output.to_path_buf());
    if storage.exists() {
        debug!(path = %output.display(), "replacing existing file");
    }
    storage
        .save(&bytes)
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(
        input = %input.display(),
        output = %output.display(),
        bytes = report.payload_bytes,
        "message encoded"
    );
    Ok(report)
}

/// Looks for a message in the image at `input`.
pub fn decode_file(input: &Path, password: &str) -> Result<Extraction> {
    let carrier = ImageCarrier::load(input)?;
    Ok(extract(&carrier, password.as_bytes()))
}

/// Geometry and capacity of the image at `input`.
pub fn inspect_file(input: &Path) -> Result<CarrierInfo> {
    let carrier = ImageCarrier::load(input)?;
    Ok(CarrierInfo::of(&carrier))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::tempdir;

    fn write_png(path: &Path, width: u32, height: u32) {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7) as u8, (y * 13) as u8, ((x + y) * 3) as u8])
        });
        img.save(path).unwrap();
    }

    #[test]
    fn encode_decode_file_roundtrip() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("cover.png");
        let output = dir.path().join("out.png");
        write_png(&input, 32, 32);

        let report = encode_file(&input, &output, "meet at noon", "pw").unwrap();
        assert_eq!(report.payload_bytes, 12);

        let found = decode_file(&output, "pw").unwrap();
        assert_eq!(found, Extraction::Message("meet at noon".into()));
    }

    #[test]
    fn encode_can_overwrite_input() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cover.png");
        write_png(&path, 16, 16);

        encode_file(&path, &path, "in place", "pw").unwrap();

        assert_eq!(decode_file(&path, "pw").unwrap().message(), Some("in place"));
    }

    #[test]
    fn too_long_message_writes_nothing() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("cover.png");
        let output = dir.path().join("out.png");
        write_png(&input, 4, 8);

        let err = encode_file(&input, &output, &"x".repeat(100), "pw").unwrap_err();

        assert!(matches!(
            err.downcast_ref::<StegoError>(),
            Some(StegoError::Capacity { .. })
        ));
        assert!(!output.exists());
    }

    #[test]
    fn untouched_image_decodes_to_not_found() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("cover.png");
        RgbImage::new(20, 20).save(&input).unwrap();

        assert_eq!(decode_file(&input, "pw").unwrap(), Extraction::NotFound);
    }

    #[test]
    fn inspect_reports_capacity() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("cover.png");
        write_png(&input, 10, 10);

        let info = inspect_file(&input).unwrap();
        assert_eq!(info.max_payload_bytes, 28);
    }
}
