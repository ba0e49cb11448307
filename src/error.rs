use std::path::PathBuf;

use thiserror::Error;

/// Failures of the embedding and extraction pipeline.
///
/// A scan that finds no frame, or finds one whose plaintext is not valid
/// text, is not an error: see [`crate::Extraction`].
#[derive(Debug, Error)]
pub enum StegoError {
    #[error("could not read image at {}", .path.display())]
    CarrierUnreadable {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image too small: {channels} channel values cannot hold the {header}-byte header")]
    CarrierTooSmall { channels: usize, header: usize },

    #[error("message too long: {requested} bytes, maximum is {available} bytes")]
    Capacity { requested: usize, available: usize },

    #[error("message is empty")]
    EmptyPayload,

    #[error("message of {0} bytes does not fit a 32-bit length field")]
    PayloadTooLarge(usize),

    #[error("unsupported output format for {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("could not encode image for {}", .path.display())]
    CarrierWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
