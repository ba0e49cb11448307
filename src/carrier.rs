//! Pixel buffers that can carry a hidden frame.
//!
//! The embedding code only needs channel-level access, expressed by the
//! [`Carrier`] trait. [`PixelGrid`] is a plain in-memory buffer,
//! [`ImageCarrier`] wraps a decoded image file.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbImage};
use tracing::warn;

use crate::error::StegoError;

/// A rectangular grid of pixels with a fixed number of 8-bit channels each.
pub trait Carrier {
    fn width(&self) -> usize;

    fn height(&self) -> usize;

    fn channels(&self) -> usize;

    fn get(&self, row: usize, col: usize, channel: usize) -> u8;

    fn set(&mut self, row: usize, col: usize, channel: usize, value: u8);

    /// Number of channel values, i.e. the number of usable bits.
    fn total_channels(&self) -> usize {
        self.height() * self.width() * self.channels()
    }
}

/// Row-major in-memory pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    height: usize,
    width: usize,
    channels: usize,
    data: Vec<u8>,
}

impl PixelGrid {
    /// An all-zero grid.
    pub fn new(height: usize, width: usize, channels: usize) -> Self {
        Self {
            height,
            width,
            channels,
            data: vec![0u8; height * width * channels],
        }
    }

    /// Wraps an existing buffer. Returns `None` if `data` does not hold
    /// exactly `height * width * channels` values.
    pub fn from_raw(height: usize, width: usize, channels: usize, data: Vec<u8>) -> Option<Self> {
        if data.len() != height * width * channels {
            return None;
        }
        Some(Self {
            height,
            width,
            channels,
            data,
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn index(&self, row: usize, col: usize, channel: usize) -> usize {
        (row * self.width + col) * self.channels + channel
    }
}

impl Carrier for PixelGrid {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn channels(&self) -> usize {
        self.channels
    }

    fn get(&self, row: usize, col: usize, channel: usize) -> u8 {
        self.data[self.index(row, col, channel)]
    }

    fn set(&mut self, row: usize, col: usize, channel: usize, value: u8) {
        let i = self.index(row, col, channel);
        self.data[i] = value;
    }
}

/// A decoded image, exposed as three channels per pixel.
///
/// Channel 0 is blue, 1 is green, 2 is red. Alpha is dropped on load.
#[derive(Debug, Clone)]
pub struct ImageCarrier {
    image: RgbImage,
}

impl ImageCarrier {
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self::new(image.to_rgb8())
    }

    /// Loads and decodes the image at `path`.
    pub fn load(path: &Path) -> Result<Self, StegoError> {
        let image = image::open(path).map_err(|source| StegoError::CarrierUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_dynamic(image))
    }

    pub fn as_rgb(&self) -> &RgbImage {
        &self.image
    }

    /// Encodes the image in the format implied by `path`'s extension.
    ///
    /// JPEG output is allowed but destroys the hidden frame, so it is logged.
    pub fn encode_for(&self, path: &Path) -> Result<Vec<u8>, StegoError> {
        let format = ImageFormat::from_path(path)
            .map_err(|_| StegoError::UnsupportedFormat(path.to_path_buf()))?;

        if format == ImageFormat::Jpeg {
            warn!(
                path = %path.display(),
                "JPEG is lossy; the hidden message will not survive re-encoding"
            );
        }

        let mut buf = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut buf), format)
            .map_err(|source| StegoError::CarrierWrite {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(buf)
    }

    fn rgb_index(channel: usize) -> usize {
        2 - channel
    }
}

impl Carrier for ImageCarrier {
    fn width(&self) -> usize {
        self.image.width() as usize
    }

    fn height(&self) -> usize {
        self.image.height() as usize
    }

    fn channels(&self) -> usize {
        3
    }

    fn get(&self, row: usize, col: usize, channel: usize) -> u8 {
        self.image.get_pixel(col as u32, row as u32).0[Self::rgb_index(channel)]
    }

    fn set(&mut self, row: usize, col: usize, channel: usize, value: u8) {
        self.image.get_pixel_mut(col as u32, row as u32).0[Self::rgb_index(channel)] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use tempfile::tempdir;

    #[test]
    fn pixel_grid_is_row_major() {
        let mut grid = PixelGrid::new(2, 3, 3);
        grid.set(1, 2, 0, 7);

        assert_eq!(grid.data()[(3 + 2) * 3], 7);
        assert_eq!(grid.get(1, 2, 0), 7);
        assert_eq!(grid.total_channels(), 18);
    }

    #[test]
    fn pixel_grid_from_raw_checks_length() {
        assert!(PixelGrid::from_raw(2, 2, 3, vec![0; 12]).is_some());
        assert!(PixelGrid::from_raw(2, 2, 3, vec![0; 11]).is_none());
    }

    #[test]
    fn image_carrier_exposes_bgr_order() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(1, 0, Rgb([10, 20, 30]));
        let carrier = ImageCarrier::new(img);

        assert_eq!(carrier.get(0, 1, 0), 30);
        assert_eq!(carrier.get(0, 1, 1), 20);
        assert_eq!(carrier.get(0, 1, 2), 10);
    }

    #[test]
    fn image_carrier_set_maps_row_and_col() {
        let mut carrier = ImageCarrier::new(RgbImage::new(4, 2));
        carrier.set(1, 3, 0, 99);

        assert_eq!(carrier.as_rgb().get_pixel(3, 1).0, [0, 0, 99]);
        assert_eq!(carrier.width(), 4);
        assert_eq!(carrier.height(), 2);
    }

    #[test]
    fn png_encode_and_load_is_lossless() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("carrier.png");

        let mut img = RgbImage::new(3, 3);
        img.put_pixel(2, 2, Rgb([1, 2, 3]));
        let carrier = ImageCarrier::new(img);

        std::fs::write(&path, carrier.encode_for(&path).unwrap()).unwrap();
        let loaded = ImageCarrier::load(&path).unwrap();

        assert_eq!(loaded.as_rgb(), carrier.as_rgb());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let carrier = ImageCarrier::new(RgbImage::new(1, 1));
        let err = carrier.encode_for(Path::new("out.nothing")).unwrap_err();

        assert!(matches!(err, StegoError::UnsupportedFormat(_)));
    }

    #[test]
    fn missing_file_is_unreadable() {
        let dir = tempdir().unwrap();
        let err = ImageCarrier::load(&dir.path().join("missing.png")).unwrap_err();

        assert!(matches!(err, StegoError::CarrierUnreadable { .. }));
    }

    #[test]
    fn garbage_file_is_unreadable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("garbage.png");
        std::fs::write(&path, b"not an image").unwrap();

        assert!(matches!(
            ImageCarrier::load(&path),
            Err(StegoError::CarrierUnreadable { .. })
        ));
    }
}
