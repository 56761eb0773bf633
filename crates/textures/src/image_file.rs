//! Decoding image files into [`RawPixelImage`].
//!
//! This module is feature-gated behind `png` (default on) so that GL-only
//! builds can parse compressed containers without pulling in the `image` crate.
//! The conversion itself lives in [`crate::pixel`] (always available).

use es20kit_core::error::TextureError;
use es20kit_core::texture::PixelFormat;
use image::ImageError;
use std::path::Path;

use crate::pixel::RawPixelImage;

fn map_image_error(err: ImageError) -> TextureError {
    match err {
        ImageError::IoError(e) => TextureError::Io(e.to_string()),
        other => TextureError::Decode(other.to_string()),
    }
}

impl RawPixelImage {
    /// Decodes an image file to RGBA8888 and converts it to `format`.
    ///
    /// Returns `TextureError::Io` if the file cannot be read, or
    /// `TextureError::Decode` if its contents are not a supported image.
    pub fn load(path: &Path, format: PixelFormat) -> Result<Self, TextureError> {
        let rgba = image::open(path).map_err(map_image_error)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::debug!(
            "decoded {} ({width} x {height}) to {}",
            path.display(),
            format.name()
        );
        Ok(Self::from_rgba(width, height, format, rgba.as_raw()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atlas.png");
        let mut src = image::RgbaImage::new(4, 2);
        src.put_pixel(0, 0, image::Rgba([255, 128, 0, 0]));
        src.put_pixel(3, 1, image::Rgba([10, 20, 30, 255]));
        src.save(&path).unwrap();

        let img = RawPixelImage::load(&path, PixelFormat::Rgba5551).unwrap();
        assert_eq!((img.width, img.height), (4, 2));
        assert_eq!(img.pixels.len(), 8 * 2);
        let first = u16::from_ne_bytes([img.pixels[0], img.pixels[1]]);
        assert_eq!(first, (31 << 11) | (16 << 6));
        let last = u16::from_ne_bytes([img.pixels[14], img.pixels[15]]);
        assert_eq!(last & 1, 1);
    }

    #[test]
    fn load_keeps_rgba_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.png");
        image::RgbaImage::from_pixel(1, 1, image::Rgba([1, 2, 3, 4]))
            .save(&path)
            .unwrap();
        let img = RawPixelImage::load(&path, PixelFormat::Rgba8).unwrap();
        assert_eq!(img.pixels, vec![1, 2, 3, 4]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = RawPixelImage::load(&dir.path().join("nope.png"), PixelFormat::Rgb8);
        assert!(matches!(result, Err(TextureError::Io(_))));
    }

    #[test]
    fn garbage_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        let result = RawPixelImage::load(&path, PixelFormat::Rgb8);
        assert!(matches!(
            result,
            Err(TextureError::Decode(_)) | Err(TextureError::Io(_))
        ));
    }
}
