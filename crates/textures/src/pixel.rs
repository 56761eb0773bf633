//! Pure-computation conversion of 8-bit RGB/RGBA pixels to GL upload layouts.
//!
//! This module is always available (no feature gate) so that both the image
//! file path and callers holding decoded pixels share the same conversion.

use es20kit_core::texture::PixelFormat;

/// Packs 8-bit channels into `RGB565`.
#[inline]
pub fn pack_rgb565(r: u8, g: u8, b: u8) -> u16 {
    (u16::from(r >> 3) << 11) | (u16::from(g >> 2) << 5) | u16::from(b >> 3)
}

/// Packs 8-bit channels into `RGBA5551`. `alpha` sets the low bit.
#[inline]
pub fn pack_rgba5551(r: u8, g: u8, b: u8, alpha: bool) -> u16 {
    (u16::from(r >> 3) << 11)
        | (u16::from(g >> 3) << 6)
        | (u16::from(b >> 3) << 1)
        | u16::from(alpha)
}

/// Converts `pixel_count` RGB888 pixels from `src` into `dst` as `format`.
///
/// `src` must hold at least `pixel_count * 3` bytes and `dst` at least
/// `pixel_count * format.bytes_per_pixel()`. RGBA outputs are opaque.
///
/// # Panics
///
/// Panics if either buffer is too short.
pub fn convert_rgb(src: &[u8], format: PixelFormat, dst: &mut [u8], pixel_count: usize) {
    let out_bpp = format.bytes_per_pixel();
    debug_assert!(src.len() >= pixel_count * 3, "RGB source too short");
    debug_assert!(dst.len() >= pixel_count * out_bpp, "destination too short");

    let src = src[..pixel_count * 3].chunks_exact(3);
    let dst = dst[..pixel_count * out_bpp].chunks_exact_mut(out_bpp);
    for (px, out) in src.zip(dst) {
        let (r, g, b) = (px[0], px[1], px[2]);
        match format {
            PixelFormat::Rgba8 => out.copy_from_slice(&[r, g, b, 255]),
            PixelFormat::Rgb8 => out.copy_from_slice(px),
            PixelFormat::Rgba5551 => {
                out.copy_from_slice(&pack_rgba5551(r, g, b, true).to_ne_bytes())
            }
            PixelFormat::Rgb565 => out.copy_from_slice(&pack_rgb565(r, g, b).to_ne_bytes()),
        }
    }
}

/// Converts `pixel_count` RGBA8888 pixels from `src` into `dst` as `format`.
///
/// For `Rgba5551` the alpha bit is set when the source alpha is non-zero.
/// `Rgb8` and `Rgb565` drop alpha.
///
/// # Panics
///
/// Panics if either buffer is too short.
pub fn convert_rgba(src: &[u8], format: PixelFormat, dst: &mut [u8], pixel_count: usize) {
    let out_bpp = format.bytes_per_pixel();
    debug_assert!(src.len() >= pixel_count * 4, "RGBA source too short");
    debug_assert!(dst.len() >= pixel_count * out_bpp, "destination too short");

    let src = src[..pixel_count * 4].chunks_exact(4);
    let dst = dst[..pixel_count * out_bpp].chunks_exact_mut(out_bpp);
    for (px, out) in src.zip(dst) {
        let (r, g, b, a) = (px[0], px[1], px[2], px[3]);
        match format {
            PixelFormat::Rgba8 => out.copy_from_slice(px),
            PixelFormat::Rgb8 => out.copy_from_slice(&px[..3]),
            PixelFormat::Rgba5551 => {
                out.copy_from_slice(&pack_rgba5551(r, g, b, a > 0).to_ne_bytes())
            }
            PixelFormat::Rgb565 => out.copy_from_slice(&pack_rgb565(r, g, b).to_ne_bytes()),
        }
    }
}

/// An uncompressed image already in its GL upload layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPixelImage {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixels: Vec<u8>,
}

impl RawPixelImage {
    /// Converts a tightly packed RGBA8888 buffer of `width * height` pixels.
    pub fn from_rgba(width: u32, height: u32, format: PixelFormat, src: &[u8]) -> Self {
        Self::convert(width, height, format, src, convert_rgba)
    }

    /// Converts a tightly packed RGB888 buffer of `width * height` pixels.
    pub fn from_rgb(width: u32, height: u32, format: PixelFormat, src: &[u8]) -> Self {
        Self::convert(width, height, format, src, convert_rgb)
    }

    fn convert(
        width: u32,
        height: u32,
        format: PixelFormat,
        src: &[u8],
        convert: fn(&[u8], PixelFormat, &mut [u8], usize),
    ) -> Self {
        let pixel_count = width as usize * height as usize;
        let mut pixels = vec![0u8; pixel_count * format.bytes_per_pixel()];
        convert(src, format, &mut pixels, pixel_count);
        Self {
            width,
            height,
            format,
            pixels,
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}
