//! Texture format tags and size helpers.

use crate::error::TextureError;
use serde::{Deserialize, Serialize};

/// GL enum for `GL_COMPRESSED_RGBA_PVRTC_4BPPV1_IMG`.
pub const GL_COMPRESSED_RGBA_PVRTC_4BPPV1_IMG: u32 = 0x8C02;
/// GL enum for `GL_COMPRESSED_RGBA_PVRTC_2BPPV1_IMG`.
pub const GL_COMPRESSED_RGBA_PVRTC_2BPPV1_IMG: u32 = 0x8C03;
/// GL enum for `GL_ETC1_RGB8_OES`.
pub const GL_ETC1_RGB8_OES: u32 = 0x8D64;

/// Returns `true` if `size` is a power of two. Zero is not.
pub fn is_power_of_two(size: u32) -> bool {
    size.is_power_of_two()
}

/// Returns `true` if both `width` and `height` are powers of two.
pub fn is_power_of_two_wh(width: u32, height: u32) -> bool {
    is_power_of_two(width) && is_power_of_two(height)
}

/// Uncompressed pixel layouts a raw image can be converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    /// 8 bits per channel, 32 bits per pixel.
    Rgba8,
    /// 8 bits per channel, no alpha, 24 bits per pixel.
    Rgb8,
    /// 5 bits per color channel plus a 1-bit alpha, packed in a `u16`.
    Rgba5551,
    /// 5/6/5 bits for red/green/blue, packed in a `u16`.
    Rgb565,
}

/// All pixel format names accepted by [`PixelFormat::from_name`].
const PIXEL_FORMAT_NAMES: &[&str] = &["rgba8", "rgb8", "rgba5551", "rgb565"];

impl PixelFormat {
    /// Size of one destination pixel in bytes.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgba8 => 4,
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba5551 | PixelFormat::Rgb565 => 2,
        }
    }

    /// Looks up a format by its lowercase name.
    ///
    /// Returns `TextureError::UnknownPixelFormat` for anything else.
    pub fn from_name(name: &str) -> Result<Self, TextureError> {
        match name.to_ascii_lowercase().as_str() {
            "rgba8" | "rgba8888" => Ok(PixelFormat::Rgba8),
            "rgb8" | "rgb888" => Ok(PixelFormat::Rgb8),
            "rgba5551" => Ok(PixelFormat::Rgba5551),
            "rgb565" => Ok(PixelFormat::Rgb565),
            _ => Err(TextureError::UnknownPixelFormat(name.to_string())),
        }
    }

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            PixelFormat::Rgba8 => "rgba8",
            PixelFormat::Rgb8 => "rgb8",
            PixelFormat::Rgba5551 => "rgba5551",
            PixelFormat::Rgb565 => "rgb565",
        }
    }

    pub fn list_names() -> &'static [&'static str] {
        PIXEL_FORMAT_NAMES
    }
}

/// Compressed payload formats produced by the container parsers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressedFormat {
    /// PVRTC, 2 bits per pixel, 8x4 pixel blocks.
    Pvrtc2Bpp,
    /// PVRTC, 4 bits per pixel, 4x4 pixel blocks.
    Pvrtc4Bpp,
    /// ETC1 RGB, 4x4 pixel blocks.
    Etc1,
    /// A GL internal format taken verbatim from a KTX header.
    Gl(u32),
}

impl CompressedFormat {
    /// The GL enum passed to `glCompressedTexImage2D`.
    pub fn gl_internal_format(self) -> u32 {
        match self {
            CompressedFormat::Pvrtc2Bpp => GL_COMPRESSED_RGBA_PVRTC_2BPPV1_IMG,
            CompressedFormat::Pvrtc4Bpp => GL_COMPRESSED_RGBA_PVRTC_4BPPV1_IMG,
            CompressedFormat::Etc1 => GL_ETC1_RGB8_OES,
            CompressedFormat::Gl(value) => value,
        }
    }

    /// Maps a GL enum back to a named format where one exists.
    pub fn from_gl(value: u32) -> Self {
        match value {
            GL_COMPRESSED_RGBA_PVRTC_2BPPV1_IMG => CompressedFormat::Pvrtc2Bpp,
            GL_COMPRESSED_RGBA_PVRTC_4BPPV1_IMG => CompressedFormat::Pvrtc4Bpp,
            GL_ETC1_RGB8_OES => CompressedFormat::Etc1,
            other => CompressedFormat::Gl(other),
        }
    }
}
