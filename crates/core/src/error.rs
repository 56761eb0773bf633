//! Error types shared by the es20kit crates.

use thiserror::Error;

/// Errors produced while loading, parsing, or converting texture data.
#[derive(Debug, Error)]
pub enum TextureError {
    /// The file identifier, tag, or version did not match the container.
    #[error("invalid {container} signature")]
    InvalidMagic { container: &'static str },

    /// A KTX file declared the byte order this loader does not read.
    #[error("unsupported KTX endianness marker 0x{marker:08x}")]
    UnsupportedEndianness { marker: u32 },

    /// A format field held a value outside the known enumeration.
    #[error("unsupported {container} format value 0x{value:x}")]
    UnsupportedFormat {
        container: &'static str,
        value: u32,
    },

    /// The buffer ended before the data the header declares.
    #[error("truncated data: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    /// Compressed dimensions were smaller than the original image dimensions.
    #[error(
        "invalid dimensions: compressed ({width}, {height}) smaller than original ({origin_width}, {origin_height})"
    )]
    InvalidDimensions {
        width: u32,
        height: u32,
        origin_width: u32,
        origin_height: u32,
    },

    /// A PVRTC texture was not a square power-of-two image.
    #[error("PVRTC texture must be square with power-of-two sides, got ({width}, {height})")]
    NotPowerOfTwoSquare { width: u32, height: u32 },

    /// A container name was not recognized.
    #[error("unknown container: {0}")]
    UnknownContainer(String),

    /// A pixel format name was not recognized.
    #[error("unknown pixel format: {0}")]
    UnknownPixelFormat(String),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// An image file could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}
