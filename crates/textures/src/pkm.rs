//! PKM container reader for ETC1 textures.
//!
//! Header (16 bytes): `"PKM"` plus one unchecked byte, version `"10"`, then
//! five big-endian `u16`s: data type, padded width, padded height, original
//! width, original height. The rest of the file is a single ETC1 level.

use crate::compressed::{CompressedTexture, MipLevel};
use crate::raw_data::RawData;
use es20kit_core::error::TextureError;
use es20kit_core::texture::CompressedFormat;

pub const PKM_MAGIC: [u8; 3] = *b"PKM";
pub const PKM_VERSION: [u8; 2] = *b"10";
pub const PKM_HEADER_LEN: usize = 16;

/// Returns `true` if `data` starts with the PKM magic.
pub fn is_pkm(data: &[u8]) -> bool {
    data.starts_with(&PKM_MAGIC)
}

/// A parsed PKM file. Owns the file buffer.
#[derive(Debug, Clone)]
pub struct PkmImage {
    raw: Vec<u8>,
    data_type: u16,
    width: u16,
    height: u16,
    origin_width: u16,
    origin_height: u16,
    levels: [MipLevel; 1],
}

impl PkmImage {
    /// Parses a PKM file, taking ownership of its bytes.
    ///
    /// Fails with `InvalidMagic` on a bad magic or version, `Truncated` on a
    /// short header, and `InvalidDimensions` if the padded size is smaller
    /// than the original size.
    pub fn from_bytes(raw: Vec<u8>) -> Result<Self, TextureError> {
        let mut reader = RawData::new(&raw);

        let magic = reader
            .read_bytes(4)
            .map_err(|_| TextureError::InvalidMagic { container: "PKM" })?;
        let version = reader
            .read_bytes(2)
            .map_err(|_| TextureError::InvalidMagic { container: "PKM" })?;
        if magic[..3] != PKM_MAGIC || version != PKM_VERSION {
            log::warn!("PKM magic or version mismatch");
            return Err(TextureError::InvalidMagic { container: "PKM" });
        }

        let data_type = reader.read_be16()?;
        let width = reader.read_be16()?;
        let height = reader.read_be16()?;
        let origin_width = reader.read_be16()?;
        let origin_height = reader.read_be16()?;

        if width < origin_width || height < origin_height {
            return Err(TextureError::InvalidDimensions {
                width: width.into(),
                height: height.into(),
                origin_width: origin_width.into(),
                origin_height: origin_height.into(),
            });
        }

        let payload = reader.take_range(reader.available())?;
        log::debug!(
            "ETC1 bytes({}) tex size({width} x {height}) origin size({origin_width} x {origin_height})",
            payload.len()
        );

        Ok(Self {
            raw,
            data_type,
            width,
            height,
            origin_width,
            origin_height,
            levels: [MipLevel::from(payload)],
        })
    }

    /// The format code from the header (0 for ETC1 RGB without mipmaps).
    pub fn data_type(&self) -> u16 {
        self.data_type
    }

    /// Width before padding to the 4x4 block grid.
    pub fn origin_width(&self) -> u32 {
        self.origin_width.into()
    }

    /// Height before padding to the 4x4 block grid.
    pub fn origin_height(&self) -> u32 {
        self.origin_height.into()
    }
}

impl CompressedTexture for PkmImage {
    fn container(&self) -> &'static str {
        "pkm"
    }

    fn width(&self) -> u32 {
        self.width.into()
    }

    fn height(&self) -> u32 {
        self.height.into()
    }

    fn format(&self) -> CompressedFormat {
        CompressedFormat::Etc1
    }

    fn raw(&self) -> &[u8] {
        &self.raw
    }

    fn levels(&self) -> &[MipLevel] {
        &self.levels
    }
}
