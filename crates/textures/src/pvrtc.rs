//! Legacy PVR (v2) container reader for PVRTC textures.
//!
//! The 52-byte header is thirteen little-endian fields with the ASCII tag
//! `"PVR!"` at offset 44. Payload starts at `header_length` and holds the mip
//! levels back to back with no size prefix: each level's size is computed
//! from the PVRTC block layout, with a floor of 2x2 blocks for small levels.
//! The header's `data_length` is not cross-checked against the computed
//! sizes.

use crate::compressed::{CompressedTexture, MipLevel};
use crate::raw_data::RawData;
use es20kit_core::error::TextureError;
use es20kit_core::texture::{is_power_of_two, CompressedFormat};

/// The tag identifying a legacy PVR header.
pub const PVR_TAG: [u8; 4] = *b"PVR!";

/// Offset of [`PVR_TAG`] within the header.
pub const PVR_TAG_OFFSET: usize = 44;

/// Size of the legacy PVR header.
pub const PVR_HEADER_LEN: usize = 52;

const FLAG_TYPE_MASK: u32 = 0xff;
const FLAG_TYPE_PVRTC_2: u32 = 24;
const FLAG_TYPE_PVRTC_4: u32 = 25;

/// Every block is 4 pixels tall.
const BLOCK_HEIGHT: u32 = 4;

/// Smallest block count per axis a level is stored with.
const MIN_BLOCKS: u32 = 2;

/// The legacy PVR header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PvrHeader {
    pub header_length: u32,
    pub height: u32,
    pub width: u32,
    pub num_mipmaps: u32,
    pub flags: u32,
    pub data_length: u32,
    pub bpp: u32,
    pub bitmask_red: u32,
    pub bitmask_green: u32,
    pub bitmask_blue: u32,
    pub bitmask_alpha: u32,
    pub pvr_tag: [u8; 4],
    pub num_surfs: u32,
}

impl PvrHeader {
    fn read(raw: &mut RawData<'_>) -> Result<Self, TextureError> {
        Ok(Self {
            header_length: raw.read_le32()?,
            height: raw.read_le32()?,
            width: raw.read_le32()?,
            num_mipmaps: raw.read_le32()?,
            flags: raw.read_le32()?,
            data_length: raw.read_le32()?,
            bpp: raw.read_le32()?,
            bitmask_red: raw.read_le32()?,
            bitmask_green: raw.read_le32()?,
            bitmask_blue: raw.read_le32()?,
            bitmask_alpha: raw.read_le32()?,
            pvr_tag: {
                let mut tag = [0u8; 4];
                tag.copy_from_slice(raw.read_bytes(4)?);
                tag
            },
            num_surfs: raw.read_le32()?,
        })
    }
}

/// Returns `true` if `data` carries the PVR tag at its header offset.
pub fn is_pvr(data: &[u8]) -> bool {
    data.get(PVR_TAG_OFFSET..PVR_TAG_OFFSET + PVR_TAG.len()) == Some(&PVR_TAG[..])
}

/// PVRTC block geometry for one of the two variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PvrtcVariant {
    pub format: CompressedFormat,
    pub bits_per_pixel: u32,
    pub block_width: u32,
}

impl PvrtcVariant {
    /// Decodes the type byte of the header flags.
    ///
    /// Returns `TextureError::UnsupportedFormat` for anything other than the
    /// 2bpp and 4bpp PVRTC types.
    pub fn from_flags(flags: u32) -> Result<Self, TextureError> {
        match flags & FLAG_TYPE_MASK {
            FLAG_TYPE_PVRTC_2 => Ok(Self {
                format: CompressedFormat::Pvrtc2Bpp,
                bits_per_pixel: 2,
                block_width: 8,
            }),
            FLAG_TYPE_PVRTC_4 => Ok(Self {
                format: CompressedFormat::Pvrtc4Bpp,
                bits_per_pixel: 4,
                block_width: 4,
            }),
            other => Err(TextureError::UnsupportedFormat {
                container: "PVRTC",
                value: other,
            }),
        }
    }

    /// Payload size of a `width` x `height` level.
    pub fn level_size(&self, width: u32, height: u32) -> usize {
        let width_blocks = (width / self.block_width).max(MIN_BLOCKS) as usize;
        let height_blocks = (height / BLOCK_HEIGHT).max(MIN_BLOCKS) as usize;
        let block_bytes = (self.block_width * BLOCK_HEIGHT * self.bits_per_pixel / 8) as usize;
        width_blocks * height_blocks * block_bytes
    }
}

/// A parsed PVRTC texture. Owns the file buffer; levels index into it.
#[derive(Debug, Clone)]
pub struct PvrtcImage {
    raw: Vec<u8>,
    header: PvrHeader,
    variant: PvrtcVariant,
    levels: Vec<MipLevel>,
}

impl PvrtcImage {
    /// Parses a legacy PVR file, taking ownership of its bytes.
    ///
    /// Fails with `InvalidMagic` when the tag is missing, `UnsupportedFormat`
    /// for unknown flag types, `NotPowerOfTwoSquare` for non-square or NPOT
    /// sizes, and `Truncated` when the computed chain overruns the buffer.
    pub fn from_bytes(raw: Vec<u8>) -> Result<Self, TextureError> {
        if !is_pvr(&raw) {
            log::warn!("PVR tag mismatch");
            return Err(TextureError::InvalidMagic { container: "PVRTC" });
        }

        let mut reader = RawData::new(&raw);
        let header = PvrHeader::read(&mut reader)?;
        log::debug!(
            "PVRTC mipmaps({}) surfs({})",
            header.num_mipmaps,
            header.num_surfs
        );

        let variant = PvrtcVariant::from_flags(header.flags)?;

        if header.width != header.height || !is_power_of_two(header.width) {
            return Err(TextureError::NotPowerOfTwoSquare {
                width: header.width,
                height: header.height,
            });
        }

        // num_mipmaps counts the levels beyond the base image
        let mip_count = (header.num_mipmaps as usize).saturating_add(1);
        reader.set_position(header.header_length as usize)?;

        let mut width = header.width;
        let mut height = header.height;
        let mut levels = Vec::with_capacity(mip_count.min(32));
        for level in 0..mip_count {
            let size = variant.level_size(width, height);
            log::debug!("PVRTC level({level}) size({width} x {height}) bytes({size})");
            levels.push(MipLevel::from(reader.take_range(size)?));
            width /= 2;
            height /= 2;
        }

        log::debug!(
            "PVRTC size({} x {}) {}bpp",
            header.width,
            header.height,
            variant.bits_per_pixel
        );

        Ok(Self {
            raw,
            header,
            variant,
            levels,
        })
    }

    pub fn header(&self) -> &PvrHeader {
        &self.header
    }

    pub fn bits_per_pixel(&self) -> u32 {
        self.variant.bits_per_pixel
    }
}

impl CompressedTexture for PvrtcImage {
    fn container(&self) -> &'static str {
        "pvrtc"
    }

    fn width(&self) -> u32 {
        self.header.width
    }

    fn height(&self) -> u32 {
        self.header.height
    }

    fn format(&self) -> CompressedFormat {
        self.variant.format
    }

    fn raw(&self) -> &[u8] {
        &self.raw
    }

    fn levels(&self) -> &[MipLevel] {
        &self.levels
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn header_layout_places_tag_at_offset_44() {
        let bytes = pvr_bytes(8, 0, PVRTC_4, &[0u8; 32]);
        assert_eq!(&bytes[PVR_TAG_OFFSET..PVR_TAG_OFFSET + 4], b"PVR!");
        assert!(is_pvr(&bytes));
    }

    #[test]
    fn single_level_4bpp() {
        let payload: Vec<u8> = (0..32).collect();
        let img = PvrtcImage::from_bytes(pvr_bytes(8, 0, PVRTC_4, &payload)).unwrap();
        assert_eq!(img.mip_count(), 1);
        assert_eq!(img.format(), CompressedFormat::Pvrtc4Bpp);
        assert_eq!(img.bits_per_pixel(), 4);
        assert_eq!(img.mip_level(0).unwrap(), payload.as_slice());
    }

    #[test]
    fn mip_count_adds_base_level() {
        let payload = vec![0u8; 128 + 32 * 4];
        let img = PvrtcImage::from_bytes(pvr_bytes(16, 4, PVRTC_4, &payload)).unwrap();
        assert_eq!(img.mip_count(), 5);
    }

    #[test]
    fn small_levels_are_floored_at_two_blocks() {
        let payload = vec![0u8; 128 + 32 * 4];
        let img = PvrtcImage::from_bytes(pvr_bytes(16, 4, PVRTC_4, &payload)).unwrap();
        let sizes: Vec<usize> = img.levels().iter().map(|l| l.len).collect();
        assert_eq!(sizes, vec![128, 32, 32, 32, 32]);
        let offsets: Vec<usize> = img.levels().iter().map(|l| l.offset).collect();
        assert_eq!(offsets, vec![52, 180, 212, 244, 276]);
    }

    #[test]
    fn two_bpp_uses_wide_blocks() {
        let payload = vec![0u8; 256 + 64 + 32];
        let img = PvrtcImage::from_bytes(pvr_bytes(32, 2, PVRTC_2, &payload)).unwrap();
        assert_eq!(img.format(), CompressedFormat::Pvrtc2Bpp);
        let sizes: Vec<usize> = img.levels().iter().map(|l| l.len).collect();
        assert_eq!(sizes, vec![256, 64, 32]);
    }

    #[test]
    fn extra_flag_bits_do_not_change_variant() {
        // 0x100 marks a file that carries mipmaps
        let payload = vec![0u8; 128 + 32];
        let img = PvrtcImage::from_bytes(pvr_bytes(16, 1, PVRTC_4 | 0x100, &payload)).unwrap();
        assert_eq!(img.format(), CompressedFormat::Pvrtc4Bpp);
        assert_eq!(img.levels()[0].len, 128);
    }

    #[test]
    fn missing_tag_is_invalid_magic() {
        let mut bytes = pvr_bytes(8, 0, PVRTC_4, &[0u8; 32]);
        bytes[PVR_TAG_OFFSET + 3] = b'?';
        assert!(matches!(
            PvrtcImage::from_bytes(bytes),
            Err(TextureError::InvalidMagic { container: "PVRTC" })
        ));
        assert!(matches!(
            PvrtcImage::from_bytes(vec![0u8; 10]),
            Err(TextureError::InvalidMagic { .. })
        ));
    }

    #[test]
    fn unknown_flag_type_is_unsupported_format() {
        let bytes = pvr_bytes(8, 0, 0x13, &[0u8; 32]);
        let err = PvrtcImage::from_bytes(bytes).unwrap_err();
        assert!(matches!(
            err,
            TextureError::UnsupportedFormat {
                container: "PVRTC",
                value: 0x13
            }
        ));
    }

    #[test]
    fn non_square_texture_is_rejected() {
        let mut bytes = pvr_bytes(16, 0, PVRTC_4, &[0u8; 128]);
        // height lives at offset 4
        bytes[4..8].copy_from_slice(&8u32.to_le_bytes());
        assert!(matches!(
            PvrtcImage::from_bytes(bytes),
            Err(TextureError::NotPowerOfTwoSquare {
                width: 16,
                height: 8
            })
        ));
    }

    #[test]
    fn npot_texture_is_rejected() {
        let bytes = pvr_bytes(24, 0, PVRTC_4, &[0u8; 512]);
        assert!(matches!(
            PvrtcImage::from_bytes(bytes),
            Err(TextureError::NotPowerOfTwoSquare { .. })
        ));
    }

    #[test]
    fn chain_past_end_is_truncated() {
        let bytes = pvr_bytes(16, 1, PVRTC_4, &[0u8; 128]);
        assert!(matches!(
            PvrtcImage::from_bytes(bytes),
            Err(TextureError::Truncated { .. })
        ));
    }

    #[test]
    fn level_size_formula() {
        let four = PvrtcVariant::from_flags(PVRTC_4).unwrap();
        let two = PvrtcVariant::from_flags(PVRTC_2).unwrap();
        assert_eq!(four.level_size(256, 256), 64 * 64 * 8);
        assert_eq!(two.level_size(256, 256), 32 * 64 * 8);
        assert_eq!(four.level_size(1, 1), 32);
        assert_eq!(two.level_size(1, 1), 32);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn computed_chain_tiles_the_payload(
                shift in 0_u32..9,
                four_bpp in any::<bool>(),
            ) {
                let size = 1u32 << shift;
                let flags = if four_bpp { PVRTC_4 } else { PVRTC_2 };
                let variant = PvrtcVariant::from_flags(flags).unwrap();
                let mut total = 0;
                let mut s = size;
                for _ in 0..=shift {
                    total += variant.level_size(s, s);
                    s /= 2;
                }
                let img = PvrtcImage::from_bytes(pvr_bytes(size, shift, flags, &vec![0u8; total])).unwrap();
                prop_assert_eq!(img.mip_count(), shift as usize + 1);
                let mut expected_offset = PVR_HEADER_LEN;
                for level in img.levels() {
                    prop_assert_eq!(level.offset, expected_offset);
                    expected_offset += level.len;
                }
                prop_assert_eq!(expected_offset, PVR_HEADER_LEN + total);
            }
        }
    }
}
