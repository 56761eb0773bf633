//! KTX 1.1 container reader.
//!
//! Layout: 12-byte identifier, 4-byte endianness word, 12 little-endian
//! `u32` header fields, a key/value block (skipped), then for each mip level a
//! 4-byte image size followed by that many payload bytes.
//!
//! Only files written in this machine's byte order are read. The endianness
//! word is checked one way: the swapped marker `0x01020304` is rejected and
//! nothing is byte-swapped.

use crate::compressed::{CompressedTexture, MipLevel};
use crate::raw_data::RawData;
use es20kit_core::error::TextureError;
use es20kit_core::texture::CompressedFormat;

/// The 12-byte KTX 1.1 file identifier.
pub const KTX_IDENTIFIER: [u8; 12] = [
    0xAB, 0x4B, 0x54, 0x58, 0x20, 0x31, 0x31, 0xBB, 0x0D, 0x0A, 0x1A, 0x0A,
];

/// Endianness word value of a file written in the opposite byte order.
const SWAPPED_ENDIAN_MARKER: u32 = 0x0102_0304;

/// Size of [`KtxHeader`] on disk.
pub const KTX_HEADER_LEN: usize = 48;

/// The fixed header following the identifier and endianness word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KtxHeader {
    pub gl_type: u32,
    pub gl_type_size: u32,
    pub gl_format: u32,
    pub gl_internal_format: u32,
    pub gl_base_internal_format: u32,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub pixel_depth: u32,
    pub number_of_array_elements: u32,
    pub number_of_faces: u32,
    pub number_of_mipmap_levels: u32,
    pub bytes_of_key_value_data: u32,
}

impl KtxHeader {
    fn read(raw: &mut RawData<'_>) -> Result<Self, TextureError> {
        Ok(Self {
            gl_type: raw.read_le32()?,
            gl_type_size: raw.read_le32()?,
            gl_format: raw.read_le32()?,
            gl_internal_format: raw.read_le32()?,
            gl_base_internal_format: raw.read_le32()?,
            pixel_width: raw.read_le32()?,
            pixel_height: raw.read_le32()?,
            pixel_depth: raw.read_le32()?,
            number_of_array_elements: raw.read_le32()?,
            number_of_faces: raw.read_le32()?,
            number_of_mipmap_levels: raw.read_le32()?,
            bytes_of_key_value_data: raw.read_le32()?,
        })
    }
}

/// A parsed KTX file. Owns the file buffer; levels index into it.
#[derive(Debug, Clone)]
pub struct KtxImage {
    raw: Vec<u8>,
    header: KtxHeader,
    levels: Vec<MipLevel>,
}

/// Returns `true` if `data` starts with the KTX identifier.
pub fn is_ktx(data: &[u8]) -> bool {
    data.starts_with(&KTX_IDENTIFIER)
}

impl KtxImage {
    /// Parses a KTX file, taking ownership of its bytes.
    ///
    /// Fails with `InvalidMagic` on a bad identifier, `UnsupportedEndianness`
    /// on a byte-swapped file, and `Truncated` if a declared level runs past
    /// the end of the buffer.
    pub fn from_bytes(raw: Vec<u8>) -> Result<Self, TextureError> {
        if !is_ktx(&raw) {
            log::warn!("KTX identifier mismatch");
            return Err(TextureError::InvalidMagic { container: "KTX" });
        }

        let mut reader = RawData::new(&raw);
        reader.skip(KTX_IDENTIFIER.len())?;

        let endian = reader.read_le32()?;
        if endian == SWAPPED_ENDIAN_MARKER {
            log::warn!("KTX endianness marker 0x{endian:08x} not supported");
            return Err(TextureError::UnsupportedEndianness { marker: endian });
        }

        let header = KtxHeader::read(&mut reader)?;
        log::debug!("KTX format(0x{:x})", header.gl_base_internal_format);
        log::debug!(
            "KTX size({} x {}) depth({})",
            header.pixel_width,
            header.pixel_height,
            header.pixel_depth
        );
        log::debug!(
            "KTX mipmaps({}) key/value data({} bytes)",
            header.number_of_mipmap_levels,
            header.bytes_of_key_value_data
        );

        reader.skip(header.bytes_of_key_value_data as usize)?;

        let levels = (0..header.number_of_mipmap_levels)
            .map(|level| {
                let image_size = reader.read_le32()? as usize;
                log::debug!("KTX level({level}) image size({image_size} bytes)");
                reader.take_range(image_size).map(MipLevel::from)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw,
            header,
            levels,
        })
    }

    pub fn header(&self) -> &KtxHeader {
        &self.header
    }
}

impl CompressedTexture for KtxImage {
    fn container(&self) -> &'static str {
        "ktx"
    }

    fn width(&self) -> u32 {
        self.header.pixel_width
    }

    fn height(&self) -> u32 {
        self.header.pixel_height
    }

    /// The header's `glBaseInternalFormat`, which is what gets uploaded.
    fn format(&self) -> CompressedFormat {
        CompressedFormat::from_gl(self.header.gl_base_internal_format)
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
    fn minimal_single_level_file_round_trips() {
        let payload: Vec<u8> = (100..116).collect();
        let bytes = ktx_bytes(NATIVE_ENDIAN, etc1_header(4, 4, 1), &[], &[&payload]);
        let img = KtxImage::from_bytes(bytes).unwrap();
        assert_eq!(img.mip_count(), 1);
        assert_eq!(img.width(), 4);
        assert_eq!(img.height(), 4);
        assert_eq!(img.mip_level(0).unwrap(), payload.as_slice());
    }

    #[test]
    fn payload_offset_follows_headers() {
        let payload = [7u8; 16];
        let bytes = ktx_bytes(NATIVE_ENDIAN, etc1_header(4, 4, 1), &[], &[&payload]);
        let img = KtxImage::from_bytes(bytes).unwrap();
        assert_eq!(img.levels()[0].offset, 12 + 4 + KTX_HEADER_LEN + 4);
    }

    #[test]
    fn key_value_data_is_skipped() {
        let kv = b"KTXorientation\0S=r,T=d\0\0";
        let mut header = etc1_header(8, 8, 2);
        header.bytes_of_key_value_data = kv.len() as u32;
        let level0 = [1u8; 32];
        let level1 = [2u8; 8];
        let bytes = ktx_bytes(NATIVE_ENDIAN, header, kv, &[&level0, &level1]);
        let img = KtxImage::from_bytes(bytes).unwrap();
        assert_eq!(img.mip_count(), 2);
        assert_eq!(img.mip_level(0).unwrap(), &level0);
        assert_eq!(img.mip_level(1).unwrap(), &level1);
    }

    #[test]
    fn mip_chain_is_in_increasing_level_order() {
        let levels: [&[u8]; 3] = [&[0u8; 32], &[1u8; 8], &[2u8; 8]];
        let bytes = ktx_bytes(NATIVE_ENDIAN, etc1_header(8, 8, 3), &[], &levels);
        let img = KtxImage::from_bytes(bytes).unwrap();
        let sizes: Vec<(usize, u32, usize)> = img
            .mip_levels()
            .map(|m| (m.level, m.width, m.data.len()))
            .collect();
        assert_eq!(sizes, vec![(0, 8, 32), (1, 4, 8), (2, 2, 8)]);
    }

    #[test]
    fn format_is_base_internal_format() {
        let mut header = etc1_header(4, 4, 1);
        header.gl_internal_format = 0x9274;
        header.gl_base_internal_format = 0x1907;
        let bytes = ktx_bytes(NATIVE_ENDIAN, header, &[], &[&[0u8; 8]]);
        let img = KtxImage::from_bytes(bytes).unwrap();
        assert_eq!(img.format(), CompressedFormat::Gl(0x1907));
        assert_eq!(img.header().gl_internal_format, 0x9274);
    }

    #[test]
    fn bad_identifier_is_rejected() {
        let mut bytes = ktx_bytes(NATIVE_ENDIAN, etc1_header(4, 4, 1), &[], &[&[0u8; 16]]);
        bytes[5] = b'2';
        let err = KtxImage::from_bytes(bytes).unwrap_err();
        assert!(matches!(err, TextureError::InvalidMagic { container: "KTX" }));
    }

    #[test]
    fn short_or_empty_buffers_are_rejected() {
        assert!(matches!(
            KtxImage::from_bytes(Vec::new()),
            Err(TextureError::InvalidMagic { .. })
        ));
        assert!(matches!(
            KtxImage::from_bytes(KTX_IDENTIFIER[..6].to_vec()),
            Err(TextureError::InvalidMagic { .. })
        ));
    }

    #[test]
    fn swapped_endianness_is_rejected() {
        let bytes = ktx_bytes(SWAPPED_ENDIAN_MARKER, etc1_header(4, 4, 1), &[], &[&[0u8; 16]]);
        let err = KtxImage::from_bytes(bytes).unwrap_err();
        assert!(matches!(
            err,
            TextureError::UnsupportedEndianness { marker: 0x0102_0304 }
        ));
    }

    #[test]
    fn other_endianness_words_are_accepted() {
        let bytes = ktx_bytes(0xDEAD_BEEF, etc1_header(4, 4, 1), &[], &[&[0u8; 16]]);
        assert!(KtxImage::from_bytes(bytes).is_ok());
    }

    #[test]
    fn zero_mipmap_levels_yields_empty_table() {
        let bytes = ktx_bytes(NATIVE_ENDIAN, etc1_header(4, 4, 0), &[], &[]);
        let img = KtxImage::from_bytes(bytes).unwrap();
        assert_eq!(img.mip_count(), 0);
        assert!(img.mip_level(0).is_none());
    }

    #[test]
    fn level_running_past_end_is_truncated() {
        let mut bytes = ktx_bytes(NATIVE_ENDIAN, etc1_header(4, 4, 1), &[], &[&[0u8; 16]]);
        bytes.truncate(bytes.len() - 4);
        assert!(matches!(
            KtxImage::from_bytes(bytes),
            Err(TextureError::Truncated { .. })
        ));
    }

    #[test]
    fn is_ktx_checks_prefix_only() {
        assert!(is_ktx(&KTX_IDENTIFIER));
        assert!(!is_ktx(b"PKM 10"));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn any_non_ktx_prefix_is_rejected(data in prop::collection::vec(any::<u8>(), 0..128)) {
                prop_assume!(!data.starts_with(&KTX_IDENTIFIER));
                let is_invalid_magic = matches!(
                    KtxImage::from_bytes(data),
                    Err(TextureError::InvalidMagic { .. })
                );
                prop_assert!(is_invalid_magic);
            }

            #[test]
            fn arbitrary_tails_never_panic(tail in prop::collection::vec(any::<u8>(), 0..256)) {
                let mut data = KTX_IDENTIFIER.to_vec();
                data.extend_from_slice(&tail);
                let _ = KtxImage::from_bytes(data);
            }

            #[test]
            fn level_payloads_survive_parsing(
                levels in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 1..6),
            ) {
                let slices: Vec<&[u8]> = levels.iter().map(Vec::as_slice).collect();
                let header = etc1_header(32, 32, levels.len() as u32);
                let img = KtxImage::from_bytes(ktx_bytes(NATIVE_ENDIAN, header, &[], &slices)).unwrap();
                prop_assert_eq!(img.mip_count(), levels.len());
                for (i, level) in levels.iter().enumerate() {
                    prop_assert_eq!(img.mip_level(i).unwrap(), level.as_slice());
                }
            }
        }
    }
}
