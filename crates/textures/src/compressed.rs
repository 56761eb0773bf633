//! The shared shape of a decoded compressed texture.
//!
//! A parsed image owns the file buffer it was read from and describes each mip
//! level as an offset/length pair into that buffer. Level payloads are handed
//! out as borrowed slices, so nothing is copied and the buffer is released
//! exactly once, when the image is dropped.

use es20kit_core::texture::CompressedFormat;
use serde_json::{json, Value};
use std::ops::Range;

/// Location of one mip level's payload inside the owning buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MipLevel {
    pub offset: usize,
    pub len: usize,
}

impl MipLevel {
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }
}

impl From<Range<usize>> for MipLevel {
    fn from(range: Range<usize>) -> Self {
        Self {
            offset: range.start,
            len: range.end - range.start,
        }
    }
}

/// One mip level ready for `glCompressedTexImage2D`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MipData<'a> {
    pub level: usize,
    pub width: u32,
    pub height: u32,
    pub data: &'a [u8],
}

/// Common read access to a parsed KTX, PVRTC, or PKM image.
///
/// The trait is object safe so loaders can return `Box<dyn CompressedTexture>`.
pub trait CompressedTexture {
    /// Short container name for logs and reports.
    fn container(&self) -> &'static str;

    /// Width of mip level 0 in pixels.
    fn width(&self) -> u32;

    /// Height of mip level 0 in pixels.
    fn height(&self) -> u32;

    /// Payload format passed to the GPU.
    fn format(&self) -> CompressedFormat;

    /// The whole file buffer the levels point into.
    fn raw(&self) -> &[u8];

    /// The mip table, level 0 first.
    fn levels(&self) -> &[MipLevel];

    fn mip_count(&self) -> usize {
        self.levels().len()
    }

    /// Payload bytes of level `index`, or `None` past the last level.
    fn mip_level(&self, index: usize) -> Option<&[u8]> {
        self.levels()
            .get(index)
            .map(|level| &self.raw()[level.range()])
    }

    /// Iterates levels in upload order with their halved dimensions.
    fn mip_levels(&self) -> MipIter<'_> {
        MipIter {
            raw: self.raw(),
            levels: self.levels(),
            index: 0,
            width: self.width(),
            height: self.height(),
        }
    }

    /// Summary of the image as a JSON object.
    fn describe(&self) -> Value {
        let levels: Vec<Value> = self
            .mip_levels()
            .map(|mip| {
                json!({
                    "level": mip.level,
                    "width": mip.width,
                    "height": mip.height,
                    "bytes": mip.data.len(),
                })
            })
            .collect();
        json!({
            "container": self.container(),
            "width": self.width(),
            "height": self.height(),
            "format": format!("0x{:04x}", self.format().gl_internal_format()),
            "mipmaps": self.mip_count(),
            "levels": levels,
        })
    }
}

/// Iterator returned by [`CompressedTexture::mip_levels`].
///
/// Dimensions halve per level and stop at 1.
#[derive(Debug, Clone)]
pub struct MipIter<'a> {
    raw: &'a [u8],
    levels: &'a [MipLevel],
    index: usize,
    width: u32,
    height: u32,
}

impl<'a> Iterator for MipIter<'a> {
    type Item = MipData<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let level = self.levels.get(self.index)?;
        let item = MipData {
            level: self.index,
            width: self.width,
            height: self.height,
            data: &self.raw[level.range()],
        };
        self.index += 1;
        self.width = (self.width / 2).max(1);
        self.height = (self.height / 2).max(1);
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.levels.len() - self.index;
        (left, Some(left))
    }
}

impl ExactSizeIterator for MipIter<'_> {}
