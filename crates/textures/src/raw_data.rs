//! Sequential reader over a loaded file buffer.
//!
//! `RawData` keeps a read position into a borrowed byte slice. Every read
//! checks the remaining length and fails with `TextureError::Truncated`
//! instead of reading past the end.

use es20kit_core::error::TextureError;
use std::ops::Range;

/// Byte cursor over an in-memory file.
#[derive(Debug, Clone)]
pub struct RawData<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> RawData<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Total buffer length.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current read offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the read position.
    pub fn available(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Moves the read position to an absolute offset.
    pub fn set_position(&mut self, pos: usize) -> Result<(), TextureError> {
        if pos > self.data.len() {
            return Err(TextureError::Truncated {
                needed: pos,
                available: self.data.len(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Claims the next `len` bytes and returns their offsets in the buffer.
    pub fn take_range(&mut self, len: usize) -> Result<Range<usize>, TextureError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or(TextureError::Truncated {
                needed: len,
                available: self.available(),
            })?;
        let range = self.pos..end;
        self.pos = end;
        Ok(range)
    }

    /// Advances past `len` bytes.
    pub fn skip(&mut self, len: usize) -> Result<(), TextureError> {
        self.take_range(len).map(|_| ())
    }

    /// Reads the next `len` bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], TextureError> {
        let range = self.take_range(len)?;
        Ok(&self.data[range])
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], TextureError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, TextureError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_le32(&mut self) -> Result<u32, TextureError> {
        self.read_array().map(u32::from_le_bytes)
    }

    pub fn read_be16(&mut self) -> Result<u16, TextureError> {
        self.read_array().map(u16::from_be_bytes)
    }
}
