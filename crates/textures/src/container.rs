//! Container registry: maps names and magic bytes to parsers.
//!
//! Both the CLI and any embedding loader go through [`AnyCompressedImage`]
//! so the per-container dispatch lives in one place.

use crate::compressed::{CompressedTexture, MipLevel};
use crate::ktx::{is_ktx, KtxImage};
use crate::pkm::{is_pkm, PkmImage};
use crate::pvrtc::{is_pvr, PvrtcImage};
use es20kit_core::error::TextureError;
use es20kit_core::texture::CompressedFormat;
use std::path::Path;

/// Reads a whole file into memory.
///
/// Returns `TextureError::Io` naming the path on failure.
pub fn load_file(path: &Path) -> Result<Vec<u8>, TextureError> {
    std::fs::read(path).map_err(|e| TextureError::Io(format!("{}: {e}", path.display())))
}

/// All recognized container names.
const CONTAINER_NAMES: &[&str] = &["ktx", "pvrtc", "pkm"];

/// The compressed texture file formats this crate can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Ktx,
    Pvrtc,
    Pkm,
}

impl ContainerKind {
    /// Looks up a container by name or file extension (case-insensitive).
    ///
    /// `pvr` is accepted for PVRTC and `etc1` for PKM.
    pub fn from_name(name: &str) -> Result<Self, TextureError> {
        match name.to_ascii_lowercase().as_str() {
            "ktx" => Ok(ContainerKind::Ktx),
            "pvrtc" | "pvr" => Ok(ContainerKind::Pvrtc),
            "pkm" | "etc1" => Ok(ContainerKind::Pkm),
            _ => Err(TextureError::UnknownContainer(name.to_string())),
        }
    }

    /// Guesses the container from the start of a file.
    ///
    /// PVR files carry their tag at offset 44, so the check needs a full header.
    pub fn detect(data: &[u8]) -> Option<Self> {
        if is_ktx(data) {
            Some(ContainerKind::Ktx)
        } else if is_pkm(data) {
            Some(ContainerKind::Pkm)
        } else if is_pvr(data) {
            Some(ContainerKind::Pvrtc)
        } else {
            None
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ContainerKind::Ktx => "ktx",
            ContainerKind::Pvrtc => "pvrtc",
            ContainerKind::Pkm => "pkm",
        }
    }

    /// Returns a slice of all recognized container names.
    pub fn list_names() -> &'static [&'static str] {
        CONTAINER_NAMES
    }
}

/// A parsed image of any supported container.
///
/// Delegates [`CompressedTexture`] to the wrapped parser.
#[derive(Debug, Clone)]
pub enum AnyCompressedImage {
    Ktx(KtxImage),
    Pvrtc(PvrtcImage),
    Pkm(PkmImage),
}

impl AnyCompressedImage {
    /// Parses `raw` as the given container.
    pub fn from_bytes(kind: ContainerKind, raw: Vec<u8>) -> Result<Self, TextureError> {
        Ok(match kind {
            ContainerKind::Ktx => AnyCompressedImage::Ktx(KtxImage::from_bytes(raw)?),
            ContainerKind::Pvrtc => AnyCompressedImage::Pvrtc(PvrtcImage::from_bytes(raw)?),
            ContainerKind::Pkm => AnyCompressedImage::Pkm(PkmImage::from_bytes(raw)?),
        })
    }

    /// Parses `raw`, picking the container from its magic bytes.
    pub fn detect(raw: Vec<u8>) -> Result<Self, TextureError> {
        let kind = ContainerKind::detect(&raw)
            .ok_or_else(|| TextureError::UnknownContainer("unrecognized magic".to_string()))?;
        log::debug!("detected {} container", kind.name());
        Self::from_bytes(kind, raw)
    }

    /// Loads and parses a file. With no `kind`, the container is detected.
    pub fn open(path: &Path, kind: Option<ContainerKind>) -> Result<Self, TextureError> {
        let raw = load_file(path)?;
        match kind {
            Some(kind) => Self::from_bytes(kind, raw),
            None => Self::detect(raw),
        }
    }

    pub fn kind(&self) -> ContainerKind {
        match self {
            AnyCompressedImage::Ktx(_) => ContainerKind::Ktx,
            AnyCompressedImage::Pvrtc(_) => ContainerKind::Pvrtc,
            AnyCompressedImage::Pkm(_) => ContainerKind::Pkm,
        }
    }

    fn inner(&self) -> &dyn CompressedTexture {
        match self {
            AnyCompressedImage::Ktx(img) => img,
            AnyCompressedImage::Pvrtc(img) => img,
            AnyCompressedImage::Pkm(img) => img,
        }
    }
}

impl CompressedTexture for AnyCompressedImage {
    fn container(&self) -> &'static str {
        self.inner().container()
    }

    fn width(&self) -> u32 {
        self.inner().width()
    }

    fn height(&self) -> u32 {
        self.inner().height()
    }

    fn format(&self) -> CompressedFormat {
        self.inner().format()
    }

    fn raw(&self) -> &[u8] {
        self.inner().raw()
    }

    fn levels(&self) -> &[MipLevel] {
        self.inner().levels()
    }
}
