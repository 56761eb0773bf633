#![deny(unsafe_code)]
//! Texture loading for es20kit: compressed containers and raw pixel layouts.
//!
//! This crate sits between `es20kit-core` (which defines the format tags and
//! `TextureError`) and the callers that feed GL. Both the CLI and any
//! embedding renderer depend on it to avoid duplicating parsing and dispatch.
//!
//! - [`ktx`], [`pvrtc`], [`pkm`] parse an owned file buffer into a
//!   [`CompressedTexture`] whose mip levels borrow from that buffer.
//! - [`container`] picks a parser by name or magic bytes.
//! - [`pixel`] converts RGB/RGBA8 pixels into 32/24/16-bit upload layouts.
//! - `image_file` (feature `png`) decodes image files into [`RawPixelImage`].
//! - `render` (feature `render`) uploads textures and matrices through `glow`.

pub mod compressed;
pub mod container;
pub mod ktx;
pub mod pixel;
pub mod pkm;
pub mod pvrtc;
pub mod raw_data;

#[cfg(feature = "png")]
pub mod image_file;

#[cfg(feature = "render")]
pub mod render;

pub use compressed::{CompressedTexture, MipData, MipLevel};
pub use container::{load_file, AnyCompressedImage, ContainerKind};
pub use ktx::{KtxHeader, KtxImage};
pub use pixel::{convert_rgb, convert_rgba, RawPixelImage};
pub use pkm::PkmImage;
pub use pvrtc::{PvrHeader, PvrtcImage, PvrtcVariant};
pub use raw_data::RawData;
