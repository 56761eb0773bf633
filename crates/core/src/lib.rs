#![deny(unsafe_code)]
//! Core types for es20kit, the OpenGL ES 2.0 sample-support toolkit.
//!
//! Provides `Vec2`/`Vec3`/`Vec4` and the column-major `Mat4`, the sprite
//! position and atlas UV matrix builders, pixel/compressed format tags,
//! power-of-two helpers, JSON parameter helpers, and `TextureError`.
//! Everything here is a pure function over explicit inputs; nothing touches a
//! GL context.

pub mod error;
pub mod params;
pub mod sprite;
pub mod texture;
pub mod vector;

pub use error::TextureError;
pub use sprite::{sprite_position_matrix, uv_matrix, AtlasRegion, SpritePlacement};
pub use texture::{is_power_of_two, is_power_of_two_wh, CompressedFormat, PixelFormat};
pub use vector::{Mat4, MatrixLayout, Vec2, Vec3, Vec4};
