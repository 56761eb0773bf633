//! Matrix builders for pixel-placed 2D sprites and texture-atlas lookups.
//!
//! The sprite quad is authored in model space as a 1.0 x 1.0 square centered
//! on the origin (-0.5..0.5 on both axes), with UVs spanning 0..1. The
//! position matrix maps that quad onto a pixel rectangle of the render surface
//! (top-left origin, y down); the UV matrix maps the 0..1 UV square onto a
//! sub-rectangle of an atlas.

use crate::params::{param_f32, param_i32, param_u32};
use crate::vector::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Builds the model-to-clip matrix for a sprite at pixel rect
/// `(x, y, width, height)`, rotated `rotation_degrees` about its own center.
///
/// The result is `translate * aspect * rotate * scale`. Rotation happens
/// before the aspect correction so a square sprite stays square on a
/// non-square surface at any angle.
///
/// `surface_width` and `surface_height` must be non-zero. A zero sprite
/// width or height collapses the quad to a line or point.
pub fn sprite_position_matrix(
    surface_width: u32,
    surface_height: u32,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    rotation_degrees: f32,
) -> Mat4 {
    debug_assert!(surface_width > 0 && surface_height > 0, "empty surface");

    let surface_w = surface_width as f32;
    let surface_h = surface_height as f32;

    let surface_aspect = surface_w / surface_h;
    let aspect = Mat4::scale(1.0, surface_aspect, 1.0);

    // Both axes are measured against the surface width; `aspect` restores y.
    let x_scale = width as f32 / surface_w * 2.0;
    let y_scale = height as f32 / surface_w * 2.0;
    let scale = Mat4::scale(x_scale, y_scale, 0.0);

    // Move the shrunken quad's top-left corner to (-1, 1), then offset by the
    // pixel position.
    let vertex_left = 0.5 + (1.0 - x_scale) * 0.5;
    let vertex_top = 0.5 + (1.0 - y_scale * surface_aspect) * 0.5;
    let move_x = x as f32 / surface_w * 2.0;
    let move_y = -(y as f32 / surface_h * 2.0);
    let translate = Mat4::translate(-vertex_left + move_x, vertex_top + move_y, 0.0);

    let rotate = Mat4::rotate(Vec3::new(0.0, 0.0, 1.0), rotation_degrees);

    let matrix = Mat4::multiply(translate, aspect);
    let matrix = Mat4::multiply(matrix, rotate);
    Mat4::multiply(matrix, scale)
}

/// Builds the matrix mapping 0..1 UVs onto the sub-rectangle
/// `(x, y, width, height)` of a `texture_width` x `texture_height` atlas.
///
/// Computed as `translate * scale`. Atlas lookups are axis-aligned, so there
/// is no rotation term.
pub fn uv_matrix(
    texture_width: u32,
    texture_height: u32,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
) -> Mat4 {
    let texture_w = texture_width as f32;
    let texture_h = texture_height as f32;

    let scale = Mat4::scale(width as f32 / texture_w, height as f32 / texture_h, 0.0);
    let translate = Mat4::translate(x as f32 / texture_w, y as f32 / texture_h, 0.0);

    Mat4::multiply(translate, scale)
}

/// Corners of the model-space sprite quad: top-left, top-right,
/// bottom-left, bottom-right.
pub const QUAD_CORNERS: [Vec4; 4] = [
    Vec4 { x: -0.5, y: 0.5, z: 0.0, w: 1.0 },
    Vec4 { x: 0.5, y: 0.5, z: 0.0, w: 1.0 },
    Vec4 { x: -0.5, y: -0.5, z: 0.0, w: 1.0 },
    Vec4 { x: 0.5, y: -0.5, z: 0.0, w: 1.0 },
];

/// Corners of the UV square, in the same order as [`QUAD_CORNERS`].
pub const UV_CORNERS: [Vec4; 4] = [
    Vec4 { x: 0.0, y: 0.0, z: 0.0, w: 1.0 },
    Vec4 { x: 1.0, y: 0.0, z: 0.0, w: 1.0 },
    Vec4 { x: 0.0, y: 1.0, z: 0.0, w: 1.0 },
    Vec4 { x: 1.0, y: 1.0, z: 0.0, w: 1.0 },
];

/// A sprite drawn at a pixel rectangle of a render surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpritePlacement {
    pub surface_width: u32,
    pub surface_height: u32,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Clockwise rotation in degrees about the sprite center.
    #[serde(default)]
    pub rotation: f32,
}

impl SpritePlacement {
    /// Reads a placement from a loose JSON object.
    ///
    /// Missing keys take their value from `defaults`.
    pub fn from_json(params: &Value, defaults: SpritePlacement) -> Self {
        Self {
            surface_width: param_u32(params, "surface_width", defaults.surface_width),
            surface_height: param_u32(params, "surface_height", defaults.surface_height),
            x: param_i32(params, "x", defaults.x),
            y: param_i32(params, "y", defaults.y),
            width: param_i32(params, "width", defaults.width),
            height: param_i32(params, "height", defaults.height),
            rotation: param_f32(params, "rotation", defaults.rotation),
        }
    }

    /// See [`sprite_position_matrix`].
    pub fn position_matrix(&self) -> Mat4 {
        sprite_position_matrix(
            self.surface_width,
            self.surface_height,
            self.x,
            self.y,
            self.width,
            self.height,
            self.rotation,
        )
    }

    /// The quad corners transformed into normalized device coordinates.
    pub fn ndc_corners(&self) -> [Vec4; 4] {
        let m = self.position_matrix();
        QUAD_CORNERS.map(|c| m.transform(c))
    }
}

/// A rectangle inside a texture atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasRegion {
    pub texture_width: u32,
    pub texture_height: u32,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl AtlasRegion {
    /// Reads a region from a loose JSON object, falling back to `defaults`.
    pub fn from_json(params: &Value, defaults: AtlasRegion) -> Self {
        Self {
            texture_width: param_u32(params, "texture_width", defaults.texture_width),
            texture_height: param_u32(params, "texture_height", defaults.texture_height),
            x: param_i32(params, "x", defaults.x),
            y: param_i32(params, "y", defaults.y),
            width: param_i32(params, "width", defaults.width),
            height: param_i32(params, "height", defaults.height),
        }
    }

    /// See [`uv_matrix`].
    pub fn uv_matrix(&self) -> Mat4 {
        uv_matrix(
            self.texture_width,
            self.texture_height,
            self.x,
            self.y,
            self.width,
            self.height,
        )
    }

    /// The UV square corners mapped into the atlas.
    pub fn uv_corners(&self) -> [Vec4; 4] {
        let m = self.uv_matrix();
        UV_CORNERS.map(|c| m.transform(c))
    }
}
