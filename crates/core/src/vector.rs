//! Vector and 4x4 matrix math for 2D/3D transforms.
//!
//! [`Mat4`] stores its 16 values as four columns of four rows, indexed
//! `m[column][row]`. This is the layout a non-transposed
//! `glUniformMatrix4fv` upload expects, and it is public on purpose: shader
//! code that multiplies `vector * matrix` sees the transpose, and samples that
//! demonstrate that mismatch transpose explicitly with [`Mat4::transpose`].
//!
//! None of these functions validate their input. Normalizing a zero vector
//! yields NaN and rotating about a non-unit axis yields a skewed matrix.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::ops::Mul;

/// Converts degrees to radians with `f64` precision.
fn degrees_to_radians(degrees: f32) -> f64 {
    f64::from(degrees) * PI / 180.0
}

/// 2D vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 3D vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Creates the vector `(x, y, z)` scaled to unit length.
    ///
    /// `(0, 0, 0)` produces NaN components.
    pub fn new_normalized(x: f32, y: f32, z: f32) -> Self {
        Self::new(x, y, z).normalize()
    }

    /// Euclidean length. The sum of squares is accumulated in `f64` so large
    /// components do not overflow before the square root.
    pub fn length(self) -> f32 {
        let x = f64::from(self.x);
        let y = f64::from(self.y);
        let z = f64::from(self.z);
        (x * x + y * y + z * z).sqrt() as f32
    }

    /// Divides each component by [`length`](Self::length).
    ///
    /// The caller must pass a non-zero vector; a zero vector yields NaN.
    pub fn normalize(self) -> Self {
        let len = self.length();
        Self::new(self.x / len, self.y / len, self.z / len)
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }
}

/// Homogeneous 4D vector, the input and output of [`Mat4::transform`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// A point (`w = 1`) on the z = 0 plane.
    pub fn point2(x: f32, y: f32) -> Self {
        Self::new(x, y, 0.0, 1.0)
    }

    fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

/// 4x4 matrix stored column-major as `m[column][row]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mat4 {
    pub m: [[f32; 4]; 4],
}

/// How a translation matrix lays out its offset, as seen through `m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixLayout {
    /// Translation lives in `m[3][0..3]`: upload without transposing.
    Normal,
    /// Translation lives in `m[0..3][3]`: the matrix has been transposed.
    Transposed,
    /// Neither slot holds a non-zero offset.
    Unknown,
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    pub fn identity() -> Self {
        let mut m = [[0.0_f32; 4]; 4];
        for (i, column) in m.iter_mut().enumerate() {
            column[i] = 1.0;
        }
        Self { m }
    }

    /// Swaps `m[i][k]` with `m[k][i]`.
    pub fn transpose(self) -> Self {
        let mut m = [[0.0_f32; 4]; 4];
        for (i, column) in m.iter_mut().enumerate() {
            for (k, value) in column.iter_mut().enumerate() {
                *value = self.m[k][i];
            }
        }
        Self { m }
    }

    /// Translation by `(x, y, z)`, stored in the last column.
    pub fn translate(x: f32, y: f32, z: f32) -> Self {
        let mut result = Self::identity();
        result.m[3][0] = x;
        result.m[3][1] = y;
        result.m[3][2] = z;
        result
    }

    /// Scale with diagonal `(x, y, z, 1)`.
    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        let mut result = Self::identity();
        result.m[0][0] = x;
        result.m[1][1] = y;
        result.m[2][2] = z;
        result
    }

    /// Axis-angle rotation by `degrees` about `axis`.
    ///
    /// `axis` must be unit length. About the Z axis a positive angle turns
    /// +X toward -Y, which is clockwise on screen in normalized device
    /// coordinates.
    pub fn rotate(axis: Vec3, degrees: f32) -> Self {
        let Vec3 { x, y, z } = axis;
        let radians = degrees_to_radians(degrees);
        let c = radians.cos() as f32;
        let s = radians.sin() as f32;
        let t = 1.0 - c;

        Self {
            m: [
                [x * x * t + c, x * y * t - z * s, x * z * t + y * s, 0.0],
                [y * x * t + z * s, y * y * t + c, y * z * t - x * s, 0.0],
                [z * x * t - y * s, z * y * t + x * s, z * z * t + c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Returns `a * b`: applied to a vector, `b` acts first and `a` second.
    ///
    /// Sprite and SRT code depends on this order; swapping the operands
    /// produces a different transform with no error.
    pub fn multiply(a: Mat4, b: Mat4) -> Mat4 {
        let mut m = [[0.0_f32; 4]; 4];
        for (i, column) in m.iter_mut().enumerate() {
            for (j, value) in column.iter_mut().enumerate() {
                *value = a.m[0][j] * b.m[i][0]
                    + a.m[1][j] * b.m[i][1]
                    + a.m[2][j] * b.m[i][2]
                    + a.m[3][j] * b.m[i][3];
            }
        }
        Mat4 { m }
    }

    /// Applies the matrix to a column vector.
    pub fn transform(&self, v: Vec4) -> Vec4 {
        let v = v.to_array();
        let row = |r: usize| {
            self.m[0][r] * v[0] + self.m[1][r] * v[1] + self.m[2][r] * v[2] + self.m[3][r] * v[3]
        };
        Vec4::new(row(0), row(1), row(2), row(3))
    }

    /// The 16 values column by column, ready for a uniform upload.
    pub fn to_cols_array(&self) -> [f32; 16] {
        let mut out = [0.0_f32; 16];
        for (chunk, column) in out.chunks_exact_mut(4).zip(self.m.iter()) {
            chunk.copy_from_slice(column);
        }
        out
    }

    /// Inspects where a translation matrix keeps its offset.
    ///
    /// Only meaningful for matrices built by [`Mat4::translate`] (optionally
    /// transposed) with a non-zero offset.
    pub fn translation_layout(&self) -> MatrixLayout {
        if self.m[0][3] != 0.0 {
            MatrixLayout::Transposed
        } else if self.m[3][0] != 0.0 {
            MatrixLayout::Normal
        } else {
            MatrixLayout::Unknown
        }
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        Mat4::multiply(self, rhs)
    }
}

impl From<Mat4> for glam::Mat4 {
    fn from(value: Mat4) -> Self {
        glam::Mat4::from_cols_array_2d(&value.m)
    }
}

impl From<glam::Mat4> for Mat4 {
    fn from(value: glam::Mat4) -> Self {
        Mat4 {
            m: value.to_cols_array_2d(),
        }
    }
}
