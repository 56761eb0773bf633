//! GL upload helpers for parsed textures and sprite matrices.
//!
//! This module is only available when the `render` feature is enabled. It
//! never creates a context: callers pass in a current `glow::Context`.

use crate::compressed::CompressedTexture;
use crate::container::ContainerKind;
use crate::pixel::RawPixelImage;
use es20kit_core::texture::PixelFormat;
use es20kit_core::vector::Mat4;

/// Returns the `(format, type)` pair for `glTexImage2D` for a raw layout.
pub fn raw_upload_format(format: PixelFormat) -> (u32, u32) {
    match format {
        PixelFormat::Rgba8 => (glow::RGBA, glow::UNSIGNED_BYTE),
        PixelFormat::Rgb8 => (glow::RGB, glow::UNSIGNED_BYTE),
        PixelFormat::Rgba5551 => (glow::RGBA, glow::UNSIGNED_SHORT_5_5_5_1),
        PixelFormat::Rgb565 => (glow::RGB, glow::UNSIGNED_SHORT_5_6_5),
    }
}

/// Minification filter: mipmapped nearest when more than one level exists.
pub fn min_filter_for(mip_count: usize) -> u32 {
    if mip_count > 1 {
        glow::NEAREST_MIPMAP_NEAREST
    } else {
        glow::NEAREST
    }
}

/// Wrap mode for a texture source. `None` is a raw pixel upload.
///
/// KTX and PVRTC textures are power-of-two and repeat; PKM and raw images
/// may be any size and clamp.
pub fn wrap_mode_for(container: Option<ContainerKind>) -> u32 {
    match container {
        Some(ContainerKind::Ktx) | Some(ContainerKind::Pvrtc) => glow::REPEAT,
        Some(ContainerKind::Pkm) | None => glow::CLAMP_TO_EDGE,
    }
}

#[allow(unsafe_code)]
fn set_sampler(gl: &glow::Context, wrap: u32, min_filter: u32) {
    use glow::HasContext;

    // SAFETY: a texture is bound to TEXTURE_2D by the caller and all
    // parameter values are valid GL enums.
    unsafe {
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, wrap as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, wrap as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, min_filter as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::NEAREST as i32);
    }
}

/// Creates a texture and uploads every mip level of a compressed image.
///
/// # Errors
///
/// Returns an error string if the GL context fails to create the texture.
#[allow(unsafe_code)]
pub fn upload_compressed(
    gl: &glow::Context,
    image: &dyn CompressedTexture,
) -> Result<glow::Texture, String> {
    use glow::HasContext;

    let container = ContainerKind::from_name(image.container()).ok();
    let internal_format = image.format().gl_internal_format() as i32;

    // SAFETY: glow wraps raw GL calls as unsafe. Each level slice lives in the
    // image buffer for the duration of the call and its length is the
    // image_size passed to GL.
    let texture = unsafe { gl.create_texture()? };
    unsafe {
        gl.bind_texture(glow::TEXTURE_2D, Some(texture));
        set_sampler(gl, wrap_mode_for(container), min_filter_for(image.mip_count()));
        for mip in image.mip_levels() {
            log::debug!(
                "upload level {} ({} x {}) {} bytes",
                mip.level,
                mip.width,
                mip.height,
                mip.data.len()
            );
            gl.compressed_tex_image_2d(
                glow::TEXTURE_2D,
                mip.level as i32,
                internal_format,
                mip.width as i32,
                mip.height as i32,
                0,
                mip.data.len() as i32,
                mip.data,
            );
        }
        gl.bind_texture(glow::TEXTURE_2D, None);
    }

    Ok(texture)
}

/// Creates a texture from a converted raw image, optionally generating mipmaps.
///
/// # Errors
///
/// Returns an error string if the GL context fails to create the texture.
#[allow(unsafe_code)]
pub fn upload_raw(
    gl: &glow::Context,
    image: &RawPixelImage,
    generate_mipmaps: bool,
) -> Result<glow::Texture, String> {
    use glow::HasContext;

    let (format, ty) = raw_upload_format(image.format);
    let min_filter = if generate_mipmaps {
        glow::NEAREST_MIPMAP_NEAREST
    } else {
        glow::NEAREST
    };

    // SAFETY: glow wraps raw GL calls as unsafe. The pixel slice holds
    // width * height tightly packed pixels of the declared format/type.
    let texture = unsafe { gl.create_texture()? };
    unsafe {
        gl.bind_texture(glow::TEXTURE_2D, Some(texture));
        set_sampler(gl, wrap_mode_for(None), min_filter);
        gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            format as i32,
            image.width as i32,
            image.height as i32,
            0,
            format,
            ty,
            glow::PixelUnpackData::Slice(Some(&image.pixels)),
        );
        if generate_mipmaps {
            gl.generate_mipmap(glow::TEXTURE_2D);
        }
        gl.bind_texture(glow::TEXTURE_2D, None);
    }

    Ok(texture)
}

/// Sets a `mat4` uniform on the current program.
///
/// The matrix is always sent column-major; `transpose` is forwarded to GL.
/// ES 2.0 requires `false`.
#[allow(unsafe_code)]
pub fn upload_matrix(
    gl: &glow::Context,
    location: Option<&glow::UniformLocation>,
    matrix: &Mat4,
    transpose: bool,
) {
    use glow::HasContext;

    // SAFETY: the slice is 16 floats and outlives the call.
    unsafe {
        gl.uniform_matrix_4_f32_slice(location, transpose, &matrix.to_cols_array());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_upload_format_covers_every_layout() {
        assert_eq!(
            raw_upload_format(PixelFormat::Rgba8),
            (glow::RGBA, glow::UNSIGNED_BYTE)
        );
        assert_eq!(
            raw_upload_format(PixelFormat::Rgb8),
            (glow::RGB, glow::UNSIGNED_BYTE)
        );
        assert_eq!(
            raw_upload_format(PixelFormat::Rgba5551),
            (glow::RGBA, glow::UNSIGNED_SHORT_5_5_5_1)
        );
        assert_eq!(
            raw_upload_format(PixelFormat::Rgb565),
            (glow::RGB, glow::UNSIGNED_SHORT_5_6_5)
        );
    }

    #[test]
    fn min_filter_uses_mipmaps_only_with_levels() {
        assert_eq!(min_filter_for(1), glow::NEAREST);
        assert_eq!(min_filter_for(0), glow::NEAREST);
        assert_eq!(min_filter_for(5), glow::NEAREST_MIPMAP_NEAREST);
    }

    #[test]
    fn wrap_mode_repeats_power_of_two_containers() {
        assert_eq!(wrap_mode_for(Some(ContainerKind::Ktx)), glow::REPEAT);
        assert_eq!(wrap_mode_for(Some(ContainerKind::Pvrtc)), glow::REPEAT);
        assert_eq!(wrap_mode_for(Some(ContainerKind::Pkm)), glow::CLAMP_TO_EDGE);
        assert_eq!(wrap_mode_for(None), glow::CLAMP_TO_EDGE);
    }
}
