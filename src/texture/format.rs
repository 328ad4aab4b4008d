//! Classification of sized internal formats, and the client data used to upload them.

use crate::gl;
use crate::version::{Api, Version};

/// How the texels of an internal format are stored and read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    /// Unsigned normalized, read back in `[0, 1]`.
    Normalized,
    /// Signed normalized, read back in `[-1, 1]`.
    SignedNormalized,
    /// Floating point.
    Float,
    /// Signed integer, read with `GL_RGBA_INTEGER`.
    SignedInt,
    /// Unsigned integer, read with `GL_RGBA_INTEGER`.
    UnsignedInt,
    /// Depth only.
    Depth,
    /// Packed depth and stencil.
    DepthStencil,
    /// Stencil only.
    Stencil,
}

/// Returns the kind of a sized internal format.
pub fn format_kind(internal_format: gl::types::GLenum) -> FormatKind {
    match internal_format {
        gl::R8_SNORM | gl::RG8_SNORM | gl::RGB8_SNORM | gl::RGBA8_SNORM | gl::R16_SNORM |
        gl::RG16_SNORM | gl::RGB16_SNORM | gl::RGBA16_SNORM => FormatKind::SignedNormalized,

        gl::R16F | gl::RG16F | gl::RGB16F | gl::RGBA16F | gl::R32F | gl::RG32F | gl::RGB32F |
        gl::RGBA32F | gl::R11F_G11F_B10F | gl::RGB9_E5 => FormatKind::Float,

        gl::R8I | gl::R16I | gl::R32I | gl::RG8I | gl::RG16I | gl::RG32I | gl::RGB8I |
        gl::RGB16I | gl::RGB32I | gl::RGBA8I | gl::RGBA16I | gl::RGBA32I => FormatKind::SignedInt,

        gl::R8UI | gl::R16UI | gl::R32UI | gl::RG8UI | gl::RG16UI | gl::RG32UI | gl::RGB8UI |
        gl::RGB16UI | gl::RGB32UI | gl::RGBA8UI | gl::RGBA16UI | gl::RGBA32UI |
        gl::RGB10_A2UI => FormatKind::UnsignedInt,

        gl::DEPTH_COMPONENT | gl::DEPTH_COMPONENT16 | gl::DEPTH_COMPONENT24 |
        gl::DEPTH_COMPONENT32 | gl::DEPTH_COMPONENT32F => FormatKind::Depth,

        gl::DEPTH_STENCIL | gl::DEPTH24_STENCIL8 | gl::DEPTH32F_STENCIL8 => FormatKind::DepthStencil,

        gl::STENCIL_INDEX | gl::STENCIL_INDEX8 => FormatKind::Stencil,

        _ => FormatKind::Normalized,
    }
}

/// Returns the number of color components of a color format, from 1 for `GL_R*` to 4.
pub fn component_count(internal_format: gl::types::GLenum) -> usize {
    match internal_format {
        gl::RED | gl::R8 | gl::R8_SNORM | gl::R16 | gl::R16_SNORM | gl::R16F | gl::R32F |
        gl::R8I | gl::R16I | gl::R32I | gl::R8UI | gl::R16UI | gl::R32UI => 1,

        gl::RG | gl::RG8 | gl::RG8_SNORM | gl::RG16 | gl::RG16_SNORM | gl::RG16F | gl::RG32F |
        gl::RG8I | gl::RG16I | gl::RG32I | gl::RG8UI | gl::RG16UI | gl::RG32UI => 2,

        gl::RGB | gl::R3_G3_B2 | gl::RGB4 | gl::RGB5 | gl::RGB565 | gl::RGB8 | gl::SRGB8 |
        gl::RGB10 | gl::RGB12 | gl::RGB16 | gl::RGB8_SNORM | gl::RGB16_SNORM | gl::RGB16F |
        gl::RGB32F | gl::R11F_G11F_B10F | gl::RGB9_E5 | gl::RGB8I | gl::RGB16I | gl::RGB32I |
        gl::RGB8UI | gl::RGB16UI | gl::RGB32UI => 3,

        _ => 4,
    }
}

/// Client data of a `glTexImage2D` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadFormat {
    /// Internal format passed to the call, unsized on OpenGL ES 2.0.
    pub internal_format: gl::types::GLenum,
    /// Format of the client data.
    pub format: gl::types::GLenum,
    /// Type of the client data.
    pub ty: gl::types::GLenum,
}

/// Returns the client format and type that upload texels of `internal_format`.
///
/// The format has as many components as the internal format and the type matches its
/// precision, which is the only combination OpenGL ES 3 accepts. Desktop GL converts from
/// floats, so normalized formats are uploaded as floats there. OpenGL ES 2.0 only has unsized
/// formats.
pub fn upload_format(version: &Version, internal_format: gl::types::GLenum) -> UploadFormat {
    let kind = format_kind(internal_format);
    let components = component_count(internal_format);
    let color_format = |integer| base_format(components, integer);

    let (format, ty) = match kind {
        FormatKind::Normalized if version.0 == Api::Gl => (gl::RGBA, gl::FLOAT),
        FormatKind::Normalized if internal_format == gl::RGB10_A2 =>
            (gl::RGBA, gl::UNSIGNED_INT_2_10_10_10_REV),
        FormatKind::Normalized => (color_format(false), gl::UNSIGNED_BYTE),
        FormatKind::SignedNormalized if version.0 == Api::Gl => (gl::RGBA, gl::FLOAT),
        FormatKind::SignedNormalized => (color_format(false), gl::BYTE),
        FormatKind::Float => (color_format(false), gl::FLOAT),
        FormatKind::SignedInt => (color_format(true), match integer_bits(internal_format) {
            8 => gl::BYTE,
            16 => gl::SHORT,
            _ => gl::INT,
        }),
        FormatKind::UnsignedInt if internal_format == gl::RGB10_A2UI =>
            (gl::RGBA_INTEGER, gl::UNSIGNED_INT_2_10_10_10_REV),
        FormatKind::UnsignedInt => (color_format(true), match integer_bits(internal_format) {
            8 => gl::UNSIGNED_BYTE,
            16 => gl::UNSIGNED_SHORT,
            _ => gl::UNSIGNED_INT,
        }),
        FormatKind::Depth if internal_format == gl::DEPTH_COMPONENT32F =>
            (gl::DEPTH_COMPONENT, gl::FLOAT),
        FormatKind::Depth => (gl::DEPTH_COMPONENT, gl::UNSIGNED_INT),
        FormatKind::DepthStencil if internal_format == gl::DEPTH32F_STENCIL8 =>
            (gl::DEPTH_STENCIL, gl::FLOAT_32_UNSIGNED_INT_24_8_REV),
        FormatKind::DepthStencil => (gl::DEPTH_STENCIL, gl::UNSIGNED_INT_24_8),
        FormatKind::Stencil => (gl::STENCIL_INDEX, gl::UNSIGNED_BYTE),
    };

    let internal_format = if version.0 == Api::GlEs && version < &Version(Api::GlEs, 3, 0) {
        match kind {
            FormatKind::Depth => gl::DEPTH_COMPONENT,
            FormatKind::DepthStencil => gl::DEPTH_STENCIL,
            _ => format,
        }
    } else {
        internal_format
    };

    UploadFormat { internal_format, format, ty }
}

fn base_format(components: usize, integer: bool) -> gl::types::GLenum {
    match (components, integer) {
        (1, false) => gl::RED,
        (2, false) => gl::RG,
        (3, false) => gl::RGB,
        (_, false) => gl::RGBA,
        (1, true) => gl::RED_INTEGER,
        (2, true) => gl::RG_INTEGER,
        (3, true) => gl::RGB_INTEGER,
        (_, true) => gl::RGBA_INTEGER,
    }
}

/// Size of the components of an integer format.
fn integer_bits(internal_format: gl::types::GLenum) -> u32 {
    match internal_format {
        gl::R8I | gl::RG8I | gl::RGB8I | gl::RGBA8I | gl::R8UI | gl::RG8UI | gl::RGB8UI |
        gl::RGBA8UI => 8,
        gl::R16I | gl::RG16I | gl::RGB16I | gl::RGBA16I | gl::R16UI | gl::RG16UI | gl::RGB16UI |
        gl::RGBA16UI => 16,
        _ => 32,
    }
}

/// Converts RGBA texels to the client data described by `format` and `ty`.
///
/// Single component formats take the red channel. Integer formats take the values as they
/// are, rounded. A depth-stencil texel takes its depth from red and its stencil from green.
pub fn pack_texels(texels: &[[f32; 4]], format: gl::types::GLenum, ty: gl::types::GLenum)
                   -> Vec<u8>
{
    let components = match format {
        gl::RED | gl::RED_INTEGER | gl::DEPTH_COMPONENT | gl::STENCIL_INDEX => 1,
        gl::RG | gl::RG_INTEGER | gl::DEPTH_STENCIL => 2,
        gl::RGB | gl::RGB_INTEGER => 3,
        _ => 4,
    };
    let integer = matches!(format, gl::RED_INTEGER | gl::RG_INTEGER | gl::RGB_INTEGER |
                                   gl::RGBA_INTEGER | gl::STENCIL_INDEX);

    let unorm = |v: f32, max: f64| (f64::from(v.clamp(0.0, 1.0)) * max).round();
    let snorm = |v: f32, max: f64| (f64::from(v.clamp(-1.0, 1.0)) * max).round();

    let mut data = Vec::with_capacity(texels.len() * components * 4);

    for texel in texels {
        match ty {
            gl::UNSIGNED_INT_24_8 => {
                let depth = unorm(texel[0], f64::from(0xff_ffffu32)) as u32;
                let stencil = texel[1].round().clamp(0.0, 255.0) as u32;
                data.extend_from_slice(&(depth << 8 | stencil).to_ne_bytes());
            },
            gl::FLOAT_32_UNSIGNED_INT_24_8_REV => {
                let stencil = texel[1].round().clamp(0.0, 255.0) as u32;
                data.extend_from_slice(&texel[0].to_ne_bytes());
                data.extend_from_slice(&stencil.to_ne_bytes());
            },
            gl::UNSIGNED_INT_2_10_10_10_REV => {
                let channel = |i: usize, max: u32| if integer {
                    texel[i].round().clamp(0.0, max as f32) as u32
                } else {
                    unorm(texel[i], f64::from(max)) as u32
                };
                let packed = channel(0, 1023) | channel(1, 1023) << 10 | channel(2, 1023) << 20 |
                             channel(3, 3) << 30;
                data.extend_from_slice(&packed.to_ne_bytes());
            },
            _ => for &v in &texel[.. components] {
                match ty {
                    gl::UNSIGNED_BYTE if integer => data.push(v.round().clamp(0.0, 255.0) as u8),
                    gl::UNSIGNED_BYTE => data.push(unorm(v, 255.0) as u8),
                    gl::BYTE if integer => data.push(v.round().clamp(-128.0, 127.0) as i8 as u8),
                    gl::BYTE => data.push(snorm(v, 127.0) as i8 as u8),
                    gl::UNSIGNED_SHORT if integer => {
                        data.extend_from_slice(&(v.round().clamp(0.0, 65535.0) as u16).to_ne_bytes())
                    },
                    gl::UNSIGNED_SHORT => {
                        data.extend_from_slice(&(unorm(v, 65535.0) as u16).to_ne_bytes())
                    },
                    gl::SHORT => data.extend_from_slice(&(v.round() as i16).to_ne_bytes()),
                    gl::UNSIGNED_INT if integer => {
                        data.extend_from_slice(&(v.round() as u32).to_ne_bytes())
                    },
                    gl::UNSIGNED_INT => {
                        data.extend_from_slice(&(unorm(v, f64::from(u32::MAX)) as u32).to_ne_bytes())
                    },
                    gl::INT => data.extend_from_slice(&(v.round() as i32).to_ne_bytes()),
                    _ => data.extend_from_slice(&v.to_ne_bytes()),
                }
            },
        }
    }

    data
}

/// Returns the number of bits of the red, green, blue and alpha channels of a color format.
///
/// A channel that the format lacks has 0 bits. Returns `None` for formats that aren't
/// normalized colors.
pub fn color_bits(internal_format: gl::types::GLenum) -> Option<[u8; 4]> {
    Some(match internal_format {
        gl::R8 => [8, 0, 0, 0],
        gl::RG8 => [8, 8, 0, 0],
        gl::R16 => [16, 0, 0, 0],
        gl::RG16 => [16, 16, 0, 0],
        gl::R3_G3_B2 => [3, 3, 2, 0],
        gl::RGB4 => [4, 4, 4, 0],
        gl::RGB5 => [5, 5, 5, 0],
        gl::RGB565 => [5, 6, 5, 0],
        gl::RGB8 | gl::SRGB8 => [8, 8, 8, 0],
        gl::RGB10 => [10, 10, 10, 0],
        gl::RGB12 => [12, 12, 12, 0],
        gl::RGB16 => [16, 16, 16, 0],
        gl::RGBA2 => [2, 2, 2, 2],
        gl::RGBA4 => [4, 4, 4, 4],
        gl::RGB5_A1 => [5, 5, 5, 1],
        gl::RGBA8 | gl::SRGB8_ALPHA8 => [8, 8, 8, 8],
        gl::RGB10_A2 => [10, 10, 10, 2],
        gl::RGBA12 => [12, 12, 12, 12],
        gl::RGBA16 => [16, 16, 16, 16],
        gl::ALPHA8 => [0, 0, 0, 8],
        _ => return None,
    })
}

/// Computes the value read back from a color buffer of the given format after clearing it
/// to `color`.
///
/// Returns `None` for formats that aren't normalized colors.
pub fn expected_clear_color(internal_format: gl::types::GLenum, color: [f32; 4])
                            -> Option<[f32; 4]>
{
    color_bits(internal_format).map(|bits| clear_color_for_bits(bits, color))
}

/// Quantizes `color` to a buffer with the given channel sizes.
///
/// Missing color channels read as 0 and a missing alpha as 1.
pub fn clear_color_for_bits(bits: [u8; 4], color: [f32; 4]) -> [f32; 4] {
    let mut expected = [0.0, 0.0, 0.0, 1.0];
    for (channel, &bits) in bits.iter().enumerate() {
        if bits > 0 {
            expected[channel] = crate::reference::quantize_unorm(color[channel], bits);
        }
    }
    expected
}

#[cfg(test)]
mod tests {
    use super::{color_bits, component_count, expected_clear_color, format_kind, pack_texels,
                upload_format, FormatKind, UploadFormat};
    use crate::gl;
    use crate::version::{Api, Version};

    const GL_3_0: Version = Version(Api::Gl, 3, 0);
    const ES_2_0: Version = Version(Api::GlEs, 2, 0);
    const ES_3_0: Version = Version(Api::GlEs, 3, 0);

    fn upload(internal_format: gl::types::GLenum, format: gl::types::GLenum,
              ty: gl::types::GLenum) -> UploadFormat
    {
        UploadFormat { internal_format, format, ty }
    }

    fn words(data: &[u8]) -> Vec<u32> {
        data.chunks(4).map(|c| u32::from_ne_bytes([c[0], c[1], c[2], c[3]])).collect()
    }

    #[test]
    fn kinds() {
        assert_eq!(format_kind(gl::RGBA8), FormatKind::Normalized);
        assert_eq!(format_kind(gl::RGBA16F), FormatKind::Float);
        assert_eq!(format_kind(gl::RGBA32UI), FormatKind::UnsignedInt);
        assert_eq!(format_kind(gl::DEPTH24_STENCIL8), FormatKind::DepthStencil);
        assert_eq!(component_count(gl::R32I), 1);
        assert_eq!(component_count(gl::RGB565), 3);
        assert_eq!(component_count(gl::RGBA16F), 4);
    }

    #[test]
    fn desktop_uploads() {
        assert_eq!(upload_format(&GL_3_0, gl::RGBA8), upload(gl::RGBA8, gl::RGBA, gl::FLOAT));
        assert_eq!(upload_format(&GL_3_0, gl::R8), upload(gl::R8, gl::RGBA, gl::FLOAT));
        assert_eq!(upload_format(&GL_3_0, gl::RG32F), upload(gl::RG32F, gl::RG, gl::FLOAT));
        assert_eq!(upload_format(&GL_3_0, gl::R32I), upload(gl::R32I, gl::RED_INTEGER, gl::INT));
        assert_eq!(upload_format(&GL_3_0, gl::RGBA8UI),
                   upload(gl::RGBA8UI, gl::RGBA_INTEGER, gl::UNSIGNED_BYTE));
        assert_eq!(upload_format(&GL_3_0, gl::DEPTH_COMPONENT24),
                   upload(gl::DEPTH_COMPONENT24, gl::DEPTH_COMPONENT, gl::UNSIGNED_INT));
        assert_eq!(upload_format(&GL_3_0, gl::DEPTH24_STENCIL8),
                   upload(gl::DEPTH24_STENCIL8, gl::DEPTH_STENCIL, gl::UNSIGNED_INT_24_8));
    }

    #[test]
    fn es_uploads() {
        // the format of sized normalized formats must match their components on ES 3
        assert_eq!(upload_format(&ES_3_0, gl::RGBA8), upload(gl::RGBA8, gl::RGBA, gl::UNSIGNED_BYTE));
        assert_eq!(upload_format(&ES_3_0, gl::RGB8), upload(gl::RGB8, gl::RGB, gl::UNSIGNED_BYTE));
        assert_eq!(upload_format(&ES_3_0, gl::RG8), upload(gl::RG8, gl::RG, gl::UNSIGNED_BYTE));
        assert_eq!(upload_format(&ES_3_0, gl::R8), upload(gl::R8, gl::RED, gl::UNSIGNED_BYTE));
        assert_eq!(upload_format(&ES_3_0, gl::RGB10_A2),
                   upload(gl::RGB10_A2, gl::RGBA, gl::UNSIGNED_INT_2_10_10_10_REV));
        assert_eq!(upload_format(&ES_3_0, gl::R16I), upload(gl::R16I, gl::RED_INTEGER, gl::SHORT));

        assert_eq!(upload_format(&ES_2_0, gl::RGBA8), upload(gl::RGBA, gl::RGBA, gl::UNSIGNED_BYTE));
        assert_eq!(upload_format(&ES_2_0, gl::RGB565), upload(gl::RGB, gl::RGB, gl::UNSIGNED_BYTE));
    }

    #[test]
    fn packed_normalized() {
        let texels = [[1.0, 0.5, 0.0, 1.0], [0.0, 1.0, 2.0, -1.0]];
        assert_eq!(pack_texels(&texels, gl::RGBA, gl::UNSIGNED_BYTE),
                   vec![255, 128, 0, 255, 0, 255, 255, 0]);
        assert_eq!(pack_texels(&texels, gl::RG, gl::UNSIGNED_BYTE), vec![255, 128, 0, 255]);
        assert_eq!(pack_texels(&texels, gl::RED, gl::BYTE), vec![127, 0]);

        let floats = pack_texels(&texels[.. 1], gl::RGB, gl::FLOAT);
        assert_eq!(floats.len(), 12);
        assert_eq!(&floats[4 .. 8], &0.5f32.to_ne_bytes());
    }

    #[test]
    fn packed_integers() {
        let texels = [[3.0, -2.0, 70000.0, 1.0]];
        assert_eq!(words(&pack_texels(&texels, gl::RGBA_INTEGER, gl::INT)),
                   vec![3, -2i32 as u32, 70000, 1]);
        assert_eq!(words(&pack_texels(&texels, gl::RED_INTEGER, gl::UNSIGNED_INT)), vec![3]);
        assert_eq!(pack_texels(&texels, gl::RG_INTEGER, gl::BYTE), vec![3, -2i8 as u8]);
    }

    #[test]
    fn packed_depth() {
        let texels = [[1.0, 0.0, 0.0, 1.0], [0.5, 7.0, 0.0, 1.0]];
        assert_eq!(words(&pack_texels(&texels, gl::DEPTH_COMPONENT, gl::UNSIGNED_INT)),
                   vec![u32::MAX, 2147483648]);
        assert_eq!(words(&pack_texels(&texels, gl::DEPTH_STENCIL, gl::UNSIGNED_INT_24_8)),
                   vec![0xffffff00, 0x80000007]);
        assert_eq!(pack_texels(&texels, gl::DEPTH_COMPONENT, gl::FLOAT).len(), 8);
    }

    #[test]
    fn packed_10_10_10_2() {
        let texels = [[1.0, 0.0, 1.0, 1.0]];
        assert_eq!(words(&pack_texels(&texels, gl::RGBA, gl::UNSIGNED_INT_2_10_10_10_REV)),
                   vec![1023 | 1023 << 20 | 3 << 30]);
    }

    #[test]
    fn clear_colors() {
        assert_eq!(color_bits(gl::RGB565), Some([5, 6, 5, 0]));
        assert_eq!(color_bits(gl::RGBA32F), None);

        assert_eq!(expected_clear_color(gl::RG8, [1.0, 0.0, 1.0, 0.0]),
                   Some([1.0, 0.0, 0.0, 1.0]));
        assert_eq!(expected_clear_color(gl::RGB5_A1, [0.0, 1.0, 0.0, 0.4]),
                   Some([0.0, 1.0, 0.0, 0.0]));
    }
}
