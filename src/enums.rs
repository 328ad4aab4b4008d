//! Names of GL enums, for diagnostics and for test arguments such as format names.

use fnv::FnvHashMap;

use crate::gl;

macro_rules! enum_table {
    ($($name:ident),+ $(,)*) => {
        &[$((gl::$name, concat!("GL_", stringify!($name)))),+]
    };
}

/// Every known enum along with its name.
///
/// Several names share a value (`GL_ZERO`, `GL_NONE`, `GL_POINTS`, `GL_NO_ERROR`, ...), the
/// first one listed is the one reported by `enum_name`.
static ENUMS: &[(gl::types::GLenum, &str)] = enum_table![
    // errors
    NO_ERROR, INVALID_ENUM, INVALID_VALUE, INVALID_OPERATION, STACK_OVERFLOW,
    STACK_UNDERFLOW, OUT_OF_MEMORY, INVALID_FRAMEBUFFER_OPERATION, CONTEXT_LOST,

    // boolean-like and blending factors
    ONE, SRC_COLOR, ONE_MINUS_SRC_COLOR, SRC_ALPHA, ONE_MINUS_SRC_ALPHA, DST_ALPHA,
    ONE_MINUS_DST_ALPHA, DST_COLOR, ONE_MINUS_DST_COLOR, SRC_ALPHA_SATURATE,
    CONSTANT_COLOR, ONE_MINUS_CONSTANT_COLOR, CONSTANT_ALPHA, ONE_MINUS_CONSTANT_ALPHA,
    FUNC_ADD, FUNC_SUBTRACT, FUNC_REVERSE_SUBTRACT, MIN, MAX,

    // primitives
    POINTS, LINES, LINE_LOOP, LINE_STRIP, TRIANGLES, TRIANGLE_STRIP, TRIANGLE_FAN,
    LINES_ADJACENCY, LINE_STRIP_ADJACENCY, TRIANGLES_ADJACENCY, TRIANGLE_STRIP_ADJACENCY,
    PATCHES,

    // buffers
    FRONT, BACK, FRONT_LEFT, BACK_LEFT, FRONT_AND_BACK, COLOR, DEPTH, STENCIL,

    // framebuffer objects
    FRAMEBUFFER, READ_FRAMEBUFFER, DRAW_FRAMEBUFFER, RENDERBUFFER,
    FRAMEBUFFER_COMPLETE, FRAMEBUFFER_UNDEFINED, FRAMEBUFFER_INCOMPLETE_ATTACHMENT,
    FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT, FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER,
    FRAMEBUFFER_INCOMPLETE_READ_BUFFER, FRAMEBUFFER_UNSUPPORTED,
    FRAMEBUFFER_INCOMPLETE_MULTISAMPLE, FRAMEBUFFER_INCOMPLETE_LAYER_TARGETS,
    COLOR_ATTACHMENT0, COLOR_ATTACHMENT1, COLOR_ATTACHMENT2, COLOR_ATTACHMENT3,
    COLOR_ATTACHMENT4, COLOR_ATTACHMENT5, COLOR_ATTACHMENT6, COLOR_ATTACHMENT7,
    DEPTH_ATTACHMENT, STENCIL_ATTACHMENT, DEPTH_STENCIL_ATTACHMENT,

    // texture targets
    TEXTURE_1D, TEXTURE_2D, TEXTURE_3D, TEXTURE_1D_ARRAY, TEXTURE_2D_ARRAY,
    TEXTURE_RECTANGLE, TEXTURE_CUBE_MAP, TEXTURE_CUBE_MAP_ARRAY, TEXTURE_BUFFER,
    TEXTURE_2D_MULTISAMPLE, TEXTURE_2D_MULTISAMPLE_ARRAY,

    // sized internal formats
    R8, R8_SNORM, R16, R16_SNORM, RG8, RG8_SNORM, RG16, RG16_SNORM, R3_G3_B2, RGB4, RGB5,
    RGB565, RGB8, RGB8_SNORM, RGB10, RGB12, RGB16, RGB16_SNORM, RGBA2, RGBA4, RGB5_A1,
    RGBA8, RGBA8_SNORM, RGB10_A2, RGB10_A2UI, RGBA12, RGBA16, RGBA16_SNORM, SRGB8,
    SRGB8_ALPHA8, R16F, RG16F, RGB16F, RGBA16F, R32F, RG32F, RGB32F, RGBA32F,
    R11F_G11F_B10F, RGB9_E5, R8I, R8UI, R16I, R16UI, R32I, R32UI, RG8I, RG8UI, RG16I,
    RG16UI, RG32I, RG32UI, RGB8I, RGB8UI, RGB16I, RGB16UI, RGB32I, RGB32UI, RGBA8I,
    RGBA8UI, RGBA16I, RGBA16UI, RGBA32I, RGBA32UI, ALPHA8, LUMINANCE8, LUMINANCE8_ALPHA8,
    INTENSITY8, DEPTH_COMPONENT16, DEPTH_COMPONENT24, DEPTH_COMPONENT32,
    DEPTH_COMPONENT32F, DEPTH24_STENCIL8, DEPTH32F_STENCIL8, STENCIL_INDEX8,

    // pixel formats
    RED, GREEN, BLUE, ALPHA, RG, RGB, RGBA, BGR, BGRA, LUMINANCE, LUMINANCE_ALPHA,
    INTENSITY, RED_INTEGER, RG_INTEGER, RGB_INTEGER, RGBA_INTEGER, BGRA_INTEGER,
    DEPTH_COMPONENT, STENCIL_INDEX, DEPTH_STENCIL,

    // pixel types
    BYTE, UNSIGNED_BYTE, SHORT, UNSIGNED_SHORT, INT, UNSIGNED_INT, HALF_FLOAT, FLOAT,
    DOUBLE, UNSIGNED_BYTE_3_3_2, UNSIGNED_SHORT_5_6_5, UNSIGNED_SHORT_4_4_4_4,
    UNSIGNED_SHORT_5_5_5_1, UNSIGNED_INT_8_8_8_8, UNSIGNED_INT_8_8_8_8_REV,
    UNSIGNED_INT_2_10_10_10_REV, UNSIGNED_INT_24_8, UNSIGNED_INT_10F_11F_11F_REV,
    UNSIGNED_INT_5_9_9_9_REV, FLOAT_32_UNSIGNED_INT_24_8_REV,

    // shaders
    VERTEX_SHADER, FRAGMENT_SHADER, GEOMETRY_SHADER, TESS_CONTROL_SHADER,
    TESS_EVALUATION_SHADER, COMPUTE_SHADER,

    // texture parameters
    NEAREST, LINEAR, NEAREST_MIPMAP_NEAREST, LINEAR_MIPMAP_NEAREST, NEAREST_MIPMAP_LINEAR,
    LINEAR_MIPMAP_LINEAR, TEXTURE_SWIZZLE_R, TEXTURE_SWIZZLE_G, TEXTURE_SWIZZLE_B,
    TEXTURE_SWIZZLE_A, TEXTURE_SWIZZLE_RGBA,

    // debug output
    DEBUG_SOURCE_API, DEBUG_SOURCE_WINDOW_SYSTEM, DEBUG_SOURCE_SHADER_COMPILER,
    DEBUG_SOURCE_THIRD_PARTY, DEBUG_SOURCE_APPLICATION, DEBUG_SOURCE_OTHER,
    DEBUG_TYPE_ERROR, DEBUG_TYPE_DEPRECATED_BEHAVIOR, DEBUG_TYPE_UNDEFINED_BEHAVIOR,
    DEBUG_TYPE_PORTABILITY, DEBUG_TYPE_PERFORMANCE, DEBUG_TYPE_MARKER, DEBUG_TYPE_OTHER,
    DEBUG_SEVERITY_HIGH, DEBUG_SEVERITY_MEDIUM, DEBUG_SEVERITY_LOW,
    DEBUG_SEVERITY_NOTIFICATION,
];

lazy_static! {
    static ref NAME_BY_VALUE: FnvHashMap<gl::types::GLenum, &'static str> = {
        let mut map = FnvHashMap::default();
        for &(value, name) in ENUMS {
            map.entry(value).or_insert(name);
        }
        map
    };

    static ref VALUE_BY_NAME: FnvHashMap<&'static str, gl::types::GLenum> = {
        ENUMS.iter().map(|&(value, name)| (name, value)).collect()
    };
}

/// Returns the name of an enum, eg. `"GL_RGBA8"` for `0x8058`.
pub fn enum_name(value: gl::types::GLenum) -> &'static str {
    NAME_BY_VALUE.get(&value).copied().unwrap_or("(unrecognized enum)")
}

/// Returns the value of an enum from its name.
///
/// The `GL_` prefix is optional and the lookup is case-sensitive, so `"RGBA8"` and
/// `"GL_RGBA8"` both work.
pub fn enum_from_name(name: &str) -> Option<gl::types::GLenum> {
    if let Some(&value) = VALUE_BY_NAME.get(name) {
        return Some(value);
    }

    VALUE_BY_NAME.get(&format!("GL_{}", name)[..]).copied()
}

/// Returns the name of a primitive type.
pub fn prim_name(prim: gl::types::GLenum) -> &'static str {
    match prim {
        gl::POINTS => "GL_POINTS",
        gl::LINES => "GL_LINES",
        gl::LINE_LOOP => "GL_LINE_LOOP",
        gl::LINE_STRIP => "GL_LINE_STRIP",
        gl::TRIANGLES => "GL_TRIANGLES",
        gl::TRIANGLE_STRIP => "GL_TRIANGLE_STRIP",
        gl::TRIANGLE_FAN => "GL_TRIANGLE_FAN",
        gl::LINES_ADJACENCY => "GL_LINES_ADJACENCY",
        gl::LINE_STRIP_ADJACENCY => "GL_LINE_STRIP_ADJACENCY",
        gl::TRIANGLES_ADJACENCY => "GL_TRIANGLES_ADJACENCY",
        gl::TRIANGLE_STRIP_ADJACENCY => "GL_TRIANGLE_STRIP_ADJACENCY",
        gl::PATCHES => "GL_PATCHES",
        _ => "(unrecognized enum)",
    }
}

#[cfg(test)]
mod tests {
    use super::{enum_from_name, enum_name, prim_name};
    use crate::gl;

    #[test]
    fn names_of_values() {
        assert_eq!(enum_name(gl::RGBA8), "GL_RGBA8");
        assert_eq!(enum_name(gl::FRAMEBUFFER_UNSUPPORTED), "GL_FRAMEBUFFER_UNSUPPORTED");
        assert_eq!(enum_name(0xdead_beef), "(unrecognized enum)");
    }

    #[test]
    fn shared_values_use_the_first_name() {
        assert_eq!(enum_name(0), "GL_NO_ERROR");
        assert_eq!(enum_name(1), "GL_ONE");
        assert_eq!(prim_name(0), "GL_POINTS");
    }

    #[test]
    fn values_of_names() {
        assert_eq!(enum_from_name("GL_RGB565"), Some(gl::RGB565));
        assert_eq!(enum_from_name("RGB10_A2"), Some(gl::RGB10_A2));
        assert_eq!(enum_from_name("GL_NOT_AN_ENUM"), None);
        assert_eq!(enum_from_name("rgba8"), None);
    }
}
