use crate::gl;
use crate::version::Api;
use crate::version::Version;

/// Represents the capabilities of the context.
#[derive(Debug, Clone)]
pub struct Capabilities {
    /// Number of bits of the red, green, blue and alpha channels of the default framebuffer.
    pub color_bits: [u8; 4],

    /// Number of bits in the default framebuffer's depth buffer.
    pub depth_bits: u8,

    /// Number of bits in the default framebuffer's stencil buffer.
    pub stencil_bits: u8,

    /// Number of samples of the default framebuffer. `0` if it isn't multisampled.
    pub samples: u8,

    /// Whether the context is a core profile context.
    pub core_profile: bool,

    /// Whether the context is a forward-compatible context.
    pub forward_compatible: bool,

    /// Whether the context was created with `GL_KHR_no_error`, in which case `glGetError`
    /// may report nothing.
    pub no_error: bool,

    /// Maximum number of elements that can be passed with `glDrawBuffers`.
    pub max_draw_buffers: gl::types::GLint,

    /// Maximum number of color attachments of a framebuffer object.
    pub max_color_attachments: gl::types::GLint,

    /// Maximum width and height of a 2D texture.
    pub max_texture_size: gl::types::GLint,

    /// Maximum number of samples of a multisample renderbuffer. `0` if not supported.
    pub max_samples: gl::types::GLint,

    /// Maximum width and height of `glViewport`.
    pub max_viewport_dims: (gl::types::GLint, gl::types::GLint),

    /// Maximum number of textures that can be bound to a program.
    pub max_combined_texture_image_units: gl::types::GLint,
}

/// Loads the capabilities.
///
/// *Safety*: the OpenGL context corresponding to `gl` must be current in the thread.
pub unsafe fn get_capabilities(gl: &gl::Gl, version: &Version) -> Capabilities {
    let flags = if version >= &Version(Api::Gl, 3, 0) || version >= &Version(Api::GlEs, 3, 2) {
        let mut flags = 0;
        gl.GetIntegerv(gl::CONTEXT_FLAGS, &mut flags);
        flags as gl::types::GLenum
    } else {
        0
    };

    let core_profile = if version >= &Version(Api::Gl, 3, 2) {
        let mut mask = 0;
        gl.GetIntegerv(gl::CONTEXT_PROFILE_MASK, &mut mask);
        (mask as gl::types::GLenum & gl::CONTEXT_CORE_PROFILE_BIT) != 0
    } else {
        false
    };

    let (color_bits, depth_bits, stencil_bits) = get_default_framebuffer_bits(gl, version);

    Capabilities {
        color_bits,
        depth_bits,
        stencil_bits,

        samples: {
            let mut val = 0;
            gl.GetIntegerv(gl::SAMPLES, &mut val);
            val.max(0) as u8
        },

        core_profile,
        forward_compatible: version.0 == Api::Gl &&
                            (flags & gl::CONTEXT_FLAG_FORWARD_COMPATIBLE_BIT) != 0,
        no_error: (flags & gl::CONTEXT_FLAG_NO_ERROR_BIT) != 0,

        max_draw_buffers: if version >= &Version(Api::Gl, 2, 0) ||
                             version >= &Version(Api::GlEs, 3, 0)
        {
            let mut val = 1;
            gl.GetIntegerv(gl::MAX_DRAW_BUFFERS, &mut val);
            val
        } else {
            1
        },

        max_color_attachments: if version >= &Version(Api::Gl, 3, 0) ||
                                  version >= &Version(Api::GlEs, 3, 0)
        {
            let mut val = 1;
            gl.GetIntegerv(gl::MAX_COLOR_ATTACHMENTS, &mut val);
            val
        } else {
            1
        },

        max_texture_size: {
            let mut val = 64;
            gl.GetIntegerv(gl::MAX_TEXTURE_SIZE, &mut val);
            val
        },

        max_samples: if version >= &Version(Api::Gl, 3, 0) ||
                        version >= &Version(Api::GlEs, 3, 0)
        {
            let mut val = 0;
            gl.GetIntegerv(gl::MAX_SAMPLES, &mut val);
            val
        } else {
            0
        },

        max_viewport_dims: {
            let mut val: [gl::types::GLint; 2] = [0, 0];
            gl.GetIntegerv(gl::MAX_VIEWPORT_DIMS, val.as_mut_ptr());
            (val[0], val[1])
        },

        max_combined_texture_image_units: {
            let mut val = 2;
            gl.GetIntegerv(gl::MAX_COMBINED_TEXTURE_IMAGE_UNITS, &mut val);
            val
        },
    }
}

/// Queries the channel sizes of the default framebuffer.
///
/// `GL_RED_BITS` and friends were removed from core profiles, so recent versions go through
/// the attachment parameters of the default framebuffer.
unsafe fn get_default_framebuffer_bits(gl: &gl::Gl, version: &Version) -> ([u8; 4], u8, u8) {
    let to_bits = |v: gl::types::GLint| v.clamp(0, 255) as u8;

    let attachment_query = if version >= &Version(Api::Gl, 3, 0) {
        let mut draw_buffer = 0;
        gl.GetIntegerv(gl::DRAW_BUFFER, &mut draw_buffer);
        let color = match draw_buffer as gl::types::GLenum {
            gl::BACK => gl::BACK_LEFT,
            gl::FRONT => gl::FRONT_LEFT,
            other => other,
        };
        Some((color, gl::DEPTH, gl::STENCIL))
    } else if version >= &Version(Api::GlEs, 3, 0) {
        Some((gl::BACK, gl::DEPTH, gl::STENCIL))
    } else {
        None
    };

    match attachment_query {
        Some((color, depth, stencil)) => {
            // every query but the object type raises GL_INVALID_OPERATION on a missing buffer
            let query = |attachment, pname| {
                if attachment == gl::NONE {
                    return 0;
                }

                let mut ty = 0;
                gl.GetFramebufferAttachmentParameteriv(gl::DRAW_FRAMEBUFFER, attachment,
                                                       gl::FRAMEBUFFER_ATTACHMENT_OBJECT_TYPE,
                                                       &mut ty);
                if ty as gl::types::GLenum == gl::NONE {
                    return 0;
                }

                let mut value = 0;
                gl.GetFramebufferAttachmentParameteriv(gl::DRAW_FRAMEBUFFER, attachment, pname,
                                                       &mut value);
                to_bits(value)
            };

            ([
                query(color, gl::FRAMEBUFFER_ATTACHMENT_RED_SIZE),
                query(color, gl::FRAMEBUFFER_ATTACHMENT_GREEN_SIZE),
                query(color, gl::FRAMEBUFFER_ATTACHMENT_BLUE_SIZE),
                query(color, gl::FRAMEBUFFER_ATTACHMENT_ALPHA_SIZE),
            ],
             query(depth, gl::FRAMEBUFFER_ATTACHMENT_DEPTH_SIZE),
             query(stencil, gl::FRAMEBUFFER_ATTACHMENT_STENCIL_SIZE))
        },

        None => {
            let query = |pname| {
                let mut value = 0;
                gl.GetIntegerv(pname, &mut value);
                to_bits(value)
            };

            ([
                query(gl::RED_BITS),
                query(gl::GREEN_BITS),
                query(gl::BLUE_BITS),
                query(gl::ALPHA_BITS),
            ],
             query(gl::DEPTH_BITS),
             query(gl::STENCIL_BITS))
        },
    }
}
