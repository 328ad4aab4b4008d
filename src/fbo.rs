/*!
Framebuffer objects and renderbuffers.

```no_run
# fn example(ctx: &piglit::framework::TestContext) -> Result<(), piglit::TestError> {
use piglit::fbo::FramebufferBuilder;
use piglit::gl;

let fbo = FramebufferBuilder::new(64, 64)
    .color_renderbuffer(gl::RGBA8)
    .depth_renderbuffer(gl::DEPTH_COMPONENT24)
    .build(ctx)?;
fbo.bind();
# Ok(())
# }
```

An incomplete framebuffer is reported as a `FramebufferError`; the test is skipped when the
status is `GL_FRAMEBUFFER_UNSUPPORTED` and fails otherwise.

*/
use std::error::Error;
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::backend::Facade;
use crate::context::Context;
use crate::enums::enum_name;
use crate::gl;
use crate::texture::Texture2d;
use crate::version::{Api, Version};
use crate::GlObject;

/// Error that can happen while building a framebuffer object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramebufferError {
    /// The context supports neither OpenGL 3.0, OpenGL ES 2.0 nor
    /// `GL_ARB_framebuffer_object`.
    NotSupported,

    /// `glCheckFramebufferStatus` returned something else than `GL_FRAMEBUFFER_COMPLETE`.
    Incomplete(gl::types::GLenum),
}

impl FramebufferError {
    /// Returns true if the error means that the implementation can't render to this
    /// combination of formats, rather than a mistake in the framebuffer.
    pub fn is_unsupported(&self) -> bool {
        match *self {
            FramebufferError::NotSupported => true,
            FramebufferError::Incomplete(status) => status == gl::FRAMEBUFFER_UNSUPPORTED,
        }
    }
}

impl fmt::Display for FramebufferError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            FramebufferError::NotSupported =>
                fmt.write_str("Test requires framebuffer objects"),
            FramebufferError::Incomplete(status) =>
                write!(fmt, "Framebuffer incomplete: {} (0x{:x})", enum_name(status), status),
        }
    }
}

impl Error for FramebufferError {}

/// Returns true if the context has framebuffer objects with the core entry points.
pub fn is_supported(context: &Context) -> bool {
    context.get_version() >= &Version(Api::Gl, 3, 0) ||
    context.get_version() >= &Version(Api::GlEs, 2, 0) ||
    context.get_extensions().contains("GL_ARB_framebuffer_object")
}

/// A renderbuffer, deleted on drop.
pub struct Renderbuffer {
    context: Rc<Context>,
    id: gl::types::GLuint,
    internal_format: gl::types::GLenum,
    width: u32,
    height: u32,
}

impl GlObject for Renderbuffer {
    type Id = gl::types::GLuint;

    #[inline]
    fn get_id(&self) -> gl::types::GLuint {
        self.id
    }
}

impl Drop for Renderbuffer {
    fn drop(&mut self) {
        unsafe { self.context.gl.DeleteRenderbuffers(1, &self.id) };
    }
}

impl Renderbuffer {
    /// Allocates a renderbuffer. `samples` of 0 means single-sampled.
    pub fn new<F: ?Sized>(facade: &F, internal_format: gl::types::GLenum, width: u32,
                          height: u32, samples: u32) -> Renderbuffer where F: Facade
    {
        let context = facade.get_context().clone();

        let mut id = 0;
        unsafe {
            context.gl.GenRenderbuffers(1, &mut id);
            context.gl.BindRenderbuffer(gl::RENDERBUFFER, id);

            if samples > 0 {
                context.gl.RenderbufferStorageMultisample(gl::RENDERBUFFER,
                                                          samples as gl::types::GLsizei,
                                                          internal_format,
                                                          width as gl::types::GLsizei,
                                                          height as gl::types::GLsizei);
            } else {
                context.gl.RenderbufferStorage(gl::RENDERBUFFER, internal_format,
                                               width as gl::types::GLsizei,
                                               height as gl::types::GLsizei);
            }

            context.gl.BindRenderbuffer(gl::RENDERBUFFER, 0);
        }

        Renderbuffer { context, id, internal_format, width, height }
    }

    /// Returns the internal format.
    #[inline]
    pub fn internal_format(&self) -> gl::types::GLenum {
        self.internal_format
    }

    /// Returns the dimensions.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the number of bits of the red, green, blue and alpha channels that the
    /// implementation actually allocated, which may be more than the format asks for.
    pub fn color_bits(&self) -> [u8; 4] {
        let params = [gl::RENDERBUFFER_RED_SIZE, gl::RENDERBUFFER_GREEN_SIZE,
                      gl::RENDERBUFFER_BLUE_SIZE, gl::RENDERBUFFER_ALPHA_SIZE];
        let mut bits = [0u8; 4];

        unsafe {
            self.context.gl.BindRenderbuffer(gl::RENDERBUFFER, self.id);
            for (param, bits) in params.iter().zip(bits.iter_mut()) {
                let mut value = 0;
                self.context.gl.GetRenderbufferParameteriv(gl::RENDERBUFFER, *param, &mut value);
                *bits = value.max(0).min(u8::MAX as gl::types::GLint) as u8;
            }
            self.context.gl.BindRenderbuffer(gl::RENDERBUFFER, 0);
        }

        bits
    }
}

/// What to attach to an attachment point.
enum Attachment {
    /// A renderbuffer created by the builder, owned by the framebuffer.
    NewRenderbuffer(gl::types::GLenum),
    /// A level of a texture owned by the caller.
    Texture { id: gl::types::GLuint, level: u32 },
}

/// Builds a `Framebuffer`.
pub struct FramebufferBuilder {
    width: u32,
    height: u32,
    samples: u32,
    colors: SmallVec<[Attachment; 8]>,
    depth: Option<Attachment>,
    stencil: Option<Attachment>,
    depth_stencil: Option<Attachment>,
}

impl FramebufferBuilder {
    /// Starts a framebuffer whose renderbuffers have these dimensions.
    pub fn new(width: u32, height: u32) -> FramebufferBuilder {
        FramebufferBuilder {
            width,
            height,
            samples: 0,
            colors: SmallVec::new(),
            depth: None,
            stencil: None,
            depth_stencil: None,
        }
    }

    /// Number of samples of the renderbuffers created by the builder.
    pub fn samples(mut self, samples: u32) -> FramebufferBuilder {
        self.samples = samples;
        self
    }

    /// Adds a color attachment backed by a new renderbuffer.
    pub fn color_renderbuffer(mut self, internal_format: gl::types::GLenum) -> FramebufferBuilder {
        self.colors.push(Attachment::NewRenderbuffer(internal_format));
        self
    }

    /// Adds a level of a texture as color attachment.
    ///
    /// The texture must outlive the framebuffer.
    pub fn color_texture(mut self, texture: &Texture2d, level: u32) -> FramebufferBuilder {
        self.colors.push(Attachment::Texture { id: texture.get_id(), level });
        self
    }

    /// Sets the depth attachment to a new renderbuffer.
    pub fn depth_renderbuffer(mut self, internal_format: gl::types::GLenum) -> FramebufferBuilder {
        self.depth = Some(Attachment::NewRenderbuffer(internal_format));
        self
    }

    /// Sets the depth attachment to a level of a depth texture.
    pub fn depth_texture(mut self, texture: &Texture2d, level: u32) -> FramebufferBuilder {
        self.depth = Some(Attachment::Texture { id: texture.get_id(), level });
        self
    }

    /// Sets the stencil attachment to a new renderbuffer.
    pub fn stencil_renderbuffer(mut self, internal_format: gl::types::GLenum) -> FramebufferBuilder {
        self.stencil = Some(Attachment::NewRenderbuffer(internal_format));
        self
    }

    /// Sets the depth-stencil attachment to a new renderbuffer.
    pub fn depth_stencil_renderbuffer(mut self, internal_format: gl::types::GLenum)
                                      -> FramebufferBuilder
    {
        self.depth_stencil = Some(Attachment::NewRenderbuffer(internal_format));
        self
    }

    /// Creates the framebuffer and checks its completeness.
    ///
    /// The framebuffer is left bound to `GL_FRAMEBUFFER` on success.
    pub fn build<F: ?Sized>(self, facade: &F) -> Result<Framebuffer, FramebufferError>
        where F: Facade
    {
        let context = facade.get_context();
        if !is_supported(context) {
            return Err(FramebufferError::NotSupported);
        }

        let mut id = 0;
        unsafe {
            context.gl.GenFramebuffers(1, &mut id);
            context.gl.BindFramebuffer(gl::FRAMEBUFFER, id);
        }

        let mut framebuffer = Framebuffer {
            context: context.clone(),
            id,
            width: self.width,
            height: self.height,
            color_attachments: self.colors.len() as u32,
            renderbuffers: SmallVec::new(),
        };

        let points = self.colors.into_iter().enumerate()
            .map(|(i, a)| (gl::COLOR_ATTACHMENT0 + i as gl::types::GLenum, a))
            .chain(self.depth.map(|a| (gl::DEPTH_ATTACHMENT, a)))
            .chain(self.stencil.map(|a| (gl::STENCIL_ATTACHMENT, a)))
            .chain(self.depth_stencil.map(|a| (gl::DEPTH_STENCIL_ATTACHMENT, a)));

        for (point, attachment) in points {
            framebuffer.attach(point, attachment, self.samples);
        }

        let status = unsafe { context.gl.CheckFramebufferStatus(gl::FRAMEBUFFER) };
        if status != gl::FRAMEBUFFER_COMPLETE {
            log::debug!("framebuffer {} incomplete: {}", id, enum_name(status));
            return Err(FramebufferError::Incomplete(status));
        }

        if framebuffer.color_attachments == 0 {
            framebuffer.set_draw_buffers(0);
        }

        log::debug!("created framebuffer {} ({}x{})", id, framebuffer.width, framebuffer.height);
        Ok(framebuffer)
    }
}

/// A framebuffer object, deleted on drop along with the renderbuffers it created.
pub struct Framebuffer {
    context: Rc<Context>,
    id: gl::types::GLuint,
    width: u32,
    height: u32,
    color_attachments: u32,
    renderbuffers: SmallVec<[Renderbuffer; 4]>,
}

impl GlObject for Framebuffer {
    type Id = gl::types::GLuint;

    #[inline]
    fn get_id(&self) -> gl::types::GLuint {
        self.id
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        unsafe {
            let mut current: gl::types::GLint = 0;
            self.context.gl.GetIntegerv(gl::FRAMEBUFFER_BINDING, &mut current);
            if current as gl::types::GLuint == self.id {
                self.context.gl.BindFramebuffer(gl::FRAMEBUFFER, 0);
            }
            self.context.gl.DeleteFramebuffers(1, &self.id);
        }
    }
}

impl Framebuffer {
    fn attach(&mut self, point: gl::types::GLenum, attachment: Attachment, samples: u32) {
        match attachment {
            Attachment::NewRenderbuffer(format) => {
                let renderbuffer = Renderbuffer::new(&self.context, format, self.width,
                                                     self.height, samples);
                unsafe {
                    self.context.gl.FramebufferRenderbuffer(gl::FRAMEBUFFER, point,
                                                            gl::RENDERBUFFER,
                                                            renderbuffer.get_id());
                }
                self.renderbuffers.push(renderbuffer);
            },
            Attachment::Texture { id, level } => unsafe {
                self.context.gl.FramebufferTexture2D(gl::FRAMEBUFFER, point, gl::TEXTURE_2D, id,
                                                     level as gl::types::GLint);
            },
        }
    }

    /// Binds to both `GL_DRAW_FRAMEBUFFER` and `GL_READ_FRAMEBUFFER`.
    #[inline]
    pub fn bind(&self) {
        unsafe { self.context.gl.BindFramebuffer(gl::FRAMEBUFFER, self.id) };
    }

    /// Binds to `GL_DRAW_FRAMEBUFFER` only.
    #[inline]
    pub fn bind_draw(&self) {
        unsafe { self.context.gl.BindFramebuffer(gl::DRAW_FRAMEBUFFER, self.id) };
    }

    /// Binds to `GL_READ_FRAMEBUFFER` only.
    #[inline]
    pub fn bind_read(&self) {
        unsafe { self.context.gl.BindFramebuffer(gl::READ_FRAMEBUFFER, self.id) };
    }

    /// Draws into the first `count` color attachments, in order. The framebuffer must be
    /// bound.
    ///
    /// Without `glDrawBuffers`, ie. on OpenGL ES 2.0 without `GL_EXT_draw_buffers`, only the
    /// first attachment can be drawn to and the call does nothing.
    pub fn set_draw_buffers(&self, count: u32) {
        let buffers: SmallVec<[gl::types::GLenum; 8]> = if count == 0 {
            std::iter::once(gl::NONE).collect()
        } else {
            (0 .. count).map(|i| gl::COLOR_ATTACHMENT0 + i).collect()
        };

        let has_ext = self.context.get_extensions().contains("GL_EXT_draw_buffers");
        unsafe {
            match draw_buffers_entry_point(self.context.get_version(), has_ext) {
                DrawBuffersEntryPoint::Core => {
                    self.context.gl.DrawBuffers(buffers.len() as gl::types::GLsizei,
                                                buffers.as_ptr());
                },
                DrawBuffersEntryPoint::Ext => {
                    self.context.gl.DrawBuffersEXT(buffers.len() as gl::types::GLsizei,
                                                   buffers.as_ptr());
                },
                DrawBuffersEntryPoint::Unavailable => {
                    log::debug!("glDrawBuffers isn't available, keeping the default draw buffer");
                },
            }
        }
    }

    /// Reads from the color attachment `index`. The framebuffer must be bound.
    ///
    /// OpenGL ES 2.0 has no `glReadBuffer` and always reads from the first attachment.
    pub fn set_read_buffer(&self, index: u32) {
        if has_read_buffer(self.context.get_version()) {
            unsafe { self.context.gl.ReadBuffer(gl::COLOR_ATTACHMENT0 + index) };
        }
    }

    /// Returns the dimensions.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the number of color attachments.
    #[inline]
    pub fn color_attachments(&self) -> u32 {
        self.color_attachments
    }

    /// Returns the renderbuffers created by the builder, colors first.
    #[inline]
    pub fn renderbuffers(&self) -> &[Renderbuffer] {
        &self.renderbuffers
    }
}

/// Which function selects the draw buffers of a framebuffer object.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum DrawBuffersEntryPoint {
    Core,
    Ext,
    Unavailable,
}

fn draw_buffers_entry_point(version: &Version, has_ext: bool) -> DrawBuffersEntryPoint {
    if version >= &Version(Api::Gl, 2, 0) || version >= &Version(Api::GlEs, 3, 0) {
        DrawBuffersEntryPoint::Core
    } else if version.0 == Api::GlEs && has_ext {
        DrawBuffersEntryPoint::Ext
    } else {
        DrawBuffersEntryPoint::Unavailable
    }
}

fn has_read_buffer(version: &Version) -> bool {
    version.0 == Api::Gl || version >= &Version(Api::GlEs, 3, 0)
}

/// Binds the default framebuffer of the window.
pub fn bind_default(context: &Context) {
    unsafe { context.gl.BindFramebuffer(gl::FRAMEBUFFER, 0) };
}

#[cfg(test)]
mod tests {
    use super::{draw_buffers_entry_point, has_read_buffer, DrawBuffersEntryPoint, FramebufferError};
    use crate::gl;
    use crate::version::{Api, Version};

    #[test]
    fn unsupported_statuses() {
        assert!(FramebufferError::NotSupported.is_unsupported());
        assert!(FramebufferError::Incomplete(gl::FRAMEBUFFER_UNSUPPORTED).is_unsupported());
        assert!(!FramebufferError::Incomplete(gl::FRAMEBUFFER_INCOMPLETE_ATTACHMENT)
                    .is_unsupported());
    }

    #[test]
    fn display() {
        let err = FramebufferError::Incomplete(gl::FRAMEBUFFER_UNSUPPORTED);
        assert_eq!(err.to_string(), "Framebuffer incomplete: GL_FRAMEBUFFER_UNSUPPORTED (0x8cdd)");
    }

    #[test]
    fn draw_buffers_per_version() {
        assert_eq!(draw_buffers_entry_point(&Version(Api::Gl, 2, 0), false),
                   DrawBuffersEntryPoint::Core);
        assert_eq!(draw_buffers_entry_point(&Version(Api::GlEs, 3, 0), false),
                   DrawBuffersEntryPoint::Core);
        assert_eq!(draw_buffers_entry_point(&Version(Api::GlEs, 2, 0), true),
                   DrawBuffersEntryPoint::Ext);
        assert_eq!(draw_buffers_entry_point(&Version(Api::GlEs, 2, 0), false),
                   DrawBuffersEntryPoint::Unavailable);
        assert_eq!(draw_buffers_entry_point(&Version(Api::Gl, 1, 5), true),
                   DrawBuffersEntryPoint::Unavailable);
    }

    #[test]
    fn read_buffer_per_version() {
        assert!(has_read_buffer(&Version(Api::Gl, 1, 0)));
        assert!(has_read_buffer(&Version(Api::GlEs, 3, 0)));
        assert!(!has_read_buffer(&Version(Api::GlEs, 2, 0)));
    }
}
