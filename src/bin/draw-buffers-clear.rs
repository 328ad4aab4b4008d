//! Clears each color attachment of a framebuffer object to its own color with
//! `glClearBufferfv` and probes every attachment.

use piglit::args::Args;
use piglit::fbo::FramebufferBuilder;
use piglit::{gl, piglit_main, GlTest, TestConfig, TestContext, TestError, TestResult};

const ATTACHMENTS: u32 = 4;
const SIZE: u32 = 32;

const COLORS: [[f32; 4]; ATTACHMENTS as usize] = [
    [1.0, 0.0, 0.0, 1.0],
    [0.0, 1.0, 0.0, 0.5],
    [0.0, 0.0, 1.0, 0.25],
    [0.5, 0.5, 0.5, 1.0],
];

struct DrawBuffersClear;

impl GlTest for DrawBuffersClear {
    fn config() -> TestConfig {
        TestConfig {
            supports_gl_compat_version: Some((3, 0)),
            supports_gl_es_version: Some((3, 0)),
            .. TestConfig::default()
        }
    }

    fn init(ctx: &mut TestContext, _: &Args) -> Result<DrawBuffersClear, TestError> {
        ctx.require_draw_buffers(ATTACHMENTS)?;

        let max_attachments = ctx.capabilities().max_color_attachments;
        if max_attachments < ATTACHMENTS as gl::types::GLint {
            return Err(TestError::unsupported(format!(
                "Test requires {} color attachments, but only {} are supported",
                ATTACHMENTS, max_attachments)));
        }

        Ok(DrawBuffersClear)
    }

    fn display(&mut self, ctx: &mut TestContext) -> Result<TestResult, TestError> {
        let mut builder = FramebufferBuilder::new(SIZE, SIZE);
        for _ in 0 .. ATTACHMENTS {
            builder = builder.color_renderbuffer(gl::RGBA8);
        }
        let fbo = builder.build(&*ctx)?;
        fbo.set_draw_buffers(ATTACHMENTS);

        unsafe {
            ctx.gl.Viewport(0, 0, SIZE as gl::types::GLsizei, SIZE as gl::types::GLsizei);
            for (i, color) in COLORS.iter().enumerate() {
                ctx.gl.ClearBufferfv(gl::COLOR, i as gl::types::GLint, color.as_ptr());
            }
        }
        piglit::gl_check!(ctx);

        let mut pass = true;
        for (i, color) in COLORS.iter().enumerate() {
            fbo.set_read_buffer(i as u32);
            if !ctx.probe_rect_rgba(0, 0, SIZE, SIZE, color) {
                println!("  in GL_COLOR_ATTACHMENT{}", i);
                pass = false;
            }
        }

        drop(fbo);
        ctx.bind_winsys_framebuffer();
        Ok(pass.into())
    }
}

piglit_main!(DrawBuffersClear);
