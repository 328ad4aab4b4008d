//! Clears renderbuffers of several normalized color formats and probes the result.
//!
//! A format name given on the command line, like `GL_RGB565`, restricts the test to that
//! format. Formats the implementation can't render to are skipped.

use piglit::args::Args;
use piglit::enums::{enum_from_name, enum_name};
use piglit::fbo::FramebufferBuilder;
use piglit::probe::{probe_rect, Tolerance};
use piglit::texture::clear_color_for_bits;
use piglit::{gl, piglit_main, GlTest, TestConfig, TestContext, TestError, TestResult};

const SIZE: u32 = 32;
const CLEAR_COLOR: [f32; 4] = [0.25, 0.5, 0.75, 0.6];

const FORMATS: &[gl::types::GLenum] = &[
    gl::RGBA8, gl::RGB8, gl::RGBA4, gl::RGB5_A1, gl::RGB565, gl::RGB10_A2, gl::R8, gl::RG8,
    gl::RGBA16, gl::RGBA2, gl::R3_G3_B2,
];

struct FboClearFormats {
    formats: Vec<gl::types::GLenum>,
}

impl GlTest for FboClearFormats {
    fn config() -> TestConfig {
        TestConfig {
            supports_gl_compat_version: Some((1, 0)),
            supports_gl_es_version: Some((2, 0)),
            subtests: vec!["GL_RGBA8", "GL_RGB8", "GL_RGBA4", "GL_RGB5_A1", "GL_RGB565",
                           "GL_RGB10_A2", "GL_R8", "GL_RG8", "GL_RGBA16", "GL_RGBA2",
                           "GL_R3_G3_B2"],
            .. TestConfig::default()
        }
    }

    fn init(ctx: &mut TestContext, args: &Args) -> Result<FboClearFormats, TestError> {
        if !piglit::fbo::is_supported(ctx) {
            return Err(TestError::unsupported("Test requires framebuffer objects"));
        }

        let formats = match args.positional.first() {
            Some(name) => match enum_from_name(name) {
                Some(format) if FORMATS.contains(&format) => vec![format],
                _ => return Err(TestError::failed(format!("Unknown format {}", name))),
            },
            None => FORMATS.to_vec(),
        };

        Ok(FboClearFormats { formats })
    }

    fn display(&mut self, ctx: &mut TestContext) -> Result<TestResult, TestError> {
        let subtests = self.formats.iter()
            .map(|&format| (enum_name(format), move |ctx: &TestContext| clear_format(ctx, format)));
        let result = ctx.run_subtests(subtests);
        ctx.bind_winsys_framebuffer();
        Ok(result)
    }
}

fn clear_format(ctx: &TestContext, format: gl::types::GLenum) -> Result<TestResult, TestError> {
    ctx.reset_errors();

    let fbo = FramebufferBuilder::new(SIZE, SIZE).color_renderbuffer(format).build(ctx);

    // an invalid enum at allocation means the format isn't a renderbuffer format here
    if let Some(error) = ctx.get_error() {
        println!("{} can't be allocated: {}", enum_name(format), error);
        return Ok(TestResult::Skip);
    }

    let fbo = fbo?;
    fbo.bind();

    unsafe {
        ctx.gl.Viewport(0, 0, SIZE as gl::types::GLsizei, SIZE as gl::types::GLsizei);
        ctx.gl.ClearColor(CLEAR_COLOR[0], CLEAR_COLOR[1], CLEAR_COLOR[2], CLEAR_COLOR[3]);
        ctx.gl.Clear(gl::COLOR_BUFFER_BIT);
    }
    piglit::gl_check!(ctx);

    // implementations may allocate more bits than requested, expect what they allocated
    let bits = fbo.renderbuffers()[0].color_bits();
    let expected = clear_color_for_bits(bits, CLEAR_COLOR);
    let tolerance = Tolerance::for_bits(bits[0], bits[1], bits[2], bits[3]);

    let pixels = ctx.read_pixels_rgba(0, 0, SIZE, SIZE);
    probe_rect(&pixels, &expected, &tolerance)?;
    Ok(TestResult::Pass)
}

piglit_main!(FboClearFormats);
