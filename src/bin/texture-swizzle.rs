//! Samples a single-color texture through several `GL_TEXTURE_SWIZZLE_*` settings.

use piglit::args::Args;
use piglit::program::common::texture_program;
use piglit::program::Program;
use piglit::reference::Image;
use piglit::texture::Texture2d;
use piglit::{gl, piglit_main, GlTest, TestConfig, TestContext, TestError, TestResult};

const TEXEL: [f32; 4] = [1.0, 0.5, 0.25, 0.75];

const SWIZZLES: [(&str, [gl::types::GLenum; 4]); 5] = [
    ("identity", [gl::RED, gl::GREEN, gl::BLUE, gl::ALPHA]),
    ("reverse", [gl::ALPHA, gl::BLUE, gl::GREEN, gl::RED]),
    ("constants", [gl::ZERO, gl::ONE, gl::ZERO, gl::ONE]),
    ("broadcast-green", [gl::GREEN, gl::GREEN, gl::GREEN, gl::GREEN]),
    ("mixed", [gl::BLUE, gl::ZERO, gl::RED, gl::ONE]),
];

struct TextureSwizzle {
    program: Program,
    texture: Texture2d,
}

impl GlTest for TextureSwizzle {
    fn config() -> TestConfig {
        TestConfig {
            supports_gl_compat_version: Some((2, 0)),
            supports_gl_es_version: Some((3, 0)),
            subtests: SWIZZLES.iter().map(|(name, _)| *name).collect(),
            .. TestConfig::default()
        }
    }

    fn init(ctx: &mut TestContext, _: &Args) -> Result<TextureSwizzle, TestError> {
        if !ctx.is_gles() && !ctx.is_gl_version_at_least(3, 3) {
            ctx.require_either_extension(&["GL_ARB_texture_swizzle", "GL_EXT_texture_swizzle"])?;
        }

        let texture = Texture2d::from_image(ctx, gl::RGBA8, &Image::solid(2, 2, TEXEL));
        Ok(TextureSwizzle { program: texture_program(ctx)?, texture })
    }

    fn display(&mut self, ctx: &mut TestContext) -> Result<TestResult, TestError> {
        self.program.bind();
        self.texture.bind(0);

        let texture = &self.texture;
        let subtests = SWIZZLES.iter().map(|&(name, swizzle)| {
            (name, move |ctx: &TestContext| draw_swizzled(ctx, texture, swizzle))
        });
        let result = ctx.run_subtests(subtests);

        self.texture.set_swizzle(SWIZZLES[0].1);
        Ok(result)
    }
}

fn draw_swizzled(ctx: &TestContext, texture: &Texture2d, swizzle: [gl::types::GLenum; 4])
                 -> Result<TestResult, TestError>
{
    texture.set_swizzle(swizzle);

    unsafe {
        ctx.gl.ClearColor(0.5, 0.5, 0.5, 0.5);
        ctx.gl.Clear(gl::COLOR_BUFFER_BIT);
    }
    ctx.draw_rect_tex(-1.0, -1.0, 2.0, 2.0, 0.0, 0.0, 1.0, 1.0);
    piglit::gl_check!(ctx);

    let expected = swizzle.map(|source| apply_swizzle(source, TEXEL));
    Ok(ctx.probe_rect_rgba(0, 0, ctx.width, ctx.height, &expected).into())
}

/// Computes the value of a channel selected by a swizzle parameter.
fn apply_swizzle(source: gl::types::GLenum, texel: [f32; 4]) -> f32 {
    match source {
        gl::RED => texel[0],
        gl::GREEN => texel[1],
        gl::BLUE => texel[2],
        gl::ALPHA => texel[3],
        gl::ONE => 1.0,
        _ => 0.0,
    }
}

piglit_main!(TextureSwizzle);
