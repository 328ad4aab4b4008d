//! Renders the RGBW pattern into level 0 of a texture through a framebuffer object, fills the
//! other levels with `glGenerateMipmap`, then draws every level at its own size and compares
//! it with the levels computed on the CPU.

use piglit::args::Args;
use piglit::fbo::FramebufferBuilder;
use piglit::ops::window_rect_to_ndc;
use piglit::program::common::{texture_program, uniform_color_program};
use piglit::program::Program;
use piglit::reference::{rgbw_quadrants, Image};
use piglit::texture::Texture2d;
use piglit::{gl, piglit_main, GlTest, TestConfig, TestContext, TestError, TestResult};

const TEX_SIZE: u32 = 64;

struct FboGenerateMipmap {
    color: Program,
    textured: Program,
    texture: Texture2d,
}

impl GlTest for FboGenerateMipmap {
    fn config() -> TestConfig {
        TestConfig {
            supports_gl_compat_version: Some((2, 0)),
            supports_gl_es_version: Some((2, 0)),
            .. TestConfig::default()
        }
    }

    fn init(ctx: &mut TestContext, _: &Args) -> Result<FboGenerateMipmap, TestError> {
        if !ctx.is_gles() {
            ctx.require_gl_version_or_extension(3, 0, "GL_ARB_framebuffer_object")?;
        }

        // every level starts black, so that a level left alone by glGenerateMipmap is noticed
        let black = [0.0, 0.0, 0.0, 0.0];
        let images: Vec<Image> = Image::solid(TEX_SIZE, TEX_SIZE, black).mipmap_chain();
        let texture = Texture2d::from_images(ctx, gl::RGBA8, &images);

        Ok(FboGenerateMipmap {
            color: uniform_color_program(ctx)?,
            textured: texture_program(ctx)?,
            texture,
        })
    }

    fn display(&mut self, ctx: &mut TestContext) -> Result<TestResult, TestError> {
        self.render_level_zero(ctx)?;
        self.texture.generate_mipmap();
        piglit::gl_check!(ctx);

        ctx.bind_winsys_framebuffer();
        unsafe {
            ctx.gl.ClearColor(0.5, 0.5, 0.5, 1.0);
            ctx.gl.Clear(gl::COLOR_BUFFER_BIT);
        }

        self.textured.bind();
        self.texture.bind(0);

        let window = (ctx.width, ctx.height);
        let mut x = 0;
        for level in 0 .. self.texture.levels() {
            let (w, h) = self.texture.level_dimensions(level);
            let (nx, ny, nw, nh) = window_rect_to_ndc(x, 0, w as i32, h as i32, window);
            ctx.draw_rect_tex(nx, ny, nw, nh, 0.0, 0.0, 1.0, 1.0);
            x += w as i32 + 2;
        }
        piglit::gl_check!(ctx);

        let expected = Image::rgbw(TEX_SIZE, TEX_SIZE, false).mipmap_chain();

        let mut pass = true;
        let mut x = 0;
        for (level, image) in expected.iter().enumerate() {
            if !ctx.probe_image_rgb(x, 0, image.width, image.height, &image.texels) {
                println!("  when testing level {}", level);
                pass = false;
            }
            x += image.width as i32 + 2;
        }

        Ok(pass.into())
    }
}

impl FboGenerateMipmap {
    /// Draws the four quadrants into level 0.
    fn render_level_zero(&self, ctx: &TestContext) -> Result<(), TestError> {
        let fbo = FramebufferBuilder::new(TEX_SIZE, TEX_SIZE)
            .color_texture(&self.texture, 0)
            .build(ctx)?;
        fbo.bind();

        unsafe {
            ctx.gl.Viewport(0, 0, TEX_SIZE as gl::types::GLsizei, TEX_SIZE as gl::types::GLsizei);
        }

        self.color.bind();
        let quadrants = rgbw_quadrants(false);
        let corners = [(-1.0, -1.0), (0.0, -1.0), (-1.0, 0.0), (0.0, 0.0)];
        for (color, (x, y)) in quadrants.iter().zip(corners) {
            self.color.set_uniform_vec4("color", *color);
            ctx.draw_rect(x, y, 1.0, 1.0);
        }

        piglit::gl_check!(ctx);
        Ok(())
    }
}

piglit_main!(FboGenerateMipmap);
