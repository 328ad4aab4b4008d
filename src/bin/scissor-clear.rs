//! Clears through two scissor rectangles, one in each half of the window, and probes the
//! cleared and untouched regions.

use piglit::args::Args;
use piglit::{gl, piglit_main, GlTest, TestConfig, TestContext, TestError, TestResult};

const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
const GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];

struct ScissorClear;

impl GlTest for ScissorClear {
    fn config() -> TestConfig {
        TestConfig {
            supports_gl_compat_version: Some((1, 0)),
            supports_gl_es_version: Some((2, 0)),
            .. TestConfig::default()
        }
    }

    fn init(_: &mut TestContext, _: &Args) -> Result<ScissorClear, TestError> {
        Ok(ScissorClear)
    }

    fn display(&mut self, ctx: &mut TestContext) -> Result<TestResult, TestError> {
        let half = ctx.width / 2;
        let height = ctx.height;
        let (sx, sy) = (half / 4, height / 4);
        let (sw, sh) = (half / 2, height / 2);

        unsafe {
            ctx.gl.ClearColor(BLACK[0], BLACK[1], BLACK[2], BLACK[3]);
            ctx.gl.Clear(gl::COLOR_BUFFER_BIT);

            ctx.gl.Enable(gl::SCISSOR_TEST);
            ctx.gl.ClearColor(GREEN[0], GREEN[1], GREEN[2], GREEN[3]);
            for x in [sx, half + sx] {
                ctx.gl.Scissor(x as gl::types::GLint, sy as gl::types::GLint,
                               sw as gl::types::GLsizei, sh as gl::types::GLsizei);
                ctx.gl.Clear(gl::COLOR_BUFFER_BIT);
            }
            ctx.gl.Disable(gl::SCISSOR_TEST);
        }
        piglit::gl_check!(ctx);

        let mut pass = true;
        for x in [sx, half + sx] {
            let (x, sy) = (x as i32, sy as i32);
            pass &= ctx.probe_rect_rgb(x, sy, sw, sh, &[GREEN[0], GREEN[1], GREEN[2]]);

            // borders around the scissored rectangle
            let black = [BLACK[0], BLACK[1], BLACK[2]];
            pass &= ctx.probe_rect_rgb(x, 0, sw, sy as u32, &black);
            pass &= ctx.probe_rect_rgb(x, sy + sh as i32, sw, height - sy as u32 - sh, &black);
            pass &= ctx.probe_rect_rgb(x - 1, 0, 1, height, &black);
            pass &= ctx.probe_rect_rgb(x + sw as i32, 0, 1, height, &black);
        }

        pass &= ctx.probe_rect_halves_equal_rgba(0, 0, half * 2, height);

        Ok(pass.into())
    }
}

piglit_main!(ScissorClear);
