//! Clears the depth buffer, draws two rectangles with depth testing enabled, one in front of
//! the cleared depth and one behind it, and probes both the colors and the depths.

use piglit::args::Args;
use piglit::program::common::uniform_color_program;
use piglit::program::Program;
use piglit::{gl, piglit_main, GlTest, TestConfig, TestContext, TestError, TestResult};

const CLEAR_DEPTH: f32 = 0.5;
const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Clip space depth of the rectangle that passes the test, window depth 0.25.
const NEAR_Z: f32 = -0.5;
/// Clip space depth of the rectangle that fails the test, window depth 0.75.
const FAR_Z: f32 = 0.5;

struct DepthClearProbe {
    program: Program,
}

impl GlTest for DepthClearProbe {
    fn config() -> TestConfig {
        // depth can't be read back on OpenGL ES
        TestConfig {
            supports_gl_compat_version: Some((2, 0)),
            .. TestConfig::with_depth()
        }
    }

    fn init(ctx: &mut TestContext, _: &Args) -> Result<DepthClearProbe, TestError> {
        if !ctx.is_fbo_mode() {
            ctx.require_depth_bits(16)?;
        }

        Ok(DepthClearProbe { program: uniform_color_program(ctx)? })
    }

    fn display(&mut self, ctx: &mut TestContext) -> Result<TestResult, TestError> {
        unsafe {
            ctx.gl.ClearColor(BLACK[0], BLACK[1], BLACK[2], BLACK[3]);
            ctx.gl.ClearDepth(CLEAR_DEPTH as f64);
            ctx.gl.Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }

        let (w, h) = (ctx.width, ctx.height);
        let half = w / 2;

        let mut pass = ctx.probe_rect_depth(0, 0, w, h, CLEAR_DEPTH);

        unsafe {
            ctx.gl.Enable(gl::DEPTH_TEST);
            ctx.gl.DepthFunc(gl::LESS);
        }

        self.program.bind();
        self.program.set_uniform_vec4("color", RED);
        ctx.draw_rect_z(NEAR_Z, -1.0, -1.0, 1.0, 2.0);
        self.program.set_uniform_vec4("color", [0.0, 1.0, 0.0, 1.0]);
        ctx.draw_rect_z(FAR_Z, 0.0, -1.0, 1.0, 2.0);

        unsafe { ctx.gl.Disable(gl::DEPTH_TEST) };
        piglit::gl_check!(ctx);

        pass &= ctx.probe_rect_rgba(0, 0, half, h, &RED);
        pass &= ctx.probe_rect_rgba(half as i32, 0, w - half, h, &BLACK);
        pass &= ctx.probe_rect_depth(0, 0, half, h, (NEAR_Z + 1.0) / 2.0);
        pass &= ctx.probe_rect_depth(half as i32, 0, w - half, h, CLEAR_DEPTH);

        Ok(pass.into())
    }
}

piglit_main!(DepthClearProbe);
