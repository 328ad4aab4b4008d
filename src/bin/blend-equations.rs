//! Draws with every blend equation and every pair of blend factors over a known destination,
//! and compares the framebuffer with the result computed on the CPU.

use piglit::args::Args;
use piglit::program::common::uniform_color_program;
use piglit::program::Program;
use piglit::reference::{Blend, BlendingFunction, LinearBlendingFactor};
use piglit::{gl, piglit_main, GlTest, TestConfig, TestContext, TestError, TestResult};

const SRC: [f32; 4] = [0.8, 0.4, 0.2, 0.6];
const DST: [f32; 4] = [0.3, 0.6, 0.9, 0.4];
const CONSTANT: (f32, f32, f32, f32) = (0.25, 0.5, 0.75, 0.5);

const EQUATIONS: [&str; 5] = ["GL_FUNC_ADD", "GL_FUNC_SUBTRACT", "GL_FUNC_REVERSE_SUBTRACT",
                              "GL_MIN", "GL_MAX"];

struct BlendEquations {
    program: Program,
}

impl GlTest for BlendEquations {
    fn config() -> TestConfig {
        TestConfig {
            supports_gl_compat_version: Some((2, 0)),
            supports_gl_es_version: Some((2, 0)),
            subtests: EQUATIONS.to_vec(),
            .. TestConfig::default()
        }
    }

    fn init(ctx: &mut TestContext, _: &Args) -> Result<BlendEquations, TestError> {
        let program = uniform_color_program(ctx)?;
        program.set_uniform_vec4("color", SRC);
        Ok(BlendEquations { program })
    }

    fn display(&mut self, ctx: &mut TestContext) -> Result<TestResult, TestError> {
        self.program.bind();

        let subtests: [(&str, fn(&TestContext) -> Result<TestResult, TestError>); 5] = [
            (EQUATIONS[0], |ctx| test_factor_pairs(ctx, |source, destination| {
                BlendingFunction::Addition { source, destination }
            })),
            (EQUATIONS[1], |ctx| test_factor_pairs(ctx, |source, destination| {
                BlendingFunction::Subtraction { source, destination }
            })),
            (EQUATIONS[2], |ctx| test_factor_pairs(ctx, |source, destination| {
                BlendingFunction::ReverseSubtraction { source, destination }
            })),
            (EQUATIONS[3], |ctx| test_function(ctx, BlendingFunction::Min)),
            (EQUATIONS[4], |ctx| test_function(ctx, BlendingFunction::Max)),
        ];

        let result = ctx.run_subtests(subtests);
        unsafe { ctx.gl.Disable(gl::BLEND) };
        Ok(result)
    }
}

/// Tries every source factor with every destination factor.
///
/// `GL_SRC_ALPHA_SATURATE` is only a valid destination factor on recent versions, so it is
/// only used as a source.
fn test_factor_pairs(ctx: &TestContext,
                     build: fn(LinearBlendingFactor, LinearBlendingFactor) -> BlendingFunction)
                     -> Result<TestResult, TestError>
{
    let mut pass = true;

    for &source in LinearBlendingFactor::ALL.iter() {
        for &destination in LinearBlendingFactor::ALL.iter() {
            if destination == LinearBlendingFactor::SourceAlphaSaturate {
                continue;
            }

            let function = build(source, destination);
            if !draw_and_probe(ctx, function)? {
                println!("  with {:?} and {:?}", source, destination);
                pass = false;
            }
        }
    }

    Ok(pass.into())
}

fn test_function(ctx: &TestContext, function: BlendingFunction) -> Result<TestResult, TestError> {
    Ok(draw_and_probe(ctx, function)?.into())
}

/// Clears to the destination color, draws the source color blended over it and probes the
/// center of the window.
fn draw_and_probe(ctx: &TestContext, function: BlendingFunction) -> Result<bool, TestError> {
    let blend = Blend { color: function, alpha: function, constant_value: CONSTANT };

    unsafe {
        ctx.gl.Disable(gl::BLEND);
        ctx.gl.ClearColor(DST[0], DST[1], DST[2], DST[3]);
        ctx.gl.Clear(gl::COLOR_BUFFER_BIT);
    }

    blend.apply_to_gl(ctx)?;
    ctx.draw_rect(-1.0, -1.0, 2.0, 2.0);
    piglit::gl_check!(ctx);

    let (x, y) = (ctx.width as i32 / 2, ctx.height as i32 / 2);
    let has_alpha = ctx.is_fbo_mode() || ctx.capabilities().color_bits[3] > 0;

    Ok(if has_alpha {
        ctx.probe_pixel_rgba(x, y, &blend.apply(SRC, DST))
    } else {
        // without destination alpha the framebuffer reads back alpha as 1
        let dst = [DST[0], DST[1], DST[2], 1.0];
        let expected = blend.apply(SRC, dst);
        ctx.probe_pixel_rgb(x, y, &[expected[0], expected[1], expected[2]])
    })
}

piglit_main!(BlendEquations);
