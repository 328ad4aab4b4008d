//! Triggers the basic GL errors and checks that `glGetError` reports them, once each.

use piglit::args::Args;
use piglit::{
    expect_gl_error, gl, piglit_main, GlError, GlTest, TestConfig, TestContext, TestError,
    TestResult,
};

struct GlErrorBasic;

impl GlTest for GlErrorBasic {
    fn config() -> TestConfig {
        TestConfig {
            supports_gl_compat_version: Some((2, 0)),
            supports_gl_es_version: Some((2, 0)),
            subtests: vec!["GL_INVALID_ENUM", "GL_INVALID_VALUE", "GL_INVALID_OPERATION"],
            .. TestConfig::default()
        }
    }

    fn init(ctx: &mut TestContext, _: &Args) -> Result<GlErrorBasic, TestError> {
        if ctx.capabilities().no_error {
            return Err(TestError::unsupported("Test requires errors to be reported"));
        }

        ctx.reset_errors();
        Ok(GlErrorBasic)
    }

    fn display(&mut self, ctx: &mut TestContext) -> Result<TestResult, TestError> {
        let subtests: [(&str, fn(&TestContext) -> Result<TestResult, TestError>); 3] = [
            ("GL_INVALID_ENUM", invalid_enum),
            ("GL_INVALID_VALUE", invalid_value),
            ("GL_INVALID_OPERATION", invalid_operation),
        ];

        Ok(ctx.run_subtests(subtests))
    }
}

fn invalid_enum(ctx: &TestContext) -> Result<TestResult, TestError> {
    unsafe { ctx.gl.Enable(0xffff) };
    expect_error(ctx, GlError::InvalidEnum)
}

fn invalid_value(ctx: &TestContext) -> Result<TestResult, TestError> {
    unsafe { ctx.gl.Viewport(0, 0, -1, -1) };
    let result = expect_error(ctx, GlError::InvalidValue);

    unsafe {
        ctx.gl.Viewport(0, 0, ctx.width as gl::types::GLsizei, ctx.height as gl::types::GLsizei);
    }
    result
}

fn invalid_operation(ctx: &TestContext) -> Result<TestResult, TestError> {
    // setting a uniform without a current program
    unsafe {
        ctx.gl.UseProgram(0);
        ctx.gl.Uniform1f(0, 1.0);
    }
    expect_error(ctx, GlError::InvalidOperation)
}

/// The expected error must come first. Anything left in the queue afterwards is worth a
/// warning only.
fn expect_error(ctx: &TestContext, expected: GlError) -> Result<TestResult, TestError> {
    expect_gl_error!(ctx, Some(expected));

    match ctx.get_error() {
        None => Ok(TestResult::Pass),
        Some(extra) => {
            println!("Extra GL error after {}: {}", expected, extra);
            ctx.reset_errors();
            Ok(TestResult::Warn)
        },
    }
}

piglit_main!(GlErrorBasic);
