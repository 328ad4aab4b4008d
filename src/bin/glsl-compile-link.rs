//! Checks shader compilation and program linking status reporting.

use piglit::args::Args;
use piglit::program::common::Dialect;
use piglit::program::{Program, ProgramCreationError, Shader, ShaderType};
use piglit::{piglit_main, GlTest, TestConfig, TestContext, TestError, TestResult};

struct GlslCompileLink {
    dialect: Dialect,
}

impl GlTest for GlslCompileLink {
    fn config() -> TestConfig {
        TestConfig {
            supports_gl_compat_version: Some((2, 0)),
            supports_gl_es_version: Some((2, 0)),
            subtests: vec!["bad-shader", "good-program", "mismatched-varying"],
            .. TestConfig::default()
        }
    }

    fn init(ctx: &mut TestContext, _: &Args) -> Result<GlslCompileLink, TestError> {
        if ctx.get_glsl_version().is_none() {
            return Err(TestError::unsupported("Test requires a GLSL compiler"));
        }

        Ok(GlslCompileLink { dialect: Dialect::for_context(ctx) })
    }

    fn display(&mut self, ctx: &mut TestContext) -> Result<TestResult, TestError> {
        let dialect = self.dialect;

        let mut result = ctx.subtest("bad-shader", |ctx| bad_shader(ctx, dialect));
        piglit::result::merge_result(&mut result,
                                     ctx.subtest("good-program", |ctx| good_program(ctx, dialect)));
        piglit::result::merge_result(&mut result,
                                     ctx.subtest("mismatched-varying",
                                                 |ctx| mismatched_varying(ctx, dialect)));
        Ok(result)
    }
}

/// A syntax error must fail to compile and leave something in the info log.
fn bad_shader(ctx: &TestContext, dialect: Dialect) -> Result<TestResult, TestError> {
    let source = dialect.fragment_shader("", false, "vec4(1.0, 0.0, 0.0, 1.0) +");

    match Shader::compile(ctx, ShaderType::Fragment, &source) {
        Ok(_) => Err(TestError::failed("Shader with a syntax error compiled")),
        Err(ProgramCreationError::CompilationError(log, ShaderType::Fragment)) => {
            if log.trim().is_empty() {
                println!("Compilation failed with an empty info log");
                Ok(TestResult::Warn)
            } else {
                Ok(TestResult::Pass)
            }
        },
        Err(err) => Err(err.into()),
    }
}

/// A correct pair of shaders must link, and the attributes bound by the harness must be at
/// their fixed locations.
fn good_program(ctx: &TestContext, dialect: Dialect) -> Result<TestResult, TestError> {
    let program = Program::from_source(ctx, &dialect.vertex_shader(true),
                                       &dialect.fragment_shader("", true,
                                                                "vec4(texcoord, 0.0, 1.0)"))?;

    let vertex = program.attrib_location("piglit_vertex");
    let texcoord = program.attrib_location("piglit_texcoord");
    if vertex != Some(piglit::ops::ATTRIB_POS) || texcoord != Some(piglit::ops::ATTRIB_TEX) {
        return Err(TestError::failed(format!(
            "Attributes at unexpected locations: piglit_vertex {:?}, piglit_texcoord {:?}",
            vertex, texcoord)));
    }

    piglit::gl_check!(ctx);
    Ok(TestResult::Pass)
}

/// A fragment shader reading a varying that the vertex shader doesn't write must fail to
/// link.
fn mismatched_varying(ctx: &TestContext, dialect: Dialect) -> Result<TestResult, TestError> {
    let input = match dialect {
        Dialect::Glsl150 => "in",
        Dialect::Es100 | Dialect::Glsl110 => "varying",
    };

    let vs = dialect.vertex_shader(false);
    let fs = dialect.fragment_shader(&format!("{} vec4 missing;\n", input), false, "missing");

    match Program::from_source(ctx, &vs, &fs) {
        Ok(_) => Err(TestError::failed("Program with an unwritten varying linked")),
        Err(ProgramCreationError::LinkingError(_)) => Ok(TestResult::Pass),
        Err(err) => Err(err.into()),
    }
}

piglit_main!(GlslCompileLink);
