#![cfg(feature = "glutin_backend")]

use piglit::fbo::FramebufferBuilder;
use piglit::program::common::{texture_program, uniform_color_program};
use piglit::program::{Program, ProgramCreationError, Shader, ShaderType};
use piglit::reference::Image;
use piglit::texture::Texture2d;
use piglit::{gl, GlError, TestConfig, TestContext, TestError, TestResult};

mod support;

// Only one event loop may exist per process, so every check shares one context.
#[test]
fn gl_harness() {
    if !support::gl_tests_enabled() {
        return;
    }

    let config = TestConfig {
        supports_gl_compat_version: Some((2, 0)),
        supports_gl_es_version: Some((2, 0)),
        .. TestConfig::with_depth()
    };
    let (_event_loop, ctx) = support::build_context(&config);

    // querying the buffers of the default framebuffer, like the missing stencil, must not
    // leave errors behind
    assert_eq!(ctx.get_error(), None);

    context_state(&ctx);
    clear_and_probe(&ctx);
    uniform_color_rect(&ctx);
    textured_rect(&ctx);
    non_byte_textures(&ctx);
    compile_errors(&ctx);
    framebuffer_object(&ctx);
    error_queue(&ctx);
    subtests(&ctx);
}

fn context_state(ctx: &TestContext) {
    assert!(ctx.get_version().1 >= 2);
    assert!(ctx.get_glsl_version().is_some());
    assert!(!ctx.get_renderer().is_empty());
    assert!(ctx.is_gl_version_at_least(2, 0) || ctx.is_es_version_at_least(2, 0));

    assert!(ctx.require_extension("GL_PIGLIT_does_not_exist").is_err());
    assert!(ctx.require_not_extension("GL_PIGLIT_does_not_exist").is_ok());
    assert_eq!(ctx.require_gl_version(99, 0).unwrap_err().result(), TestResult::Skip);
}

fn clear_and_probe(ctx: &TestContext) {
    support::clear(ctx, [0.0, 1.0, 0.0, 1.0]);
    assert!(ctx.probe_rect_rgb(0, 0, ctx.width, ctx.height, &[0.0, 1.0, 0.0]));
    assert!(ctx.probe_pixel_rgb(5, 5, &[0.0, 1.0, 0.0]));
    assert!(!ctx.probe_pixel_rgb(5, 5, &[1.0, 0.0, 0.0]));
}

fn uniform_color_rect(ctx: &TestContext) {
    let program = uniform_color_program(ctx).unwrap();
    program.set_uniform_vec4("color", [0.0, 0.0, 1.0, 1.0]);

    support::clear(ctx, [0.0, 0.0, 0.0, 1.0]);
    program.bind();
    ctx.draw_rect(-1.0, -1.0, 1.0, 2.0);

    let half = ctx.width / 2;
    assert!(ctx.probe_rect_rgb(0, 0, half, ctx.height, &[0.0, 0.0, 1.0]));
    assert!(ctx.probe_rect_rgb(half as i32, 0, ctx.width - half, ctx.height, &[0.0, 0.0, 0.0]));
    assert!(ctx.get_error().is_none());
}

fn textured_rect(ctx: &TestContext) {
    let program = texture_program(ctx).unwrap();
    let texture = Texture2d::rgbw(ctx, gl::RGBA8, 2, 2, false, false);

    program.bind();
    texture.bind(0);
    ctx.draw_rect_tex(-1.0, -1.0, 2.0, 2.0, 0.0, 0.0, 1.0, 1.0);

    let expected = Image::rgbw(ctx.width, ctx.height, false);
    assert!(ctx.probe_image_rgb(0, 0, ctx.width, ctx.height, &expected.texels));

    let red = support::build_unicolor_texture2d(ctx, 1.0, 0.0, 0.0);
    red.bind(0);
    ctx.draw_rect_tex(-1.0, -1.0, 2.0, 2.0, 0.0, 0.0, 1.0, 1.0);
    assert!(ctx.probe_rect_rgb(0, 0, ctx.width, ctx.height, &[1.0, 0.0, 0.0]));
}

fn non_byte_textures(ctx: &TestContext) {
    if !ctx.is_gl_version_at_least(3, 0) && !ctx.is_es_version_at_least(3, 0) {
        return;
    }

    let program = texture_program(ctx).unwrap();
    program.bind();

    // sampled formats with fewer than four components read back with 0 green and blue
    for (format, texel, expected) in [
        (gl::RG8, [0.5, 0.75, 0.25, 1.0], [0.5, 0.75, 0.0]),
        (gl::R32F, [0.25, 0.5, 0.75, 1.0], [0.25, 0.0, 0.0]),
        (gl::RGB8, [1.0, 0.0, 1.0, 0.5], [1.0, 0.0, 1.0]),
    ] {
        let texture = Texture2d::from_image(ctx, format, &Image::solid(2, 2, texel));
        assert_eq!(ctx.get_error(), None, "uploading {:#x}", format);

        texture.bind(0);
        ctx.draw_rect_tex(-1.0, -1.0, 2.0, 2.0, 0.0, 0.0, 1.0, 1.0);
        assert!(ctx.probe_rect_rgb(0, 0, ctx.width, ctx.height, &expected),
                "sampling {:#x}", format);
    }

    // integer texels keep their values
    let texture = Texture2d::from_image(ctx, gl::RGBA8UI,
                                        &Image::solid(4, 4, [3.0, 200.0, 0.0, 17.0]));
    assert_eq!(ctx.get_error(), None);
    let fbo = FramebufferBuilder::new(4, 4).color_texture(&texture, 0).build(ctx).unwrap();
    fbo.bind();
    assert!(ctx.probe_rect_rgba_uint(0, 0, 4, 4, &[3, 200, 0, 17]));
    drop(fbo);

    let _depth = Texture2d::from_image(ctx, gl::DEPTH_COMPONENT24,
                                       &Image::solid(4, 4, [0.5, 0.0, 0.0, 1.0]));
    assert_eq!(ctx.get_error(), None);

    ctx.bind_winsys_framebuffer();
}

fn compile_errors(ctx: &TestContext) {
    match Shader::compile(ctx, ShaderType::Vertex, "this is not GLSL") {
        Err(ProgramCreationError::CompilationError(_, ShaderType::Vertex)) => (),
        other => panic!("unexpected compilation result: {:?}", other.err()),
    }

    let err = Program::from_source(ctx, "void main() {}", "void main() { gl_FragColor = ; }")
        .err()
        .map(TestError::from)
        .unwrap();
    assert_eq!(err.result(), TestResult::Fail);
}

fn framebuffer_object(ctx: &TestContext) {
    let fbo = FramebufferBuilder::new(16, 16)
        .color_renderbuffer(gl::RGBA4)
        .build(ctx)
        .unwrap();
    fbo.bind();

    // the winsys tolerance is built from these, which may exceed the requested 4 bits
    let bits = fbo.renderbuffers()[0].color_bits();
    assert!(bits.iter().all(|&b| b >= 4), "{:?}", bits);

    unsafe { ctx.gl.Viewport(0, 0, 16, 16) };
    support::clear(ctx, [1.0, 0.0, 1.0, 1.0]);
    assert!(ctx.probe_rect_rgba(0, 0, 16, 16, &[1.0, 0.0, 1.0, 1.0]));

    drop(fbo);
    ctx.bind_winsys_framebuffer();
}

fn error_queue(ctx: &TestContext) {
    assert!(ctx.check_error(None));

    unsafe { ctx.gl.Enable(0xffff) };
    assert!(ctx.check_error(Some(GlError::InvalidEnum)));

    unsafe { ctx.gl.Enable(0xffff) };
    assert!(!ctx.check_error(Some(GlError::InvalidValue)));
    ctx.reset_errors();
}

fn subtests(ctx: &TestContext) {
    type Subtest = Box<dyn FnOnce(&TestContext) -> Result<TestResult, TestError>>;

    let passes: Subtest = Box::new(|_: &TestContext| Ok(TestResult::Pass));
    let skips: Subtest = Box::new(|ctx: &TestContext| -> Result<TestResult, TestError> {
        ctx.require_extension("GL_PIGLIT_does_not_exist")?;
        Ok(TestResult::Pass)
    });
    let results = ctx.run_subtests(vec![("passes", passes), ("skips", skips)]);
    assert_eq!(results, TestResult::Pass);

    let result = ctx.subtest("fails", |ctx| {
        support::clear(ctx, [0.0, 0.0, 0.0, 1.0]);
        ctx.probe_rect_rgb(0, 0, 1, 1, &[1.0, 1.0, 1.0])
            .then_some(TestResult::Pass)
            .ok_or_else(|| TestError::failed("probe mismatch"))
    });
    assert_eq!(result, TestResult::Fail);
}
