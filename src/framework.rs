/*!
The entry point of the test programs.

A test implements `GlTest` and calls `run` from `main`, usually through `piglit_main!`:

```no_run
use piglit::{GlTest, TestConfig, TestContext, TestError, TestResult};
use piglit::args::Args;

struct ClearGreen;

impl GlTest for ClearGreen {
    fn config() -> TestConfig {
        TestConfig::default()
    }

    fn init(_ctx: &mut TestContext, _args: &Args) -> Result<ClearGreen, TestError> {
        Ok(ClearGreen)
    }

    fn display(&mut self, ctx: &mut TestContext) -> Result<TestResult, TestError> {
        unsafe {
            ctx.gl.ClearColor(0.0, 1.0, 0.0, 1.0);
            ctx.gl.Clear(piglit::gl::COLOR_BUFFER_BIT);
        }
        Ok(ctx.probe_rect_rgb(0, 0, ctx.width, ctx.height, &[0.0, 1.0, 0.0]).into())
    }
}

piglit::piglit_main!(ClearGreen);
```

In automatic mode (`-auto`), `display` is called once and its result is reported. Otherwise
the window is shown, `display` is called whenever it needs to be redrawn, and the last result
is reported when the window is closed or Escape is pressed.

*/
use std::ops::Deref;
use std::rc::Rc;

use crate::args::Args;
use crate::backend::Facade;
use crate::config::TestConfig;
use crate::context::Context;
use crate::error::TestError;
use crate::fbo::{self, Framebuffer, FramebufferBuilder};
use crate::gl;
use crate::probe::Tolerance;
use crate::result::{self, merge_result, TestResult};
use crate::version::{Api, Version};

/// A test program.
pub trait GlTest: Sized {
    /// Describes the context and the window the test needs.
    fn config() -> TestConfig;

    /// Called once the context is created. Requirement checks and resource creation go here.
    fn init(ctx: &mut TestContext, args: &Args) -> Result<Self, TestError>;

    /// Draws, probes and returns the result.
    fn display(&mut self, ctx: &mut TestContext) -> Result<TestResult, TestError>;
}

/// The context of a running test, with the state of the harness.
///
/// Derefs to `Context`, so that GL calls, requirement checks and probes are all methods of
/// the same value.
pub struct TestContext {
    context: Rc<Context>,

    /// Width of the window, or of the framebuffer object in `-fbo` mode.
    pub width: u32,
    /// Height of the window, or of the framebuffer object in `-fbo` mode.
    pub height: u32,
    /// The test runs with `-auto`.
    pub automatic: bool,
    /// Tolerance of the color probes, computed from the bits of the framebuffer.
    pub tolerance: Tolerance,

    winsys_fbo: Option<Framebuffer>,
    args: Args,
}

impl Deref for TestContext {
    type Target = Context;

    #[inline]
    fn deref(&self) -> &Context {
        &self.context
    }
}

impl Facade for TestContext {
    #[inline]
    fn get_context(&self) -> &Rc<Context> {
        &self.context
    }
}

impl TestContext {
    /// Builds the harness state around a context.
    ///
    /// In `-fbo` mode, this creates the window-sized framebuffer object that replaces the
    /// default framebuffer.
    pub fn new(context: Rc<Context>, config: &TestConfig, args: Args)
               -> Result<TestContext, TestError>
    {
        let automatic = args.auto;
        let (width, height) = (config.window_width, config.window_height);

        let winsys_fbo = if args.fbo && !config.requires_displayed_window {
            Some(create_winsys_fbo(&context, config)?)
        } else {
            None
        };

        // implementations may allocate more bits than the format asks for
        let bits = match winsys_fbo.as_ref().and_then(|fbo| fbo.renderbuffers().first()) {
            Some(color) => color.color_bits(),
            None => context.capabilities().color_bits,
        };
        let tolerance = Tolerance::for_bits(bits[0], bits[1], bits[2], bits[3]);
        log::debug!("probe tolerance {:?}", tolerance);

        let ctx = TestContext { context, width, height, automatic, tolerance, winsys_fbo, args };
        ctx.bind_winsys_framebuffer();
        ctx.reset_errors();
        Ok(ctx)
    }

    /// Returns the command line.
    #[inline]
    pub fn args(&self) -> &Args {
        &self.args
    }

    /// Returns true in `-fbo` mode.
    #[inline]
    pub fn is_fbo_mode(&self) -> bool {
        self.winsys_fbo.is_some()
    }

    /// Binds the framebuffer tests draw into by default: the window, or the framebuffer
    /// object in `-fbo` mode. Also resets the viewport to cover it.
    pub fn bind_winsys_framebuffer(&self) {
        match &self.winsys_fbo {
            Some(fbo) => fbo.bind(),
            None if fbo::is_supported(&self.context) => fbo::bind_default(&self.context),
            None => (),
        }

        unsafe {
            self.context.gl.Viewport(0, 0, self.width as gl::types::GLsizei,
                                     self.height as gl::types::GLsizei);
        }
    }

    /// Shows the result in interactive mode.
    ///
    /// In `-fbo` mode the framebuffer object is first copied to the window.
    pub fn present(&self) {
        if self.automatic {
            return;
        }

        if let Some(winsys) = &self.winsys_fbo {
            if self.context.gl.BlitFramebuffer.is_loaded() {
                let (w, h) = (self.width as gl::types::GLint, self.height as gl::types::GLint);
                winsys.bind_read();
                unsafe {
                    self.context.gl.BindFramebuffer(gl::DRAW_FRAMEBUFFER, 0);
                    self.context.gl.BlitFramebuffer(0, 0, w, h, 0, 0, w, h,
                                                    gl::COLOR_BUFFER_BIT, gl::NEAREST);
                }
            }
        }

        self.context.swap_buffers();
        self.bind_winsys_framebuffer();
    }

    /// Returns true if the subtest should run according to `-subtest`.
    #[inline]
    pub fn is_subtest_selected(&self, name: &str) -> bool {
        self.args.is_subtest_selected(name)
    }

    /// Runs a subtest if it's selected and reports its result.
    ///
    /// An error ends the subtest only: it is printed and converted to the subtest's result.
    /// Returns `Skip` without reporting anything when the subtest isn't selected, so that
    /// merging the result has no effect.
    pub fn subtest<F>(&self, name: &str, f: F) -> TestResult
        where F: FnOnce(&TestContext) -> Result<TestResult, TestError>
    {
        if !self.is_subtest_selected(name) {
            return TestResult::Skip;
        }

        let result = match f(self) {
            Ok(result) => result,
            Err(err) => {
                println!("{}", err);
                err.result()
            },
        };

        result::report_subtest(name, result);
        result
    }

    /// Runs subtests in order and merges their results.
    pub fn run_subtests<'a, I, F>(&self, subtests: I) -> TestResult
        where I: IntoIterator<Item = (&'a str, F)>,
              F: FnOnce(&TestContext) -> Result<TestResult, TestError>
    {
        let mut all = TestResult::Skip;
        for (name, f) in subtests {
            merge_result(&mut all, self.subtest(name, f));
        }
        all
    }
}

/// Checks that the created context matches a version the test supports.
pub fn check_context_version(config: &TestConfig, version: &Version) -> Result<(), TestError> {
    let supported = |required: Option<(u8, u8)>, api: Api| match required {
        Some((major, minor)) => version >= &Version(api, major, minor),
        None => false,
    };

    let ok = match version.0 {
        Api::Gl => supported(config.supports_gl_compat_version, Api::Gl) ||
                   supported(config.supports_gl_core_version, Api::Gl),
        Api::GlEs => supported(config.supports_gl_es_version, Api::GlEs),
    };

    if ok {
        return Ok(());
    }

    let required = match version.0 {
        Api::Gl => config.supports_gl_compat_version.or(config.supports_gl_core_version)
                         .map(|(major, minor)| format!("GL version {}.{}", major, minor)),
        Api::GlEs => config.supports_gl_es_version
                           .map(|(major, minor)| format!("GL ES version {}.{}", major, minor)),
    };

    Err(TestError::unsupported(match required {
        Some(required) => format!("Test requires {}, got OpenGL {}", required, version),
        None => format!("Test doesn't support OpenGL {}", version),
    }))
}

fn winsys_color_format(context: &Context) -> gl::types::GLenum {
    let rgba8 = !context.is_gles() ||
                context.get_version() >= &Version(Api::GlEs, 3, 0) ||
                context.get_extensions().contains("GL_OES_rgb8_rgba8");
    if rgba8 { gl::RGBA8 } else { gl::RGBA4 }
}

fn create_winsys_fbo(context: &Rc<Context>, config: &TestConfig) -> Result<Framebuffer, TestError> {
    let visual = &config.visual;
    let mut builder = FramebufferBuilder::new(config.window_width, config.window_height)
        .samples(u32::from(visual.samples))
        .color_renderbuffer(winsys_color_format(context));

    let es2 = context.is_gles() && context.get_version() < &Version(Api::GlEs, 3, 0);
    builder = match (visual.depth, visual.stencil) {
        (true, true) => builder.depth_stencil_renderbuffer(gl::DEPTH24_STENCIL8),
        (true, false) if es2 => builder.depth_renderbuffer(gl::DEPTH_COMPONENT16),
        (true, false) => builder.depth_renderbuffer(gl::DEPTH_COMPONENT24),
        (false, true) => builder.stencil_renderbuffer(gl::STENCIL_INDEX8),
        (false, false) => builder,
    };

    let fbo = builder.build(context)?;
    log::info!("rendering into a {}x{} framebuffer object", config.window_width,
               config.window_height);
    Ok(fbo)
}

/// Calls `display` with the default framebuffer bound, printing the error if any.
fn display_once<T: GlTest>(test: &mut T, ctx: &mut TestContext) -> TestResult {
    ctx.bind_winsys_framebuffer();

    let result = match test.display(ctx) {
        Ok(result) => result,
        Err(err) => {
            println!("{}", err);
            err.result()
        },
    };

    ctx.present();
    result
}

/// Reports the result of an error that happened before `display`.
fn report_error(err: &dyn std::fmt::Display, result: TestResult) -> ! {
    println!("{}", err);
    result::report_result(result)
}

fn init_logging() {
    // logs go to stderr, stdout carries the results
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .try_init();
}

/// Runs a test program and exits with its result.
#[cfg(feature = "glutin_backend")]
pub fn run<T: GlTest + 'static>() -> ! {
    use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
    use winit::event_loop::EventLoop;

    use crate::backend::glutin::GlutinBackend;

    init_logging();

    let args = match Args::from_env() {
        Ok(args) => args,
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp |
            clap::error::ErrorKind::DisplayVersion => err.exit(),
            _ => report_error(&err, TestResult::Fail),
        },
    };

    let mut config = T::config();
    config.apply_env();

    if args.list_subtests {
        for name in &config.subtests {
            println!("{}", name);
        }
        std::process::exit(0);
    }

    let title = std::env::current_exe().ok()
        .and_then(|exe| exe.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "piglit".to_owned());

    let visible = !args.auto || config.requires_displayed_window || config.force_window;

    let event_loop = EventLoop::new();
    let backend = match GlutinBackend::new(&*event_loop, &config, &title, visible) {
        Ok(backend) => backend,
        Err(err) if err.is_unsupported() => report_error(&err, TestResult::Skip),
        Err(err) => report_error(&err, TestResult::Fail),
    };

    let context = match Context::new(backend, config.debug) {
        Ok(context) => Rc::new(context),
        Err(err) => report_error(&err, TestResult::Fail),
    };

    if let Err(err) = check_context_version(&config, context.get_version()) {
        report_error(&err, err.result());
    }

    let mut ctx = match TestContext::new(context, &config, args.clone()) {
        Ok(ctx) => ctx,
        Err(err) => report_error(&err, err.result()),
    };

    if !config.subtests.is_empty() {
        let selected: Vec<&str> = config.subtests.iter().copied()
            .filter(|name| args.is_subtest_selected(name))
            .collect();
        println!("{}", result::enumerate_subtests_line(&selected));
    }

    let mut test = match T::init(&mut ctx, &args) {
        Ok(test) => test,
        Err(err) => report_error(&err, err.result()),
    };

    if args.auto {
        let result = display_once(&mut test, &mut ctx);
        result::report_result(result);
    }

    let mut last_result = TestResult::Skip;
    event_loop.run(move |event, _, control_flow| {
        control_flow.set_wait();

        match event {
            Event::RedrawRequested(_) => {
                last_result = display_once(&mut test, &mut ctx);
                log::info!("display returned {}", last_result);
            },
            Event::WindowEvent { event: WindowEvent::CloseRequested, .. } |
            Event::WindowEvent {
                event: WindowEvent::KeyboardInput {
                    input: KeyboardInput {
                        state: ElementState::Pressed,
                        virtual_keycode: Some(VirtualKeyCode::Escape),
                        ..
                    },
                    ..
                },
                ..
            } => result::report_result(last_result),
            _ => (),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::check_context_version;
    use crate::config::TestConfig;
    use crate::result::TestResult;
    use crate::version::{Api, Version};

    #[test]
    fn desktop_versions() {
        let config = TestConfig {
            supports_gl_compat_version: Some((2, 0)),
            .. TestConfig::default()
        };

        assert!(check_context_version(&config, &Version(Api::Gl, 2, 1)).is_ok());
        let err = check_context_version(&config, &Version(Api::Gl, 1, 5)).unwrap_err();
        assert_eq!(err.result(), TestResult::Skip);
        assert_eq!(err.to_string(), "Test requires GL version 2.0, got OpenGL 1.5");
        assert!(check_context_version(&config, &Version(Api::GlEs, 3, 0)).is_err());
    }

    #[test]
    fn core_only() {
        let config = TestConfig {
            supports_gl_compat_version: None,
            supports_gl_core_version: Some((3, 2)),
            .. TestConfig::default()
        };

        assert!(check_context_version(&config, &Version(Api::Gl, 4, 5)).is_ok());
        assert!(check_context_version(&config, &Version(Api::Gl, 3, 0)).is_err());
    }

    #[test]
    fn es_versions() {
        let config = TestConfig {
            supports_gl_compat_version: None,
            supports_gl_es_version: Some((3, 0)),
            .. TestConfig::default()
        };

        assert!(check_context_version(&config, &Version(Api::GlEs, 3, 1)).is_ok());
        let err = check_context_version(&config, &Version(Api::Gl, 4, 6)).unwrap_err();
        assert_eq!(err.to_string(), "Test doesn't support OpenGL 4.6");
    }
}
