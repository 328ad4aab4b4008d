/*!
Test supports module.

*/

#![allow(dead_code)]

use std::env;
use std::rc::Rc;

use piglit::args::Args;
use piglit::backend::glutin::GlutinBackend;
use piglit::reference::Image;
use piglit::texture::Texture2d;
use piglit::{gl, Context, TestConfig, TestContext};

use winit::event_loop::{EventLoop, EventLoopBuilder};

/// Returns true if the tests that need an OpenGL implementation should run.
pub fn gl_tests_enabled() -> bool {
    env::var("PIGLIT_GL_TESTS").is_ok()
}

/// Builds the event loop, allowing it outside of the main thread since the test harness runs
/// every test in its own thread.
fn build_event_loop() -> EventLoop<()> {
    let mut builder = EventLoopBuilder::new();

    #[cfg(all(unix, not(target_os = "macos")))]
    {
        use winit::platform::x11::EventLoopBuilderExtX11;
        builder.with_any_thread(true);
    }

    builder.build()
}

/// Builds a context with a hidden window, as `-auto` would.
///
/// Only one event loop can exist per process, so each test file builds a single context and
/// runs all of its checks with it.
pub fn build_context(config: &TestConfig) -> (EventLoop<()>, TestContext) {
    let event_loop = build_event_loop();
    let backend = GlutinBackend::new(&*event_loop, config, "piglit-tests", false).unwrap();
    let context = Rc::new(Context::new(backend, true).unwrap());

    let args = Args { auto: true, .. Args::default() };
    let ctx = TestContext::new(context, config, args).unwrap();
    (event_loop, ctx)
}

/// Builds a 2x2 unicolor texture.
pub fn build_unicolor_texture2d(ctx: &TestContext, red: f32, green: f32, blue: f32)
                                -> Texture2d
{
    Texture2d::from_image(ctx, gl::RGBA8, &Image::solid(2, 2, [red, green, blue, 1.0]))
}

/// Clears the current framebuffer to a color.
pub fn clear(ctx: &TestContext, color: [f32; 4]) {
    unsafe {
        ctx.gl.ClearColor(color[0], color[1], color[2], color[3]);
        ctx.gl.Clear(gl::COLOR_BUFFER_BIT);
    }
}
