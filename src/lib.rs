/*!
Harness for OpenGL and OpenGL ES conformance tests.

Every test is a standalone program: a type implementing `GlTest`, and a `main` function
generated by `piglit_main!`. The harness creates the window and the context the test asks for,
skips the test when the implementation lacks a required version or extension, and reports the
result in a form that the test runner parses.

# Writing a test

```no_run
use piglit::{gl, piglit_main, GlTest, TestConfig, TestContext, TestError, TestResult};
use piglit::args::Args;
use piglit::program::Program;
use piglit::program::common::uniform_color_program;

struct DrawRect {
    program: Program,
}

impl GlTest for DrawRect {
    fn config() -> TestConfig {
        TestConfig {
            supports_gl_compat_version: Some((2, 0)),
            supports_gl_es_version: Some((2, 0)),
            .. TestConfig::default()
        }
    }

    fn init(ctx: &mut TestContext, _: &Args) -> Result<DrawRect, TestError> {
        let program = uniform_color_program(ctx)?;
        program.set_uniform_vec4("color", [0.0, 0.0, 1.0, 1.0]);
        Ok(DrawRect { program })
    }

    fn display(&mut self, ctx: &mut TestContext) -> Result<TestResult, TestError> {
        unsafe {
            ctx.gl.ClearColor(0.0, 0.0, 0.0, 1.0);
            ctx.gl.Clear(gl::COLOR_BUFFER_BIT);
        }

        self.program.bind();
        ctx.draw_rect(-1.0, -1.0, 1.0, 2.0);

        let (w, h) = (ctx.width, ctx.height);
        let pass = ctx.probe_rect_rgba(0, 0, w / 2, h, &[0.0, 0.0, 1.0, 1.0]) &
                   ctx.probe_rect_rgba(w as i32 / 2, 0, w - w / 2, h, &[0.0, 0.0, 0.0, 1.0]);
        Ok(pass.into())
    }
}

piglit_main!(DrawRect);
```

# Output

The test prints diagnostics freely on stdout, and then exactly one line of the form
`PIGLIT: {"result": "pass"}`. Tests with subtests additionally print one
`PIGLIT: {"subtest": {"<name>": "<result>"}}` line per subtest. The exit status is 0 for pass,
skip and warn, 1 for fail.

Diagnostics of the harness itself go through the `log` crate, and are printed on stderr when
`RUST_LOG` enables them.

# Environment

 - `PIGLIT_DEFAULT_SIZE=WxH` overrides the window size.
 - `PIGLIT_FORCE_WINDOW=1` shows the window even with `-auto`.
 - `PIGLIT_KHR_NO_ERROR=1` requests a `KHR_no_error` context.
 - `PIGLIT_GL_DEBUG=1` enables `KHR_debug` output, logged through `log`.
 - `PIGLIT_DUMP_DIR=<dir>` saves the framebuffer region of every failed color probe as PNG.
 - `PIGLIT_SOURCE_DIR=<dir>` is the root of the data files loaded by tests.

*/
#![warn(missing_docs)]

#[macro_use]
extern crate lazy_static;

pub use crate::args::Args;
pub use crate::config::TestConfig;
pub use crate::context::Context;
pub use crate::error::{GlError, TestError};
pub use crate::framework::{GlTest, TestContext};
pub use crate::result::TestResult;
pub use crate::version::{Api, Version};

#[macro_use]
mod macros;

pub mod args;
pub mod backend;
pub mod config;
pub mod context;
pub mod enums;
pub mod error;
pub mod fbo;
pub mod framework;
pub mod ops;
pub mod probe;
pub mod program;
pub mod reference;
pub mod result;
pub mod texture;
pub mod version;

mod require;

/// The raw OpenGL bindings.
#[allow(missing_docs, clippy::all)]
pub mod gl {
    include!(concat!(env!("OUT_DIR"), "/gl_bindings.rs"));
}

/// Trait for objects that are OpenGL objects.
pub trait GlObject {
    /// The type of identifier for this object.
    type Id;

    /// Returns the id of the object.
    fn get_id(&self) -> Self::Id;
}
