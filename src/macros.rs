//! Defines useful macros for test programs.

/// Returns `TestError::Gl` from the enclosing function if the GL error queue isn't empty.
///
/// The error carries the file and line number of the macro invocation.
///
/// ## Example
/// ```ignore rust
/// unsafe { ctx.gl.Clear(piglit::gl::COLOR_BUFFER_BIT) };
/// gl_check!(ctx);
/// ```
#[macro_export]
macro_rules! gl_check {
    ($ctx: expr) => {
        if let Some(error) = $ctx.get_error() {
            return Err($crate::TestError::Gl {
                error,
                location: format!("{}:{}", file!(), line!()),
            });
        }
    };
}

/// Returns `TestError::Failed` from the enclosing function if the next GL error isn't the
/// expected one.
///
/// The second argument is a `GlError`, or `None` to expect an empty queue.
///
/// ## Example
/// ```ignore rust
/// unsafe { ctx.gl.Enable(0xffff) };
/// expect_gl_error!(ctx, Some(GlError::InvalidEnum));
/// ```
#[macro_export]
macro_rules! expect_gl_error {
    ($ctx: expr, $expected: expr) => {
        if !$ctx.check_error($expected) {
            return Err($crate::TestError::failed(
                format!("unexpected GL error state at {}:{}", file!(), line!())));
        }
    };
}

/// Defines the `main` function of a test program.
///
/// ## Example
/// ```ignore rust
/// struct ScissorClear;
/// impl GlTest for ScissorClear { ... }
///
/// piglit_main!(ScissorClear);
/// ```
#[macro_export]
macro_rules! piglit_main {
    ($test: ty) => {
        fn main() {
            $crate::framework::run::<$test>()
        }
    };
}
