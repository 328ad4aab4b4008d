/*!

The `backend` module allows one to link between the harness and the window or context
creation library.

A backend exposes a current OpenGL context and its default framebuffer. The harness only ever
uses one backend per process, the one from the `glutin` module, but tests that embed their own
context can implement `Backend` themselves and call `Context::new`.

*/
use std::error::Error;
use std::fmt;
use std::os::raw::c_void;
use std::rc::Rc;

use crate::context::Context;

#[cfg(feature = "glutin_backend")]
pub mod glutin;

/// Trait for types that can be used as a backend for a harness context.
pub trait Backend {
    /// Swaps buffers at the end of a frame.
    fn swap_buffers(&self) -> Result<(), SwapBuffersError>;

    /// Returns the address of an OpenGL function.
    ///
    /// Must be called in the same thread and after the backend has been made current
    /// with `make_current`.
    unsafe fn get_proc_address(&self, symbol: &str) -> *const c_void;

    /// Returns the dimensions of the window, or screen, etc.
    fn get_framebuffer_dimensions(&self) -> (u32, u32);

    /// Returns true if the OpenGL context is the current one in the thread.
    fn is_current(&self) -> bool;

    /// Makes the OpenGL context the current context in the current thread.
    unsafe fn make_current(&self);
}

/// Trait for types that provide a safe access to a `Context`.
///
/// GL objects created by the harness keep a reference to the context so that they can
/// delete themselves when dropped.
pub trait Facade {
    /// Returns an opaque type that contains the OpenGL state, extensions, version, etc.
    fn get_context(&self) -> &Rc<Context>;
}

impl Facade for Rc<Context> {
    #[inline]
    fn get_context(&self) -> &Rc<Context> {
        self
    }
}

/// Error that can happen when swapping buffers.
#[derive(Debug, Clone)]
pub enum SwapBuffersError {
    /// The OpenGL context has been lost and needs to be recreated.
    ContextLost,
    /// The backend refused to present the frame.
    Other(String),
}

impl fmt::Display for SwapBuffersError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapBuffersError::ContextLost => fmt.write_str("the OpenGL context has been lost"),
            SwapBuffersError::Other(msg) => write!(fmt, "failed to swap buffers: {}", msg),
        }
    }
}

impl Error for SwapBuffersError {}
