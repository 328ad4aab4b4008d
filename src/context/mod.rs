//! The OpenGL context of a test, along with everything queried from it at startup.

use std::fmt;
use std::os::raw;
use std::panic::Location;
use std::ptr;

use crate::backend::Backend;
use crate::error::GlError;
use crate::gl;
use crate::version::{self, Api, Version, VersionParseError};

pub use self::capabilities::Capabilities;
pub use self::extensions::ExtensionsList;

mod capabilities;
mod extensions;

/// Stores the function pointers of a GL context and the information that was queried
/// when it was created.
pub struct Context {
    /// The loaded OpenGL entry points.
    ///
    /// All calls are `unsafe`; the context must be current, which is always the case for the
    /// single-threaded test programs once `Context::new` has returned.
    pub gl: gl::Gl,

    version: Version,
    glsl_version: Option<Version>,
    extensions: ExtensionsList,
    capabilities: Capabilities,
    renderer: String,
    vendor: String,

    backend: Box<dyn Backend>,
}

/// Error that can happen while loading the context.
#[derive(Clone, Debug)]
pub enum ContextError {
    /// `GL_VERSION` or `GL_SHADING_LANGUAGE_VERSION` couldn't be parsed.
    Version(VersionParseError),
}

impl fmt::Display for ContextError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextError::Version(err) => write!(fmt, "{}", err),
        }
    }
}

impl std::error::Error for ContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContextError::Version(err) => Some(err),
        }
    }
}

impl From<VersionParseError> for ContextError {
    fn from(err: VersionParseError) -> ContextError {
        ContextError::Version(err)
    }
}

impl Context {
    /// Builds a new context from a backend.
    ///
    /// The backend is made current and every entry point is loaded through it. When
    /// `debug` is true and the implementation supports `GL_KHR_debug`, debug messages are
    /// forwarded to the `log` crate.
    pub fn new<B>(backend: B, debug: bool) -> Result<Context, ContextError>
        where B: Backend + 'static
    {
        unsafe { backend.make_current() };
        let gl = gl::Gl::load_with(|symbol| unsafe { backend.get_proc_address(symbol) });

        let (version, glsl_version, extensions, capabilities, renderer, vendor) = unsafe {
            let version = version::get_gl_version(&gl)?;
            let glsl_version = version::get_glsl_version(&gl, &version)?;
            let extensions = extensions::get_extensions(&gl, &version);
            let capabilities = capabilities::get_capabilities(&gl, &version);
            let renderer = version::get_string(&gl, gl::RENDERER).unwrap_or_default();
            let vendor = version::get_string(&gl, gl::VENDOR).unwrap_or_default();
            (version, glsl_version, extensions, capabilities, renderer, vendor)
        };

        log::info!("GL renderer: {} ({}), version {}", renderer, vendor, version);
        log::debug!("{} extensions, GLSL {:?}, {:?}", extensions.len(), glsl_version,
                    capabilities);

        let context = Context {
            gl,
            version,
            glsl_version,
            extensions,
            capabilities,
            renderer,
            vendor,
            backend: Box::new(backend),
        };

        if debug {
            context.enable_debug_output();
        }

        // tests start from an empty error queue
        context.reset_errors();

        Ok(context)
    }

    /// Returns the version of OpenGL of the context.
    #[inline]
    pub fn get_version(&self) -> &Version {
        &self.version
    }

    /// Returns the GLSL version supported by the compiler, or `None` if there is no
    /// compiler.
    #[inline]
    pub fn get_glsl_version(&self) -> Option<&Version> {
        self.glsl_version.as_ref()
    }

    /// Returns the list of extensions supported by the implementation.
    #[inline]
    pub fn get_extensions(&self) -> &ExtensionsList {
        &self.extensions
    }

    /// Returns the capabilities of the implementation.
    #[inline]
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Returns the content of `GL_RENDERER`.
    #[inline]
    pub fn get_renderer(&self) -> &str {
        &self.renderer
    }

    /// Returns the content of `GL_VENDOR`.
    #[inline]
    pub fn get_vendor(&self) -> &str {
        &self.vendor
    }

    /// Returns true if this is an OpenGL ES context.
    #[inline]
    pub fn is_gles(&self) -> bool {
        self.version.0 == Api::GlEs
    }

    /// Returns the dimensions of the default framebuffer.
    #[inline]
    pub fn get_framebuffer_dimensions(&self) -> (u32, u32) {
        self.backend.get_framebuffer_dimensions()
    }

    /// Makes the context current if it isn't already.
    pub fn make_current(&self) {
        if !self.backend.is_current() {
            unsafe { self.backend.make_current() };
        }
    }

    /// Presents the default framebuffer.
    pub fn swap_buffers(&self) {
        self.make_current();

        // this is necessary on Windows 8, or nothing is being displayed
        unsafe { self.gl.Flush() };

        if let Err(err) = self.backend.swap_buffers() {
            log::warn!("failed to swap buffers: {}", err);
        }
    }

    /// Returns the next error of the GL error queue, if any.
    #[inline]
    pub fn get_error(&self) -> Option<GlError> {
        GlError::from_glenum(unsafe { self.gl.GetError() })
    }

    /// Drains the GL error queue.
    pub fn reset_errors(&self) {
        // the queue may hold one entry per error flag; bound the loop in case of a lost
        // context that keeps returning errors
        for _ in 0 .. 16 {
            if self.get_error().is_none() {
                break;
            }
        }
    }

    /// Checks that the next error of the queue is `expected`, `None` meaning "no error".
    ///
    /// On mismatch, prints the observed and expected errors along with the location of the
    /// caller and returns false.
    #[track_caller]
    pub fn check_error(&self, expected: Option<GlError>) -> bool {
        let observed = self.get_error();
        if observed == expected {
            return true;
        }

        let location = Location::caller();
        match observed {
            Some(err) => println!("Unexpected GL error: {} 0x{:x}", err.name(), err.to_glenum()),
            None => println!("Unexpected GL error: GL_NO_ERROR 0x0"),
        }
        if let Some(err) = expected {
            println!("Expected GL error: {} 0x{:x}", err.name(), err.to_glenum());
        }
        println!("(Error at {}:{})", location.file(), location.line());

        false
    }

    fn enable_debug_output(&self) {
        let supported = self.version >= Version(Api::Gl, 4, 3) ||
                        self.version >= Version(Api::GlEs, 3, 2) ||
                        self.extensions.contains("GL_KHR_debug");

        if !supported || !self.gl.DebugMessageCallback.is_loaded() {
            log::debug!("debug output requested but GL_KHR_debug is not available");
            return;
        }

        unsafe {
            self.gl.DebugMessageCallback(Some(debug_callback), ptr::null());
            self.gl.DebugMessageControl(gl::DONT_CARE, gl::DONT_CARE, gl::DONT_CARE, 0,
                                        ptr::null(), gl::TRUE);
            self.gl.Enable(gl::DEBUG_OUTPUT_SYNCHRONOUS);
            self.gl.Enable(gl::DEBUG_OUTPUT);
        }
    }
}

extern "system" fn debug_callback(source: gl::types::GLenum, ty: gl::types::GLenum,
                                  id: gl::types::GLuint, severity: gl::types::GLenum,
                                  length: gl::types::GLsizei,
                                  message: *const gl::types::GLchar,
                                  _user_param: *mut raw::c_void)
{
    let message = if message.is_null() {
        String::new()
    } else if length >= 0 {
        let bytes = unsafe { std::slice::from_raw_parts(message as *const u8, length as usize) };
        String::from_utf8_lossy(bytes).into_owned()
    } else {
        unsafe { std::ffi::CStr::from_ptr(message) }.to_string_lossy().into_owned()
    };

    let source = crate::enums::enum_name(source);
    let ty = crate::enums::enum_name(ty);

    match severity {
        gl::DEBUG_SEVERITY_HIGH => {
            let backtrace = backtrace::Backtrace::new();
            log::warn!("GL debug [{} {} {}]: {}\n{:?}", source, ty, id, message, backtrace);
        },
        gl::DEBUG_SEVERITY_MEDIUM => log::info!("GL debug [{} {} {}]: {}", source, ty, id, message),
        _ => log::debug!("GL debug [{} {} {}]: {}", source, ty, id, message),
    }
}
