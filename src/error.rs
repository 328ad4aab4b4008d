//! GL errors and the error type of test programs.

use std::error::Error;
use std::fmt;

use crate::fbo::FramebufferError;
use crate::gl;
use crate::probe::ProbeFailure;
use crate::program::ProgramCreationError;
use crate::result::TestResult;

/// A value returned by `glGetError`, other than `GL_NO_ERROR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlError {
    /// `GL_INVALID_ENUM`
    InvalidEnum,
    /// `GL_INVALID_VALUE`
    InvalidValue,
    /// `GL_INVALID_OPERATION`
    InvalidOperation,
    /// `GL_STACK_OVERFLOW`
    StackOverflow,
    /// `GL_STACK_UNDERFLOW`
    StackUnderflow,
    /// `GL_OUT_OF_MEMORY`
    OutOfMemory,
    /// `GL_INVALID_FRAMEBUFFER_OPERATION`
    InvalidFramebufferOperation,
    /// `GL_CONTEXT_LOST`
    ContextLost,
    /// A value that isn't a documented error code.
    Unknown(gl::types::GLenum),
}

impl GlError {
    /// Converts the return value of `glGetError`. `GL_NO_ERROR` gives `None`.
    pub fn from_glenum(value: gl::types::GLenum) -> Option<GlError> {
        Some(match value {
            gl::NO_ERROR => return None,
            gl::INVALID_ENUM => GlError::InvalidEnum,
            gl::INVALID_VALUE => GlError::InvalidValue,
            gl::INVALID_OPERATION => GlError::InvalidOperation,
            gl::STACK_OVERFLOW => GlError::StackOverflow,
            gl::STACK_UNDERFLOW => GlError::StackUnderflow,
            gl::OUT_OF_MEMORY => GlError::OutOfMemory,
            gl::INVALID_FRAMEBUFFER_OPERATION => GlError::InvalidFramebufferOperation,
            gl::CONTEXT_LOST => GlError::ContextLost,
            other => GlError::Unknown(other),
        })
    }

    /// Returns the value as returned by `glGetError`.
    pub fn to_glenum(&self) -> gl::types::GLenum {
        match *self {
            GlError::InvalidEnum => gl::INVALID_ENUM,
            GlError::InvalidValue => gl::INVALID_VALUE,
            GlError::InvalidOperation => gl::INVALID_OPERATION,
            GlError::StackOverflow => gl::STACK_OVERFLOW,
            GlError::StackUnderflow => gl::STACK_UNDERFLOW,
            GlError::OutOfMemory => gl::OUT_OF_MEMORY,
            GlError::InvalidFramebufferOperation => gl::INVALID_FRAMEBUFFER_OPERATION,
            GlError::ContextLost => gl::CONTEXT_LOST,
            GlError::Unknown(value) => value,
        }
    }

    /// Returns the name of the error, eg. `"GL_INVALID_ENUM"`.
    pub fn name(&self) -> &'static str {
        match *self {
            GlError::InvalidEnum => "GL_INVALID_ENUM",
            GlError::InvalidValue => "GL_INVALID_VALUE",
            GlError::InvalidOperation => "GL_INVALID_OPERATION",
            GlError::StackOverflow => "GL_STACK_OVERFLOW",
            GlError::StackUnderflow => "GL_STACK_UNDERFLOW",
            GlError::OutOfMemory => "GL_OUT_OF_MEMORY",
            GlError::InvalidFramebufferOperation => "GL_INVALID_FRAMEBUFFER_OPERATION",
            GlError::ContextLost => "GL_CONTEXT_LOST",
            GlError::Unknown(_) => "(unrecognized error)",
        }
    }
}

impl fmt::Display for GlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} 0x{:x}", self.name(), self.to_glenum())
    }
}

/// Error that ends a test early.
///
/// Each variant corresponds to a final result: see `TestError::result`. Requirement checks
/// return `Unsupported`, so test code can use `?` on them.
#[derive(Debug)]
pub enum TestError {
    /// The implementation lacks something the test needs.
    Unsupported(String),

    /// The test observed something wrong.
    Failed(String),

    /// A shader failed to compile or a program failed to link.
    Program(ProgramCreationError),

    /// A framebuffer object is incomplete.
    Framebuffer(FramebufferError),

    /// `glGetError` returned an unexpected error.
    Gl {
        /// The error that was returned.
        error: GlError,
        /// The location in the test source, as `file:line`.
        location: String,
    },

    /// A probe didn't match.
    Probe(ProbeFailure),
}

impl TestError {
    /// Builds an `Unsupported` error.
    pub fn unsupported<S: Into<String>>(msg: S) -> TestError {
        TestError::Unsupported(msg.into())
    }

    /// Builds a `Failed` error.
    pub fn failed<S: Into<String>>(msg: S) -> TestError {
        TestError::Failed(msg.into())
    }

    /// Returns the result the test reports when it ends with this error.
    pub fn result(&self) -> TestResult {
        match self {
            TestError::Unsupported(_) => TestResult::Skip,
            TestError::Framebuffer(err) if err.is_unsupported() => TestResult::Skip,
            TestError::Program(ProgramCreationError::ShaderTypeNotSupported) |
            TestError::Program(ProgramCreationError::CompilationNotSupported) => TestResult::Skip,
            TestError::Failed(_) |
            TestError::Program(_) |
            TestError::Framebuffer(_) |
            TestError::Gl { .. } |
            TestError::Probe(_) => TestResult::Fail,
        }
    }
}

impl fmt::Display for TestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestError::Unsupported(msg) => f.write_str(msg),
            TestError::Failed(msg) => f.write_str(msg),
            TestError::Program(err) => write!(f, "{}", err),
            TestError::Framebuffer(err) => write!(f, "{}", err),
            TestError::Gl { error, location } => {
                write!(f, "Unexpected GL error: {}\n(Error at {})", error, location)
            },
            TestError::Probe(failure) => write!(f, "{}", failure),
        }
    }
}

impl Error for TestError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TestError::Program(err) => Some(err),
            TestError::Framebuffer(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ProgramCreationError> for TestError {
    fn from(err: ProgramCreationError) -> TestError {
        TestError::Program(err)
    }
}

impl From<FramebufferError> for TestError {
    fn from(err: FramebufferError) -> TestError {
        TestError::Framebuffer(err)
    }
}

impl From<ProbeFailure> for TestError {
    fn from(failure: ProbeFailure) -> TestError {
        TestError::Probe(failure)
    }
}

impl From<std::io::Error> for TestError {
    fn from(err: std::io::Error) -> TestError {
        TestError::Failed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{GlError, TestError};
    use crate::gl;
    use crate::result::TestResult;

    #[test]
    fn error_codes() {
        assert_eq!(GlError::from_glenum(gl::NO_ERROR), None);
        assert_eq!(GlError::from_glenum(0x0500), Some(GlError::InvalidEnum));
        assert_eq!(GlError::from_glenum(0x0506), Some(GlError::InvalidFramebufferOperation));
        assert_eq!(GlError::from_glenum(0x1234), Some(GlError::Unknown(0x1234)));
        assert_eq!(GlError::InvalidValue.to_glenum(), 0x0501);
    }

    #[test]
    fn error_display() {
        assert_eq!(GlError::InvalidOperation.to_string(), "GL_INVALID_OPERATION 0x502");
    }

    #[test]
    fn results() {
        assert_eq!(TestError::unsupported("Test requires GL_KHR_debug").result(),
                   TestResult::Skip);
        assert_eq!(TestError::failed("bad").result(), TestResult::Fail);
        let gl = TestError::Gl { error: GlError::InvalidEnum, location: "a.rs:1".to_owned() };
        assert_eq!(gl.result(), TestResult::Fail);
        assert_eq!(gl.to_string(), "Unexpected GL error: GL_INVALID_ENUM 0x500\n(Error at a.rs:1)");
    }
}
