/*!
Compiling shaders and linking programs.

```no_run
# fn example(ctx: &piglit::framework::TestContext) -> Result<(), piglit::TestError> {
use piglit::program::Program;

let program = Program::from_source(ctx, "
    #version 110
    attribute vec4 piglit_vertex;
    void main() { gl_Position = piglit_vertex; }
", "
    #version 110
    uniform vec4 color;
    void main() { gl_FragColor = color; }
")?;

program.set_uniform_vec4("color", [0.0, 1.0, 0.0, 1.0]);
ctx.draw_rect(-1.0, -1.0, 2.0, 2.0);
# Ok(())
# }
```

Every error is a `ProgramCreationError`, which converts into a `TestError`: a missing
shader stage or compiler gives a skip, a compilation or link error gives a failure.

*/
use std::error::Error;
use std::fmt;

use crate::gl;

pub use self::program::Program;
pub use self::shader::{is_shader_type_supported, Shader};

pub mod common;
mod program;
mod shader;

/// Error that can happen while creating a program.
#[derive(Clone, Debug)]
pub enum ProgramCreationError {
    /// Error while compiling one of the shaders.
    CompilationError(String, ShaderType),

    /// Error while linking the program.
    LinkingError(String),

    /// One of the requested shader types is not supported by the implementation.
    ///
    /// Usually the case for geometry, tessellation and compute shaders.
    ShaderTypeNotSupported,

    /// The OpenGL implementation doesn't provide a compiler.
    CompilationNotSupported,
}

impl fmt::Display for ProgramCreationError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::ProgramCreationError::*;
        match self {
            CompilationError(log, ty) =>
                write!(fmt, "Failed to compile {} shader:\n{}", ty.name(), log),
            LinkingError(log) =>
                write!(fmt, "Failed to link program:\n{}", log),
            ShaderTypeNotSupported =>
                fmt.write_str("One of the requested shader types is not supported"),
            CompilationNotSupported =>
                fmt.write_str("The implementation doesn't support shader compilation"),
        }
    }
}

impl Error for ProgramCreationError {}

/// List of shader stages.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShaderType {
    /// `GL_VERTEX_SHADER`.
    Vertex,
    /// `GL_GEOMETRY_SHADER`, GL 3.2 or GL ES 3.2.
    Geometry,
    /// `GL_TESS_CONTROL_SHADER`, GL 4.0 or GL ES 3.2.
    TessControl,
    /// `GL_TESS_EVALUATION_SHADER`, GL 4.0 or GL ES 3.2.
    TessEvaluation,
    /// `GL_FRAGMENT_SHADER`.
    Fragment,
    /// `GL_COMPUTE_SHADER`, GL 4.3 or GL ES 3.1.
    Compute,
}

impl ShaderType {
    /// Returns the matching `GL_*_SHADER` enum.
    pub fn to_glenum(&self) -> gl::types::GLenum {
        match *self {
            ShaderType::Vertex => gl::VERTEX_SHADER,
            ShaderType::Geometry => gl::GEOMETRY_SHADER,
            ShaderType::TessControl => gl::TESS_CONTROL_SHADER,
            ShaderType::TessEvaluation => gl::TESS_EVALUATION_SHADER,
            ShaderType::Fragment => gl::FRAGMENT_SHADER,
            ShaderType::Compute => gl::COMPUTE_SHADER,
        }
    }

    /// Converts a `GL_*_SHADER` enum.
    pub fn from_glenum(ty: gl::types::GLenum) -> Option<ShaderType> {
        Some(match ty {
            gl::VERTEX_SHADER => ShaderType::Vertex,
            gl::GEOMETRY_SHADER => ShaderType::Geometry,
            gl::TESS_CONTROL_SHADER => ShaderType::TessControl,
            gl::TESS_EVALUATION_SHADER => ShaderType::TessEvaluation,
            gl::FRAGMENT_SHADER => ShaderType::Fragment,
            gl::COMPUTE_SHADER => ShaderType::Compute,
            _ => return None,
        })
    }

    /// Name of the stage in messages.
    pub fn name(&self) -> &'static str {
        match *self {
            ShaderType::Vertex => "vertex",
            ShaderType::Geometry => "geometry",
            ShaderType::TessControl => "tessellation control",
            ShaderType::TessEvaluation => "tessellation evaluation",
            ShaderType::Fragment => "fragment",
            ShaderType::Compute => "compute",
        }
    }
}

/// Converts an info log returned by the driver, which may not be valid UTF-8 and may end
/// with a nul byte.
pub(crate) fn info_log_to_string(mut log: Vec<u8>) -> String {
    while log.last() == Some(&0) {
        log.pop();
    }
    String::from_utf8_lossy(&log).into_owned()
}
