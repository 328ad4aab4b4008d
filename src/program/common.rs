//! Programs used by many tests.
//!
//! The GLSL dialect is chosen from the context: `#version 100` on OpenGL ES, `#version 150`
//! on core profiles and `#version 110` otherwise.

use crate::backend::Facade;
use crate::context::Context;

use super::{Program, ProgramCreationError};

/// The GLSL dialects the built-in programs are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `#version 100`, for OpenGL ES.
    Es100,
    /// `#version 110`, for compatibility contexts.
    Glsl110,
    /// `#version 150`, for core profiles.
    Glsl150,
}

impl Dialect {
    /// Picks the dialect for a context.
    pub fn for_context(context: &Context) -> Dialect {
        if context.is_gles() {
            Dialect::Es100
        } else if context.capabilities().core_profile {
            Dialect::Glsl150
        } else {
            Dialect::Glsl110
        }
    }

    fn header(&self) -> &'static str {
        match *self {
            Dialect::Es100 => "#version 100\nprecision mediump float;\n",
            Dialect::Glsl110 => "#version 110\n",
            Dialect::Glsl150 => "#version 150\n",
        }
    }

    /// Writes a vertex shader forwarding `piglit_vertex` and optionally `piglit_texcoord`.
    pub fn vertex_shader(&self, texcoord: bool) -> String {
        let (input, output) = match *self {
            Dialect::Glsl150 => ("in", "out"),
            Dialect::Es100 | Dialect::Glsl110 => ("attribute", "varying"),
        };

        let mut source = self.header().to_owned();
        source.push_str(&format!("{} vec4 piglit_vertex;\n", input));
        if texcoord {
            source.push_str(&format!("{} vec2 piglit_texcoord;\n{} vec2 texcoord;\n", input,
                                     output));
        }
        source.push_str("void main() {\n    gl_Position = piglit_vertex;\n");
        if texcoord {
            source.push_str("    texcoord = piglit_texcoord;\n");
        }
        source.push_str("}\n");
        source
    }

    /// Writes a fragment shader whose output is `expression`.
    ///
    /// `texcoord` declares the interpolated texture coordinate.
    pub fn fragment_shader(&self, declarations: &str, texcoord: bool, expression: &str)
                           -> String
    {
        let mut source = self.header().to_owned();
        match *self {
            Dialect::Glsl150 => {
                if texcoord { source.push_str("in vec2 texcoord;\n"); }
                source.push_str("out vec4 piglit_fragcolor;\n");
            },
            Dialect::Es100 | Dialect::Glsl110 => {
                if texcoord { source.push_str("varying vec2 texcoord;\n"); }
            },
        }
        source.push_str(declarations);

        let target = match *self {
            Dialect::Glsl150 => "piglit_fragcolor",
            Dialect::Es100 | Dialect::Glsl110 => "gl_FragColor",
        };
        source.push_str(&format!("void main() {{\n    {} = {};\n}}\n", target, expression));
        source
    }

    /// Name of the 2D texture lookup function.
    pub fn texture_function(&self) -> &'static str {
        match *self {
            Dialect::Glsl150 => "texture",
            Dialect::Es100 | Dialect::Glsl110 => "texture2D",
        }
    }
}

/// Builds a program drawing with the color of the `vec4 color` uniform.
pub fn uniform_color_program<F: ?Sized>(facade: &F) -> Result<Program, ProgramCreationError>
    where F: Facade
{
    let dialect = Dialect::for_context(facade.get_context());
    Program::from_source(facade, &dialect.vertex_shader(false),
                         &dialect.fragment_shader("uniform vec4 color;\n", false, "color"))
}

/// Builds a program sampling the `sampler2D tex` uniform at `piglit_texcoord`.
pub fn texture_program<F: ?Sized>(facade: &F) -> Result<Program, ProgramCreationError>
    where F: Facade
{
    let dialect = Dialect::for_context(facade.get_context());
    let expression = format!("{}(tex, texcoord)", dialect.texture_function());
    let program = Program::from_source(facade, &dialect.vertex_shader(true),
                                       &dialect.fragment_shader("uniform sampler2D tex;\n",
                                                                true, &expression))?;
    program.set_uniform_int("tex", 0);
    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::Dialect;

    #[test]
    fn vertex_shaders() {
        let source = Dialect::Glsl150.vertex_shader(true);
        assert!(source.starts_with("#version 150\n"));
        assert!(source.contains("in vec4 piglit_vertex;"));
        assert!(source.contains("out vec2 texcoord;"));

        let source = Dialect::Es100.vertex_shader(false);
        assert!(source.contains("precision mediump float;"));
        assert!(source.contains("attribute vec4 piglit_vertex;"));
        assert!(!source.contains("piglit_texcoord"));
    }

    #[test]
    fn fragment_shaders() {
        let source = Dialect::Glsl110.fragment_shader("uniform vec4 color;\n", false, "color");
        assert!(source.contains("gl_FragColor = color;"));

        let source = Dialect::Glsl150.fragment_shader("", true, "vec4(texcoord, 0.0, 1.0)");
        assert!(source.contains("in vec2 texcoord;"));
        assert!(source.contains("piglit_fragcolor = vec4(texcoord, 0.0, 1.0);"));
    }
}
