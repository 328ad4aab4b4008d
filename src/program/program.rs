use std::ffi::CString;
use std::rc::Rc;

use crate::backend::Facade;
use crate::context::Context;
use crate::gl;
use crate::ops::{ATTRIB_POS, ATTRIB_TEX};
use crate::GlObject;

use super::{info_log_to_string, ProgramCreationError, Shader, ShaderType};

/// A linked program.
pub struct Program {
    context: Rc<Context>,
    id: gl::types::GLuint,
}

impl GlObject for Program {
    type Id = gl::types::GLuint;

    #[inline]
    fn get_id(&self) -> gl::types::GLuint {
        self.id
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe {
            let mut current: gl::types::GLint = 0;
            self.context.gl.GetIntegerv(gl::CURRENT_PROGRAM, &mut current);
            if current as gl::types::GLuint == self.id {
                self.context.gl.UseProgram(0);
            }
            self.context.gl.DeleteProgram(self.id);
        }
    }
}

impl Program {
    /// Links compiled shaders together.
    ///
    /// `piglit_vertex` is bound to attribute 0 and `piglit_texcoord` to attribute 1 before
    /// linking, so that the programs work with `draw_rect`.
    pub fn link<F: ?Sized>(facade: &F, shaders: &[&Shader]) -> Result<Program, ProgramCreationError>
        where F: Facade
    {
        let context = facade.get_context();
        let gl = &context.gl;

        let id = unsafe { gl.CreateProgram() };
        let program = Program { context: context.clone(), id };

        let success = unsafe {
            for shader in shaders {
                gl.AttachShader(id, shader.get_id());
            }

            for (location, name) in [(ATTRIB_POS, &b"piglit_vertex\0"[..]),
                                     (ATTRIB_TEX, &b"piglit_texcoord\0"[..])]
            {
                gl.BindAttribLocation(id, location, name.as_ptr() as *const gl::types::GLchar);
            }

            gl.LinkProgram(id);

            // the shaders may be dropped before the program
            for shader in shaders {
                gl.DetachShader(id, shader.get_id());
            }

            let mut success: gl::types::GLint = 0;
            gl.GetProgramiv(id, gl::LINK_STATUS, &mut success);
            success != 0
        };

        let log = program.info_log();
        if !success {
            return Err(ProgramCreationError::LinkingError(log));
        }

        if !log.trim().is_empty() {
            log::debug!("program linked with log:\n{}", log);
        }

        Ok(program)
    }

    /// Compiles a vertex and a fragment shader and links them.
    pub fn from_source<F: ?Sized>(facade: &F, vertex_shader: &str, fragment_shader: &str)
                                  -> Result<Program, ProgramCreationError> where F: Facade
    {
        Program::from_sources(facade, &[(ShaderType::Vertex, vertex_shader),
                                        (ShaderType::Fragment, fragment_shader)])
    }

    /// Compiles shaders of any stages and links them.
    ///
    /// Stages can be omitted, for example to build a program with only a fragment shader on
    /// a compatibility context.
    pub fn from_sources<F: ?Sized>(facade: &F, sources: &[(ShaderType, &str)])
                                   -> Result<Program, ProgramCreationError> where F: Facade
    {
        let shaders = sources.iter()
            .map(|&(ty, source)| Shader::compile(facade, ty, source))
            .collect::<Result<Vec<_>, _>>()?;

        let shaders: Vec<&Shader> = shaders.iter().collect();
        Program::link(facade, &shaders)
    }

    /// Makes the program current with `glUseProgram`.
    #[inline]
    pub fn bind(&self) {
        unsafe { self.context.gl.UseProgram(self.id) };
    }

    /// Returns the link log.
    pub fn info_log(&self) -> String {
        let gl = &self.context.gl;

        unsafe {
            let mut length: gl::types::GLint = 0;
            gl.GetProgramiv(self.id, gl::INFO_LOG_LENGTH, &mut length);
            if length <= 0 {
                return String::new();
            }

            let mut log = vec![0u8; length as usize];
            let mut written: gl::types::GLsizei = 0;
            gl.GetProgramInfoLog(self.id, length, &mut written,
                                 log.as_mut_ptr() as *mut gl::types::GLchar);
            log.truncate(written.max(0) as usize);
            info_log_to_string(log)
        }
    }

    /// Runs `glValidateProgram` and returns the log on failure.
    pub fn validate(&self) -> Result<(), String> {
        let status = unsafe {
            self.context.gl.ValidateProgram(self.id);
            let mut status: gl::types::GLint = 0;
            self.context.gl.GetProgramiv(self.id, gl::VALIDATE_STATUS, &mut status);
            status
        };

        if status != 0 { Ok(()) } else { Err(self.info_log()) }
    }

    /// Returns the location of a uniform, or `None` if it's not active.
    pub fn uniform_location(&self, name: &str) -> Option<gl::types::GLint> {
        let name = CString::new(name).ok()?;
        let location = unsafe { self.context.gl.GetUniformLocation(self.id, name.as_ptr()) };
        if location < 0 { None } else { Some(location) }
    }

    /// Returns the location of an attribute, or `None` if it's not active.
    pub fn attrib_location(&self, name: &str) -> Option<gl::types::GLuint> {
        let name = CString::new(name).ok()?;
        let location = unsafe { self.context.gl.GetAttribLocation(self.id, name.as_ptr()) };
        if location < 0 { None } else { Some(location as gl::types::GLuint) }
    }

    /// Binds the program and sets a uniform through `f`.
    ///
    /// Uniforms that aren't active are ignored, like OpenGL does for location -1.
    fn set_uniform<T>(&self, name: &str, f: T) where T: FnOnce(&gl::Gl, gl::types::GLint) {
        self.bind();
        match self.uniform_location(name) {
            Some(location) => f(&self.context.gl, location),
            None => log::debug!("uniform {} is not active", name),
        }
    }

    /// Sets a `float` uniform.
    pub fn set_uniform_float(&self, name: &str, value: f32) {
        self.set_uniform(name, |gl, location| unsafe { gl.Uniform1f(location, value) });
    }

    /// Sets an `int` or sampler uniform.
    pub fn set_uniform_int(&self, name: &str, value: i32) {
        self.set_uniform(name, |gl, location| unsafe { gl.Uniform1i(location, value) });
    }

    /// Sets a `vec2` uniform.
    pub fn set_uniform_vec2(&self, name: &str, value: [f32; 2]) {
        self.set_uniform(name, |gl, location| unsafe { gl.Uniform2fv(location, 1, value.as_ptr()) });
    }

    /// Sets a `vec4` uniform.
    pub fn set_uniform_vec4(&self, name: &str, value: [f32; 4]) {
        self.set_uniform(name, |gl, location| unsafe { gl.Uniform4fv(location, 1, value.as_ptr()) });
    }

    /// Sets a `mat4` uniform from a column-major matrix.
    pub fn set_uniform_mat4(&self, name: &str, value: [[f32; 4]; 4]) {
        self.set_uniform(name, |gl, location| unsafe {
            gl.UniformMatrix4fv(location, 1, gl::FALSE, value.as_ptr() as *const f32)
        });
    }
}
