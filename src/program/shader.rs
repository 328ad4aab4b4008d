use std::ffi::CString;
use std::ptr;
use std::rc::Rc;

use crate::backend::Facade;
use crate::context::Context;
use crate::gl;
use crate::version::{Api, Version};
use crate::GlObject;

use super::{info_log_to_string, ProgramCreationError, ShaderType};

/// A single, compiled but unlinked, shader.
pub struct Shader {
    context: Rc<Context>,
    id: gl::types::GLuint,
    ty: ShaderType,
}

impl GlObject for Shader {
    type Id = gl::types::GLuint;

    #[inline]
    fn get_id(&self) -> gl::types::GLuint {
        self.id
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe { self.context.gl.DeleteShader(self.id) };
    }
}

impl Shader {
    /// Compiles a shader.
    ///
    /// The shader object is deleted when the returned value is dropped.
    pub fn compile<F: ?Sized>(facade: &F, ty: ShaderType, source: &str)
                              -> Result<Shader, ProgramCreationError> where F: Facade
    {
        let context = facade.get_context();

        if context.get_glsl_version().is_none() {
            return Err(ProgramCreationError::CompilationNotSupported);
        }

        if !is_shader_type_supported(context, ty) {
            return Err(ProgramCreationError::ShaderTypeNotSupported);
        }

        let source = CString::new(source.as_bytes()).map_err(|_| {
            ProgramCreationError::CompilationError("source contains a nul byte".to_owned(), ty)
        })?;

        let gl = &context.gl;
        let id = unsafe { gl.CreateShader(ty.to_glenum()) };
        if id == 0 {
            return Err(ProgramCreationError::ShaderTypeNotSupported);
        }

        // built right away so that the object is deleted on every error path
        let shader = Shader { context: context.clone(), id, ty };

        let success = unsafe {
            gl.ShaderSource(id, 1, [source.as_ptr()].as_ptr(), ptr::null());
            gl.CompileShader(id);

            let mut success: gl::types::GLint = 0;
            gl.GetShaderiv(id, gl::COMPILE_STATUS, &mut success);
            success != 0
        };

        let log = shader.info_log();
        if !success {
            return Err(ProgramCreationError::CompilationError(log, ty));
        }

        if !log.trim().is_empty() {
            log::debug!("{} shader compiled with log:\n{}", ty.name(), log);
        }

        Ok(shader)
    }

    /// Returns the stage of the shader.
    #[inline]
    pub fn get_type(&self) -> ShaderType {
        self.ty
    }

    /// Returns the compilation log.
    pub fn info_log(&self) -> String {
        let gl = &self.context.gl;

        unsafe {
            let mut length: gl::types::GLint = 0;
            gl.GetShaderiv(self.id, gl::INFO_LOG_LENGTH, &mut length);
            if length <= 0 {
                return String::new();
            }

            let mut log = vec![0u8; length as usize];
            let mut written: gl::types::GLsizei = 0;
            gl.GetShaderInfoLog(self.id, length, &mut written,
                                log.as_mut_ptr() as *mut gl::types::GLchar);
            log.truncate(written.max(0) as usize);
            info_log_to_string(log)
        }
    }
}

/// Returns true if the context can compile shaders of this stage.
pub fn is_shader_type_supported(ctxt: &Context, ty: ShaderType) -> bool {
    let version = ctxt.get_version();
    let extensions = ctxt.get_extensions();

    match ty {
        ShaderType::Vertex | ShaderType::Fragment => true,
        ShaderType::Geometry => {
            version >= &Version(Api::Gl, 3, 2) ||
            version >= &Version(Api::GlEs, 3, 2) ||
            extensions.contains("GL_ARB_geometry_shader4") ||
            extensions.contains("GL_EXT_geometry_shader4") ||
            extensions.contains("GL_EXT_geometry_shader") ||
            extensions.contains("GL_OES_geometry_shader")
        },
        ShaderType::TessControl | ShaderType::TessEvaluation => {
            version >= &Version(Api::Gl, 4, 0) ||
            version >= &Version(Api::GlEs, 3, 2) ||
            extensions.contains("GL_ARB_tessellation_shader") ||
            extensions.contains("GL_OES_tessellation_shader")
        },
        ShaderType::Compute => {
            version >= &Version(Api::Gl, 4, 3) ||
            version >= &Version(Api::GlEs, 3, 1) ||
            extensions.contains("GL_ARB_compute_shader")
        },
    }
}
