/*!
Requirement checks.

Each check returns `TestError::Unsupported` when the requirement isn't met, which makes the
test report a skip:

```no_run
# fn init(ctx: &piglit::framework::TestContext) -> Result<(), piglit::TestError> {
ctx.require_gl_version(3, 0)?;
ctx.require_either_extension(&["GL_ARB_texture_swizzle", "GL_EXT_texture_swizzle"])?;
# Ok(())
# }
```

*/
use crate::context::Context;
use crate::error::TestError;
use crate::version::{Api, Version};

impl Context {
    /// Returns true if the extension is supported. The name includes the `GL_` prefix.
    #[inline]
    pub fn is_extension_supported(&self, name: &str) -> bool {
        self.get_extensions().contains(name)
    }

    /// Returns true if this is a desktop context of at least this version.
    #[inline]
    pub fn is_gl_version_at_least(&self, major: u8, minor: u8) -> bool {
        self.get_version() >= &Version(Api::Gl, major, minor)
    }

    /// Returns true if this is an OpenGL ES context of at least this version.
    #[inline]
    pub fn is_es_version_at_least(&self, major: u8, minor: u8) -> bool {
        self.get_version() >= &Version(Api::GlEs, major, minor)
    }

    /// Requires a desktop context of at least this version.
    pub fn require_gl_version(&self, major: u8, minor: u8) -> Result<(), TestError> {
        if self.is_gles() {
            return Err(TestError::unsupported("Test requires desktop OpenGL"));
        }

        if !self.is_gl_version_at_least(major, minor) {
            return Err(TestError::unsupported(
                format!("Test requires GL version {}.{}", major, minor)));
        }

        Ok(())
    }

    /// Requires an OpenGL ES context of at least this version.
    pub fn require_es_version(&self, major: u8, minor: u8) -> Result<(), TestError> {
        if !self.is_gles() {
            return Err(TestError::unsupported("Test requires OpenGL ES"));
        }

        if !self.is_es_version_at_least(major, minor) {
            return Err(TestError::unsupported(
                format!("Test requires GL ES version {}.{}", major, minor)));
        }

        Ok(())
    }

    /// Requires a GLSL version, `(1, 3)` meaning GLSL 1.30.
    pub fn require_glsl_version(&self, major: u8, minor: u8) -> Result<(), TestError> {
        let required = Version(self.get_version().0, major, minor);
        let message = || {
            let es = if self.is_gles() { " ES" } else { "" };
            TestError::unsupported(format!("Test requires GLSL{} version {}.{:02}", es, major,
                                           minor as u32 * 10))
        };

        match self.get_glsl_version() {
            Some(version) if version >= &required => Ok(()),
            _ => Err(message()),
        }
    }

    /// Requires an extension.
    pub fn require_extension(&self, name: &str) -> Result<(), TestError> {
        if self.is_extension_supported(name) {
            Ok(())
        } else {
            Err(TestError::unsupported(format!("Test requires {}", name)))
        }
    }

    /// Requires an extension to be absent.
    pub fn require_not_extension(&self, name: &str) -> Result<(), TestError> {
        if self.is_extension_supported(name) {
            Err(TestError::unsupported(format!("Test requires absence of {}", name)))
        } else {
            Ok(())
        }
    }

    /// Requires at least one of the extensions.
    pub fn require_either_extension(&self, names: &[&str]) -> Result<(), TestError> {
        if names.iter().any(|name| self.is_extension_supported(name)) {
            Ok(())
        } else {
            Err(TestError::unsupported(format!("Test requires {}", names.join(" or "))))
        }
    }

    /// Requires a desktop version, or an extension that provides the same feature.
    pub fn require_gl_version_or_extension(&self, major: u8, minor: u8, name: &str)
                                           -> Result<(), TestError>
    {
        if self.is_gl_version_at_least(major, minor) || self.is_extension_supported(name) {
            Ok(())
        } else {
            Err(TestError::unsupported(
                format!("Test requires GL version {}.{} or {}", major, minor, name)))
        }
    }

    /// Requires `GL_MAX_DRAW_BUFFERS` to be at least `count`.
    pub fn require_draw_buffers(&self, count: u32) -> Result<(), TestError> {
        let max = self.capabilities().max_draw_buffers.max(0) as u32;
        if max >= count {
            Ok(())
        } else {
            Err(TestError::unsupported(
                format!("Test requires {} draw buffers, but only {} are supported", count, max)))
        }
    }

    /// Requires the default framebuffer to have at least this many depth bits.
    pub fn require_depth_bits(&self, bits: u8) -> Result<(), TestError> {
        let available = self.capabilities().depth_bits;
        if available >= bits {
            Ok(())
        } else {
            Err(TestError::unsupported(
                format!("Test requires {} depth bits, got {}", bits, available)))
        }
    }

    /// Requires the default framebuffer to have at least this many stencil bits.
    pub fn require_stencil_bits(&self, bits: u8) -> Result<(), TestError> {
        let available = self.capabilities().stencil_bits;
        if available >= bits {
            Ok(())
        } else {
            Err(TestError::unsupported(
                format!("Test requires {} stencil bits, got {}", bits, available)))
        }
    }

    /// Requires a core profile context.
    pub fn require_core_profile(&self) -> Result<(), TestError> {
        if self.capabilities().core_profile {
            Ok(())
        } else {
            Err(TestError::unsupported("Test requires a core profile context"))
        }
    }
}
