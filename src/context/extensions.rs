use std::ffi::CStr;

use fnv::FnvHashSet;

use crate::gl;
use crate::version::Api;
use crate::version::Version;

/// Contains the list of extensions supported by the implementation.
///
/// Unlike a list of flags, tests can ask for any extension by name, including the ones the
/// harness itself never uses.
#[derive(Debug, Clone, Default)]
pub struct ExtensionsList {
    names: FnvHashSet<String>,
}

impl ExtensionsList {
    /// Builds a list from the space-separated format returned by `glGetString(GL_EXTENSIONS)`.
    pub fn from_space_separated(list: &str) -> ExtensionsList {
        list.split_whitespace().map(|e| e.to_owned()).collect()
    }

    /// Returns true if the extension is supported.
    ///
    /// The name must match exactly, including the `GL_` prefix.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Number of extensions in the list.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if the implementation doesn't expose any extension.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates over the names, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|s| &s[..])
    }
}

impl FromIterator<String> for ExtensionsList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> ExtensionsList {
        ExtensionsList {
            names: iter.into_iter().filter(|e| !e.is_empty()).collect(),
        }
    }
}

/// Returns the list of extensions supported by the backend.
///
/// The version must match the one of the backend.
///
/// *Safety*: the OpenGL context corresponding to `gl` must be current in the thread.
pub unsafe fn get_extensions(gl: &gl::Gl, version: &Version) -> ExtensionsList {
    if version >= &Version(Api::Gl, 3, 0) || version >= &Version(Api::GlEs, 3, 0) {
        let mut num_extensions = 0;
        gl.GetIntegerv(gl::NUM_EXTENSIONS, &mut num_extensions);

        (0 .. num_extensions).filter_map(|num| {
            let ext = gl.GetStringi(gl::EXTENSIONS, num as gl::types::GLuint);
            if ext.is_null() {
                None
            } else {
                Some(CStr::from_ptr(ext as *const _).to_string_lossy().into_owned())
            }
        }).collect()

    } else {
        let list = gl.GetString(gl::EXTENSIONS);
        if list.is_null() {
            return ExtensionsList::default();
        }

        let list = CStr::from_ptr(list as *const _).to_string_lossy();
        ExtensionsList::from_space_separated(&list)
    }
}

#[cfg(test)]
mod tests {
    use super::ExtensionsList;

    #[test]
    fn space_separated_list() {
        let list = ExtensionsList::from_space_separated(
            "GL_ARB_texture_swizzle  GL_KHR_debug GL_EXT_framebuffer_object ");

        assert_eq!(list.len(), 3);
        assert!(list.contains("GL_KHR_debug"));
        assert!(list.contains("GL_ARB_texture_swizzle"));
        assert!(!list.contains("GL_ARB_texture"));
        assert!(!list.contains("GL_khr_debug"));
    }

    #[test]
    fn empty_list() {
        let list = ExtensionsList::from_space_separated("");
        assert!(list.is_empty());
        assert!(!list.contains(""));
    }
}
