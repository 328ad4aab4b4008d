//! Versions of OpenGL, OpenGL ES and GLSL.

use std::cmp::Ordering;
use std::error::Error;
use std::ffi::CStr;
use std::fmt;

use crate::gl;

/// Describes a version.
///
/// A version can only be compared to another version if they belong to the same API.
/// For example, both `Version(Api::Gl, 3, 0) >= Version(Api::GlEs, 3, 0)` and
/// `Version(Api::GlEs, 3, 0) >= Version(Api::Gl, 3, 0)` return `false`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Version(pub Api, pub u8, pub u8);

/// Describes the corresponding API.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Api {
    /// Regular OpenGL.
    Gl,
    /// OpenGL embedded system.
    GlEs,
}

impl PartialOrd for Version {
    #[inline]
    fn partial_cmp(&self, other: &Version) -> Option<Ordering> {
        if self.0 != other.0 {
            return None;
        }

        match self.1.cmp(&other.1) {
            Ordering::Equal => Some(self.2.cmp(&other.2)),
            a => Some(a)
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Api::Gl => write!(f, "{}.{}", self.1, self.2),
            Api::GlEs => write!(f, "ES {}.{}", self.1, self.2),
        }
    }
}

/// Error returned when a version string reported by the implementation can't be parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionParseError {
    /// The string that was being parsed.
    pub input: String,
}

impl fmt::Display for VersionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not parse version string {:?}", self.input)
    }
}

impl Error for VersionParseError {}

impl Version {
    /// Parses the content of `glGetString(GL_VERSION)`.
    ///
    /// Desktop implementations return `"<major>.<minor>[.<release>] [vendor info]"`,
    /// OpenGL ES implementations prefix this with `"OpenGL ES "` (or `"OpenGL ES-CM "` and
    /// `"OpenGL ES-CL "` for 1.x profiles).
    pub fn parse_gl_version(version: &str) -> Result<Version, VersionParseError> {
        let (rest, api) = strip_es_prefix(version, &["OpenGL ES-CM ", "OpenGL ES-CL ",
                                                     "OpenGL ES "]);
        let (major, minor) = parse_major_minor(rest)
            .ok_or_else(|| VersionParseError { input: version.to_owned() })?;
        Ok(Version(api, major, minor))
    }

    /// Parses the content of `glGetString(GL_SHADING_LANGUAGE_VERSION)`.
    ///
    /// The two-digit minor number is divided by ten, so `"1.10"` becomes `1.1` and
    /// `"4.60"` becomes `4.6`. `api` is the API of the context the string comes from; ES
    /// implementations usually also prefix the string with `"OpenGL ES GLSL ES "`.
    pub fn parse_glsl_version(version: &str, api: Api) -> Result<Version, VersionParseError> {
        let (rest, prefixed) = strip_es_prefix(version, &["OpenGL ES GLSL ES "]);
        let api = if prefixed == Api::GlEs { Api::GlEs } else { api };

        let err = || VersionParseError { input: version.to_owned() };
        let word = rest.split_whitespace().next().ok_or_else(err)?;
        let mut iter = word.split('.');
        let major = iter.next().and_then(|m| m.parse::<u8>().ok()).ok_or_else(err)?;
        let minor = iter.next().ok_or_else(err)?;
        let minor_digits: String = minor.chars().take_while(|c| c.is_ascii_digit()).collect();
        let minor = minor_digits.parse::<u16>().map_err(|_| err())?;
        let minor = if minor_digits.len() >= 2 { minor / 10 } else { minor };

        Ok(Version(api, major, minor as u8))
    }

    /// Returns the GLSL version mandated by this GL version.
    ///
    /// ## Panic
    ///
    /// Panics if the version doesn't support shaders, ie. OpenGL below 2.0 or OpenGL ES
    /// below 2.0.
    pub fn get_glsl_version(&self) -> Version {
        match *self {
            Version(Api::Gl, 1, _) => panic!("OpenGL 1.x doesn't have GLSL"),
            Version(Api::Gl, 2, 0) => Version(Api::Gl, 1, 1),
            Version(Api::Gl, 2, 1) => Version(Api::Gl, 1, 2),
            Version(Api::Gl, 3, 0) => Version(Api::Gl, 1, 3),
            Version(Api::Gl, 3, 1) => Version(Api::Gl, 1, 4),
            Version(Api::Gl, 3, 2) => Version(Api::Gl, 1, 5),
            Version(Api::Gl, major, minor) => Version(Api::Gl, major, minor),

            Version(Api::GlEs, 1, _) => panic!("OpenGL ES 1.x doesn't have GLSL"),
            Version(Api::GlEs, 2, _) => Version(Api::GlEs, 1, 0),
            Version(Api::GlEs, major, minor) => Version(Api::GlEs, major, minor),
        }
    }
}

fn strip_es_prefix<'a>(version: &'a str, prefixes: &[&str]) -> (&'a str, Api) {
    for prefix in prefixes {
        if let Some(rest) = version.strip_prefix(prefix) {
            return (rest, Api::GlEs);
        }
    }

    (version, Api::Gl)
}

fn parse_major_minor(version: &str) -> Option<(u8, u8)> {
    let version = version.split_whitespace().next()?;

    let mut iter = version.split('.');
    let major = iter.next()?.parse().ok()?;
    let minor: String = iter.next()?.chars().take_while(|c| c.is_ascii_digit()).collect();
    let minor = minor.parse().ok()?;

    Some((major, minor))
}

/// Reads a string returned by `glGetString`.
///
/// *Safety*: the OpenGL context corresponding to `gl` must be current in the thread.
pub(crate) unsafe fn get_string(gl: &gl::Gl, name: gl::types::GLenum) -> Option<String> {
    let ptr = gl.GetString(name);
    if ptr.is_null() {
        return None;
    }

    Some(CStr::from_ptr(ptr as *const _).to_string_lossy().into_owned())
}

/// Obtains the OpenGL version of the current context.
///
/// *Safety*: the OpenGL context corresponding to `gl` must be current in the thread.
pub unsafe fn get_gl_version(gl: &gl::Gl) -> Result<Version, VersionParseError> {
    let version = get_string(gl, gl::VERSION).unwrap_or_default();
    Version::parse_gl_version(&version)
}

/// Obtains the GLSL version of the current context, or `None` if the implementation doesn't
/// have a shader compiler.
///
/// *Safety*: the OpenGL context corresponding to `gl` must be current in the thread.
pub unsafe fn get_glsl_version(gl: &gl::Gl, version: &Version)
                               -> Result<Option<Version>, VersionParseError>
{
    if version < &Version(Api::Gl, 2, 0) && version.0 == Api::Gl {
        return Ok(None);
    }

    if version.0 == Api::GlEs {
        if version < &Version(Api::GlEs, 2, 0) {
            return Ok(None);
        }

        // a compiler is optional in OpenGL ES
        let mut val = 0;
        gl.GetBooleanv(gl::SHADER_COMPILER, &mut val);
        if val == 0 {
            return Ok(None);
        }
    }

    match get_string(gl, gl::SHADING_LANGUAGE_VERSION) {
        Some(s) => Version::parse_glsl_version(&s, version.0).map(Some),
        None => Ok(None),
    }
}
