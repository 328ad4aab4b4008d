/*!
Per-test configuration.

Every test program describes the context it needs with a `TestConfig`: the APIs and
versions it can run on, the window size and the content of the default framebuffer.

```
use piglit::config::TestConfig;

let config = TestConfig {
    supports_gl_compat_version: Some((2, 0)),
    supports_gl_es_version: Some((2, 0)),
    .. TestConfig::with_depth()
};
assert!(config.visual.depth);
```

*/
use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

use smallvec::SmallVec;

/// Default width and height of the test window.
pub const DEFAULT_WINDOW_SIZE: u32 = 160;

/// Describes the content of the default framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visual {
    /// The default framebuffer has an alpha channel.
    pub alpha: bool,
    /// The default framebuffer has a depth buffer.
    pub depth: bool,
    /// The default framebuffer has a stencil buffer.
    pub stencil: bool,
    /// The default framebuffer is double-buffered.
    pub double: bool,
    /// Number of samples per pixel. `0` means single-sampled.
    pub samples: u8,
}

impl Default for Visual {
    fn default() -> Visual {
        Visual {
            alpha: true,
            depth: false,
            stencil: false,
            double: true,
            samples: 0,
        }
    }
}

/// Requirements of a test on its context and window.
#[derive(Debug, Clone)]
pub struct TestConfig {
    /// Width of the window in pixels.
    pub window_width: u32,
    /// Height of the window in pixels.
    pub window_height: u32,
    /// Content of the default framebuffer.
    pub visual: Visual,

    /// Minimum desktop OpenGL version the test runs on with a compatibility context.
    pub supports_gl_compat_version: Option<(u8, u8)>,
    /// Minimum desktop OpenGL version the test runs on with a core profile context.
    pub supports_gl_core_version: Option<(u8, u8)>,
    /// Minimum OpenGL ES version the test runs on.
    pub supports_gl_es_version: Option<(u8, u8)>,

    /// The test only makes sense if a human can look at the window.
    ///
    /// Such tests ignore `-fbo`.
    pub requires_displayed_window: bool,
    /// Show the window even in automatic mode. Set by `PIGLIT_FORCE_WINDOW`.
    pub force_window: bool,
    /// Request a `GL_KHR_no_error` context.
    ///
    /// Also enabled at runtime by the `PIGLIT_KHR_NO_ERROR` environment variable.
    pub khr_no_error: bool,
    /// Request a debug context and forward `GL_KHR_debug` messages to the log.
    ///
    /// Also enabled at runtime by the `PIGLIT_GL_DEBUG` environment variable.
    pub debug: bool,

    /// Names of the subtests the test can run, for `-list-subtests` and subtest selection.
    pub subtests: Vec<&'static str>,
}

impl Default for TestConfig {
    fn default() -> TestConfig {
        TestConfig {
            window_width: DEFAULT_WINDOW_SIZE,
            window_height: DEFAULT_WINDOW_SIZE,
            visual: Visual::default(),
            supports_gl_compat_version: Some((1, 0)),
            supports_gl_core_version: None,
            supports_gl_es_version: None,
            requires_displayed_window: false,
            force_window: false,
            khr_no_error: false,
            debug: false,
            subtests: Vec::new(),
        }
    }
}

/// A kind of context that the backend can attempt to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextRequest {
    /// A desktop core profile context of at least this version.
    GlCore(u8, u8),
    /// A desktop compatibility context of at least this version.
    GlCompat(u8, u8),
    /// An OpenGL ES context of at least this version.
    GlEs(u8, u8),
}

impl fmt::Display for ContextRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ContextRequest::GlCore(major, minor) => write!(f, "GL {}.{} core", major, minor),
            ContextRequest::GlCompat(major, minor) => write!(f, "GL {}.{} compat", major, minor),
            ContextRequest::GlEs(major, minor) => write!(f, "GL ES {}.{}", major, minor),
        }
    }
}

impl TestConfig {
    /// Default configuration with a depth buffer.
    pub fn with_depth() -> TestConfig {
        TestConfig {
            visual: Visual { depth: true, .. Visual::default() },
            .. TestConfig::default()
        }
    }

    /// Default configuration with depth and stencil buffers.
    pub fn with_depth_stencil() -> TestConfig {
        TestConfig {
            visual: Visual { depth: true, stencil: true, .. Visual::default() },
            .. TestConfig::default()
        }
    }

    /// Returns the kinds of context to try, in order of preference.
    ///
    /// A core profile is preferred over a compatibility context, desktop GL over GL ES.
    pub fn context_requests(&self) -> SmallVec<[ContextRequest; 3]> {
        let mut requests = SmallVec::new();

        if let Some((major, minor)) = self.supports_gl_core_version {
            // core profiles only exist since 3.1
            let (major, minor) = if (major, minor) < (3, 1) { (3, 1) } else { (major, minor) };
            requests.push(ContextRequest::GlCore(major, minor));
        }

        if let Some((major, minor)) = self.supports_gl_compat_version {
            requests.push(ContextRequest::GlCompat(major, minor));
        }

        if let Some((major, minor)) = self.supports_gl_es_version {
            requests.push(ContextRequest::GlEs(major, minor));
        }

        requests
    }

    /// Applies the environment overrides: `PIGLIT_DEFAULT_SIZE`, `PIGLIT_FORCE_WINDOW`,
    /// `PIGLIT_KHR_NO_ERROR` and `PIGLIT_GL_DEBUG`.
    pub fn apply_env(&mut self) {
        if let Ok(size) = env::var("PIGLIT_DEFAULT_SIZE") {
            match parse_window_size(&size) {
                Some((width, height)) => {
                    self.window_width = width;
                    self.window_height = height;
                },
                None => log::warn!("ignoring invalid PIGLIT_DEFAULT_SIZE {:?}", size),
            }
        }

        if env_flag("PIGLIT_FORCE_WINDOW") {
            self.force_window = true;
        }

        if env_flag("PIGLIT_KHR_NO_ERROR") {
            self.khr_no_error = true;
        }

        if env_flag("PIGLIT_GL_DEBUG") {
            self.debug = true;
        }
    }
}

/// Parses a `WIDTHxHEIGHT` window size.
pub fn parse_window_size(size: &str) -> Option<(u32, u32)> {
    let (width, height) = size.trim().split_once(|c| c == 'x' || c == 'X')?;
    let width = width.parse().ok().filter(|&w: &u32| w > 0)?;
    let height = height.parse().ok().filter(|&h: &u32| h > 0)?;
    Some((width, height))
}

/// Returns true if the environment variable is set to something other than `0` or an empty
/// string.
pub fn env_flag(name: &str) -> bool {
    match env::var(name) {
        Ok(value) => !value.is_empty() && value != "0",
        Err(_) => false,
    }
}

/// Returns the directory containing the test data, from `PIGLIT_SOURCE_DIR`.
///
/// Defaults to the current directory.
pub fn source_dir() -> PathBuf {
    env::var_os("PIGLIT_SOURCE_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."))
}

/// Resolves a path relative to the test data directory.
pub fn source_path(relative: &str) -> PathBuf {
    source_dir().join(relative)
}

/// Loads a text file, usually a shader, relative to the test data directory.
pub fn load_text_file(relative: &str) -> io::Result<String> {
    let path = source_path(relative);
    fs::read_to_string(&path).map_err(|err| {
        io::Error::new(err.kind(), format!("failed to read {}: {}", path.display(), err))
    })
}

#[cfg(test)]
mod tests {
    use super::{parse_window_size, ContextRequest, TestConfig};

    #[test]
    fn window_sizes() {
        assert_eq!(parse_window_size("250x250"), Some((250, 250)));
        assert_eq!(parse_window_size("640X480"), Some((640, 480)));
        assert_eq!(parse_window_size("0x10"), None);
        assert_eq!(parse_window_size("10"), None);
        assert_eq!(parse_window_size("axb"), None);
    }

    #[test]
    fn request_order() {
        let config = TestConfig {
            supports_gl_core_version: Some((3, 0)),
            supports_gl_compat_version: Some((2, 0)),
            supports_gl_es_version: Some((3, 0)),
            .. TestConfig::default()
        };

        assert_eq!(&config.context_requests()[..], &[
            ContextRequest::GlCore(3, 1),
            ContextRequest::GlCompat(2, 0),
            ContextRequest::GlEs(3, 0),
        ]);
    }

    #[test]
    fn es_only() {
        let config = TestConfig {
            supports_gl_compat_version: None,
            supports_gl_es_version: Some((2, 0)),
            .. TestConfig::default()
        };

        assert_eq!(&config.context_requests()[..], &[ContextRequest::GlEs(2, 0)]);
    }

    // the only test touching these variables, so it can't race with another one
    #[test]
    fn environment_overrides() {
        std::env::set_var("PIGLIT_DEFAULT_SIZE", "64x32");
        std::env::set_var("PIGLIT_FORCE_WINDOW", "1");
        std::env::set_var("PIGLIT_KHR_NO_ERROR", "1");
        std::env::set_var("PIGLIT_GL_DEBUG", "0");

        let mut config = TestConfig::default();
        config.apply_env();

        for name in ["PIGLIT_DEFAULT_SIZE", "PIGLIT_FORCE_WINDOW", "PIGLIT_KHR_NO_ERROR",
                     "PIGLIT_GL_DEBUG"]
        {
            std::env::remove_var(name);
        }

        assert_eq!((config.window_width, config.window_height), (64, 32));
        assert!(config.force_window);
        assert!(config.khr_no_error);
        assert!(!config.debug);
    }
}
