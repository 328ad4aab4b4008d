#![cfg(feature = "glutin_backend")]
/*!

Backend implementation for the glutin library.

The window is created through `glutin-winit`, then every kind of context allowed by the
test configuration is attempted in order until one succeeds.

# Features

Only available if the 'glutin_backend' feature is enabled.

*/
pub extern crate glutin;

use std::error::Error;
use std::ffi::CString;
use std::fmt;
use std::os::raw::c_void;
use std::ptr;

use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentContext,
                      PossiblyCurrentContext, Robustness, Version as GlutinVersion};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasRawWindowHandle;
use takeable_option::Takeable;
use winit::dpi::PhysicalSize;
use winit::event_loop::EventLoopWindowTarget;
use winit::window::{Window, WindowBuilder};

use crate::backend::{Backend, SwapBuffersError};
use crate::config::{ContextRequest, TestConfig, Visual};

/// A glutin context paired with the surface of its window.
struct ContextSurfacePair {
    context: PossiblyCurrentContext,
    surface: Surface<WindowSurface>,
}

/// An implementation of the `Backend` trait for glutin.
pub struct GlutinBackend {
    // dropped before the window
    pair: Takeable<ContextSurfacePair>,
    window: Window,
    request: ContextRequest,
}

/// Error that can happen while creating the window and its context.
#[derive(Debug, Clone)]
pub enum CreationError {
    /// The window or the surface couldn't be created.
    Windowing(String),
    /// None of the contexts allowed by the configuration could be created.
    ///
    /// Contains the error of each attempt.
    NoSuitableContext(Vec<(ContextRequest, String)>),
    /// No framebuffer configuration of the display has the buffers the test asks for.
    NoMatchingVisual(String),
}

impl CreationError {
    /// Returns true if the platform lacks something the test asks for, as opposed to
    /// something going wrong.
    pub fn is_unsupported(&self) -> bool {
        match self {
            CreationError::Windowing(_) => false,
            CreationError::NoSuitableContext(_) | CreationError::NoMatchingVisual(_) => true,
        }
    }
}

impl fmt::Display for CreationError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreationError::Windowing(msg) => write!(fmt, "failed to create the window: {}", msg),
            CreationError::NoSuitableContext(attempts) => {
                fmt.write_str("no suitable GL context")?;
                for (request, err) in attempts {
                    write!(fmt, "\n  {}: {}", request, err)?;
                }
                Ok(())
            },
            CreationError::NoMatchingVisual(msg) => {
                write!(fmt, "no framebuffer configuration matches the test: {}", msg)
            },
        }
    }
}

impl Error for CreationError {}

impl GlutinBackend {
    /// Creates the window and a context matching the configuration.
    ///
    /// The window is only shown if `visible` is true.
    pub fn new<T>(event_loop: &EventLoopWindowTarget<T>, config: &TestConfig, title: &str,
                  visible: bool) -> Result<GlutinBackend, CreationError>
    {
        let window_builder = WindowBuilder::new()
            .with_title(title)
            .with_inner_size(PhysicalSize::new(config.window_width, config.window_height))
            .with_resizable(false)
            .with_visible(visible);

        // the template has no minimum sizes so that a display with window support always
        // offers configs; the visual is checked on the chosen one
        let visual = config.visual;
        let template = ConfigTemplateBuilder::new().with_single_buffering(!visual.double);
        let (window, gl_config) = DisplayBuilder::new()
            .with_window_builder(Some(window_builder))
            .build(event_loop, template, move |configs| {
                // glutin returns an error instead of calling the picker without configs
                configs.max_by_key(|c| ConfigBits::of(c).score(&visual))
                       .expect("glutin offered no framebuffer configuration")
            })
            .map_err(|err| CreationError::Windowing(err.to_string()))?;

        ConfigBits::of(&gl_config).check(&config.visual)
            .map_err(CreationError::NoMatchingVisual)?;

        let window = window.ok_or_else(|| {
            CreationError::Windowing("the display builder didn't create a window".to_owned())
        })?;

        log::debug!("framebuffer config: alpha {} depth {} stencil {} samples {}",
                    gl_config.alpha_size(), gl_config.depth_size(), gl_config.stencil_size(),
                    gl_config.num_samples());

        let (context, request) = create_context(&gl_config, &window, config)?;

        let surface_attributes = window.build_surface_attributes(SurfaceAttributesBuilder::new());
        let surface = unsafe {
            gl_config.display().create_window_surface(&gl_config, &surface_attributes)
        }.map_err(|err| CreationError::Windowing(err.to_string()))?;

        let context = context.make_current(&surface)
            .map_err(|err| CreationError::Windowing(err.to_string()))?;

        log::info!("created {} context", request);

        Ok(GlutinBackend {
            pair: Takeable::new(ContextSurfacePair { context, surface }),
            window,
            request,
        })
    }

    /// Returns the kind of context that was created.
    #[inline]
    pub fn request(&self) -> ContextRequest {
        self.request
    }

    /// Returns the window.
    #[inline]
    pub fn window(&self) -> &Window {
        &self.window
    }
}

impl Backend for GlutinBackend {
    fn swap_buffers(&self) -> Result<(), SwapBuffersError> {
        self.pair.surface.swap_buffers(&self.pair.context).map_err(|err| {
            match err.error_kind() {
                glutin::error::ErrorKind::ContextLost => SwapBuffersError::ContextLost,
                _ => SwapBuffersError::Other(err.to_string()),
            }
        })
    }

    unsafe fn get_proc_address(&self, symbol: &str) -> *const c_void {
        match CString::new(symbol) {
            Ok(symbol) => self.pair.context.display().get_proc_address(&symbol) as *const _,
            Err(_) => ptr::null(),
        }
    }

    fn get_framebuffer_dimensions(&self) -> (u32, u32) {
        self.window.inner_size().into()
    }

    fn is_current(&self) -> bool {
        self.pair.context.is_current()
    }

    unsafe fn make_current(&self) {
        if let Err(err) = self.pair.context.make_current(&self.pair.surface) {
            log::error!("failed to make the context current: {}", err);
        }
    }
}

impl Drop for GlutinBackend {
    fn drop(&mut self) {
        let pair = Takeable::take(&mut self.pair);
        // the surface must outlive the context being current on it
        if let Err(err) = pair.context.make_not_current() {
            log::debug!("failed to release the context: {}", err);
        }
    }
}

/// The buffers of a framebuffer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ConfigBits {
    alpha: u8,
    depth: u8,
    stencil: u8,
    samples: u8,
}

impl ConfigBits {
    fn of(config: &Config) -> ConfigBits {
        ConfigBits {
            alpha: config.alpha_size(),
            depth: config.depth_size(),
            stencil: config.stencil_size(),
            samples: config.num_samples(),
        }
    }

    /// Ranks the configs returned by the platform: exact matches first, then the smallest
    /// superset of the requested buffers.
    fn score(&self, visual: &Visual) -> i32 {
        let mut score = 0;

        for (wanted, size) in [(visual.alpha, self.alpha),
                               (visual.depth, self.depth),
                               (visual.stencil, self.stencil)]
        {
            score += match (wanted, size > 0) {
                (true, true) | (false, false) => 100,
                (true, false) => -1000,
                (false, true) => 0,
            };
        }

        score += if self.samples == visual.samples {
            50
        } else if self.samples < visual.samples {
            -1000
        } else {
            0
        };

        score - self.samples as i32
    }

    /// Checks that the configuration has every buffer the visual asks for.
    fn check(&self, visual: &Visual) -> Result<(), String> {
        let mut missing = Vec::new();
        if visual.alpha && self.alpha == 0 {
            missing.push("an alpha channel".to_owned());
        }
        if visual.depth && self.depth == 0 {
            missing.push("a depth buffer".to_owned());
        }
        if visual.stencil && self.stencil == 0 {
            missing.push("a stencil buffer".to_owned());
        }
        if self.samples < visual.samples {
            missing.push(format!("{} samples", visual.samples));
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(format!("missing {}", missing.join(", ")))
        }
    }
}

fn create_context(gl_config: &Config, window: &Window, config: &TestConfig)
                  -> Result<(NotCurrentContext, ContextRequest), CreationError>
{
    let raw_window_handle = window.raw_window_handle();
    let gl_display = gl_config.display();
    let mut failures = Vec::new();

    for request in config.context_requests() {
        let builder = ContextAttributesBuilder::new().with_debug(config.debug);
        let builder = if config.khr_no_error {
            builder.with_robustness(Robustness::NoError)
        } else {
            builder
        };

        let builder = match request {
            ContextRequest::GlCore(major, minor) => builder
                .with_context_api(ContextApi::OpenGl(Some(GlutinVersion::new(major, minor))))
                .with_profile(GlProfile::Core),
            // below 3.2 asking for a version gives legacy contexts on most platforms
            ContextRequest::GlCompat(major, minor) if (major, minor) >= (3, 2) => builder
                .with_context_api(ContextApi::OpenGl(Some(GlutinVersion::new(major, minor))))
                .with_profile(GlProfile::Compatibility),
            ContextRequest::GlCompat(..) => builder
                .with_context_api(ContextApi::OpenGl(None)),
            ContextRequest::GlEs(major, minor) => builder
                .with_context_api(ContextApi::Gles(Some(GlutinVersion::new(major, minor)))),
        };

        let attributes = builder.build(Some(raw_window_handle));
        match unsafe { gl_display.create_context(gl_config, &attributes) } {
            Ok(context) => return Ok((context, request)),
            Err(err) => {
                log::info!("could not create a {} context: {}", request, err);
                failures.push((request, err.to_string()));
            },
        }
    }

    Err(CreationError::NoSuitableContext(failures))
}

#[cfg(test)]
mod tests {
    use super::ConfigBits;
    use crate::config::Visual;

    const PLAIN: ConfigBits = ConfigBits { alpha: 8, depth: 0, stencil: 0, samples: 0 };
    const FULL: ConfigBits = ConfigBits { alpha: 8, depth: 24, stencil: 8, samples: 0 };
    const MSAA: ConfigBits = ConfigBits { alpha: 8, depth: 24, stencil: 8, samples: 4 };

    #[test]
    fn exact_match_preferred() {
        let visual = Visual::default();
        assert!(PLAIN.score(&visual) > FULL.score(&visual));
        assert!(FULL.score(&visual) > MSAA.score(&visual));

        let depth = Visual { depth: true, stencil: true, .. Visual::default() };
        assert!(FULL.score(&depth) > PLAIN.score(&depth));
    }

    #[test]
    fn multisampled_visual() {
        let visual = Visual { samples: 4, .. Visual::default() };
        assert!(MSAA.score(&visual) > FULL.score(&visual));
        assert!(MSAA.check(&visual).is_ok());
        assert_eq!(FULL.check(&visual), Err("missing 4 samples".to_owned()));
    }

    #[test]
    fn missing_buffers() {
        let visual = Visual { depth: true, stencil: true, .. Visual::default() };
        assert!(FULL.check(&visual).is_ok());
        assert_eq!(PLAIN.check(&visual),
                   Err("missing a depth buffer, a stencil buffer".to_owned()));

        let no_alpha = ConfigBits { alpha: 0, .. PLAIN };
        assert!(no_alpha.check(&Visual::default()).is_err());
        assert!(no_alpha.check(&Visual { alpha: false, .. Visual::default() }).is_ok());
    }
}
