use crate::context::Context;
use crate::error::TestError;
use crate::gl;
use crate::version::{Api, Version};

/// Blend state, used both to program OpenGL and to compute the expected result.
///
/// ```
/// use piglit::reference::{Blend, BlendingFunction, LinearBlendingFactor};
///
/// let blend = Blend {
///     color: BlendingFunction::Addition {
///         source: LinearBlendingFactor::SourceAlpha,
///         destination: LinearBlendingFactor::OneMinusSourceAlpha,
///     },
///     .. Blend::default()
/// };
///
/// assert_eq!(blend.apply([1.0, 0.0, 0.0, 0.5], [0.0, 0.0, 1.0, 1.0]),
///            [0.5, 0.0, 0.5, 0.5]);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Blend {
    /// The blending function for color channels.
    pub color: BlendingFunction,
    /// The blending function for alpha channels.
    pub alpha: BlendingFunction,
    /// The constant color used by the `Constant*` factors.
    pub constant_value: (f32, f32, f32, f32),
}

impl Blend {
    /// Blending for transparent objects drawn over others.
    pub fn alpha_blending() -> Blend {
        let function = BlendingFunction::Addition {
            source: LinearBlendingFactor::SourceAlpha,
            destination: LinearBlendingFactor::OneMinusSourceAlpha,
        };

        Blend {
            color: function,
            alpha: function,
            constant_value: (0.0, 0.0, 0.0, 0.0),
        }
    }

    /// Computes the value written in a normalized framebuffer when `src` is drawn over `dst`.
    ///
    /// Inputs and result are clamped to `[0, 1]`, as for fixed-point color buffers.
    pub fn apply(&self, src: [f32; 4], dst: [f32; 4]) -> [f32; 4] {
        let src = src.map(clamp);
        let dst = dst.map(clamp);
        let constant = {
            let (r, g, b, a) = self.constant_value;
            [r, g, b, a].map(clamp)
        };

        let mut result = [0.0; 4];
        for (channel, out) in result.iter_mut().enumerate() {
            let function = if channel == 3 { self.alpha } else { self.color };
            let factor = |f: LinearBlendingFactor| f.value(channel, &src, &dst, &constant);

            *out = clamp(match function {
                BlendingFunction::AlwaysReplace => src[channel],
                BlendingFunction::Min => src[channel].min(dst[channel]),
                BlendingFunction::Max => src[channel].max(dst[channel]),
                BlendingFunction::Addition { source, destination } =>
                    src[channel] * factor(source) + dst[channel] * factor(destination),
                BlendingFunction::Subtraction { source, destination } =>
                    src[channel] * factor(source) - dst[channel] * factor(destination),
                BlendingFunction::ReverseSubtraction { source, destination } =>
                    dst[channel] * factor(destination) - src[channel] * factor(source),
            });
        }

        result
    }

    /// Programs the blend state of the context.
    ///
    /// Returns `Unsupported` for `Min` and `Max` on OpenGL ES 2.0 without
    /// `GL_EXT_blend_minmax`.
    pub fn apply_to_gl(&self, ctxt: &Context) -> Result<(), TestError> {
        if let (BlendingFunction::AlwaysReplace, BlendingFunction::AlwaysReplace) =
               (self.color, self.alpha)
        {
            // Both color and alpha always replace. This equals no blending.
            unsafe { ctxt.gl.Disable(gl::BLEND) };
            return Ok(());
        }

        let (color_eq, alpha_eq) = (blend_eq(ctxt, self.color)?, blend_eq(ctxt, self.alpha)?);

        // Map to dummy factors if the blending equation does not use the factors.
        let (color_src, color_dst) = self.color.factors()
            .unwrap_or((LinearBlendingFactor::One, LinearBlendingFactor::Zero));
        let (alpha_src, alpha_dst) = self.alpha.factors()
            .unwrap_or((LinearBlendingFactor::One, LinearBlendingFactor::Zero));

        unsafe {
            ctxt.gl.Enable(gl::BLEND);
            ctxt.gl.BlendEquationSeparate(color_eq, alpha_eq);

            if [color_src, color_dst, alpha_src, alpha_dst].iter().any(|f| f.uses_constant()) {
                let (r, g, b, a) = self.constant_value;
                ctxt.gl.BlendColor(r, g, b, a);
            }

            ctxt.gl.BlendFuncSeparate(color_src.to_glenum(), color_dst.to_glenum(),
                                      alpha_src.to_glenum(), alpha_dst.to_glenum());
        }

        Ok(())
    }
}

impl Default for Blend {
    fn default() -> Blend {
        Blend {
            color: BlendingFunction::AlwaysReplace,
            alpha: BlendingFunction::AlwaysReplace,
            constant_value: (1.0, 1.0, 1.0, 1.0),
        }
    }
}

fn blend_eq(ctxt: &Context, function: BlendingFunction) -> Result<gl::types::GLenum, TestError> {
    match function {
        BlendingFunction::AlwaysReplace |
        BlendingFunction::Addition { .. } => Ok(gl::FUNC_ADD),
        BlendingFunction::Subtraction { .. } => Ok(gl::FUNC_SUBTRACT),
        BlendingFunction::ReverseSubtraction { .. } => Ok(gl::FUNC_REVERSE_SUBTRACT),

        BlendingFunction::Min | BlendingFunction::Max => {
            if ctxt.get_version() <= &Version(Api::GlEs, 2, 0) &&
               !ctxt.get_extensions().contains("GL_EXT_blend_minmax")
            {
                Err(TestError::unsupported("Test requires GL_EXT_blend_minmax"))
            } else if function == BlendingFunction::Min {
                Ok(gl::MIN)
            } else {
                Ok(gl::MAX)
            }
        },
    }
}

#[inline]
fn clamp(value: f32) -> f32 {
    value.max(0.0).min(1.0)
}

/// Function used to combine the source and the destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendingFunction {
    /// Overwrite the destination with the source.
    AlwaysReplace,

    /// Per component minimum of the source and the destination. Factors are ignored.
    Min,

    /// Per component maximum of the source and the destination. Factors are ignored.
    Max,

    /// `source * source_factor + destination * destination_factor`
    Addition {
        source: LinearBlendingFactor,
        destination: LinearBlendingFactor,
    },

    /// `source * source_factor - destination * destination_factor`
    Subtraction {
        source: LinearBlendingFactor,
        destination: LinearBlendingFactor,
    },

    /// `destination * destination_factor - source * source_factor`
    ReverseSubtraction {
        source: LinearBlendingFactor,
        destination: LinearBlendingFactor,
    },
}

impl BlendingFunction {
    /// Returns the source and destination factors, if the function uses them.
    pub fn factors(&self) -> Option<(LinearBlendingFactor, LinearBlendingFactor)> {
        match *self {
            BlendingFunction::AlwaysReplace |
            BlendingFunction::Min |
            BlendingFunction::Max => None,
            BlendingFunction::Addition { source, destination } |
            BlendingFunction::Subtraction { source, destination } |
            BlendingFunction::ReverseSubtraction { source, destination } =>
                Some((source, destination)),
        }
    }

    /// Short name for subtest names, eg. `"GL_FUNC_ADD"`.
    pub fn name(&self) -> &'static str {
        match *self {
            BlendingFunction::AlwaysReplace => "replace",
            BlendingFunction::Min => "GL_MIN",
            BlendingFunction::Max => "GL_MAX",
            BlendingFunction::Addition { .. } => "GL_FUNC_ADD",
            BlendingFunction::Subtraction { .. } => "GL_FUNC_SUBTRACT",
            BlendingFunction::ReverseSubtraction { .. } => "GL_FUNC_REVERSE_SUBTRACT",
        }
    }
}

/// Indicates which value to multiply each component with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinearBlendingFactor {
    /// `0`.
    Zero,
    /// `1`.
    One,
    /// The matching component of the source.
    SourceColor,
    /// `1 - SourceColor`.
    OneMinusSourceColor,
    /// The matching component of the destination.
    DestinationColor,
    /// `1 - DestinationColor`.
    OneMinusDestinationColor,
    /// Alpha of the source.
    SourceAlpha,
    /// `min(source alpha, 1 - destination alpha)` for colors, `1` for alpha.
    SourceAlphaSaturate,
    /// `1 - SourceAlpha`.
    OneMinusSourceAlpha,
    /// Alpha of the destination.
    DestinationAlpha,
    /// `1 - DestinationAlpha`.
    OneMinusDestinationAlpha,
    /// The matching component of `Blend::constant_value`.
    ConstantColor,
    /// `1 - ConstantColor`.
    OneMinusConstantColor,
    /// Alpha of `Blend::constant_value`.
    ConstantAlpha,
    /// `1 - ConstantAlpha`.
    OneMinusConstantAlpha,
}

impl LinearBlendingFactor {
    /// Every factor, in the order of their GL enum values.
    pub const ALL: [LinearBlendingFactor; 15] = [
        LinearBlendingFactor::Zero,
        LinearBlendingFactor::One,
        LinearBlendingFactor::SourceColor,
        LinearBlendingFactor::OneMinusSourceColor,
        LinearBlendingFactor::SourceAlpha,
        LinearBlendingFactor::OneMinusSourceAlpha,
        LinearBlendingFactor::DestinationAlpha,
        LinearBlendingFactor::OneMinusDestinationAlpha,
        LinearBlendingFactor::DestinationColor,
        LinearBlendingFactor::OneMinusDestinationColor,
        LinearBlendingFactor::SourceAlphaSaturate,
        LinearBlendingFactor::ConstantColor,
        LinearBlendingFactor::OneMinusConstantColor,
        LinearBlendingFactor::ConstantAlpha,
        LinearBlendingFactor::OneMinusConstantAlpha,
    ];

    /// Returns the matching `GL_*` enum.
    pub fn to_glenum(&self) -> gl::types::GLenum {
        match *self {
            LinearBlendingFactor::Zero => gl::ZERO,
            LinearBlendingFactor::One => gl::ONE,
            LinearBlendingFactor::SourceColor => gl::SRC_COLOR,
            LinearBlendingFactor::OneMinusSourceColor => gl::ONE_MINUS_SRC_COLOR,
            LinearBlendingFactor::DestinationColor => gl::DST_COLOR,
            LinearBlendingFactor::OneMinusDestinationColor => gl::ONE_MINUS_DST_COLOR,
            LinearBlendingFactor::SourceAlpha => gl::SRC_ALPHA,
            LinearBlendingFactor::OneMinusSourceAlpha => gl::ONE_MINUS_SRC_ALPHA,
            LinearBlendingFactor::DestinationAlpha => gl::DST_ALPHA,
            LinearBlendingFactor::OneMinusDestinationAlpha => gl::ONE_MINUS_DST_ALPHA,
            LinearBlendingFactor::SourceAlphaSaturate => gl::SRC_ALPHA_SATURATE,
            LinearBlendingFactor::ConstantColor => gl::CONSTANT_COLOR,
            LinearBlendingFactor::OneMinusConstantColor => gl::ONE_MINUS_CONSTANT_COLOR,
            LinearBlendingFactor::ConstantAlpha => gl::CONSTANT_ALPHA,
            LinearBlendingFactor::OneMinusConstantAlpha => gl::ONE_MINUS_CONSTANT_ALPHA,
        }
    }

    fn uses_constant(&self) -> bool {
        match *self {
            LinearBlendingFactor::ConstantColor |
            LinearBlendingFactor::OneMinusConstantColor |
            LinearBlendingFactor::ConstantAlpha |
            LinearBlendingFactor::OneMinusConstantAlpha => true,
            _ => false,
        }
    }

    /// Value of the factor for one channel.
    fn value(&self, channel: usize, src: &[f32; 4], dst: &[f32; 4], constant: &[f32; 4]) -> f32 {
        match *self {
            LinearBlendingFactor::Zero => 0.0,
            LinearBlendingFactor::One => 1.0,
            LinearBlendingFactor::SourceColor => src[channel],
            LinearBlendingFactor::OneMinusSourceColor => 1.0 - src[channel],
            LinearBlendingFactor::DestinationColor => dst[channel],
            LinearBlendingFactor::OneMinusDestinationColor => 1.0 - dst[channel],
            LinearBlendingFactor::SourceAlpha => src[3],
            LinearBlendingFactor::OneMinusSourceAlpha => 1.0 - src[3],
            LinearBlendingFactor::DestinationAlpha => dst[3],
            LinearBlendingFactor::OneMinusDestinationAlpha => 1.0 - dst[3],
            LinearBlendingFactor::SourceAlphaSaturate => {
                if channel == 3 { 1.0 } else { src[3].min(1.0 - dst[3]) }
            },
            LinearBlendingFactor::ConstantColor => constant[channel],
            LinearBlendingFactor::OneMinusConstantColor => 1.0 - constant[channel],
            LinearBlendingFactor::ConstantAlpha => constant[3],
            LinearBlendingFactor::OneMinusConstantAlpha => 1.0 - constant[3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Blend, BlendingFunction, LinearBlendingFactor};

    const SRC: [f32; 4] = [0.5, 0.9, 0.4, 0.2];
    const DST: [f32; 4] = [0.9, 0.1, 0.4, 0.3];

    fn both(function: BlendingFunction) -> Blend {
        Blend { color: function, alpha: function, .. Blend::default() }
    }

    fn close(a: [f32; 4], b: [f32; 4]) -> bool {
        a.iter().zip(&b).all(|(x, y)| (x - y).abs() < 1e-6)
    }

    #[test]
    fn replace_min_max() {
        assert_eq!(Blend::default().apply(SRC, DST), SRC);
        assert_eq!(both(BlendingFunction::Min).apply(SRC, DST), [0.5, 0.1, 0.4, 0.2]);
        assert_eq!(both(BlendingFunction::Max).apply(SRC, DST), [0.9, 0.9, 0.4, 0.3]);
    }

    #[test]
    fn subtraction_clamps() {
        let function = BlendingFunction::Subtraction {
            source: LinearBlendingFactor::One,
            destination: LinearBlendingFactor::One,
        };
        assert!(close(both(function).apply(SRC, DST), [0.0, 0.8, 0.0, 0.0]));

        let function = BlendingFunction::ReverseSubtraction {
            source: LinearBlendingFactor::One,
            destination: LinearBlendingFactor::One,
        };
        assert!(close(both(function).apply(SRC, DST), [0.4, 0.0, 0.0, 0.1]));
    }

    #[test]
    fn saturate_and_constants() {
        let blend = Blend {
            color: BlendingFunction::Addition {
                source: LinearBlendingFactor::SourceAlphaSaturate,
                destination: LinearBlendingFactor::Zero,
            },
            alpha: BlendingFunction::Addition {
                source: LinearBlendingFactor::SourceAlphaSaturate,
                destination: LinearBlendingFactor::ConstantAlpha,
            },
            constant_value: (0.0, 0.0, 0.0, 0.5),
        };

        // min(0.2, 1 - 0.3) = 0.2 for colors, 1 for alpha
        assert!(close(blend.apply(SRC, DST), [0.1, 0.18, 0.08, 0.35]));
    }

    #[test]
    fn inputs_are_clamped() {
        assert_eq!(Blend::default().apply([1.5, -0.5, 0.0, 1.0], DST), [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn every_factor_has_a_distinct_enum() {
        let mut values: Vec<_> = LinearBlendingFactor::ALL.iter().map(|f| f.to_glenum()).collect();
        values.sort();
        values.dedup();
        assert_eq!(values.len(), 15);
    }
}
