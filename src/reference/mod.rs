/*!
CPU computation of expected values.

Tests draw with OpenGL and compare the result with what is computed here: reference images,
mipmap levels, blending results and color conversions.

*/
pub use self::blend::{Blend, BlendingFunction, LinearBlendingFactor};
pub use self::color::{linear_to_srgb, quantize_color, quantize_unorm, srgb_to_linear};
pub use self::image::{mipmap_levels, rgbw_quadrants, Image};

mod blend;
mod color;
mod image;
