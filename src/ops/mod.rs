//! Pixel read-back and rectangle drawing.
//!
//! Both are methods of `Context`, so that test code can call them through a `TestContext`.

pub use self::draw::{ortho_projection, window_rect_to_ndc, ATTRIB_POS, ATTRIB_TEX};
pub use self::read::Pixels;

mod draw;
mod read;
