use std::os::raw::c_void;

use crate::context::Context;
use crate::gl;

/// A rectangle of pixels read back from a framebuffer or a texture.
///
/// Rows are stored bottom-up, as returned by OpenGL. `x` and `y` are the window coordinates
/// of the lower-left pixel, so that probes can report absolute positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Pixels<T> {
    /// Window X coordinate of the first column.
    pub x: i32,
    /// Window Y coordinate of the first row.
    pub y: i32,
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// Number of components per pixel.
    pub components: usize,
    /// `width * height * components` values.
    pub data: Vec<T>,
}

impl<T> Pixels<T> {
    /// Wraps already read data.
    ///
    /// ## Panic
    ///
    /// Panics if the length of `data` doesn't match the dimensions.
    pub fn new(x: i32, y: i32, width: u32, height: u32, components: usize, data: Vec<T>)
               -> Pixels<T>
    {
        assert_eq!(data.len(), width as usize * height as usize * components);
        Pixels { x, y, width, height, components, data }
    }

    /// Returns the components of the pixel at the given position, relative to the first
    /// pixel of the rectangle.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[T] {
        let offset = (y as usize * self.width as usize + x as usize) * self.components;
        &self.data[offset .. offset + self.components]
    }

    /// Iterates over `(x, y, components)`, with `x` and `y` in window coordinates, row by
    /// row starting at the bottom.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, &[T])> {
        let width = self.width.max(1) as usize;
        let (x0, y0) = (self.x, self.y);
        self.data.chunks(self.components).enumerate().map(move |(i, pixel)| {
            (x0 + (i % width) as i32, y0 + (i / width) as i32, pixel)
        })
    }
}

impl Context {
    /// Reads a rectangle of the current read framebuffer as normalized RGBA floats.
    ///
    /// Desktop GL reads `GL_FLOAT` directly. OpenGL ES only guarantees
    /// `GL_RGBA`/`GL_UNSIGNED_BYTE` for normalized formats, so the bytes are read and divided
    /// by 255.
    pub fn read_pixels_rgba(&self, x: i32, y: i32, width: u32, height: u32) -> Pixels<f32> {
        let count = width as usize * height as usize * 4;

        let data = if self.is_gles() {
            let bytes: Vec<u8> = self.read_raw(x, y, width, height, gl::RGBA,
                                               gl::UNSIGNED_BYTE, count);
            bytes.into_iter().map(|b| b as f32 / 255.0).collect()
        } else {
            self.read_raw(x, y, width, height, gl::RGBA, gl::FLOAT, count)
        };

        Pixels::new(x, y, width, height, 4, data)
    }

    /// Reads a rectangle of the depth buffer of the current read framebuffer.
    pub fn read_depth(&self, x: i32, y: i32, width: u32, height: u32) -> Pixels<f32> {
        let count = width as usize * height as usize;
        let data = self.read_raw(x, y, width, height, gl::DEPTH_COMPONENT, gl::FLOAT, count);
        Pixels::new(x, y, width, height, 1, data)
    }

    /// Reads a rectangle of the stencil buffer of the current read framebuffer.
    pub fn read_stencil(&self, x: i32, y: i32, width: u32, height: u32) -> Pixels<i64> {
        let count = width as usize * height as usize;
        let data: Vec<u8> = self.read_raw(x, y, width, height, gl::STENCIL_INDEX,
                                          gl::UNSIGNED_BYTE, count);
        Pixels::new(x, y, width, height, 1, data.into_iter().map(i64::from).collect())
    }

    /// Reads a rectangle of a signed integer color buffer.
    pub fn read_pixels_rgba_int(&self, x: i32, y: i32, width: u32, height: u32) -> Pixels<i64> {
        let count = width as usize * height as usize * 4;
        let data: Vec<i32> = self.read_raw(x, y, width, height, gl::RGBA_INTEGER, gl::INT,
                                           count);
        Pixels::new(x, y, width, height, 4, data.into_iter().map(i64::from).collect())
    }

    /// Reads a rectangle of an unsigned integer color buffer.
    pub fn read_pixels_rgba_uint(&self, x: i32, y: i32, width: u32, height: u32) -> Pixels<i64> {
        let count = width as usize * height as usize * 4;
        let data: Vec<u32> = self.read_raw(x, y, width, height, gl::RGBA_INTEGER,
                                           gl::UNSIGNED_INT, count);
        Pixels::new(x, y, width, height, 4, data.into_iter().map(i64::from).collect())
    }

    fn read_raw<T>(&self, x: i32, y: i32, width: u32, height: u32,
                   format: gl::types::GLenum, ty: gl::types::GLenum, count: usize) -> Vec<T>
        where T: Copy + Default
    {
        let mut data = vec![T::default(); count];

        unsafe {
            // adjusting data alignement
            self.gl.PixelStorei(gl::PACK_ALIGNMENT, 1);

            self.gl.ReadPixels(x, y, width as gl::types::GLsizei, height as gl::types::GLsizei,
                               format, ty, data.as_mut_ptr() as *mut c_void);
        }

        data
    }
}

#[cfg(test)]
mod tests {
    use super::Pixels;

    #[test]
    fn pixel_positions() {
        let pixels = Pixels::new(10, 20, 2, 2, 1, vec![1, 2, 3, 4]);

        assert_eq!(pixels.pixel(1, 0), &[2]);
        assert_eq!(pixels.pixel(0, 1), &[3]);

        let positions: Vec<_> = pixels.iter().map(|(x, y, p)| (x, y, p[0])).collect();
        assert_eq!(positions, vec![(10, 20, 1), (11, 20, 2), (10, 21, 3), (11, 21, 4)]);
    }

    #[test]
    #[should_panic]
    fn mismatched_length() {
        Pixels::new(0, 0, 2, 2, 4, vec![0.0f32; 15]);
    }
}
