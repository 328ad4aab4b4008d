use std::mem;
use std::os::raw::c_void;
use std::ptr;

use cgmath::Matrix4;
use memoffset::offset_of;

use crate::context::Context;
use crate::gl;
use crate::version::{Api, Version};

/// Attribute location of the vertex positions, bound to `piglit_vertex`.
pub const ATTRIB_POS: gl::types::GLuint = 0;
/// Attribute location of the texture coordinates, bound to `piglit_texcoord`.
pub const ATTRIB_TEX: gl::types::GLuint = 1;

#[derive(Debug, Clone, Copy, Default)]
#[repr(C)]
struct Vertex {
    position: [f32; 4],
    tex_coord: [f32; 2],
}

impl Context {
    /// Draws a rectangle in clip space with the currently bound program.
    ///
    /// `(x, y)` is the lower-left corner. The rectangle `(-1, -1, 2, 2)` covers the whole
    /// viewport.
    #[inline]
    pub fn draw_rect(&self, x: f32, y: f32, width: f32, height: f32) {
        self.draw_rect_z(0.0, x, y, width, height);
    }

    /// Same as `draw_rect`, at depth `z` in clip space.
    pub fn draw_rect_z(&self, z: f32, x: f32, y: f32, width: f32, height: f32) {
        let vertices = rect_vertices(z, [x, y, width, height], [0.0, 0.0, 1.0, 1.0]);
        self.draw_vertices(&vertices);
    }

    /// Draws a rectangle whose texture coordinates go from `(tx, ty)` to
    /// `(tx + tw, ty + th)`.
    pub fn draw_rect_tex(&self, x: f32, y: f32, width: f32, height: f32,
                         tx: f32, ty: f32, tw: f32, th: f32)
    {
        let vertices = rect_vertices(0.0, [x, y, width, height], [tx, ty, tw, th]);
        self.draw_vertices(&vertices);
    }

    /// Returns true if vertex array objects can be used.
    pub fn has_vertex_array_objects(&self) -> bool {
        let version = *self.get_version();
        let supported = version >= Version(Api::Gl, 3, 0) ||
                        version >= Version(Api::GlEs, 3, 0) ||
                        self.get_extensions().contains("GL_ARB_vertex_array_object") ||
                        self.get_extensions().contains("GL_OES_vertex_array_object");

        supported && self.gl.GenVertexArrays.is_loaded()
    }

    fn draw_vertices(&self, vertices: &[Vertex; 4]) {
        let stride = mem::size_of::<Vertex>() as gl::types::GLsizei;

        unsafe {
            let mut vao = 0;
            if self.has_vertex_array_objects() {
                self.gl.GenVertexArrays(1, &mut vao);
                self.gl.BindVertexArray(vao);
            }

            let mut buffer = 0;
            self.gl.GenBuffers(1, &mut buffer);
            self.gl.BindBuffer(gl::ARRAY_BUFFER, buffer);
            self.gl.BufferData(gl::ARRAY_BUFFER, mem::size_of_val(vertices) as gl::types::GLsizeiptr,
                               vertices.as_ptr() as *const c_void, gl::STREAM_DRAW);

            self.gl.VertexAttribPointer(ATTRIB_POS, 4, gl::FLOAT, gl::FALSE, stride,
                                        offset_of!(Vertex, position) as *const c_void);
            self.gl.VertexAttribPointer(ATTRIB_TEX, 2, gl::FLOAT, gl::FALSE, stride,
                                        offset_of!(Vertex, tex_coord) as *const c_void);
            self.gl.EnableVertexAttribArray(ATTRIB_POS);
            self.gl.EnableVertexAttribArray(ATTRIB_TEX);

            self.gl.DrawArrays(gl::TRIANGLE_STRIP, 0, 4);

            self.gl.DisableVertexAttribArray(ATTRIB_POS);
            self.gl.DisableVertexAttribArray(ATTRIB_TEX);
            self.gl.BindBuffer(gl::ARRAY_BUFFER, 0);
            self.gl.DeleteBuffers(1, &buffer);

            if vao != 0 {
                self.gl.BindVertexArray(0);
                self.gl.DeleteVertexArrays(1, &vao);
            }
        }
    }
}

fn rect_vertices(z: f32, rect: [f32; 4], tex: [f32; 4]) -> [Vertex; 4] {
    let [x, y, w, h] = rect;
    let [tx, ty, tw, th] = tex;

    // triangle strip order
    [
        Vertex { position: [x, y, z, 1.0], tex_coord: [tx, ty] },
        Vertex { position: [x + w, y, z, 1.0], tex_coord: [tx + tw, ty] },
        Vertex { position: [x, y + h, z, 1.0], tex_coord: [tx, ty + th] },
        Vertex { position: [x + w, y + h, z, 1.0], tex_coord: [tx + tw, ty + th] },
    ]
}

/// Converts a rectangle in window coordinates to the arguments of `draw_rect`.
///
/// Returns `(x, y, width, height)` in normalized device coordinates.
pub fn window_rect_to_ndc(x: i32, y: i32, width: i32, height: i32,
                          window: (u32, u32)) -> (f32, f32, f32, f32)
{
    let (win_w, win_h) = (window.0 as f32, window.1 as f32);
    (
        2.0 * x as f32 / win_w - 1.0,
        2.0 * y as f32 / win_h - 1.0,
        2.0 * width as f32 / win_w,
        2.0 * height as f32 / win_h,
    )
}

/// Orthographic projection mapping window coordinates to clip space, with `(0, 0)` at the
/// lower-left corner.
pub fn ortho_projection(width: u32, height: u32) -> [[f32; 4]; 4] {
    let matrix: Matrix4<f32> = cgmath::ortho(0.0, width as f32, 0.0, height as f32, -1.0, 1.0);
    matrix.into()
}

#[cfg(test)]
mod tests {
    use super::{ortho_projection, rect_vertices, window_rect_to_ndc};

    #[test]
    fn full_window() {
        assert_eq!(window_rect_to_ndc(0, 0, 160, 160, (160, 160)), (-1.0, -1.0, 2.0, 2.0));
        assert_eq!(window_rect_to_ndc(80, 40, 40, 80, (160, 160)), (0.0, -0.5, 0.5, 1.0));
    }

    #[test]
    fn strip_corners() {
        let vertices = rect_vertices(0.5, [-1.0, -1.0, 2.0, 1.0], [0.0, 0.0, 1.0, 1.0]);
        assert_eq!(vertices[0].position, [-1.0, -1.0, 0.5, 1.0]);
        assert_eq!(vertices[3].position, [1.0, 0.0, 0.5, 1.0]);
        assert_eq!(vertices[1].tex_coord, [1.0, 0.0]);
        assert_eq!(vertices[2].tex_coord, [0.0, 1.0]);
    }

    #[test]
    fn ortho_maps_corners() {
        let m = ortho_projection(100, 50);
        // column-major
        let apply = |x: f32, y: f32| {
            (m[0][0] * x + m[1][0] * y + m[3][0], m[0][1] * x + m[1][1] * y + m[3][1])
        };

        let (x, y) = apply(0.0, 0.0);
        assert!((x + 1.0).abs() < 1e-6 && (y + 1.0).abs() < 1e-6);
        let (x, y) = apply(100.0, 50.0);
        assert!((x - 1.0).abs() < 1e-6 && (y - 1.0).abs() < 1e-6);
    }
}
