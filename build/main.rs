use std::env;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use gl_generator::{Api, Fallbacks, Profile, Registry, StructGenerator};

/// Extensions whose enums or entry points are used by the harness or by the tests.
const GL_EXTENSIONS: &[&str] = &[
    "GL_ARB_debug_output",
    "GL_ARB_framebuffer_object",
    "GL_ARB_texture_swizzle",
    "GL_EXT_blend_minmax",
    "GL_EXT_draw_buffers2",
    "GL_EXT_framebuffer_blit",
    "GL_EXT_framebuffer_multisample",
    "GL_EXT_framebuffer_object",
    "GL_EXT_texture_swizzle",
    "GL_KHR_debug",
    "GL_KHR_no_error",
];

const GLES_EXTENSIONS: &[&str] = &[
    "GL_EXT_blend_minmax",
    "GL_EXT_color_buffer_float",
    "GL_EXT_draw_buffers",
    "GL_EXT_texture_format_BGRA8888",
    "GL_KHR_debug",
    "GL_OES_depth24",
    "GL_OES_packed_depth_stencil",
    "GL_OES_rgb8_rgba8",
    "GL_OES_vertex_array_object",
];

fn main() {
    let dest = env::var("OUT_DIR").unwrap();
    let mut file = BufWriter::new(File::create(Path::new(&dest).join("gl_bindings.rs")).unwrap());

    let gl = Registry::new(Api::Gl, (4, 6), Profile::Compatibility, Fallbacks::All,
                           GL_EXTENSIONS);
    let gles = Registry::new(Api::Gles2, (3, 2), Profile::Compatibility, Fallbacks::None,
                             GLES_EXTENSIONS);

    (gl + gles).write_bindings(StructGenerator, &mut file).unwrap();

    println!("cargo:rerun-if-changed=build/main.rs");
}
