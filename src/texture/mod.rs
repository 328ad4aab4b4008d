/*!
Two-dimensional textures used as test inputs and render targets.

Textures are created from `reference::Image`s, so that the same image can be used to compute
the expected result of a test:

```no_run
# fn example(ctx: &piglit::framework::TestContext) {
use piglit::gl;
use piglit::texture::Texture2d;

let texture = Texture2d::rgbw(ctx, gl::RGBA8, 64, 64, true, false);
texture.bind(0);
# }
```

*/
use std::os::raw::c_void;
use std::ptr;
use std::rc::Rc;

use crate::backend::Facade;
use crate::context::Context;
use crate::gl;
use crate::reference::{mipmap_levels, Image};
use crate::version::{Api, Version};
use crate::GlObject;

pub use self::format::{clear_color_for_bits, color_bits, component_count, expected_clear_color,
                       format_kind, pack_texels, upload_format, FormatKind, UploadFormat};

mod format;

/// A 2D texture with a fixed number of mipmap levels.
pub struct Texture2d {
    context: Rc<Context>,
    id: gl::types::GLuint,
    internal_format: gl::types::GLenum,
    width: u32,
    height: u32,
    levels: u32,
}

impl GlObject for Texture2d {
    type Id = gl::types::GLuint;

    #[inline]
    fn get_id(&self) -> gl::types::GLuint {
        self.id
    }
}

impl Drop for Texture2d {
    fn drop(&mut self) {
        unsafe { self.context.gl.DeleteTextures(1, &self.id) };
    }
}

impl Texture2d {
    /// Allocates a texture with `levels` levels and undefined content.
    ///
    /// A `levels` of 0 means a full mipmap chain.
    pub fn empty<F: ?Sized>(facade: &F, internal_format: gl::types::GLenum, width: u32,
                            height: u32, levels: u32) -> Texture2d where F: Facade
    {
        let levels = if levels == 0 { mipmap_levels(width, height) } else { levels };
        let texture = Texture2d::create(facade, internal_format, width, height, levels);

        let upload = upload_format(texture.context.get_version(), internal_format);
        for level in 0 .. levels {
            let (w, h) = texture.level_dimensions(level);
            unsafe {
                texture.context.gl.TexImage2D(gl::TEXTURE_2D, level as gl::types::GLint,
                                              upload.internal_format as gl::types::GLint,
                                              w as gl::types::GLsizei, h as gl::types::GLsizei,
                                              0, upload.format, upload.ty, ptr::null());
            }
        }

        texture
    }

    /// Creates a texture with a single level.
    pub fn from_image<F: ?Sized>(facade: &F, internal_format: gl::types::GLenum, image: &Image)
                                 -> Texture2d where F: Facade
    {
        Texture2d::from_images(facade, internal_format, std::slice::from_ref(image))
    }

    /// Creates a texture whose levels are the given images.
    ///
    /// ## Panic
    ///
    /// Panics if `images` is empty.
    pub fn from_images<F: ?Sized>(facade: &F, internal_format: gl::types::GLenum,
                                  images: &[Image]) -> Texture2d where F: Facade
    {
        assert!(!images.is_empty());

        let texture = Texture2d::create(facade, internal_format, images[0].width,
                                        images[0].height, images.len() as u32);
        for (level, image) in images.iter().enumerate() {
            texture.upload(level as u32, image);
        }

        texture
    }

    /// Creates a texture with the RGBW reference pattern at every level.
    ///
    /// See `Image::rgbw`. Each level is drawn at its own size rather than filtered, so that
    /// the four colors stay pure down to 2x2.
    pub fn rgbw<F: ?Sized>(facade: &F, internal_format: gl::types::GLenum, width: u32,
                           height: u32, mipmapped: bool, alpha: bool) -> Texture2d
        where F: Facade
    {
        let levels = if mipmapped { mipmap_levels(width, height) } else { 1 };
        let images: Vec<Image> = (0 .. levels).map(|level| {
            let (w, h) = level_size(width, height, level);
            Image::rgbw(w, h, alpha)
        }).collect();

        Texture2d::from_images(facade, internal_format, &images)
    }

    /// Creates a single-level checkerboard texture. See `Image::checkerboard`.
    pub fn checkerboard<F: ?Sized>(facade: &F, internal_format: gl::types::GLenum, width: u32,
                                   height: u32, square_width: u32, square_height: u32,
                                   c0: [f32; 4], c1: [f32; 4]) -> Texture2d where F: Facade
    {
        let image = Image::checkerboard(width, height, square_width, square_height, c0, c1);
        let texture = Texture2d::from_image(facade, internal_format, &image);
        texture.set_filters(gl::NEAREST, gl::NEAREST);
        texture
    }

    fn create<F: ?Sized>(facade: &F, internal_format: gl::types::GLenum, width: u32,
                         height: u32, levels: u32) -> Texture2d where F: Facade
    {
        let context = facade.get_context().clone();

        let mut id = 0;
        unsafe {
            context.gl.GenTextures(1, &mut id);
            context.gl.BindTexture(gl::TEXTURE_2D, id);
            context.gl.PixelStorei(gl::UNPACK_ALIGNMENT, 1);

            let has_max_level = !context.is_gles() ||
                                context.get_version() >= &Version(Api::GlEs, 3, 0);
            if has_max_level {
                context.gl.TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAX_LEVEL,
                                         levels as gl::types::GLint - 1);
            }

            let min_filter = if levels > 1 { gl::NEAREST_MIPMAP_NEAREST } else { gl::NEAREST };
            context.gl.TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER,
                                     min_filter as gl::types::GLint);
            context.gl.TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER,
                                     gl::NEAREST as gl::types::GLint);
        }

        log::debug!("created texture {} ({}x{}, {} levels, {})", id, width, height, levels,
                    crate::enums::enum_name(internal_format));

        Texture2d { context, id, internal_format, width, height, levels }
    }

    fn upload(&self, level: u32, image: &Image) {
        let upload = upload_format(self.context.get_version(), self.internal_format);
        let data = pack_texels(&image.texels, upload.format, upload.ty);

        unsafe {
            self.context.gl.BindTexture(gl::TEXTURE_2D, self.id);
            self.context.gl.TexImage2D(gl::TEXTURE_2D, level as gl::types::GLint,
                                       upload.internal_format as gl::types::GLint,
                                       image.width as gl::types::GLsizei,
                                       image.height as gl::types::GLsizei, 0, upload.format,
                                       upload.ty, data.as_ptr() as *const c_void);
        }
    }

    /// Returns the internal format.
    #[inline]
    pub fn internal_format(&self) -> gl::types::GLenum {
        self.internal_format
    }

    /// Returns the width of level 0.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of level 0.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the number of levels.
    #[inline]
    pub fn levels(&self) -> u32 {
        self.levels
    }

    /// Returns the dimensions of a level.
    #[inline]
    pub fn level_dimensions(&self, level: u32) -> (u32, u32) {
        level_size(self.width, self.height, level)
    }

    /// Binds the texture to a texture unit.
    pub fn bind(&self, unit: u32) {
        unsafe {
            self.context.gl.ActiveTexture(gl::TEXTURE0 + unit);
            self.context.gl.BindTexture(gl::TEXTURE_2D, self.id);
        }
    }

    /// Fills every level below level 0 with `glGenerateMipmap`.
    pub fn generate_mipmap(&self) {
        unsafe {
            self.context.gl.BindTexture(gl::TEXTURE_2D, self.id);
            if self.context.gl.GenerateMipmap.is_loaded() {
                self.context.gl.GenerateMipmap(gl::TEXTURE_2D);
            } else {
                self.context.gl.GenerateMipmapEXT(gl::TEXTURE_2D);
            }
        }
    }

    /// Sets the minification and magnification filters.
    pub fn set_filters(&self, min: gl::types::GLenum, mag: gl::types::GLenum) {
        unsafe {
            self.context.gl.BindTexture(gl::TEXTURE_2D, self.id);
            self.context.gl.TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER,
                                          min as gl::types::GLint);
            self.context.gl.TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER,
                                          mag as gl::types::GLint);
        }
    }

    /// Sets `GL_TEXTURE_SWIZZLE_R`, `_G`, `_B` and `_A`.
    ///
    /// Each value is one of `GL_RED`, `GL_GREEN`, `GL_BLUE`, `GL_ALPHA`, `GL_ZERO` or
    /// `GL_ONE`.
    pub fn set_swizzle(&self, swizzle: [gl::types::GLenum; 4]) {
        let params = [gl::TEXTURE_SWIZZLE_R, gl::TEXTURE_SWIZZLE_G, gl::TEXTURE_SWIZZLE_B,
                      gl::TEXTURE_SWIZZLE_A];

        unsafe {
            self.context.gl.BindTexture(gl::TEXTURE_2D, self.id);
            for (param, value) in params.iter().zip(swizzle) {
                self.context.gl.TexParameteri(gl::TEXTURE_2D, *param,
                                              value as gl::types::GLint);
            }
        }
    }

    /// Reads a level back with `glGetTexImage`.
    ///
    /// Returns `None` on OpenGL ES, which lacks the function.
    pub fn read_level(&self, level: u32) -> Option<Image> {
        if self.context.is_gles() || !self.context.gl.GetTexImage.is_loaded() {
            return None;
        }

        let (width, height) = self.level_dimensions(level);
        let mut texels = vec![[0.0f32; 4]; width as usize * height as usize];

        unsafe {
            self.context.gl.BindTexture(gl::TEXTURE_2D, self.id);
            self.context.gl.PixelStorei(gl::PACK_ALIGNMENT, 1);
            self.context.gl.GetTexImage(gl::TEXTURE_2D, level as gl::types::GLint, gl::RGBA,
                                        gl::FLOAT, texels.as_mut_ptr() as *mut c_void);
        }

        Some(Image { width, height, texels })
    }
}

/// Returns the dimensions of a mipmap level.
pub fn level_size(width: u32, height: u32, level: u32) -> (u32, u32) {
    let shift = level.min(31);
    ((width >> shift).max(1), (height >> shift).max(1))
}

#[cfg(test)]
mod tests {
    use super::level_size;

    #[test]
    fn level_sizes() {
        assert_eq!(level_size(64, 16, 0), (64, 16));
        assert_eq!(level_size(64, 16, 3), (8, 2));
        assert_eq!(level_size(64, 16, 5), (2, 1));
        assert_eq!(level_size(64, 16, 40), (1, 1));
    }
}
