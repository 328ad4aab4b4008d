/// An RGBA image with float texels, rows stored bottom-up like OpenGL does.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// `width * height` texels, starting with the bottom row.
    pub texels: Vec<[f32; 4]>,
}

impl Image {
    /// An image filled with one color.
    pub fn solid(width: u32, height: u32, color: [f32; 4]) -> Image {
        Image {
            width,
            height,
            texels: vec![color; width as usize * height as usize],
        }
    }

    /// The reference image with four quadrants: red in the lower-left corner, green in the
    /// lower-right corner, blue in the upper-left corner and white in the upper-right corner.
    ///
    /// With `alpha`, the alpha channels of the quadrants are 0.0, 0.25, 0.5 and 1.0 in that
    /// order; otherwise they are all 1.0.
    pub fn rgbw(width: u32, height: u32, alpha: bool) -> Image {
        let quadrants = rgbw_quadrants(alpha);

        let mut texels = Vec::with_capacity(width as usize * height as usize);
        for y in 0 .. height {
            for x in 0 .. width {
                let right = x >= width / 2 && width > 1;
                let top = y >= height / 2 && height > 1;
                texels.push(quadrants[(top as usize) * 2 + right as usize]);
            }
        }

        Image { width, height, texels }
    }

    /// A checkerboard of `square_width` by `square_height` squares, starting with `c0` in the
    /// lower-left corner.
    pub fn checkerboard(width: u32, height: u32, square_width: u32, square_height: u32,
                        c0: [f32; 4], c1: [f32; 4]) -> Image
    {
        let square_width = square_width.max(1);
        let square_height = square_height.max(1);

        let mut texels = Vec::with_capacity(width as usize * height as usize);
        for y in 0 .. height {
            for x in 0 .. width {
                let odd = (x / square_width + y / square_height) % 2 == 1;
                texels.push(if odd { c1 } else { c0 });
            }
        }

        Image { width, height, texels }
    }

    /// Returns the texel at the given position, `(0, 0)` being the lower-left corner.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> [f32; 4] {
        self.texels[y as usize * self.width as usize + x as usize]
    }

    /// Computes the next mipmap level with a 2x2 box filter.
    ///
    /// Dimensions are halved and clamped to 1. When a dimension is odd, its last row or
    /// column is dropped; when it's already 1, texels are only averaged along the other one.
    pub fn downsample(&self) -> Image {
        let width = (self.width / 2).max(1);
        let height = (self.height / 2).max(1);
        let step_x = if self.width > 1 { 2 } else { 1 };
        let step_y = if self.height > 1 { 2 } else { 1 };

        let mut texels = Vec::with_capacity(width as usize * height as usize);
        for y in 0 .. height {
            for x in 0 .. width {
                let mut sum = [0.0f32; 4];
                for dy in 0 .. step_y {
                    for dx in 0 .. step_x {
                        let texel = self.get(x * step_x + dx, y * step_y + dy);
                        for (s, t) in sum.iter_mut().zip(texel) {
                            *s += t;
                        }
                    }
                }

                let count = (step_x * step_y) as f32;
                texels.push(sum.map(|s| s / count));
            }
        }

        Image { width, height, texels }
    }

    /// Returns this image followed by every mipmap level down to 1x1.
    pub fn mipmap_chain(&self) -> Vec<Image> {
        let mut levels = vec![self.clone()];
        while let Some(last) = levels.last() {
            if last.width == 1 && last.height == 1 {
                break;
            }
            let next = last.downsample();
            levels.push(next);
        }
        levels
    }

    /// Returns a rectangle of the image.
    pub fn sub_image(&self, x: u32, y: u32, width: u32, height: u32) -> Image {
        let mut texels = Vec::with_capacity(width as usize * height as usize);
        for row in y .. y + height {
            for column in x .. x + width {
                texels.push(self.get(column, row));
            }
        }
        Image { width, height, texels }
    }

    /// Scales the image to a new size by picking the nearest texel.
    pub fn resize_nearest(&self, width: u32, height: u32) -> Image {
        let mut texels = Vec::with_capacity(width as usize * height as usize);
        for y in 0 .. height {
            for x in 0 .. width {
                let sx = (x as u64 * self.width as u64 / width.max(1) as u64) as u32;
                let sy = (y as u64 * self.height as u64 / height.max(1) as u64) as u32;
                texels.push(self.get(sx, sy));
            }
        }
        Image { width, height, texels }
    }
}

/// Colors of the quadrants of `Image::rgbw`: lower-left, lower-right, upper-left,
/// upper-right.
pub fn rgbw_quadrants(alpha: bool) -> [[f32; 4]; 4] {
    let a = |value: f32| if alpha { value } else { 1.0 };
    [
        [1.0, 0.0, 0.0, a(0.0)],
        [0.0, 1.0, 0.0, a(0.25)],
        [0.0, 0.0, 1.0, a(0.5)],
        [1.0, 1.0, 1.0, a(1.0)],
    ]
}

/// Number of levels of a full mipmap chain.
pub fn mipmap_levels(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

#[cfg(test)]
mod tests {
    use super::{mipmap_levels, Image};

    const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    const BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

    #[test]
    fn rgbw_quadrants() {
        let image = Image::rgbw(4, 4, true);
        assert_eq!(image.get(0, 0), [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(image.get(3, 0), [0.0, 1.0, 0.0, 0.25]);
        assert_eq!(image.get(0, 3), [0.0, 0.0, 1.0, 0.5]);
        assert_eq!(image.get(2, 2), [1.0, 1.0, 1.0, 1.0]);

        let image = Image::rgbw(2, 2, false);
        assert_eq!(image.get(1, 0), [0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn checkerboard() {
        let image = Image::checkerboard(4, 4, 2, 2, RED, BLUE);
        assert_eq!(image.get(0, 0), RED);
        assert_eq!(image.get(2, 0), BLUE);
        assert_eq!(image.get(2, 2), RED);
        assert_eq!(image.get(1, 3), BLUE);
    }

    #[test]
    fn downsample_averages() {
        let image = Image::checkerboard(2, 2, 1, 1, RED, BLUE);
        let level = image.downsample();
        assert_eq!((level.width, level.height), (1, 1));
        assert_eq!(level.texels, vec![[0.5, 0.0, 0.5, 1.0]]);
    }

    #[test]
    fn downsample_odd_and_thin() {
        // the last column is dropped
        let mut image = Image::solid(3, 2, RED);
        image.texels[2] = BLUE;
        image.texels[5] = BLUE;
        assert_eq!(image.downsample().texels, vec![RED]);

        // a single row is only averaged horizontally
        let image = Image::checkerboard(4, 1, 1, 1, RED, BLUE);
        let level = image.downsample();
        assert_eq!((level.width, level.height), (2, 1));
        assert_eq!(level.texels, vec![[0.5, 0.0, 0.5, 1.0]; 2]);
    }

    #[test]
    fn chains() {
        let chain = Image::rgbw(8, 2, false).mipmap_chain();
        let sizes: Vec<_> = chain.iter().map(|l| (l.width, l.height)).collect();
        assert_eq!(sizes, vec![(8, 2), (4, 1), (2, 1), (1, 1)]);
        assert_eq!(mipmap_levels(8, 2), 4);
        assert_eq!(mipmap_levels(1, 1), 1);
        assert_eq!(mipmap_levels(160, 100), 8);
    }

    #[test]
    fn sub_images_and_resizing() {
        let image = Image::rgbw(4, 4, false);
        assert_eq!(image.sub_image(2, 2, 2, 2), Image::solid(2, 2, [1.0; 4]));
        assert_eq!(image.resize_nearest(2, 2), Image::rgbw(2, 2, false));
    }
}
