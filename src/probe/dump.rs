use std::env;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use image::{ImageError, RgbaImage};

use crate::ops::Pixels;

static DUMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Returns the directory where failing probes are dumped, from `PIGLIT_DUMP_DIR`.
pub fn dump_dir() -> Option<PathBuf> {
    env::var_os("PIGLIT_DUMP_DIR").filter(|dir| !dir.is_empty()).map(PathBuf::from)
}

/// Writes the pixels as a PNG file in `dir` and returns its path.
///
/// Files are named after the running program and numbered in the order of the failures.
pub fn dump_pixels(dir: &Path, pixels: &Pixels<f32>) -> Result<PathBuf, ImageError> {
    let program = env::current_exe().ok()
        .and_then(|exe| exe.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "piglit".to_owned());

    let index = DUMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let path = dir.join(format!("{}-{}-{}x{}+{}+{}.png", program, index, pixels.width,
                                pixels.height, pixels.x, pixels.y));

    to_image(pixels).save(&path)?;
    Ok(path)
}

/// Converts read-back pixels to an 8-bit RGBA image, top row first.
fn to_image(pixels: &Pixels<f32>) -> RgbaImage {
    let mut image = RgbaImage::new(pixels.width, pixels.height);

    for (x, y, texel) in pixels.iter() {
        let mut rgba = [0, 0, 0, 255];
        for (dst, src) in rgba.iter_mut().zip(texel) {
            *dst = (src.max(0.0).min(1.0) * 255.0).round() as u8;
        }

        let column = (x - pixels.x) as u32;
        let row = pixels.height - 1 - (y - pixels.y) as u32;
        image.put_pixel(column, row, image::Rgba(rgba));
    }

    image
}

#[cfg(test)]
mod tests {
    use super::{dump_pixels, to_image};
    use crate::ops::Pixels;

    fn red_over_blue() -> Pixels<f32> {
        // bottom row blue, top row red
        Pixels::new(3, 4, 1, 2, 4, vec![0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 1.0])
    }

    #[test]
    fn rows_are_flipped() {
        let image = to_image(&red_over_blue());
        assert_eq!(image.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(0, 1).0, [0, 0, 255, 255]);
    }

    #[test]
    fn writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dump_pixels(dir.path(), &red_over_blue()).unwrap();

        assert!(path.starts_with(dir.path()));
        assert!(path.to_string_lossy().ends_with("-1x2+3+4.png"));

        let image = image::open(&path).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (1, 2));
        assert_eq!(image.get_pixel(0, 1).0, [0, 0, 255, 255]);
    }
}
