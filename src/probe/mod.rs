/*!
Comparison of read-back values against expected values.

The pure functions of this module work on a `Pixels` buffer and return the first mismatch as a
`ProbeFailure`. The methods of `TestContext` read the current read framebuffer, print the
failure in the usual format and return a `bool`:

```text
Probe color at (12,40)
  Expected: 1.000000 0.000000 0.000000 1.000000
  Observed: 0.000000 0.000000 1.000000 1.000000
```

*/
use std::error::Error;
use std::fmt;

use smallvec::SmallVec;

use crate::framework::TestContext;
use crate::ops::Pixels;

pub use self::dump::{dump_dir, dump_pixels};

mod dump;

/// Tolerance of the depth probes.
pub const DEPTH_TOLERANCE: f32 = 0.01;

/// Maximum difference per channel for a color to be considered equal to the expected one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance(pub [f32; 4]);

impl Default for Tolerance {
    #[inline]
    fn default() -> Tolerance {
        Tolerance([0.01; 4])
    }
}

impl Tolerance {
    /// The same tolerance for every channel.
    #[inline]
    pub fn uniform(value: f32) -> Tolerance {
        Tolerance([value; 4])
    }

    /// Computes the tolerance matching the bit depths of a framebuffer.
    ///
    /// A channel with fewer than two bits can't be validated and gets a tolerance of 1.0.
    /// Otherwise the tolerance is three steps of the channel, `3.0 / 2^bits`.
    pub fn for_bits(red: u8, green: u8, blue: u8, alpha: u8) -> Tolerance {
        let channel = |bits: u8| {
            if bits < 2 {
                1.0
            } else {
                3.0 / (1u64 << bits.min(32)) as f32
            }
        };

        Tolerance([channel(red), channel(green), channel(blue), channel(alpha)])
    }

    /// Returns true if every observed component is within the tolerance of the expected one.
    ///
    /// Only the first `expected.len()` components are compared.
    pub fn equal(&self, expected: &[f32], observed: &[f32]) -> bool {
        expected.iter().zip(observed).enumerate().all(|(i, (e, o))| {
            (o - e).abs() <= self.0[i.min(3)]
        })
    }
}

/// What was probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    /// Color buffer.
    Color,
    /// Depth buffer.
    Depth,
    /// Stencil buffer.
    Stencil,
}

impl ProbeKind {
    fn name(&self) -> &'static str {
        match *self {
            ProbeKind::Color => "color",
            ProbeKind::Depth => "depth",
            ProbeKind::Stencil => "stencil",
        }
    }
}

/// Values of a pixel, as printed in a failure report.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeValues {
    /// Normalized or floating point components, or a depth.
    Float(SmallVec<[f32; 4]>),
    /// Integer components, or a stencil index.
    Int(SmallVec<[i64; 4]>),
}

impl fmt::Display for ProbeValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeValues::Float(values) => {
                for (i, value) in values.iter().enumerate() {
                    if i != 0 { f.write_str(" ")?; }
                    write!(f, "{:.6}", value)?;
                }
            },
            ProbeValues::Int(values) => {
                for (i, value) in values.iter().enumerate() {
                    if i != 0 { f.write_str(" ")?; }
                    write!(f, "{}", value)?;
                }
            },
        }
        Ok(())
    }
}

/// The first pixel of a probe that didn't match.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeFailure {
    /// Buffer that was probed.
    pub kind: ProbeKind,
    /// Window coordinates of the pixel.
    pub x: i32,
    /// See `x`.
    pub y: i32,
    /// Value the pixel should have had.
    pub expected: ProbeValues,
    /// Second accepted value, for probes that accept either of two values.
    pub alternative: Option<ProbeValues>,
    /// Value read back.
    pub observed: ProbeValues,
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Probe {} at ({},{})", self.kind.name(), self.x, self.y)?;
        writeln!(f, "  Expected: {}", self.expected)?;
        if let Some(alternative) = &self.alternative {
            writeln!(f, "        or: {}", alternative)?;
        }
        write!(f, "  Observed: {}", self.observed)
    }
}

impl Error for ProbeFailure {}

fn floats(values: &[f32]) -> ProbeValues {
    ProbeValues::Float(values.iter().copied().collect())
}

fn ints(values: &[i64]) -> ProbeValues {
    ProbeValues::Int(values.iter().copied().collect())
}

fn float_failure(kind: ProbeKind, x: i32, y: i32, expected: &[f32], observed: &[f32])
                 -> ProbeFailure
{
    let n = expected.len().min(observed.len());
    ProbeFailure {
        kind, x, y,
        expected: floats(expected),
        alternative: None,
        observed: floats(&observed[.. n]),
    }
}

/// Checks that every pixel has the expected color.
///
/// `expected` has 3 or 4 components; with 3, alpha is ignored.
pub fn probe_rect(pixels: &Pixels<f32>, expected: &[f32], tolerance: &Tolerance)
                  -> Result<(), ProbeFailure>
{
    match pixels.iter().find(|(_, _, p)| !tolerance.equal(expected, p)) {
        Some((x, y, observed)) => Err(float_failure(ProbeKind::Color, x, y, expected, observed)),
        None => Ok(()),
    }
}

/// Checks that every pixel has one of two colors.
pub fn probe_rect_either(pixels: &Pixels<f32>, expected: &[f32], alternative: &[f32],
                         tolerance: &Tolerance) -> Result<(), ProbeFailure>
{
    let mismatch = pixels.iter().find(|(_, _, p)| {
        !tolerance.equal(expected, p) && !tolerance.equal(alternative, p)
    });

    match mismatch {
        Some((x, y, observed)) => {
            let mut failure = float_failure(ProbeKind::Color, x, y, expected, observed);
            failure.alternative = Some(floats(alternative));
            Err(failure)
        },
        None => Ok(()),
    }
}

/// Checks the pixels against an image of the same size.
///
/// Only the first `components` channels of each texel are compared.
pub fn probe_image(pixels: &Pixels<f32>, expected: &[[f32; 4]], components: usize,
                   tolerance: &Tolerance) -> Result<(), ProbeFailure>
{
    assert_eq!(expected.len(), pixels.width as usize * pixels.height as usize);

    for ((x, y, observed), texel) in pixels.iter().zip(expected) {
        let texel = &texel[.. components];
        if !tolerance.equal(texel, observed) {
            return Err(float_failure(ProbeKind::Color, x, y, texel, observed));
        }
    }

    Ok(())
}

/// Checks that the right half of the pixels is equal to the left half.
///
/// The failure reports the left pixel as expected and the right pixel as observed. An odd
/// middle column is ignored.
pub fn compare_halves(pixels: &Pixels<f32>, tolerance: &Tolerance) -> Result<(), ProbeFailure> {
    let half = pixels.width / 2;

    for row in 0 .. pixels.height {
        for column in 0 .. half {
            let left = pixels.pixel(column, row);
            let right = pixels.pixel(column + half + pixels.width % 2, row);
            if !tolerance.equal(left, right) {
                let x = pixels.x + (column + half + pixels.width % 2) as i32;
                let y = pixels.y + row as i32;
                return Err(float_failure(ProbeKind::Color, x, y, left, right));
            }
        }
    }

    Ok(())
}

/// Checks that every depth value is within `DEPTH_TOLERANCE` of the expected one.
pub fn probe_depth(pixels: &Pixels<f32>, expected: f32) -> Result<(), ProbeFailure> {
    let tolerance = Tolerance::uniform(DEPTH_TOLERANCE);
    match pixels.iter().find(|(_, _, p)| !tolerance.equal(&[expected], p)) {
        Some((x, y, observed)) => {
            Err(float_failure(ProbeKind::Depth, x, y, &[expected], observed))
        },
        None => Ok(()),
    }
}

/// Checks that every pixel has exactly the expected integer values.
pub fn probe_rect_int(pixels: &Pixels<i64>, expected: &[i64]) -> Result<(), ProbeFailure> {
    probe_int(ProbeKind::Color, pixels, expected)
}

/// Checks that every stencil value is exactly the expected one.
pub fn probe_stencil(pixels: &Pixels<i64>, expected: i64) -> Result<(), ProbeFailure> {
    probe_int(ProbeKind::Stencil, pixels, &[expected])
}

fn probe_int(kind: ProbeKind, pixels: &Pixels<i64>, expected: &[i64])
             -> Result<(), ProbeFailure>
{
    let mismatch = pixels.iter().find(|(_, _, p)| {
        expected.iter().zip(p.iter()).any(|(e, o)| e != o)
    });

    match mismatch {
        Some((x, y, observed)) => Err(ProbeFailure {
            kind, x, y,
            expected: ints(expected),
            alternative: None,
            observed: ints(&observed[.. expected.len().min(observed.len())]),
        }),
        None => Ok(()),
    }
}

impl TestContext {
    /// Prints the failure, dumps the pixels if requested, and converts to a `bool`.
    fn report_probe(&self, outcome: Result<(), ProbeFailure>, pixels: Option<&Pixels<f32>>)
                       -> bool
    {
        match outcome {
            Ok(()) => true,
            Err(failure) => {
                println!("{}", failure);
                if let (Some(dir), Some(pixels)) = (dump_dir(), pixels) {
                    match dump_pixels(&dir, pixels) {
                        Ok(path) => log::info!("probed region written to {}", path.display()),
                        Err(err) => log::warn!("failed to dump the probed region: {}", err),
                    }
                }
                false
            },
        }
    }

    /// Probes a single pixel, ignoring alpha.
    pub fn probe_pixel_rgb(&self, x: i32, y: i32, expected: &[f32; 3]) -> bool {
        self.probe_rect_rgb(x, y, 1, 1, expected)
    }

    /// Probes a single pixel.
    pub fn probe_pixel_rgba(&self, x: i32, y: i32, expected: &[f32; 4]) -> bool {
        self.probe_rect_rgba(x, y, 1, 1, expected)
    }

    /// Probes a rectangle, ignoring alpha.
    pub fn probe_rect_rgb(&self, x: i32, y: i32, width: u32, height: u32,
                          expected: &[f32; 3]) -> bool
    {
        let pixels = self.read_pixels_rgba(x, y, width, height);
        let outcome = probe_rect(&pixels, expected, &self.tolerance);
        self.report_probe(outcome, Some(&pixels))
    }

    /// Probes a rectangle.
    pub fn probe_rect_rgba(&self, x: i32, y: i32, width: u32, height: u32,
                           expected: &[f32; 4]) -> bool
    {
        let pixels = self.read_pixels_rgba(x, y, width, height);
        let outcome = probe_rect(&pixels, expected, &self.tolerance);
        self.report_probe(outcome, Some(&pixels))
    }

    /// Probes a rectangle whose pixels may have either of two colors, ignoring alpha.
    pub fn probe_rect_two_rgb(&self, x: i32, y: i32, width: u32, height: u32,
                              expected: &[f32; 3], alternative: &[f32; 3]) -> bool
    {
        let pixels = self.read_pixels_rgba(x, y, width, height);
        let outcome = probe_rect_either(&pixels, expected, alternative, &self.tolerance);
        self.report_probe(outcome, Some(&pixels))
    }

    /// Checks that the right half of a rectangle is equal to its left half.
    pub fn probe_rect_halves_equal_rgba(&self, x: i32, y: i32, width: u32, height: u32) -> bool {
        let pixels = self.read_pixels_rgba(x, y, width, height);
        let outcome = compare_halves(&pixels, &self.tolerance);
        self.report_probe(outcome, Some(&pixels))
    }

    /// Checks a rectangle against an image, usually computed by `reference::Image`.
    pub fn probe_image_rgba(&self, x: i32, y: i32, width: u32, height: u32,
                            expected: &[[f32; 4]]) -> bool
    {
        let pixels = self.read_pixels_rgba(x, y, width, height);
        let outcome = probe_image(&pixels, expected, 4, &self.tolerance);
        self.report_probe(outcome, Some(&pixels))
    }

    /// Same as `probe_image_rgba`, ignoring alpha.
    pub fn probe_image_rgb(&self, x: i32, y: i32, width: u32, height: u32,
                           expected: &[[f32; 4]]) -> bool
    {
        let pixels = self.read_pixels_rgba(x, y, width, height);
        let outcome = probe_image(&pixels, expected, 3, &self.tolerance);
        self.report_probe(outcome, Some(&pixels))
    }

    /// Probes the depth of a single pixel.
    pub fn probe_pixel_depth(&self, x: i32, y: i32, expected: f32) -> bool {
        self.probe_rect_depth(x, y, 1, 1, expected)
    }

    /// Probes the depth of a rectangle.
    pub fn probe_rect_depth(&self, x: i32, y: i32, width: u32, height: u32, expected: f32)
                            -> bool
    {
        let pixels = self.read_depth(x, y, width, height);
        self.report_probe(probe_depth(&pixels, expected), None)
    }

    /// Probes the stencil values of a rectangle.
    pub fn probe_rect_stencil(&self, x: i32, y: i32, width: u32, height: u32, expected: u8)
                              -> bool
    {
        let pixels = self.read_stencil(x, y, width, height);
        self.report_probe(probe_stencil(&pixels, i64::from(expected)), None)
    }

    /// Probes a rectangle of a signed integer color buffer.
    pub fn probe_rect_rgba_int(&self, x: i32, y: i32, width: u32, height: u32,
                               expected: &[i32; 4]) -> bool
    {
        let pixels = self.read_pixels_rgba_int(x, y, width, height);
        let expected: SmallVec<[i64; 4]> = expected.iter().map(|&v| i64::from(v)).collect();
        self.report_probe(probe_rect_int(&pixels, &expected), None)
    }

    /// Probes a rectangle of an unsigned integer color buffer.
    pub fn probe_rect_rgba_uint(&self, x: i32, y: i32, width: u32, height: u32,
                                expected: &[u32; 4]) -> bool
    {
        let pixels = self.read_pixels_rgba_uint(x, y, width, height);
        let expected: SmallVec<[i64; 4]> = expected.iter().map(|&v| i64::from(v)).collect();
        self.report_probe(probe_rect_int(&pixels, &expected), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, color: [f32; 4]) -> Pixels<f32> {
        let data = (0 .. width * height).flat_map(|_| color).collect();
        Pixels::new(0, 0, width, height, 4, data)
    }

    #[test]
    fn tolerance_from_bits() {
        let tolerance = Tolerance::for_bits(8, 8, 8, 0);
        assert_eq!(tolerance.0[0], 3.0 / 256.0);
        assert_eq!(tolerance.0[3], 1.0);

        let tolerance = Tolerance::for_bits(5, 6, 5, 1);
        assert_eq!(tolerance.0[0], 3.0 / 32.0);
        assert_eq!(tolerance.0[1], 3.0 / 64.0);
        assert_eq!(tolerance.0[3], 1.0);
    }

    #[test]
    fn tolerance_is_inclusive() {
        let tolerance = Tolerance::uniform(0.25);
        assert!(tolerance.equal(&[0.5], &[0.75]));
        assert!(!tolerance.equal(&[0.5], &[0.76]));
        assert!(Tolerance::default().equal(&[1.0, 0.0, 0.0], &[0.995, 0.005, 0.0, 0.2]));
    }

    #[test]
    fn first_mismatch_is_reported() {
        let mut pixels = solid(4, 4, [0.0, 1.0, 0.0, 1.0]);
        let offset = (2 * 4 + 1) * 4;
        pixels.data[offset] = 1.0;
        pixels.data[offset + 4] = 1.0;
        pixels.x = 10;
        pixels.y = 20;

        let failure = probe_rect(&pixels, &[0.0, 1.0, 0.0], &Tolerance::default()).unwrap_err();
        assert_eq!((failure.x, failure.y), (11, 22));
        assert_eq!(failure.to_string(),
                   "Probe color at (11,22)\n  Expected: 0.000000 1.000000 0.000000\n  \
                    Observed: 1.000000 1.000000 0.000000");
    }

    #[test]
    fn either_color() {
        let mut pixels = solid(2, 1, [1.0, 0.0, 0.0, 1.0]);
        pixels.data[4 .. 8].copy_from_slice(&[0.0, 0.0, 1.0, 1.0]);

        let tolerance = Tolerance::default();
        assert!(probe_rect_either(&pixels, &[1.0, 0.0, 0.0], &[0.0, 0.0, 1.0], &tolerance).is_ok());

        let failure = probe_rect_either(&pixels, &[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0], &tolerance)
            .unwrap_err();
        assert_eq!(failure.x, 1);
        assert!(failure.to_string().contains("or: 0.000000 1.000000 0.000000"));
    }

    #[test]
    fn halves() {
        let mut pixels = solid(4, 2, [0.5, 0.5, 0.5, 1.0]);
        assert!(compare_halves(&pixels, &Tolerance::default()).is_ok());

        // pixel (3, 1)
        pixels.data[(4 + 3) * 4] = 0.0;
        let failure = compare_halves(&pixels, &Tolerance::default()).unwrap_err();
        assert_eq!((failure.x, failure.y), (3, 1));
    }

    #[test]
    fn image_probe() {
        let pixels = Pixels::new(0, 0, 2, 1, 4, vec![1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0]);
        let expected = [[1.0, 0.0, 0.0, 1.0], [0.0, 1.0, 0.0, 1.0]];

        assert!(probe_image(&pixels, &expected, 3, &Tolerance::default()).is_ok());
        let failure = probe_image(&pixels, &expected, 4, &Tolerance::default()).unwrap_err();
        assert_eq!((failure.x, failure.y), (0, 0));
    }

    #[test]
    fn depth_and_stencil() {
        let depth = Pixels::new(5, 5, 2, 1, 1, vec![0.5, 0.512]);
        assert!(probe_depth(&depth, 0.505).is_ok());
        let failure = probe_depth(&depth, 0.5).unwrap_err();
        assert_eq!(failure.kind, ProbeKind::Depth);
        assert_eq!(failure.x, 6);

        let stencil = Pixels::new(0, 0, 2, 1, 1, vec![3, 4]);
        let failure = probe_stencil(&stencil, 3).unwrap_err();
        assert_eq!(failure.to_string(), "Probe stencil at (1,0)\n  Expected: 3\n  Observed: 4");
    }

    #[test]
    fn integer_colors_are_exact() {
        let pixels = Pixels::new(0, 0, 1, 1, 4, vec![1, -2, 3, 4]);
        assert!(probe_rect_int(&pixels, &[1, -2, 3, 4]).is_ok());
        assert!(probe_rect_int(&pixels, &[1, -2, 3, 5]).is_err());
    }
}
