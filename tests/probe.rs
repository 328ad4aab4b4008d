use piglit::ops::Pixels;
use piglit::probe::{
    compare_halves, probe_depth, probe_image, probe_rect, probe_rect_either, probe_stencil,
    ProbeKind, Tolerance,
};
use piglit::reference::Image;

/// Pixels as they would be read back from an `Image` drawn at `(x, y)`.
fn read_back(image: &Image, x: i32, y: i32) -> Pixels<f32> {
    let data = image.texels.iter().flatten().copied().collect();
    Pixels::new(x, y, image.width, image.height, 4, data)
}

#[test]
fn tolerance_from_framebuffer_bits() {
    // 8 bits per channel gives 3/256
    let rgba8 = Tolerance::for_bits(8, 8, 8, 8);
    assert_eq!(rgba8, Tolerance::uniform(3.0 / 256.0));

    // a missing alpha channel matches anything
    let rgb565 = Tolerance::for_bits(5, 6, 5, 0);
    assert_eq!(rgb565.0, [3.0 / 32.0, 3.0 / 64.0, 3.0 / 32.0, 1.0]);
    assert!(rgb565.equal(&[0.0, 0.0, 0.0, 0.0], &[0.05, 0.0, 0.09, 1.0]));
}

#[test]
fn failure_reports_first_mismatch_in_window_coordinates() {
    let mut image = Image::solid(4, 4, [0.0, 1.0, 0.0, 1.0]);
    image.texels[6] = [1.0, 0.0, 0.0, 1.0];
    let pixels = read_back(&image, 10, 20);

    let failure = probe_rect(&pixels, &[0.0, 1.0, 0.0], &Tolerance::default()).unwrap_err();
    assert_eq!(failure.kind, ProbeKind::Color);
    assert_eq!((failure.x, failure.y), (12, 21));
    assert_eq!(failure.to_string(),
               "Probe color at (12,21)\n  Expected: 0.000000 1.000000 0.000000\n  \
                Observed: 1.000000 0.000000 0.000000");
}

#[test]
fn either_of_two_colors() {
    let image = Image::checkerboard(4, 4, 1, 1, [1.0, 0.0, 0.0, 1.0], [0.0, 0.0, 1.0, 1.0]);
    let pixels = read_back(&image, 0, 0);
    let tolerance = Tolerance::default();

    assert!(probe_rect_either(&pixels, &[1.0, 0.0, 0.0], &[0.0, 0.0, 1.0], &tolerance).is_ok());

    let failure = probe_rect_either(&pixels, &[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0], &tolerance)
        .unwrap_err();
    assert!(failure.to_string().contains("        or: 0.000000 1.000000 0.000000"));
}

#[test]
fn image_and_halves() {
    let image = Image::rgbw(8, 8, true);
    let pixels = read_back(&image, 0, 0);
    let tolerance = Tolerance::default();

    assert!(probe_image(&pixels, &image.texels, 4, &tolerance).is_ok());
    assert!(compare_halves(&pixels, &tolerance).is_err());

    let stripes = Image::checkerboard(8, 2, 4, 8, [0.2; 4], [0.7; 4]);
    assert!(compare_halves(&read_back(&stripes, 0, 0), &tolerance).is_err());
    let repeated = Image::checkerboard(8, 2, 2, 8, [0.2; 4], [0.7; 4]);
    assert!(compare_halves(&read_back(&repeated, 0, 0), &tolerance).is_ok());
}

#[test]
fn depth_and_stencil() {
    let depth = Pixels::new(0, 0, 2, 1, 1, vec![0.5, 0.505]);
    assert!(probe_depth(&depth, 0.5).is_ok());
    assert_eq!(probe_depth(&depth, 0.52).unwrap_err().kind, ProbeKind::Depth);

    let stencil = Pixels::new(3, 3, 2, 2, 1, vec![1, 1, 1, 2]);
    let failure = probe_stencil(&stencil, 1).unwrap_err();
    assert_eq!((failure.kind, failure.x, failure.y), (ProbeKind::Stencil, 4, 4));
}
