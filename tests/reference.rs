use piglit::reference::{
    linear_to_srgb, mipmap_levels, quantize_color, srgb_to_linear, Blend, BlendingFunction,
    Image, LinearBlendingFactor,
};

fn assert_close(a: [f32; 4], b: [f32; 4]) {
    for (x, y) in a.iter().zip(b.iter()) {
        assert!((x - y).abs() < 1e-5, "{:?} != {:?}", a, b);
    }
}

#[test]
fn rgbw_mipmap_chain_keeps_quadrants() {
    let levels = Image::rgbw(16, 16, false).mipmap_chain();
    assert_eq!(levels.len() as u32, mipmap_levels(16, 16));

    // down to 2x2 each quadrant stays a pure color
    let two = &levels[3];
    assert_eq!((two.width, two.height), (2, 2));
    assert_eq!(two.get(0, 0), [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(two.get(1, 0), [0.0, 1.0, 0.0, 1.0]);
    assert_eq!(two.get(0, 1), [0.0, 0.0, 1.0, 1.0]);
    assert_eq!(two.get(1, 1), [1.0, 1.0, 1.0, 1.0]);

    // the last level is the average of the four
    let one = levels.last().unwrap();
    assert_eq!((one.width, one.height), (1, 1));
    assert_close(one.get(0, 0), [0.5, 0.5, 0.5, 1.0]);
}

#[test]
fn non_square_chain() {
    let levels = Image::solid(8, 2, [0.25; 4]).mipmap_chain();
    let sizes: Vec<(u32, u32)> = levels.iter().map(|l| (l.width, l.height)).collect();
    assert_eq!(sizes, vec![(8, 2), (4, 1), (2, 1), (1, 1)]);
    assert!(levels.iter().all(|l| l.texels.iter().all(|t| *t == [0.25; 4])));
}

#[test]
fn blend_equations_match_gl_formulas() {
    let src = [0.8, 0.4, 0.2, 0.6];
    let dst = [0.3, 0.6, 0.9, 0.4];
    let pair = (LinearBlendingFactor::One, LinearBlendingFactor::One);

    let with = |color: BlendingFunction| Blend { color, alpha: color, .. Blend::default() };

    let add = with(BlendingFunction::Addition { source: pair.0, destination: pair.1 });
    assert_close(add.apply(src, dst), [1.0, 1.0, 1.0, 1.0]);

    let sub = with(BlendingFunction::Subtraction { source: pair.0, destination: pair.1 });
    assert_close(sub.apply(src, dst), [0.5, 0.0, 0.0, 0.2]);

    let rsub = with(BlendingFunction::ReverseSubtraction { source: pair.0, destination: pair.1 });
    assert_close(rsub.apply(src, dst), [0.0, 0.2, 0.7, 0.0]);

    assert_close(with(BlendingFunction::Min).apply(src, dst), [0.3, 0.4, 0.2, 0.4]);
    assert_close(with(BlendingFunction::Max).apply(src, dst), [0.8, 0.6, 0.9, 0.6]);
}

#[test]
fn constant_and_saturate_factors() {
    let src = [0.5, 0.5, 0.5, 0.75];
    let dst = [0.2, 0.2, 0.2, 0.5];

    let blend = Blend {
        color: BlendingFunction::Addition {
            source: LinearBlendingFactor::SourceAlphaSaturate,
            destination: LinearBlendingFactor::ConstantColor,
        },
        alpha: BlendingFunction::Addition {
            source: LinearBlendingFactor::SourceAlphaSaturate,
            destination: LinearBlendingFactor::Zero,
        },
        constant_value: (0.5, 1.0, 0.0, 1.0),
    };

    // saturate is min(0.75, 1 - 0.5) for colors and 1 for alpha
    assert_close(blend.apply(src, dst), [0.35, 0.45, 0.25, 0.75]);
}

#[test]
fn srgb_conversions() {
    for value in [0.0, 0.001, 0.02, 0.5, 0.8, 1.0] {
        assert!((srgb_to_linear(linear_to_srgb(value)) - value).abs() < 1e-4);
    }
    assert!((linear_to_srgb(0.5) - 0.7354).abs() < 1e-3);
}

#[test]
fn quantization_follows_bits() {
    let color = quantize_color([0.5, 0.5, 0.5, 0.5], [5, 6, 5, 0]);
    assert_close(color, [16.0 / 31.0, 32.0 / 63.0, 16.0 / 31.0, 0.5]);
}
