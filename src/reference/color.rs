//! Color space and precision conversions.

/// Converts a linear value to sRGB, as defined by IEC 61966-2-1.
pub fn linear_to_srgb(value: f32) -> f32 {
    if value <= 0.0 {
        0.0
    } else if value < 0.003_130_8 {
        value * 12.92
    } else if value < 1.0 {
        1.055 * value.powf(1.0 / 2.4) - 0.055
    } else {
        1.0
    }
}

/// Converts an sRGB value to linear, as defined by IEC 61966-2-1.
pub fn srgb_to_linear(value: f32) -> f32 {
    if value <= 0.0 {
        0.0
    } else if value <= 0.040_45 {
        value / 12.92
    } else if value < 1.0 {
        ((value + 0.055) / 1.055).powf(2.4)
    } else {
        1.0
    }
}

/// Rounds a normalized value to what a `bits`-bit unsigned normalized channel stores.
pub fn quantize_unorm(value: f32, bits: u8) -> f32 {
    if bits == 0 {
        return value;
    }

    let max = ((1u64 << bits.min(32)) - 1) as f64;
    let clamped = (value as f64).max(0.0).min(1.0);
    ((clamped * max).round() / max) as f32
}

/// Applies `quantize_unorm` to each channel with its own number of bits.
pub fn quantize_color(color: [f32; 4], bits: [u8; 4]) -> [f32; 4] {
    let mut result = color;
    for (value, bits) in result.iter_mut().zip(bits) {
        *value = quantize_unorm(*value, bits);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::{linear_to_srgb, quantize_color, quantize_unorm, srgb_to_linear};

    #[test]
    fn srgb_round_trip_points() {
        assert_eq!(linear_to_srgb(0.0), 0.0);
        assert_eq!(linear_to_srgb(1.0), 1.0);
        assert!((linear_to_srgb(0.5) - 0.735_356_7).abs() < 1e-5);
        assert!((srgb_to_linear(0.5) - 0.214_041_1).abs() < 1e-5);
        assert!((srgb_to_linear(0.02) - 0.02 / 12.92).abs() < 1e-7);
        assert!((srgb_to_linear(linear_to_srgb(0.3)) - 0.3).abs() < 1e-5);
    }

    #[test]
    fn quantization() {
        assert_eq!(quantize_unorm(0.5, 1), 1.0);
        assert_eq!(quantize_unorm(0.3, 2), 1.0 / 3.0);
        assert_eq!(quantize_unorm(1.2, 8), 1.0);
        assert_eq!(quantize_unorm(0.3, 0), 0.3);
        assert!((quantize_unorm(0.5, 8) - 128.0 / 255.0).abs() < 1e-7);
        assert_eq!(quantize_color([0.5, 0.5, 0.5, 0.5], [1, 1, 1, 0]), [1.0, 1.0, 1.0, 0.5]);
    }
}
