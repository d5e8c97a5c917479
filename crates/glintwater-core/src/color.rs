//! Color space conversions.
//!
//! All shading happens on linear radiance. Hex colors in configuration are
//! sRGB-encoded and converted once at construction.

use glam::Vec3;

/// Rec. 709 luma coefficients, applied to linear RGB.
pub const LUMA_COEFFICIENTS: Vec3 = Vec3::new(0.2126, 0.7152, 0.0722);

/// Decodes one sRGB-encoded channel to linear.
#[must_use]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c < 0.04045 {
        c * 0.077_399_38
    } else {
        (c * 0.947_867_3 + 0.052_132_7).powf(2.4)
    }
}

/// Encodes one linear channel with the sRGB transfer function.
#[must_use]
pub fn linear_to_srgb(c: f32) -> f32 {
    if c < 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(0.416_666_66) - 0.055
    }
}

/// Applies [`srgb_to_linear`] to each channel.
#[must_use]
pub fn srgb_to_linear_vec(c: Vec3) -> Vec3 {
    Vec3::new(srgb_to_linear(c.x), srgb_to_linear(c.y), srgb_to_linear(c.z))
}

/// Applies [`linear_to_srgb`] to each channel.
#[must_use]
pub fn linear_to_srgb_vec(c: Vec3) -> Vec3 {
    Vec3::new(linear_to_srgb(c.x), linear_to_srgb(c.y), linear_to_srgb(c.z))
}

/// Splits a `0xRRGGBB` value into normalized channels without decoding.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn hex_to_rgb(hex: u32) -> Vec3 {
    let r = (hex >> 16) & 0xff;
    let g = (hex >> 8) & 0xff;
    let b = hex & 0xff;
    Vec3::new(r as f32, g as f32, b as f32) / 255.0
}

/// Converts an sRGB `0xRRGGBB` value to linear RGB.
#[must_use]
pub fn hex_to_linear(hex: u32) -> Vec3 {
    srgb_to_linear_vec(hex_to_rgb(hex))
}

/// Relative luminance of a linear color.
#[must_use]
pub fn luminance(c: Vec3) -> f32 {
    c.dot(LUMA_COEFFICIENTS)
}

/// Quantizes a [0, 1] channel to 8 bits, rounding to nearest.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn quantize_unorm8(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}
