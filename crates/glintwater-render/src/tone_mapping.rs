//! Tone mapping and output encoding.

use glam::{Mat3, Vec3};
use glintwater_core::color::linear_to_srgb_vec;
use glintwater_core::{OutputEncoding, ToneMappingConfig, ToneMappingOperator};

const ACES_INPUT: Mat3 = Mat3::from_cols_array(&[
    0.59719, 0.07600, 0.02840, //
    0.35458, 0.90834, 0.13383, //
    0.04823, 0.01566, 0.83777,
]);

const ACES_OUTPUT: Mat3 = Mat3::from_cols_array(&[
    1.60475, -0.10208, -0.00327, //
    -0.53108, 1.10813, -0.07276, //
    -0.07367, -0.00605, 1.07602,
]);

fn rrt_and_odt_fit(v: Vec3) -> Vec3 {
    let a = v * (v + 0.024_578_6) - 0.000_090_537;
    let b = v * (0.983_729 * v + 0.432_951) + 0.238_081;
    a / b
}

/// Fitted ACES filmic curve (RRT + ODT), including the `exposure / 0.6` input scale.
pub fn aces_filmic(color: Vec3, exposure: f32) -> Vec3 {
    let color = ACES_INPUT * (color * exposure / 0.6);
    let color = ACES_OUTPUT * rrt_and_odt_fit(color);
    color.clamp(Vec3::ZERO, Vec3::ONE)
}

/// Applies the configured operator. Output is display-referred in `[0, 1]`,
/// except for `None`, which passes radiance through untouched.
pub fn tone_map(color: Vec3, config: &ToneMappingConfig) -> Vec3 {
    match config.operator {
        ToneMappingOperator::None => color,
        ToneMappingOperator::Linear => (color * config.exposure).clamp(Vec3::ZERO, Vec3::ONE),
        ToneMappingOperator::Reinhard => {
            let c = color * config.exposure;
            (c / (Vec3::ONE + c)).clamp(Vec3::ZERO, Vec3::ONE)
        }
        ToneMappingOperator::AcesFilmic => aces_filmic(color, config.exposure),
    }
}

/// Clamps to `[0, 1]` and applies the output transfer function.
pub fn encode(color: Vec3, encoding: OutputEncoding) -> Vec3 {
    let color = color.clamp(Vec3::ZERO, Vec3::ONE);
    match encoding {
        OutputEncoding::Linear => color,
        OutputEncoding::Srgb => linear_to_srgb_vec(color),
    }
}

/// The final display transform: tone map, then encode.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ToneMapPass {
    config: ToneMappingConfig,
}

impl ToneMapPass {
    pub fn new(config: ToneMappingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ToneMappingConfig {
        &self.config
    }

    /// Linear radiance to an encoded display value in `[0, 1]`.
    pub fn apply(&self, radiance: Vec3) -> Vec3 {
        encode(tone_map(radiance, &self.config), self.config.encoding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_aces_black_and_white_points() {
        assert_eq!(aces_filmic(Vec3::ZERO, 1.0), Vec3::ZERO);
        assert_eq!(aces_filmic(Vec3::splat(1000.0), 1.0), Vec3::ONE);
    }

    #[test]
    fn test_aces_mid_grey() {
        let grey = aces_filmic(Vec3::splat(0.18), 1.0);
        assert!((grey.x - 0.2).abs() < 0.05);
        assert!((grey.x - grey.y).abs() < 0.01);
    }

    #[test]
    fn test_aces_compresses_highlights() {
        let one = aces_filmic(Vec3::ONE, 1.0).x;
        let two = aces_filmic(Vec3::splat(2.0), 1.0).x;
        assert!(one < 1.0);
        assert!(two > one);
        // Doubling radiance gains far less than double on screen
        assert!(two - one < one);
    }

    #[test]
    fn test_none_passes_through() {
        let config = ToneMappingConfig::new().with_operator(ToneMappingOperator::None);
        assert_eq!(tone_map(Vec3::splat(3.0), &config), Vec3::splat(3.0));
    }

    #[test]
    fn test_reinhard() {
        let config = ToneMappingConfig::new().with_operator(ToneMappingOperator::Reinhard);
        assert_eq!(tone_map(Vec3::ONE, &config), Vec3::splat(0.5));
    }

    #[test]
    fn test_linear_exposure() {
        let config = ToneMappingConfig::new()
            .with_operator(ToneMappingOperator::Linear)
            .with_exposure(2.0);
        assert_eq!(tone_map(Vec3::splat(0.25), &config), Vec3::splat(0.5));
        assert_eq!(tone_map(Vec3::splat(0.75), &config), Vec3::ONE);
    }

    #[test]
    fn test_encode_clamps() {
        assert_eq!(
            encode(Vec3::new(-1.0, 0.5, 2.0), OutputEncoding::Linear),
            Vec3::new(0.0, 0.5, 1.0)
        );
        let srgb = encode(Vec3::splat(0.5), OutputEncoding::Srgb);
        assert!(srgb.x > 0.7 && srgb.x < 0.75);
    }

    #[test]
    fn test_pass_is_tone_map_then_encode() {
        let pass = ToneMapPass::default();
        let radiance = Vec3::new(0.4, 1.5, 3.0);
        let expected = linear_to_srgb_vec(aces_filmic(radiance, 1.0));
        assert_eq!(pass.apply(radiance), expected);
    }

    proptest! {
        #[test]
        fn aces_is_monotonic_on_grey(a in 0.0f32..50.0, b in 0.0f32..50.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(aces_filmic(Vec3::splat(lo), 1.0).x <= aces_filmic(Vec3::splat(hi), 1.0).x + 1e-6);
        }

        #[test]
        fn display_values_are_in_range(r in 0.0f32..100.0, g in 0.0f32..100.0, b in 0.0f32..100.0) {
            let out = ToneMapPass::default().apply(Vec3::new(r, g, b));
            prop_assert!(out.min_element() >= 0.0 && out.max_element() <= 1.0);
        }
    }
}
