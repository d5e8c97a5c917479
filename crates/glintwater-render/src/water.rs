//! Water surface shading.
//!
//! Per fragment, the shader:
//! 1. samples the normal field twice with scroll offsets `(u + time, v)` and
//!    `(-u, v + time)`
//! 2. averages the two tangent perturbations, scales them by the distortion
//!    scale and tilts the flat plane normal by the result
//! 3. samples the reflection buffer at the fragment's projected position,
//!    shifted by the shading normal's horizontal components
//! 4. approximates refraction by the water color scattered toward the eye,
//!    plus a weak diffuse sun term
//! 5. blends refraction and reflection by a Schlick Fresnel term
//! 6. adds a sun highlight on top
//!
//! The result is linear radiance. Tone mapping and encoding belong to the
//! render path that consumes it.

use glam::{Vec2, Vec3};
use glintwater_core::color::hex_to_linear;
use glintwater_core::WaterConfig;

use crate::normal_field::NormalField;
use crate::reflection_capture::ReflectionBuffer;
use crate::scene::SunLight;

/// Exponent of the specular highlight.
pub const SHININESS: f32 = 100.0;
/// Peak specular multiplier.
pub const SPECULAR_STRENGTH: f32 = 2.0;
/// Sun diffuse factor.
pub const SUN_DIFFUSE: f32 = 0.5;
/// Weight of the diffuse sun term inside the refraction color.
pub const DIFFUSE_WEIGHT: f32 = 0.3;
/// Fresnel reflectance at normal incidence.
pub const FRESNEL_RF0: f32 = 0.3;
/// Elapsed seconds are scaled by this before reaching the shader.
pub const TIME_SCALE: f64 = 0.5;
/// Period of the shader time; the normal field tiles with period 1 in UV.
pub const TIME_PERIOD: f64 = 1.0;

/// Mirror reflection of incident vector `i` about unit normal `n`.
#[must_use]
pub fn reflect(i: Vec3, n: Vec3) -> Vec3 {
    i - 2.0 * n.dot(i) * n
}

/// Schlick's approximation, `rf0 + (1 - rf0)(1 - cos)^5`.
///
/// Non-increasing in `cos_theta`, so reflection never loses weight as the
/// view approaches grazing incidence.
#[must_use]
pub fn fresnel_schlick(cos_theta: f32, rf0: f32) -> f32 {
    rf0 + (1.0 - rf0) * (1.0 - cos_theta.clamp(0.0, 1.0)).powi(5)
}

/// Shading parameters in linear color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterParams {
    pub distortion_scale: f32,
    pub water_color: Vec3,
    pub sun_color: Vec3,
    pub normal_tile_size: f32,
}

impl From<&WaterConfig> for WaterParams {
    fn from(config: &WaterConfig) -> Self {
        Self {
            distortion_scale: config.distortion_scale,
            water_color: hex_to_linear(config.water_color),
            sun_color: hex_to_linear(config.sun_color),
            normal_tile_size: config.normal_tile_size,
        }
    }
}

/// Inputs of one water fragment besides the surface's own state.
#[derive(Clone, Copy)]
pub struct WaterFragmentInput<'a> {
    pub world_position: Vec3,
    /// Camera position.
    pub eye: Vec3,
    /// Only the direction is used; highlight color comes from the water's sun color.
    pub sun: Option<&'a SunLight>,
    pub reflection: &'a ReflectionBuffer,
}

/// Every intermediate term of a shaded water fragment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterFragment {
    pub normal: Vec3,
    pub perturbation: Vec2,
    pub view_direction: Vec3,
    /// Raw (distorted) reflection buffer sample.
    pub reflection: Vec3,
    pub refraction: Vec3,
    pub fresnel: f32,
    /// Fresnel blend of refraction and reflection, before the highlight.
    pub base: Vec3,
    pub specular: Vec3,
    /// `base + specular`, linear.
    pub radiance: Vec3,
}

/// The water plane's shader state.
///
/// Owns its parameters, normal field and time exclusively; the frame driver
/// only calls [`WaterSurface::advance`].
#[derive(Debug, Clone, PartialEq)]
pub struct WaterSurface {
    params: WaterParams,
    normals: NormalField,
    elapsed: f64,
}

impl WaterSurface {
    pub fn new(config: &WaterConfig, normals: NormalField) -> Self {
        Self {
            params: WaterParams::from(config),
            normals,
            elapsed: 0.0,
        }
    }

    pub fn params(&self) -> &WaterParams {
        &self.params
    }

    pub fn normals(&self) -> &NormalField {
        &self.normals
    }

    /// Advances the time uniform by `delta * 0.5`.
    ///
    /// Negative or non-finite deltas are ignored so time never runs backwards.
    pub fn advance(&mut self, delta: f32) {
        if delta.is_finite() && delta > 0.0 {
            self.elapsed += f64::from(delta) * TIME_SCALE;
        }
    }

    /// Unbounded accumulated shader time.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Replays a previously observed time.
    pub fn set_elapsed(&mut self, elapsed: f64) {
        self.elapsed = elapsed.max(0.0);
    }

    /// Shader time, wrapped into `[0, 1)`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn time(&self) -> f32 {
        self.elapsed.rem_euclid(TIME_PERIOD) as f32
    }

    /// Averaged tangent perturbation of the two scrolled normal samples.
    pub fn perturbation(&self, world_position: Vec3) -> Vec2 {
        let uv = Vec2::new(world_position.x, world_position.z) / self.params.normal_tile_size;
        let t = self.time();
        let a = self.normals.sample(Vec2::new(uv.x + t, uv.y));
        let b = self.normals.sample(Vec2::new(-uv.x, uv.y + t));
        (a.truncate() + b.truncate()) * 0.5
    }

    /// Flat plane normal tilted by the scaled perturbation.
    pub fn shading_normal(&self, world_position: Vec3) -> Vec3 {
        self.normal_from_perturbation(self.perturbation(world_position))
    }

    fn normal_from_perturbation(&self, p: Vec2) -> Vec3 {
        let tilt = Vec3::new(p.x, 0.0, p.y) * self.params.distortion_scale;
        (Vec3::Y + tilt).normalize()
    }

    /// Shades one fragment. Pure in its inputs and the current time.
    pub fn shade(&self, input: &WaterFragmentInput<'_>) -> WaterFragment {
        let p = input.world_position;
        let perturbation = self.perturbation(p);
        let normal = self.normal_from_perturbation(perturbation);

        let to_eye = input.eye - p;
        let distance = to_eye.length();
        let view_direction = if distance > 0.0 {
            to_eye / distance
        } else {
            Vec3::Y
        };

        let distortion = Vec2::new(normal.x, normal.z)
            * (0.001 + 1.0 / distance.max(1e-3))
            * self.params.distortion_scale;
        let uv = input.reflection.project(p) + distortion;
        let reflection = input.reflection.sample(uv);

        let cos_theta = view_direction.dot(normal).max(0.0);
        let fresnel = fresnel_schlick(cos_theta, FRESNEL_RF0);

        let (diffuse, specular) = match input.sun {
            Some(sun) => {
                let reflected_view = reflect(-view_direction, normal);
                let alignment = reflected_view.dot(sun.direction).max(0.0);
                (
                    self.params.sun_color * normal.dot(sun.direction).max(0.0) * SUN_DIFFUSE,
                    self.params.sun_color * SPECULAR_STRENGTH * alignment.powf(SHININESS),
                )
            }
            None => (Vec3::ZERO, Vec3::ZERO),
        };

        let scatter = self.params.water_color * cos_theta;
        let refraction = diffuse * DIFFUSE_WEIGHT + scatter;
        let reflected = Vec3::splat(0.1) + reflection * 0.9;
        let base = refraction.lerp(reflected, fresnel);

        WaterFragment {
            normal,
            perturbation,
            view_direction,
            reflection,
            refraction,
            fresnel,
            base,
            specular,
            radiance: base + specular,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::HdrImage;
    use glam::Mat4;
    use proptest::prelude::*;

    fn surface(distortion_scale: f32) -> WaterSurface {
        let config = WaterConfig::new().with_distortion_scale(distortion_scale);
        WaterSurface::new(&config, NormalField::procedural(32, 0.3).unwrap())
    }

    fn grey_reflection(level: f32) -> ReflectionBuffer {
        let mut image = HdrImage::new(4, 4).unwrap();
        image.fill(Vec3::splat(level));
        ReflectionBuffer::from_parts(image, Mat4::IDENTITY)
    }

    #[test]
    fn test_advance_scales_delta() {
        let mut water = surface(2.0);
        water.advance(1.0);
        assert_eq!(water.elapsed(), 0.5);
        assert_eq!(water.time(), 0.5);
        water.advance(1.0);
        assert_eq!(water.elapsed(), 1.0);
        assert_eq!(water.time(), 0.0);
    }

    #[test]
    fn test_advance_ignores_bad_deltas() {
        let mut water = surface(2.0);
        water.advance(-1.0);
        water.advance(f32::NAN);
        water.advance(f32::INFINITY);
        assert_eq!(water.elapsed(), 0.0);
    }

    #[test]
    fn test_time_wraps_after_long_runs() {
        let mut water = surface(2.0);
        water.set_elapsed(1.0e9 + 0.25);
        assert!((water.time() - 0.25).abs() < 1e-3);
    }

    #[test]
    fn test_time_period_is_invisible_to_shading() {
        let mut a = surface(2.0);
        let mut b = surface(2.0);
        a.set_elapsed(0.375);
        b.set_elapsed(3.375);
        let p = Vec3::new(3.0, -1.0, -7.0);
        assert_eq!(a.shading_normal(p), b.shading_normal(p));
    }

    #[test]
    fn test_flat_field_gives_plane_normal() {
        let water = WaterSurface::new(&WaterConfig::default(), NormalField::flat());
        assert_eq!(water.shading_normal(Vec3::new(12.0, -1.0, 4.0)), Vec3::Y);
    }

    #[test]
    fn test_scrolling_changes_normals() {
        let mut water = surface(2.0);
        let p = Vec3::new(1.0, -1.0, -3.0);
        let before = water.shading_normal(p);
        water.advance(0.3);
        assert_ne!(before, water.shading_normal(p));
    }

    #[test]
    fn test_fresnel_endpoints() {
        assert!((fresnel_schlick(1.0, FRESNEL_RF0) - FRESNEL_RF0).abs() < 1e-6);
        assert!((fresnel_schlick(0.0, FRESNEL_RF0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_mirror_highlight_at_reflection_point() {
        // Flat water: the reflected view ray points exactly at the sun
        let water = surface(0.0);
        let sun = SunLight::new(Vec3::new(0.0, 1.0, -1.0), Vec3::ONE);
        let eye = Vec3::new(0.0, 2.0, 0.0);
        let p = Vec3::new(0.0, -1.0, -3.0);
        let reflection = grey_reflection(0.3);
        let frag = water.shade(&WaterFragmentInput {
            world_position: p,
            eye,
            sun: Some(&sun),
            reflection: &reflection,
        });
        assert_eq!(frag.normal, Vec3::Y);
        assert!((frag.specular.x - SPECULAR_STRENGTH).abs() < 1e-3);
        assert!(frag.radiance.x > 3.0 * frag.base.x);
        assert_eq!(frag.radiance, frag.base + frag.specular);
    }

    #[test]
    fn test_no_sun_means_no_highlight() {
        let water = surface(2.0);
        let reflection = grey_reflection(0.5);
        let frag = water.shade(&WaterFragmentInput {
            world_position: Vec3::new(0.0, -1.0, -5.0),
            eye: Vec3::ZERO,
            sun: None,
            reflection: &reflection,
        });
        assert_eq!(frag.specular, Vec3::ZERO);
        assert_eq!(frag.radiance, frag.base);
    }

    #[test]
    fn test_grazing_view_is_mostly_reflection() {
        let water = surface(0.0);
        let reflection = grey_reflection(0.5);
        let frag = water.shade(&WaterFragmentInput {
            world_position: Vec3::new(0.0, -1.0, -500.0),
            eye: Vec3::ZERO,
            sun: None,
            reflection: &reflection,
        });
        assert!(frag.fresnel > 0.95);
        let reflected = 0.1 + 0.5 * 0.9;
        assert!((frag.base.y - reflected).abs() < 0.03);
    }

    proptest! {
        #[test]
        fn zero_distortion_keeps_plane_normal(
            x in -500.0f32..500.0,
            z in -500.0f32..500.0,
            elapsed in 0.0f64..1.0e6,
        ) {
            let mut water = surface(0.0);
            water.set_elapsed(elapsed);
            prop_assert_eq!(water.shading_normal(Vec3::new(x, -1.0, z)), Vec3::Y);
        }

        #[test]
        fn fresnel_is_monotonic_toward_grazing(a in 0.0f32..=1.0, b in 0.0f32..=1.0) {
            // Smaller cosine = closer to grazing = at least as much reflection
            let (grazing, steep) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(fresnel_schlick(grazing, FRESNEL_RF0) >= fresnel_schlick(steep, FRESNEL_RF0));
        }

        #[test]
        fn shading_is_deterministic(
            x in -50.0f32..50.0,
            z in -50.0f32..-1.0,
            elapsed in 0.0f64..100.0,
        ) {
            let mut water = surface(2.0);
            water.set_elapsed(elapsed);
            let sun = SunLight::new(Vec3::new(0.2, 0.6, -1.0), Vec3::ONE);
            let reflection = grey_reflection(0.4);
            let input = WaterFragmentInput {
                world_position: Vec3::new(x, -1.0, z),
                eye: Vec3::new(0.0, 1.0, 0.0),
                sun: Some(&sun),
                reflection: &reflection,
            };
            let first = water.shade(&input);
            let second = water.shade(&input);
            prop_assert_eq!(first, second);
            prop_assert!(first.radiance.min_element() >= 0.0);
        }
    }
}
