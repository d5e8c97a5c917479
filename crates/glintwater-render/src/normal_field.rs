//! Tileable normal distortion field sampled by the water shader.

use std::f32::consts::TAU;
use std::path::Path;

use glam::{Vec2, Vec3};
use glintwater_core::{check_dimensions, GlintwaterError, Result};

use crate::image::{sample_bilinear, AddressMode};

/// Tangent-space normals, wrap-sampled in both axes.
///
/// `x` and `y` are the tangent components, `z` points away from the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalField {
    width: u32,
    height: u32,
    normals: Vec<Vec3>,
}

impl NormalField {
    /// A field of straight-up normals; the water becomes an undistorted mirror.
    pub fn flat() -> Self {
        Self {
            width: 1,
            height: 1,
            normals: vec![Vec3::Z],
        }
    }

    /// Smooth, seamlessly tiling waves built from integer-frequency sines.
    ///
    /// `amplitude` bounds each tangent component.
    #[allow(clippy::cast_precision_loss)]
    pub fn procedural(size: u32, amplitude: f32) -> Result<Self> {
        check_dimensions(size, size)?;
        let mut normals = Vec::with_capacity((size as usize) * (size as usize));
        for y in 0..size {
            for x in 0..size {
                let u = (x as f32 + 0.5) / size as f32;
                let v = (y as f32 + 0.5) / size as f32;
                let nx = 0.6 * (TAU * (2.0 * u + v)).sin() + 0.4 * (TAU * (3.0 * v - u) + 1.3).sin();
                let ny = 0.6 * (TAU * (u - 2.0 * v)).cos() + 0.4 * (TAU * (3.0 * u + v) + 0.7).sin();
                let t = Vec2::new(nx, ny) * amplitude;
                let z = (1.0 - t.length_squared()).max(0.0).sqrt();
                normals.push(t.extend(z));
            }
        }
        Ok(Self {
            width: size,
            height: size,
            normals,
        })
    }

    /// Decodes an RGB normal map (`rgb * 2 - 1`).
    pub fn from_image(image: &image::RgbImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        check_dimensions(width, height)?;
        let normals = image
            .pixels()
            .map(|p| {
                Vec3::new(
                    f32::from(p[0]) / 255.0,
                    f32::from(p[1]) / 255.0,
                    f32::from(p[2]) / 255.0,
                ) * 2.0
                    - Vec3::ONE
            })
            .collect();
        Ok(Self {
            width,
            height,
            normals,
        })
    }

    /// Loads a normal map from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|e| GlintwaterError::AssetLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let field = Self::from_image(&image.to_rgb8())?;
        log::info!(
            "loaded normal map '{}' ({}x{})",
            path.display(),
            field.width,
            field.height
        );
        Ok(field)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether every texel points straight up.
    pub fn is_flat(&self) -> bool {
        self.normals.iter().all(|n| n.x == 0.0 && n.y == 0.0)
    }

    /// Bilinear, wrapped sample at texture coordinates `uv`.
    pub fn sample(&self, uv: Vec2) -> Vec3 {
        sample_bilinear(self.width, self.height, uv, AddressMode::Repeat, |x, y| {
            self.normals[y * self.width as usize + x]
        })
    }
}

impl Default for NormalField {
    fn default() -> Self {
        Self::flat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_field() {
        let field = NormalField::flat();
        assert!(field.is_flat());
        let n = field.sample(Vec2::new(0.3, -7.2));
        assert_eq!((n.x, n.y), (0.0, 0.0));
        assert!((n.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_procedural_tiles_seamlessly() {
        let field = NormalField::procedural(32, 0.1).unwrap();
        assert!(!field.is_flat());
        for &uv in &[Vec2::new(0.1, 0.2), Vec2::new(0.77, 0.5), Vec2::new(0.0, 0.99)] {
            let a = field.sample(uv);
            let b = field.sample(uv + Vec2::new(1.0, -3.0));
            assert!(a.abs_diff_eq(b, 1e-5));
        }
    }

    #[test]
    fn test_procedural_amplitude_bound() {
        let field = NormalField::procedural(16, 0.05).unwrap();
        for y in 0..16 {
            for x in 0..16 {
                let uv = Vec2::new((x as f32 + 0.5) / 16.0, (y as f32 + 0.5) / 16.0);
                let n = field.sample(uv);
                assert!(n.x.abs() <= 0.05 + 1e-6);
                assert!(n.y.abs() <= 0.05 + 1e-6);
                assert!(n.z > 0.99);
            }
        }
    }

    #[test]
    fn test_decode_normal_map() {
        let image = image::RgbImage::from_pixel(2, 2, image::Rgb([128, 128, 255]));
        let field = NormalField::from_image(&image).unwrap();
        let n = field.sample(Vec2::new(0.5, 0.5));
        assert!(n.x.abs() < 0.01 && n.y.abs() < 0.01);
        assert!((n.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_load_missing_file() {
        let err = NormalField::load("/nonexistent/waternormals.jpg").unwrap_err();
        assert!(matches!(err, GlintwaterError::AssetLoad { .. }));
    }
}
