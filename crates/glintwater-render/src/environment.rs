//! Background and ambient lighting.

use std::f32::consts::{PI, TAU};
use std::path::Path;

use glam::{Vec2, Vec3};
use glintwater_core::color::hex_to_linear;
use glintwater_core::{GlintwaterError, Result, SkyGradient};

use crate::image::{AddressMode, HdrImage};

/// What the scene sees in directions that hit no geometry.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Environment {
    /// No environment lighting; black background, no ambient term.
    #[default]
    None,
    /// Equirectangular radiance map.
    Equirect { image: HdrImage, ambient: Vec3 },
    /// Analytic sky.
    Gradient {
        zenith: Vec3,
        horizon: Vec3,
        ground: Vec3,
    },
}

impl Environment {
    /// Builds an analytic sky from sRGB hex colors.
    pub fn gradient(sky: &SkyGradient) -> Self {
        Environment::Gradient {
            zenith: hex_to_linear(sky.zenith) * sky.intensity,
            horizon: hex_to_linear(sky.horizon) * sky.intensity,
            ground: hex_to_linear(sky.ground) * sky.intensity,
        }
    }

    /// Wraps an equirectangular image; the ambient term is its mean radiance.
    pub fn from_equirect(image: HdrImage) -> Self {
        let ambient = image.average();
        Environment::Equirect { image, ambient }
    }

    /// Loads a Radiance HDR (or any float-convertible) equirectangular image.
    pub fn load_hdr(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|e| GlintwaterError::AssetLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let rgb = image.to_rgb32f();
        let (width, height) = rgb.dimensions();
        let pixels = rgb.pixels().map(|p| Vec3::new(p[0], p[1], p[2])).collect();
        let image = HdrImage::from_pixels(width, height, pixels)?;
        log::info!(
            "loaded environment '{}' ({width}x{height})",
            path.display()
        );
        Ok(Self::from_equirect(image))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Environment::None)
    }

    /// Radiance arriving from direction `dir` (unit length).
    pub fn radiance(&self, dir: Vec3) -> Vec3 {
        match self {
            Environment::None => Vec3::ZERO,
            Environment::Equirect { image, .. } => {
                let uv = equirect_uv(dir);
                #[allow(clippy::cast_precision_loss)]
                let half_texel = 0.5 / image.height() as f32;
                let v = (1.0 - uv.y).clamp(half_texel, 1.0 - half_texel);
                image.sample(Vec2::new(uv.x, v), AddressMode::Repeat)
            }
            Environment::Gradient {
                zenith,
                horizon,
                ground,
            } => {
                let e = dir.y.clamp(-1.0, 1.0);
                if e >= 0.0 {
                    horizon.lerp(*zenith, e.sqrt())
                } else {
                    horizon.lerp(*ground, (-e).sqrt())
                }
            }
        }
    }

    /// Uniform ambient radiance used for diffuse lighting of objects.
    pub fn ambient(&self) -> Vec3 {
        match self {
            Environment::None => Vec3::ZERO,
            Environment::Equirect { ambient, .. } => *ambient,
            Environment::Gradient {
                zenith,
                horizon,
                ground,
            } => (*zenith + *horizon * 2.0 + *ground) * 0.25,
        }
    }
}

/// Equirectangular coordinates of a direction, `v = 1` at the zenith.
pub fn equirect_uv(dir: Vec3) -> Vec2 {
    Vec2::new(
        dir.z.atan2(dir.x) / TAU + 0.5,
        dir.y.clamp(-1.0, 1.0).asin() / PI + 0.5,
    )
}
