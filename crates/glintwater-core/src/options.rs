//! Configuration options for glintwater.

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{GlintwaterError, Result};
use crate::path::RenderPathKind;
use crate::post_processing::PostProcessingConfig;
use crate::tone_mapping::ToneMappingConfig;
use crate::water::WaterConfig;

/// Root configuration, fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
    /// Primary camera.
    pub camera: CameraConfig,
    /// Directional sun light.
    pub sun: SunConfig,
    /// Water surface parameters.
    pub water: WaterConfig,
    /// Tone mapping and output encoding, shared by both paths.
    pub tone_mapping: ToneMappingConfig,
    /// Bloom and antialiasing of the composited path.
    pub post_processing: PostProcessingConfig,
    /// Path selected at startup.
    pub path: RenderPathKind,
    /// Background and ambient lighting source.
    pub environment: EnvironmentConfig,
    /// Tileable normal map for the water; a procedural field is used when unset.
    pub normal_map: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            camera: CameraConfig::default(),
            sun: SunConfig::default(),
            water: WaterConfig::default(),
            tone_mapping: ToneMappingConfig::default(),
            post_processing: PostProcessingConfig::default(),
            path: RenderPathKind::Direct,
            environment: EnvironmentConfig::default(),
            normal_map: None,
        }
    }
}

impl Options {
    /// Parses options from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Options = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Reads options from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Serializes options to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks all nested configuration.
    pub fn validate(&self) -> Result<()> {
        crate::error::check_dimensions(self.width, self.height)?;
        self.water.validate()?;
        self.camera.validate()?;
        self.sun.validate()?;
        self.tone_mapping.validate()?;
        self.post_processing.validate()
    }
}

/// Primary camera placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            target: Vec3::new(0.0, 0.0, -1.0),
            fov_degrees: 70.0,
            near: 0.1,
            far: 20000.0,
        }
    }
}

impl CameraConfig {
    fn validate(&self) -> Result<()> {
        if !self.position.is_finite() || !self.target.is_finite() {
            return Err(GlintwaterError::InvalidConfig(
                "camera position and target must be finite".to_string(),
            ));
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(GlintwaterError::InvalidConfig(format!(
                "camera clip range {}..{} is invalid",
                self.near, self.far
            )));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(GlintwaterError::InvalidConfig(format!(
                "camera field of view {} is out of range",
                self.fov_degrees
            )));
        }
        if (self.target - self.position).length_squared() <= f32::EPSILON {
            return Err(GlintwaterError::InvalidConfig(
                "camera target coincides with its position".to_string(),
            ));
        }
        Ok(())
    }
}

/// Directional sun light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunConfig {
    /// Direction toward the sun; normalized on use.
    pub direction: Vec3,
    /// Light color, sRGB hex.
    pub color: u32,
    /// Intensity multiplier.
    pub intensity: f32,
}

impl Default for SunConfig {
    fn default() -> Self {
        Self {
            direction: Vec3::Y,
            color: 0xffffff,
            intensity: 1.0,
        }
    }
}

impl SunConfig {
    fn validate(&self) -> Result<()> {
        if !self.direction.is_finite() || self.direction.length_squared() <= f32::EPSILON {
            return Err(GlintwaterError::InvalidConfig(format!(
                "sun direction {} must be finite and non-zero",
                self.direction
            )));
        }
        if !self.intensity.is_finite() || self.intensity < 0.0 {
            return Err(GlintwaterError::InvalidConfig(format!(
                "sun intensity {} must be finite and non-negative",
                self.intensity
            )));
        }
        Ok(())
    }
}

/// Procedural sky colors, sRGB hex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyGradient {
    pub zenith: u32,
    pub horizon: u32,
    pub ground: u32,
    pub intensity: f32,
}

impl Default for SkyGradient {
    fn default() -> Self {
        Self {
            zenith: 0x3d6fb0,
            horizon: 0xc9dbe8,
            ground: 0x3a3a35,
            intensity: 1.0,
        }
    }
}

/// Background and ambient lighting source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EnvironmentConfig {
    /// No environment lighting; black background.
    None,
    /// Equirectangular Radiance HDR image.
    Hdr(PathBuf),
    /// Procedural sky.
    Gradient(SkyGradient),
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        EnvironmentConfig::Gradient(SkyGradient::default())
    }
}
