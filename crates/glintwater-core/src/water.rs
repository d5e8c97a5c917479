//! Water surface configuration.

use serde::{Deserialize, Serialize};

use crate::error::{GlintwaterError, Result};

/// Construction-time parameters of the water surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterConfig {
    /// Reflection buffer width in pixels.
    pub texture_width: u32,
    /// Reflection buffer height in pixels.
    pub texture_height: u32,
    /// Magnitude of the normal perturbation and reflection distortion.
    pub distortion_scale: f32,
    /// Base tint of the refraction term, sRGB hex.
    pub water_color: u32,
    /// Tint of the specular highlight, sRGB hex.
    pub sun_color: u32,
    /// World-space edge length of one normal map tile.
    pub normal_tile_size: f32,
    /// Height of the water plane.
    pub height: f32,
    /// Edge length of the square water plane.
    pub extent: f32,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            texture_width: 256,
            texture_height: 256,
            distortion_scale: 2.0,
            water_color: 0x001e0f,
            sun_color: 0xffffff,
            normal_tile_size: 16.0,
            height: -1.0,
            extent: 1000.0,
        }
    }
}

impl WaterConfig {
    /// Creates a new water configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the reflection buffer resolution.
    pub fn with_texture_size(mut self, width: u32, height: u32) -> Self {
        self.texture_width = width;
        self.texture_height = height;
        self
    }

    /// Sets the distortion scale.
    pub fn with_distortion_scale(mut self, distortion_scale: f32) -> Self {
        self.distortion_scale = distortion_scale;
        self
    }

    /// Sets the water color.
    pub fn with_water_color(mut self, water_color: u32) -> Self {
        self.water_color = water_color;
        self
    }

    /// Sets the sun color.
    pub fn with_sun_color(mut self, sun_color: u32) -> Self {
        self.sun_color = sun_color;
        self
    }

    /// Checks ranges that would make shading meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.texture_width == 0 || self.texture_height == 0 {
            return Err(GlintwaterError::InvalidConfig(format!(
                "reflection texture size {}x{} must be non-zero",
                self.texture_width, self.texture_height
            )));
        }
        if !self.distortion_scale.is_finite() || self.distortion_scale < 0.0 {
            return Err(GlintwaterError::InvalidConfig(format!(
                "distortion scale {} must be finite and non-negative",
                self.distortion_scale
            )));
        }
        if !(self.normal_tile_size > 0.0) || !(self.extent > 0.0) {
            return Err(GlintwaterError::InvalidConfig(
                "normal tile size and plane extent must be positive".to_string(),
            ));
        }
        if !self.texture_width.is_power_of_two() || !self.texture_height.is_power_of_two() {
            log::debug!(
                "reflection texture {}x{} is not a power of two",
                self.texture_width,
                self.texture_height
            );
        }
        Ok(())
    }
}
