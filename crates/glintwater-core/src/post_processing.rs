//! Configuration of the composited path's full-screen passes.

use serde::{Deserialize, Serialize};

use crate::error::{GlintwaterError, Result};

fn non_negative(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GlintwaterError::InvalidConfig(format!(
            "{name} {value} must be finite and non-negative"
        )))
    }
}

fn unit_interval(name: &str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(GlintwaterError::InvalidConfig(format!(
            "{name} {value} must lie in [0, 1]"
        )))
    }
}

/// Which surfaces feed the bloom bright pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BloomSelection {
    /// Every pixel, background included.
    #[default]
    All,
    /// Only water fragments.
    Water,
    /// Only scene objects (not water, not background).
    Objects,
}

/// Bloom configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomConfig {
    /// Whether bloom runs at all.
    pub enabled: bool,
    /// Linear luminance above which pixels bloom.
    pub luminance_threshold: f32,
    /// Width of the smoothstep ramp above the threshold.
    pub luminance_smoothing: f32,
    /// Scale of the blurred bright pass added back to the image.
    pub intensity: f32,
    /// Blend weight of the coarser level during upsampling, in [0, 1].
    pub radius: f32,
    /// Maximum number of half-resolution mip levels.
    pub levels: u32,
    /// Which surfaces contribute to the bright pass.
    pub selection: BloomSelection,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            luminance_threshold: 1.0,
            luminance_smoothing: 0.03,
            intensity: 0.2,
            radius: 0.3,
            levels: 5,
            selection: BloomSelection::All,
        }
    }
}

impl BloomConfig {
    /// Sets the luminance threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.luminance_threshold = threshold;
        self
    }

    /// Sets the intensity.
    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    /// Sets the upsampling radius.
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Sets the bloom selection.
    pub fn with_selection(mut self, selection: BloomSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn validate(&self) -> Result<()> {
        non_negative("bloom threshold", self.luminance_threshold)?;
        non_negative("bloom smoothing", self.luminance_smoothing)?;
        non_negative("bloom intensity", self.intensity)?;
        unit_interval("bloom radius", self.radius)
    }
}

/// Edge antialiasing configuration.
///
/// Only silhouette edges are smoothed: a pixel blends toward a neighbour that
/// belongs to a different surface, never across shading detail inside one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AntialiasConfig {
    /// Whether antialiasing runs at all.
    pub enabled: bool,
    /// Minimum perceptual luma contrast treated as an edge.
    pub edge_threshold: f32,
    /// Upper bound of the blend toward the neighbour across the edge.
    pub max_blend: f32,
}

impl Default for AntialiasConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            edge_threshold: 0.1,
            max_blend: 0.5,
        }
    }
}

impl AntialiasConfig {
    pub fn validate(&self) -> Result<()> {
        non_negative("antialias edge threshold", self.edge_threshold)?;
        unit_interval("antialias blend", self.max_blend)
    }
}

/// Full-screen passes of the composited path, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcessingConfig {
    pub bloom: BloomConfig,
    pub antialias: AntialiasConfig,
}

impl PostProcessingConfig {
    pub fn validate(&self) -> Result<()> {
        self.bloom.validate()?;
        self.antialias.validate()
    }
}
