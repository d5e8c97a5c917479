//! Silhouette edge antialiasing in linear space.

use glam::Vec3;
use glintwater_core::color::{linear_to_srgb, luminance};
use glintwater_core::AntialiasConfig;

use crate::image::HdrImage;
use crate::scene::SurfaceKind;

/// Luma of a linear color after clamping and sRGB encoding, so edge contrast
/// is judged the way it will be seen.
pub fn perceptual_luma(color: Vec3) -> f32 {
    linear_to_srgb(luminance(color).clamp(0.0, 1.0))
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AntialiasPass {
    config: AntialiasConfig,
    source: Vec<Vec3>,
}

impl AntialiasPass {
    pub fn new(config: AntialiasConfig) -> Self {
        Self {
            config,
            source: Vec::new(),
        }
    }

    pub fn config(&self) -> &AntialiasConfig {
        &self.config
    }

    /// Blends each silhouette pixel toward its highest-contrast neighbour on
    /// the other side of the edge, by `min(contrast, 1) * max_blend`.
    pub fn apply(&mut self, image: &mut HdrImage, mask: &[SurfaceKind]) {
        if !self.config.enabled || self.config.max_blend <= 0.0 {
            return;
        }
        self.source.clear();
        self.source.extend_from_slice(image.pixels());

        let (width, height) = image.dimensions();
        let w = width as usize;
        let kind = |i: usize| mask.get(i).copied().unwrap_or(SurfaceKind::Background);

        for y in 0..height as usize {
            for x in 0..w {
                let i = y * w + x;
                let center = self.source[i];
                let luma = perceptual_luma(center);

                let mut neighbours = [None; 4];
                if x > 0 {
                    neighbours[0] = Some(i - 1);
                }
                if x + 1 < w {
                    neighbours[1] = Some(i + 1);
                }
                if y > 0 {
                    neighbours[2] = Some(i - w);
                }
                if y + 1 < height as usize {
                    neighbours[3] = Some(i + w);
                }

                let strongest = neighbours
                    .into_iter()
                    .flatten()
                    .filter(|&n| kind(n) != kind(i))
                    .map(|n| ((perceptual_luma(self.source[n]) - luma).abs(), n))
                    .filter(|&(contrast, _)| contrast >= self.config.edge_threshold)
                    .max_by(|a, b| a.0.total_cmp(&b.0));

                if let Some((contrast, n)) = strongest {
                    let blend = contrast.min(1.0) * self.config.max_blend;
                    image.pixels_mut()[i] = center.lerp(self.source[n], blend);
                }
            }
        }
    }
}
