//! Selective bloom over a half-resolution mip chain.
//!
//! The bright pass weights each linear pixel by
//! `smoothstep(threshold, threshold + smoothing, luma)`. The weighted image is
//! box-downsampled level by level, the levels are folded back up with bilinear
//! upsampling (blended by `radius`), and the finest level is added to the
//! input scaled by `intensity`. Everything stays in linear radiance.

use glam::{Vec2, Vec3};
use glintwater_core::color::luminance;
use glintwater_core::{check_dimensions, BloomConfig, BloomSelection, Result};

use crate::image::{AddressMode, HdrImage};
use crate::scene::SurfaceKind;

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x >= edge0 { 1.0 } else { 0.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Sizes of the successive half-resolution levels below `width` x `height`.
pub fn mip_chain_dimensions(width: u32, height: u32, levels: u32) -> Vec<(u32, u32)> {
    let mut dims = Vec::new();
    let (mut w, mut h) = (width, height);
    while dims.len() < levels as usize && (w > 1 || h > 1) {
        w = (w / 2).max(1);
        h = (h / 2).max(1);
        dims.push((w, h));
    }
    dims
}

#[allow(clippy::cast_precision_loss)]
fn texel_center(x: u32, y: u32, width: u32, height: u32) -> Vec2 {
    Vec2::new(
        (x as f32 + 0.5) / width as f32,
        (y as f32 + 0.5) / height as f32,
    )
}

fn downsample(src: &HdrImage, dst: &mut HdrImage) {
    let (sw, sh) = src.dimensions();
    let (dw, dh) = dst.dimensions();
    for y in 0..dh {
        for x in 0..dw {
            let x0 = (2 * x).min(sw - 1);
            let x1 = (2 * x + 1).min(sw - 1);
            let y0 = (2 * y).min(sh - 1);
            let y1 = (2 * y + 1).min(sh - 1);
            let sum = src.get(x0, y0) + src.get(x1, y0) + src.get(x0, y1) + src.get(x1, y1);
            dst.set(x, y, sum * 0.25);
        }
    }
}

fn upsample_blend(coarse: &HdrImage, fine: &mut HdrImage, radius: f32) {
    let (w, h) = fine.dimensions();
    for y in 0..h {
        for x in 0..w {
            let up = coarse.sample(texel_center(x, y, w, h), AddressMode::ClampToEdge);
            fine.set(x, y, fine.get(x, y).lerp(up, radius));
        }
    }
}

/// Bloom state: bright-pass image and mip chain, sized to the render target.
#[derive(Debug, Clone, PartialEq)]
pub struct BloomPass {
    config: BloomConfig,
    bright: HdrImage,
    mips: Vec<HdrImage>,
}

impl BloomPass {
    pub fn new(config: BloomConfig, width: u32, height: u32) -> Result<Self> {
        check_dimensions(width, height)?;
        let mips = mip_chain_dimensions(width, height, config.levels)
            .into_iter()
            .map(|(w, h)| HdrImage::new(w, h))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            config,
            bright: HdrImage::new(width, height)?,
            mips,
        })
    }

    pub fn config(&self) -> &BloomConfig {
        &self.config
    }

    /// Reallocates every level. On error the previous buffers are kept.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        *self = Self::new(self.config, width, height)?;
        Ok(())
    }

    pub fn mip_dimensions(&self) -> Vec<(u32, u32)> {
        self.mips.iter().map(HdrImage::dimensions).collect()
    }

    /// Bright-pass weight of one pixel.
    pub fn bright_weight(&self, radiance: Vec3, surface: SurfaceKind) -> f32 {
        let selected = match self.config.selection {
            BloomSelection::All => true,
            BloomSelection::Water => surface == SurfaceKind::Water,
            BloomSelection::Objects => surface == SurfaceKind::Object,
        };
        if !selected {
            return 0.0;
        }
        let threshold = self.config.luminance_threshold;
        smoothstep(
            threshold,
            threshold + self.config.luminance_smoothing,
            luminance(radiance),
        )
    }

    /// Adds bloom to `image` in place. `mask` classifies each pixel, row-major.
    pub fn apply(&mut self, image: &mut HdrImage, mask: &[SurfaceKind]) {
        if !self.config.enabled || self.config.intensity <= 0.0 || self.mips.is_empty() {
            return;
        }
        if image.dimensions() != self.bright.dimensions() {
            log::warn!(
                "bloom sized {:?} but image is {:?}, skipping",
                self.bright.dimensions(),
                image.dimensions()
            );
            return;
        }

        let weights: Vec<f32> = image
            .pixels()
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                self.bright_weight(c, mask.get(i).copied().unwrap_or(SurfaceKind::Background))
            })
            .collect();
        for ((dst, &src), w) in self
            .bright
            .pixels_mut()
            .iter_mut()
            .zip(image.pixels())
            .zip(weights)
        {
            *dst = src * w;
        }

        downsample(&self.bright, &mut self.mips[0]);
        for i in 1..self.mips.len() {
            let (finer, coarser) = self.mips.split_at_mut(i);
            downsample(&finer[i - 1], &mut coarser[0]);
        }
        for i in (0..self.mips.len() - 1).rev() {
            let (finer, coarser) = self.mips.split_at_mut(i + 1);
            upsample_blend(&coarser[0], &mut finer[i], self.config.radius);
        }

        let bloom = &self.mips[0];
        let (width, height) = image.dimensions();
        for y in 0..height {
            for x in 0..width {
                let glow = bloom.sample(texel_center(x, y, width, height), AddressMode::ClampToEdge);
                image.set(x, y, image.get(x, y) + glow * self.config.intensity);
            }
        }
    }
}
