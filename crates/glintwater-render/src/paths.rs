//! The two render paths.
//!
//! Both are [`FragmentSink`]s fed by the same traversal. They differ only in
//! where the display transform happens:
//!
//! - [`DirectPath`] tone maps and encodes every fragment as it arrives.
//! - [`CompositedPath`] stores linear radiance in a half-float target, runs
//!   bloom and antialiasing on it, and tone maps the result last.

use glintwater_core::{
    check_dimensions, PostProcessingConfig, RenderPathKind, Result, ToneMappingConfig,
};

use crate::antialias::AntialiasPass;
use crate::bloom::BloomPass;
use crate::image::{DisplayBuffer, RenderTarget};
use crate::scene::{Fragment, FragmentSink, SurfaceKind};
use crate::tone_mapping::ToneMapPass;

/// A render path strategy.
pub trait RenderPath: FragmentSink {
    fn kind(&self) -> RenderPathKind;

    /// Reallocates every buffer the path owns. On error nothing changes.
    fn resize(&mut self, width: u32, height: u32) -> Result<()>;

    /// Completes the frame after the last fragment and returns the display buffer.
    fn finish(&mut self) -> &DisplayBuffer;

    /// The most recently finished frame.
    fn display(&self) -> &DisplayBuffer;
}

/// Tone map and encode per fragment, straight into the display buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectPath {
    tone_map: ToneMapPass,
    display: DisplayBuffer,
}

impl DirectPath {
    pub fn new(tone_mapping: ToneMappingConfig, width: u32, height: u32) -> Result<Self> {
        Ok(Self {
            tone_map: ToneMapPass::new(tone_mapping),
            display: DisplayBuffer::new(width, height)?,
        })
    }
}

impl FragmentSink for DirectPath {
    fn submit(&mut self, x: u32, y: u32, fragment: &Fragment) {
        self.display.write(x, y, self.tone_map.apply(fragment.radiance));
    }
}

impl RenderPath for DirectPath {
    fn kind(&self) -> RenderPathKind {
        RenderPathKind::Direct
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.display.resize(width, height)
    }

    fn finish(&mut self) -> &DisplayBuffer {
        &self.display
    }

    fn display(&self) -> &DisplayBuffer {
        &self.display
    }
}

/// Linear half-float target, bloom, antialiasing, then tone map and encode.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositedPath {
    target: RenderTarget,
    mask: Vec<SurfaceKind>,
    bloom: BloomPass,
    antialias: AntialiasPass,
    tone_map: ToneMapPass,
    display: DisplayBuffer,
}

impl CompositedPath {
    pub fn new(
        tone_mapping: ToneMappingConfig,
        post_processing: &PostProcessingConfig,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            target: RenderTarget::new(width, height)?,
            mask: vec![SurfaceKind::Background; (width as usize) * (height as usize)],
            bloom: BloomPass::new(post_processing.bloom, width, height)?,
            antialias: AntialiasPass::new(post_processing.antialias),
            tone_map: ToneMapPass::new(tone_mapping),
            display: DisplayBuffer::new(width, height)?,
        })
    }

    /// The linear radiance of the last frame, before any post processing.
    pub fn render_target(&self) -> &RenderTarget {
        &self.target
    }

    pub fn bloom(&self) -> &BloomPass {
        &self.bloom
    }

    /// Surface classification of each pixel of the last frame.
    pub fn surface_mask(&self) -> &[SurfaceKind] {
        &self.mask
    }
}

impl FragmentSink for CompositedPath {
    fn submit(&mut self, x: u32, y: u32, fragment: &Fragment) {
        let (width, _) = self.target.dimensions();
        self.mask[(y as usize) * (width as usize) + (x as usize)] = fragment.surface;
        self.target.store(x, y, fragment.radiance);
    }
}

impl RenderPath for CompositedPath {
    fn kind(&self) -> RenderPathKind {
        RenderPathKind::Composited
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        check_dimensions(width, height)?;
        self.target.resize(width, height)?;
        self.bloom.resize(width, height)?;
        self.display.resize(width, height)?;
        self.mask = vec![SurfaceKind::Background; (width as usize) * (height as usize)];
        Ok(())
    }

    fn finish(&mut self) -> &DisplayBuffer {
        let mut hdr = self.target.to_hdr_image();
        self.bloom.apply(&mut hdr, &self.mask);
        self.antialias.apply(&mut hdr, &self.mask);

        let (width, height) = hdr.dimensions();
        for y in 0..height {
            for x in 0..width {
                self.display.write(x, y, self.tone_map.apply(hdr.get(x, y)));
            }
        }
        &self.display
    }

    fn display(&self) -> &DisplayBuffer {
        &self.display
    }
}
