//! CPU image buffers and texture sampling.
//!
//! Three buffer types cover the color pipeline:
//! - [`HdrImage`]: linear f32 radiance (reflection buffer, post-processing scratch)
//! - [`RenderTarget`]: linear half-float RGBA, the composited path's intermediate
//! - [`DisplayBuffer`]: 8-bit RGBA, encoded for the display
//!
//! Row 0 is the top of the image, matching wgpu's texture origin.

use glam::{Vec2, Vec3, Vec4};
use glintwater_core::color::quantize_unorm8;
use glintwater_core::{check_dimensions, Result};
use half::f16;

/// How texture coordinates outside [0, 1] are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressMode {
    /// Clamp to the edge texel.
    #[default]
    ClampToEdge,
    /// Tile the texture.
    Repeat,
}

impl AddressMode {
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    fn resolve(self, i: i64, size: u32) -> usize {
        let n = i64::from(size);
        match self {
            AddressMode::ClampToEdge => i.clamp(0, n - 1) as usize,
            AddressMode::Repeat => i.rem_euclid(n) as usize,
        }
    }
}

/// Bilinear filtering over a texel fetch function.
///
/// Texel centers sit at `(i + 0.5) / size`.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn sample_bilinear<T, F>(width: u32, height: u32, uv: Vec2, mode: AddressMode, fetch: F) -> T
where
    T: std::ops::Mul<f32, Output = T> + std::ops::Add<Output = T>,
    F: Fn(usize, usize) -> T,
{
    let x = uv.x * width as f32 - 0.5;
    let y = uv.y * height as f32 - 0.5;
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let xa = mode.resolve(x0, width);
    let xb = mode.resolve(x0 + 1, width);
    let ya = mode.resolve(y0, height);
    let yb = mode.resolve(y0 + 1, height);

    let top = fetch(xa, ya) * (1.0 - fx) + fetch(xb, ya) * fx;
    let bottom = fetch(xa, yb) * (1.0 - fx) + fetch(xb, yb) * fx;
    top * (1.0 - fy) + bottom * fy
}

/// Linear f32 RGB image.
#[derive(Debug, Clone, PartialEq)]
pub struct HdrImage {
    width: u32,
    height: u32,
    pixels: Vec<Vec3>,
}

impl HdrImage {
    /// Creates a black image.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![Vec3::ZERO; (width as usize) * (height as usize)],
        })
    }

    /// Wraps existing pixels, row-major from the top-left.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Vec3>) -> Result<Self> {
        check_dimensions(width, height)?;
        let expected = (width as usize) * (height as usize);
        if pixels.len() != expected {
            return Err(glintwater_core::GlintwaterError::RenderError(format!(
                "pixel count {} does not match {width}x{height}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[Vec3] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Vec3] {
        &mut self.pixels
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    pub fn get(&self, x: u32, y: u32) -> Vec3 {
        self.pixels[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, value: Vec3) {
        let i = self.index(x, y);
        self.pixels[i] = value;
    }

    /// Overwrites every pixel.
    pub fn fill(&mut self, value: Vec3) {
        self.pixels.fill(value);
    }

    /// Reallocates to new dimensions; contents become black.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        *self = Self::new(width, height)?;
        Ok(())
    }

    /// Bilinear sample at normalized coordinates.
    pub fn sample(&self, uv: Vec2, mode: AddressMode) -> Vec3 {
        sample_bilinear(self.width, self.height, uv, mode, |x, y| {
            self.pixels[y * self.width as usize + x]
        })
    }

    /// Mean of all pixels.
    #[allow(clippy::cast_precision_loss)]
    pub fn average(&self) -> Vec3 {
        let sum: Vec3 = self.pixels.iter().copied().sum();
        sum / self.pixels.len() as f32
    }
}

fn saturate_f16(c: f32) -> f16 {
    if c.is_nan() || c <= 0.0 {
        f16::ZERO
    } else {
        f16::from_f32(c.min(f16::MAX.to_f32()))
    }
}

/// Linear half-float RGBA render target.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTarget {
    width: u32,
    height: u32,
    texels: Vec<[f16; 4]>,
}

impl RenderTarget {
    /// Creates a target cleared to transparent black.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            texels: vec![[f16::ZERO; 4]; (width as usize) * (height as usize)],
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Stores linear radiance with full alpha.
    ///
    /// Channels saturate at [`f16::MAX`]; NaN and negative values store as 0.
    pub fn store(&mut self, x: u32, y: u32, radiance: Vec3) {
        let i = (y as usize) * (self.width as usize) + (x as usize);
        self.texels[i] = [
            saturate_f16(radiance.x),
            saturate_f16(radiance.y),
            saturate_f16(radiance.z),
            f16::ONE,
        ];
    }

    pub fn load(&self, x: u32, y: u32) -> Vec4 {
        let t = self.texels[(y as usize) * (self.width as usize) + (x as usize)];
        Vec4::new(t[0].to_f32(), t[1].to_f32(), t[2].to_f32(), t[3].to_f32())
    }

    pub fn clear(&mut self) {
        self.texels.fill([f16::ZERO; 4]);
    }

    /// Reallocates to new dimensions.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        *self = Self::new(width, height)?;
        Ok(())
    }

    /// Copies the RGB channels into an f32 image of the same size.
    pub fn to_hdr_image(&self) -> HdrImage {
        let pixels = (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .map(|(x, y)| self.load(x, y).truncate())
            .collect();
        HdrImage {
            width: self.width,
            height: self.height,
            pixels,
        }
    }
}

/// 8-bit RGBA image handed to the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl DisplayBuffer {
    /// Creates an opaque black buffer.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        check_dimensions(width, height)?;
        let mut data = vec![0u8; (width as usize) * (height as usize) * 4];
        for px in data.chunks_exact_mut(4) {
            px[3] = 255;
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGBA bytes, row-major from the top-left.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Writes an already encoded color in [0, 1].
    pub fn write(&mut self, x: u32, y: u32, encoded: Vec3) {
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data[i] = quantize_unorm8(encoded.x);
        self.data[i + 1] = quantize_unorm8(encoded.y);
        self.data[i + 2] = quantize_unorm8(encoded.z);
        self.data[i + 3] = 255;
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Reallocates to new dimensions.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        *self = Self::new(width, height)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hdr_image_rejects_zero() {
        assert!(HdrImage::new(0, 3).is_err());
        assert!(RenderTarget::new(3, 0).is_err());
        assert!(DisplayBuffer::new(0, 0).is_err());
    }

    #[test]
    fn test_bilinear_midpoint() {
        let img = HdrImage::from_pixels(2, 1, vec![Vec3::ZERO, Vec3::ONE]).unwrap();
        let mid = img.sample(Vec2::new(0.5, 0.5), AddressMode::ClampToEdge);
        assert!((mid.x - 0.5).abs() < 1e-6);
        // Texel centers return their own value
        let left = img.sample(Vec2::new(0.25, 0.5), AddressMode::ClampToEdge);
        assert!(left.abs_diff_eq(Vec3::ZERO, 1e-6));
    }

    #[test]
    fn test_repeat_wraps() {
        let img = HdrImage::from_pixels(2, 1, vec![Vec3::ZERO, Vec3::ONE]).unwrap();
        let a = img.sample(Vec2::new(0.75, 0.5), AddressMode::Repeat);
        let b = img.sample(Vec2::new(1.75, 0.5), AddressMode::Repeat);
        let c = img.sample(Vec2::new(-0.25, 0.5), AddressMode::Repeat);
        assert!(a.abs_diff_eq(b, 1e-5));
        assert!(a.abs_diff_eq(c, 1e-5));
    }

    #[test]
    fn test_clamp_holds_edge() {
        let img = HdrImage::from_pixels(2, 1, vec![Vec3::ZERO, Vec3::ONE]).unwrap();
        let far = img.sample(Vec2::new(5.0, 0.5), AddressMode::ClampToEdge);
        assert!(far.abs_diff_eq(Vec3::ONE, 1e-6));
    }

    #[test]
    fn test_render_target_half_precision() {
        let mut target = RenderTarget::new(1, 1).unwrap();
        target.store(0, 0, Vec3::new(1.5, 0.25, 1000.0));
        let texel = target.load(0, 0);
        assert_eq!(texel.x, 1.5);
        assert_eq!(texel.y, 0.25);
        assert_eq!(texel.z, 1000.0);
        assert_eq!(texel.w, 1.0);
    }

    #[test]
    fn test_render_target_saturates_out_of_range() {
        let mut target = RenderTarget::new(2, 1).unwrap();
        target.store(0, 0, Vec3::new(70_000.0, f32::INFINITY, 1.0));
        target.store(1, 0, Vec3::new(f32::NAN, -2.0, f32::NEG_INFINITY));
        let bright = target.load(0, 0);
        assert_eq!(bright.x, 65504.0);
        assert_eq!(bright.y, 65504.0);
        assert_eq!(bright.z, 1.0);
        assert_eq!(target.load(1, 0).truncate(), Vec3::ZERO);
    }

    #[test]
    fn test_display_buffer_write() {
        let mut display = DisplayBuffer::new(2, 2).unwrap();
        assert_eq!(display.pixel(1, 1), [0, 0, 0, 255]);
        display.write(1, 0, Vec3::new(1.0, 0.5, 0.0));
        assert_eq!(display.pixel(1, 0), [255, 128, 0, 255]);
        assert_eq!(display.as_bytes().len(), 16);
    }

    #[test]
    fn test_resize_reallocates() {
        let mut display = DisplayBuffer::new(4, 4).unwrap();
        display.resize(8, 2).unwrap();
        assert_eq!(display.dimensions(), (8, 2));
        assert_eq!(display.as_bytes().len(), 64);
        assert!(display.resize(0, 2).is_err());
        assert_eq!(display.dimensions(), (8, 2));
    }
}
