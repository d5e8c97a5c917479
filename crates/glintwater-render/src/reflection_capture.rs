//! Mirror-camera capture of the scene into the reflection buffer.

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};
use glintwater_core::{Result, WaterConfig};

use crate::camera::Camera;
use crate::image::{AddressMode, HdrImage};
use crate::reflection::{mirror_camera, texture_matrix};
use crate::scene::{rasterize, Scene};

/// Linear radiance seen by the mirror camera, plus the matrix projecting
/// world positions into its UV space.
#[derive(Debug, Clone, PartialEq)]
pub struct ReflectionBuffer {
    image: HdrImage,
    texture_matrix: Mat4,
}

impl ReflectionBuffer {
    /// A black buffer.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Ok(Self {
            image: HdrImage::new(width, height)?,
            texture_matrix: Mat4::IDENTITY,
        })
    }

    pub fn from_parts(image: HdrImage, texture_matrix: Mat4) -> Self {
        Self {
            image,
            texture_matrix,
        }
    }

    pub fn image(&self) -> &HdrImage {
        &self.image
    }

    pub fn texture_matrix(&self) -> Mat4 {
        self.texture_matrix
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Projects a world position into buffer UV.
    ///
    /// Points behind the mirror camera land on the buffer's centre.
    pub fn project(&self, world_position: Vec3) -> Vec2 {
        let clip = self.texture_matrix * world_position.extend(1.0);
        if clip.w.abs() <= f32::EPSILON {
            return Vec2::splat(0.5);
        }
        clip.xy() / clip.w
    }

    /// Bilinear, clamped to edge.
    pub fn sample(&self, uv: Vec2) -> Vec3 {
        self.image.sample(uv, AddressMode::ClampToEdge)
    }

    fn clear(&mut self) {
        self.image.fill(Vec3::ZERO);
        self.texture_matrix = Mat4::IDENTITY;
    }
}

/// Owns the reflection buffer and regenerates it once per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ReflectionCapture {
    buffer: ReflectionBuffer,
    plane_height: f32,
}

impl ReflectionCapture {
    /// Allocates a `texture_width` x `texture_height` buffer for a water
    /// plane at `config.height`.
    pub fn new(config: &WaterConfig) -> Result<Self> {
        Ok(Self {
            buffer: ReflectionBuffer::new(config.texture_width, config.texture_height)?,
            plane_height: config.height,
        })
    }

    pub fn buffer(&self) -> &ReflectionBuffer {
        &self.buffer
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    /// Renders `scene` from the mirror of `camera`, overwriting the whole buffer.
    ///
    /// Without a sun, or with the camera at or below the water, the buffer is
    /// cleared to black instead.
    pub fn capture(&mut self, scene: &Scene, camera: &Camera) {
        let mirror = match (&scene.sun, mirror_camera(camera, self.plane_height)) {
            (Some(_), Some(mirror)) => mirror,
            (None, _) => {
                log::debug!("no sun in scene, reflection buffer left black");
                self.buffer.clear();
                return;
            }
            (_, None) => {
                log::debug!("camera below water plane, reflection buffer left black");
                self.buffer.clear();
                return;
            }
        };

        let (width, height) = self.buffer.dimensions();
        self.buffer.texture_matrix = texture_matrix(mirror.view_projection_matrix());
        rasterize(
            scene,
            &mirror,
            width,
            height,
            None,
            Some(self.plane_height),
            &mut self.buffer.image,
        );
    }
}
