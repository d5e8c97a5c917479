//! Camera and view management.

use glam::{Mat4, Vec2, Vec3};
use glintwater_core::CameraConfig;

/// A ray in world space with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Point at parameter `t` along the ray.
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// A perspective camera viewing the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Up vector.
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov: f32,
    /// Aspect ratio (width / height).
    pub aspect_ratio: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
}

impl Camera {
    /// Creates a new camera with default settings.
    #[must_use]
    pub fn new(aspect_ratio: f32) -> Self {
        Self::from_config(&CameraConfig::default(), aspect_ratio)
    }

    /// Creates a camera from configuration.
    #[must_use]
    pub fn from_config(config: &CameraConfig, aspect_ratio: f32) -> Self {
        Self {
            position: config.position,
            target: config.target,
            up: Vec3::Y,
            fov: config.fov_degrees.to_radians(),
            aspect_ratio,
            near: config.near,
            far: config.far,
        }
    }

    /// Sets the aspect ratio.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Returns the view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Returns the projection matrix (depth range 0..1).
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect_ratio, self.near, self.far)
    }

    /// Returns the combined view-projection matrix.
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Returns the normalized viewing direction.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    /// Ray through a point in normalized device coordinates.
    ///
    /// The origin lies on the near plane so geometry closer than `near`
    /// is never hit.
    #[must_use]
    pub fn ray_through_ndc(&self, ndc: Vec2) -> Ray {
        let half_height = (self.fov * 0.5).tan();
        let view_dir = Vec3::new(
            ndc.x * half_height * self.aspect_ratio,
            ndc.y * half_height,
            -1.0,
        );
        let camera_to_world = self.view_matrix().inverse();
        let offset = camera_to_world.transform_vector3(view_dir * self.near);
        Ray {
            origin: self.position + offset,
            direction: offset.normalize(),
        }
    }

    /// Ray through the center of pixel `(x, y)` of a `width` x `height` image.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pixel_ray(&self, x: u32, y: u32, width: u32, height: u32) -> Ray {
        let ndc = Vec2::new(
            (x as f32 + 0.5) / width as f32 * 2.0 - 1.0,
            1.0 - (y as f32 + 0.5) / height as f32 * 2.0,
        );
        self.ray_through_ndc(ndc)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(16.0 / 9.0)
    }
}
