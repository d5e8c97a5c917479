//! Scene description and the single traversal shared by every pass.
//!
//! Passes differ only in the [`FragmentSink`] that receives shaded
//! fragments: the reflection capture writes into an [`HdrImage`], the direct
//! path encodes straight to the display, the composited path fills its
//! half-float target.

use std::f32::consts::PI;

use glam::Vec3;
use glintwater_core::color::hex_to_linear;
use glintwater_core::{Options, SunConfig};

use crate::camera::{Camera, Ray};
use crate::environment::Environment;
use crate::image::HdrImage;
use crate::reflection_capture::ReflectionBuffer;
use crate::water::{WaterFragmentInput, WaterSurface};

/// Offset applied along normals before casting secondary rays.
const SHADOW_BIAS: f32 = 1e-3;

/// Directional light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunLight {
    /// Unit vector pointing toward the sun.
    pub direction: Vec3,
    /// Linear color scaled by intensity.
    pub color: Vec3,
}

impl SunLight {
    pub fn new(direction: Vec3, color: Vec3) -> Self {
        Self {
            direction: direction.normalize(),
            color,
        }
    }

    pub fn from_config(config: &SunConfig) -> Self {
        Self::new(config.direction, hex_to_linear(config.color) * config.intensity)
    }
}

/// Axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        Self {
            min: center - size * 0.5,
            max: center + size * 0.5,
        }
    }

    /// Slab test. Returns the entry distance and the face normal there.
    pub fn intersect(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<(f32, Vec3)> {
        let inv = ray.direction.recip();
        let t0 = (self.min - ray.origin) * inv;
        let t1 = (self.max - ray.origin) * inv;
        let near = t0.min(t1);
        let far = t0.max(t1);
        let t_enter = near.max_element();
        let t_exit = far.min_element();
        if t_enter > t_exit || t_exit < t_min || t_enter > t_max {
            return None;
        }
        if t_enter < t_min {
            // Ray starts inside the box
            return None;
        }
        let normal = if t_enter == near.x {
            Vec3::new(-ray.direction.x.signum(), 0.0, 0.0)
        } else if t_enter == near.y {
            Vec3::new(0.0, -ray.direction.y.signum(), 0.0)
        } else {
            Vec3::new(0.0, 0.0, -ray.direction.z.signum())
        };
        Some((t_enter, normal))
    }
}

/// An opaque diffuse object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneObject {
    pub bounds: Aabb,
    /// Linear albedo.
    pub albedo: Vec3,
}

/// The square water plane, facing +Y and visible only from above.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterPlane {
    pub height: f32,
    pub half_extent: f32,
}

impl WaterPlane {
    pub fn intersect(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<f32> {
        if ray.direction.y >= 0.0 {
            return None;
        }
        let t = (self.height - ray.origin.y) / ray.direction.y;
        if t < t_min || t > t_max {
            return None;
        }
        let p = ray.at(t);
        (p.x.abs() <= self.half_extent && p.z.abs() <= self.half_extent).then_some(t)
    }
}

/// What a primary ray hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitKind {
    Object(usize),
    Water,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub t: f32,
    pub position: Vec3,
    pub normal: Vec3,
    pub kind: HitKind,
}

/// Sun, environment, water and reference objects.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub sun: Option<SunLight>,
    pub environment: Environment,
    pub objects: Vec<SceneObject>,
    pub water: WaterPlane,
}

impl Scene {
    /// An empty scene around a water plane.
    pub fn new(water: WaterPlane) -> Self {
        Self {
            sun: None,
            environment: Environment::None,
            objects: Vec::new(),
            water,
        }
    }

    /// The reference scene: sun, environment, water and a red unit box.
    pub fn from_options(options: &Options, environment: Environment) -> Self {
        let water = WaterPlane {
            height: options.water.height,
            half_extent: options.water.extent * 0.5,
        };
        Self {
            sun: Some(SunLight::from_config(&options.sun)),
            environment,
            objects: vec![SceneObject {
                bounds: Aabb::from_center_size(Vec3::new(0.0, 0.0, -5.0), Vec3::ONE),
                albedo: hex_to_linear(0xff0000),
            }],
            water,
        }
    }

    /// Nearest hit with `t >= t_min`, optionally ignoring the water.
    pub fn trace(&self, ray: &Ray, t_min: f32, include_water: bool) -> Option<Hit> {
        let mut best: Option<Hit> = None;
        let mut t_max = f32::INFINITY;

        for (i, object) in self.objects.iter().enumerate() {
            if let Some((t, normal)) = object.bounds.intersect(ray, t_min, t_max) {
                t_max = t;
                best = Some(Hit {
                    t,
                    position: ray.at(t),
                    normal,
                    kind: HitKind::Object(i),
                });
            }
        }

        if include_water {
            if let Some(t) = self.water.intersect(ray, t_min, t_max) {
                best = Some(Hit {
                    t,
                    position: ray.at(t),
                    normal: Vec3::Y,
                    kind: HitKind::Water,
                });
            }
        }

        best
    }

    fn occluded(&self, origin: Vec3, direction: Vec3) -> bool {
        let ray = Ray { origin, direction };
        self.objects
            .iter()
            .any(|o| o.bounds.intersect(&ray, 0.0, f32::INFINITY).is_some())
    }

    /// Lambertian shading with a hard sun shadow and environment ambient.
    pub fn shade_object(&self, object: &SceneObject, position: Vec3, normal: Vec3) -> Vec3 {
        let mut light = self.environment.ambient();
        if let Some(sun) = &self.sun {
            let n_dot_l = normal.dot(sun.direction).max(0.0);
            if n_dot_l > 0.0 && !self.occluded(position + normal * SHADOW_BIAS, sun.direction) {
                light += sun.color * n_dot_l / PI;
            }
        }
        object.albedo * light
    }
}

/// Surface classification of a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    Background,
    Object,
    Water,
}

/// One shaded pixel in linear radiance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub surface: SurfaceKind,
    pub radiance: Vec3,
}

/// Receives shaded fragments from [`rasterize`].
pub trait FragmentSink {
    /// Called once before any fragment of a frame.
    fn begin_frame(&mut self, _width: u32, _height: u32) {}

    /// Called exactly once per pixel per frame.
    fn submit(&mut self, x: u32, y: u32, fragment: &Fragment);
}

impl FragmentSink for HdrImage {
    fn submit(&mut self, x: u32, y: u32, fragment: &Fragment) {
        self.set(x, y, fragment.radiance);
    }
}

/// Water inputs for passes that draw the water surface.
#[derive(Clone, Copy)]
pub struct WaterShading<'a> {
    pub surface: &'a WaterSurface,
    pub reflection: &'a ReflectionBuffer,
}

/// Traverses the scene once per pixel of a `width` x `height` image and
/// submits every shaded fragment to `sink`.
///
/// Without `water` the water surface is hidden. With `clip_height`, geometry
/// on the camera's side of that plane is clipped away (mirror cameras sit
/// below the water and must only see what is above it).
pub fn rasterize(
    scene: &Scene,
    camera: &Camera,
    width: u32,
    height: u32,
    water: Option<WaterShading<'_>>,
    clip_height: Option<f32>,
    sink: &mut dyn FragmentSink,
) {
    sink.begin_frame(width, height);
    for y in 0..height {
        for x in 0..width {
            let ray = camera.pixel_ray(x, y, width, height);
            let t_min = match clip_height {
                Some(h) if ray.origin.y < h => {
                    if ray.direction.y > 0.0 {
                        (h - ray.origin.y) / ray.direction.y
                    } else {
                        f32::INFINITY
                    }
                }
                _ => 0.0,
            };

            let hit = scene.trace(&ray, t_min, water.is_some());
            let fragment = match (hit, water) {
                (
                    Some(Hit {
                        kind: HitKind::Water,
                        position,
                        ..
                    }),
                    Some(water),
                ) => {
                    let shaded = water.surface.shade(&WaterFragmentInput {
                        world_position: position,
                        eye: camera.position,
                        sun: scene.sun.as_ref(),
                        reflection: water.reflection,
                    });
                    Fragment {
                        surface: SurfaceKind::Water,
                        radiance: shaded.radiance,
                    }
                }
                (
                    Some(Hit {
                        kind: HitKind::Object(i),
                        position,
                        normal,
                        ..
                    }),
                    _,
                ) => Fragment {
                    surface: SurfaceKind::Object,
                    radiance: scene.shade_object(&scene.objects[i], position, normal),
                },
                _ => Fragment {
                    surface: SurfaceKind::Background,
                    radiance: scene.environment.radiance(ray.direction),
                },
            };
            sink.submit(x, y, &fragment);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water_plane() -> WaterPlane {
        WaterPlane {
            height: -1.0,
            half_extent: 500.0,
        }
    }

    #[test]
    fn test_aabb_hit_and_normal() {
        let aabb = Aabb::from_center_size(Vec3::new(0.0, 0.0, -5.0), Vec3::ONE);
        let ray = Ray {
            origin: Vec3::ZERO,
            direction: Vec3::NEG_Z,
        };
        let (t, normal) = aabb.intersect(&ray, 0.0, f32::INFINITY).unwrap();
        assert!((t - 4.5).abs() < 1e-5);
        assert_eq!(normal, Vec3::Z);

        let miss = Ray {
            origin: Vec3::new(2.0, 0.0, 0.0),
            direction: Vec3::NEG_Z,
        };
        assert!(aabb.intersect(&miss, 0.0, f32::INFINITY).is_none());
    }

    #[test]
    fn test_water_visible_only_from_above() {
        let plane = water_plane();
        let down = Ray {
            origin: Vec3::ZERO,
            direction: Vec3::new(0.0, -1.0, -1.0).normalize(),
        };
        let t = plane.intersect(&down, 0.0, f32::INFINITY).unwrap();
        assert!((down.at(t).y + 1.0).abs() < 1e-5);

        let up = Ray {
            origin: Vec3::new(0.0, -3.0, 0.0),
            direction: Vec3::Y,
        };
        assert!(plane.intersect(&up, 0.0, f32::INFINITY).is_none());
    }

    #[test]
    fn test_trace_prefers_nearest() {
        let scene = Scene::from_options(&Options::default(), Environment::None);
        // Slightly downward toward the box: the box is closer than the water behind it
        let ray = Ray {
            origin: Vec3::ZERO,
            direction: Vec3::new(0.0, -0.05, -1.0).normalize(),
        };
        let hit = scene.trace(&ray, 0.0, true).unwrap();
        assert_eq!(hit.kind, HitKind::Object(0));

        // Hiding the water lets a steep ray escape to the background
        let steep = Ray {
            origin: Vec3::ZERO,
            direction: Vec3::new(0.0, -1.0, 0.2).normalize(),
        };
        assert_eq!(scene.trace(&steep, 0.0, true).unwrap().kind, HitKind::Water);
        assert!(scene.trace(&steep, 0.0, false).is_none());
    }

    #[test]
    fn test_shadowed_object_gets_ambient_only() {
        let mut scene = Scene::new(water_plane());
        scene.sun = Some(SunLight::new(Vec3::Y, Vec3::ONE));
        scene.environment = Environment::None;
        let lower = SceneObject {
            bounds: Aabb::from_center_size(Vec3::ZERO, Vec3::ONE),
            albedo: Vec3::ONE,
        };
        scene.objects = vec![
            lower,
            SceneObject {
                bounds: Aabb::from_center_size(Vec3::new(0.0, 3.0, 0.0), Vec3::ONE),
                albedo: Vec3::ONE,
            },
        ];
        let top = Vec3::new(0.0, 0.5, 0.0);
        assert_eq!(scene.shade_object(&lower, top, Vec3::Y), Vec3::ZERO);

        scene.objects.truncate(1);
        let lit = scene.shade_object(&lower, top, Vec3::Y);
        assert!((lit.x - 1.0 / PI).abs() < 1e-6);
    }

    #[test]
    fn test_rasterize_without_water_fills_every_pixel() {
        let options = Options::default();
        let scene = Scene::from_options(&options, Environment::gradient(&Default::default()));
        let camera = Camera::new(1.0);
        let mut image = HdrImage::new(8, 8).unwrap();
        image.fill(Vec3::splat(-1.0));
        rasterize(&scene, &camera, 8, 8, None, None, &mut image);
        assert!(image.pixels().iter().all(|p| p.min_element() >= 0.0));
    }

    #[derive(Default)]
    struct CountingSink {
        frames: usize,
        counts: Vec<u32>,
        water: usize,
        width: u32,
    }

    impl FragmentSink for CountingSink {
        fn begin_frame(&mut self, width: u32, height: u32) {
            self.frames += 1;
            self.width = width;
            self.counts = vec![0; (width * height) as usize];
        }

        fn submit(&mut self, x: u32, y: u32, fragment: &Fragment) {
            self.counts[(y * self.width + x) as usize] += 1;
            if fragment.surface == SurfaceKind::Water {
                self.water += 1;
            }
        }
    }

    #[test]
    fn test_rasterize_submits_each_pixel_once() {
        let scene = Scene::from_options(&Options::default(), Environment::None);
        let camera = Camera::new(1.0);
        let water = WaterSurface::new(&Default::default(), crate::normal_field::NormalField::flat());
        let reflection = ReflectionBuffer::new(4, 4).unwrap();
        let mut sink = CountingSink::default();
        rasterize(
            &scene,
            &camera,
            12,
            12,
            Some(WaterShading {
                surface: &water,
                reflection: &reflection,
            }),
            None,
            &mut sink,
        );
        assert_eq!(sink.frames, 1);
        assert!(sink.counts.iter().all(|&c| c == 1));
        // Lower half of a level camera looks at the water
        assert!(sink.water > 0);
    }
}
