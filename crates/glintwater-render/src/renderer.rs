//! Per-frame orchestration: reflection capture, shading, and the selected path.

use glam::Vec3;
use glintwater_core::{check_dimensions, Options, RenderPathKind, Result};

use crate::camera::Camera;
use crate::environment::Environment;
use crate::image::DisplayBuffer;
use crate::normal_field::NormalField;
use crate::paths::{CompositedPath, DirectPath, RenderPath};
use crate::reflection_capture::ReflectionCapture;
use crate::scene::{rasterize, Fragment, FragmentSink, Scene, SurfaceKind, WaterShading};
use crate::water::WaterSurface;

/// Shader-space radiance of one water fragment, as handed to the path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeSample {
    pub x: u32,
    pub y: u32,
    pub radiance: Vec3,
}

/// Forwards fragments to a path, recording water fragments on the way.
struct ProbeSink<'a, P: ?Sized> {
    path: &'a mut P,
    samples: Option<&'a mut Vec<ProbeSample>>,
}

impl<P: RenderPath + ?Sized> FragmentSink for ProbeSink<'_, P> {
    fn begin_frame(&mut self, width: u32, height: u32) {
        if let Some(samples) = self.samples.as_deref_mut() {
            samples.clear();
        }
        self.path.begin_frame(width, height);
    }

    fn submit(&mut self, x: u32, y: u32, fragment: &Fragment) {
        if fragment.surface == SurfaceKind::Water {
            if let Some(samples) = self.samples.as_deref_mut() {
                samples.push(ProbeSample {
                    x,
                    y,
                    radiance: fragment.radiance,
                });
            }
        }
        self.path.submit(x, y, fragment);
    }
}

/// Sizes of every frame-sized buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferDimensions {
    pub direct_display: (u32, u32),
    pub composited_display: (u32, u32),
    pub render_target: (u32, u32),
    pub bloom_levels: Vec<(u32, u32)>,
    pub reflection: (u32, u32),
}

/// Owns the scene, camera, water surface, reflection capture and both paths.
///
/// Switching paths never touches geometry, camera or the reflection buffer;
/// the selection is read once at the start of [`Renderer::render`].
pub struct Renderer {
    scene: Scene,
    camera: Camera,
    water: WaterSurface,
    reflection: ReflectionCapture,
    direct: DirectPath,
    composited: CompositedPath,
    path: RenderPathKind,
    probe: Option<Vec<ProbeSample>>,
    width: u32,
    height: u32,
}

#[allow(clippy::cast_precision_loss)]
fn aspect(width: u32, height: u32) -> f32 {
    width as f32 / height as f32
}

impl Renderer {
    /// Builds the reference scene described by `options`.
    pub fn new(options: &Options, environment: Environment, normals: NormalField) -> Result<Self> {
        options.validate()?;
        let (width, height) = (options.width, options.height);
        Ok(Self {
            scene: Scene::from_options(options, environment),
            camera: Camera::from_config(&options.camera, aspect(width, height)),
            water: WaterSurface::new(&options.water, normals),
            reflection: ReflectionCapture::new(&options.water)?,
            direct: DirectPath::new(options.tone_mapping, width, height)?,
            composited: CompositedPath::new(
                options.tone_mapping,
                &options.post_processing,
                width,
                height,
            )?,
            path: options.path,
            probe: None,
            width,
            height,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn water(&self) -> &WaterSurface {
        &self.water
    }

    pub fn reflection(&self) -> &ReflectionCapture {
        &self.reflection
    }

    pub fn composited(&self) -> &CompositedPath {
        &self.composited
    }

    pub fn path(&self) -> RenderPathKind {
        self.path
    }

    /// Takes effect at the next [`Renderer::render`].
    pub fn select_path(&mut self, path: RenderPathKind) {
        if path != self.path {
            log::info!("render path: {path}");
        }
        self.path = path;
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Advances the water's time uniform.
    pub fn advance(&mut self, delta: f32) {
        self.water.advance(delta);
    }

    /// Advances time by `delta` seconds, then renders.
    pub fn frame(&mut self, delta: f32) -> &DisplayBuffer {
        self.advance(delta);
        self.render()
    }

    /// Renders the current state without advancing time.
    pub fn render(&mut self) -> &DisplayBuffer {
        let kind = self.path;
        self.reflection.capture(&self.scene, &self.camera);

        let path: &mut dyn RenderPath = match kind {
            RenderPathKind::Direct => &mut self.direct,
            RenderPathKind::Composited => &mut self.composited,
        };
        let mut sink = ProbeSink {
            path,
            samples: self.probe.as_mut(),
        };
        rasterize(
            &self.scene,
            &self.camera,
            self.width,
            self.height,
            Some(WaterShading {
                surface: &self.water,
                reflection: self.reflection.buffer(),
            }),
            None,
            &mut sink,
        );
        let ProbeSink { path, .. } = sink;
        path.finish()
    }

    /// The last display buffer of the selected path.
    pub fn display(&self) -> &DisplayBuffer {
        match self.path {
            RenderPathKind::Direct => self.direct.display(),
            RenderPathKind::Composited => self.composited.display(),
        }
    }

    /// Resizes every frame-sized buffer and the camera aspect.
    ///
    /// Zero dimensions are rejected and the previous size is kept. The
    /// reflection buffer keeps its configured resolution.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if let Err(err) = check_dimensions(width, height) {
            log::warn!("rejected resize to {width}x{height}: {err}");
            return Err(err);
        }
        self.direct.resize(width, height)?;
        self.composited.resize(width, height)?;
        self.camera.set_aspect_ratio(aspect(width, height));
        self.width = width;
        self.height = height;
        log::debug!("resized to {width}x{height}");
        Ok(())
    }

    pub fn buffer_dimensions(&self) -> BufferDimensions {
        BufferDimensions {
            direct_display: self.direct.display().dimensions(),
            composited_display: self.composited.display().dimensions(),
            render_target: self.composited.render_target().dimensions(),
            bloom_levels: self.composited.bloom().mip_dimensions(),
            reflection: self.reflection.dimensions(),
        }
    }

    /// Starts or stops recording water fragments.
    pub fn set_probe(&mut self, enabled: bool) {
        self.probe = enabled.then(Vec::new);
    }

    /// Water fragments of the last frame rendered while the probe was on.
    pub fn probe_samples(&self) -> Option<&[ProbeSample]> {
        self.probe.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glintwater_core::SkyGradient;

    fn renderer() -> Renderer {
        let mut options = Options::default();
        options.width = 32;
        options.height = 18;
        options.water = options.water.with_texture_size(16, 16);
        options.camera.position = Vec3::new(0.0, 2.0, 0.0);
        options.camera.target = Vec3::new(0.0, -1.0, -10.0);
        Renderer::new(
            &options,
            Environment::gradient(&SkyGradient::default()),
            NormalField::procedural(16, 0.1).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_render_without_advance_is_repeatable() {
        let mut renderer = renderer();
        renderer.advance(0.7);
        let first = renderer.render().clone();
        let second = renderer.render().clone();
        assert_eq!(first, second);
    }

    #[test]
    fn test_frame_advances_time() {
        let mut renderer = renderer();
        renderer.frame(1.0);
        assert_eq!(renderer.water().elapsed(), 0.5);
    }

    #[test]
    fn test_probe_records_water_only() {
        let mut renderer = renderer();
        assert!(renderer.probe_samples().is_none());
        renderer.set_probe(true);
        renderer.render();
        let samples = renderer.probe_samples().unwrap();
        assert!(!samples.is_empty());
        assert!(samples.len() < 32 * 18);

        // A second frame replaces rather than appends
        let count = samples.len();
        renderer.render();
        assert_eq!(renderer.probe_samples().unwrap().len(), count);
    }

    #[test]
    fn test_select_path_switches_display() {
        let mut renderer = renderer();
        renderer.select_path(RenderPathKind::Composited);
        renderer.render();
        assert_eq!(renderer.path(), RenderPathKind::Composited);
        assert_eq!(renderer.display(), renderer.composited().display());
    }

    #[test]
    fn test_rejected_resize_keeps_buffers() {
        let mut renderer = renderer();
        let before = renderer.buffer_dimensions();
        assert!(renderer.resize(0, 10).is_err());
        assert_eq!(renderer.buffer_dimensions(), before);
        assert_eq!(renderer.dimensions(), (32, 18));
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut renderer = renderer();
        renderer.resize(40, 10).unwrap();
        assert_eq!(renderer.camera().aspect_ratio, 4.0);
        assert_eq!(renderer.render().dimensions(), (40, 10));
        assert_eq!(renderer.buffer_dimensions().reflection, (16, 16));
    }
}
